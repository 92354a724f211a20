//! Backup of verified save directories.
//!
//! Copies each verified save directory under `<backup_dir>/<appid>` and
//! dumps the store names of the backed-up titles.

mod copy;
mod error;
mod names;

pub use copy::{BackupReport, backup_all, copy_tree};
pub use error::BackupError;
pub use names::{NAMES_FILE, fetch_names, write_names};
