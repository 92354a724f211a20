pub mod library;
pub mod paths;
pub mod store;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use library::{GameRecord, discover, installed_games, library_folders};
pub use paths::Paths;
pub use store::{StoreClient, StoreError};
pub use users::user_ids;
pub use vdf::{KeyValues, load_vdf, parse_vdf};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("VDF parse error: {0}")]
    Vdf(String),

    #[error("I/O error: {0}")]
    Io(String),
}
