use std::path::{Path, PathBuf};

/// Provides access to the directories of one Steam installation.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance rooted at the Steam install directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the `steamapps` directory of the base installation.
    pub fn steamapps_dir(&self) -> PathBuf {
        steamapps_dir(&self.base_dir)
    }

    /// Returns the path to `libraryfolders.vdf`.
    pub fn library_folders_path(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }
}

/// Returns the `steamapps` directory of any library folder.
pub fn steamapps_dir(library: &Path) -> PathBuf {
    library.join("steamapps")
}

/// Returns true for `appmanifest_<id>.acf` file names.
pub fn is_app_manifest(file_name: &str) -> bool {
    file_name.starts_with("appmanifest_") && file_name.ends_with(".acf")
}
