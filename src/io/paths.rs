use crate::{BibliothequeError, Result};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

/// Folder created under the user's documents directory
const DATA_FOLDER: &str = "Bibliotheque";

/// Path management for the library's data and configuration
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    /// Directory holding the encrypted library files
    pub data_dir: PathBuf,
    /// Directory holding the settings file
    pub config_dir: Option<PathBuf>,
}

impl LibraryPaths {
    /// Resolve the standard locations: `<Documents>/Bibliotheque` for data,
    /// falling back to the platform data directory when there is no
    /// documents folder.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "bibliotheque");
        let documents = UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf));

        let data_dir = match (documents, &project) {
            (Some(documents), _) => documents.join(DATA_FOLDER),
            (None, Some(project)) => project.data_dir().to_path_buf(),
            (None, None) => {
                return Err(BibliothequeError::Path(
                    "Failed to determine a data directory".to_string(),
                ))
            }
        };

        Ok(Self {
            data_dir,
            config_dir: project.map(|dirs| dirs.config_dir().to_path_buf()),
        })
    }

    /// Use an explicit data directory
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            config_dir: None,
        }
    }

    /// Default settings file, if the platform has a config directory
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join("config.yaml"))
    }

    /// Ensure the data directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_data_dir() {
        let paths = LibraryPaths::for_data_dir("/tmp/library");
        assert_eq!(paths.data_dir, PathBuf::from("/tmp/library"));
        assert!(paths.config_file().is_none());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::for_data_dir(temp_dir.path().join("nested").join("data"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir.is_dir());
    }
}
