use super::types::Settings;
use super::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`Settings`] from a YAML file
pub struct SettingsLoader {
    /// Explicit file, which must exist
    explicit: Option<PathBuf>,
    /// Platform default file, used only when present
    fallback: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a loader. `explicit` wins over `fallback`.
    pub fn new(explicit: Option<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self { explicit, fallback }
    }

    /// Resolve and load the settings
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if let Some(path) = &self.explicit {
            if !path.is_file() {
                return Err(ConfigError::Missing { path: path.clone() });
            }
            return Self::load_file(path);
        }

        match &self.fallback {
            Some(path) if path.is_file() => Self::load_file(path),
            _ => {
                debug!("no settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Load and validate a settings file
    pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Settings =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::validate(&settings)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    fn validate(settings: &Settings) -> Result<(), ConfigError> {
        if settings.max_loans_per_user == 0 {
            return Err(ConfigError::Invalid(
                "max_loans_per_user must be at least 1".to_string(),
            ));
        }
        if let Some(identity) = &settings.identity {
            if identity.trim().is_empty() {
                return Err(ConfigError::Invalid("identity must not be blank".to_string()));
            }
        }
        Ok(())
    }
}
