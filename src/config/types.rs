use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::library::DEFAULT_MAX_LOANS;
use crate::storage::FormatKind;

/// User settings, read from `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Books a user may hold at the same time
    #[serde(default = "default_max_loans")]
    pub max_loans_per_user: usize,

    /// Encoding used when none is given on the command line
    #[serde(default)]
    pub default_format: FormatKind,

    /// Overrides the directory holding the encrypted library files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Overrides the account identity token used in file names and as the
    /// fallback secret
    #[serde(default)]
    pub identity: Option<String>,
}

fn default_max_loans() -> usize {
    DEFAULT_MAX_LOANS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_loans_per_user: DEFAULT_MAX_LOANS,
            default_format: FormatKind::default(),
            data_dir: None,
            identity: None,
        }
    }
}
