//! Persistence error types

use std::path::PathBuf;

use thiserror::Error;

use super::codec::CodecError;
use super::crypto::CryptoError;

/// Underlying cause of a failed save or load
#[derive(Error, Debug)]
pub enum StorageFailure {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors surfaced by [`CatalogStore`](super::CatalogStore)
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Nothing has been saved at the resolved location yet
    #[error("No saved library found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot create storage directory {}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to save the library to {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: StorageFailure,
    },

    #[error("Error loading the library from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: StorageFailure,
    },

    /// Terminal: every password attempt failed and the file was deleted
    #[error("Wrong password {attempts} times, {} has been deleted", path.display())]
    Lockout {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: StorageFailure,
    },
}

impl PersistenceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::NotFound { .. })
    }

    pub fn is_lockout(&self) -> bool {
        matches!(self, PersistenceError::Lockout { .. })
    }

    /// Log lockouts on the security target
    pub fn log_if_security_critical(&self) {
        if let PersistenceError::Lockout { path, attempts, .. } = self {
            tracing::error!(
                target: "security",
                path = %path.display(),
                attempts,
                "LOCKOUT: encrypted library deleted after failed password attempts"
            );
        }
    }
}
