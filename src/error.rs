use thiserror::Error;

use crate::config::ConfigError;
use crate::library::DomainError;
use crate::storage::PersistenceError;

#[derive(Error, Debug)]
pub enum BibliothequeError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    Path(String),
}

pub type Result<T> = std::result::Result<T, BibliothequeError>;
