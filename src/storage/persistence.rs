//! Encrypted catalog files on disk, with bounded password retries

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::codec::FormatKind;
use super::crypto;
use super::error::{PersistenceError, StorageFailure};
use crate::catalog::Catalog;
use crate::io::AccountIdentity;

/// Failed password attempts tolerated before the stored file is destroyed
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Progress of an interactive load
enum RetryState {
    /// Ask for the secret of the given 1-based attempt
    Prompting(u32),
    /// The attempt failed and another one is allowed
    Retry { attempt: u32, cause: StorageFailure },
    Success(Catalog),
    /// Attempts exhausted
    Lockout { attempts: u32, cause: StorageFailure },
}

/// Saves and loads encrypted catalog files in a base directory
pub struct CatalogStore {
    base_dir: PathBuf,
    identity: AccountIdentity,
}

impl CatalogStore {
    /// Create a store writing into `base_dir`, naming files after `identity`
    pub fn new(base_dir: impl Into<PathBuf>, identity: AccountIdentity) -> Self {
        Self {
            base_dir: base_dir.into(),
            identity,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn identity(&self) -> &AccountIdentity {
        &self.identity
    }

    /// File used for `format`: `Bibliotheque_<token>.<ext>.enc`
    pub fn file_path(&self, format: FormatKind) -> PathBuf {
        self.base_dir.join(format!(
            "Bibliotheque_{}.{}.enc",
            self.identity.token(),
            format.extension()
        ))
    }

    /// Resolve the file used for `format`, creating the base directory if needed
    pub fn storage_path(&self, format: FormatKind) -> Result<PathBuf, PersistenceError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|source| PersistenceError::Directory {
                path: self.base_dir.clone(),
                source,
            })?;
        }
        Ok(self.file_path(format))
    }

    /// Whether a saved library exists for `format`
    pub fn exists(&self, format: FormatKind) -> bool {
        self.file_path(format).is_file()
    }

    /// Encode, encrypt and atomically write the catalog.
    ///
    /// Without a secret (or with an empty one) the account fallback secret is
    /// used. Returns the path written.
    pub fn save(
        &self,
        catalog: &Catalog,
        format: FormatKind,
        secret: Option<&str>,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.storage_path(format)?;

        self.write_catalog(&path, catalog, format, secret)
            .map_err(|source| PersistenceError::Save {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            format = %format,
            books = catalog.books.len(),
            users = catalog.users.len(),
            "library saved"
        );
        Ok(path)
    }

    /// Load with a single attempt; failures surface immediately and the file
    /// is never deleted.
    pub fn load(
        &self,
        format: FormatKind,
        secret: Option<&str>,
    ) -> Result<Catalog, PersistenceError> {
        let path = self.existing_path(format)?;

        let catalog = self
            .read_catalog(&path, format, secret)
            .map_err(|source| PersistenceError::Load {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), format = %format, "library loaded");
        Ok(catalog)
    }

    /// Load, asking `prompt` for the secret of each attempt.
    ///
    /// `prompt` receives the 1-based attempt number; `None` or an empty
    /// string selects the fallback secret. After [`MAX_PASSWORD_ATTEMPTS`]
    /// failures the file is deleted and [`PersistenceError::Lockout`] is
    /// returned with the last cause.
    pub fn load_with_prompt<P>(
        &self,
        format: FormatKind,
        mut prompt: P,
    ) -> Result<Catalog, PersistenceError>
    where
        P: FnMut(u32) -> Option<String>,
    {
        let path = self.existing_path(format)?;
        let mut state = RetryState::Prompting(1);

        loop {
            state = match state {
                RetryState::Prompting(attempt) => {
                    let candidate = prompt(attempt);
                    match self.read_catalog(&path, format, candidate.as_deref()) {
                        Ok(catalog) => RetryState::Success(catalog),
                        Err(cause) if attempt >= MAX_PASSWORD_ATTEMPTS => RetryState::Lockout {
                            attempts: attempt,
                            cause,
                        },
                        Err(cause) => RetryState::Retry { attempt, cause },
                    }
                }
                RetryState::Retry { attempt, cause } => {
                    warn!(
                        attempt,
                        remaining = MAX_PASSWORD_ATTEMPTS - attempt,
                        error = %cause,
                        "failed to open library"
                    );
                    RetryState::Prompting(attempt + 1)
                }
                RetryState::Success(catalog) => {
                    info!(path = %path.display(), format = %format, "library loaded");
                    return Ok(catalog);
                }
                RetryState::Lockout { attempts, cause } => {
                    remove_best_effort(&path);
                    let err = PersistenceError::Lockout {
                        path,
                        attempts,
                        source: cause,
                    };
                    err.log_if_security_critical();
                    return Err(err);
                }
            };
        }
    }

    fn existing_path(&self, format: FormatKind) -> Result<PathBuf, PersistenceError> {
        let path = self.storage_path(format)?;
        if !path.is_file() {
            debug!(path = %path.display(), "no saved library");
            return Err(PersistenceError::NotFound { path });
        }
        Ok(path)
    }

    fn secret<'a>(&'a self, candidate: Option<&'a str>) -> &'a [u8] {
        match candidate {
            Some(secret) if !secret.is_empty() => secret.as_bytes(),
            _ => self.identity.fallback_secret(),
        }
    }

    fn write_catalog(
        &self,
        path: &Path,
        catalog: &Catalog,
        format: FormatKind,
        secret: Option<&str>,
    ) -> Result<(), StorageFailure> {
        let codec = format.codec();
        let container = crypto::encrypt(self.secret(secret), |sink| {
            codec.encode(catalog, sink).map_err(StorageFailure::from)
        })?;

        let mut file = NamedTempFile::new_in(&self.base_dir)?;
        file.write_all(&container)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn read_catalog(
        &self,
        path: &Path,
        format: FormatKind,
        secret: Option<&str>,
    ) -> Result<Catalog, StorageFailure> {
        let container = fs::read(path)?;
        let codec = format.codec();
        crypto::decrypt(&container, self.secret(secret), |source| {
            codec.decode(source).map_err(StorageFailure::from)
        })
    }
}

/// Delete a file, ignoring failures
fn remove_best_effort(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "could not delete locked-out library");
    }
}
