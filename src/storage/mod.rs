//! Encrypted, format-pluggable persistence of the catalog

pub mod codec;
pub mod crypto;
pub mod error;
pub mod persistence;

pub use codec::{CatalogCodec, CodecError, FormatKind};
pub use crypto::CryptoError;
pub use error::{PersistenceError, StorageFailure};
pub use persistence::{CatalogStore, MAX_PASSWORD_ATTEMPTS};
