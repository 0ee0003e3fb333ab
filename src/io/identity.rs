//! Per-account identity used to name the storage file and as the fallback secret
//!
//! The fallback secret only obfuscates: anything running under the same
//! account on the same machine can recompute it. It exists so a library can be
//! saved without choosing a password, not as a security boundary.

use sha2::{Digest, Sha256};

const IDENTITY_TAG: &[u8] = b"BIBLIOTHEQUE_ACCOUNT_V1";
const DEFAULT_USER: &str = "DefaultUser";

/// Stable identifier of the current account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    token: String,
}

impl AccountIdentity {
    /// Use an explicit token (from configuration, or in tests)
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Derive the token for the account running this process.
    ///
    /// Mixes the machine identifier (best effort) with the login name, so the
    /// same user on the same machine always gets the same token.
    pub fn current() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(IDENTITY_TAG);

        #[cfg(target_os = "linux")]
        {
            if let Ok(machine_id) = std::fs::read_to_string("/etc/machine-id") {
                hasher.update(machine_id.trim().as_bytes());
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Ok(computer) = std::env::var("COMPUTERNAME") {
                hasher.update(computer.as_bytes());
            }
        }

        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| DEFAULT_USER.to_string());
        hasher.update(username.as_bytes());

        let digest = hasher.finalize();
        Self::new(hex::encode(&digest[..16]))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Secret used when the caller does not supply a password
    pub fn fallback_secret(&self) -> &[u8] {
        self.token.as_bytes()
    }
}
