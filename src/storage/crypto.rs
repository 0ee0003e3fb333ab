//! Password-based encryption of the catalog container
//!
//! Layout of an encrypted container: `salt (16) ‖ iv (16) ‖ ciphertext`.
//! The key is derived with PBKDF2-HMAC-SHA256 and the payload is encrypted
//! with AES-256 in CBC mode with PKCS7 padding. Salt and IV are not secret
//! and travel in the clear; the derived key is never stored.

use std::io::{Read, Write};

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const PBKDF2_ROUNDS: u32 = 10_000;

/// Header size preceding the ciphertext
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;

/// Failures of the cipher layer.
///
/// A wrong secret and a corrupted ciphertext are deliberately reported the
/// same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encrypted data is truncated ({len} bytes, header needs {HEADER_LEN})")]
    Truncated { len: usize },

    #[error("decryption failed: wrong password or corrupted data")]
    Rejected,
}

/// Derive a 256-bit key from a secret and a salt
pub fn derive_key(secret: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret, salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// Encrypt whatever `write_plain` writes into its sink.
///
/// A fresh random salt and IV are generated for every call, so encrypting
/// the same plaintext twice yields different containers.
pub fn encrypt<F, E>(secret: &[u8], write_plain: F) -> Result<Vec<u8>, E>
where
    F: FnOnce(&mut dyn Write) -> Result<(), E>,
{
    let mut plaintext = Vec::new();
    write_plain(&mut plaintext)?;
    Ok(encrypt_bytes(&plaintext, secret))
}

/// Encrypt an in-memory plaintext
pub fn encrypt_bytes(plaintext: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(secret, &salt);
    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut container = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    container.extend_from_slice(&salt);
    container.extend_from_slice(&iv);
    container.extend_from_slice(&ciphertext);
    container
}

/// Decrypt a container and hand the plaintext to `read_plain`
pub fn decrypt<F, T, E>(container: &[u8], secret: &[u8], read_plain: F) -> Result<T, E>
where
    F: FnOnce(&mut dyn Read) -> Result<T, E>,
    E: From<CryptoError>,
{
    let plaintext = decrypt_bytes(container, secret)?;
    read_plain(&mut plaintext.as_slice())
}

/// Decrypt a container into memory
pub fn decrypt_bytes(container: &[u8], secret: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if container.len() < HEADER_LEN {
        return Err(CryptoError::Truncated {
            len: container.len(),
        });
    }

    let (salt, rest) = container.split_at(SALT_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);
    let key = derive_key(secret, salt);

    Aes256CbcDec::new(&key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key(b"secret", b"0123456789abcdef");
        let key2 = derive_key(b"secret", b"0123456789abcdef");
        let other_salt = derive_key(b"secret", b"fedcba9876543210");

        assert_eq!(key1, key2);
        assert_ne!(key1, other_salt);
        assert_eq!(key1.len(), KEY_LEN);
    }

    #[test]
    fn test_round_trip() {
        let plaintext = b"{\"books\":[],\"categories\":[],\"users\":[]}";

        let container = encrypt_bytes(plaintext, b"hunter2");
        assert_eq!(container.len() % 16, 0);
        assert!(container.len() > HEADER_LEN + plaintext.len() - 16);

        let recovered = decrypt_bytes(&container, b"hunter2").unwrap();
        assert_eq!(recovered, plaintext.to_vec());
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let container = encrypt_bytes(b"", b"pw");
        // One full padding block after the header
        assert_eq!(container.len(), HEADER_LEN + 16);
        assert_eq!(decrypt_bytes(&container, b"pw").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_fresh_salt_and_iv_per_call() {
        let first = encrypt_bytes(b"same", b"pw");
        let second = encrypt_bytes(b"same", b"pw");
        assert_ne!(first[..HEADER_LEN], second[..HEADER_LEN]);
    }

    #[test]
    fn test_wrong_secret_never_recovers_plaintext() {
        let plaintext = b"the quick brown fox jumps over the lazy dog";
        let container = encrypt_bytes(plaintext, b"right");

        match decrypt_bytes(&container, b"wrong") {
            Err(err) => assert_eq!(err, CryptoError::Rejected),
            // Padding can validate by chance; the content still differs
            Ok(recovered) => assert_ne!(recovered, plaintext.to_vec()),
        }
    }

    #[test]
    fn test_truncated_input() {
        let err = decrypt_bytes(&[0u8; 31], b"pw").unwrap_err();
        assert_eq!(err, CryptoError::Truncated { len: 31 });
    }

    #[test]
    fn test_misaligned_ciphertext_rejected() {
        let mut container = encrypt_bytes(b"payload", b"pw");
        container.pop();
        assert_eq!(
            decrypt_bytes(&container, b"pw").unwrap_err(),
            CryptoError::Rejected
        );
    }

    #[test]
    fn test_stream_helpers() {
        let container = encrypt(b"pw", |sink| -> std::io::Result<()> {
            sink.write_all(b"streamed ")?;
            sink.write_all(b"payload")
        })
        .unwrap();

        let text = decrypt(&container, b"pw", |source| -> Result<String, CryptoError> {
            let mut text = String::new();
            source.read_to_string(&mut text).unwrap();
            Ok(text)
        })
        .unwrap();
        assert_eq!(text, "streamed payload");
    }
}
