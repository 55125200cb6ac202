//! Reversible password encryption.
//!
//! Stored passwords are AES-256-GCM ciphertexts, not one-way hashes; login
//! decrypts the stored value and compares plaintext. Reversibility is part
//! of the credential contract, not an accident.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("encryption key not configured")]
    MissingKey,

    #[error("ciphertext encoding is invalid")]
    Decode(#[from] base64::DecodeError),

    #[error("cryptographic operation failed")]
    Crypto,
}

/// Encrypt a password for storage: base64(nonce || ciphertext) with a fresh
/// random nonce per call, keyed by SHA-256 of the configured passphrase.
pub fn encrypt_string(plaintext: &str, passphrase: &str) -> Result<String, SecurityError> {
    let cipher = cipher_for(passphrase)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| SecurityError::Crypto)?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Recover the plaintext from a stored ciphertext.
pub fn decrypt_string(encoded: &str, passphrase: &str) -> Result<String, SecurityError> {
    let cipher = cipher_for(passphrase)?;
    let envelope = BASE64.decode(encoded.as_bytes())?;
    if envelope.len() <= NONCE_LEN {
        return Err(SecurityError::Crypto);
    }
    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SecurityError::Crypto)?;
    String::from_utf8(plaintext).map_err(|_| SecurityError::Crypto)
}

/// Decrypt the stored ciphertext and compare against the supplied password.
/// Plain equality, not constant time.
pub fn verify_text(plaintext: &str, encoded: &str, passphrase: &str) -> bool {
    match decrypt_string(encoded, passphrase) {
        Ok(decrypted) => decrypted == plaintext,
        Err(_) => false,
    }
}

fn cipher_for(passphrase: &str) -> Result<Aes256Gcm, SecurityError> {
    if passphrase.is_empty() {
        return Err(SecurityError::MissingKey);
    }
    let key = Sha256::digest(passphrase.as_bytes());
    Aes256Gcm::new_from_slice(&key).map_err(|_| SecurityError::Crypto)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "test-passphrase";

    #[test]
    fn roundtrip_recovers_plaintext() {
        let ciphertext = encrypt_string("broadstairs@123", KEY).unwrap();
        assert_ne!(ciphertext, "broadstairs@123");
        assert_eq!(decrypt_string(&ciphertext, KEY).unwrap(), "broadstairs@123");
    }

    #[test]
    fn fresh_nonce_gives_distinct_ciphertexts() {
        let first = encrypt_string("same", KEY).unwrap();
        let second = encrypt_string("same", KEY).unwrap();
        assert_ne!(first, second);
        assert!(verify_text("same", &first, KEY));
        assert!(verify_text("same", &second, KEY));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let ciphertext = encrypt_string("correct", KEY).unwrap();
        assert!(!verify_text("incorrect", &ciphertext, KEY));
    }

    #[test]
    fn verify_rejects_wrong_key_or_garbage() {
        let ciphertext = encrypt_string("correct", KEY).unwrap();
        assert!(!verify_text("correct", &ciphertext, "other-passphrase"));
        assert!(!verify_text("correct", "not base64!!", KEY));
    }

    #[test]
    fn empty_passphrase_fails_closed() {
        assert!(matches!(
            encrypt_string("pw", ""),
            Err(SecurityError::MissingKey)
        ));
    }
}
