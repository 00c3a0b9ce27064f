//! Passphrase-locked key storage using ChaCha20-Poly1305
//!
//! A raw keypair held by the application may be protected by a passphrase.
//! The secret key is sealed under a key derived from the passphrase and a
//! random salt, and is only reconstituted in memory for the duration of a
//! single signing call.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::keys::{PublicKey, SecretKey, PRIVATE_KEY_SIZE};

/// Size of the random salt mixed into the passphrase derivation
pub const SALT_SIZE: usize = 16;
/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;

/// Errors that can occur while unlocking a sealed key
#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    #[error("invalid passphrase")]
    BadPassphrase,
    #[error("passphrase required to unlock this key")]
    PassphraseRequired,
    #[error("sealed key is malformed: {0}")]
    Malformed(String),
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Key {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(passphrase.as_bytes());
    let digest = hasher.finalize();
    *Key::from_slice(&digest)
}

/// A secret key sealed under a passphrase
///
/// The sealed format is: `salt (16 bytes) || nonce (12 bytes) || encrypted
/// secret || auth tag (16 bytes)`. The public key is kept alongside in the
/// clear so the account identifier stays available while the key is locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedKey {
    public: PublicKey,
    sealed: Vec<u8>,
}

impl LockedKey {
    /// Seal a secret key under a passphrase
    pub fn seal(secret: &SecretKey, passphrase: &str) -> Self {
        let mut salt = [0u8; SALT_SIZE];
        getrandom::getrandom(&mut salt).expect("failed to generate random bytes");
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).expect("failed to generate random bytes");

        let cipher = ChaCha20Poly1305::new(&derive_key(passphrase, &salt));
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, secret.to_bytes().as_ref())
            .expect("encryption of a fixed-size key cannot fail");

        let mut sealed = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&salt);
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Self {
            public: secret.public(),
            sealed,
        }
    }

    /// The public half of the sealed keypair
    pub fn public(&self) -> PublicKey {
        self.public
    }

    /// Unlock the sealed key with a passphrase
    ///
    /// # Errors
    ///
    /// Returns [`UnlockError::BadPassphrase`] when the passphrase does not
    /// authenticate, and [`UnlockError::Malformed`] when the sealed blob is
    /// truncated or the decrypted secret has the wrong size.
    pub fn unlock(&self, passphrase: &str) -> Result<SecretKey, UnlockError> {
        if self.sealed.len() < SALT_SIZE + NONCE_SIZE {
            return Err(UnlockError::Malformed("sealed blob too short".into()));
        }
        let (salt, rest) = self.sealed.split_at(SALT_SIZE);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

        let cipher = ChaCha20Poly1305::new(&derive_key(passphrase, salt));
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| UnlockError::BadPassphrase)?;

        if plaintext.len() != PRIVATE_KEY_SIZE {
            return Err(UnlockError::Malformed("unexpected secret size".into()));
        }
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        bytes.copy_from_slice(&plaintext);
        Ok(SecretKey::from(bytes))
    }

    /// Sign a message, unlocking only for the duration of this call
    pub fn sign_to_hex(&self, msg: &[u8], passphrase: &str) -> Result<String, UnlockError> {
        let secret = self.unlock(passphrase)?;
        Ok(secret.sign_to_hex(msg))
    }
}

/// A locally held keypair, either in the clear or passphrase-locked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LocalKey {
    Plain(SecretKey),
    Locked(LockedKey),
}

impl LocalKey {
    /// Whether signing with this key requires a passphrase
    pub fn is_locked(&self) -> bool {
        matches!(self, LocalKey::Locked(_))
    }

    /// The public half of the keypair
    pub fn public(&self) -> PublicKey {
        match self {
            LocalKey::Plain(secret) => secret.public(),
            LocalKey::Locked(locked) => locked.public(),
        }
    }

    /// Sign a message with this key
    ///
    /// For a locked key the passphrase is mandatory and the key is unlocked
    /// only for this one call.
    pub fn sign_to_hex(&self, msg: &[u8], passphrase: Option<&str>) -> Result<String, UnlockError> {
        match self {
            LocalKey::Plain(secret) => Ok(secret.sign_to_hex(msg)),
            LocalKey::Locked(locked) => {
                let passphrase = passphrase.ok_or(UnlockError::PassphraseRequired)?;
                locked.sign_to_hex(msg, passphrase)
            }
        }
    }
}
