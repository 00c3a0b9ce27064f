mod keys;
mod locked;

pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use locked::{LocalKey, LockedKey, UnlockError};
