/**
 * Cryptographic types and operations.
 *  - Ed25519 keypair implementation used for
 *    upload authentication signatures
 *  - Passphrase-locked key storage
 */
pub mod crypto;
/**
 * Static catalog of authenticated IPFS gateways
 *  and remote pinning services.
 */
pub mod endpoints;
/**
 * The set of chain accounts currently available
 *  to the application, either injected by a
 *  browser extension or held as raw keypairs.
 */
pub mod keyring;
/**
 * Session resolution: maps a persisted login
 *  identity onto a live Session with a signing
 *  strategy per wallet kind.
 */
pub mod session;
/**
 * Persisted local state. A small JSON key-value
 *  store holding the saved file list and the
 *  last login identity.
 */
pub mod store;

pub mod prelude {
    pub use crate::crypto::{LocalKey, LockedKey, PublicKey, SecretKey};
    pub use crate::endpoints::{gateways, pinners, Endpoint};
    pub use crate::keyring::{KeyEntry, Keyring};
    pub use crate::session::{
        LoginUser, RawSigner, Session, SessionResolver, SignError, Signer, Wallet, WalletKind,
    };
    pub use crate::store::{SaveFile, Store};
}
