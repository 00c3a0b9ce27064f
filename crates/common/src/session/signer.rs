use std::sync::Arc;

use crate::crypto::{LocalKey, UnlockError};

/// Errors surfaced by a signing attempt
///
/// A failed unlock or extension call is a signing error, not a fatal
/// session error; the session stays usable and the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("no signer available for the current session")]
    NoSigner,
    #[error("signing failed: {0}")]
    Failed(String),
}

impl From<UnlockError> for SignError {
    fn from(e: UnlockError) -> Self {
        SignError::Failed(e.to_string())
    }
}

/// Raw-signing endpoint exposed by a browser extension
///
/// The extension signs on the account's behalf without ever exposing the
/// private key. `hex_data` is the "0x"-prefixed hex encoding of the message
/// bytes; the returned signature is a hex string.
#[async_trait::async_trait]
pub trait RawSigner: Send + Sync {
    async fn sign_raw(&self, address: &str, hex_data: &str) -> Result<String, SignError>;
}

/// One signing strategy per wallet kind, dispatched explicitly
#[derive(Clone)]
pub enum Signer {
    /// Delegate to an extension's raw-signing endpoint
    Extension {
        address: String,
        signer: Arc<dyn RawSigner>,
    },
    /// Sign with a locally held keypair, unlocking per call if needed
    Local { address: String, key: LocalKey },
}

impl Signer {
    /// The account this signer is bound to
    pub fn address(&self) -> &str {
        match self {
            Signer::Extension { address, .. } => address,
            Signer::Local { address, .. } => address,
        }
    }

    /// Sign a UTF-8 message, returning the signature as a hex string
    pub async fn sign(&self, data: &str, passphrase: Option<&str>) -> Result<String, SignError> {
        match self {
            Signer::Extension { address, signer } => {
                let hex_data = format!("0x{}", hex::encode(data.as_bytes()));
                signer.sign_raw(address, &hex_data).await
            }
            Signer::Local { key, .. } => Ok(key.sign_to_hex(data.as_bytes(), passphrase)?),
        }
    }
}
