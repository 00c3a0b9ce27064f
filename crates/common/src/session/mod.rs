mod resolver;
mod signer;

pub use resolver::SessionResolver;
pub use signer::{RawSigner, SignError, Signer};

use serde::{Deserialize, Serialize};

/// Persisted wallet tag of a login identity
///
/// Serialized exactly as the app has always stored it: the chain wallet is
/// the empty string, the external provider is "metamask".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wallet {
    #[serde(rename = "")]
    Chain,
    #[serde(rename = "metamask")]
    Metamask,
}

/// The login identity persisted under the `files:login` store key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub account: String,
    pub wallet: Wallet,
}

/// Which kind of wallet backs the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    /// Anonymous, nobody logged in
    None,
    /// A chain account, injected by a browser extension or held locally
    BrowserExtension,
    /// An account from a secondary, non-chain wallet provider
    ExternalProvider,
}

/// A resolved user session
///
/// Owns at most one signing strategy at a time. Recomputed from persisted
/// state whenever the login identity changes; never persisted itself.
#[derive(Clone)]
pub struct Session {
    account: String,
    wallet: WalletKind,
    locked: bool,
    signer: Option<Signer>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("wallet", &self.wallet)
            .field("locked", &self.locked)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

impl Session {
    pub(crate) fn new(
        account: String,
        wallet: WalletKind,
        locked: bool,
        signer: Option<Signer>,
    ) -> Self {
        Self {
            account,
            wallet,
            locked,
            signer,
        }
    }

    /// The session of nobody: empty account, no signing capability
    pub fn anonymous() -> Self {
        Self {
            account: String::new(),
            wallet: WalletKind::None,
            locked: true,
            signer: None,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn wallet(&self) -> WalletKind {
        self.wallet
    }

    /// Whether signing requires a passphrase
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_anonymous(&self) -> bool {
        self.account.is_empty()
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Sign arbitrary data on behalf of the session account
    ///
    /// The passphrase is only consulted for a locked local keypair, and the
    /// key is unlocked for the duration of this one call.
    ///
    /// # Errors
    ///
    /// [`SignError::NoSigner`] when the session has no signing capability
    /// (anonymous, or an external-provider login), [`SignError::Failed`]
    /// when unlocking or the signing call itself fails.
    pub async fn sign(&self, data: &str, passphrase: Option<&str>) -> Result<String, SignError> {
        match &self.signer {
            Some(signer) => signer.sign(data, passphrase).await,
            None => Err(SignError::NoSigner),
        }
    }
}
