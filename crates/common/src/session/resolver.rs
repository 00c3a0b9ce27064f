use std::collections::HashMap;
use std::sync::Arc;

use crate::keyring::{KeyEntry, Keyring};
use crate::store::{Store, StoreError};

use super::{LoginUser, RawSigner, Session, Signer, Wallet, WalletKind};

/// Resolves the persisted login identity to a live [`Session`]
///
/// Holds the set of available accounts, the raw-signing endpoints of any
/// registered extensions (by source name), and the persisted store. The
/// store is written whenever the login identity changes and cleared on
/// logout.
pub struct SessionResolver {
    keyring: Keyring,
    extensions: HashMap<String, Arc<dyn RawSigner>>,
    store: Store,
}

impl SessionResolver {
    pub fn new(keyring: Keyring, store: Store) -> Self {
        Self {
            keyring,
            extensions: HashMap::new(),
            store,
        }
    }

    /// Register an extension's raw-signing endpoint under its source name
    pub fn register_extension(&mut self, source: impl Into<String>, signer: Arc<dyn RawSigner>) {
        self.extensions.insert(source.into(), signer);
    }

    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Resolve the current session from persisted state
    ///
    /// An unresolvable identity (no persisted login, empty account, or a
    /// chain account the keyring no longer knows) yields the anonymous
    /// session. A missing extension signer is not an error: the session
    /// resolves without a signing capability and signing attempts report
    /// "no signer available".
    pub fn resolve(&self) -> Session {
        let Some(user) = self.store.login() else {
            return Session::anonymous();
        };
        if user.account.is_empty() {
            return Session::anonymous();
        }

        match user.wallet {
            Wallet::Metamask => {
                // provider-backed signing is not wired up; the session is
                // usable for identity but carries no signer
                Session::new(user.account, WalletKind::ExternalProvider, false, None)
            }
            Wallet::Chain => match self.keyring.get(&user.account) {
                Some(KeyEntry::Injected { address, source }) => {
                    let signer = self.extensions.get(source).cloned().map(|signer| {
                        Signer::Extension {
                            address: address.clone(),
                            signer,
                        }
                    });
                    if signer.is_none() {
                        tracing::warn!(source = %source, "no raw signer registered for extension source");
                    }
                    Session::new(user.account, WalletKind::BrowserExtension, false, signer)
                }
                Some(KeyEntry::Local { address, key }) => {
                    let locked = key.is_locked();
                    let signer = Signer::Local {
                        address: address.clone(),
                        key: key.clone(),
                    };
                    Session::new(
                        user.account,
                        WalletKind::BrowserExtension,
                        locked,
                        Some(signer),
                    )
                }
                None => {
                    tracing::debug!(account = %user.account, "persisted account not in keyring");
                    Session::anonymous()
                }
            },
        }
    }

    /// Persist a new login identity and resolve it
    pub fn login(&mut self, user: LoginUser) -> Result<Session, StoreError> {
        tracing::info!(account = %user.account, "login");
        self.store.set_login(&user)?;
        Ok(self.resolve())
    }

    /// Clear the persisted identity and return the anonymous session
    pub fn logout(&mut self) -> Result<Session, StoreError> {
        tracing::info!("logout");
        self.store.clear_login()?;
        Ok(Session::anonymous())
    }
}
