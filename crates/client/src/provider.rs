//! Secondary wallet provider detection and account access
//!
//! The provider (a MetaMask-style injected wallet) may or may not be
//! present. Absence is an ordinary state, not an error; only an explicit
//! user refusal or a transport failure is surfaced as one. Each connect
//! invocation is a fresh request with no retry.

use crate::error::ProviderError;

/// The injected wallet provider's request surface
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync {
    /// Non-interactive query of already-authorized accounts
    /// (`eth_accounts`)
    async fn accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Interactive account access request (`eth_requestAccounts`); may be
    /// rejected by the user
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// The account currently selected in the provider's own UI, when it
    /// exposes one
    fn selected_account(&self) -> Option<String> {
        None
    }
}

/// Result of a non-interactive provider probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    pub installed: bool,
    pub allowed: bool,
    pub accounts: Vec<String>,
}

/// Probe the provider without prompting the user
///
/// Never errors: an absent provider reports not installed, a failing
/// accounts query reports installed but not allowed.
pub async fn detect(provider: Option<&dyn EthereumProvider>) -> ProviderStatus {
    let Some(provider) = provider else {
        return ProviderStatus {
            installed: false,
            allowed: false,
            accounts: Vec::new(),
        };
    };

    match provider.accounts().await {
        Ok(accounts) => ProviderStatus {
            installed: true,
            allowed: true,
            accounts,
        },
        Err(e) => {
            tracing::debug!(error = %e, "provider accounts query failed");
            ProviderStatus {
                installed: true,
                allowed: false,
                accounts: Vec::new(),
            }
        }
    }
}

/// Outcome of an interactive connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectState {
    /// No provider is injected; surfaced as a state, not an error
    NotInstalled,
    Connected { account: String },
}

/// Request account access from the provider
///
/// Prefers the provider's selected account when it appears in the returned
/// list, otherwise takes the first returned account.
///
/// # Errors
///
/// [`ProviderError::Rejected`] when the user declines or the provider
/// returns no accounts, [`ProviderError::Transport`] on a failed call.
pub async fn connect(
    provider: Option<&dyn EthereumProvider>,
) -> Result<ConnectState, ProviderError> {
    let Some(provider) = provider else {
        return Ok(ConnectState::NotInstalled);
    };

    let accounts = provider.request_accounts().await?;

    if let Some(selected) = provider.selected_account() {
        if accounts.contains(&selected) {
            return Ok(ConnectState::Connected { account: selected });
        }
    }

    match accounts.into_iter().next() {
        Some(account) => Ok(ConnectState::Connected { account }),
        None => Err(ProviderError::Rejected(
            "provider returned no accounts".into(),
        )),
    }
}
