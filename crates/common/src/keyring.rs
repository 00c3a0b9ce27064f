//! The set of chain accounts currently available to the application
//!
//! Mirrors what the surrounding app knows about at startup: accounts
//! injected by a browser extension (signing is delegated to the extension)
//! and raw keypairs held locally (possibly passphrase-locked).

use std::collections::HashMap;

use crate::crypto::LocalKey;

/// A single available account
#[derive(Debug, Clone)]
pub enum KeyEntry {
    /// Account injected by a browser extension
    ///
    /// `source` names the extension that injected it and is the lookup key
    /// for its raw-signing endpoint.
    Injected { address: String, source: String },
    /// Raw keypair held locally
    Local { address: String, key: LocalKey },
}

impl KeyEntry {
    pub fn address(&self) -> &str {
        match self {
            KeyEntry::Injected { address, .. } => address,
            KeyEntry::Local { address, .. } => address,
        }
    }
}

/// Lookup table of available accounts, keyed by address
#[derive(Debug, Clone, Default)]
pub struct Keyring {
    entries: HashMap<String, KeyEntry>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account, replacing any previous entry at the same address
    pub fn insert(&mut self, entry: KeyEntry) {
        self.entries.insert(entry.address().to_string(), entry);
    }

    pub fn get(&self, address: &str) -> Option<&KeyEntry> {
        self.entries.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
