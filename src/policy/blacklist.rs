//! Digest-based in-memory blacklist.
//!
//! Only SHA-256 digests of blacklisted keys and seeds are held, so a list
//! shipped inside a client build does not hand out working keys.

use crate::errors::{CollaboratorError, KeysmithError};
use crate::policy::BlacklistChecker;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Hash a key or seed for blacklist storage.
///
/// Input is uppercased and everything but letters and digits is dropped
/// first, so styled and plain forms of the same key share a digest whatever
/// separator the styling uses.
pub fn blacklist_digest(value: &str) -> String {
    let normalized: String = value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase();
    let hash = Sha256::digest(normalized.as_bytes());
    hex::encode(hash)
}

/// Blacklist of key and seed digests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedBlacklist {
    /// Digests of blacklisted keys.
    #[serde(default)]
    keys: BTreeSet<String>,

    /// Digests of blacklisted seed hex strings.
    #[serde(default)]
    seeds: BTreeSet<String>,
}

impl HashedBlacklist {
    /// Create an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklist a key (styled or plain).
    pub fn add_key(&mut self, key: &str) {
        self.keys.insert(blacklist_digest(key));
    }

    /// Blacklist a seed by its key-prefix hex form.
    pub fn add_seed(&mut self, seed_hex: &str) {
        self.seeds.insert(blacklist_digest(seed_hex));
    }

    /// Number of blacklisted keys and seeds.
    pub fn len(&self) -> usize {
        self.keys.len() + self.seeds.len()
    }

    /// Whether nothing is blacklisted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.seeds.is_empty()
    }

    /// Serialize the digest lists to JSON.
    pub fn to_json(&self) -> Result<String, KeysmithError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeysmithError::ConfigError(format!("Failed to serialize blacklist: {}", e)))
    }

    /// Load digest lists from JSON.
    pub fn from_json(json: &str) -> Result<Self, KeysmithError> {
        serde_json::from_str(json)
            .map_err(|e| KeysmithError::ConfigError(format!("Failed to parse blacklist: {}", e)))
    }
}

impl BlacklistChecker for HashedBlacklist {
    fn is_key_blacklisted(&self, key: &str) -> Result<bool, CollaboratorError> {
        Ok(self.keys.contains(&blacklist_digest(key)))
    }

    fn is_seed_blacklisted(&self, seed_hex: &str) -> Result<bool, CollaboratorError> {
        Ok(self.seeds.contains(&blacklist_digest(seed_hex)))
    }
}
