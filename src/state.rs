//! Verification verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a key by [`ProductKeyGenerator::verify`](crate::ProductKeyGenerator::verify).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyState {
    /// Every configured section matched.
    Good,
    /// Malformed, unverifiable, or a section mismatched.
    Phony,
    /// Checksum trailer did not match the key body.
    Invalid,
    /// Checksum passed but the key is on the blacklist.
    Blacklisted,
}

impl KeyState {
    /// Whether the key may be accepted.
    pub fn is_good(&self) -> bool {
        matches!(self, KeyState::Good)
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyState::Good => "GOOD",
            KeyState::Phony => "PHONY",
            KeyState::Invalid => "INVALID",
            KeyState::Blacklisted => "BLACKLISTED",
        };
        f.write_str(name)
    }
}
