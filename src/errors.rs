//! Keysmith error types.

use thiserror::Error;

/// Errors that can occur while generating a product key.
///
/// Verification never reports the business outcomes below; it classifies the
/// key with a [`KeyState`](crate::KeyState) instead. The only error a verifier
/// surfaces is [`KeysmithError::CollaboratorUnavailable`].
#[derive(Debug, Error)]
pub enum KeysmithError {
    /// The seed could not be normalized through its hexadecimal form.
    #[error("Seed is not a valid hexadecimal value")]
    InvalidSeed,

    /// No section parameters configured, or one of them is absent.
    #[error("Encoding data not complete: every key section needs parameters to generate")]
    EncodingDataNotComplete,

    /// No section encoder configured.
    #[error("No section encoder defined")]
    EncoderNotDefined,

    /// Seed rejected by the blacklist.
    #[error("Seed {seed_hex} is blacklisted")]
    SeedBlacklisted {
        /// The seed, in its key-prefix hexadecimal form.
        seed_hex: String,
    },

    /// Seed rejected by the availability checker.
    #[error("Seed {seed_hex} is already taken")]
    SeedAlreadyTaken {
        /// The seed, in its key-prefix hexadecimal form.
        seed_hex: String,
    },

    /// A blacklist or availability backend failed to answer.
    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        /// Which collaborator failed ("blacklist", "seed availability").
        collaborator: &'static str,
        /// Backend-supplied reason.
        reason: String,
    },

    /// Configuration could not be read or written.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KeysmithError {
    /// Whether a fresh seed could succeed where this one failed.
    pub fn is_seed_rejection(&self) -> bool {
        matches!(
            self,
            KeysmithError::SeedBlacklisted { .. } | KeysmithError::SeedAlreadyTaken { .. }
        )
    }
}

/// Failure reported by a blacklist or seed-availability backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    /// Create a collaborator error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub(crate) fn into_keysmith(self, collaborator: &'static str) -> KeysmithError {
        KeysmithError::CollaboratorUnavailable {
            collaborator,
            reason: self.0,
        }
    }
}
