//! Seed and key admission policy.
//!
//! These collaborators may sit in front of a remote registry, so their
//! answers are fallible. A backend failure is surfaced to the caller as
//! [`KeysmithError::CollaboratorUnavailable`](crate::KeysmithError), never
//! folded into a verdict.

pub mod blacklist;
pub mod registry;

use crate::errors::CollaboratorError;

/// Rejects individual keys and seeds.
pub trait BlacklistChecker: Send + Sync {
    /// Whether a cleaned (unstyled, uppercase) key is blacklisted.
    fn is_key_blacklisted(&self, key: &str) -> Result<bool, CollaboratorError>;

    /// Whether a seed, in its key-prefix hex form, is blacklisted.
    fn is_seed_blacklisted(&self, seed_hex: &str) -> Result<bool, CollaboratorError>;
}

/// Reports whether a seed may still be issued.
pub trait SeedAvailabilityChecker: Send + Sync {
    /// Whether a seed, in its key-prefix hex form, is still free.
    fn is_seed_available(&self, seed_hex: &str) -> Result<bool, CollaboratorError>;
}

impl<T: BlacklistChecker + ?Sized> BlacklistChecker for std::sync::Arc<T> {
    fn is_key_blacklisted(&self, key: &str) -> Result<bool, CollaboratorError> {
        (**self).is_key_blacklisted(key)
    }

    fn is_seed_blacklisted(&self, seed_hex: &str) -> Result<bool, CollaboratorError> {
        (**self).is_seed_blacklisted(seed_hex)
    }
}

impl<T: SeedAvailabilityChecker + ?Sized> SeedAvailabilityChecker for std::sync::Arc<T> {
    fn is_seed_available(&self, seed_hex: &str) -> Result<bool, CollaboratorError> {
        (**self).is_seed_available(seed_hex)
    }
}
