//! Presentation of keys: separator insertion and removal.
//!
//! Styling is purely cosmetic and is removed before any validation runs.

pub mod hyphen;

/// Adds and removes display separators.
pub trait StylingEngine: Send + Sync {
    /// Format a plain key for display.
    fn add_styling(&self, key: &str) -> String;

    /// Strip display formatting. Must be idempotent and undo `add_styling`.
    fn remove_styling(&self, key: &str) -> String;
}
