//! Key body encoding: per-section byte derivation and the checksum trailer.

pub mod checksum;
pub mod section;

use serde::{Deserialize, Serialize};

/// Encoding parameters for one key section.
///
/// The three parameters are byte-sized so that keys issued by existing
/// deployments keep deriving the same section bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Selects the seed shift (reduced modulo 25) and the mixing branch.
    pub a: i8,
    /// Selects the second seed shift (reduced modulo 3).
    pub b: i8,
    /// Mask combined with the shifted seed.
    pub c: i8,
}

impl SectionSpec {
    /// Create a section spec from its three parameters.
    pub const fn new(a: i8, b: i8, c: i8) -> Self {
        Self { a, b, c }
    }
}

/// Derives one key section byte from the seed.
pub trait SectionEncoder: Send + Sync {
    /// Derive the section byte for `seed` under `spec`.
    fn derive(&self, seed: i64, spec: &SectionSpec) -> u8;
}

/// Computes and checks the checksum trailer of a key.
pub trait ChecksumEngine: Send + Sync {
    /// Compute the checksum of a key body (everything before the trailer).
    fn compute_checksum(&self, body: &str) -> String;

    /// Check that the trailer of `key` matches the checksum of its body.
    fn verify_checksum(&self, key: &str) -> bool;
}
