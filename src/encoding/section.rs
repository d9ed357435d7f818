//! Default section byte derivation.
//!
//! The mixing below is obfuscation, not a cryptographic primitive. It must stay
//! bit-for-bit stable: every key already issued depends on it.

use crate::encoding::{SectionEncoder, SectionSpec};

/// Section encoder used by the basic generator.
///
/// For a spec `(a, b, c)`:
/// - `shift_a = a % 25`, `shift_b = b % 3` (truncating remainder, so negative
///   parameters give negative shifts that wrap modulo 64)
/// - even `shift_a`: `((seed >> shift_a) & 0xFF) ^ ((seed >> shift_b) | c)`
/// - odd `shift_a`: `((seed >> shift_a) & 0xFF) ^ ((seed >> shift_b) & c)`
///
/// truncated to the low byte. `c` is sign-extended before combining.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSectionEncoder;

impl SectionEncoder for BasicSectionEncoder {
    fn derive(&self, seed: i64, spec: &SectionSpec) -> u8 {
        let shift_a = spec.a % 25;
        let shift_b = spec.b % 3;
        let mask = i64::from(spec.c);

        let high = seed.wrapping_shr(shift_a as u32) & 0xFF;
        let low = seed.wrapping_shr(shift_b as u32);

        let mixed = if shift_a % 2 == 0 {
            high ^ (low | mask)
        } else {
            high ^ (low & mask)
        };

        mixed as u8
    }
}
