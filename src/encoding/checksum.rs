//! Rolling two-accumulator checksum over the key body.
//!
//! Rejects keys with typos or random characters before any section is
//! derived. Not a MAC: anyone holding the algorithm can forge a trailer.

use crate::codec::hex::encode_hex;
use crate::encoding::ChecksumEngine;

/// Width of the checksum trailer in hex characters.
pub const CHECKSUM_LEN: usize = 4;

const LEFT_INIT: i32 = 0x56;
const RIGHT_INIT: i32 = 0xAF;
const FOLD: i32 = 0xFF;

/// Checksum engine used by the basic generator.
#[derive(Debug, Clone, Copy)]
pub struct BasicChecksum {
    separator: char,
}

impl BasicChecksum {
    /// Checksum engine ignoring the given styling separator.
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }

    /// Trim, drop separators, and uppercase.
    fn normalize(&self, key: &str) -> String {
        key.trim()
            .chars()
            .filter(|c| *c != self.separator)
            .collect::<String>()
            .to_uppercase()
    }

    fn checksum_of_normalized(body: &str) -> String {
        let mut left = LEFT_INIT;
        let mut right = RIGHT_INIT;

        // Each UTF-16 unit contributes its low byte, read as signed.
        for unit in body.encode_utf16() {
            right += i32::from(unit as u8 as i8);
            if right > FOLD {
                right -= FOLD;
            }
            left += right;
            if left > FOLD {
                left -= FOLD;
            }
        }

        encode_hex(CHECKSUM_LEN, i64::from((left << 8) + right))
    }
}

impl Default for BasicChecksum {
    fn default() -> Self {
        Self::with_separator('-')
    }
}

impl ChecksumEngine for BasicChecksum {
    fn compute_checksum(&self, body: &str) -> String {
        Self::checksum_of_normalized(&self.normalize(body))
    }

    fn verify_checksum(&self, key: &str) -> bool {
        let key = self.normalize(key);
        if key.chars().count() <= CHECKSUM_LEN {
            return false;
        }

        let split = key
            .char_indices()
            .rev()
            .nth(CHECKSUM_LEN - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let (body, claimed) = key.split_at(split);

        claimed == Self::checksum_of_normalized(body)
    }
}
