//! Fixed-width uppercase hexadecimal encoding.

/// Encode `value` as uppercase hex, exactly `width` characters wide.
///
/// The value is treated as an unsigned 64-bit quantity, so negative inputs
/// render as their two's complement. Longer renderings keep only the trailing
/// `width` digits; shorter ones are zero-padded on the left.
pub fn encode_hex(width: usize, value: i64) -> String {
    let digits = format!("{:0width$X}", value as u64, width = width);
    digits[digits.len() - width..].to_string()
}

/// Parse a seed prefix as an unsigned hexadecimal value.
///
/// Accepts only `[0-9A-Fa-f]`; signs, whitespace and the empty string are
/// rejected. Returns `None` when the digits do not fit in 64 bits.
pub fn parse_seed_hex(seed_hex: &str) -> Option<u64> {
    if seed_hex.is_empty() || !seed_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(seed_hex, 16).ok()
}
