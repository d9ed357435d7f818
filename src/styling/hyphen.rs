//! Hyphenated key groups, counted from the end of the key.

use crate::styling::StylingEngine;

/// Default number of characters per group.
pub const DEFAULT_GROUP_LEN: usize = 5;

/// Groups key characters from the right, e.g. `AB-CDEFG-HIJKL`.
///
/// The leading group holds whatever remains (1 to `group_len` characters) and
/// never starts with a separator.
#[derive(Debug, Clone, Copy)]
pub struct HyphenStyling {
    group_len: usize,
    separator: char,
}

impl HyphenStyling {
    /// Styling with a custom group length. A zero length is treated as 1.
    pub fn with_group_len(group_len: usize) -> Self {
        Self {
            group_len: group_len.max(1),
            separator: '-',
        }
    }

    /// Use a different separator character.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The separator this styling inserts.
    pub fn separator_char(&self) -> char {
        self.separator
    }
}

impl Default for HyphenStyling {
    fn default() -> Self {
        Self::with_group_len(DEFAULT_GROUP_LEN)
    }
}

impl StylingEngine for HyphenStyling {
    fn add_styling(&self, key: &str) -> String {
        let plain: Vec<char> = self.remove_styling(key.trim()).to_uppercase().chars().collect();
        let lead = match plain.len() % self.group_len {
            0 => self.group_len,
            n => n,
        };

        let mut styled = String::with_capacity(plain.len() + plain.len() / self.group_len);
        for (idx, ch) in plain.iter().enumerate() {
            if idx >= lead && (idx - lead) % self.group_len == 0 {
                styled.push(self.separator);
            }
            styled.push(*ch);
        }
        styled
    }

    fn remove_styling(&self, key: &str) -> String {
        key.chars().filter(|c| *c != self.separator).collect()
    }
}
