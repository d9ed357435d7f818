//! Key layout configuration.

use crate::encoding::SectionSpec;
use crate::KeysmithError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Seed width used by [`GeneratorConfig::basic`].
pub const DEFAULT_SEED_CHAR_LENGTH: i32 = 8;

/// Seed width substituted for out-of-range configured widths.
pub const FALLBACK_SEED_CHAR_LENGTH: usize = 10;

/// Widest seed prefix; 16 digits would not round-trip through a signed seed.
pub const MAX_SEED_CHAR_LENGTH: usize = 15;

/// Configuration for a product key generator or verifier.
///
/// The issuing side must know every section. A client build ships a
/// [`partial`](Self::partial) copy with some sections absent: those bytes are
/// still present in keys but are not checked, so a cracked client only ever
/// reveals part of the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of hex characters of the seed at the front of the key.
    /// Values outside 1..=15 fall back to 10.
    pub seed_char_length: i32,

    /// Ordered section parameters; `None` marks an unchecked section.
    pub sections: Vec<Option<SectionSpec>>,
}

impl GeneratorConfig {
    /// Configuration with the given seed width and sections.
    pub fn new(seed_char_length: i32, sections: Vec<Option<SectionSpec>>) -> Self {
        Self {
            seed_char_length,
            sections,
        }
    }

    /// Configuration with the default 8-character seed and every section set.
    pub fn basic(sections: impl IntoIterator<Item = SectionSpec>) -> Self {
        Self::new(
            DEFAULT_SEED_CHAR_LENGTH,
            sections.into_iter().map(Some).collect(),
        )
    }

    /// The seed width actually used for keys.
    pub fn effective_seed_char_length(&self) -> usize {
        match usize::try_from(self.seed_char_length) {
            Ok(len) if (1..=MAX_SEED_CHAR_LENGTH).contains(&len) => len,
            _ => FALLBACK_SEED_CHAR_LENGTH,
        }
    }

    /// Unstyled key length: seed, two characters per section, checksum.
    pub fn key_len(&self) -> usize {
        self.effective_seed_char_length()
            + 2 * self.sections.len()
            + crate::encoding::checksum::CHECKSUM_LEN
    }

    /// Copy with the sections at `omit` made absent.
    ///
    /// Indices past the end are ignored.
    pub fn partial(&self, omit: &[usize]) -> Self {
        let sections = self
            .sections
            .iter()
            .enumerate()
            .map(|(idx, spec)| if omit.contains(&idx) { None } else { *spec })
            .collect();
        Self::new(self.seed_char_length, sections)
    }

    /// Whether every section has parameters (required for generation).
    pub fn is_complete(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(Option::is_some)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, KeysmithError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeysmithError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Deserialize a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, KeysmithError> {
        serde_json::from_str(json)
            .map_err(|e| KeysmithError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, KeysmithError> {
        let json = fs::read_to_string(path).map_err(|e| {
            KeysmithError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Write the configuration to a JSON file.
    pub fn to_file(&self, path: &Path) -> Result<(), KeysmithError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            KeysmithError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> GeneratorConfig {
        GeneratorConfig::basic([
            SectionSpec::new(24, 3, 101),
            SectionSpec::new(10, 4, 56),
            SectionSpec::new(1, 2, 91),
        ])
    }

    #[test]
    fn test_basic_uses_default_width() {
        let config = sample_config();
        assert_eq!(config.effective_seed_char_length(), 8);
        assert_eq!(config.key_len(), 8 + 6 + 4);
        assert!(config.is_complete());
    }

    #[test]
    fn test_width_out_of_range_falls_back() {
        for raw in [0, 16, -5, i32::MAX, i32::MIN] {
            let config = GeneratorConfig::new(raw, vec![]);
            assert_eq!(config.effective_seed_char_length(), 10, "width {}", raw);
        }
    }

    #[test]
    fn test_width_in_range_kept() {
        assert_eq!(GeneratorConfig::new(1, vec![]).effective_seed_char_length(), 1);
        assert_eq!(GeneratorConfig::new(15, vec![]).effective_seed_char_length(), 15);
    }

    #[test]
    fn test_partial_blanks_selected_sections() {
        let partial = sample_config().partial(&[1, 7]);
        assert_eq!(partial.sections.len(), 3);
        assert_eq!(partial.sections[0], Some(SectionSpec::new(24, 3, 101)));
        assert_eq!(partial.sections[1], None);
        assert_eq!(partial.sections[2], Some(SectionSpec::new(1, 2, 91)));
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_empty_config_is_incomplete() {
        assert!(!GeneratorConfig::new(8, vec![]).is_complete());
    }

    #[test]
    fn test_json_roundtrip_with_absent_sections() {
        let config = sample_config().partial(&[0]);
        let json = config.to_json().unwrap();
        assert!(json.contains("null"));
        assert_eq!(GeneratorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = GeneratorConfig::from_json(r#"{"seed_char_length": "eight"}"#);
        assert!(matches!(result, Err(KeysmithError::ConfigError(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keys.json");

        let config = sample_config();
        config.to_file(&path).unwrap();

        assert_eq!(GeneratorConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = GeneratorConfig::from_file(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(KeysmithError::ConfigError(_))));
    }
}
