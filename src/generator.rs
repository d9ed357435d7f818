//! Product key generator - the main public API for Keysmith.
//!
//! A key is laid out as:
//!
//! ```text
//! <seed hex> <section byte hex>* <checksum>
//! ```
//!
//! then styled for display. Generation needs every section's parameters;
//! verification checks only the sections it knows and accepts the rest.

use crate::codec::hex::{encode_hex, parse_seed_hex};
use crate::collaborator::Collaborator;
use crate::config::GeneratorConfig;
use crate::encoding::checksum::BasicChecksum;
use crate::encoding::section::BasicSectionEncoder;
use crate::encoding::{ChecksumEngine, SectionEncoder, SectionSpec};
use crate::policy::{BlacklistChecker, SeedAvailabilityChecker};
use crate::state::KeyState;
use crate::styling::hyphen::HyphenStyling;
use crate::styling::StylingEngine;
use crate::KeysmithError;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Generates and verifies product keys for one key layout.
///
/// Collaborators left unconfigured disable their layer: no checksum trailer,
/// no styling, no blacklist or availability checks. A generator is `Sync`
/// and can be shared between threads.
pub struct ProductKeyGenerator {
    seed_char_length: usize,
    sections: Vec<Option<SectionSpec>>,
    section_encoder: Collaborator<dyn SectionEncoder>,
    checksum: Collaborator<dyn ChecksumEngine>,
    blacklist: Collaborator<dyn BlacklistChecker>,
    availability: Collaborator<dyn SeedAvailabilityChecker>,
    styling: Collaborator<dyn StylingEngine>,
}

impl ProductKeyGenerator {
    /// Start building a generator for the given layout.
    pub fn builder(config: GeneratorConfig) -> GeneratorBuilder {
        GeneratorBuilder::new(config)
    }

    /// Generator with the default section encoder, checksum, and hyphen
    /// styling, and no blacklist or availability checks.
    pub fn basic(config: GeneratorConfig) -> Self {
        Self::builder(config)
            .section_encoder(BasicSectionEncoder)
            .checksum_engine(BasicChecksum::default())
            .styling_engine(HyphenStyling::default())
            .build()
    }

    /// Number of seed hex characters at the front of each key.
    pub fn seed_char_length(&self) -> usize {
        self.seed_char_length
    }

    /// The configured section parameters, in key order.
    pub fn sections(&self) -> &[Option<SectionSpec>] {
        &self.sections
    }

    /// Generate the key for `seed`.
    ///
    /// Only the low `seed_char_length * 4` bits of the seed are used.
    ///
    /// # Errors
    /// - `InvalidSeed` - Seed did not survive its hexadecimal round trip
    /// - `EncodingDataNotComplete` - No sections, or a section without parameters
    /// - `EncoderNotDefined` - No section encoder configured
    /// - `SeedBlacklisted` - Blacklist rejected the seed
    /// - `SeedAlreadyTaken` - Seed has already been issued
    /// - `CollaboratorUnavailable` - Blacklist or availability backend failed
    pub fn generate(&self, seed: i64) -> Result<String, KeysmithError> {
        // Normalize the seed to the bits that fit in the key prefix.
        let seed_hex = encode_hex(self.seed_char_length, seed);
        let seed = parse_seed_hex(&seed_hex)
            .and_then(|seed| i64::try_from(seed).ok())
            .ok_or(KeysmithError::InvalidSeed)?;

        if self.sections.is_empty() {
            debug!("generation refused: no key sections configured");
            return Err(KeysmithError::EncodingDataNotComplete);
        }

        let Some(encoder) = self.section_encoder.get() else {
            debug!("generation refused: no section encoder configured");
            return Err(KeysmithError::EncoderNotDefined);
        };

        if let Some(blacklist) = self.blacklist.get() {
            let blacklisted = blacklist
                .is_seed_blacklisted(&seed_hex)
                .map_err(|e| e.into_keysmith("blacklist"))?;
            if blacklisted {
                debug!(seed_hex = %seed_hex, "generation refused: seed blacklisted");
                return Err(KeysmithError::SeedBlacklisted { seed_hex });
            }
        }

        if let Some(availability) = self.availability.get() {
            let available = availability
                .is_seed_available(&seed_hex)
                .map_err(|e| e.into_keysmith("seed availability"))?;
            if !available {
                debug!(seed_hex = %seed_hex, "generation refused: seed already taken");
                return Err(KeysmithError::SeedAlreadyTaken { seed_hex });
            }
        }

        let mut key = String::with_capacity(seed_hex.len() + 2 * self.sections.len() + 4);
        key.push_str(&seed_hex);

        for (idx, spec) in self.sections.iter().enumerate() {
            let Some(spec) = spec else {
                debug!(section = idx, "generation refused: section has no parameters");
                return Err(KeysmithError::EncodingDataNotComplete);
            };
            key.push_str(&encode_hex(2, i64::from(encoder.derive(seed, spec))));
        }

        if let Some(checksum) = self.checksum.get() {
            let trailer = checksum.compute_checksum(&key);
            key.push_str(&trailer);
        }

        match self.styling.get() {
            Some(styling) => Ok(styling.add_styling(&key)),
            None => Ok(key),
        }
    }

    /// Generate a key for a freshly sampled seed, resampling when the seed is
    /// blacklisted or taken.
    ///
    /// At least one attempt is always made. Any other error ends the loop
    /// immediately; when every attempt is rejected the last rejection is
    /// returned.
    ///
    /// Availability is only checked here, never claimed. When several issuers
    /// share a registry, claim the seed with [`MemorySeedRegistry::record`]
    /// after generating and draw again if it returns `false`; another issuer
    /// took the seed between the check and the claim.
    ///
    /// [`MemorySeedRegistry::record`]: crate::policy::registry::MemorySeedRegistry::record
    pub fn generate_random<R: Rng>(
        &self,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<String, KeysmithError> {
        let mut remaining = max_attempts.max(1);
        loop {
            remaining -= 1;
            match self.generate(rng.gen::<i64>()) {
                Err(err) if err.is_seed_rejection() && remaining > 0 => {
                    debug!(error = %err, remaining, "resampling seed");
                }
                result => return result,
            }
        }
    }

    /// Classify a key.
    ///
    /// Malformed input never errors; it is reported as [`KeyState::Phony`].
    ///
    /// # Errors
    /// - `CollaboratorUnavailable` - Blacklist backend failed
    pub fn verify(&self, key: &str) -> Result<KeyState, KeysmithError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(KeyState::Phony);
        }

        let cleaned = self.clean(key);

        if let Some(checksum) = self.checksum.get() {
            if !checksum.verify_checksum(&cleaned) {
                debug!("key rejected: checksum mismatch");
                return Ok(KeyState::Invalid);
            }
        }

        if let Some(blacklist) = self.blacklist.get() {
            let blacklisted = blacklist
                .is_key_blacklisted(&cleaned)
                .map_err(|e| e.into_keysmith("blacklist"))?;
            if blacklisted {
                debug!("key rejected: blacklisted");
                return Ok(KeyState::Blacklisted);
            }
        }

        if self.sections.is_empty() {
            debug!("key unverifiable: no key sections configured");
            return Ok(KeyState::Phony);
        }

        let Some(encoder) = self.section_encoder.get() else {
            debug!("key unverifiable: no section encoder configured");
            return Ok(KeyState::Phony);
        };

        let Some(seed) = self.extract_seed(&cleaned) else {
            debug!(
                seed_char_length = self.seed_char_length,
                "key rejected: seed prefix is not hexadecimal"
            );
            return Ok(KeyState::Phony);
        };

        let mut cursor = self.seed_char_length;
        for (idx, spec) in self.sections.iter().enumerate() {
            if let Some(spec) = spec {
                let expected = encode_hex(2, i64::from(encoder.derive(seed, spec)));
                match cleaned.get(cursor..cursor + 2) {
                    Some(actual) if actual.eq_ignore_ascii_case(&expected) => {}
                    _ => {
                        debug!(section = idx, "key rejected: section mismatch");
                        return Ok(KeyState::Phony);
                    }
                }
            }
            cursor += 2;
        }

        Ok(KeyState::Good)
    }

    /// [`verify`](Self::verify) for a key that may be missing entirely.
    pub fn verify_optional(&self, key: Option<&str>) -> Result<KeyState, KeysmithError> {
        match key {
            Some(key) => self.verify(key),
            None => Ok(KeyState::Phony),
        }
    }

    /// The seed prefix of a key, unstyled and uppercase.
    ///
    /// Returns `None` if the key is too short or the prefix is not hex.
    pub fn seed_hex_of(&self, key: &str) -> Option<String> {
        let cleaned = self.clean(key.trim());
        let prefix = cleaned.get(..self.seed_char_length)?;
        parse_seed_hex(prefix)?;
        Some(prefix.to_string())
    }

    fn clean(&self, key: &str) -> String {
        match self.styling.get() {
            Some(styling) => styling.remove_styling(key).to_uppercase(),
            None => key.to_uppercase(),
        }
    }

    fn extract_seed(&self, cleaned: &str) -> Option<i64> {
        let seed = parse_seed_hex(cleaned.get(..self.seed_char_length)?)?;
        i64::try_from(seed).ok()
    }
}

impl fmt::Debug for ProductKeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductKeyGenerator")
            .field("seed_char_length", &self.seed_char_length)
            .field("sections", &self.sections)
            .field("section_encoder", &self.section_encoder.is_configured())
            .field("checksum", &self.checksum.is_configured())
            .field("blacklist", &self.blacklist.is_configured())
            .field("availability", &self.availability.is_configured())
            .field("styling", &self.styling.is_configured())
            .finish()
    }
}

/// Builder wiring collaborators into a [`ProductKeyGenerator`].
///
/// Each collaborator is either given ready-made or as a factory that runs on
/// first use and is then cached for the generator's lifetime.
pub struct GeneratorBuilder {
    config: GeneratorConfig,
    section_encoder: Collaborator<dyn SectionEncoder>,
    checksum: Collaborator<dyn ChecksumEngine>,
    blacklist: Collaborator<dyn BlacklistChecker>,
    availability: Collaborator<dyn SeedAvailabilityChecker>,
    styling: Collaborator<dyn StylingEngine>,
}

impl GeneratorBuilder {
    fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            section_encoder: Collaborator::absent(),
            checksum: Collaborator::absent(),
            blacklist: Collaborator::absent(),
            availability: Collaborator::absent(),
            styling: Collaborator::absent(),
        }
    }

    /// Use `encoder` to derive section bytes.
    pub fn section_encoder(mut self, encoder: impl SectionEncoder + 'static) -> Self {
        self.section_encoder = Collaborator::ready(Arc::new(encoder) as Arc<dyn SectionEncoder>);
        self
    }

    /// Build the section encoder on first use.
    pub fn lazy_section_encoder<F, E>(mut self, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: SectionEncoder + 'static,
    {
        self.section_encoder = Collaborator::lazy(Box::new(move || {
            Arc::new(factory()) as Arc<dyn SectionEncoder>
        }));
        self
    }

    /// Append and check a checksum trailer with `engine`.
    pub fn checksum_engine(mut self, engine: impl ChecksumEngine + 'static) -> Self {
        self.checksum = Collaborator::ready(Arc::new(engine) as Arc<dyn ChecksumEngine>);
        self
    }

    /// Build the checksum engine on first use.
    pub fn lazy_checksum_engine<F, E>(mut self, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: ChecksumEngine + 'static,
    {
        self.checksum = Collaborator::lazy(Box::new(move || {
            Arc::new(factory()) as Arc<dyn ChecksumEngine>
        }));
        self
    }

    /// Reject blacklisted seeds and keys with `checker`.
    pub fn blacklist_checker(mut self, checker: impl BlacklistChecker + 'static) -> Self {
        self.blacklist = Collaborator::ready(Arc::new(checker) as Arc<dyn BlacklistChecker>);
        self
    }

    /// Build the blacklist checker on first use.
    pub fn lazy_blacklist_checker<F, C>(mut self, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: BlacklistChecker + 'static,
    {
        self.blacklist = Collaborator::lazy(Box::new(move || {
            Arc::new(factory()) as Arc<dyn BlacklistChecker>
        }));
        self
    }

    /// Refuse seeds that `checker` reports as taken.
    pub fn availability_checker(mut self, checker: impl SeedAvailabilityChecker + 'static) -> Self {
        self.availability =
            Collaborator::ready(Arc::new(checker) as Arc<dyn SeedAvailabilityChecker>);
        self
    }

    /// Build the availability checker on first use.
    pub fn lazy_availability_checker<F, C>(mut self, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: SeedAvailabilityChecker + 'static,
    {
        self.availability = Collaborator::lazy(Box::new(move || {
            Arc::new(factory()) as Arc<dyn SeedAvailabilityChecker>
        }));
        self
    }

    /// Format generated keys and clean verified keys with `engine`.
    pub fn styling_engine(mut self, engine: impl StylingEngine + 'static) -> Self {
        self.styling = Collaborator::ready(Arc::new(engine) as Arc<dyn StylingEngine>);
        self
    }

    /// Build the styling engine on first use.
    pub fn lazy_styling_engine<F, E>(mut self, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: StylingEngine + 'static,
    {
        self.styling = Collaborator::lazy(Box::new(move || {
            Arc::new(factory()) as Arc<dyn StylingEngine>
        }));
        self
    }

    /// Finish the generator.
    pub fn build(self) -> ProductKeyGenerator {
        ProductKeyGenerator {
            seed_char_length: self.config.effective_seed_char_length(),
            sections: self.config.sections,
            section_encoder: self.section_encoder,
            checksum: self.checksum,
            blacklist: self.blacklist,
            availability: self.availability,
            styling: self.styling,
        }
    }
}
