//! # Keysmith
//!
//! **Seed-derived product keys with partial client-side verification.**
//!
//! A key encodes a numeric seed, a run of section bytes derived from that seed,
//! and a checksum trailer. The issuing side knows the parameters of every
//! section. Client builds ship with some sections blanked out: they still
//! accept every genuine key, but a keygen reverse-engineered from one build
//! only produces keys for that build.
//!
//! ## Features
//!
//! - **Deterministic layout** — `<seed hex><section bytes><checksum>`, styled for display
//! - **Partial verification** — absent sections are skipped, not rejected
//! - **Checksum trailer** — typo'd keys are classified before any section work
//! - **Pluggable policy** — blacklist and issued-seed checks behind traits
//! - **Lazy collaborators** — built on first use, once per generator, thread-safe
//!
//! ## Quickstart
//!
//! ```
//! use keysmith::{GeneratorConfig, KeyState, ProductKeyGenerator, SectionSpec};
//!
//! fn main() -> Result<(), keysmith::KeysmithError> {
//!     let config = GeneratorConfig::basic([
//!         SectionSpec::new(24, 3, 101),
//!         SectionSpec::new(10, 4, 56),
//!         SectionSpec::new(1, 2, 91),
//!     ]);
//!
//!     // Issuing side: every section known.
//!     let issuer = ProductKeyGenerator::basic(config.clone());
//!     let key = issuer.generate(0x1234_5678)?;
//!
//!     // Client side: the middle section is never shipped.
//!     let client = ProductKeyGenerator::basic(config.partial(&[1]));
//!     assert_eq!(client.verify(&key)?, KeyState::Good);
//!     Ok(())
//! }
//! ```
//!
//! ## Threat Model
//!
//! The section derivation and checksum are obfuscation, not cryptography.
//! Keysmith raises the cost of writing a keygen from a single client build;
//! it does not stop binary patching or a determined attacker with several
//! builds.

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod state;

// Key material
pub mod codec;
pub mod encoding;
pub mod styling;

// Admission policy
pub mod policy;

mod collaborator;

// Generator (main public API)
pub mod generator;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::GeneratorConfig;
pub use encoding::checksum::BasicChecksum;
pub use encoding::section::BasicSectionEncoder;
pub use encoding::{ChecksumEngine, SectionEncoder, SectionSpec};
pub use errors::{CollaboratorError, KeysmithError};
pub use generator::{GeneratorBuilder, ProductKeyGenerator};
pub use policy::blacklist::HashedBlacklist;
pub use policy::registry::MemorySeedRegistry;
pub use policy::{BlacklistChecker, SeedAvailabilityChecker};
pub use state::KeyState;
pub use styling::hyphen::HyphenStyling;
pub use styling::StylingEngine;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
