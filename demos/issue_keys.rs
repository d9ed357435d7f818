//! Key issuing example.
//!
//! Issues a batch of keys from random seeds, records each seed so it is never
//! issued twice, then checks the batch with a client-side verifier that only
//! knows half of the sections.
//!
//! # Running
//!
//! ```bash
//! cargo run --example issue_keys
//! ```

use keysmith::{
    BasicChecksum, BasicSectionEncoder, GeneratorConfig, HyphenStyling, KeyState,
    MemorySeedRegistry, ProductKeyGenerator, SectionSpec,
};
use std::sync::Arc;

const KEYS_TO_ISSUE: usize = 25;
const MAX_ATTEMPTS: usize = 10;

fn main() {
    // The full layout stays on the issuing server.
    let config = GeneratorConfig::basic([
        SectionSpec::new(24, 3, 101),
        SectionSpec::new(10, 4, 56),
        SectionSpec::new(1, 2, 91),
        SectionSpec::new(7, 1, 100),
        SectionSpec::new(2, 36, 45),
        SectionSpec::new(13, 5, 54),
        SectionSpec::new(21, 67, 25),
        SectionSpec::new(3, 76, 12),
        SectionSpec::new(31, 22, 34),
        SectionSpec::new(15, 72, 65),
    ]);

    let registry = Arc::new(MemorySeedRegistry::new());
    let issuer = ProductKeyGenerator::builder(config.clone())
        .section_encoder(BasicSectionEncoder)
        .checksum_engine(BasicChecksum::default())
        .styling_engine(HyphenStyling::default())
        .availability_checker(Arc::clone(&registry))
        .build();

    println!("**** ISSUING KEYS ****");

    let mut rng = rand::thread_rng();
    let mut issued = Vec::with_capacity(KEYS_TO_ISSUE);

    for n in 1..=KEYS_TO_ISSUE {
        // The availability check inside generation does not reserve the seed;
        // `record` is the atomic claim, so a lost race just draws again.
        let key = loop {
            let key = match issuer.generate_random(&mut rng, MAX_ATTEMPTS) {
                Ok(key) => key,
                Err(e) => {
                    eprintln!("Failed to issue key: {}", e);
                    std::process::exit(1);
                }
            };
            let Some(seed_hex) = issuer.seed_hex_of(&key) else {
                break key;
            };
            match registry.record(&seed_hex) {
                Ok(true) => break key,
                Ok(false) => println!("Seed {} claimed elsewhere, drawing again", seed_hex),
                Err(e) => {
                    eprintln!("Failed to record seed {}: {}", seed_hex, e);
                    std::process::exit(1);
                }
            }
        };

        match issuer.verify(&key) {
            Ok(KeyState::Good) => println!("{:>2}) Product Key (GOOD): {}", n, key),
            Ok(state) => println!("{:>2}) Product Key (BAD): {}  Key State: {}", n, key, state),
            Err(e) => println!("{:>2}) Product Key {}: verification failed: {}", n, key, e),
        }
        issued.push(key);
    }

    println!();
    println!("**** VERIFYING WITH CLIENT BUILD ****");

    // A client build ships without sections 1, 4, 5, 7 and 9.
    let client = ProductKeyGenerator::basic(config.partial(&[1, 4, 5, 7, 9]));

    for (n, key) in issued.iter().enumerate() {
        match client.verify(key) {
            Ok(state) => println!("{:>2}) {}  Key State: {}", n + 1, key, state),
            Err(e) => println!("{:>2}) {}  verification failed: {}", n + 1, key, e),
        }
    }

    println!();
    println!("Issued {} unique seeds", registry.len());
}
