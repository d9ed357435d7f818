//! End-to-end generation and verification against the reference layout.

use keysmith::{
    BasicChecksum, ChecksumEngine, GeneratorConfig, HashedBlacklist, HyphenStyling, KeyState,
    MemorySeedRegistry, ProductKeyGenerator, SectionSpec, StylingEngine,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const HEX: &[u8] = b"0123456789ABCDEF";

/// Sections left out of client builds.
const CLIENT_OMITS: &[usize] = &[1, 4, 5, 7, 9];

fn reference_config() -> GeneratorConfig {
    GeneratorConfig::basic([
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
    ])
}

fn unstyle(key: &str) -> String {
    HyphenStyling::default().remove_styling(key)
}

/// Replace the section at `idx` with a different byte and fix up the checksum.
fn tamper_section(key: &str, idx: usize) -> String {
    let plain = unstyle(key);
    let body = &plain[..plain.len() - 4];
    let start = 8 + 2 * idx;
    let replacement = if &body[start..start + 2] == "00" { "01" } else { "00" };
    let forged = format!("{}{}{}", &body[..start], replacement, &body[start + 2..]);
    let trailer = BasicChecksum::default().compute_checksum(&forged);
    HyphenStyling::default().add_styling(&format!("{}{}", forged, trailer))
}

#[test]
fn sampled_seeds_round_trip() {
    let generator = ProductKeyGenerator::basic(reference_config());
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for _ in 0..1000 {
        let seed: i64 = rng.gen();
        let key = generator.generate(seed).unwrap();
        assert_eq!(unstyle(&key).len(), 8 + 20 + 4, "key {}", key);
        assert_eq!(generator.verify(&key).unwrap(), KeyState::Good, "key {}", key);
    }
}

#[test]
fn boundary_seeds_round_trip() {
    let generator = ProductKeyGenerator::basic(reference_config());
    for seed in [0, 1, -1, i64::MAX, i64::MIN, 0xFFFF_FFFF, 0x1_0000_0000] {
        let key = generator.generate(seed).unwrap();
        assert_eq!(generator.verify(&key).unwrap(), KeyState::Good, "seed {}", seed);
    }
}

#[test]
fn widest_seed_round_trips() {
    let generator = ProductKeyGenerator::basic(GeneratorConfig::new(
        15,
        reference_config().sections,
    ));
    let mut rng = StdRng::seed_from_u64(15);
    for _ in 0..200 {
        let key = generator.generate(rng.gen()).unwrap();
        assert_eq!(unstyle(&key).len(), 15 + 20 + 4);
        assert_eq!(generator.verify(&key).unwrap(), KeyState::Good);
    }
}

#[test]
fn partial_verifier_accepts_genuine_keys() {
    let issuer = ProductKeyGenerator::basic(reference_config());
    let client = ProductKeyGenerator::basic(reference_config().partial(CLIENT_OMITS));
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..250 {
        let key = issuer.generate(rng.gen()).unwrap();
        assert_eq!(client.verify(&key).unwrap(), KeyState::Good, "key {}", key);
    }
}

#[test]
fn partial_verifier_is_strictly_weaker() {
    let issuer = ProductKeyGenerator::basic(reference_config());
    let client = ProductKeyGenerator::basic(reference_config().partial(CLIENT_OMITS));
    let key = issuer.generate(0x0BAD_CAFE).unwrap();

    // Forging an omitted section fools the client but not the issuer.
    let forged = tamper_section(&key, 4);
    assert_eq!(client.verify(&forged).unwrap(), KeyState::Good);
    assert_eq!(issuer.verify(&forged).unwrap(), KeyState::Phony);

    // Forging a shipped section fools neither.
    let forged = tamper_section(&key, 2);
    assert_eq!(client.verify(&forged).unwrap(), KeyState::Phony);
    assert_eq!(issuer.verify(&forged).unwrap(), KeyState::Phony);
}

#[test]
fn client_config_survives_json() {
    let issuer = ProductKeyGenerator::basic(reference_config());
    let json = reference_config().partial(CLIENT_OMITS).to_json().unwrap();

    let client = ProductKeyGenerator::basic(GeneratorConfig::from_json(&json).unwrap());
    let key = issuer.generate(77).unwrap();
    assert_eq!(client.verify(&key).unwrap(), KeyState::Good);
    assert!(client.generate(77).is_err());
}

#[test]
fn styling_removal_is_lossless() {
    let styling = HyphenStyling::default();
    let generator = ProductKeyGenerator::builder(reference_config())
        .section_encoder(keysmith::BasicSectionEncoder)
        .checksum_engine(BasicChecksum::default())
        .build();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..200 {
        let plain = generator.generate(rng.gen()).unwrap();
        let styled = styling.add_styling(&plain);
        assert_eq!(styling.remove_styling(&styled), styling.remove_styling(&plain));
        assert_eq!(styling.remove_styling(&styled), plain);
    }
}

#[test]
fn checksum_detects_single_character_changes() {
    let checksum = BasicChecksum::default();
    let mut rng = StdRng::seed_from_u64(0xC0DE);

    for _ in 0..1000 {
        let mut body: Vec<u8> = (0..28).map(|_| HEX[rng.gen_range(0..16)]).collect();
        let original = checksum.compute_checksum(std::str::from_utf8(&body).unwrap());

        let pos = rng.gen_range(0..body.len());
        let digit = HEX.iter().position(|b| *b == body[pos]).unwrap();
        body[pos] = HEX[(digit + rng.gen_range(1..16)) % 16];

        let mutated = checksum.compute_checksum(std::str::from_utf8(&body).unwrap());
        assert_ne!(original, mutated);
    }
}

#[test]
fn corrupted_checksum_is_invalid() {
    let generator = ProductKeyGenerator::basic(reference_config());
    let key = generator.generate(0x00C0_FFEE).unwrap();
    let plain = unstyle(&key);
    let (body, trailer) = plain.split_at(plain.len() - 4);

    for corrupt in ["0000", "FFFF", "1234", "ABCD"] {
        if corrupt == trailer {
            continue;
        }
        let broken = format!("{}{}", body, corrupt);
        assert_eq!(generator.verify(&broken).unwrap(), KeyState::Invalid);
    }
}

#[test]
fn blacklisted_key_is_never_good() {
    let issuer = ProductKeyGenerator::basic(reference_config());
    let key = issuer.generate(0xDEAD).unwrap();
    let forged = tamper_section(&key, 0);

    let mut blacklist = HashedBlacklist::new();
    blacklist.add_key(&key);
    blacklist.add_key(&forged);

    let verifier = ProductKeyGenerator::builder(reference_config())
        .section_encoder(keysmith::BasicSectionEncoder)
        .checksum_engine(BasicChecksum::default())
        .styling_engine(HyphenStyling::default())
        .blacklist_checker(blacklist)
        .build();

    assert_eq!(verifier.verify(&key).unwrap(), KeyState::Blacklisted);
    assert_eq!(verifier.verify(&forged).unwrap(), KeyState::Blacklisted);
    assert_eq!(
        verifier.verify(&issuer.generate(0xBEEF).unwrap()).unwrap(),
        KeyState::Good
    );
}

#[test]
fn blacklisted_key_with_custom_separator_is_never_good() {
    let spaced = || {
        ProductKeyGenerator::builder(reference_config())
            .section_encoder(keysmith::BasicSectionEncoder)
            .checksum_engine(BasicChecksum::with_separator(' '))
            .styling_engine(HyphenStyling::default().separator(' '))
    };
    let issuer = spaced().build();
    let key = issuer.generate(0xDEAD).unwrap();
    assert!(key.contains(' '));

    let mut blacklist = HashedBlacklist::new();
    blacklist.add_key(&key);
    let verifier = spaced().blacklist_checker(blacklist).build();

    assert_eq!(issuer.verify(&key).unwrap(), KeyState::Good);
    assert_eq!(verifier.verify(&key).unwrap(), KeyState::Blacklisted);
}

#[test]
fn blank_input_is_phony() {
    let generator = ProductKeyGenerator::basic(reference_config());
    assert_eq!(generator.verify("").unwrap(), KeyState::Phony);
    assert_eq!(generator.verify("   ").unwrap(), KeyState::Phony);
    assert_eq!(generator.verify_optional(None).unwrap(), KeyState::Phony);
}

#[test]
fn out_of_range_seed_width_falls_back() {
    for width in [0, 16, -5] {
        let generator =
            ProductKeyGenerator::basic(GeneratorConfig::new(width, reference_config().sections));
        assert_eq!(generator.seed_char_length(), 10);

        let key = generator.generate(0x12_3456_7890).unwrap();
        assert_eq!(unstyle(&key).len(), 10 + 20 + 4);
        assert!(unstyle(&key).starts_with("1234567890"));
        assert_eq!(generator.verify(&key).unwrap(), KeyState::Good);
    }
}

#[test]
fn registry_prevents_reissuing_seeds() {
    let registry = Arc::new(MemorySeedRegistry::new());
    let generator = ProductKeyGenerator::builder(reference_config())
        .section_encoder(keysmith::BasicSectionEncoder)
        .checksum_engine(BasicChecksum::default())
        .styling_engine(HyphenStyling::default())
        .availability_checker(Arc::clone(&registry))
        .build();

    let key = generator.generate(0xABCDEF).unwrap();
    let seed_hex = generator.seed_hex_of(&key).unwrap();
    assert_eq!(seed_hex, "00ABCDEF");
    assert!(registry.record(&seed_hex).unwrap());

    assert!(matches!(
        generator.generate(0xABCDEF),
        Err(keysmith::KeysmithError::SeedAlreadyTaken { .. })
    ));
    assert_eq!(generator.verify(&key).unwrap(), KeyState::Good);
}

#[test]
fn concurrent_issuers_never_share_a_seed() {
    let registry = Arc::new(MemorySeedRegistry::new());
    let issuer = ProductKeyGenerator::builder(reference_config())
        .section_encoder(keysmith::BasicSectionEncoder)
        .checksum_engine(BasicChecksum::default())
        .styling_engine(HyphenStyling::default())
        .availability_checker(Arc::clone(&registry))
        .build();

    // Narrow seed space so issuers collide often.
    let seeds: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let (issuer, registry) = (&issuer, &registry);
                scope.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(worker % 2);
                    let mut claimed = Vec::new();
                    while claimed.len() < 25 {
                        let key = issuer.generate(rng.gen_range(0..128)).unwrap_or_default();
                        let Some(seed_hex) = issuer.seed_hex_of(&key) else {
                            continue;
                        };
                        if registry.record(&seed_hex).unwrap() {
                            claimed.push(seed_hex);
                        }
                    }
                    claimed
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: std::collections::HashSet<_> = seeds.iter().collect();
    assert_eq!(seeds.len(), 100);
    assert_eq!(unique.len(), 100);
    assert_eq!(registry.len(), 100);
}

#[test]
fn shared_generator_verifies_across_threads() {
    let generator = ProductKeyGenerator::builder(reference_config())
        .lazy_section_encoder(|| keysmith::BasicSectionEncoder)
        .lazy_checksum_engine(BasicChecksum::default)
        .lazy_styling_engine(HyphenStyling::default)
        .build();

    std::thread::scope(|scope| {
        for worker in 0..4u64 {
            let generator = &generator;
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(worker);
                for _ in 0..100 {
                    let key = generator.generate(rng.gen()).unwrap();
                    assert_eq!(generator.verify(&key).unwrap(), KeyState::Good);
                }
            });
        }
    });
}
