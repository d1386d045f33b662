//! Configuration parsing and its use with the gadget.

use hqc_mask::hash::ShakePrng;
use hqc_mask::{
    Error, Hqc128, Hqc192, Hqc256, Masks, MaskingConfig, SecurityLevel, SparseVector, safe_mul,
    vect_mul,
};

#[test]
fn parses_level_and_masks() {
    let config: MaskingConfig = serde_json::from_str(r#"{"level": "hqc-192", "masks": 4}"#).unwrap();
    assert_eq!(config.level, SecurityLevel::Hqc192);
    assert_eq!(config.masks.get(), 4);
    assert_eq!(config.masks.pairs(), 6);
}

#[test]
fn masks_default_to_unmasked() {
    let config: MaskingConfig = serde_json::from_str(r#"{"level": "hqc-256"}"#).unwrap();
    assert_eq!(config.masks, Masks::UNMASKED);
    assert!(!config.masks.is_masked());
}

#[test]
fn zero_masks_rejected() {
    let err = serde_json::from_str::<MaskingConfig>(r#"{"level": "hqc-128", "masks": 0}"#)
        .unwrap_err();
    assert!(err.to_string().contains("share count"), "{err}");
}

#[test]
fn oversized_masks_rejected() {
    let err = serde_json::from_str::<MaskingConfig>(r#"{"level": "hqc-128", "masks": 1048576}"#)
        .unwrap_err();
    assert!(err.to_string().contains("share count"), "{err}");

    let text = format!(r#"{{"level": "hqc-128", "masks": {}}}"#, Masks::MAX);
    let config: MaskingConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(config.masks.get(), Masks::MAX);
}

#[test]
fn unknown_level_rejected() {
    assert!(serde_json::from_str::<MaskingConfig>(r#"{"level": "hqc-512", "masks": 2}"#).is_err());
}

#[test]
fn serializes_back() {
    let config = MaskingConfig::new(SecurityLevel::Hqc128, Masks::new(3).unwrap());
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(text, r#"{"level":"hqc-128","masks":3}"#);
    let back: MaskingConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn level_must_match_params() {
    let config = MaskingConfig::new(SecurityLevel::Hqc192, Masks::new(2).unwrap());
    assert_eq!(config.masks_for::<Hqc192>().unwrap().get(), 2);
    assert_eq!(
        config.masks_for::<Hqc256>().unwrap_err(),
        Error::ParameterMismatch {
            expected: "hqc-256",
            actual: "hqc-192",
        }
    );
}

#[test]
fn level_of_builtin_sets() {
    assert_eq!(SecurityLevel::of::<Hqc128>(), Some(SecurityLevel::Hqc128));
    assert_eq!(SecurityLevel::of::<Hqc256>(), Some(SecurityLevel::Hqc256));
    assert_eq!(SecurityLevel::Hqc192.to_string(), "hqc-192");
}

#[test]
fn configured_gadget_with_shake_prng() {
    let config: MaskingConfig = serde_json::from_str(r#"{"level": "hqc-128", "masks": 3}"#).unwrap();
    let masks = config.masks_for::<Hqc128>().unwrap();

    let mut rng = ShakePrng::new(&[0x42; 48], b"config-test");
    let a1 = SparseVector::<Hqc128>::from_positions(&[1, 700, 9_000, 17_668]).unwrap();
    let a2 = hqc_mask::math::sample::uniform::<Hqc128>(&mut hqc_mask::hash::SeedExpander::new(
        &[7u8; 40],
    ));
    let shares = safe_mul(&a1, &a2, masks, &mut rng).unwrap();
    assert_eq!(shares.recombine(), vect_mul(&a1, &a2));
}
