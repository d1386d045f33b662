//! Masked multiplication: recombination, randomness use and scratch hygiene.

use std::cell::Cell;

use hqc_mask::hash::SeedExpander;
use hqc_mask::leakage::TimingTest;
use hqc_mask::math::sample;
use hqc_mask::params::{SEED_BYTES, WordArray};
use hqc_mask::{
    DenseVector, Error, Gf2x, Hqc128, Hqc192, Hqc256, HqcParams, Masks, Multiplier, SparseVector,
    safe_mul, safe_mul_with, vect_mul,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

/// `n = 251`, small enough to check by hand.
#[derive(Debug, Clone, Copy)]
struct Toy;

impl HqcParams for Toy {
    const NAME: &'static str = "toy-251";
    const N: usize = 251;
    const OMEGA: usize = 2;
    const OMEGA_R: usize = 4;
    const VEC_N_SIZE_64: usize = 4;
    const VEC_N_SIZE_BYTES: usize = 32;
    const RED_MASK: u64 = 0x07ff_ffff_ffff_ffff;
    const REJECTION_THRESHOLD: u32 = 16_777_091;

    type Vector = [u64; 4];
    type Wide = [u64; 9];
}

/// Toy set whose sampler rejects every candidate.
#[derive(Debug, Clone, Copy)]
struct Starved;

impl HqcParams for Starved {
    const NAME: &'static str = "starved-251";
    const N: usize = 251;
    const OMEGA: usize = 2;
    const OMEGA_R: usize = 4;
    const VEC_N_SIZE_64: usize = 4;
    const VEC_N_SIZE_BYTES: usize = 32;
    const RED_MASK: u64 = 0x07ff_ffff_ffff_ffff;
    const REJECTION_THRESHOLD: u32 = 0;

    type Vector = [u64; 4];
    type Wide = [u64; 9];
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn random_secret<P: HqcParams>(rng: &mut StdRng) -> SparseVector<P> {
    let mut seed = [0u8; SEED_BYTES];
    rng.fill_bytes(&mut seed);
    sample::fixed_weight_positions::<P>(&mut SeedExpander::new(&seed), P::OMEGA).unwrap()
}

fn random_dense<P: HqcParams>(rng: &mut StdRng) -> DenseVector<P> {
    let mut bytes = vec![0u8; P::VEC_N_SIZE_BYTES];
    rng.fill_bytes(&mut bytes);
    DenseVector::from_bytes(&bytes).unwrap()
}

/// Delegates to a [`StdRng`] and keeps a copy of every request.
struct RecordingRng {
    inner: StdRng,
    draws: Vec<Vec<u8>>,
}

impl RecordingRng {
    fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            draws: Vec::new(),
        }
    }
}

impl rand_core::RngCore for RecordingRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.inner.fill_bytes(dst);
        self.draws.push(dst.to_vec());
    }
}

impl rand_core::CryptoRng for RecordingRng {}

/// Returns the same byte forever.
struct ConstantRng(u8);

impl rand_core::RngCore for ConstantRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0);
    }
}

impl rand_core::CryptoRng for ConstantRng {}

/// [`Gf2x`] that asserts the product buffer is clear before every
/// convolution and counts the calls.
#[derive(Default)]
struct ZeroChecked {
    convolutions: Cell<usize>,
}

impl<P: HqcParams> Multiplier<P> for ZeroChecked {
    fn convolve(&self, wide: &mut P::Wide, offset: usize, support: &[u32], dense: &[u64]) {
        assert!(wide.as_ref().iter().all(|&w| w == 0), "stale product buffer");
        assert_eq!(wide.as_ref().len(), <P::Wide as WordArray>::LEN);
        self.convolutions.set(self.convolutions.get() + 1);
        Multiplier::<P>::convolve(&Gf2x, wide, offset, support, dense);
    }

    fn reduce(&self, out: &mut P::Vector, wide: &P::Wide) {
        Multiplier::<P>::reduce(&Gf2x, out, wide);
    }
}

fn check_recombination<P: HqcParams>() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let a1 = random_secret::<P>(&mut rng);
    let a2 = random_dense::<P>(&mut rng);
    let expected = vect_mul(&a1, &a2);
    for m in 1..=6 {
        let shares = safe_mul(&a1, &a2, Masks::new(m).unwrap(), &mut rng).unwrap();
        assert_eq!(shares.masks().get(), m);
        assert_eq!(shares.recombine(), expected, "{} masks={m}", P::NAME);
    }
}

fn check_mask_independence<P: HqcParams>() {
    let mut setup = StdRng::seed_from_u64(7);
    let a1 = random_secret::<P>(&mut setup);
    let a2 = random_dense::<P>(&mut setup);
    let masks = Masks::new(3).unwrap();

    let first = safe_mul(&a1, &a2, masks, &mut StdRng::seed_from_u64(100)).unwrap();
    let second = safe_mul(&a1, &a2, masks, &mut StdRng::seed_from_u64(200)).unwrap();
    assert_ne!(first[0], second[0]);
    assert_ne!(first[2], second[2]);
    assert_eq!(first.recombine(), second.recombine());
}

fn check_unmasked<P: HqcParams>() {
    let mut setup = StdRng::seed_from_u64(8);
    let a1 = random_secret::<P>(&mut setup);
    let a2 = random_dense::<P>(&mut setup);

    let mut rng = RecordingRng::new(1);
    let shares = safe_mul(&a1, &a2, Masks::UNMASKED, &mut rng).unwrap();
    assert!(rng.draws.is_empty());
    assert_eq!(shares[0], vect_mul(&a1, &a2));
}

fn check_scratch_cleared<P: HqcParams>() {
    let mut setup = StdRng::seed_from_u64(9);
    let a1 = random_secret::<P>(&mut setup);
    let a2 = random_dense::<P>(&mut setup);
    for m in 1..=4 {
        let multiplier = ZeroChecked::default();
        let shares = safe_mul_with(&multiplier, &a1, &a2, Masks::new(m).unwrap(), &mut setup)
            .unwrap();
        // one diagonal term per share, two cross terms per pair
        assert_eq!(multiplier.convolutions.get(), m * m);
        assert_eq!(shares.recombine(), vect_mul(&a1, &a2));
    }
}

macro_rules! check_for_param_set {
    ($($fn_name:ident),* $(,)?) => {
        $(
            mod $fn_name {
                #[test]
                fn hqc128() {
                    super::$fn_name::<super::Hqc128>();
                }

                #[test]
                fn hqc192() {
                    super::$fn_name::<super::Hqc192>();
                }

                #[test]
                fn hqc256() {
                    super::$fn_name::<super::Hqc256>();
                }

                #[test]
                fn toy() {
                    super::$fn_name::<super::Toy>();
                }
            }
        )*
    };
}

check_for_param_set!(
    check_recombination,
    check_mask_independence,
    check_unmasked,
    check_scratch_cleared,
);

#[test]
fn toy_two_shares_by_hand() {
    let a1 = SparseVector::<Toy>::from_positions(&[0, 2]).unwrap();
    let a2 = DenseVector::<Toy>::try_from_words(&[1, 1, 0, 0]).unwrap();
    // (1 + X^2)(1 + X^64) = 1 + X^2 + X^64 + X^66
    let expected: [u64; 4] = [0b101, 0b101, 0, 0];
    assert_eq!(vect_mul(&a1, &a2).words(), expected);

    for seed in 0..16 {
        let shares = safe_mul(&a1, &a2, Masks::new(2).unwrap(), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        assert_eq!((&shares[0] + &shares[1]).words(), expected, "seed {seed}");
    }
}

#[test]
fn toy_wraparound() {
    // X^250 * X^5 = X^255 = X^4
    let a1 = SparseVector::<Toy>::from_positions(&[250]).unwrap();
    let a2 = SparseVector::<Toy>::from_positions(&[5]).unwrap().to_dense();
    let shares = safe_mul(&a1, &a2, Masks::new(2).unwrap(), &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert_eq!(shares.recombine().words(), [1u64 << 4, 0, 0, 0]);
}

#[test]
fn three_shares_draw_three_distinct_seeds() {
    let mut setup = StdRng::seed_from_u64(11);
    let a1 = random_secret::<Hqc128>(&mut setup);
    let a2 = random_dense::<Hqc128>(&mut setup);

    let mut rng = RecordingRng::new(12);
    let shares = safe_mul(&a1, &a2, Masks::new(3).unwrap(), &mut rng).unwrap();
    assert_eq!(shares.recombine(), vect_mul(&a1, &a2));

    assert_eq!(rng.draws.len(), 3);
    assert!(rng.draws.iter().all(|d| d.len() == SEED_BYTES));
    assert_ne!(rng.draws[0], rng.draws[1]);
    assert_ne!(rng.draws[0], rng.draws[2]);
    assert_ne!(rng.draws[1], rng.draws[2]);
}

#[test]
fn pair_count_matches_seed_draws() {
    let mut setup = StdRng::seed_from_u64(13);
    let a1 = random_secret::<Toy>(&mut setup);
    let a2 = random_dense::<Toy>(&mut setup);
    for m in 1..=6 {
        let masks = Masks::new(m).unwrap();
        let mut rng = RecordingRng::new(m as u64);
        safe_mul(&a1, &a2, masks, &mut rng).unwrap();
        assert_eq!(rng.draws.len(), masks.pairs());
    }
}

#[test]
fn constant_rng_is_rejected() {
    init_logging();
    let mut setup = StdRng::seed_from_u64(14);
    let a1 = random_secret::<Hqc128>(&mut setup);
    let a2 = random_dense::<Hqc128>(&mut setup);

    let err = safe_mul(&a1, &a2, Masks::new(3).unwrap(), &mut ConstantRng(0xA5)).unwrap_err();
    assert_eq!(err, Error::CorrelatedMasks);
}

#[test]
fn zero_seed_is_rejected() {
    let mut setup = StdRng::seed_from_u64(15);
    let a1 = random_secret::<Toy>(&mut setup);
    let a2 = random_dense::<Toy>(&mut setup);

    let err = safe_mul(&a1, &a2, Masks::new(2).unwrap(), &mut ConstantRng(0)).unwrap_err();
    assert_eq!(err, Error::CorrelatedMasks);
}

#[test]
fn constant_rng_is_fine_without_masking() {
    let mut setup = StdRng::seed_from_u64(16);
    let a1 = random_secret::<Toy>(&mut setup);
    let a2 = random_dense::<Toy>(&mut setup);

    let shares = safe_mul(&a1, &a2, Masks::UNMASKED, &mut ConstantRng(0)).unwrap();
    assert_eq!(shares.recombine(), vect_mul(&a1, &a2));
}

#[test]
fn exhausted_sampler_aborts() {
    init_logging();
    let a1 = SparseVector::<Starved>::from_positions(&[1, 2]).unwrap();
    let a2 = DenseVector::<Starved>::try_from_words(&[1, 0, 0, 0]).unwrap();

    let mut rng = RecordingRng::new(17);
    let err = safe_mul(&a1, &a2, Masks::new(2).unwrap(), &mut rng).unwrap_err();
    assert_eq!(err, Error::RandomnessExhausted);
    // aborted on the first pair
    assert_eq!(rng.draws.len(), 1);

    // no pairs, no sampling
    let shares = safe_mul(&a1, &a2, Masks::UNMASKED, &mut rng).unwrap();
    assert_eq!(shares.recombine(), vect_mul(&a1, &a2));
}

#[test]
fn largest_share_count_runs() {
    let mut setup = StdRng::seed_from_u64(18);
    let a1 = random_secret::<Toy>(&mut setup);
    let a2 = random_dense::<Toy>(&mut setup);
    let masks = Masks::new(Masks::MAX).unwrap();

    let mut rng = RecordingRng::new(19);
    let shares = safe_mul(&a1, &a2, masks, &mut rng).unwrap();
    assert_eq!(rng.draws.len(), masks.pairs());
    assert_eq!(shares.recombine(), vect_mul(&a1, &a2));
    assert_eq!(Masks::new(Masks::MAX + 1), Err(Error::InvalidMasks));
}

#[test]
#[ignore = "wall-clock measurement, run with --release -- --ignored"]
fn fixed_vs_random_secret_timing() {
    init_logging();
    let mut setup = StdRng::seed_from_u64(20);
    let fixed = random_secret::<Hqc128>(&mut setup);
    let a2 = random_dense::<Hqc128>(&mut setup);
    let masks = Masks::new(3).unwrap();

    let mut test = TimingTest::new();
    for _ in 0..1_000 {
        let random = random_secret::<Hqc128>(&mut setup);
        test.measure_fixed(|| safe_mul(&fixed, &a2, masks, &mut setup))
            .unwrap();
        test.measure_random(|| safe_mul(&random, &a2, masks, &mut setup))
            .unwrap();
    }

    let t = test.t_statistic();
    eprintln!(
        "safe_mul hqc-128, 3 shares: fixed {:.0} ns, random {:.0} ns, t = {t:?}, passes = {}",
        test.fixed().mean(),
        test.random().mean(),
        test.passes()
    );
    assert!(t.is_some());
}
