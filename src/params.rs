//! HQC parameter definitions. `HqcParams` trait and marker types Hqc128,
//! Hqc192, Hqc256.

use zeroize::Zeroize;

/// Size in bytes of a per-pair mask seed (and of the PRNG entropy input
/// minus personalization).
pub const SEED_BYTES: usize = 40;

/// Fixed-size word buffer usable as a vector or double-width scratch store.
pub trait WordArray:
    AsRef<[u64]> + AsMut<[u64]> + Clone + core::fmt::Debug + Zeroize + Send + Sync + 'static {
    /// Array length in 64-bit words.
    const LEN: usize;

    /// Return a zero-filled instance.
    fn zeroed() -> Self;
}

impl<const SIZE: usize> WordArray for [u64; SIZE] {
    const LEN: usize = SIZE;

    #[inline]
    fn zeroed() -> Self {
        [0u64; SIZE]
    }
}

/// Parameter set of the ring `GF(2)[X]/(X^N - 1)` implemented by Hqc128,
/// Hqc192, Hqc256.
///
/// `N` must not be a multiple of 64: reduction splits the high half at bit
/// `N mod 64`.
pub trait HqcParams: 'static {
    /// Human-readable name, used in log spans.
    const NAME: &'static str;
    /// Ring degree in bits.
    const N: usize;
    /// Hamming weight of the secret sparse vector.
    const OMEGA: usize;
    /// Hamming weight of ephemeral vectors; upper bound for any sampled weight.
    const OMEGA_R: usize;
    /// `ceil(N / 64)`.
    const VEC_N_SIZE_64: usize;
    /// `ceil(N / 8)`.
    const VEC_N_SIZE_BYTES: usize;
    /// Mask of the valid bits in the top word.
    const RED_MASK: u64;
    /// `floor(2^24 / N) * N`, acceptance bound for 24-bit position candidates.
    const REJECTION_THRESHOLD: u32;

    /// Backing array for a reduced vector (`VEC_N_SIZE_64` words).
    type Vector: WordArray;
    /// Backing array for an unreduced product (`2 * VEC_N_SIZE_64 + 1` words).
    type Wide: WordArray;
}

/// HQC-128 parameter set (NIST security category 1).
#[derive(Debug, Clone, Copy)]
pub struct Hqc128;

impl HqcParams for Hqc128 {
    const NAME: &'static str = "hqc-128";
    const N: usize = 17_669;
    const OMEGA: usize = 66;
    const OMEGA_R: usize = 75;
    const VEC_N_SIZE_64: usize = 277;
    const VEC_N_SIZE_BYTES: usize = 2_209;
    const RED_MASK: u64 = 0x1f;
    const REJECTION_THRESHOLD: u32 = 16_767_881;

    type Vector = [u64; 277];
    type Wide = [u64; 555];
}

/// HQC-192 parameter set (NIST security category 3).
#[derive(Debug, Clone, Copy)]
pub struct Hqc192;

impl HqcParams for Hqc192 {
    const NAME: &'static str = "hqc-192";
    const N: usize = 35_851;
    const OMEGA: usize = 100;
    const OMEGA_R: usize = 114;
    const VEC_N_SIZE_64: usize = 561;
    const VEC_N_SIZE_BYTES: usize = 4_482;
    const RED_MASK: u64 = 0x7ff;
    const REJECTION_THRESHOLD: u32 = 16_742_417;

    type Vector = [u64; 561];
    type Wide = [u64; 1123];
}

/// HQC-256 parameter set (NIST security category 5).
#[derive(Debug, Clone, Copy)]
pub struct Hqc256;

impl HqcParams for Hqc256 {
    const NAME: &'static str = "hqc-256";
    const N: usize = 57_637;
    const OMEGA: usize = 131;
    const OMEGA_R: usize = 149;
    const VEC_N_SIZE_64: usize = 901;
    const VEC_N_SIZE_BYTES: usize = 7_205;
    const RED_MASK: u64 = 0x1f_ffff_ffff;
    const REJECTION_THRESHOLD: u32 = 16_772_367;

    type Vector = [u64; 901];
    type Wide = [u64; 1803];
}

const _: () = {
    macro_rules! check_params {
        ($t:ty) => {
            assert!(<$t>::N % 64 != 0);
            assert!(<$t>::VEC_N_SIZE_64 == <$t>::N.div_ceil(64));
            assert!(<$t>::VEC_N_SIZE_BYTES == <$t>::N.div_ceil(8));
            assert!(<$t>::RED_MASK == (1u64 << (<$t>::N % 64)) - 1);
            assert!(
                <$t>::REJECTION_THRESHOLD as usize == ((1usize << 24) / <$t>::N) * <$t>::N
            );
            assert!(<$t>::OMEGA <= <$t>::OMEGA_R);
            assert!(<<$t as HqcParams>::Vector as WordArray>::LEN == <$t>::VEC_N_SIZE_64);
            assert!(<<$t as HqcParams>::Wide as WordArray>::LEN == 2 * <$t>::VEC_N_SIZE_64 + 1);
        };
    }
    check_params!(Hqc128);
    check_params!(Hqc192);
    check_params!(Hqc256);
};
