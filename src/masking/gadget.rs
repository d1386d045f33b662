//! Masked sparse-by-dense multiplication.
//!
//! The secret `a1` is split by weight and the dense `a2` by word length, each
//! into `MASKS` contiguous blocks ([`Partition`]). Writing `a1_i` and `a2_j`
//! for those blocks:
//!
//! | Pass     | For            | Effect on the shares                           |
//! |----------|----------------|------------------------------------------------|
//! | diagonal | `i`            | `s_i = a1_i * a2_i`                            |
//! | cross    | `i < j`        | `s_i ^= r`, `s_j ^= (a1_i * a2_j ^ r) ^ a1_j * a2_i` |
//!
//! Every product is reduced before it touches a share, and every pair draws
//! its own fixed-weight mask `r` from a fresh seed. The XOR of the shares is
//! `a1 * a2 mod (X^N - 1)`.

use rand_core::CryptoRng;
use tracing::{debug, error, instrument, trace};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::Shares;
use super::partition::Partition;
use crate::config::Masks;
use crate::ct;
use crate::hash::{SeedExpander, seed_fingerprint};
use crate::math::gf2x::{Gf2x, Multiplier};
use crate::math::sample;
use crate::math::vector::{DenseVector, SparseVector};
use crate::params::{HqcParams, SEED_BYTES, WordArray};
use crate::{Error, Result};

/// Per-call working storage, zeroized on drop.
pub(crate) struct Scratch<P: HqcParams> {
    wide: P::Wide,
    temp1: DenseVector<P>,
    temp2: DenseVector<P>,
    combined: DenseVector<P>,
}

impl<P: HqcParams> Scratch<P> {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            wide: P::Wide::zeroed(),
            temp1: DenseVector::zero(),
            temp2: DenseVector::zero(),
            combined: DenseVector::zero(),
        }
    }

    /// Clear `wide`, then convolve a support block with the dense words in
    /// `block`, placed at the block's word offset.
    fn convolve<M: Multiplier<P> + ?Sized>(
        &mut self, multiplier: &M, support: &[u32], dense: &[u64], block: core::ops::Range<usize>,
    ) {
        self.wide.zeroize();
        multiplier.convolve(&mut self.wide, block.start, support, &dense[block]);
    }
}

impl<P: HqcParams> core::fmt::Debug for Scratch<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scratch")
            .field("params", &P::NAME)
            .finish_non_exhaustive()
    }
}

impl<P: HqcParams> Zeroize for Scratch<P> {
    fn zeroize(&mut self) {
        self.wide.zeroize();
        self.temp1.zeroize();
        self.temp2.zeroize();
        self.combined.zeroize();
    }
}

impl<P: HqcParams> Drop for Scratch<P> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<P: HqcParams> ZeroizeOnDrop for Scratch<P> {}

/// Masked `a1 * a2` with the portable [`Gf2x`] multiplier.
///
/// # Errors
/// [`Error::CorrelatedMasks`] if the RNG repeats a pair seed or yields an
/// all-zero one, [`Error::RandomnessExhausted`] if mask sampling fails.
pub fn safe_mul<P: HqcParams, R: CryptoRng + ?Sized>(
    a1: &SparseVector<P>, a2: &DenseVector<P>, masks: Masks, rng: &mut R,
) -> Result<Shares<P>> {
    safe_mul_with(&Gf2x, a1, a2, masks, rng)
}

/// Masked `a1 * a2` through an arbitrary [`Multiplier`].
///
/// Returns `masks` shares whose XOR is the product. `MASKS = 1` computes the
/// plain product and draws nothing from `rng`. On error the partial shares
/// are zeroized before returning.
///
/// # Errors
/// See [`safe_mul`].
#[instrument(skip_all, fields(params = P::NAME, masks = masks.get()))]
pub fn safe_mul_with<P, M, R>(
    multiplier: &M, a1: &SparseVector<P>, a2: &DenseVector<P>, masks: Masks, rng: &mut R,
) -> Result<Shares<P>>
where
    P: HqcParams,
    M: Multiplier<P> + ?Sized,
    R: CryptoRng + ?Sized,
{
    let m = masks.get();
    let by_weight = Partition::new(masks, a1.weight());
    let by_words = Partition::new(masks, P::VEC_N_SIZE_64);
    let support = a1.positions();
    let dense = a2.words();

    let mut scratch = Scratch::<P>::new();
    let mut shares = Shares::zero(masks);

    for i in 0..m {
        scratch.convolve(multiplier, &support[by_weight.range(i)], dense, by_words.range(i));
        multiplier.reduce(shares.share_mut(i).as_array_mut(), &scratch.wide);
    }

    if !masks.is_masked() {
        debug!("single share, multiplication is unmasked");
        return Ok(shares);
    }

    let mut seen = Vec::new();
    for i in 0..m {
        for j in i + 1..m {
            trace!(i, j, "cross terms");
            let mask = draw_mask::<P, R>(rng, &mut seen, a1.weight()).inspect_err(|err| {
                error!(i, j, error = %err, "pair mask rejected, aborting");
            })?;

            scratch.convolve(multiplier, &support[by_weight.range(i)], dense, by_words.range(j));
            multiplier.reduce(scratch.temp1.as_array_mut(), &scratch.wide);
            scratch.temp1 += &mask;

            scratch.convolve(multiplier, &support[by_weight.range(j)], dense, by_words.range(i));
            multiplier.reduce(scratch.temp2.as_array_mut(), &scratch.wide);

            scratch.combined.clone_from(&scratch.temp1);
            scratch.combined += &scratch.temp2;

            *shares.share_mut(i) += &mask;
            *shares.share_mut(j) += &scratch.combined;
        }
    }

    debug!(pairs = masks.pairs(), "masked multiplication done");
    Ok(shares)
}

/// Draw a pair seed, check it against every seed drawn so far in this call,
/// and expand it into a fixed-weight mask.
///
/// Seeds are compared through their SHA3-256 fingerprints so the seeds
/// themselves are not retained.
fn draw_mask<P: HqcParams, R: CryptoRng + ?Sized>(
    rng: &mut R, seen: &mut Vec<[u8; 32]>, weight: usize,
) -> Result<DenseVector<P>> {
    let mut seed = Zeroizing::new([0u8; SEED_BYTES]);
    rng.fill_bytes(&mut seed[..]);

    let fingerprint = seed_fingerprint(&seed[..]);
    let mut rejected = ct::ct_is_zero(&seed[..]);
    for earlier in seen.iter() {
        rejected |= 1 ^ ct::ct_verify_bytes(earlier, &fingerprint);
    }
    if rejected != 0 {
        return Err(Error::CorrelatedMasks);
    }
    seen.push(fingerprint);

    let mut expander = SeedExpander::new(&seed[..]);
    sample::fixed_weight::<P>(&mut expander, weight)
}
