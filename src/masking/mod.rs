//! XOR secret sharing of dense vectors and the masked multiplication gadget.
//!
//! A [`Shares`] value holds `MASKS` dense vectors whose XOR is the shared
//! value. Besides the gadget output it supports refreshing, share-wise
//! addition, splitting a value into shares and folding down to two shares.

pub mod gadget;
pub mod partition;

use core::ops;

use rand_core::CryptoRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub use crate::math::gf2x::{Gf2x, Multiplier};
pub use gadget::{safe_mul, safe_mul_with};

use crate::config::Masks;
use crate::hash::SeedExpander;
use crate::math::sample;
use crate::math::vector::{DenseVector, xor_into};
use crate::params::{HqcParams, SEED_BYTES};
use crate::{Error, Result};
use partition::Partition;

/// `MASKS` XOR-shares of a dense vector.
pub struct Shares<P: HqcParams> {
    masks: Masks,
    shares: Vec<DenseVector<P>>,
}

impl<P: HqcParams> Shares<P> {
    /// `masks` all-zero shares (a sharing of zero).
    #[must_use]
    pub fn zero(masks: Masks) -> Self {
        let shares = (0..masks.get()).map(|_| DenseVector::zero()).collect();
        Self { masks, shares }
    }

    #[inline]
    #[must_use]
    pub fn masks(&self) -> Masks {
        self.masks
    }

    #[inline]
    #[must_use]
    pub fn share(&self, index: usize) -> &DenseVector<P> {
        &self.shares[index]
    }

    #[inline]
    pub(crate) fn share_mut(&mut self, index: usize) -> &mut DenseVector<P> {
        &mut self.shares[index]
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, DenseVector<P>> {
        self.shares.iter()
    }

    /// XOR of all shares. Unmasks the value.
    #[must_use]
    pub fn recombine(&self) -> DenseVector<P> {
        let mut out = DenseVector::zero();
        for s in &self.shares {
            out += s;
        }
        out
    }

    /// Fold into two shares: the XOR of the even-indexed shares and the XOR
    /// of the odd-indexed ones. With a single share the second is zero.
    #[must_use]
    pub fn fold_pair(&self) -> [DenseVector<P>; 2] {
        let mut even = DenseVector::zero();
        let mut odd = DenseVector::zero();
        for (k, s) in self.shares.iter().enumerate() {
            if k % 2 == 0 {
                even += s;
            } else {
                odd += s;
            }
        }
        [even, odd]
    }

    /// Share an unmasked value: share `i` takes the `i`-th word block of
    /// `value` (zero elsewhere), then the sharing is refreshed.
    pub fn split<R: CryptoRng + ?Sized>(value: &DenseVector<P>, masks: Masks, rng: &mut R) -> Self {
        let blocks = Partition::new(masks, P::VEC_N_SIZE_64);
        let mut out = Self::zero(masks);
        for (i, block) in blocks.iter().enumerate() {
            out.shares[i].words.as_mut()[block.clone()].copy_from_slice(&value.words()[block]);
        }
        out.refresh(rng);
        out
    }

    /// Re-randomize without changing the shared value: for every `k >= 1` a
    /// fresh uniform `r_k` is added to shares `0` and `k`.
    pub fn refresh<R: CryptoRng + ?Sized>(&mut self, rng: &mut R) {
        if !self.masks.is_masked() {
            return;
        }
        let mut seed = Zeroizing::new([0u8; SEED_BYTES]);
        rng.fill_bytes(&mut seed[..]);
        let mut expander = SeedExpander::new(&seed[..]);

        let (first, rest) = self.shares.split_at_mut(1);
        for share in rest {
            let r = sample::uniform::<P>(&mut expander);
            first[0] += &r;
            *share += &r;
        }
    }

    /// Share-wise XOR of two sharings of the same size, refreshed.
    ///
    /// # Errors
    /// [`Error::MaskCountMismatch`] if the share counts differ.
    pub fn add<R: CryptoRng + ?Sized>(a: &Self, b: &Self, rng: &mut R) -> Result<Self> {
        if a.masks != b.masks {
            return Err(Error::MaskCountMismatch {
                expected: a.masks.get(),
                actual: b.masks.get(),
            });
        }
        let mut out = a.clone();
        for (dst, src) in out.shares.iter_mut().zip(&b.shares) {
            xor_into(dst.words.as_mut(), src.words());
        }
        out.refresh(rng);
        Ok(out)
    }
}

impl<P: HqcParams> ops::Index<usize> for Shares<P> {
    type Output = DenseVector<P>;

    #[inline]
    fn index(&self, index: usize) -> &DenseVector<P> {
        self.share(index)
    }
}

impl<'a, P: HqcParams> IntoIterator for &'a Shares<P> {
    type Item = &'a DenseVector<P>;
    type IntoIter = core::slice::Iter<'a, DenseVector<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: HqcParams> Clone for Shares<P> {
    fn clone(&self) -> Self {
        Self {
            masks: self.masks,
            shares: self.shares.clone(),
        }
    }
}

impl<P: HqcParams> core::fmt::Debug for Shares<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shares")
            .field("params", &P::NAME)
            .field("masks", &self.masks.get())
            .finish_non_exhaustive()
    }
}

impl<P: HqcParams> Zeroize for Shares<P> {
    fn zeroize(&mut self) {
        for s in &mut self.shares {
            s.zeroize();
        }
    }
}

// Each share clears itself on drop.
impl<P: HqcParams> ZeroizeOnDrop for Shares<P> {}
