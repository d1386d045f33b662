//! Dense and sparse vectors of `GF(2)[X]/(X^N - 1)`.
//!
//! `DenseVector<P>` packs the `N` coefficients little-endian into
//! `VEC_N_SIZE_64` words; bits at or above `N` are always zero.
//! `SparseVector<P>` stores the support (positions of the set bits).
//! Both hold secret material and zeroize on drop.

use core::ops;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ct;
use crate::params::{HqcParams, WordArray};
use crate::{Error, Result};

/// Dense binary vector of `N` bits.
pub struct DenseVector<P: HqcParams> {
    pub(crate) words: P::Vector,
}

impl<P: HqcParams> DenseVector<P> {
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            words: P::Vector::zeroed(),
        }
    }

    /// Wrap a word array, clearing the bits at or above `N`.
    #[must_use]
    pub fn from_words(words: P::Vector) -> Self {
        let mut v = Self { words };
        v.mask_top();
        v
    }

    /// Copy from a word slice of exactly `VEC_N_SIZE_64` words.
    pub fn try_from_words(words: &[u64]) -> Result<Self> {
        if words.len() != P::VEC_N_SIZE_64 {
            return Err(Error::InvalidLength {
                expected: P::VEC_N_SIZE_64,
                actual: words.len(),
            });
        }
        let mut v = Self::zero();
        v.words.as_mut().copy_from_slice(words);
        v.mask_top();
        Ok(v)
    }

    /// Decode `VEC_N_SIZE_BYTES` little-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != P::VEC_N_SIZE_BYTES {
            return Err(Error::InvalidLength {
                expected: P::VEC_N_SIZE_BYTES,
                actual: bytes.len(),
            });
        }
        let mut v = Self::zero();
        v.load_le_bytes(bytes);
        Ok(v)
    }

    /// Overwrite from up to `VEC_N_SIZE_64 * 8` little-endian bytes.
    pub(crate) fn load_le_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= P::VEC_N_SIZE_64 * 8);
        self.words.zeroize();
        for (word, chunk) in self.words.as_mut().iter_mut().zip(bytes.chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }
        self.mask_top();
    }

    /// Encode to `VEC_N_SIZE_BYTES` little-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(P::VEC_N_SIZE_64 * 8);
        for word in self.words.as_ref() {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.truncate(P::VEC_N_SIZE_BYTES);
        out
    }

    #[inline]
    #[must_use]
    pub fn words(&self) -> &[u64] {
        self.words.as_ref()
    }

    #[inline]
    pub(crate) fn as_array_mut(&mut self) -> &mut P::Vector {
        &mut self.words
    }

    /// Coefficient at `position`.
    #[inline]
    #[must_use]
    pub fn bit(&self, position: usize) -> bool {
        debug_assert!(position < P::N);
        (self.words.as_ref()[position / 64] >> (position % 64)) & 1 == 1
    }

    #[inline]
    pub(crate) fn set_bit(&mut self, position: usize) {
        debug_assert!(position < P::N);
        self.words.as_mut()[position / 64] |= 1u64 << (position % 64);
    }

    /// Hamming weight.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.words
            .as_ref()
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Constant-time equality (`vect_compare`).
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        ct::ct_verify(self.words.as_ref(), other.words.as_ref()) == 0
    }

    fn mask_top(&mut self) {
        self.words.as_mut()[P::VEC_N_SIZE_64 - 1] &= P::RED_MASK;
    }
}

impl<P: HqcParams> Default for DenseVector<P> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: HqcParams> Clone for DenseVector<P> {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
        }
    }
}

impl<P: HqcParams> PartialEq for DenseVector<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl<P: HqcParams> Eq for DenseVector<P> {}

impl<P: HqcParams> core::fmt::Debug for DenseVector<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DenseVector")
            .field("params", &P::NAME)
            .finish_non_exhaustive()
    }
}

impl<P: HqcParams> Zeroize for DenseVector<P> {
    fn zeroize(&mut self) {
        self.words.zeroize();
    }
}

impl<P: HqcParams> Drop for DenseVector<P> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<P: HqcParams> ZeroizeOnDrop for DenseVector<P> {}

impl<P: HqcParams> ops::AddAssign<&Self> for DenseVector<P> {
    /// Addition in `GF(2)` is XOR.
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        xor_into(self.words.as_mut(), rhs.words.as_ref());
    }
}

impl<'b, P: HqcParams> ops::Add<&'b DenseVector<P>> for &DenseVector<P> {
    type Output = DenseVector<P>;

    #[inline]
    fn add(self, rhs: &'b DenseVector<P>) -> DenseVector<P> {
        let mut r = self.clone();
        r += rhs;
        r
    }
}

/// `dst ^= src` word by word (`vect_add`).
#[inline]
pub(crate) fn xor_into(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Sparse binary vector given by the positions of its set bits.
pub struct SparseVector<P: HqcParams> {
    positions: Vec<u32>,
    _params: core::marker::PhantomData<P>,
}

impl<P: HqcParams> SparseVector<P> {
    /// Build from a support list: at most `OMEGA_R` distinct positions below
    /// `N`, in any order.
    pub fn from_positions(positions: &[u32]) -> Result<Self> {
        if positions.len() > P::OMEGA_R {
            return Err(Error::InvalidWeight {
                weight: positions.len(),
                max: P::OMEGA_R,
            });
        }
        let mut invalid = 0u32;
        for (i, &p) in positions.iter().enumerate() {
            invalid |= ((p as usize) >= P::N) as u32;
            for &q in &positions[..i] {
                invalid |= ct::ct_eq_u32(p, q);
            }
        }
        if invalid != 0 {
            return Err(Error::InvalidSupport);
        }
        Ok(Self::from_checked(positions.to_vec()))
    }

    pub(crate) fn from_checked(positions: Vec<u32>) -> Self {
        Self {
            positions,
            _params: core::marker::PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    #[inline]
    #[must_use]
    pub fn weight(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn to_dense(&self) -> DenseVector<P> {
        let mut v = DenseVector::zero();
        for &p in &self.positions {
            v.set_bit(p as usize);
        }
        v
    }
}

impl<P: HqcParams> Clone for SparseVector<P> {
    fn clone(&self) -> Self {
        Self::from_checked(self.positions.clone())
    }
}

impl<P: HqcParams> core::fmt::Debug for SparseVector<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SparseVector")
            .field("params", &P::NAME)
            .field("weight", &self.positions.len())
            .finish_non_exhaustive()
    }
}

impl<P: HqcParams> Zeroize for SparseVector<P> {
    fn zeroize(&mut self) {
        self.positions.zeroize();
    }
}

impl<P: HqcParams> Drop for SparseVector<P> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<P: HqcParams> ZeroizeOnDrop for SparseVector<P> {}
