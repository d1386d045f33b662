//! Multiplication in `GF(2)[X]/(X^N - 1)` of a sparse vector by a dense one.
//!
//! [`convolve`] XORs the unreduced product of a support block and a dense
//! block into a double-width buffer; [`reduce`] folds that buffer back to
//! `N` bits. [`Multiplier`] is the seam the masking gadget calls through.

use zeroize::Zeroizing;

use crate::math::vector::{DenseVector, SparseVector};
use crate::params::{HqcParams, WordArray};

/// Convolution and reduction primitives used by the masking gadget.
pub trait Multiplier<P: HqcParams> {
    /// XOR `support * dense` (unreduced) into `wide`, starting at word
    /// `offset`. `dense` is a block of the dense operand whose first word
    /// sits at word `offset` of the full vector.
    fn convolve(&self, wide: &mut P::Wide, offset: usize, support: &[u32], dense: &[u64]);

    /// `out = wide mod (X^N - 1)`.
    fn reduce(&self, out: &mut P::Vector, wide: &P::Wide);
}

/// Portable word-level implementation of [`Multiplier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Gf2x;

impl<P: HqcParams> Multiplier<P> for Gf2x {
    #[inline]
    fn convolve(&self, wide: &mut P::Wide, offset: usize, support: &[u32], dense: &[u64]) {
        convolve(&mut wide.as_mut()[offset..], support, dense);
    }

    #[inline]
    fn reduce(&self, out: &mut P::Vector, wide: &P::Wide) {
        reduce::<P>(out.as_mut(), wide.as_ref());
    }
}

/// `out ^= sum_{p in support} X^p * dense`, without reduction.
///
/// `out` must hold `max(support) / 64 + dense.len() + 1` words. Each position
/// does the same amount of work, but the words it touches start at
/// `position / 64`, so the memory-access pattern follows the support. The
/// support is secret: masking splits it across shares, it does not hide the
/// access pattern of a single convolution.
pub fn convolve(out: &mut [u64], support: &[u32], dense: &[u64]) {
    let len = dense.len();
    for &p in support {
        let word = (p >> 6) as usize;
        let shift = p & 63;
        debug_assert!(word + len < out.len(), "convolve: output too short");

        let dst = &mut out[word..=word + len];
        let mut carry = 0u64;
        for (d, &w) in dst.iter_mut().zip(dense) {
            *d ^= (w << shift) ^ carry;
            // `w >> (64 - shift)`, well defined for shift == 0.
            carry = (w >> 1) >> (63 - shift);
        }
        dst[len] ^= carry;
    }
}

/// Fold a double-width product into `N` bits: bit `N + k` is added to bit `k`.
///
/// `wide` holds at least `2 * VEC_N_SIZE_64 + 1` words, `out` exactly
/// `VEC_N_SIZE_64`.
pub fn reduce<P: HqcParams>(out: &mut [u64], wide: &[u64]) {
    let n = P::VEC_N_SIZE_64;
    let shift = (P::N & 63) as u32;
    debug_assert!(shift != 0, "reduce: N must not be a multiple of 64");
    debug_assert_eq!(out.len(), n);
    debug_assert!(wide.len() > 2 * n);

    for i in 0..n {
        let r = wide[i + n - 1] >> shift;
        let carry = wide[i + n] << (64 - shift);
        out[i] = wide[i] ^ r ^ carry;
    }
    out[n - 1] &= P::RED_MASK;
}

/// Unmasked product `a1 * a2 mod (X^N - 1)` (`vect_mul`).
#[must_use]
pub fn vect_mul<P: HqcParams>(a1: &SparseVector<P>, a2: &DenseVector<P>) -> DenseVector<P> {
    let mut wide = Zeroizing::new(P::Wide::zeroed());
    let mut out = DenseVector::<P>::zero();
    Multiplier::<P>::convolve(&Gf2x, &mut wide, 0, a1.positions(), a2.words());
    Multiplier::<P>::reduce(&Gf2x, out.as_array_mut(), &wide);
    out
}
