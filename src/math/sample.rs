//! Deterministic sampling from a [`SeedExpander`]: fixed-weight supports and
//! vectors, and uniform dense vectors.

use zeroize::{Zeroize, Zeroizing};

use crate::ct;
use crate::hash::SeedExpander;
use crate::math::vector::{DenseVector, SparseVector};
use crate::params::HqcParams;
use crate::{Error, Result};

/// Expander refills allowed before a fixed-weight draw gives up. A working
/// expander needs one or two.
pub const MAX_REFILLS: usize = 256;

/// Sample `weight` distinct positions in `[0, N)`.
///
/// Each candidate is a big-endian 24-bit value, rejected when at or above
/// `REJECTION_THRESHOLD` and otherwise taken modulo `N`. Repeats are detected
/// with a full constant-time scan and skipped. Randomness is squeezed `3 *
/// weight` bytes at a time.
pub fn fixed_weight_positions<P: HqcParams>(
    expander: &mut SeedExpander, weight: usize,
) -> Result<SparseVector<P>> {
    if weight > P::OMEGA_R {
        return Err(Error::InvalidWeight {
            weight,
            max: P::OMEGA_R,
        });
    }

    let chunk = 3 * weight;
    let mut bytes = Zeroizing::new(vec![0u8; chunk]);
    let mut positions = Vec::with_capacity(weight);
    let mut cursor = chunk;
    let mut refills = 0;

    while positions.len() < weight {
        if cursor == chunk {
            if refills == MAX_REFILLS {
                positions.zeroize();
                return Err(Error::RandomnessExhausted);
            }
            expander.fill(&mut bytes);
            cursor = 0;
            refills += 1;
        }

        let candidate = u32::from_be_bytes([0, bytes[cursor], bytes[cursor + 1], bytes[cursor + 2]]);
        cursor += 3;
        if candidate >= P::REJECTION_THRESHOLD {
            continue;
        }
        let candidate = candidate % P::N as u32;

        let mut repeated = 0u32;
        for &p in &positions {
            repeated |= ct::ct_eq_u32(p, candidate);
        }
        if repeated == 0 {
            positions.push(candidate);
        }
    }

    Ok(SparseVector::from_checked(positions))
}

/// Sample a dense vector of exactly `weight` set bits.
pub fn fixed_weight<P: HqcParams>(
    expander: &mut SeedExpander, weight: usize,
) -> Result<DenseVector<P>> {
    let support = fixed_weight_positions::<P>(expander, weight)?;
    Ok(support.to_dense())
}

/// Sample a uniformly random dense vector.
pub fn uniform<P: HqcParams>(expander: &mut SeedExpander) -> DenseVector<P> {
    let mut bytes = Zeroizing::new(vec![0u8; P::VEC_N_SIZE_BYTES]);
    expander.fill(&mut bytes);
    let mut v = DenseVector::<P>::zero();
    v.load_le_bytes(&bytes);
    v
}
