//! `hqc-mask` -- masked sparse-by-dense multiplication for HQC.
//!
//! Computes `a1 * a2` in `GF(2)[X]/(X^n - 1)`, where `a1` is a sparse secret
//! given by its support and `a2` is dense, as `MASKS` XOR-shares. Diagonal
//! terms are computed per share; the two cross terms of every share pair are
//! blinded by a fresh fixed-weight vector before they are placed in a share,
//! so any `MASKS - 1` shares are independent of the secret.
//!
//! `MASKS = 1` is plain, unmasked multiplication.

#![deny(unsafe_code)]

pub mod config;
pub mod ct;
pub mod hash;
pub mod leakage;
pub mod masking;
pub mod math;
pub mod params;

pub use config::{Masks, MaskingConfig, SecurityLevel};
pub use masking::{Gf2x, Multiplier, Shares, safe_mul, safe_mul_with};
pub use math::gf2x::vect_mul;
pub use math::vector::{DenseVector, SparseVector};
pub use params::{Hqc128, Hqc192, Hqc256, HqcParams};

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned when constructing operands or running the gadget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input has wrong length for this parameter set.
    InvalidLength {
        /// Expected element count.
        expected: usize,
        /// Actual element count received.
        actual: usize,
    },
    /// Sparse support longer than the parameter set allows.
    InvalidWeight {
        /// Requested weight.
        weight: usize,
        /// Largest admissible weight (`OMEGA_R`).
        max: usize,
    },
    /// Support position out of range or repeated.
    InvalidSupport,
    /// Share count of zero or above [`Masks::MAX`].
    InvalidMasks,
    /// Configured security level does not match the parameter set in use.
    ParameterMismatch {
        /// Name of the parameter set in use.
        expected: &'static str,
        /// Name of the configured level.
        actual: &'static str,
    },
    /// Share-wise operation on share arrays of different sizes.
    MaskCountMismatch {
        /// Share count of the left operand.
        expected: usize,
        /// Share count of the right operand.
        actual: usize,
    },
    /// A pair mask seed was all-zero or repeated an earlier seed.
    CorrelatedMasks,
    /// The fixed-weight sampler ran out of its refill budget.
    RandomnessExhausted,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected}, got {actual}")
            }
            Self::InvalidWeight { weight, max } => {
                write!(f, "invalid weight: {weight} exceeds {max}")
            }
            Self::InvalidSupport => f.write_str("support position out of range or repeated"),
            Self::InvalidMasks => {
                write!(f, "share count must be between 1 and {}", Masks::MAX)
            }
            Self::ParameterMismatch { expected, actual } => {
                write!(f, "parameter mismatch: running {expected}, configured {actual}")
            }
            Self::MaskCountMismatch { expected, actual } => {
                write!(f, "share count mismatch: {expected} vs {actual}")
            }
            Self::CorrelatedMasks => f.write_str("mask randomness repeated across pairs"),
            Self::RandomnessExhausted => f.write_str("fixed-weight sampler exhausted its randomness"),
        }
    }
}

impl core::error::Error for Error {}
