//! Arithmetic in `GF(2)[X]/(X^N - 1)` for the masking gadget.
//!
//! Sub-modules cover dense and sparse vectors, sparse-by-dense convolution
//! with reduction, and deterministic fixed-weight and uniform sampling.

pub mod gf2x;
pub mod sample;
pub mod vector;
