//! Constant-time comparisons on words, bytes and support positions. No secret-dependent branching.

/// Constant-time word-slice comparison. Returns 0 if a == b, 1 otherwise. Same length required.
#[inline]
pub fn ct_verify(a: &[u64], b: &[u64]) -> u8 {
    assert_eq!(a.len(), b.len(), "ct_verify: length mismatch");

    let mut diff: u64 = 0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    // Fence: prevent the optimiser from short-circuiting the loop.
    let diff = core::hint::black_box(diff);
    nonzero_bit(diff) as u8
}

/// Constant-time byte-slice comparison, same contract as [`ct_verify`].
#[inline]
pub fn ct_verify_bytes(a: &[u8], b: &[u8]) -> u8 {
    assert_eq!(a.len(), b.len(), "ct_verify_bytes: length mismatch");

    let mut diff: u64 = 0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        diff |= (x ^ y) as u64;
    }
    let diff = core::hint::black_box(diff);
    nonzero_bit(diff) as u8
}

/// Returns 1 if every byte is zero, 0 otherwise.
#[inline]
pub fn ct_is_zero(a: &[u8]) -> u8 {
    let mut acc: u64 = 0;
    for &x in a {
        acc |= x as u64;
    }
    let acc = core::hint::black_box(acc);
    (1 ^ nonzero_bit(acc)) as u8
}

/// Returns 1 if `a == b`, 0 otherwise.
#[inline]
pub fn ct_eq_u32(a: u32, b: u32) -> u32 {
    let diff = core::hint::black_box((a ^ b) as u64);
    (1 ^ nonzero_bit(diff)) as u32
}

// 0 -> 0, nonzero -> 1 without branching.
#[inline(always)]
const fn nonzero_bit(x: u64) -> u64 {
    (x | x.wrapping_neg()) >> 63
}
