//! Hash and extendable-output function (XOF) adapters.
//!
//! Wraps SHAKE-256 as used by HQC for its randomness:
//!
//! | HQC name        | Primitive              | Type / function      |
//! |-----------------|------------------------|----------------------|
//! | `shake_prng`    | SHAKE-256, domain 0x01 | [`ShakePrng`]        |
//! | `seedexpander`  | SHAKE-256, domain 0x02 | [`SeedExpander`]     |
//!
//! [`seed_fingerprint`] (SHA3-256) lets the gadget detect repeated mask seeds
//! without keeping the seeds themselves.

use rand_core::{CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256, Shake256Reader};

/// Domain-separation byte appended to the PRNG input.
pub const PRNG_DOMAIN: u8 = 0x01;

/// Domain-separation byte appended to a seed-expander seed.
pub const SEEDEXPANDER_DOMAIN: u8 = 0x02;

/// Entropy drawn from the system RNG when seeding a [`ShakePrng`].
pub const ENTROPY_BYTES: usize = 48;

/// SHAKE-256 deterministic random bit generator.
///
/// `SHAKE-256(entropy || personalization || 0x01)`, squeezed on demand. It
/// implements [`CryptoRng`] so it can feed the masking gadget directly.
pub struct ShakePrng {
    reader: Shake256Reader,
}

impl ShakePrng {
    /// Absorb `entropy || personalization` under the PRNG domain.
    #[must_use]
    pub fn new(entropy: &[u8], personalization: &[u8]) -> Self {
        let reader = Shake256::default()
            .chain(entropy)
            .chain(personalization)
            .chain([PRNG_DOMAIN])
            .finalize_xof();
        Self { reader }
    }

    /// Seed from [`ENTROPY_BYTES`] of an external entropy source.
    pub fn from_rng(rng: &mut impl CryptoRng) -> Self {
        let mut entropy = zeroize::Zeroizing::new([0u8; ENTROPY_BYTES]);
        rng.fill_bytes(entropy.as_mut());
        Self::new(entropy.as_ref(), &[])
    }
}

impl RngCore for ShakePrng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.reader.read(dst);
    }
}

impl CryptoRng for ShakePrng {}

impl core::fmt::Debug for ShakePrng {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShakePrng").finish_non_exhaustive()
    }
}

/// SHAKE-256 seed expander: `SHAKE-256(seed || 0x02)`.
///
/// Output is squeezed in 8-byte blocks; a request whose length is not a
/// multiple of 8 consumes a whole trailing block.
pub struct SeedExpander {
    reader: Shake256Reader,
}

impl SeedExpander {
    const BLOCK: usize = 8;

    #[must_use]
    pub fn new(seed: &[u8]) -> Self {
        let reader = Shake256::default()
            .chain(seed)
            .chain([SEEDEXPANDER_DOMAIN])
            .finalize_xof();
        Self { reader }
    }

    pub fn fill(&mut self, output: &mut [u8]) {
        let remainder = output.len() % Self::BLOCK;
        let (whole, tail) = output.split_at_mut(output.len() - remainder);
        self.reader.read(whole);
        if remainder != 0 {
            let mut block = [0u8; Self::BLOCK];
            self.reader.read(&mut block);
            tail.copy_from_slice(&block[..remainder]);
        }
    }
}

impl core::fmt::Debug for SeedExpander {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeedExpander").finish_non_exhaustive()
    }
}

/// SHA3-256 of a seed.
#[inline]
#[must_use]
pub fn seed_fingerprint(seed: &[u8]) -> [u8; 32] {
    Sha3_256::digest(seed).into()
}
