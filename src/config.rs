//! Masking configuration: the share count and the parameter set it applies to.
//!
//! [`MaskingConfig`] is what an embedding application deserializes, e.g.
//! `{"level": "hqc-192", "masks": 4}`; [`MaskingConfig::masks_for`] checks it
//! against the parameter set compiled into the caller.

use core::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::params::{Hqc128, Hqc192, Hqc256, HqcParams};
use crate::{Error, Result};

/// Number of shares the gadget splits a product into.
///
/// One share means no masking at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Masks(NonZeroUsize);

impl Masks {
    /// Single share: the product is computed in the clear.
    pub const UNMASKED: Self = Self(NonZeroUsize::MIN);

    /// Largest accepted share count. The gadget runs `MAX * (MAX - 1) / 2`
    /// cross pairs.
    pub const MAX: usize = 64;

    /// Validate a share count in `1..=MAX`.
    pub const fn new(masks: usize) -> Result<Self> {
        if masks > Self::MAX {
            return Err(Error::InvalidMasks);
        }
        match NonZeroUsize::new(masks) {
            Some(m) => Ok(Self(m)),
            None => Err(Error::InvalidMasks),
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Number of unordered share pairs, i.e. masks drawn per multiplication.
    #[inline]
    #[must_use]
    pub const fn pairs(self) -> usize {
        let m = self.0.get();
        m * (m - 1) / 2
    }

    #[inline]
    #[must_use]
    pub const fn is_masked(self) -> bool {
        self.0.get() > 1
    }
}

impl Default for Masks {
    fn default() -> Self {
        Self::UNMASKED
    }
}

impl TryFrom<usize> for Masks {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Masks> for usize {
    fn from(masks: Masks) -> Self {
        masks.get()
    }
}

impl core::fmt::Display for Masks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HQC security level, the runtime counterpart of a [`HqcParams`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    #[serde(rename = "hqc-128")]
    Hqc128,
    #[serde(rename = "hqc-192")]
    Hqc192,
    #[serde(rename = "hqc-256")]
    Hqc256,
}

impl SecurityLevel {
    /// Level of a built-in parameter set; `None` for custom sets.
    #[must_use]
    pub fn of<P: HqcParams>() -> Option<Self> {
        [Self::Hqc128, Self::Hqc192, Self::Hqc256]
            .into_iter()
            .find(|level| level.name() == P::NAME)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hqc128 => Hqc128::NAME,
            Self::Hqc192 => Hqc192::NAME,
            Self::Hqc256 => Hqc256::NAME,
        }
    }
}

impl core::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deserializable masking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingConfig {
    pub level: SecurityLevel,
    #[serde(default)]
    pub masks: Masks,
}

impl MaskingConfig {
    #[must_use]
    pub const fn new(level: SecurityLevel, masks: Masks) -> Self {
        Self { level, masks }
    }

    /// Share count to use with parameter set `P`, failing when the
    /// configuration was written for another level.
    pub fn masks_for<P: HqcParams>(&self) -> Result<Masks> {
        if self.level.name() != P::NAME {
            return Err(Error::ParameterMismatch {
                expected: P::NAME,
                actual: self.level.name(),
            });
        }
        Ok(self.masks)
    }
}
