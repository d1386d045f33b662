//! Block partition of a quantity across shares.
//!
//! Shares `0..masks-1` each get `quantity / masks`; the last share takes the
//! remainder as well. The gadget partitions two quantities independently:
//! the dense operand's word length and the sparse operand's weight.

use core::ops::Range;

use crate::config::Masks;

/// Size of share `index`'s block.
#[inline]
#[must_use]
pub const fn share_size(index: usize, masks: usize, quantity: usize) -> usize {
    debug_assert!(masks > 0, "share_size: masks must be non-zero");
    debug_assert!(index < masks);
    let base = quantity / masks;
    if index < masks - 1 { base } else { quantity - base * (masks - 1) }
}

/// First element of share `index`'s block.
#[inline]
#[must_use]
pub const fn share_offset(index: usize, masks: usize, quantity: usize) -> usize {
    debug_assert!(masks > 0, "share_offset: masks must be non-zero");
    index * (quantity / masks)
}

/// Partition of `0..quantity` into `masks` contiguous blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    masks: Masks,
    quantity: usize,
}

impl Partition {
    #[inline]
    #[must_use]
    pub const fn new(masks: Masks, quantity: usize) -> Self {
        Self { masks, quantity }
    }

    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> usize {
        self.quantity
    }

    #[inline]
    #[must_use]
    pub const fn size(&self, index: usize) -> usize {
        share_size(index, self.masks.get(), self.quantity)
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self, index: usize) -> usize {
        share_offset(index, self.masks.get(), self.quantity)
    }

    /// Block of share `index`.
    #[inline]
    #[must_use]
    pub const fn range(&self, index: usize) -> Range<usize> {
        let start = self.offset(index);
        start..start + self.size(index)
    }

    /// Blocks of all shares, in order.
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.masks.get()).map(|i| self.range(i))
    }
}
