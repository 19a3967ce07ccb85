//! Fixed-capacity bit-set of rotation variant indices.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Set of rotation variant indices in `0..VariantSet::CAPACITY`.
///
/// Bit `i` set means variant `i` is a member. Occupancy grids store one
/// `VariantSet` per voxel, recording which variants of the owning part cover
/// that voxel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariantSet(u32);

impl VariantSet {
    /// Maximum number of variants a set can hold.
    pub const CAPACITY: usize = u32::BITS as usize;

    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates a set from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Creates a set containing only `index`.
    ///
    /// # Panics
    /// Panics if `index >= CAPACITY`.
    pub fn single(index: usize) -> Self {
        assert!(
            index < Self::CAPACITY,
            "variant index {index} exceeds capacity {}",
            Self::CAPACITY
        );
        Self(1 << index)
    }

    /// Creates a set containing `0..count`.
    ///
    /// # Panics
    /// Panics if `count > CAPACITY`.
    pub fn first_n(count: usize) -> Self {
        assert!(
            count <= Self::CAPACITY,
            "variant count {count} exceeds capacity {}",
            Self::CAPACITY
        );
        if count == Self::CAPACITY {
            Self(u32::MAX)
        } else {
            Self((1u32 << count) - 1)
        }
    }

    /// Returns true if no variant is a member.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of members.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if `index` is a member.
    pub fn contains(self, index: usize) -> bool {
        index < Self::CAPACITY && self.0 & (1 << index) != 0
    }

    /// Returns true if the two sets share a member.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Adds `index` to the set.
    ///
    /// # Panics
    /// Panics if `index >= CAPACITY`.
    pub fn insert(&mut self, index: usize) {
        *self |= Self::single(index);
    }

    /// Removes every member of `other` from the set.
    pub fn remove_all(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Returns the lowest member, if any.
    pub const fn lowest(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    /// Iterates members in ascending order.
    pub fn iter(self) -> Iter {
        Iter(self.0)
    }
}

impl fmt::Debug for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitOr for VariantSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VariantSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for VariantSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for VariantSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for VariantSet {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl IntoIterator for VariantSet {
    type Item = usize;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl FromIterator<usize> for VariantSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for index in iter {
            set.insert(index);
        }
        set
    }
}

/// Ascending iterator over the members of a [`VariantSet`].
#[derive(Debug, Clone)]
pub struct Iter(u32);

impl Iterator for Iter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_contains() {
        let set = VariantSet::single(5);
        assert!(set.contains(5));
        assert!(!set.contains(4));
        assert!(!set.contains(40));
        assert_eq!(set.len(), 1);
        assert_eq!(set.bits(), 0b10_0000);
    }

    #[test]
    fn test_first_n() {
        assert!(VariantSet::first_n(0).is_empty());
        assert_eq!(VariantSet::first_n(3).bits(), 0b111);
        assert_eq!(VariantSet::first_n(32).len(), 32);
    }

    #[test]
    #[should_panic]
    fn test_single_out_of_range() {
        let _ = VariantSet::single(32);
    }

    #[test]
    fn test_lowest_and_iter() {
        let set: VariantSet = [7, 2, 31].into_iter().collect();
        assert_eq!(set.lowest(), Some(2));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 7, 31]);
        assert_eq!(VariantSet::EMPTY.lowest(), None);
    }

    #[test]
    fn test_remove_all() {
        let mut set = VariantSet::first_n(4);
        set.remove_all(VariantSet::from_bits(0b0101));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(set.intersects(VariantSet::single(3)));
        assert!(!set.intersects(VariantSet::single(0)));
    }
}
