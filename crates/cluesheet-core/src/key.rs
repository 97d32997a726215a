//! Keys and key sets used by number markers and bar-color markers.
//!
//! Both marker kinds draw from the same closed key space `1..=4`, so they share
//! [`MarkKey`] and [`KeySet`]. The set is a tiny bitset: bit `k - 1` is set when
//! key `k` is present, which makes construction deduplicating by definition.
//!
//! # Examples
//!
//! ```
//! use cluesheet_core::{KeySet, MarkKey};
//!
//! let mut set = KeySet::new();
//! set.insert(MarkKey::K3);
//! set.insert(MarkKey::K1);
//! set.insert(MarkKey::K3);
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![MarkKey::K1, MarkKey::K3]);
//! ```

use std::{
    fmt::{self, Display},
    ops::{BitAnd, BitOr},
};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A number or bar-color key in the range 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum MarkKey {
    /// Key 1.
    K1 = 1,
    /// Key 2.
    K2 = 2,
    /// Key 3.
    K3 = 3,
    /// Key 4.
    K4 = 4,
}

impl MarkKey {
    /// All keys in ascending order.
    pub const ALL: [Self; 4] = [Self::K1, Self::K2, Self::K3, Self::K4];

    /// Creates a key from a value in the range 1-4.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the range 1-4. Use [`MarkKey::try_from`] for
    /// untrusted input.
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        let Ok(key) = Self::try_from(value) else {
            panic!("Invalid mark key value: {value}");
        };
        key
    }

    /// Returns the numeric value of this key (1-4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    const fn bit(self) -> u8 {
        1 << (self as u8 - 1)
    }
}

impl TryFrom<u8> for MarkKey {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::K1),
            2 => Ok(Self::K2),
            3 => Ok(Self::K3),
            4 => Ok(Self::K4),
            _ => Err(CoreError::InvalidMarkKey(value)),
        }
    }
}

impl From<MarkKey> for u8 {
    fn from(key: MarkKey) -> u8 {
        key.value()
    }
}

impl Display for MarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value(), f)
    }
}

/// An unordered, duplicate-free set of [`MarkKey`]s.
///
/// Iteration always yields keys in ascending order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<MarkKey>", into = "Vec<MarkKey>")]
pub struct KeySet {
    bits: u8,
}

impl KeySet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// The set containing every key.
    pub const FULL: Self = Self { bits: 0b1111 };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the number of keys in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if `key` is in the set.
    #[must_use]
    pub const fn contains(self, key: MarkKey) -> bool {
        self.bits & key.bit() != 0
    }

    /// Adds `key`, returning `true` if it was not already present.
    pub fn insert(&mut self, key: MarkKey) -> bool {
        let added = !self.contains(key);
        self.bits |= key.bit();
        added
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: MarkKey) -> bool {
        let removed = self.contains(key);
        self.bits &= !key.bit();
        removed
    }

    /// Returns a copy of the set with `key` flipped.
    #[must_use]
    pub const fn toggled(self, key: MarkKey) -> Self {
        Self {
            bits: self.bits ^ key.bit(),
        }
    }

    /// Returns a copy of the set without `key`.
    #[must_use]
    pub const fn without(self, key: MarkKey) -> Self {
        Self {
            bits: self.bits & !key.bit(),
        }
    }

    /// Returns the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the intersection of two sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns an iterator over the keys in ascending order.
    #[must_use]
    pub fn iter(self) -> KeySetIter {
        self.into_iter()
    }
}

impl BitOr for KeySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for KeySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl FromIterator<MarkKey> for KeySet {
    fn from_iter<T: IntoIterator<Item = MarkKey>>(iter: T) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl IntoIterator for KeySet {
    type Item = MarkKey;
    type IntoIter = KeySetIter;

    fn into_iter(self) -> Self::IntoIter {
        KeySetIter { bits: self.bits }
    }
}

/// By-value iterator over a [`KeySet`], in ascending key order.
#[derive(Debug, Clone)]
pub struct KeySetIter {
    bits: u8,
}

impl Iterator for KeySetIter {
    type Item = MarkKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let value = self.bits.trailing_zeros() as u8 + 1;
        self.bits &= self.bits - 1;
        MarkKey::try_from(value).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl From<Vec<MarkKey>> for KeySet {
    fn from(keys: Vec<MarkKey>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<KeySet> for Vec<MarkKey> {
    fn from(set: KeySet) -> Self {
        set.iter().collect()
    }
}

impl Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in *self {
            Display::fmt(&key, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_range() {
        for key in MarkKey::ALL {
            assert_eq!(MarkKey::from_value(key.value()), key);
        }
        assert_eq!(MarkKey::try_from(0), Err(CoreError::InvalidMarkKey(0)));
        assert_eq!(MarkKey::try_from(5), Err(CoreError::InvalidMarkKey(5)));
    }

    #[test]
    #[should_panic(expected = "Invalid mark key value: 9")]
    fn test_from_value_rejects_out_of_range() {
        let _ = MarkKey::from_value(9);
    }

    #[test]
    fn test_insert_deduplicates() {
        let set = KeySet::from_iter([MarkKey::K2, MarkKey::K2, MarkKey::K4]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(MarkKey::K2));
        assert!(set.contains(MarkKey::K4));
        assert!(!set.contains(MarkKey::K1));
    }

    #[test]
    fn test_iteration_order() {
        let set = KeySet::from_iter([MarkKey::K4, MarkKey::K1, MarkKey::K3]);
        let collected: Vec<_> = set.iter().collect();
        assert_eq!(collected, vec![MarkKey::K1, MarkKey::K3, MarkKey::K4]);
        assert_eq!(set.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_toggle_and_without() {
        let set = KeySet::new().toggled(MarkKey::K3);
        assert!(set.contains(MarkKey::K3));
        assert!(set.toggled(MarkKey::K3).is_empty());
        assert!(set.without(MarkKey::K3).is_empty());
        assert_eq!(set.without(MarkKey::K1), set);
    }

    #[test]
    fn test_operations() {
        let a = KeySet::from_iter([MarkKey::K1, MarkKey::K2]);
        let b = KeySet::from_iter([MarkKey::K2, MarkKey::K3]);
        assert_eq!((a | b).len(), 3);
        assert_eq!(a & b, KeySet::from_iter([MarkKey::K2]));
        assert_eq!(KeySet::FULL.len(), 4);
        assert_eq!(a.to_string(), "12");
    }

    #[test]
    fn test_serde_as_key_list() {
        let set = KeySet::from_iter([MarkKey::K4, MarkKey::K1]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,4]");
        let back: KeySet = serde_json::from_str("[4,1,4]").unwrap();
        assert_eq!(back, set);
        assert!(serde_json::from_str::<KeySet>("[5]").is_err());
    }
}
