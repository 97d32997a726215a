//! The value stored in a single sheet cell.
//!
//! A [`Mark`] has three facets:
//!
//! - a [`Primary`] state (`empty`, `has`, `not`, or `bars`), exactly one at a time;
//! - number markers, the "maybe" annotations that take part in deduction;
//! - bar-color markers, a manual visual aid that only exists under `bars`.
//!
//! Marks are immutable values. Every way of building or deriving one goes
//! through [`Mark::new`], which enforces the normalization rules, so a mark
//! with bar colors under any primary other than `bars` cannot exist.
//!
//! # Examples
//!
//! ```
//! use cluesheet_core::{KeySet, Mark, MarkKey, Primary};
//!
//! let mark = Mark::new(Primary::Has, KeySet::new(), KeySet::FULL);
//! assert!(mark.bar_colors().is_empty());
//!
//! let mark = Mark::EMPTY.toggle_bar_color(MarkKey::K2);
//! assert_eq!(mark.primary(), Primary::Bars);
//!
//! let mark = mark.toggle_bar_color(MarkKey::K2);
//! assert!(mark.is_empty());
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{CoreError, KeySet, MarkKey};

/// The mutually exclusive base state of a cell.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
)]
#[serde(rename_all = "camelCase")]
pub enum Primary {
    /// Nothing is known.
    #[default]
    Empty,
    /// The player holds the card.
    Has,
    /// The player does not hold the card.
    Not,
    /// Colored bars, a free-form manual annotation.
    Bars,
}

impl Primary {
    /// All primary states.
    pub const ALL: [Self; 4] = [Self::Empty, Self::Has, Self::Not, Self::Bars];

    /// Returns `true` for `has` and `not`, the states that record a known fact.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Has | Self::Not)
    }

    /// Returns the lowercase name of this state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Has => "has",
            Self::Not => "not",
            Self::Bars => "bars",
        }
    }
}

impl Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primary {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|primary| primary.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownPrimary(s.to_owned()))
    }
}

/// The value of one cell: a primary state plus number and bar-color markers.
///
/// Invariants, upheld by every constructor:
///
/// - bar colors are empty unless the primary is [`Primary::Bars`];
/// - numbers may accompany any primary;
/// - `empty` with no numbers is the single canonical empty value, [`Mark::EMPTY`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawMark", into = "RawMark")]
pub struct Mark {
    primary: Primary,
    numbers: KeySet,
    bar_colors: KeySet,
}

impl Mark {
    /// The canonical empty mark.
    pub const EMPTY: Self = Self {
        primary: Primary::Empty,
        numbers: KeySet::EMPTY,
        bar_colors: KeySet::EMPTY,
    };

    /// A bare `has` mark.
    pub const HAS: Self = Self::new(Primary::Has, KeySet::EMPTY, KeySet::EMPTY);

    /// A bare `not` mark.
    pub const NOT: Self = Self::new(Primary::Not, KeySet::EMPTY, KeySet::EMPTY);

    /// Creates a normalized mark.
    ///
    /// Bar colors are dropped unless `primary` is [`Primary::Bars`].
    #[must_use]
    pub const fn new(primary: Primary, numbers: KeySet, bar_colors: KeySet) -> Self {
        let bar_colors = if matches!(primary, Primary::Bars) {
            bar_colors
        } else {
            KeySet::EMPTY
        };
        Self {
            primary,
            numbers,
            bar_colors,
        }
    }

    /// Returns the primary state.
    #[must_use]
    pub const fn primary(&self) -> Primary {
        self.primary
    }

    /// Returns the number markers.
    #[must_use]
    pub const fn numbers(&self) -> KeySet {
        self.numbers
    }

    /// Returns the bar-color markers. Always empty unless the primary is `bars`.
    #[must_use]
    pub const fn bar_colors(&self) -> KeySet {
        self.bar_colors
    }

    /// Returns `true` if this is the canonical empty mark.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.primary, Primary::Empty) && self.numbers.is_empty()
    }

    /// Returns `true` if the mark carries number `key`.
    #[must_use]
    pub const fn has_number(&self, key: MarkKey) -> bool {
        self.numbers.contains(key)
    }

    /// Replaces the primary state, keeping the numbers.
    ///
    /// Bar colors survive only if the new primary is still `bars`.
    #[must_use]
    pub const fn with_primary(self, primary: Primary) -> Self {
        Self::new(primary, self.numbers, self.bar_colors)
    }

    /// Flips number `key`.
    #[must_use]
    pub const fn toggle_number(self, key: MarkKey) -> Self {
        Self::new(self.primary, self.numbers.toggled(key), self.bar_colors)
    }

    /// Flips bar color `key`.
    ///
    /// A non-`bars` mark switches to `bars` with only that color. Removing the
    /// last color reverts the primary to `empty`; numbers are kept either way.
    #[must_use]
    pub const fn toggle_bar_color(self, key: MarkKey) -> Self {
        let current = if matches!(self.primary, Primary::Bars) {
            self.bar_colors
        } else {
            KeySet::EMPTY
        };
        let bar_colors = current.toggled(key);
        let primary = if bar_colors.is_empty() {
            Primary::Empty
        } else {
            Primary::Bars
        };
        Self::new(primary, self.numbers, bar_colors)
    }

    /// Removes number `key`, if present.
    #[must_use]
    pub const fn without_number(self, key: MarkKey) -> Self {
        Self::new(self.primary, self.numbers.without(key), self.bar_colors)
    }

    /// Removes every number marker.
    #[must_use]
    pub const fn without_numbers(self) -> Self {
        Self::new(self.primary, KeySet::EMPTY, self.bar_colors)
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.primary {
            Primary::Empty => "·",
            Primary::Has => "✓",
            Primary::Not => "✗",
            Primary::Bars => "=",
        };
        f.write_str(symbol)?;
        if !self.bar_colors.is_empty() {
            write!(f, "[{}]", self.bar_colors)?;
        }
        if !self.numbers.is_empty() {
            write!(f, "{}", self.numbers)?;
        }
        Ok(())
    }
}

/// Unvalidated field-by-field form of a [`Mark`], used for (de)serialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMark {
    primary: Primary,
    #[serde(default)]
    numbers: KeySet,
    #[serde(default)]
    bar_colors: KeySet,
}

impl From<RawMark> for Mark {
    fn from(raw: RawMark) -> Self {
        Self::new(raw.primary, raw.numbers, raw.bar_colors)
    }
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        Self {
            primary: mark.primary,
            numbers: mark.numbers,
            bar_colors: mark.bar_colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn keys(values: &[u8]) -> KeySet {
        values.iter().map(|&v| MarkKey::from_value(v)).collect()
    }

    #[test]
    fn test_new_clears_bar_colors_outside_bars() {
        for primary in [Primary::Empty, Primary::Has, Primary::Not] {
            let mark = Mark::new(primary, keys(&[1]), keys(&[2, 3]));
            assert!(mark.bar_colors().is_empty());
            assert_eq!(mark.numbers(), keys(&[1]));
        }
        let mark = Mark::new(Primary::Bars, KeySet::EMPTY, keys(&[2, 3]));
        assert_eq!(mark.bar_colors(), keys(&[2, 3]));
    }

    #[test]
    fn test_canonical_empty() {
        assert!(Mark::EMPTY.is_empty());
        assert_eq!(Mark::default(), Mark::EMPTY);
        assert!(Mark::new(Primary::Empty, KeySet::EMPTY, keys(&[4])).is_empty());
        assert!(!Mark::EMPTY.toggle_number(MarkKey::K1).is_empty());
        assert!(!Mark::NOT.is_empty());
    }

    #[test]
    fn test_with_primary_preserves_numbers() {
        let mark = Mark::EMPTY
            .toggle_number(MarkKey::K2)
            .toggle_bar_color(MarkKey::K1);
        let bars = mark.with_primary(Primary::Bars);
        assert_eq!(bars.bar_colors(), keys(&[1]));

        let not = mark.with_primary(Primary::Not);
        assert_eq!(not.primary(), Primary::Not);
        assert_eq!(not.numbers(), keys(&[2]));
        assert!(not.bar_colors().is_empty());
    }

    #[test]
    fn test_toggle_number_on_settled_cell() {
        let mark = Mark::HAS.toggle_number(MarkKey::K3);
        assert_eq!(mark.primary(), Primary::Has);
        assert!(mark.has_number(MarkKey::K3));
        assert!(!mark.toggle_number(MarkKey::K3).has_number(MarkKey::K3));
    }

    #[test]
    fn test_toggle_bar_color_transitions() {
        let mark = Mark::NOT.toggle_number(MarkKey::K1);
        let bars = mark.toggle_bar_color(MarkKey::K4);
        assert_eq!(bars.primary(), Primary::Bars);
        assert_eq!(bars.bar_colors(), keys(&[4]));
        assert_eq!(bars.numbers(), keys(&[1]));

        let bars = bars.toggle_bar_color(MarkKey::K2);
        assert_eq!(bars.bar_colors(), keys(&[2, 4]));

        let back = bars
            .toggle_bar_color(MarkKey::K2)
            .toggle_bar_color(MarkKey::K4);
        assert_eq!(back.primary(), Primary::Empty);
        assert_eq!(back.numbers(), keys(&[1]));
    }

    #[test]
    fn test_number_removal() {
        let mark = Mark::EMPTY
            .toggle_number(MarkKey::K1)
            .toggle_number(MarkKey::K2);
        assert_eq!(mark.without_number(MarkKey::K1).numbers(), keys(&[2]));
        assert_eq!(mark.without_number(MarkKey::K3), mark);
        assert!(mark.without_numbers().is_empty());
    }

    #[test]
    fn test_primary_from_str() {
        assert_eq!("HAS".parse::<Primary>(), Ok(Primary::Has));
        assert_eq!("bars".parse::<Primary>(), Ok(Primary::Bars));
        assert!("maybe".parse::<Primary>().unwrap_err().is_unknown_primary());
    }

    #[test]
    fn test_display() {
        let mark = Mark::new(Primary::Bars, keys(&[2]), keys(&[1, 3]));
        assert_eq!(mark.to_string(), "=[13]2");
        assert_eq!(Mark::HAS.to_string(), "✓");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let mark: Mark =
            serde_json::from_str(r#"{"primary":"has","numbers":[2],"barColors":[1,3]}"#).unwrap();
        assert_eq!(mark, Mark::HAS.toggle_number(MarkKey::K2));

        let json = serde_json::to_string(&mark).unwrap();
        assert_eq!(json, r#"{"primary":"has","numbers":[2],"barColors":[]}"#);
    }

    fn arb_primary() -> impl Strategy<Value = Primary> {
        prop::sample::select(Primary::ALL.to_vec())
    }

    fn arb_keys() -> impl Strategy<Value = KeySet> {
        prop::collection::vec(1u8..=4, 0..6)
            .prop_map(|values| values.into_iter().map(MarkKey::from_value).collect())
    }

    proptest! {
        #[test]
        fn prop_bar_colors_only_under_bars(
            primary in arb_primary(),
            numbers in arb_keys(),
            bars in arb_keys(),
            next in arb_primary(),
            key in 1u8..=4,
        ) {
            let key = MarkKey::from_value(key);
            let mark = Mark::new(primary, numbers, bars);
            for derived in [
                mark,
                mark.with_primary(next),
                mark.toggle_number(key),
                mark.toggle_bar_color(key),
                mark.without_number(key),
                mark.without_numbers(),
            ] {
                prop_assert!(derived.primary().is_bars() || derived.bar_colors().is_empty());
            }
            prop_assert_eq!(mark.with_primary(next).numbers(), numbers);
        }
    }
}
