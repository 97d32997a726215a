//! Identifiers for cards, players, and grid cells.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A card identifier within a theme's catalog.
///
/// Ids are assigned `1..=N` in catalog order; see [`Theme::cards`](crate::Theme::cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u16);

impl CardId {
    /// Creates a card id from its raw value.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw value of the id.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A player column on the sheet, numbered 1-6.
///
/// Player 1 is always the sheet owner; players 2-6 are opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// The maximum number of player columns.
    pub const MAX_PLAYERS: u8 = 6;

    /// The sheet owner.
    pub const OWNER: Self = Self(1);

    /// All player ids in column order.
    pub const ALL: [Self; 6] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Creates a player id from a value in the range 1-6.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the range 1-6. Use [`PlayerId::try_from`] for
    /// untrusted input.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        assert!(
            value >= 1 && value <= Self::MAX_PLAYERS,
            "Player id must be between 1 and 6"
        );
        Self(value)
    }

    /// Returns the column number (1-6).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` if this is the sheet owner's column.
    #[must_use]
    pub const fn is_owner(self) -> bool {
        self.0 == Self::OWNER.0
    }

    /// Returns the first `count` player ids.
    ///
    /// `count` is clamped to `1..=6`.
    pub fn first(count: u8) -> impl Iterator<Item = Self> + Clone {
        let count = count.clamp(1, Self::MAX_PLAYERS);
        Self::ALL.into_iter().take(usize::from(count))
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX_PLAYERS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidPlayer(value))
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> u8 {
        player.0
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A single cell of the sheet: one card row crossed with one player column.
///
/// Cells order row-major (by card, then player), which lets the grid answer
/// row queries with a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The card row.
    pub card: CardId,
    /// The player column.
    pub player: PlayerId,
}

impl Cell {
    /// Creates a cell from its row and column.
    #[must_use]
    pub const fn new(card: CardId, player: PlayerId) -> Self {
        Self { card, player }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(card {}, player {})", self.card, self.player)
    }
}
