//! Sparse storage for the marks of a sheet.
//!
//! [`Grid`] maps [`Cell`]s to non-empty [`Mark`]s. Absent cells read as
//! [`Mark::EMPTY`], and writing the canonical empty mark removes the entry, so
//! the store only ever holds cells that carry information.
//!
//! # Examples
//!
//! ```
//! use cluesheet_core::{CardId, Cell, Grid, Mark, MarkKey, PlayerId, Primary};
//!
//! let mut grid = Grid::new();
//! let cell = Cell::new(CardId::new(3), PlayerId::new(2));
//!
//! grid.set(cell, Mark::EMPTY.toggle_number(MarkKey::K1));
//! assert_eq!(grid.cards_with_number(PlayerId::new(2), MarkKey::K1), vec![CardId::new(3)]);
//!
//! grid.set(cell, Mark::EMPTY);
//! assert!(grid.is_empty());
//! ```

use std::{
    collections::{BTreeMap, btree_map},
    ops::RangeInclusive,
};

use serde::{Deserialize, Serialize};

use crate::{CardId, Cell, Mark, MarkKey, PlayerId, Primary};

/// A sparse (card × player) grid of marks.
///
/// Entries iterate row-major: by card, then by player.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GridEntry>", into = "Vec<GridEntry>")]
pub struct Grid {
    cells: BTreeMap<Cell, Mark>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored (non-empty) cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell carries a mark.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the mark of `cell`, or [`Mark::EMPTY`] if none is stored.
    #[must_use]
    pub fn mark(&self, cell: Cell) -> Mark {
        self.cells.get(&cell).copied().unwrap_or_default()
    }

    /// Writes the mark of `cell` and returns the previous one.
    ///
    /// Writing [`Mark::EMPTY`] removes the entry.
    pub fn set(&mut self, cell: Cell, mark: Mark) -> Mark {
        let previous = if mark.is_empty() {
            self.cells.remove(&cell)
        } else {
            self.cells.insert(cell, mark)
        };
        previous.unwrap_or_default()
    }

    /// Writes a batch of marks in order.
    ///
    /// Later writes to the same cell win. The grid is borrowed mutably for the
    /// whole batch, so no reader can observe it half-applied.
    pub fn apply<I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = (Cell, Mark)>,
    {
        for (cell, mark) in changes {
            self.set(cell, mark);
        }
    }

    /// Removes every mark.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Returns an iterator over the stored cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Mark)> + '_ {
        self.cells.iter().map(|(cell, mark)| (*cell, *mark))
    }

    fn row_range(card: CardId) -> RangeInclusive<Cell> {
        let first = PlayerId::ALL[0];
        let last = PlayerId::ALL[PlayerId::ALL.len() - 1];
        Cell::new(card, first)..=Cell::new(card, last)
    }

    fn row_iter(&self, card: CardId) -> btree_map::Range<'_, Cell, Mark> {
        self.cells.range(Self::row_range(card))
    }

    fn column_iter(&self, player: PlayerId) -> impl Iterator<Item = (&Cell, &Mark)> {
        self.cells.iter().filter(move |(cell, _)| cell.player == player)
    }

    /// Returns the stored marks of one card row, keyed by player.
    #[must_use]
    pub fn row(&self, card: CardId) -> BTreeMap<PlayerId, Mark> {
        self.row_iter(card)
            .map(|(cell, mark)| (cell.player, *mark))
            .collect()
    }

    /// Returns the stored marks of one player column, keyed by card.
    #[must_use]
    pub fn column(&self, player: PlayerId) -> BTreeMap<CardId, Mark> {
        self.column_iter(player)
            .map(|(cell, mark)| (cell.card, *mark))
            .collect()
    }

    /// Returns the cards in `player`'s column whose marks carry number `key`.
    #[must_use]
    pub fn cards_with_number(&self, player: PlayerId, key: MarkKey) -> Vec<CardId> {
        self.column_iter(player)
            .filter(|(_, mark)| mark.has_number(key))
            .map(|(cell, _)| cell.card)
            .collect()
    }

    /// Returns `true` if a stored cell of the row has primary `primary`.
    #[must_use]
    pub fn row_contains(&self, card: CardId, primary: Primary) -> bool {
        self.row_iter(card)
            .any(|(_, mark)| mark.primary() == primary)
    }

    /// Returns `true` if a stored cell of the column has primary `primary`.
    #[must_use]
    pub fn column_contains(&self, player: PlayerId, primary: Primary) -> bool {
        self.column_iter(player)
            .any(|(_, mark)| mark.primary() == primary)
    }

    /// Returns `true` if a stored cell of the column carries number `key`.
    #[must_use]
    pub fn column_contains_number(&self, player: PlayerId, key: MarkKey) -> bool {
        self.column_iter(player).any(|(_, mark)| mark.has_number(key))
    }

    /// Counts the stored cells of the row with primary `primary`.
    #[must_use]
    pub fn count_in_row(&self, card: CardId, primary: Primary) -> usize {
        self.row_iter(card)
            .filter(|(_, mark)| mark.primary() == primary)
            .count()
    }
}

impl FromIterator<(Cell, Mark)> for Grid {
    fn from_iter<T: IntoIterator<Item = (Cell, Mark)>>(iter: T) -> Self {
        let mut grid = Self::new();
        grid.apply(iter);
        grid
    }
}

/// One stored cell, in the flat shape used for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct GridEntry {
    card: CardId,
    player: PlayerId,
    mark: Mark,
}

impl From<Vec<GridEntry>> for Grid {
    fn from(entries: Vec<GridEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (Cell::new(entry.card, entry.player), entry.mark))
            .collect()
    }
}

impl From<Grid> for Vec<GridEntry> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .into_iter()
            .map(|(cell, mark)| GridEntry {
                card: cell.card,
                player: cell.player,
                mark,
            })
            .collect()
    }
}
