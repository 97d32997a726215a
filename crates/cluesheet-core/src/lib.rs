//! Core data structures for Clue-style deduction sheets.
//!
//! This crate provides the value types every other part of the sheet builds on:
//!
//! - [`key`]: the closed key space `1..=4` shared by number and bar-color markers
//! - [`mark`]: the normalized value stored in one cell
//! - [`ids`]: card, player, and cell identifiers
//! - [`catalog`]: the static card lists of each theme
//! - [`grid`]: sparse storage of marks with row and column queries
//!
//! Nothing here performs automation; the cascading rules live in the engine
//! crate and operate on a [`Grid`] through its public operations.
//!
//! # Examples
//!
//! ```
//! use cluesheet_core::{Cell, Grid, Mark, PlayerId, Primary, Theme};
//!
//! let rope = Theme::Classic.find_by_name("Rope").unwrap();
//! let mut grid = Grid::new();
//! grid.set(Cell::new(rope.id, PlayerId::new(3)), Mark::HAS);
//!
//! assert!(grid.row_contains(rope.id, Primary::Has));
//! ```

pub mod catalog;
pub mod error;
pub mod grid;
pub mod ids;
pub mod key;
pub mod mark;

pub use self::{
    catalog::{Card, Category, Theme},
    error::CoreError,
    grid::Grid,
    ids::{CardId, Cell, PlayerId},
    key::{KeySet, MarkKey},
    mark::{Mark, Primary},
};
