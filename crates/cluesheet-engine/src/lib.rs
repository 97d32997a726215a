//! Mark-state engine for Clue-style deduction sheets.
//!
//! This crate turns the plain [`cluesheet_core::Grid`] into a playable sheet:
//!
//! - [`rules`]: the optional automation rules and their configuration
//! - [`constraint`]: edit constraints that switch on when a rule needs them
//! - [`cascade`]: the worklist that applies rules until nothing changes
//! - [`predicates`]: facts derived from the grid at read time
//! - [`shown_to`]: which opponents have seen each owned card
//! - [`sheet`]: the session object tying it all together
//! - [`history`]: bounded undo/redo of sheet snapshots
//!
//! # Examples
//!
//! ```
//! use cluesheet_core::{CardId, Cell, PlayerId, Primary};
//! use cluesheet_engine::{AutoRulesConfig, Sheet, SheetConfig};
//!
//! let mut sheet = Sheet::new(SheetConfig {
//!     rules: AutoRulesConfig::ALL_ENABLED,
//!     ..SheetConfig::default()
//! });
//! sheet.confirm_public_cards(&[CardId::new(7)]);
//!
//! let report = sheet
//!     .set_primary(Cell::new(CardId::new(3), PlayerId::new(4)), Primary::Has)
//!     .unwrap();
//! assert_eq!(report.changes().len(), 6);
//! ```

pub mod cascade;
pub mod constraint;
pub mod history;
pub mod predicates;
mod rule;
pub mod rules;
pub mod sheet;
pub mod shown_to;

pub use self::{
    cascade::{Cascade, CascadeEvent, CascadeReport, ChangeSource, MarkChange, RuleEngine},
    constraint::{Constraint, is_constraint_required},
    history::SheetHistory,
    predicates::{is_murder_item, murder_items},
    rules::{AutoRule, AutoRulesConfig},
    sheet::{EditBlockReason, EditOperation, Sheet, SheetConfig, SheetState},
    shown_to::ShownTo,
};
