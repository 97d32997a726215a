//! Undo/redo of whole-sheet snapshots.
//!
//! Snapshots record the game, not the session settings: the automation rules
//! in force when a snapshot is restored are the ones the sheet has at that
//! moment, so switching a rule on never gets undone along with a mark.

use std::collections::VecDeque;

use crate::{AutoRulesConfig, Sheet, SheetState};

/// Bounded undo/redo history of a [`Sheet`].
///
/// Holds the current snapshot, the snapshots before it, and the snapshots
/// undone since the last change. Recording a new snapshot forgets the undone
/// ones; at capacity the oldest snapshot is forgotten.
///
/// # Examples
///
/// ```
/// use cluesheet_core::{CardId, Cell, PlayerId, Primary};
/// use cluesheet_engine::{Sheet, SheetHistory};
///
/// let mut sheet = Sheet::default();
/// let mut history = SheetHistory::default();
/// history.push(&sheet);
///
/// let cell = Cell::new(CardId::new(3), PlayerId::new(2));
/// sheet.set_primary(cell, Primary::Has).unwrap();
/// history.record(&sheet);
///
/// assert!(history.undo(&mut sheet));
/// assert!(sheet.mark(cell).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SheetHistory {
    past: VecDeque<SheetState>,
    current: Option<SheetState>,
    undone: Vec<SheetState>,
    capacity: usize,
}

impl Default for SheetHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl SheetHistory {
    /// Number of snapshots kept by [`SheetHistory::default`].
    pub const DEFAULT_CAPACITY: usize = 200;

    /// Creates an empty history keeping at most `capacity` snapshots, the
    /// current one included. A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            current: None,
            undone: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns the maximum number of snapshots kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of snapshots kept, including undone ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len() + usize::from(self.current.is_some()) + self.undone.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Records the state of `sheet` as the current snapshot.
    pub fn push(&mut self, sheet: &Sheet) {
        let snapshot = Self::snapshot(sheet);
        self.undone.clear();
        if let Some(previous) = self.current.replace(snapshot) {
            self.past.push_back(previous);
        }
        while self.past.len() + 1 > self.capacity {
            self.past.pop_front();
        }
    }

    /// Records the state of `sheet` unless it matches the current snapshot.
    /// Returns whether a snapshot was recorded.
    pub fn record(&mut self, sheet: &Sheet) -> bool {
        if self.current.as_ref() == Some(&Self::snapshot(sheet)) {
            return false;
        }
        self.push(sheet);
        true
    }

    /// Returns `true` if there is an earlier snapshot.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns `true` if there is an undone snapshot to return to.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Restores the previous snapshot into `sheet`, keeping its rules.
    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self, sheet: &mut Sheet) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        if let Some(current) = self.current.replace(previous) {
            self.undone.push(current);
        }
        self.restore(sheet);
        true
    }

    /// Restores the most recently undone snapshot into `sheet`, keeping its
    /// rules. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, sheet: &mut Sheet) -> bool {
        let Some(next) = self.undone.pop() else {
            return false;
        };
        if let Some(current) = self.current.replace(next) {
            self.past.push_back(current);
        }
        self.restore(sheet);
        true
    }

    /// Forgets every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.current = None;
        self.undone.clear();
    }

    fn snapshot(sheet: &Sheet) -> SheetState {
        let mut state = sheet.to_state();
        state.config.rules = AutoRulesConfig::default();
        state
    }

    fn restore(&self, sheet: &mut Sheet) {
        if let Some(state) = &self.current {
            let rules = sheet.config().rules;
            *sheet = Sheet::from_state(state.clone());
            sheet.set_rules(rules);
            log::debug!("restored snapshot, {} earlier", self.past.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use cluesheet_core::{CardId, Cell, PlayerId, Primary};

    use super::*;

    fn cell(card: u16, player: u8) -> Cell {
        Cell::new(CardId::new(card), PlayerId::new(player))
    }

    fn history_of(sheet: &mut Sheet, history: &mut SheetHistory, cards: &[u16]) {
        history.push(sheet);
        for card in cards {
            sheet.set_primary(cell(*card, 2), Primary::Not).unwrap();
            history.record(sheet);
        }
    }

    #[test]
    fn test_undo_and_redo_restore_marks() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::default();
        history_of(&mut sheet, &mut history, &[1, 2]);

        assert!(history.undo(&mut sheet));
        assert!(sheet.mark(cell(2, 2)).is_empty());
        assert_eq!(sheet.mark(cell(1, 2)).primary(), Primary::Not);
        assert!(history.undo(&mut sheet));
        assert!(sheet.grid().is_empty());
        assert!(!history.undo(&mut sheet));

        assert!(history.redo(&mut sheet));
        assert!(history.redo(&mut sheet));
        assert_eq!(sheet.mark(cell(2, 2)).primary(), Primary::Not);
        assert!(!history.redo(&mut sheet));
    }

    #[test]
    fn test_record_after_undo_drops_redo_branch() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::default();
        history_of(&mut sheet, &mut history, &[1, 2]);

        assert!(history.undo(&mut sheet));
        sheet.set_primary(cell(5, 3), Primary::Has).unwrap();
        assert!(history.record(&sheet));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert!(history.undo(&mut sheet));
        assert_eq!(sheet.mark(cell(1, 2)).primary(), Primary::Not);
        assert!(sheet.mark(cell(5, 3)).is_empty());
    }

    #[test]
    fn test_record_skips_unchanged_sheet() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::default();
        history.push(&sheet);
        assert!(!history.record(&sheet));

        sheet.set_rules(AutoRulesConfig::ALL_ENABLED);
        assert!(!history.record(&sheet));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_capacity_forgets_oldest() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::new(3);
        history_of(&mut sheet, &mut history, &[1, 2, 3]);

        assert_eq!(history.len(), 3);
        assert!(history.undo(&mut sheet));
        assert!(history.undo(&mut sheet));
        assert!(!history.can_undo());
        assert_eq!(sheet.mark(cell(1, 2)).primary(), Primary::Not);
        assert!(sheet.mark(cell(2, 2)).is_empty());
    }

    #[test]
    fn test_restore_keeps_current_rules() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::default();
        history_of(&mut sheet, &mut history, &[4]);

        sheet.set_rules(AutoRulesConfig::ALL_ENABLED);
        assert!(history.undo(&mut sheet));
        assert_eq!(sheet.config().rules, AutoRulesConfig::ALL_ENABLED);
        assert!(sheet.grid().is_empty());
    }

    #[test]
    fn test_empty_history() {
        let mut sheet = Sheet::default();
        let mut history = SheetHistory::new(0);

        assert_eq!(history.capacity(), 1);
        assert_eq!(SheetHistory::default().capacity(), 200);
        assert!(history.is_empty());
        assert!(!history.undo(&mut sheet));
        assert!(!history.redo(&mut sheet));

        history.push(&sheet);
        assert!(!history.is_empty());
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }
}
