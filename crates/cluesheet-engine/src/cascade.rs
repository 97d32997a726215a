//! The cascade engine.
//!
//! A cascade starts from one user or setup event and applies the automation
//! rules until no rule has anything left to do. Pending events sit on an
//! explicit worklist; writes are staged in an overlay and committed to the
//! [`Grid`] as one batch, so nobody observes a half-finished cascade.
//!
//! Termination: every automated write moves an unsettled cell (`empty` or
//! `bars`) to `has` or `not`, and no rule ever writes a settled cell, so a
//! cascade performs at most one automated write per cell.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use cluesheet_core::{CardId, Cell, Grid, Mark, MarkKey, PlayerId, Primary};

use crate::{
    AutoRule, AutoRulesConfig,
    rule::{last_maybe, row_elimination, setup},
};

/// An event that may trigger further automated writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeEvent {
    /// A cell's primary became `has`.
    MarkedHas(Cell),
    /// A cell's primary became `not`.
    MarkedNot(Cell),
}

/// Where a write in a cascade came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ChangeSource {
    /// The edit that started the cascade.
    Trigger,
    /// Setup confirmation.
    Setup,
    /// An automation rule.
    Rule(AutoRule),
}

/// One write performed by a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkChange {
    /// The cell written.
    pub cell: Cell,
    /// The mark before the write.
    pub before: Mark,
    /// The mark after the write.
    pub after: Mark,
    /// What caused the write.
    pub source: ChangeSource,
}

/// The writes a cascade committed, in the order they were made.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    changes: Vec<MarkChange>,
}

impl CascadeReport {
    /// Returns every write.
    #[must_use]
    pub fn changes(&self) -> &[MarkChange] {
        &self.changes
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the writes made by `rule`.
    pub fn by_rule(&self, rule: AutoRule) -> impl Iterator<Item = &MarkChange> {
        self.changes
            .iter()
            .filter(move |change| change.source == ChangeSource::Rule(rule))
    }

    /// Returns the cells the automation rules resolved to `has`.
    #[must_use]
    pub fn deduced_has(&self) -> Vec<Cell> {
        self.changes
            .iter()
            .filter(|change| change.source.is_rule() && change.after.primary().is_has())
            .map(|change| change.cell)
            .collect()
    }
}

/// Read access to a grid with a cascade's staged writes laid over it.
#[derive(Debug)]
pub(crate) struct CascadeView<'a> {
    grid: &'a Grid,
    pending: &'a BTreeMap<Cell, Mark>,
}

impl<'a> CascadeView<'a> {
    pub(crate) fn new(grid: &'a Grid, pending: &'a BTreeMap<Cell, Mark>) -> Self {
        Self { grid, pending }
    }

    pub(crate) fn mark(&self, cell: Cell) -> Mark {
        self.pending
            .get(&cell)
            .copied()
            .unwrap_or_else(|| self.grid.mark(cell))
    }

    /// Cards of `player`'s column whose current mark carries number `key`.
    pub(crate) fn cards_with_number(&self, player: PlayerId, key: MarkKey) -> BTreeSet<CardId> {
        let staged = self
            .pending
            .keys()
            .filter(|cell| cell.player == player)
            .map(|cell| cell.card);
        self.grid
            .cards_with_number(player, key)
            .into_iter()
            .chain(staged)
            .filter(|card| self.mark(Cell::new(*card, player)).has_number(key))
            .collect()
    }
}

/// A cascade in progress against one grid.
#[derive(Debug)]
pub struct Cascade<'a> {
    grid: &'a mut Grid,
    rules: AutoRulesConfig,
    players: Vec<PlayerId>,
    pending: BTreeMap<Cell, Mark>,
    queue: VecDeque<CascadeEvent>,
    changes: Vec<MarkChange>,
}

impl<'a> Cascade<'a> {
    /// Starts a cascade over the first `player_count` columns of `grid`.
    #[must_use]
    pub fn new(grid: &'a mut Grid, rules: AutoRulesConfig, player_count: u8) -> Self {
        Self {
            grid,
            rules,
            players: PlayerId::first(player_count).collect(),
            pending: BTreeMap::new(),
            queue: VecDeque::new(),
            changes: Vec::new(),
        }
    }

    pub(crate) fn view(&self) -> CascadeView<'_> {
        CascadeView::new(self.grid, &self.pending)
    }

    /// Returns the current mark of `cell`, including staged writes.
    #[must_use]
    pub fn mark(&self, cell: Cell) -> Mark {
        self.view().mark(cell)
    }

    /// Stages a write. Writes that leave the mark unchanged are dropped.
    pub fn write(&mut self, cell: Cell, after: Mark, source: ChangeSource) {
        let before = self.mark(cell);
        if before == after {
            return;
        }
        log::trace!("{source:?}: {cell} {before} -> {after}");
        self.pending.insert(cell, after);
        self.changes.push(MarkChange {
            cell,
            before,
            after,
            source,
        });
    }

    /// Queues an event for the rules to react to.
    pub fn push(&mut self, event: CascadeEvent) {
        self.queue.push_back(event);
    }

    /// Processes queued events until the worklist is empty.
    pub fn run(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            self.step(event);
        }
    }

    /// Processes a single queued event, returning `false` if there was none.
    pub fn step_once(&mut self) -> bool {
        match self.queue.pop_front() {
            Some(event) => {
                self.step(event);
                true
            }
            None => false,
        }
    }

    fn step(&mut self, event: CascadeEvent) {
        match event {
            CascadeEvent::MarkedHas(cell) => {
                if !self.rules.row_elimination {
                    return;
                }
                let writes = row_elimination::eliminate(&self.view(), cell, &self.players);
                log::debug!(
                    "{}: {cell} has, {} cell(s) marked not",
                    AutoRule::RowElimination,
                    writes.len()
                );
                for (target, mark) in writes {
                    self.write(target, mark, ChangeSource::Rule(AutoRule::RowElimination));
                }
            }
            CascadeEvent::MarkedNot(cell) => {
                if !self.rules.last_maybe_deduction {
                    return;
                }
                let resolved = last_maybe::deduce(&self.view(), cell);
                log::debug!(
                    "{}: {cell} not, {} cell(s) resolved",
                    AutoRule::LastMaybeDeduction,
                    resolved.len()
                );
                for target in resolved {
                    let mark = self.mark(target).with_primary(Primary::Has);
                    self.write(target, mark, ChangeSource::Rule(AutoRule::LastMaybeDeduction));
                    self.push(CascadeEvent::MarkedHas(target));
                }
            }
        }
    }

    /// Returns the number of events still queued.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Applies every staged write to the grid as one batch.
    #[must_use]
    pub fn commit(self) -> CascadeReport {
        self.grid.apply(self.pending);
        CascadeReport {
            changes: self.changes,
        }
    }
}

/// Entry points for the four cascade triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEngine {
    rules: AutoRulesConfig,
    player_count: u8,
}

impl RuleEngine {
    /// Creates an engine for `player_count` active columns.
    #[must_use]
    pub const fn new(rules: AutoRulesConfig, player_count: u8) -> Self {
        Self {
            rules,
            player_count,
        }
    }

    /// Returns the rule configuration.
    #[must_use]
    pub const fn rules(&self) -> AutoRulesConfig {
        self.rules
    }

    /// Sets `cell` to `has`, keeping its markers, and runs the cascade.
    pub fn mark_has(&self, grid: &mut Grid, cell: Cell) -> CascadeReport {
        let mut cascade = Cascade::new(grid, self.rules, self.player_count);
        let mark = cascade.mark(cell).with_primary(Primary::Has);
        cascade.write(cell, mark, ChangeSource::Trigger);
        cascade.push(CascadeEvent::MarkedHas(cell));
        cascade.run();
        cascade.commit()
    }

    /// Sets `cell` to `not`, keeping its markers, and runs the cascade.
    pub fn mark_not(&self, grid: &mut Grid, cell: Cell) -> CascadeReport {
        let mut cascade = Cascade::new(grid, self.rules, self.player_count);
        let mark = cascade.mark(cell).with_primary(Primary::Not);
        cascade.write(cell, mark, ChangeSource::Trigger);
        cascade.push(CascadeEvent::MarkedNot(cell));
        cascade.run();
        cascade.commit()
    }

    /// Marks every active cell of the public cards' rows `not`, discarding
    /// whatever markers they carried.
    pub fn confirm_public_cards(&self, grid: &mut Grid, public: &[CardId]) -> CascadeReport {
        let mut cascade = Cascade::new(grid, self.rules, self.player_count);
        setup::confirm_public(&mut cascade, public);
        log::info!("confirmed {} public card(s)", public.len());
        cascade.commit()
    }

    /// Marks the owner's cards `has` for the owner and `not` for everyone else,
    /// and marks every other non-public card `not` in the owner's column.
    pub fn confirm_owner_cards(
        &self,
        grid: &mut Grid,
        all_cards: &[CardId],
        owned: &[CardId],
        public: &[CardId],
    ) -> CascadeReport {
        let mut cascade = Cascade::new(grid, self.rules, self.player_count);
        setup::confirm_owner(&mut cascade, all_cards, owned, public);
        log::info!("confirmed {} owner card(s)", owned.len());
        cascade.commit()
    }

    /// Returns the number of active player columns.
    #[must_use]
    pub const fn player_count(&self) -> u8 {
        self.player_count
    }
}

impl Cascade<'_> {
    pub(crate) fn players(&self) -> &[PlayerId] {
        &self.players
    }
}

#[cfg(test)]
mod tests {
    use cluesheet_core::KeySet;
    use proptest::prelude::*;

    use super::*;

    fn cell(card: u16, player: u8) -> Cell {
        Cell::new(CardId::new(card), PlayerId::new(player))
    }

    fn numbered(key: u8) -> Mark {
        Mark::EMPTY.toggle_number(MarkKey::from_value(key))
    }

    const ROW_ONLY: AutoRulesConfig = AutoRulesConfig {
        row_elimination: true,
        last_maybe_deduction: false,
    };
    const MAYBE_ONLY: AutoRulesConfig = AutoRulesConfig {
        row_elimination: false,
        last_maybe_deduction: true,
    };

    #[test]
    fn test_row_elimination_marks_rest_of_row() {
        let mut grid = Grid::new();
        let engine = RuleEngine::new(ROW_ONLY, 6);
        let report = engine.mark_has(&mut grid, cell(3, 2));

        assert_eq!(grid.mark(cell(3, 2)).primary(), Primary::Has);
        for player in [1, 3, 4, 5, 6] {
            assert_eq!(grid.mark(cell(3, player)).primary(), Primary::Not);
        }
        assert_eq!(report.by_rule(AutoRule::RowElimination).count(), 5);
        assert!(report.changes()[0].source.is_trigger());
    }

    #[test]
    fn test_row_elimination_preserves_settled_cells() {
        let mut grid = Grid::new();
        grid.set(cell(3, 4), Mark::HAS);
        RuleEngine::new(ROW_ONLY, 6).mark_has(&mut grid, cell(3, 2));

        assert_eq!(grid.mark(cell(3, 4)), Mark::HAS);
        assert_eq!(grid.mark(cell(3, 2)).primary(), Primary::Has);
        for player in [1, 3, 5, 6] {
            assert_eq!(grid.mark(cell(3, player)).primary(), Primary::Not);
        }
    }

    #[test]
    fn test_row_elimination_keeps_markers() {
        let mut grid = Grid::new();
        let bars = Mark::new(Primary::Bars, KeySet::EMPTY, KeySet::FULL).toggle_number(MarkKey::K1);
        grid.set(cell(1, 5), bars);
        RuleEngine::new(ROW_ONLY, 6).mark_has(&mut grid, cell(1, 2));

        let after = grid.mark(cell(1, 5));
        assert_eq!(after.primary(), Primary::Not);
        assert!(after.has_number(MarkKey::K1));
    }

    #[test]
    fn test_row_elimination_respects_player_count() {
        let mut grid = Grid::new();
        RuleEngine::new(ROW_ONLY, 3).mark_has(&mut grid, cell(1, 1));
        assert_eq!(grid.mark(cell(1, 3)).primary(), Primary::Not);
        assert!(grid.mark(cell(1, 4)).is_empty());
    }

    #[test]
    fn test_disabled_rules_only_write_trigger() {
        let mut grid = Grid::new();
        let report = RuleEngine::new(AutoRulesConfig::default(), 6).mark_has(&mut grid, cell(1, 2));
        assert_eq!(report.changes().len(), 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_last_maybe_resolves_single_candidate() {
        let mut grid = Grid::new();
        for card in [1, 2, 3] {
            grid.set(cell(card, 3), numbered(2));
        }
        let engine = RuleEngine::new(MAYBE_ONLY, 6);

        let report = engine.mark_not(&mut grid, cell(1, 3));
        assert!(report.deduced_has().is_empty());
        assert_eq!(grid.mark(cell(2, 3)).primary(), Primary::Empty);
        assert_eq!(grid.mark(cell(3, 3)).primary(), Primary::Empty);

        let report = engine.mark_not(&mut grid, cell(2, 3));
        assert_eq!(report.deduced_has(), vec![cell(3, 3)]);
        assert_eq!(grid.mark(cell(3, 3)), numbered(2).with_primary(Primary::Has));
    }

    #[test]
    fn test_last_maybe_skips_resolved_group() {
        let mut grid = Grid::new();
        grid.set(cell(1, 3), numbered(2));
        grid.set(cell(2, 3), numbered(2));
        grid.set(cell(3, 3), numbered(2).with_primary(Primary::Has));

        let report = RuleEngine::new(MAYBE_ONLY, 6).mark_not(&mut grid, cell(1, 3));
        assert!(report.deduced_has().is_empty());
        assert_eq!(grid.mark(cell(2, 3)).primary(), Primary::Empty);
    }

    #[test]
    fn test_last_maybe_without_numbers_does_nothing() {
        let mut grid = Grid::new();
        grid.set(cell(2, 3), numbered(1));
        let report = RuleEngine::new(MAYBE_ONLY, 6).mark_not(&mut grid, cell(1, 3));
        assert_eq!(report.changes().len(), 1);
        assert_eq!(grid.mark(cell(2, 3)), numbered(1));
    }

    #[test]
    fn test_last_maybe_chains_into_row_elimination() {
        let mut grid = Grid::new();
        grid.set(cell(5, 4), numbered(1));
        grid.set(cell(9, 4), numbered(1));
        grid.set(cell(9, 2), Mark::HAS);

        let report =
            RuleEngine::new(AutoRulesConfig::ALL_ENABLED, 6).mark_not(&mut grid, cell(5, 4));

        assert_eq!(report.deduced_has(), vec![cell(9, 4)]);
        assert_eq!(grid.mark(cell(9, 4)).primary(), Primary::Has);
        assert_eq!(grid.mark(cell(9, 2)), Mark::HAS);
        for player in [1, 3, 5, 6] {
            assert_eq!(grid.mark(cell(9, player)).primary(), Primary::Not);
        }
    }

    #[test]
    fn test_last_maybe_resolves_every_group_of_the_cell() {
        let mut grid = Grid::new();
        let first = numbered(1)
            .toggle_number(MarkKey::K2)
            .toggle_number(MarkKey::K3);
        grid.set(cell(1, 3), first);
        for (card, key) in [(2, 1), (3, 2), (4, 3)] {
            grid.set(cell(card, 3), numbered(key));
        }

        let report =
            RuleEngine::new(AutoRulesConfig::ALL_ENABLED, 6).mark_not(&mut grid, cell(1, 3));

        assert_eq!(
            report.deduced_has(),
            vec![cell(2, 3), cell(3, 3), cell(4, 3)]
        );
        assert_eq!(report.by_rule(AutoRule::RowElimination).count(), 15);
        for card in 2..=4 {
            assert_eq!(grid.mark(cell(card, 1)).primary(), Primary::Not);
        }
    }

    #[test]
    fn test_row_elimination_does_not_trigger_deduction() {
        let mut grid = Grid::new();
        grid.set(cell(1, 3), numbered(1));
        grid.set(cell(2, 3), numbered(1));

        RuleEngine::new(AutoRulesConfig::ALL_ENABLED, 6).mark_has(&mut grid, cell(1, 2));

        assert_eq!(grid.mark(cell(1, 3)).primary(), Primary::Not);
        assert_eq!(grid.mark(cell(2, 3)), numbered(1));
    }

    #[test]
    fn test_step_once_exposes_partial_cascade() {
        let mut grid = Grid::new();
        grid.set(cell(1, 3), numbered(3));
        grid.set(cell(2, 3), numbered(3));

        let mut cascade = Cascade::new(&mut grid, AutoRulesConfig::ALL_ENABLED, 6);
        let mark = cascade.mark(cell(1, 3)).with_primary(Primary::Not);
        cascade.write(cell(1, 3), mark, ChangeSource::Trigger);
        cascade.push(CascadeEvent::MarkedNot(cell(1, 3)));

        assert!(cascade.step_once());
        assert_eq!(cascade.mark(cell(2, 3)).primary(), Primary::Has);
        assert_eq!(cascade.pending_events(), 1);
        assert!(cascade.mark(cell(2, 1)).is_empty());

        assert!(cascade.step_once());
        assert!(!cascade.step_once());
        assert_eq!(cascade.mark(cell(2, 1)).primary(), Primary::Not);

        let report = cascade.commit();
        assert_eq!(report.by_rule(AutoRule::RowElimination).count(), 5);
        assert_eq!(grid.mark(cell(2, 3)).primary(), Primary::Has);
    }

    #[test]
    fn test_view_sees_staged_numbers() {
        let mut grid = Grid::new();
        grid.set(cell(1, 2), numbered(4));
        let mut cascade = Cascade::new(&mut grid, AutoRulesConfig::default(), 6);
        cascade.write(cell(2, 2), numbered(4), ChangeSource::Trigger);
        cascade.write(cell(1, 2), Mark::EMPTY, ChangeSource::Trigger);

        let cards = cascade.view().cards_with_number(PlayerId::new(2), MarkKey::K4);
        assert_eq!(cards.into_iter().collect::<Vec<_>>(), vec![CardId::new(2)]);
    }

    proptest! {
        #[test]
        fn prop_cascades_never_overwrite_settled_cells(
            seed in prop::collection::vec((1u16..=8, 1u8..=6, 0usize..4, 0u8..=2), 0..40),
            target in (1u16..=8, 1u8..=6),
            has in any::<bool>(),
        ) {
            let mut grid = Grid::new();
            for (card, player, primary, number) in seed {
                let mut mark = Mark::EMPTY.with_primary(Primary::ALL[primary]);
                if let Ok(key) = MarkKey::try_from(number) {
                    mark = mark.toggle_number(key);
                }
                grid.set(cell(card, player), mark);
            }
            let before = grid.clone();
            let trigger = cell(target.0, target.1);

            let engine = RuleEngine::new(AutoRulesConfig::ALL_ENABLED, 6);
            let report = if has {
                engine.mark_has(&mut grid, trigger)
            } else {
                engine.mark_not(&mut grid, trigger)
            };

            for change in report.changes() {
                if change.source.is_rule() {
                    prop_assert!(!before.mark(change.cell).primary().is_settled());
                    prop_assert!(change.after.primary().is_settled());
                    prop_assert_eq!(change.after.numbers(), change.before.numbers());
                }
            }
            let automated: BTreeSet<Cell> = report
                .changes()
                .iter()
                .filter(|change| change.source.is_rule())
                .map(|change| change.cell)
                .collect();
            prop_assert_eq!(
                automated.len(),
                report.changes().iter().filter(|c| c.source.is_rule()).count()
            );
        }
    }
}
