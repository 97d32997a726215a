//! The sheet session: one game's grid, setup lists and shown-to record.
//!
//! Manual edits are validated here before the cascade runs. Cards listed as
//! public or owned are locked against edits until they leave their list.

use cluesheet_core::{CardId, Cell, Grid, Mark, MarkKey, PlayerId, Primary, Theme};
use serde::{Deserialize, Serialize};

use crate::{
    AutoRulesConfig, Cascade, CascadeReport, ChangeSource, Constraint, RuleEngine, ShownTo,
    predicates, rule::setup,
};

/// Session-wide settings of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    /// The card set in play.
    pub theme: Theme,
    /// Number of player columns in use, including the owner.
    pub player_count: u8,
    /// Optional automation rules.
    pub rules: AutoRulesConfig,
}

impl SheetConfig {
    /// The smallest supported number of players.
    pub const MIN_PLAYERS: u8 = 2;

    fn normalized(mut self) -> Self {
        self.player_count = self
            .player_count
            .clamp(Self::MIN_PLAYERS, PlayerId::MAX_PLAYERS);
        self
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            player_count: PlayerId::MAX_PLAYERS,
            rules: AutoRulesConfig::default(),
        }
    }
}

/// What a manual edit does to its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EditOperation {
    /// The edit adds or sets something.
    Set,
    /// The edit removes something.
    Removed,
    /// The edit changes nothing.
    NoOp,
}

/// Why a manual edit is not allowed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum EditBlockReason {
    /// The card row was locked by setup.
    #[display("card {_0} is locked by setup")]
    LockedCard(#[error(not(source))] CardId),
    /// The card is not part of the sheet's theme.
    #[display("card {_0} is not part of this theme")]
    UnknownCard(#[error(not(source))] CardId),
    /// The player column is beyond the configured player count.
    #[display("player {_0} is not in this game")]
    InactivePlayer(#[error(not(source))] PlayerId),
    /// Numbers may only be added to `empty` or `bars` cells.
    #[display("numbers can only be added to empty or bar cells")]
    NumberOnSettledCell,
    /// Shown-to tracking only applies to the owner's cards.
    #[display("card {_0} is not in the owner's hand")]
    NotOwnedCard(#[error(not(source))] CardId),
    /// Cards can only be shown to opponents.
    #[display("player {_0} is not an opponent")]
    NotAnOpponent(#[error(not(source))] PlayerId),
}

/// A complete, serializable snapshot of a [`Sheet`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetState {
    /// Session settings.
    pub config: SheetConfig,
    /// Every stored mark.
    pub grid: Grid,
    /// Cards confirmed as public.
    pub public_cards: Vec<CardId>,
    /// Cards confirmed as the owner's hand.
    pub owner_cards: Vec<CardId>,
    /// Opponents each owned card was shown to.
    pub shown_to: ShownTo,
}

/// A deduction sheet session.
///
/// Owns the grid and every piece of state around it. All mutation goes
/// through the methods here; manual edits are validated and then handed to
/// the [`RuleEngine`] so that the enabled automation rules run.
///
/// # Example
///
/// ```
/// use cluesheet_core::{Cell, PlayerId, Primary, Theme};
/// use cluesheet_engine::{AutoRulesConfig, Sheet, SheetConfig};
///
/// let mut sheet = Sheet::new(SheetConfig {
///     rules: AutoRulesConfig::ALL_ENABLED,
///     ..SheetConfig::default()
/// });
/// let rope = Theme::Classic.find_by_name("Rope").unwrap().id;
///
/// sheet.set_primary(Cell::new(rope, PlayerId::new(2)), Primary::Has).unwrap();
/// assert_eq!(sheet.mark(Cell::new(rope, PlayerId::OWNER)).primary(), Primary::Not);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    config: SheetConfig,
    cards: Vec<CardId>,
    grid: Grid,
    public_cards: Vec<CardId>,
    owner_cards: Vec<CardId>,
    shown_to: ShownTo,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl Sheet {
    /// Creates an empty sheet.
    ///
    /// The player count is clamped to `2..=6`.
    #[must_use]
    pub fn new(config: SheetConfig) -> Self {
        let config = config.normalized();
        Self {
            config,
            cards: config.theme.card_ids(),
            grid: Grid::new(),
            public_cards: Vec::new(),
            owner_cards: Vec::new(),
            shown_to: ShownTo::new(),
        }
    }

    /// Restores a sheet from a snapshot.
    #[must_use]
    pub fn from_state(state: SheetState) -> Self {
        let SheetState {
            config,
            grid,
            public_cards,
            owner_cards,
            shown_to,
        } = state;
        let mut sheet = Self::new(config);
        sheet.grid = grid;
        sheet.public_cards = sheet.known_cards(&public_cards);
        sheet.owner_cards = sheet.known_cards(&owner_cards);
        sheet.shown_to = shown_to;
        let owned = sheet.owner_cards.clone();
        let player_count = sheet.config.player_count;
        sheet.shown_to.retain(|card, player| {
            owned.contains(&card) && !player.is_owner() && player.get() <= player_count
        });
        sheet
    }

    /// Takes a snapshot of the sheet.
    #[must_use]
    pub fn to_state(&self) -> SheetState {
        SheetState {
            config: self.config,
            grid: self.grid.clone(),
            public_cards: self.public_cards.clone(),
            owner_cards: self.owner_cards.clone(),
            shown_to: self.shown_to.clone(),
        }
    }

    /// Returns the session settings.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Replaces the automation rule configuration.
    pub fn set_rules(&mut self, rules: AutoRulesConfig) {
        self.config.rules = rules;
    }

    /// Returns the card ids of the theme, in catalog order.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Returns the active player columns.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + Clone {
        PlayerId::first(self.config.player_count)
    }

    /// Returns the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the mark of `cell`.
    #[must_use]
    pub fn mark(&self, cell: Cell) -> Mark {
        self.grid.mark(cell)
    }

    /// Returns the confirmed public cards.
    #[must_use]
    pub fn public_cards(&self) -> &[CardId] {
        &self.public_cards
    }

    /// Returns the confirmed owner cards.
    #[must_use]
    pub fn owner_cards(&self) -> &[CardId] {
        &self.owner_cards
    }

    /// Returns `true` if setup locked the row of `card`.
    #[must_use]
    pub fn is_locked(&self, card: CardId) -> bool {
        self.public_cards.contains(&card) || self.owner_cards.contains(&card)
    }

    fn locked_cards(&self) -> Vec<CardId> {
        self.public_cards
            .iter()
            .chain(&self.owner_cards)
            .copied()
            .collect()
    }

    fn known_cards(&self, cards: &[CardId]) -> Vec<CardId> {
        let mut known = Vec::with_capacity(cards.len());
        for card in cards {
            if !self.cards.contains(card) {
                log::warn!("ignoring card {card}: not part of theme {}", self.config.theme);
            } else if !known.contains(card) {
                known.push(*card);
            }
        }
        known
    }

    fn engine(&self) -> RuleEngine {
        RuleEngine::new(self.config.rules, self.config.player_count)
    }

    fn check_cell(&self, cell: Cell) -> Result<(), EditBlockReason> {
        if !self.cards.contains(&cell.card) {
            return Err(EditBlockReason::UnknownCard(cell.card));
        }
        if cell.player.get() > self.config.player_count {
            return Err(EditBlockReason::InactivePlayer(cell.player));
        }
        if self.is_locked(cell.card) {
            return Err(EditBlockReason::LockedCard(cell.card));
        }
        Ok(())
    }

    fn denied<T>(cell: Cell, reason: EditBlockReason) -> Result<T, EditBlockReason> {
        log::debug!("edit of {cell} denied: {reason}");
        Err(reason)
    }

    /// Returns what setting the primary of `cell` would do.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited.
    pub fn set_primary_capability(
        &self,
        cell: Cell,
        primary: Primary,
    ) -> Result<EditOperation, EditBlockReason> {
        self.check_cell(cell)?;
        let current = self.mark(cell).primary();
        Ok(if current == primary {
            EditOperation::NoOp
        } else if primary.is_empty() {
            EditOperation::Removed
        } else {
            EditOperation::Set
        })
    }

    /// Sets the primary of `cell`, keeping its numbers, and runs the
    /// automation rules that react to it.
    ///
    /// `has` triggers row elimination and `not` triggers last-maybe deduction
    /// when those rules are enabled. `empty` and `bars` are plain writes.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited.
    pub fn set_primary(
        &mut self,
        cell: Cell,
        primary: Primary,
    ) -> Result<CascadeReport, EditBlockReason> {
        if let Err(reason) = self.check_cell(cell) {
            return Self::denied(cell, reason);
        }
        let engine = self.engine();
        let report = match primary {
            Primary::Has => engine.mark_has(&mut self.grid, cell),
            Primary::Not => engine.mark_not(&mut self.grid, cell),
            Primary::Empty | Primary::Bars => {
                let mut cascade =
                    Cascade::new(&mut self.grid, engine.rules(), engine.player_count());
                let mark = cascade.mark(cell).with_primary(primary);
                cascade.write(cell, mark, ChangeSource::Trigger);
                cascade.commit()
            }
        };
        Ok(report)
    }

    /// Returns what toggling number `key` on `cell` would do.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited, or if
    /// [`Constraint::NumbersOnlyOnEmptyOrBars`] is enforced and the cell is
    /// already `has` or `not`.
    pub fn toggle_number_capability(
        &self,
        cell: Cell,
        key: MarkKey,
    ) -> Result<EditOperation, EditBlockReason> {
        self.check_cell(cell)?;
        let mark = self.mark(cell);
        if mark.has_number(key) {
            return Ok(EditOperation::Removed);
        }
        if Constraint::NumbersOnlyOnEmptyOrBars.is_required(&self.config.rules)
            && mark.primary().is_settled()
        {
            return Err(EditBlockReason::NumberOnSettledCell);
        }
        Ok(EditOperation::Set)
    }

    /// Toggles number `key` on `cell`.
    ///
    /// While [`Constraint::NumberToggleRemovesFromColumn`] is enforced,
    /// removing a number removes it from the whole column.
    ///
    /// # Errors
    ///
    /// See [`Sheet::toggle_number_capability`].
    pub fn toggle_number(
        &mut self,
        cell: Cell,
        key: MarkKey,
    ) -> Result<EditOperation, EditBlockReason> {
        let operation = match self.toggle_number_capability(cell, key) {
            Ok(operation) => operation,
            Err(reason) => return Self::denied(cell, reason),
        };
        match operation {
            EditOperation::Removed
                if Constraint::NumberToggleRemovesFromColumn.is_required(&self.config.rules) =>
            {
                let writes = self.column_number_removals(cell.player, key);
                log::debug!(
                    "removing number {key} from {} cell(s) of player {}",
                    writes.len(),
                    cell.player
                );
                self.grid.apply(writes);
            }
            EditOperation::Set | EditOperation::Removed => {
                let mark = self.mark(cell).toggle_number(key);
                self.grid.set(cell, mark);
            }
            EditOperation::NoOp => {}
        }
        Ok(operation)
    }

    /// Returns the writes that remove number `key` from every unlocked cell
    /// of `player`'s column.
    fn column_number_removals(&self, player: PlayerId, key: MarkKey) -> Vec<(Cell, Mark)> {
        self.grid
            .cards_with_number(player, key)
            .into_iter()
            .filter(|card| !self.is_locked(*card))
            .map(|card| Cell::new(card, player))
            .map(|target| (target, self.grid.mark(target).without_number(key)))
            .collect()
    }

    /// Toggles bar color `key` on `cell`.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited.
    pub fn toggle_bar_color(
        &mut self,
        cell: Cell,
        key: MarkKey,
    ) -> Result<EditOperation, EditBlockReason> {
        if let Err(reason) = self.check_cell(cell) {
            return Self::denied(cell, reason);
        }
        let mark = self.mark(cell).toggle_bar_color(key);
        self.grid.set(cell, mark);
        Ok(if mark.bar_colors().contains(key) {
            EditOperation::Set
        } else {
            EditOperation::Removed
        })
    }

    /// Removes every number from `cell`.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited.
    pub fn clear_numbers(&mut self, cell: Cell) -> Result<EditOperation, EditBlockReason> {
        if let Err(reason) = self.check_cell(cell) {
            return Self::denied(cell, reason);
        }
        let mark = self.mark(cell);
        if mark.numbers().is_empty() {
            return Ok(EditOperation::NoOp);
        }
        self.grid.set(cell, mark.without_numbers());
        Ok(EditOperation::Removed)
    }

    /// Resets `cell` to the canonical empty mark.
    ///
    /// # Errors
    ///
    /// Returns an [`EditBlockReason`] if the cell cannot be edited.
    pub fn clear_cell(&mut self, cell: Cell) -> Result<EditOperation, EditBlockReason> {
        if let Err(reason) = self.check_cell(cell) {
            return Self::denied(cell, reason);
        }
        if self.grid.set(cell, Mark::EMPTY).is_empty() {
            Ok(EditOperation::NoOp)
        } else {
            Ok(EditOperation::Removed)
        }
    }

    /// Confirms the public cards, locking their rows as `not` everywhere.
    ///
    /// Ids outside the theme are ignored. A public card cannot also be an
    /// owner card, so it is dropped from the owner's hand. Cards that stop
    /// being public are unlocked with their rows cleared; if the owner's hand
    /// is confirmed they are then marked `not` in the owner's column.
    pub fn confirm_public_cards(&mut self, cards: &[CardId]) -> CascadeReport {
        let public = self.known_cards(cards);
        let released = Self::dropped(&self.public_cards, &public);
        self.owner_cards.retain(|card| !public.contains(card));
        self.shown_to.retain(|card, _| !public.contains(&card));
        self.public_cards = public;

        let mut cascade = Cascade::new(&mut self.grid, self.config.rules, self.config.player_count);
        setup::release(&mut cascade, &released);
        setup::confirm_public(&mut cascade, &self.public_cards);
        if !self.owner_cards.is_empty() {
            setup::confirm_owner(
                &mut cascade,
                &self.cards,
                &self.owner_cards,
                &self.public_cards,
            );
        }
        log::info!(
            "confirmed {} public card(s), released {}",
            self.public_cards.len(),
            released.len()
        );
        cascade.commit()
    }

    /// Confirms the owner's hand.
    ///
    /// Ids outside the theme or already public are ignored. Cards that stop
    /// being owned are unlocked with their rows cleared, keep only the
    /// owner's `not`, and lose their shown-to entries.
    pub fn confirm_owner_cards(&mut self, cards: &[CardId]) -> CascadeReport {
        let owned: Vec<CardId> = self
            .known_cards(cards)
            .into_iter()
            .filter(|card| !self.public_cards.contains(card))
            .collect();
        let released = Self::dropped(&self.owner_cards, &owned);
        for card in &released {
            self.shown_to.clear_card(*card);
        }
        self.owner_cards = owned;

        let mut cascade = Cascade::new(&mut self.grid, self.config.rules, self.config.player_count);
        setup::release(&mut cascade, &released);
        setup::confirm_owner(
            &mut cascade,
            &self.cards,
            &self.owner_cards,
            &self.public_cards,
        );
        log::info!(
            "confirmed {} owner card(s), released {}",
            self.owner_cards.len(),
            released.len()
        );
        cascade.commit()
    }

    fn dropped(before: &[CardId], after: &[CardId]) -> Vec<CardId> {
        before
            .iter()
            .copied()
            .filter(|card| !after.contains(card))
            .collect()
    }

    /// Returns `true` if `card` is deduced to be part of the solution.
    #[must_use]
    pub fn is_murder_item(&self, card: CardId) -> bool {
        predicates::is_murder_item(
            &self.grid,
            card,
            self.config.player_count,
            &self.locked_cards(),
        )
    }

    /// Returns every card deduced to be part of the solution.
    #[must_use]
    pub fn murder_items(&self) -> Vec<CardId> {
        predicates::murder_items(
            &self.grid,
            &self.cards,
            self.config.player_count,
            &self.locked_cards(),
        )
    }

    /// Returns `true` if the owned `card` has been shown to `player`.
    #[must_use]
    pub fn is_shown(&self, card: CardId, player: PlayerId) -> bool {
        self.shown_to.is_shown(card, player)
    }

    /// Returns the opponents the owned `card` has been shown to.
    pub fn shown_to(&self, card: CardId) -> impl Iterator<Item = PlayerId> + '_ {
        self.shown_to.players(card)
    }

    /// Flips whether the owned `card` has been shown to `player`, returning
    /// the new state.
    ///
    /// # Errors
    ///
    /// Returns [`EditBlockReason::NotOwnedCard`] if the owner does not hold
    /// `card`, and [`EditBlockReason::NotAnOpponent`] or
    /// [`EditBlockReason::InactivePlayer`] if `player` is the owner or not in
    /// the game.
    pub fn toggle_shown(
        &mut self,
        card: CardId,
        player: PlayerId,
    ) -> Result<bool, EditBlockReason> {
        let reason = if !self.owner_cards.contains(&card) {
            EditBlockReason::NotOwnedCard(card)
        } else if player.is_owner() {
            EditBlockReason::NotAnOpponent(player)
        } else if player.get() > self.config.player_count {
            EditBlockReason::InactivePlayer(player)
        } else {
            return Ok(self.shown_to.toggle(card, player));
        };
        Self::denied(Cell::new(card, player), reason)
    }

    /// Clears every mark, lock, and shown-to entry for a new game.
    pub fn reset(&mut self) {
        log::info!("resetting sheet");
        self.grid.clear();
        self.public_cards.clear();
        self.owner_cards.clear();
        self.shown_to.reset();
    }
}
