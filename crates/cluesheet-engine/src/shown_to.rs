//! Which opponents have been shown each of the owner's cards.

use std::collections::{BTreeMap, BTreeSet};

use cluesheet_core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

type RawShownTo = BTreeMap<CardId, BTreeSet<PlayerId>>;

/// A per-card set of opponents who have seen the card.
///
/// Purely informational: nothing cascades from it. A card whose set becomes
/// empty is dropped, so no empty set is ever stored, loaded documents
/// included.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawShownTo", into = "RawShownTo")]
pub struct ShownTo {
    cards: RawShownTo,
}

impl From<RawShownTo> for ShownTo {
    fn from(mut cards: RawShownTo) -> Self {
        cards.retain(|_, players| !players.is_empty());
        Self { cards }
    }
}

impl From<ShownTo> for RawShownTo {
    fn from(shown: ShownTo) -> Self {
        shown.cards
    }
}

impl ShownTo {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `card` has been shown to `player`.
    #[must_use]
    pub fn is_shown(&self, card: CardId, player: PlayerId) -> bool {
        self.cards
            .get(&card)
            .is_some_and(|players| players.contains(&player))
    }

    /// Flips whether `card` has been shown to `player`, returning the new state.
    pub fn toggle(&mut self, card: CardId, player: PlayerId) -> bool {
        let players = self.cards.entry(card).or_default();
        let shown = if players.remove(&player) {
            false
        } else {
            players.insert(player);
            true
        };
        if players.is_empty() {
            self.cards.remove(&card);
        }
        shown
    }

    /// Returns the opponents `card` has been shown to.
    pub fn players(&self, card: CardId) -> impl Iterator<Item = PlayerId> + '_ {
        self.cards.get(&card).into_iter().flatten().copied()
    }

    /// Forgets everything recorded for `card`.
    pub fn clear_card(&mut self, card: CardId) {
        self.cards.remove(&card);
    }

    /// Keeps only the entries for which `keep` returns `true`. Cards left
    /// without any opponent are dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(CardId, PlayerId) -> bool) {
        self.cards.retain(|card, players| {
            players.retain(|player| keep(*card, *player));
            !players.is_empty()
        });
    }

    /// Forgets everything.
    pub fn reset(&mut self) {
        self.cards.clear();
    }

    /// Returns `true` if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
