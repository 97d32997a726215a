//! Setup initialization: the ground truth established before play starts.

use cluesheet_core::{CardId, Cell, Mark, PlayerId, Primary};

use crate::{Cascade, ChangeSource};

/// Overwrites every active cell of each public card's row with a bare `not`.
pub(crate) fn confirm_public(cascade: &mut Cascade<'_>, public: &[CardId]) {
    let players = cascade.players().to_vec();
    for card in public {
        for player in &players {
            cascade.write(Cell::new(*card, *player), Mark::NOT, ChangeSource::Setup);
        }
    }
}

/// Clears every active cell of each released card's row.
///
/// Used when a card leaves the public or owner list, so the locked `not`
/// marks it carried stop counting as deductions.
pub(crate) fn release(cascade: &mut Cascade<'_>, released: &[CardId]) {
    let players = cascade.players().to_vec();
    for card in released {
        for player in &players {
            cascade.write(Cell::new(*card, *player), Mark::EMPTY, ChangeSource::Setup);
        }
    }
}

/// Locks in the owner's hand.
///
/// Owned rows become `has` for the owner and `not` for every other column,
/// with markers cleared. Every remaining non-public card is marked `not` in
/// the owner's column only; its markers are kept, since the other columns of
/// that row are still open.
pub(crate) fn confirm_owner(
    cascade: &mut Cascade<'_>,
    all_cards: &[CardId],
    owned: &[CardId],
    public: &[CardId],
) {
    let players = cascade.players().to_vec();
    for card in owned {
        for player in &players {
            let mark = if player.is_owner() {
                Mark::HAS
            } else {
                Mark::NOT
            };
            cascade.write(Cell::new(*card, *player), mark, ChangeSource::Setup);
        }
    }

    for card in all_cards {
        if owned.contains(card) || public.contains(card) {
            continue;
        }
        let cell = Cell::new(*card, PlayerId::OWNER);
        let mark = cascade.mark(cell).with_primary(Primary::Not);
        cascade.write(cell, mark, ChangeSource::Setup);
    }
}
