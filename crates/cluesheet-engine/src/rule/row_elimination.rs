//! Row elimination: at most one player holds a given card.

use cluesheet_core::{Cell, Mark, PlayerId, Primary};

use crate::cascade::CascadeView;

/// Returns the writes that mark the rest of `cell`'s row `not`.
///
/// Cells already `has` or `not` are left alone. Numbers and bar colors of the
/// rewritten cells are kept as far as the mark invariants allow.
pub(crate) fn eliminate(
    view: &CascadeView<'_>,
    cell: Cell,
    players: &[PlayerId],
) -> Vec<(Cell, Mark)> {
    players
        .iter()
        .filter(|player| **player != cell.player)
        .map(|player| Cell::new(cell.card, *player))
        .filter_map(|target| {
            let mark = view.mark(target);
            (!mark.primary().is_settled()).then(|| (target, mark.with_primary(Primary::Not)))
        })
        .collect()
}
