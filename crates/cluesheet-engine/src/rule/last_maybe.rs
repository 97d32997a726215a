//! Last-maybe deduction: when every other cell of a number group in a column
//! has been ruled out, the remaining one must be the holder.

use cluesheet_core::{Cell, Primary};

use crate::cascade::CascadeView;

/// Returns the cells of `cell`'s column that become `has` now that `cell` is `not`.
///
/// Each number on `cell` is checked on its own. A group that already contains
/// a `has` is considered resolved and skipped. Otherwise the group resolves
/// only if exactly one of its cells is not `not`.
pub(crate) fn deduce(view: &CascadeView<'_>, cell: Cell) -> Vec<Cell> {
    let mut resolved = Vec::new();
    for key in view.mark(cell).numbers() {
        let group: Vec<Cell> = view
            .cards_with_number(cell.player, key)
            .into_iter()
            .map(|card| Cell::new(card, cell.player))
            .collect();
        if group.iter().any(|member| view.mark(*member).primary() == Primary::Has) {
            continue;
        }
        let mut candidates = group
            .into_iter()
            .filter(|member| view.mark(*member).primary() != Primary::Not);
        if let (Some(last), None) = (candidates.next(), candidates.next())
            && !resolved.contains(&last)
        {
            resolved.push(last);
        }
    }
    resolved
}
