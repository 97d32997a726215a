//! Read-time facts derived from the grid.
//!
//! Nothing here is stored, so a derived fact can never disagree with the marks
//! it was computed from.

use cluesheet_core::{CardId, Cell, Grid, PlayerId, Primary};

/// Returns `true` if `card` must be part of the solution.
///
/// That is the case when every active column reads `not` for the card and the
/// card is not one of the `locked` setup cards (public or owned).
#[must_use]
pub fn is_murder_item(grid: &Grid, card: CardId, player_count: u8, locked: &[CardId]) -> bool {
    if locked.contains(&card) {
        return false;
    }
    PlayerId::first(player_count)
        .all(|player| grid.mark(Cell::new(card, player)).primary() == Primary::Not)
}

/// Returns every card of `cards` for which [`is_murder_item`] holds.
#[must_use]
pub fn murder_items(
    grid: &Grid,
    cards: &[CardId],
    player_count: u8,
    locked: &[CardId],
) -> Vec<CardId> {
    cards
        .iter()
        .copied()
        .filter(|card| is_murder_item(grid, *card, player_count, locked))
        .collect()
}

#[cfg(test)]
mod tests {
    use cluesheet_core::Mark;

    use super::*;

    fn all_not(grid: &mut Grid, card: CardId) {
        for player in PlayerId::ALL {
            grid.set(Cell::new(card, player), Mark::NOT);
        }
    }

    #[test]
    fn test_all_not_is_murder_item() {
        let card = CardId::new(12);
        let mut grid = Grid::new();
        all_not(&mut grid, card);
        assert!(is_murder_item(&grid, card, 6, &[]));

        grid.set(Cell::new(card, PlayerId::new(4)), Mark::EMPTY);
        assert!(!is_murder_item(&grid, card, 6, &[]));

        grid.set(Cell::new(card, PlayerId::new(4)), Mark::HAS);
        assert!(!is_murder_item(&grid, card, 6, &[]));
    }

    #[test]
    fn test_locked_cards_are_never_murder_items() {
        let card = CardId::new(3);
        let mut grid = Grid::new();
        all_not(&mut grid, card);
        assert!(!is_murder_item(&grid, card, 6, &[card]));
    }

    #[test]
    fn test_only_active_columns_count() {
        let card = CardId::new(1);
        let mut grid = Grid::new();
        for player in PlayerId::first(3) {
            grid.set(Cell::new(card, player), Mark::NOT);
        }
        assert!(is_murder_item(&grid, card, 3, &[]));
        assert!(!is_murder_item(&grid, card, 4, &[]));
    }

    #[test]
    fn test_murder_items_lists_matches() {
        let mut grid = Grid::new();
        all_not(&mut grid, CardId::new(2));
        all_not(&mut grid, CardId::new(9));
        let cards: Vec<CardId> = (1..=21).map(CardId::new).collect();
        assert_eq!(
            murder_items(&grid, &cards, 6, &[CardId::new(9)]),
            vec![CardId::new(2)]
        );
    }
}
