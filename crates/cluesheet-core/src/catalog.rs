//! Static card catalogs.
//!
//! A [`Theme`] names a fixed list of cards split into three [`Category`]s.
//! Card ids are assigned `1..=N` in catalog order: suspects first, then
//! weapons, then rooms.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{CardId, CoreError};

/// The category a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Who did it.
    Suspect,
    /// With what.
    Weapon,
    /// Where.
    Room,
}

impl Category {
    /// All categories in catalog order.
    pub const ALL: [Self; 3] = [Self::Suspect, Self::Weapon, Self::Room];
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Suspect => "Suspects",
            Self::Weapon => "Weapons",
            Self::Room => "Rooms",
        })
    }
}

/// One entry of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// The card's id within its theme.
    pub id: CardId,
    /// Display name.
    pub name: &'static str,
    /// The category the card belongs to.
    pub category: Category,
}

const CLASSIC_SUSPECTS: &[&str] = &[
    "Miss Scarlett",
    "Colonel Mustard",
    "Mrs. White",
    "Reverend Green",
    "Mrs. Peacock",
    "Professor Plum",
];
const CLASSIC_WEAPONS: &[&str] = &[
    "Candlestick",
    "Dagger",
    "Lead Pipe",
    "Revolver",
    "Rope",
    "Wrench",
];
const CLASSIC_ROOMS: &[&str] = &[
    "Kitchen",
    "Ballroom",
    "Conservatory",
    "Dining Room",
    "Billiard Room",
    "Library",
    "Lounge",
    "Hall",
    "Study",
];

const MASTER_SUSPECTS: &[&str] = &[
    "Miss Scarlett",
    "Colonel Mustard",
    "Mrs. White",
    "Mr. Green",
    "Mrs. Peacock",
    "Professor Plum",
    "Madame Rose",
    "Sergeant Gray",
    "Monsieur Brunette",
    "Miss Peach",
];
const MASTER_WEAPONS: &[&str] = &[
    "Candlestick",
    "Knife",
    "Lead Pipe",
    "Revolver",
    "Rope",
    "Wrench",
    "Horseshoe",
    "Poison",
];
const MASTER_ROOMS: &[&str] = &[
    "Carriage House",
    "Kitchen",
    "Trophy Room",
    "Dining Room",
    "Drawing Room",
    "Gazebo",
    "Courtyard",
    "Fountain",
    "Library",
    "Billiard Room",
    "Studio",
    "Conservatory",
];

/// A named card set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    /// The classic 21-card set.
    #[default]
    Classic,
    /// The 30-card master detective set.
    Master,
}

impl Theme {
    /// All themes.
    pub const ALL: [Self; 2] = [Self::Classic, Self::Master];

    /// Returns the lowercase name of this theme.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Master => "master",
        }
    }

    fn names(self, category: Category) -> &'static [&'static str] {
        match (self, category) {
            (Self::Classic, Category::Suspect) => CLASSIC_SUSPECTS,
            (Self::Classic, Category::Weapon) => CLASSIC_WEAPONS,
            (Self::Classic, Category::Room) => CLASSIC_ROOMS,
            (Self::Master, Category::Suspect) => MASTER_SUSPECTS,
            (Self::Master, Category::Weapon) => MASTER_WEAPONS,
            (Self::Master, Category::Room) => MASTER_ROOMS,
        }
    }

    /// Returns the categories of this theme, in catalog order.
    #[must_use]
    pub const fn categories(self) -> [Category; 3] {
        Category::ALL
    }

    /// Returns every card in catalog order.
    #[must_use]
    pub fn cards(self) -> Vec<Card> {
        Category::ALL
            .into_iter()
            .flat_map(|category| {
                self.names(category)
                    .iter()
                    .map(move |&name| (category, name))
            })
            .zip(1u16..)
            .map(|((category, name), id)| Card {
                id: CardId::new(id),
                name,
                category,
            })
            .collect()
    }

    /// Returns the card ids in catalog order.
    #[must_use]
    pub fn card_ids(self) -> Vec<CardId> {
        self.cards().into_iter().map(|card| card.id).collect()
    }

    /// Returns the number of cards in the theme.
    #[must_use]
    pub fn card_count(self) -> usize {
        Category::ALL
            .into_iter()
            .map(|category| self.names(category).len())
            .sum()
    }

    /// Looks up a card by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCardId`] if the theme has no such card.
    pub fn card(self, id: CardId) -> Result<Card, CoreError> {
        self.cards()
            .into_iter()
            .find(|card| card.id == id)
            .ok_or(CoreError::UnknownCardId(id.get()))
    }

    /// Looks up a card by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCardName`] if no card has that name.
    pub fn find_by_name(self, name: &str) -> Result<Card, CoreError> {
        self.cards()
            .into_iter()
            .find(|card| card.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownCardName(name.to_owned()))
    }

    /// Returns the cards of one category, in catalog order.
    #[must_use]
    pub fn cards_in(self, category: Category) -> Vec<Card> {
        self.cards()
            .into_iter()
            .filter(|card| card.category == category)
            .collect()
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownTheme(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout() {
        let cards = Theme::Classic.cards();
        assert_eq!(cards.len(), 21);
        assert_eq!(Theme::Classic.card_count(), 21);
        assert_eq!(cards[0].id, CardId::new(1));
        assert_eq!(cards[0].category, Category::Suspect);
        assert_eq!(cards[6].category, Category::Weapon);
        assert_eq!(cards[20].id, CardId::new(21));
        assert_eq!(cards[20].category, Category::Room);
        assert_eq!(Theme::Classic.cards_in(Category::Room).len(), 9);
    }

    #[test]
    fn test_master_layout() {
        assert_eq!(Theme::Master.card_count(), 30);
        assert_eq!(Theme::Master.cards_in(Category::Suspect).len(), 10);
        assert_eq!(Theme::Master.cards_in(Category::Weapon).len(), 8);
    }

    #[test]
    fn test_lookup() {
        let rope = Theme::Classic.find_by_name("rope").unwrap();
        assert_eq!(rope.category, Category::Weapon);
        assert_eq!(Theme::Classic.card(rope.id), Ok(rope));
        assert_eq!(
            Theme::Classic.card(CardId::new(22)),
            Err(CoreError::UnknownCardId(22))
        );
        assert!(
            Theme::Classic
                .find_by_name("Horseshoe")
                .unwrap_err()
                .is_unknown_card_name()
        );
    }

    #[test]
    fn test_card_ids_are_unique_and_ordered() {
        for theme in Theme::ALL {
            let ids = theme.card_ids();
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Master".parse::<Theme>(), Ok(Theme::Master));
        assert!("deluxe".parse::<Theme>().is_err());
        assert_eq!(Theme::default(), Theme::Classic);
    }
}
