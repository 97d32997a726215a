//! Restrictions on manual edits and the rules that require them.
//!
//! A [`Constraint`] is enforced only while at least one of its dependent
//! [`AutoRule`]s is enabled. Both constraints currently list no dependents,
//! so the resolver is consulted on every number toggle yet permits all of
//! them. Adding a rule id to [`Constraint::dependent_rules`] is enough to
//! switch a constraint on.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{AutoRule, AutoRulesConfig};

/// A restriction on manual number edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    /// Numbers may only be added to `empty` or `bars` cells.
    NumbersOnlyOnEmptyOrBars,
    /// Toggling a number off removes it from the whole column.
    NumberToggleRemovesFromColumn,
}

impl Constraint {
    /// All constraints.
    pub const ALL: [Self; 2] = [
        Self::NumbersOnlyOnEmptyOrBars,
        Self::NumberToggleRemovesFromColumn,
    ];

    /// Returns the rules that require this constraint.
    #[must_use]
    pub const fn dependent_rules(self) -> &'static [AutoRule] {
        match self {
            Self::NumbersOnlyOnEmptyOrBars | Self::NumberToggleRemovesFromColumn => &[],
        }
    }

    /// Returns `true` if the constraint is enforced under `rules`.
    #[must_use]
    pub fn is_required(self, rules: &AutoRulesConfig) -> bool {
        is_required_by(self.dependent_rules(), *rules)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NumbersOnlyOnEmptyOrBars => "numbers only on empty or bars",
            Self::NumberToggleRemovesFromColumn => "number toggle removes from column",
        })
    }
}

/// Returns `true` if `constraint` is enforced under `rules`.
#[must_use]
pub fn is_constraint_required(constraint: Constraint, rules: &AutoRulesConfig) -> bool {
    constraint.is_required(rules)
}

fn is_required_by(dependents: &[AutoRule], rules: AutoRulesConfig) -> bool {
    dependents.iter().any(|rule| rules.is_enabled(*rule))
}
