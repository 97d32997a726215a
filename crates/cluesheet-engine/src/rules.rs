//! Toggleable automation rules.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Which optional automation rules are switched on.
///
/// Both rules default to off. Setup initialization and the murder-item
/// predicate are not listed here: they always apply.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoRulesConfig {
    /// Marking a cell `has` marks the rest of its row `not`.
    pub row_elimination: bool,
    /// Marking a numbered cell `not` resolves the last remaining cell of that
    /// number group in the column to `has`.
    pub last_maybe_deduction: bool,
}

impl AutoRulesConfig {
    /// A configuration with every rule enabled.
    pub const ALL_ENABLED: Self = Self {
        row_elimination: true,
        last_maybe_deduction: true,
    };

    /// Returns `true` if `rule` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, rule: AutoRule) -> bool {
        match rule {
            AutoRule::RowElimination => self.row_elimination,
            AutoRule::LastMaybeDeduction => self.last_maybe_deduction,
        }
    }

    /// Returns a copy with `rule` switched to `enabled`.
    #[must_use]
    pub const fn with(mut self, rule: AutoRule, enabled: bool) -> Self {
        match rule {
            AutoRule::RowElimination => self.row_elimination = enabled,
            AutoRule::LastMaybeDeduction => self.last_maybe_deduction = enabled,
        }
        self
    }

    /// Returns the enabled rules.
    pub fn enabled(&self) -> impl Iterator<Item = AutoRule> + '_ {
        AutoRule::ALL
            .into_iter()
            .filter(|rule| self.is_enabled(*rule))
    }
}

/// Identifier of an optional automation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoRule {
    /// See [`AutoRulesConfig::row_elimination`].
    RowElimination,
    /// See [`AutoRulesConfig::last_maybe_deduction`].
    LastMaybeDeduction,
}

impl AutoRule {
    /// All optional rules.
    pub const ALL: [Self; 2] = [Self::RowElimination, Self::LastMaybeDeduction];

    /// Returns the human-readable name of the rule.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RowElimination => "Row Elimination",
            Self::LastMaybeDeduction => "Last Maybe Deduction",
        }
    }
}

impl Display for AutoRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
