//! Errors raised when converting untrusted values into core types.

/// Errors that can occur while parsing or validating values at the crate boundary.
///
/// Operations on already-constructed core values never fail; these errors only
/// arise when raw integers or strings from a script, a settings file, or a
/// persisted document are turned into typed ids.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum CoreError {
    /// A player number outside `1..=6`.
    #[display("invalid player id: {_0} (expected 1-6)")]
    InvalidPlayer(#[error(not(source))] u8),
    /// A number or bar-color key outside `1..=4`.
    #[display("invalid mark key: {_0} (expected 1-4)")]
    InvalidMarkKey(#[error(not(source))] u8),
    /// A card id that the active theme does not contain.
    #[display("unknown card id: {_0}")]
    UnknownCardId(#[error(not(source))] u16),
    /// A card name that the active theme does not contain.
    #[display("unknown card: {_0:?}")]
    UnknownCardName(#[error(not(source))] String),
    /// An unrecognized theme name.
    #[display("unknown theme: {_0:?}")]
    UnknownTheme(#[error(not(source))] String),
    /// An unrecognized primary mark name.
    #[display("unknown primary mark: {_0:?}")]
    UnknownPrimary(#[error(not(source))] String),
}
