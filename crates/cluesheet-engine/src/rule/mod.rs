//! The individual automation rules.
//!
//! Each rule reads the grid through a [`CascadeView`](crate::cascade::CascadeView)
//! and returns the writes it wants; the [`Cascade`](crate::Cascade) decides
//! when to run it and stages the result.

pub(crate) mod last_maybe;
pub(crate) mod row_elimination;
pub(crate) mod setup;
