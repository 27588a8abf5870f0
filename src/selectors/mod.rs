//! Pure read-side queries over a [`StateTree`](crate::table::StateTree).
//!
//! Every selector takes one snapshot and a lookup key and returns a plain
//! value. Missing or malformed data degrades to a documented default; no
//! selector returns an error or touches the tree.

pub mod action;
pub mod amount;
pub mod cards;
pub mod fold;
pub mod query;
pub mod view;

pub use action::*;
pub use amount::*;
pub use cards::*;
pub use fold::*;
pub use query::*;
pub use view::*;

pub(crate) const LOG_TARGET: &str = "selectors";

#[cfg(test)]
mod tests;
