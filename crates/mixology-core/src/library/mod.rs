//! Recently viewed and favourite drink lists.
//!
//! The list rules live in [`policy`] as pure functions; [`DrinkLibrary`]
//! applies them to observable in-memory lists and persists every change.

mod drink_library;
pub mod policy;

pub use drink_library::DrinkLibrary;
pub use policy::{contains_id, push_recent, toggle_membership};
