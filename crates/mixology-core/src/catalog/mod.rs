//! Remote recipe catalog and the in-memory store fed from it.

mod client;
mod store;

pub use client::{CocktailDbClient, RecipeSource};
pub use store::{LoadState, RecipeStore};
