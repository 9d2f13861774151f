//! # Mixology Core Library
//!
//! This library provides the core logic for Mixology, a cocktail catalog
//! with a challenge-mode timer. Everything a front end needs lives here; the
//! `mixology` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Catalog**: fetches drinks from the public cocktail catalog, one
//!   request per first letter, and tolerates partial failure
//! - **Storage**: SQLite key-value store holding the recently viewed and
//!   favourite lists plus one personal best per drink; TOML configuration
//! - **Library**: the list rules (bounded, de-duplicated recency list and
//!   toggle-membership favourites)
//! - **Challenge**: a caller-driven timer state machine and a cancellable
//!   one-second tick loop that drives it
//!
//! ## Key Components
//!
//! - [`RecipeStore`]: observable in-memory catalog
//! - [`DrinkLibrary`]: recently viewed and favourites
//! - [`ChallengeSession`] / [`ChallengeRunner`]: challenge timer
//! - [`PreferenceStore`]: durable lists and personal bests
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod challenge;
pub mod drink;
pub mod error;
pub mod events;
pub mod library;
pub mod observable;
pub mod storage;

pub use catalog::{CocktailDbClient, LoadState, RecipeSource, RecipeStore};
pub use challenge::{
    commit_candidate, format_clock, ChallengeMode, ChallengeRunner, ChallengeSession,
    ChallengeSnapshot, ChallengeState,
};
pub use drink::{Drink, Ingredient};
pub use error::{ConfigError, CoreError, FetchError, StorageError, ValidationError};
pub use events::Event;
pub use library::DrinkLibrary;
pub use observable::Observable;
pub use storage::{Config, KeyValueStore, MemoryStore, PreferenceStore, SqliteStore, WritePolicy};
