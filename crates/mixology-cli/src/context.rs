//! Shared wiring for commands: config, local store, catalog.

use std::sync::Arc;

use mixology_core::{
    CocktailDbClient, Config, DrinkLibrary, Drink, LoadState, PreferenceStore, RecipeStore,
    SqliteStore, ValidationError,
};

pub type Library = DrinkLibrary<SqliteStore>;

pub fn open_library(config: &Config) -> Result<Library, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    Ok(DrinkLibrary::new(PreferenceStore::new(
        store,
        config.storage.write_policy,
    )))
}

pub fn catalog(config: &Config) -> Result<RecipeStore, Box<dyn std::error::Error>> {
    let client = CocktailDbClient::from_config(&config.catalog)?;
    Ok(RecipeStore::new(Arc::new(client), config.catalog.letters()))
}

/// Fetch the whole catalog, failing only when nothing came back.
pub async fn load_catalog(config: &Config) -> Result<RecipeStore, Box<dyn std::error::Error>> {
    let store = catalog(config)?;
    store.load().await;
    if store.state() == LoadState::Failed {
        tracing::error!(base_url = %config.catalog.base_url, "catalog returned no drinks");
        return Err("failed to load drinks, retry later".into());
    }
    Ok(store)
}

/// Find a drink locally (favourites, then recently viewed) before falling
/// back to the remote catalog.
pub async fn resolve_drink(
    config: &Config,
    library: &Library,
    id: &str,
) -> Result<Drink, Box<dyn std::error::Error>> {
    let local = library
        .favourites()
        .into_iter()
        .chain(library.recently_viewed())
        .find(|d| d.id == id);
    if let Some(drink) = local {
        return Ok(drink);
    }
    let store = load_catalog(config).await?;
    store
        .find(id)
        .ok_or_else(|| ValidationError::UnknownDrink(id.to_string()).into())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
