use clap::Subcommand;
use mixology_core::Config;
use serde_json::json;

use crate::context::{open_library, print_json, resolve_drink};

#[derive(Subcommand)]
pub enum FavouriteAction {
    /// Add a drink to favourites, or remove it if already there
    Toggle {
        /// Drink ID
        id: String,
    },
    /// Whether a drink is a favourite
    Check {
        /// Drink ID
        id: String,
    },
    /// List favourite drinks
    List,
}

pub async fn run(action: FavouriteAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = open_library(&config)?;

    match action {
        FavouriteAction::Toggle { id } => {
            let drink = resolve_drink(&config, &library, &id).await?;
            let event = library.toggle_favourite(&drink)?;
            print_json(&event)?;
        }
        FavouriteAction::Check { id } => {
            print_json(&json!({ "drink_id": id, "favourite": library.is_favourite(&id) }))?;
        }
        FavouriteAction::List => print_json(&library.favourites())?,
    }
    Ok(())
}
