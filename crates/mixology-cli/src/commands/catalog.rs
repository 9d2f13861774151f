use clap::Subcommand;
use mixology_core::drink::{group_by_category, search};
use mixology_core::{CocktailDbClient, Config, Drink, RecipeSource, ValidationError};
use serde::Serialize;

use crate::context::{catalog, load_catalog, open_library, print_json};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Fetch the catalog and print a load summary
    Load,
    /// Search drinks by name, category, type or ingredient
    Search {
        /// Search text
        query: String,
    },
    /// Drinks grouped by category
    Browse {
        /// Only this category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
    },
    /// Category names known to the catalog
    Categories,
    /// Alcoholic classifications known to the catalog
    Types,
    /// Show a drink and record it as viewed
    Show {
        /// Drink ID
        id: String,
    },
}

#[derive(Serialize)]
struct DrinkSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    kind: &'a str,
}

impl<'a> From<&'a Drink> for DrinkSummary<'a> {
    fn from(d: &'a Drink) -> Self {
        Self {
            id: &d.id,
            name: &d.name,
            category: &d.category,
            kind: &d.kind,
        }
    }
}

#[derive(Serialize)]
struct CategoryGroup<'a> {
    category: String,
    drinks: Vec<DrinkSummary<'a>>,
}

#[derive(Serialize)]
struct DrinkDetail<'a> {
    #[serde(flatten)]
    drink: &'a Drink,
    favourite: bool,
    personal_best_secs: Option<u32>,
}

pub async fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        CatalogAction::Load => {
            let store = catalog(&config)?;
            let event = store.load().await;
            print_json(&event)?;
        }
        CatalogAction::Search { query } => {
            let store = load_catalog(&config).await?;
            let drinks = store.drinks();
            let hits: Vec<DrinkSummary> = search(&drinks, &query)
                .into_iter()
                .map(Into::into)
                .collect();
            print_json(&hits)?;
        }
        CatalogAction::Browse { category } => {
            let store = load_catalog(&config).await?;
            let drinks = store.drinks();
            let groups: Vec<CategoryGroup> = group_by_category(&drinks)
                .into_iter()
                .filter(|(c, _)| {
                    category
                        .as_deref()
                        .map_or(true, |wanted| c.eq_ignore_ascii_case(wanted))
                })
                .map(|(c, members)| CategoryGroup {
                    category: c,
                    drinks: members.into_iter().map(Into::into).collect(),
                })
                .collect();
            print_json(&groups)?;
        }
        CatalogAction::Categories => {
            let client = CocktailDbClient::from_config(&config.catalog)?;
            print_json(&client.list_categories().await?)?;
        }
        CatalogAction::Types => {
            let client = CocktailDbClient::from_config(&config.catalog)?;
            print_json(&client.list_alcoholic_filters().await?)?;
        }
        CatalogAction::Show { id } => {
            let library = open_library(&config)?;
            let store = load_catalog(&config).await?;
            let drink = store
                .find(&id)
                .ok_or_else(|| ValidationError::UnknownDrink(id.clone()))?;
            library.record_view(&drink)?;
            print_json(&DrinkDetail {
                drink: &drink,
                favourite: library.is_favourite(&drink.id),
                personal_best_secs: library.prefs().best(&drink.id),
            })?;
        }
    }
    Ok(())
}
