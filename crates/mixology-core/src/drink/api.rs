//! Raw catalog records and their mapping onto [`Drink`].
//!
//! The remote service spreads a recipe over fifteen numbered
//! `strIngredientN` / `strMeasureN` pairs and leaves almost every field
//! nullable. The numbered slots (and any field we do not model) are
//! captured in `slots` so the mapping stays total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{Drink, Ingredient, UNKNOWN};

/// Number of numbered ingredient slots the catalog exposes.
pub const INGREDIENT_SLOTS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDrink {
    #[serde(rename = "idDrink", default)]
    pub id: Option<String>,
    #[serde(rename = "strDrink", default)]
    pub name: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strAlcoholic", default)]
    pub alcoholic: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strDrinkThumb", default)]
    pub thumb: Option<String>,
    #[serde(rename = "strGlass", default)]
    pub glass: Option<String>,
    #[serde(rename = "strIBA", default)]
    pub iba: Option<String>,
    #[serde(flatten)]
    pub slots: BTreeMap<String, serde_json::Value>,
}

impl ApiDrink {
    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(|v| v.as_str())
    }

    /// Ingredient lines in slot order. Blank ingredients are skipped, names
    /// and measures are trimmed, blank measures become `None`.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let name = non_blank(self.slot("strIngredient", i))?;
                let measure = non_blank(self.slot("strMeasure", i)).map(str::to_string);
                Some(Ingredient::new(name, measure))
            })
            .collect()
    }

    /// Map onto the domain type. Records without an id or a name are
    /// dropped.
    pub fn into_drink(self) -> Option<Drink> {
        let ingredients = self.ingredients();
        let id = non_blank(self.id.as_deref())?.to_string();
        let name = non_blank(self.name.as_deref())?.to_string();
        Some(Drink {
            id,
            name,
            kind: non_blank(self.alcoholic.as_deref())
                .unwrap_or(UNKNOWN)
                .to_string(),
            category: non_blank(self.category.as_deref())
                .unwrap_or(UNKNOWN)
                .to_string(),
            image_url: non_blank(self.thumb.as_deref()).map(str::to_string),
            glass: non_blank(self.glass.as_deref()).map(str::to_string),
            iba: non_blank(self.iba.as_deref()).map(str::to_string),
            instructions: non_blank(self.instructions.as_deref()).map(str::to_string),
            ingredients,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// `search.php` envelope. The service answers `{"drinks": null}` when a
/// letter has no drinks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinkResponse {
    #[serde(default)]
    pub drinks: Option<Vec<ApiDrink>>,
}

impl DrinkResponse {
    pub fn into_drinks(self) -> Vec<Drink> {
        self.drinks
            .unwrap_or_default()
            .into_iter()
            .filter_map(ApiDrink::into_drink)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryItem {
    #[serde(rename = "strCategory")]
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub drinks: Option<Vec<CategoryItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlcoholicItem {
    #[serde(rename = "strAlcoholic")]
    pub alcoholic: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlcoholicResponse {
    #[serde(default)]
    pub drinks: Option<Vec<AlcoholicItem>>,
}
