use serde::{Deserialize, Serialize};

/// Sentinel for classification fields the catalog left empty.
pub const UNKNOWN: &str = "Unknown";

/// One line of a recipe: ingredient name plus optional quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub measure: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: Option<String>) -> Self {
        Self {
            name: name.into(),
            measure,
        }
    }
}

/// A cocktail recipe as shown to the user.
///
/// Immutable once built. Two drinks are the same entity iff their `id`s
/// match; use [`Drink::same_entity`] for that, `==` compares every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: String,
    pub name: String,
    /// Alcoholic / non-alcoholic classification.
    pub kind: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub glass: Option<String>,
    #[serde(default)]
    pub iba: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Drink {
    /// Minimal drink with unknown classification, mostly for tests and
    /// hand-built fixtures.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: UNKNOWN.into(),
            category: UNKNOWN.into(),
            image_url: None,
            glass: None,
            iba: None,
            instructions: None,
            ingredients: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_ingredient(mut self, name: impl Into<String>, measure: Option<&str>) -> Self {
        self.ingredients
            .push(Ingredient::new(name, measure.map(str::to_string)));
        self
    }

    pub fn same_entity(&self, other: &Drink) -> bool {
        self.id == other.id
    }
}
