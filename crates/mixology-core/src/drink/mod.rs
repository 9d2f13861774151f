mod api;
mod model;
mod query;

pub use api::{AlcoholicItem, AlcoholicResponse, ApiDrink, CategoryItem, CategoryResponse, DrinkResponse};
pub use model::{Drink, Ingredient, UNKNOWN};
pub use query::{group_by_category, search};
