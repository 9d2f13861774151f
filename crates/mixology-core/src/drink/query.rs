//! In-memory filtering over a loaded catalog.

use super::model::Drink;

/// Case-insensitive substring search over name, category, kind and
/// ingredient names. A blank query matches nothing.
pub fn search<'a>(drinks: &'a [Drink], query: &str) -> Vec<&'a Drink> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |s: &str| s.to_lowercase().contains(&needle);
    drinks
        .iter()
        .filter(|d| {
            hit(&d.name)
                || hit(&d.category)
                || hit(&d.kind)
                || d.ingredients.iter().any(|i| hit(&i.name))
        })
        .collect()
}

/// Group drinks by category. Categories keep first-seen order, drinks keep
/// catalog order within each group.
pub fn group_by_category(drinks: &[Drink]) -> Vec<(String, Vec<&Drink>)> {
    let mut groups: Vec<(String, Vec<&Drink>)> = Vec::new();
    for drink in drinks {
        match groups.iter_mut().find(|(c, _)| *c == drink.category) {
            Some((_, members)) => members.push(drink),
            None => groups.push((drink.category.clone(), vec![drink])),
        }
    }
    groups
}
