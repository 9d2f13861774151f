use crate::drink::Drink;

/// Move `drink` to the front of `list`, dropping any older entry with the
/// same id, and keep at most `limit` entries.
pub fn push_recent(list: &[Drink], drink: &Drink, limit: usize) -> Vec<Drink> {
    let mut next = Vec::with_capacity(limit.min(list.len() + 1));
    next.push(drink.clone());
    next.extend(
        list.iter()
            .filter(|d| !d.same_entity(drink))
            .cloned(),
    );
    next.truncate(limit);
    next
}

/// Remove `drink` if an entry with its id is present, otherwise append it.
/// Returns the new list and whether the drink is now a member.
pub fn toggle_membership(list: &[Drink], drink: &Drink) -> (Vec<Drink>, bool) {
    if contains_id(list, &drink.id) {
        let next = list.iter().filter(|d| !d.same_entity(drink)).cloned().collect();
        (next, false)
    } else {
        let mut next = list.to_vec();
        next.push(drink.clone());
        (next, true)
    }
}

pub fn contains_id(list: &[Drink], id: &str) -> bool {
    list.iter().any(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MAX_RECENT;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn drink(id: u8) -> Drink {
        Drink::new(id.to_string(), format!("Drink {id}"))
    }

    fn ids(list: &[Drink]) -> Vec<&str> {
        list.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn reviewing_moves_to_front() {
        let a = Drink::new("1", "A");
        let b = Drink::new("2", "B");
        let list = push_recent(&[], &a, MAX_RECENT);
        let list = push_recent(&list, &b, MAX_RECENT);
        let list = push_recent(&list, &a, MAX_RECENT);
        assert_eq!(ids(&list), vec!["1", "2"]);
    }

    #[test]
    fn oldest_entry_falls_off() {
        let mut list = Vec::new();
        for id in 0..=MAX_RECENT as u8 {
            list = push_recent(&list, &drink(id), MAX_RECENT);
        }
        assert_eq!(list.len(), MAX_RECENT);
        assert_eq!(list[0].id, MAX_RECENT.to_string());
        assert!(!contains_id(&list, "0"));
    }

    #[test]
    fn repeated_views_are_idempotent() {
        let a = drink(1);
        let once = push_recent(&[drink(2), drink(3)], &a, MAX_RECENT);
        let twice = push_recent(&once, &a, MAX_RECENT);
        assert_eq!(once, twice);
    }

    #[test]
    fn revisit_keeps_latest_snapshot_of_drink() {
        let old = Drink::new("1", "Old name");
        let new = Drink::new("1", "New name");
        let list = push_recent(&[old], &new, MAX_RECENT);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "New name");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let x = drink(9);
        let (added, member) = toggle_membership(&[drink(1)], &x);
        assert!(member);
        assert_eq!(ids(&added), vec!["1", "9"]);
        let (removed, member) = toggle_membership(&added, &x);
        assert!(!member);
        assert_eq!(ids(&removed), vec!["1"]);
    }

    proptest! {
        #[test]
        fn recent_list_invariants(views in prop::collection::vec(0u8..25, 1..80)) {
            let mut list = Vec::new();
            for id in &views {
                list = push_recent(&list, &drink(*id), MAX_RECENT);
                prop_assert!(list.len() <= MAX_RECENT);
                prop_assert_eq!(&list[0].id, &id.to_string());
                let unique: HashSet<_> = list.iter().map(|d| d.id.clone()).collect();
                prop_assert_eq!(unique.len(), list.len());
            }
        }

        #[test]
        fn even_toggles_restore_membership(
            start in prop::collection::vec(0u8..10, 0..10),
            target in 0u8..10,
            pairs in 1usize..6,
        ) {
            let mut list: Vec<Drink> = Vec::new();
            for id in start {
                if !contains_id(&list, &id.to_string()) {
                    list.push(drink(id));
                }
            }
            let was_member = contains_id(&list, &target.to_string());
            let mut current = list.clone();
            for _ in 0..pairs * 2 {
                current = toggle_membership(&current, &drink(target)).0;
                let count = current.iter().filter(|d| d.id == target.to_string()).count();
                prop_assert!(count <= 1);
            }
            prop_assert_eq!(contains_id(&current, &target.to_string()), was_member);
        }
    }
}
