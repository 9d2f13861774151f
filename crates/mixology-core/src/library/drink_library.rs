use chrono::Utc;
use tokio::sync::watch;

use super::policy::{contains_id, push_recent, toggle_membership};
use crate::drink::Drink;
use crate::error::Result;
use crate::events::Event;
use crate::observable::Observable;
use crate::storage::{KeyValueStore, PreferenceStore, MAX_RECENT};

/// The user's recently viewed and favourite drinks.
///
/// In-memory lists are authoritative for the life of the process. Every
/// mutation replaces the list, publishes it, then overwrites the stored
/// copy; with [`WritePolicy::Surface`](crate::storage::WritePolicy) a
/// failed write is returned after the in-memory change has been applied.
pub struct DrinkLibrary<S> {
    prefs: PreferenceStore<S>,
    recently_viewed: Observable<Vec<Drink>>,
    favourites: Observable<Vec<Drink>>,
}

impl<S: KeyValueStore> DrinkLibrary<S> {
    /// Seed both lists from storage.
    pub fn new(prefs: PreferenceStore<S>) -> Self {
        let recently_viewed = Observable::new(prefs.recently_viewed());
        let favourites = Observable::new(prefs.favourites());
        Self {
            prefs,
            recently_viewed,
            favourites,
        }
    }

    pub fn prefs(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub fn recently_viewed(&self) -> Vec<Drink> {
        self.recently_viewed.get()
    }

    pub fn favourites(&self) -> Vec<Drink> {
        self.favourites.get()
    }

    pub fn subscribe_recently_viewed(&self) -> watch::Receiver<Vec<Drink>> {
        self.recently_viewed.subscribe()
    }

    pub fn subscribe_favourites(&self) -> watch::Receiver<Vec<Drink>> {
        self.favourites.subscribe()
    }

    /// Put `drink` at the front of the recently viewed list.
    pub fn record_view(&self, drink: &Drink) -> Result<Event> {
        let next = self
            .recently_viewed
            .with(|current| push_recent(current, drink, MAX_RECENT));
        let recent_len = next.len();
        self.recently_viewed.set(next.clone());
        let event = Event::DrinkViewed {
            drink_id: drink.id.clone(),
            recent_len,
            at: Utc::now(),
        };
        tracing::debug!(event = event.name(), drink_id = %drink.id, recent_len);
        self.prefs.save_recently_viewed(&next)?;
        Ok(event)
    }

    /// Add `drink` to favourites, or remove it if already there.
    pub fn toggle_favourite(&self, drink: &Drink) -> Result<Event> {
        let (next, favourite) = self
            .favourites
            .with(|current| toggle_membership(current, drink));
        self.favourites.set(next.clone());
        let event = Event::FavouriteToggled {
            drink_id: drink.id.clone(),
            favourite,
            at: Utc::now(),
        };
        tracing::debug!(event = event.name(), drink_id = %drink.id, favourite);
        self.prefs.save_favourites(&next)?;
        Ok(event)
    }

    pub fn is_favourite(&self, drink_id: &str) -> bool {
        self.favourites.with(|list| contains_id(list, drink_id))
    }

    /// Re-read both lists from storage, replacing the in-memory copies.
    pub fn reload(&self) {
        self.recently_viewed.set(self.prefs.recently_viewed());
        self.favourites.set(self.prefs.favourites());
    }
}
