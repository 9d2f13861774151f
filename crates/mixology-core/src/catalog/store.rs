use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::client::RecipeSource;
use crate::drink::Drink;
use crate::events::Event;
use crate::observable::Observable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    /// Nothing at all could be fetched; the front end offers a retry.
    Failed,
}

/// In-memory catalog of every drink the source returned.
pub struct RecipeStore {
    source: Arc<dyn RecipeSource>,
    letters: Vec<char>,
    drinks: Observable<Vec<Drink>>,
    state: Observable<LoadState>,
}

impl RecipeStore {
    pub fn new(source: Arc<dyn RecipeSource>, letters: Vec<char>) -> Self {
        Self {
            source,
            letters,
            drinks: Observable::new(Vec::new()),
            state: Observable::new(LoadState::Loading),
        }
    }

    pub fn drinks(&self) -> Vec<Drink> {
        self.drinks.get()
    }

    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    pub fn has_error(&self) -> bool {
        self.state() == LoadState::Failed
    }

    pub fn subscribe_drinks(&self) -> watch::Receiver<Vec<Drink>> {
        self.drinks.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub fn find(&self, id: &str) -> Option<Drink> {
        self.drinks.with(|list| list.iter().find(|d| d.id == id).cloned())
    }

    /// Fetch every letter concurrently. A failed letter contributes
    /// nothing; the load only fails when no drink came back at all.
    pub async fn load(&self) -> Event {
        self.state.set(LoadState::Loading);

        let handles: Vec<_> = self
            .letters
            .iter()
            .map(|&letter| {
                let source = Arc::clone(&self.source);
                (
                    letter,
                    tokio::spawn(async move { source.fetch_by_letter(letter).await }),
                )
            })
            .collect();

        let mut all = Vec::new();
        let mut seen = HashSet::new();
        let mut failed_letters = Vec::new();
        for (letter, handle) in handles {
            let drinks = match handle.await {
                Ok(Ok(drinks)) => drinks,
                Ok(Err(e)) => {
                    tracing::warn!(%letter, error = %e, "failed to load drinks for letter");
                    failed_letters.push(letter);
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%letter, error = %e, "catalog fetch task aborted");
                    failed_letters.push(letter);
                    continue;
                }
            };
            for drink in drinks {
                if seen.insert(drink.id.clone()) {
                    all.push(drink);
                }
            }
        }

        let count = all.len();
        self.drinks.set(all);
        self.state.set(if count == 0 {
            LoadState::Failed
        } else {
            LoadState::Ready
        });
        tracing::info!(drinks = count, failed = failed_letters.len(), "catalog loaded");

        Event::CatalogLoaded {
            drinks: count,
            failed_letters,
            at: Utc::now(),
        }
    }

    /// Clear the error and load again.
    pub async fn retry(&self) -> Event {
        self.load().await
    }
}
