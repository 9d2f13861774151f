//! Local preference store: drink lists and personal bests.
//!
//! Layout inside the key-value store:
//!
//! ```text
//! lists/recently_viewed   JSON array of Drink, at most MAX_RECENT entries
//! lists/favourites        JSON array of Drink
//! challenge_best/<id>     best completion time in whole seconds
//! ```
//!
//! Reads never fail: unreadable or unparsable data reads as empty. Writes
//! follow the configured [`WritePolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use crate::drink::Drink;
use crate::error::{CoreError, StorageError};

pub const LISTS_NAMESPACE: &str = "lists";
pub const BEST_NAMESPACE: &str = "challenge_best";
pub const RECENT_KEY: &str = "recently_viewed";
pub const FAVOURITES_KEY: &str = "favourites";

/// Upper bound on the recently viewed list.
pub const MAX_RECENT: usize = 10;

/// What happens when a write to local storage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Log the failure and carry on; the in-memory state stays authoritative
    /// until restart.
    #[default]
    FireAndForget,
    /// Return the failure to the caller. In-memory state is not rolled back.
    Surface,
}

pub struct PreferenceStore<S> {
    store: S,
    policy: WritePolicy,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S, policy: WritePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Lists ────────────────────────────────────────────────────────

    pub fn recently_viewed(&self) -> Vec<Drink> {
        let mut list = self.read_list(RECENT_KEY);
        list.truncate(MAX_RECENT);
        list
    }

    pub fn favourites(&self) -> Vec<Drink> {
        self.read_list(FAVOURITES_KEY)
    }

    /// Overwrite the stored recently viewed list with its first
    /// [`MAX_RECENT`] entries.
    pub fn save_recently_viewed(&self, drinks: &[Drink]) -> Result<(), CoreError> {
        let bounded = &drinks[..drinks.len().min(MAX_RECENT)];
        self.write_list(RECENT_KEY, bounded)
    }

    pub fn save_favourites(&self, drinks: &[Drink]) -> Result<(), CoreError> {
        self.write_list(FAVOURITES_KEY, drinks)
    }

    fn read_list(&self, key: &str) -> Vec<Drink> {
        match self.store.get(LISTS_NAMESPACE, key) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(key, error = %e, "stored drink list is unreadable, using empty list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read drink list, using empty list");
                Vec::new()
            }
        }
    }

    fn write_list(&self, key: &str, drinks: &[Drink]) -> Result<(), CoreError> {
        let result = serde_json::to_string(drinks)
            .map_err(CoreError::from)
            .and_then(|json| {
                self.store
                    .set(LISTS_NAMESPACE, key, &json)
                    .map_err(CoreError::from)
            });
        self.apply_policy(LISTS_NAMESPACE, key, result)
    }

    // ── Personal bests ───────────────────────────────────────────────

    /// Best completion time for `drink_id`, if one was ever recorded.
    pub fn best(&self, drink_id: &str) -> Option<u32> {
        match self.store.get(BEST_NAMESPACE, drink_id) {
            Ok(raw) => raw.and_then(|raw| parse_best(drink_id, &raw)),
            Err(e) => {
                tracing::warn!(drink_id, error = %e, "failed to read best time");
                None
            }
        }
    }

    /// Every readable best time, keyed by drink id.
    pub fn all_bests(&self) -> BTreeMap<String, u32> {
        let keys = match self.store.keys(BEST_NAMESPACE) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list best times");
                return BTreeMap::new();
            }
        };
        keys.into_iter()
            .filter_map(|id| self.best(&id).map(|secs| (id, secs)))
            .collect()
    }

    /// Store `seconds` as the best time for `drink_id` if there is no record
    /// yet or it beats the existing one. Zero is never stored.
    ///
    /// Returns whether a write was attempted and did not fail.
    pub fn record_best(&self, drink_id: &str, seconds: u32) -> Result<bool, CoreError> {
        if seconds == 0 {
            return Ok(false);
        }
        // The commit guard must see the real record; a failed read skips the
        // write rather than treating the drink as unrecorded.
        let previous = match self.store.get(BEST_NAMESPACE, drink_id) {
            Ok(raw) => raw.and_then(|raw| parse_best(drink_id, &raw)),
            Err(e) => {
                return self
                    .apply_policy(BEST_NAMESPACE, drink_id, Err(e.into()))
                    .map(|()| false);
            }
        };
        if !is_improvement(previous, seconds) {
            tracing::debug!(drink_id, seconds, ?previous, "candidate does not beat best");
            return Ok(false);
        }
        let result = self
            .store
            .set(BEST_NAMESPACE, drink_id, &seconds.to_string())
            .map_err(CoreError::from);
        let written = result.is_ok();
        self.apply_policy(BEST_NAMESPACE, drink_id, result)?;
        if written {
            tracing::info!(drink_id, seconds, ?previous, "new personal best");
        }
        Ok(written)
    }

    fn apply_policy(
        &self,
        namespace: &str,
        key: &str,
        result: Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        match (result, self.policy) {
            (Ok(()), _) => Ok(()),
            (Err(e), WritePolicy::FireAndForget) => {
                tracing::warn!(namespace, key, error = %e, "preference write dropped");
                Ok(())
            }
            (Err(e), WritePolicy::Surface) => Err(match e {
                CoreError::Storage(inner) => CoreError::Storage(inner),
                other => CoreError::Storage(StorageError::WriteFailed {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                    message: other.to_string(),
                }),
            }),
        }
    }
}

fn parse_best(drink_id: &str, raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!(drink_id, error = %e, "stored best time is unreadable");
            None
        }
    }
}

/// Commit rule for personal bests: strictly lower wins, first record always
/// wins.
pub fn is_improvement(previous: Option<u32>, candidate: u32) -> bool {
    previous.map_or(true, |best| candidate < best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use crate::storage::SqliteStore;
    use proptest::prelude::*;

    /// Store whose writes always fail; reads see nothing.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str, _: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }
        fn set(&self, _: &str, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
        fn remove(&self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
        fn keys(&self, _: &str) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Locked)
        }
    }

    /// Memory store whose reads can be switched to fail.
    #[derive(Default)]
    struct FlakyReads {
        inner: MemoryStore,
        fail_reads: std::sync::atomic::AtomicBool,
    }

    impl FlakyReads {
        fn set_failing(&self, failing: bool) {
            self.fail_reads
                .store(failing, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl KeyValueStore for FlakyReads {
        fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StorageError::Locked);
            }
            self.inner.get(namespace, key)
        }
        fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(namespace, key, value)
        }
        fn remove(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
            self.inner.remove(namespace, key)
        }
        fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
            self.inner.keys(namespace)
        }
    }

    fn prefs() -> PreferenceStore<MemoryStore> {
        PreferenceStore::new(MemoryStore::new(), WritePolicy::FireAndForget)
    }

    #[test]
    fn best_time_scenario() {
        let prefs = prefs();
        assert_eq!(prefs.best("5"), None);
        assert!(prefs.record_best("5", 45).unwrap());
        assert_eq!(prefs.best("5"), Some(45));
        assert!(!prefs.record_best("5", 50).unwrap());
        assert_eq!(prefs.best("5"), Some(45));
        assert!(!prefs.record_best("5", 45).unwrap());
        assert!(prefs.record_best("5", 30).unwrap());
        assert_eq!(prefs.best("5"), Some(30));
    }

    #[test]
    fn zero_is_never_recorded() {
        let prefs = prefs();
        assert!(!prefs.record_best("5", 0).unwrap());
        assert_eq!(prefs.best("5"), None);
    }

    #[test]
    fn bests_are_independent_per_drink() {
        let prefs = prefs();
        prefs.record_best("1", 20).unwrap();
        prefs.record_best("2", 90).unwrap();
        prefs.record_best("1", 10).unwrap();
        let all = prefs.all_bests();
        assert_eq!(all.get("1"), Some(&10));
        assert_eq!(all.get("2"), Some(&90));
    }

    #[test]
    fn recent_writes_are_bounded() {
        let prefs = prefs();
        let drinks: Vec<Drink> = (0..15)
            .map(|i| Drink::new(i.to_string(), format!("Drink {i}")))
            .collect();
        prefs.save_recently_viewed(&drinks).unwrap();
        let stored = prefs.recently_viewed();
        assert_eq!(stored.len(), MAX_RECENT);
        assert_eq!(stored[0].id, "0");
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let prefs = prefs();
        prefs
            .store()
            .set(LISTS_NAMESPACE, FAVOURITES_KEY, "{not json")
            .unwrap();
        prefs.store().set(BEST_NAMESPACE, "7", "fast").unwrap();
        assert!(prefs.favourites().is_empty());
        assert_eq!(prefs.best("7"), None);
        assert!(prefs.all_bests().is_empty());
    }

    #[test]
    fn fire_and_forget_swallows_write_failures() {
        let prefs = PreferenceStore::new(BrokenStore, WritePolicy::FireAndForget);
        assert!(prefs.save_favourites(&[Drink::new("1", "A")]).is_ok());
        assert!(!prefs.record_best("1", 30).unwrap());
        assert!(prefs.favourites().is_empty());
    }

    #[test]
    fn surface_policy_reports_write_failures() {
        let prefs = PreferenceStore::new(BrokenStore, WritePolicy::Surface);
        assert!(matches!(
            prefs.save_favourites(&[Drink::new("1", "A")]),
            Err(CoreError::Storage(StorageError::Locked))
        ));
        assert!(prefs.record_best("1", 30).is_err());
    }

    #[test]
    fn failed_read_never_overwrites_best() {
        let prefs = PreferenceStore::new(FlakyReads::default(), WritePolicy::FireAndForget);
        assert!(prefs.record_best("5", 30).unwrap());

        prefs.store().set_failing(true);
        assert!(!prefs.record_best("5", 90).unwrap());
        prefs.store().set_failing(false);
        assert_eq!(prefs.best("5"), Some(30));
    }

    #[test]
    fn failed_read_surfaces_under_surface_policy() {
        let prefs = PreferenceStore::new(FlakyReads::default(), WritePolicy::Surface);
        prefs.record_best("5", 30).unwrap();

        prefs.store().set_failing(true);
        assert!(matches!(
            prefs.record_best("5", 90),
            Err(CoreError::Storage(StorageError::Locked))
        ));
        prefs.store().set_failing(false);
        assert_eq!(prefs.best("5"), Some(30));
    }

    #[test]
    fn unreadable_best_counts_as_unrecorded() {
        let prefs = prefs();
        prefs.store().set(BEST_NAMESPACE, "5", "fast").unwrap();
        assert!(prefs.record_best("5", 40).unwrap());
        assert_eq!(prefs.best("5"), Some(40));
    }

    #[test]
    fn lists_survive_in_sqlite() {
        let prefs = PreferenceStore::new(SqliteStore::open_memory().unwrap(), WritePolicy::Surface);
        let fav = vec![Drink::new("11007", "Margarita").with_ingredient("Tequila", Some("1 oz"))];
        prefs.save_favourites(&fav).unwrap();
        assert_eq!(prefs.favourites(), fav);
    }

    proptest! {
        #[test]
        fn best_is_monotonically_non_increasing(times in prop::collection::vec(0u32..500, 1..40)) {
            let prefs = prefs();
            let mut expected: Option<u32> = None;
            for t in times {
                let before = prefs.best("x");
                prefs.record_best("x", t).unwrap();
                let after = prefs.best("x");
                if let (Some(b), Some(a)) = (before, after) {
                    prop_assert!(a <= b);
                }
                if t > 0 && expected.map_or(true, |e| t < e) {
                    expected = Some(t);
                }
                prop_assert_eq!(after, expected);
            }
        }
    }
}
