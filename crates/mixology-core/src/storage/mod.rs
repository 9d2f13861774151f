mod config;
pub mod database;
pub mod kv;
pub mod preferences;

pub use config::{CatalogConfig, ChallengeConfig, Config, StorageConfig};
pub use database::SqliteStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use preferences::{PreferenceStore, WritePolicy, MAX_RECENT};

use std::io;
use std::path::PathBuf;

/// Directory holding `config.toml` and `mixology.db`, created on first use.
///
/// `MIXOLOGY_ENV=dev` selects `mixology-dev` instead, keeping development
/// favourites and best times apart from real ones.
pub fn data_dir() -> io::Result<PathBuf> {
    let env = std::env::var("MIXOLOGY_ENV").ok();
    let dir = dir_for(dirs::home_dir(), env.as_deref());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn dir_for(home: Option<PathBuf>, env: Option<&str>) -> PathBuf {
    let name = match env {
        Some("dev") => "mixology-dev",
        _ => "mixology",
    };
    home.unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_env_gets_its_own_directory() {
        let home = Some(PathBuf::from("/home/u"));
        assert_eq!(
            dir_for(home.clone(), None),
            PathBuf::from("/home/u/.config/mixology")
        );
        assert_eq!(
            dir_for(home.clone(), Some("dev")),
            PathBuf::from("/home/u/.config/mixology-dev")
        );
        assert_eq!(
            dir_for(home, Some("staging")),
            PathBuf::from("/home/u/.config/mixology")
        );
    }

    #[test]
    fn missing_home_falls_back_to_working_directory() {
        assert_eq!(dir_for(None, None), PathBuf::from("./.config/mixology"));
    }
}
