use clap::Subcommand;
use mixology_core::{Config, ConfigError};

use crate::context::print_json;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key, e.g. "storage.write_policy" or "challenge.default_mode"
        key: String,
    },
    /// Change one setting and save the file
    Set {
        key: String,
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Overwrite the config file with defaults
    Reset,
    /// Print where the config file lives
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            // Echo what was stored; enum values come back normalised.
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => print_json(&Config::load()?)?,
        ConfigAction::Reset => {
            Config::default().save()?;
            eprintln!("config reset to defaults");
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
    }
    Ok(())
}
