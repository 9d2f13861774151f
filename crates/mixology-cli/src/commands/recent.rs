use clap::Subcommand;
use mixology_core::Config;

use crate::context::{open_library, print_json};

#[derive(Subcommand)]
pub enum RecentAction {
    /// List recently viewed drinks, most recent first
    List,
}

pub fn run(action: RecentAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = open_library(&config)?;

    match action {
        RecentAction::List => print_json(&library.recently_viewed())?,
    }
    Ok(())
}
