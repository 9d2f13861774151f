use clap::Subcommand;
use mixology_core::{format_clock, Config};
use serde::Serialize;

use crate::context::{open_library, print_json};

#[derive(Subcommand)]
pub enum BestAction {
    /// Personal best for one drink
    Get {
        /// Drink ID
        id: String,
    },
    /// Every recorded personal best
    List,
}

#[derive(Serialize)]
struct BestEntry {
    drink_id: String,
    seconds: Option<u32>,
    clock: Option<String>,
}

impl BestEntry {
    fn new(drink_id: String, seconds: Option<u32>) -> Self {
        Self {
            drink_id,
            seconds,
            clock: seconds.map(format_clock),
        }
    }
}

pub fn run(action: BestAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = open_library(&config)?;
    let prefs = library.prefs();

    match action {
        BestAction::Get { id } => {
            let seconds = prefs.best(&id);
            print_json(&BestEntry::new(id, seconds))?;
        }
        BestAction::List => {
            let entries: Vec<_> = prefs
                .all_bests()
                .into_iter()
                .map(|(id, secs)| BestEntry::new(id, Some(secs)))
                .collect();
            print_json(&entries)?;
        }
    }
    Ok(())
}
