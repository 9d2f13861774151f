use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "mixology", version, about = "Mixology CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and search the cocktail catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Recently viewed drinks
    Recent {
        #[command(subcommand)]
        action: commands::recent::RecentAction,
    },
    /// Favourite drinks
    Favourite {
        #[command(subcommand)]
        action: commands::favourite::FavouriteAction,
    },
    /// Challenge mode timer
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Personal best times
    Best {
        #[command(subcommand)]
        action: commands::best::BestAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MIXOLOGY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action).await,
        Commands::Recent { action } => commands::recent::run(action),
        Commands::Favourite { action } => commands::favourite::run(action).await,
        Commands::Challenge { action } => commands::challenge::run(action).await,
        Commands::Best { action } => commands::best::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
