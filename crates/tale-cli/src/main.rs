//! CLI frontend for the Tale text adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "tale",
    about = "Tale - a turn-based text adventure",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the adventure in an interactive shell
    Play {
        /// RNG seed for reproducible combat
        #[arg(short, long, env = "TALE_SEED")]
        seed: Option<u64>,

        /// Name of your character
        #[arg(short, long, env = "TALE_PLAYER_NAME", default_value = "Hero")]
        name: String,

        /// Directory for save files (default: saves are kept in memory)
        #[arg(short, long, env = "TALE_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// List the commands the game understands
    Commands,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tale=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            seed,
            name,
            data_dir,
        } => commands::play::run(seed, &name, data_dir.as_deref()),
        Commands::Commands => commands::list::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
