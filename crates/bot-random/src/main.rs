//! Self-play driver.
//!
//! Plays one game between two move choosers running on the background
//! search worker, logging every ply, and prints the final board.
//!
//! Set `RUST_LOG=debug` to see worker spawns, cancels and fallbacks.

mod config;
mod selfplay;

use clap::Parser;
use config::SelfPlayConfig;
use selfplay::Outcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Plays a chess game between two move choosers.
#[derive(Parser)]
#[command(name = "bot-random")]
#[command(about = "Plays a self-play chess game with random move choosers")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value_os_t = SelfPlayConfig::config_path())]
    config: PathBuf,

    /// Override the ply limit from the config file
    #[arg(long)]
    max_plies: Option<u32>,

    /// Override the random seed from the config file
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut config = SelfPlayConfig::load(&args.config)?;
    if let Some(max_plies) = args.max_plies {
        config.max_plies = max_plies;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    tracing::info!(?config, "starting self-play");

    let (game, outcome) = selfplay::play(&config)?;

    print!("{}", game.board());
    match outcome {
        Outcome::Checkmate { winner } => println!("checkmate, {} wins", winner),
        Outcome::Stalemate => println!("stalemate"),
        Outcome::PlyLimit => println!("ply limit of {} reached", config.max_plies),
    }
    Ok(())
}
