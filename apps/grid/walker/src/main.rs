//! Grid Walker
//!
//! Random-walks the grid API, requesting each cell it steps on, and writes the
//! visited part of the map to a JSON file.

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_grid::{Coordinate, RandomSource, SeededRandom, ThreadRandom};
use eyre::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

mod client;
mod walker;

use client::{GridClient, HttpGridClient};

#[derive(Parser)]
#[command(name = "grid_walker")]
#[command(about = "Fill the domain grid by walking it at random")]
struct Cli {
    /// Base URL of the grid API
    #[arg(long, env = "GRID_API_URL", default_value = "http://localhost:8080/api")]
    base_url: String,

    /// Number of cells to request
    #[arg(short, long, default_value_t = 500)]
    steps: usize,

    /// Starting column
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start_x: i64,

    /// Starting row
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start_y: i64,

    /// Where to write the visited map
    #[arg(short, long, default_value = "coordinates_map_filled.json")]
    output: PathBuf,

    /// Seed for a reproducible walk
    #[arg(long)]
    seed: Option<u64>,

    /// Call /seed before walking
    #[arg(long)]
    seed_first: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    let client = HttpGridClient::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))?;
    let random: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };

    if cli.seed_first {
        match client.seed().await {
            Ok(domain) => info!(%domain, "Grid seeded"),
            Err(e) => warn!("Seeding failed, walking anyway: {:#}", e),
        }
    }

    let start = Coordinate::new(cli.start_x, cli.start_y);
    info!(base_url = %cli.base_url, %start, steps = cli.steps, "Starting walk");

    let summary = walker::walk(&client, random.as_ref(), start, cli.steps).await;
    walker::save(&cli.output, &summary.visited).await?;

    info!(
        visited = summary.visited.len(),
        failures = summary.failures,
        output = %cli.output.display(),
        "Map filling complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["grid_walker"]).unwrap();
        assert_eq!(cli.steps, 500);
        assert_eq!((cli.start_x, cli.start_y), (0, 0));
        assert_eq!(cli.output, PathBuf::from("coordinates_map_filled.json"));
        assert!(cli.seed.is_none());
        assert!(!cli.seed_first);
    }

    #[test]
    fn test_cli_accepts_negative_start() {
        let cli = Cli::try_parse_from(["grid_walker", "--start-x", "-4", "--start-y", "7"]).unwrap();
        assert_eq!((cli.start_x, cli.start_y), (-4, 7));
    }
}
