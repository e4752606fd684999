//! SURFACE-STATS - CLI Entry Point
//!
//! Statistics and charts for prisoner's dilemma surface snapshots.

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use surface_stats::config::RunConfig;
use surface_stats::{Config, Grid, SeriesPlotter, StatsCollector, StatsHistory, Surface};

#[derive(Parser)]
#[command(name = "surface-stats")]
#[command(version)]
#[command(about = "Population statistics and charts for prisoner's dilemma surfaces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Write a randomly sampled surface snapshot
    Generate {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Snapshot output (JSON)
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Random seed, overrides the configured one
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print statistics of one snapshot as JSON
    Stats {
        /// Snapshot file (JSON)
        snapshot: PathBuf,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Include relative and absolute population
        #[arg(long)]
        with_population: bool,
    },

    /// Compute one record per snapshot and chart them in order
    Series {
        /// Snapshot files, one per step
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Chart output (.svg or .png)
        #[arg(short, long, default_value = "stats.svg")]
        output: PathBuf,

        /// Also save the records as JSON
        #[arg(long)]
        history: Option<PathBuf>,

        /// Also export the records as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Chart a saved history
    Plot {
        /// History file (JSON)
        history: PathBuf,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Chart output (.svg or .png)
        #[arg(short, long, default_value = "stats.svg")]
        output: PathBuf,
    },
}

impl Commands {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Generate { config, .. }
            | Commands::Stats { config, .. }
            | Commands::Series { config, .. }
            | Commands::Plot { config, .. } => Some(config.as_path()),
            Commands::Init { .. } => None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.command.config_path())?;

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    match cli.command {
        Commands::Init { output } => generate_config(output),

        Commands::Generate { output, seed, .. } => generate_snapshot(&config, output, seed),

        Commands::Stats {
            snapshot,
            with_population,
            ..
        } => print_stats(&config, snapshot, with_population),

        Commands::Series {
            snapshots,
            output,
            history,
            csv,
            ..
        } => run_series(&config, &snapshots, output, history, csv),

        Commands::Plot { history, output, .. } => plot_history(&config, history, output),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) if path.exists() => {
            println!("Loading config from: {:?}", path);
            Ok(Config::from_file(path)?)
        }
        _ => Ok(Config::default()),
    }
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn generate_snapshot(
    config: &Config,
    output: PathBuf,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = seed
        .or(config.run.seed)
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Using seed: {}", seed);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = Grid::random(config, &mut rng)?;
    grid.save_json(&output)?;

    println!(
        "Snapshot saved to: {:?} ({}x{}, population {})",
        output,
        grid.width(),
        grid.height(),
        grid.population()
    );
    Ok(())
}

/// `--with-population` adds the population pass on top of the configured run.
fn stats_collector(run: &RunConfig, with_population: bool) -> StatsCollector {
    let mut run = run.clone();
    run.include_population_stats |= with_population;
    StatsCollector::from_config(&run)
}

fn print_stats(
    config: &Config,
    snapshot: PathBuf,
    with_population: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = Grid::load_json(&snapshot)?;
    let stats = stats_collector(&config.run, with_population).collect(&grid)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_series(
    config: &Config,
    snapshots: &[PathBuf],
    output: PathBuf,
    history_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let collector = StatsCollector::from_config(&config.run);
    let mut history = StatsHistory::new();

    for (step, path) in snapshots.iter().enumerate() {
        let grid = Grid::load_json(path)?;
        let stats = collector.collect(&grid)?;

        if step % config.logging.stats_interval == 0 {
            log::info!("Step {:5} | {}", step, stats.summary());
        }
        history.record(stats);
    }

    if let Some(path) = history_path {
        history.save_json(&path)?;
        println!("History saved to: {:?}", path);
    }
    if let Some(path) = csv_path {
        history.export_csv(&path)?;
        println!("CSV exported to: {:?}", path);
    }

    SeriesPlotter::new(config.plot.clone()).render(&output, &history.records)?;
    println!("Chart saved to: {:?}", output);
    Ok(())
}

fn plot_history(
    config: &Config,
    history_path: PathBuf,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = StatsHistory::load_json(&history_path)?;
    log::info!("Loaded {} records from {:?}", history.len(), history_path);

    SeriesPlotter::new(config.plot.clone()).render(&output, &history.records)?;
    println!("Chart saved to: {:?}", output);
    Ok(())
}
