//! # SURFACE-STATS
//!
//! Population statistics for cellular iterated prisoner's dilemma surfaces,
//! and time series charts of those statistics.
//!
//! ## Features
//!
//! - **Single pass**: every statistic group is one read-only traversal
//! - **Explicit merge**: passes return disjoint partial records
//! - **Charts**: one line per statistic via `plotters` (SVG or PNG)
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded snapshot generation
//!
//! ## Quick Start
//!
//! ```rust
//! use surface_stats::{get_stats, Cell, Grid};
//!
//! let mut grid = Grid::new(2, 2).unwrap();
//! grid.place(0, 0, Cell::new("ccd".parse().unwrap())).unwrap();
//! grid.place(1, 1, Cell::new("cddd".parse().unwrap())).unwrap();
//!
//! let stats = get_stats(&grid).unwrap();
//! println!("{}", stats.summary());
//! ```
//!
//! ## Charts
//!
//! ```rust,no_run
//! use surface_stats::{Config, Grid, SeriesPlotter, StatsCollector, StatsHistory};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = Config::default();
//! let collector = StatsCollector::from_config(&config.run);
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut history = StatsHistory::new();
//!
//! for _ in 0..10 {
//!     let grid = Grid::random(&config, &mut rng).unwrap();
//!     history.record(collector.collect(&grid).unwrap());
//! }
//!
//! SeriesPlotter::new(config.plot.clone())
//!     .render("stats.svg", &history.records)
//!     .unwrap();
//! ```

pub mod cell;
pub mod config;
pub mod gene;
pub mod grid;
pub mod plot;
pub mod stats;
pub mod surface;

// Re-export main types
pub use cell::{Cell, Rule};
pub use config::Config;
pub use gene::Gene;
pub use grid::Grid;
pub use plot::{PlotError, SeriesPlotter};
pub use stats::{
    get_stats, get_stats_with, StatValue, StatsCollector, StatsError, StatsHistory, StatsPass,
    StatsRecord,
};
pub use surface::{Choice, Entity, Genome, Surface};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
