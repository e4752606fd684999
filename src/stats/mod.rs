//! Population statistics for a surface.
//!
//! [`get_stats`] runs the default passes over a surface and merges their
//! partial records into one [`StatsRecord`]. Passes are independent, read
//! only, and never share keys.

pub mod history;
pub mod math;
pub mod passes;
pub mod record;

pub use history::{HistoryError, StatsHistory};
pub use record::{StatValue, StatsRecord};

use crate::config::RunConfig;
use crate::surface::Surface;

/// Errors raised while aggregating a surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("gene of length {len} has no move at index 1")]
    GeneTooShort { len: usize },
    #[error("surface {width}x{height} has no sites")]
    ZeroAreaSurface { width: usize, height: usize },
    #[error("statistic '{0}' produced twice")]
    DuplicateKey(String),
}

/// One aggregation pass over a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsPass {
    InitMove,
    DefectFraction,
    GeneLength,
    Score,
    Rule,
    Age,
    Population,
}

impl StatsPass {
    /// Passes run by [`get_stats`]
    pub const DEFAULT: [StatsPass; 6] = [
        StatsPass::InitMove,
        StatsPass::DefectFraction,
        StatsPass::GeneLength,
        StatsPass::Score,
        StatsPass::Rule,
        StatsPass::Age,
    ];

    /// Default passes plus population density
    pub const ALL: [StatsPass; 7] = [
        StatsPass::InitMove,
        StatsPass::DefectFraction,
        StatsPass::GeneLength,
        StatsPass::Score,
        StatsPass::Rule,
        StatsPass::Age,
        StatsPass::Population,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatsPass::InitMove => "init_move",
            StatsPass::DefectFraction => "fraction_def",
            StatsPass::GeneLength => "gene_length",
            StatsPass::Score => "score",
            StatsPass::Rule => "rule",
            StatsPass::Age => "age",
            StatsPass::Population => "population",
        }
    }

    /// Keys this pass produces
    pub fn keys(self) -> &'static [&'static str] {
        use passes::*;
        match self {
            StatsPass::InitMove => &[INIT_MOVE_FRAC],
            StatsPass::DefectFraction => &[DEF_FRAC_MEAN, DEF_FRAC_STDDEV],
            StatsPass::GeneLength => &[LENGTH_MEAN, LENGTH_STDDEV],
            StatsPass::Score => &[SCORES_MEAN, SCORES_STDDEV],
            StatsPass::Rule => &[
                RULE_FRAC_TFTS,
                RULE_FRAC_T2TS,
                RULE_FRAC_FTFS,
                RULE_FRAC_ALLD,
                RULE_FRAC_ALLC,
            ],
            StatsPass::Age => &[AGE_MEAN, AGE_STDDEV],
            StatsPass::Population => &[POP_REL, POP_ABS],
        }
    }

    /// Run this pass, producing its partial record
    pub fn run<S: Surface>(self, surface: &S) -> Result<StatsRecord, StatsError> {
        match self {
            StatsPass::InitMove => passes::init_move_stats(surface),
            StatsPass::DefectFraction => passes::fraction_def_stats(surface),
            StatsPass::GeneLength => passes::gene_length_stats(surface),
            StatsPass::Score => passes::score_stats(surface),
            StatsPass::Rule => passes::rule_stats(surface),
            StatsPass::Age => passes::age_stats(surface),
            StatsPass::Population => passes::population_stats(surface),
        }
    }
}

/// Ordered list of passes applied to every surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsCollector {
    passes: Vec<StatsPass>,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self {
            passes: StatsPass::DEFAULT.to_vec(),
        }
    }
}

impl StatsCollector {
    /// Collector running the default passes
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector running exactly `passes`, in order
    pub fn with_passes(passes: &[StatsPass]) -> Self {
        Self {
            passes: passes.to_vec(),
        }
    }

    /// Collector for a run configuration
    pub fn from_config(config: &RunConfig) -> Self {
        let mut collector = Self::new();
        if config.include_population_stats {
            collector.passes.push(StatsPass::Population);
        }
        collector
    }

    pub fn passes(&self) -> &[StatsPass] {
        &self.passes
    }

    /// Run every pass and merge the partial records
    pub fn collect<S: Surface>(&self, surface: &S) -> Result<StatsRecord, StatsError> {
        get_stats_with(surface, &self.passes)
    }
}

/// Statistics from the default passes
pub fn get_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    get_stats_with(surface, &StatsPass::DEFAULT)
}

/// Statistics from an explicit pass list
pub fn get_stats_with<S: Surface>(
    surface: &S,
    passes: &[StatsPass],
) -> Result<StatsRecord, StatsError> {
    let mut stats = StatsRecord::new();
    for pass in passes {
        log::debug!(
            "Running {} pass: population={}",
            pass.name(),
            surface.population()
        );
        stats.merge(pass.run(surface)?)?;
    }
    Ok(stats)
}
