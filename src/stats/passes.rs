//! Single-traversal aggregation passes.
//!
//! Each pass reads the surface once and returns a partial record with its own
//! keys. Empty populations fall back per pass: some statistics become null,
//! others 0.0.

use super::math::mean_and_stddev;
use super::record::{StatValue, StatsRecord};
use super::StatsError;
use crate::cell::{classify, Rule};
use crate::surface::{Entity, Genome, Surface};

pub const INIT_MOVE_FRAC: &str = "init_move_frac";
pub const DEF_FRAC_MEAN: &str = "def_frac_mean";
pub const DEF_FRAC_STDDEV: &str = "def_frac_stddev";
pub const LENGTH_MEAN: &str = "length_mean";
pub const LENGTH_STDDEV: &str = "length_stddev";
pub const SCORES_MEAN: &str = "scores_mean";
pub const SCORES_STDDEV: &str = "scores_stddev";
pub const AGE_MEAN: &str = "age_mean";
pub const AGE_STDDEV: &str = "age_stddev";
pub const RULE_FRAC_TFTS: &str = "rule_frac_tfts";
pub const RULE_FRAC_T2TS: &str = "rule_frac_t2ts";
pub const RULE_FRAC_FTFS: &str = "rule_frac_ftfs";
pub const RULE_FRAC_ALLD: &str = "rule_frac_alld";
pub const RULE_FRAC_ALLC: &str = "rule_frac_allc";
pub const POP_REL: &str = "pop_rel";
pub const POP_ABS: &str = "pop_abs";

/// Statistic key for a rule archetype
pub fn rule_key(rule: Rule) -> &'static str {
    match rule {
        Rule::TitForTat => RULE_FRAC_TFTS,
        Rule::TwoTitsForTat => RULE_FRAC_T2TS,
        Rule::ForgivingTitForTat => RULE_FRAC_FTFS,
        Rule::AlwaysDefect => RULE_FRAC_ALLD,
        Rule::AlwaysCooperate => RULE_FRAC_ALLC,
    }
}

fn collect<S, F>(surface: &S, mut value: F) -> Vec<f64>
where
    S: Surface,
    F: FnMut(&S::Cell) -> f64,
{
    let mut values = Vec::with_capacity(surface.population());
    surface.visit(|cell| values.push(value(cell)));
    values
}

/// Percentage of cells whose first reactive move (gene index 1) is a defection.
///
/// Null when the population is empty.
pub fn init_move_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let mut stats = StatsRecord::new();
    if surface.population() == 0 {
        stats.insert(INIT_MOVE_FRAC, StatValue::Null)?;
        return Ok(stats);
    }

    let mut moves = Vec::with_capacity(surface.population());
    let mut too_short = None;
    surface.visit(|cell| {
        let gene = cell.gene();
        match gene.choice_at(1) {
            Some(choice) => moves.push(choice),
            None => {
                too_short.get_or_insert(gene.len());
            }
        }
    });
    if let Some(len) = too_short {
        return Err(StatsError::GeneTooShort { len });
    }

    let frac = if moves.is_empty() {
        None
    } else {
        let defects = moves.iter().filter(|c| c.is_defect()).count();
        Some(defects as f64 / moves.len() as f64 * 100.0)
    };
    stats.insert(INIT_MOVE_FRAC, frac)?;
    Ok(stats)
}

/// Mean and spread of each gene's defect fraction, as percentages.
///
/// Both 0.0 when the population is empty.
pub fn fraction_def_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let (mean, stddev) = if surface.population() == 0 {
        (0.0, 0.0)
    } else {
        let fractions = collect(surface, |cell| cell.gene().defect_fraction());
        mean_and_stddev(&fractions).unwrap_or((0.0, 0.0))
    };

    let mut stats = StatsRecord::new();
    stats.insert(DEF_FRAC_MEAN, mean * 100.0)?;
    stats.insert(DEF_FRAC_STDDEV, stddev * 100.0)?;
    Ok(stats)
}

/// Mean and spread of gene length, opening move excluded.
///
/// Null when the population is empty.
pub fn gene_length_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let summary = if surface.population() == 0 {
        None
    } else {
        let lengths = collect(surface, |cell| cell.gene().len() as f64 - 1.0);
        mean_and_stddev(&lengths)
    };
    mean_stddev_record(LENGTH_MEAN, LENGTH_STDDEV, summary)
}

/// Mean and spread of cell scores. Null when the population is empty.
pub fn score_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let summary = if surface.population() == 0 {
        None
    } else {
        mean_and_stddev(&collect(surface, |cell| cell.score()))
    };
    mean_stddev_record(SCORES_MEAN, SCORES_STDDEV, summary)
}

/// Mean and spread of cell ages. Null when the population is empty.
pub fn age_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let summary = if surface.population() == 0 {
        None
    } else {
        mean_and_stddev(&collect(surface, |cell| cell.age() as f64))
    };
    mean_stddev_record(AGE_MEAN, AGE_STDDEV, summary)
}

fn mean_stddev_record(
    mean_key: &str,
    stddev_key: &str,
    summary: Option<(f64, f64)>,
) -> Result<StatsRecord, StatsError> {
    let mut stats = StatsRecord::new();
    stats.insert(mean_key, summary.map(|(m, _)| m))?;
    stats.insert(stddev_key, summary.map(|(_, sd)| sd))?;
    Ok(stats)
}

/// Percentage of the population in each rule archetype.
///
/// Every cell counts towards its first matching archetype only. All five are
/// 0.0 when the population is empty.
pub fn rule_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let population = surface.population();
    let mut counts = [0usize; Rule::PRIORITY.len()];

    if population != 0 {
        for cell in surface.enumerate_all() {
            if let Some(rule) = classify(cell) {
                counts[rule as usize] += 1;
            }
        }
    }

    let mut stats = StatsRecord::new();
    for (rule, count) in Rule::PRIORITY.into_iter().zip(counts) {
        let frac = if population == 0 {
            0.0
        } else {
            count as f64 / population as f64
        };
        stats.insert(rule_key(rule), frac * 100.0)?;
    }
    Ok(stats)
}

/// Occupied share of the grid as a percentage, plus the absolute count
pub fn population_stats<S: Surface>(surface: &S) -> Result<StatsRecord, StatsError> {
    let map_size = surface.map_size();
    if map_size == 0 {
        return Err(StatsError::ZeroAreaSurface {
            width: surface.width(),
            height: surface.height(),
        });
    }
    let population = surface.population();

    let mut stats = StatsRecord::new();
    stats.insert(POP_REL, population as f64 / map_size as f64 * 100.0)?;
    stats.insert(POP_ABS, population as u64)?;
    Ok(stats)
}
