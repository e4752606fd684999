//! Reactive move sequences.
//!
//! Slot 0 holds the fixed opening move. Slot `k >= 1` holds the move played
//! after `k - 1` consecutive defections by the opponent; the last slot covers
//! every longer run.

use crate::surface::{Choice, Genome};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequence of cooperate/defect choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gene {
    seq: Vec<Choice>,
}

impl Gene {
    pub fn new(seq: Vec<Choice>) -> Self {
        Self { seq }
    }

    /// Random gene of `length` slots, each defecting with probability `defect_bias`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, length: usize, defect_bias: f64) -> Self {
        let seq = (0..length)
            .map(|_| {
                if rng.gen_bool(defect_bias) {
                    Choice::Defect
                } else {
                    Choice::Cooperate
                }
            })
            .collect();
        Self { seq }
    }

    pub fn seq(&self) -> &[Choice] {
        &self.seq
    }

    /// Slots after the opening move
    pub fn reactive(&self) -> &[Choice] {
        self.seq.get(1..).unwrap_or(&[])
    }
}

impl Genome for Gene {
    fn choice_at(&self, index: usize) -> Option<Choice> {
        self.seq.get(index).copied()
    }

    fn defect_fraction(&self) -> f64 {
        if self.seq.is_empty() {
            return 0.0;
        }
        let defects = self.seq.iter().filter(|c| c.is_defect()).count();
        defects as f64 / self.seq.len() as f64
    }

    fn len(&self) -> usize {
        self.seq.len()
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for choice in &self.seq {
            write!(f, "{}", choice)?;
        }
        Ok(())
    }
}

/// Error parsing a gene string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid gene symbol '{symbol}' at position {position}")]
pub struct ParseGeneError {
    pub symbol: char,
    pub position: usize,
}

impl FromStr for Gene {
    type Err = ParseGeneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seq = s
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                Choice::from_symbol(symbol).ok_or(ParseGeneError { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { seq })
    }
}
