//! Contracts between the statistics passes and the population they read.
//!
//! A surface is anything that can report its dimensions and population and
//! walk its live cells. Statistics never mutate what they visit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One move of the iterated prisoner's dilemma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    #[serde(rename = "c")]
    Cooperate,
    #[serde(rename = "d")]
    Defect,
}

impl Choice {
    /// Single-letter symbol used in gene strings
    pub fn symbol(self) -> char {
        match self {
            Choice::Cooperate => 'c',
            Choice::Defect => 'd',
        }
    }

    /// Parse a single-letter symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'c' | 'C' => Some(Choice::Cooperate),
            'd' | 'D' => Some(Choice::Defect),
            _ => None,
        }
    }

    pub fn is_defect(self) -> bool {
        self == Choice::Defect
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Behavioral sequence carried by a cell
pub trait Genome {
    /// Choice at a step index, `None` past the end of the sequence
    fn choice_at(&self, index: usize) -> Option<Choice>;

    /// Fraction (0.0 - 1.0) of defecting choices over the whole sequence
    fn defect_fraction(&self) -> f64;

    /// Sequence length, opening move included
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A live member of the population
pub trait Entity {
    type Gene: Genome;

    fn gene(&self) -> &Self::Gene;
    fn score(&self) -> f64;
    fn age(&self) -> u64;

    fn is_tft(&self) -> bool;
    fn is_t2t(&self) -> bool;
    fn is_ftf(&self) -> bool;
    fn is_alld(&self) -> bool;
    fn is_allc(&self) -> bool;
}

/// Grid-shaped container of live entities
pub trait Surface {
    type Cell: Entity;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Number of live entities
    fn population(&self) -> usize;

    /// Apply `f` to every live entity, in implementation-defined order
    fn visit<F>(&self, f: F)
    where
        F: FnMut(&Self::Cell);

    /// Every live entity
    fn enumerate_all(&self) -> impl Iterator<Item = &Self::Cell> + '_;

    /// Number of sites on the grid
    fn map_size(&self) -> usize {
        self.width() * self.height()
    }
}
