//! Cell structure and rule classification.

use crate::gene::Gene;
use crate::surface::{Choice, Entity};
use serde::{Deserialize, Serialize};

/// Behavioral archetypes, listed in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    TitForTat,
    TwoTitsForTat,
    ForgivingTitForTat,
    AlwaysDefect,
    AlwaysCooperate,
}

impl Rule {
    /// Priority order used by [`classify`]
    pub const PRIORITY: [Rule; 5] = [
        Rule::TitForTat,
        Rule::TwoTitsForTat,
        Rule::ForgivingTitForTat,
        Rule::AlwaysDefect,
        Rule::AlwaysCooperate,
    ];

    /// Whether `entity` matches this archetype
    pub fn matches<E: Entity + ?Sized>(self, entity: &E) -> bool {
        match self {
            Rule::TitForTat => entity.is_tft(),
            Rule::TwoTitsForTat => entity.is_t2t(),
            Rule::ForgivingTitForTat => entity.is_ftf(),
            Rule::AlwaysDefect => entity.is_alld(),
            Rule::AlwaysCooperate => entity.is_allc(),
        }
    }
}

/// First archetype in priority order that `entity` matches
pub fn classify<E: Entity + ?Sized>(entity: &E) -> Option<Rule> {
    Rule::PRIORITY.into_iter().find(|rule| rule.matches(entity))
}

/// A live member of the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub gene: Gene,
    /// Accumulated payoff
    #[serde(default)]
    pub score: f64,
    /// Steps survived
    #[serde(default)]
    pub age: u64,
}

impl Cell {
    pub fn new(gene: Gene) -> Self {
        Self {
            gene,
            score: 0.0,
            age: 0,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    /// Archetype of this cell, if any
    pub fn rule(&self) -> Option<Rule> {
        classify(self)
    }
}

fn all(slots: &[Choice], choice: Choice) -> bool {
    slots.iter().all(|&c| c == choice)
}

impl Entity for Cell {
    type Gene = Gene;

    fn gene(&self) -> &Gene {
        &self.gene
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn age(&self) -> u64 {
        self.age
    }

    // Cooperate first, then retaliate for as long as the opponent defects.
    fn is_tft(&self) -> bool {
        let r = self.gene.reactive();
        r.len() >= 2 && r[0] == Choice::Cooperate && all(&r[1..], Choice::Defect)
    }

    // Tolerate a single defection, retaliate from the second one on.
    fn is_t2t(&self) -> bool {
        let r = self.gene.reactive();
        r.len() >= 3
            && r[0] == Choice::Cooperate
            && r[1] == Choice::Cooperate
            && all(&r[2..], Choice::Defect)
    }

    // Retaliate once, then go back to cooperating against persistent defectors.
    fn is_ftf(&self) -> bool {
        let r = self.gene.reactive();
        r.len() >= 3
            && r[0] == Choice::Cooperate
            && r[1] == Choice::Defect
            && r[r.len() - 1] == Choice::Cooperate
    }

    fn is_alld(&self) -> bool {
        let r = self.gene.reactive();
        !r.is_empty() && all(r, Choice::Defect)
    }

    fn is_allc(&self) -> bool {
        let r = self.gene.reactive();
        !r.is_empty() && all(r, Choice::Cooperate)
    }
}
