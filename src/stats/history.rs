//! Per-step record collection.

use super::record::{StatValue, StatsRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors saving or loading a history
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered stats records, one per simulation step
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded snapshots, index = step
    pub records: Vec<StatsRecord>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next step
    pub fn record(&mut self, stats: StatsRecord) {
        self.records.push(stats);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// CSV with a `step` column followed by the first record's keys.
    ///
    /// Null and missing values are left empty.
    pub fn to_csv(&self) -> String {
        let keys: Vec<&str> = self
            .records
            .first()
            .map(|r| r.keys().collect())
            .unwrap_or_default();

        let mut csv = String::from("step");
        for key in &keys {
            csv.push(',');
            csv.push_str(key);
        }
        csv.push('\n');

        for (step, record) in self.records.iter().enumerate() {
            csv.push_str(&step.to_string());
            for key in &keys {
                csv.push(',');
                match record.get(key) {
                    Some(StatValue::Int(v)) => csv.push_str(&v.to_string()),
                    Some(StatValue::Float(v)) => csv.push_str(&v.to_string()),
                    Some(StatValue::Null) | None => {}
                }
            }
            csv.push('\n');
        }
        csv
    }

    /// Write [`StatsHistory::to_csv`] to a file
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), HistoryError> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }

    /// Save history to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load history from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
