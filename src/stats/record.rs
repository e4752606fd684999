//! Statistic values and the records that hold them.

use super::StatsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One statistic: a float, an integer count, or "no data"
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Null,
    Int(u64),
    Float(f64),
}

impl StatValue {
    /// Numeric value, `None` for [`StatValue::Null`]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            StatValue::Null => None,
            StatValue::Int(v) => Some(v as f64),
            StatValue::Float(v) => Some(v),
        }
    }

    pub fn is_null(self) -> bool {
        matches!(self, StatValue::Null)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        StatValue::Int(v)
    }
}

impl From<Option<f64>> for StatValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(StatValue::Null, StatValue::Float)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Null => write!(f, "null"),
            StatValue::Int(v) => write!(f, "{}", v),
            StatValue::Float(v) => write!(f, "{:.3}", v),
        }
    }
}

/// Statistic name to value, iterated in sorted key order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsRecord {
    values: BTreeMap<String, StatValue>,
}

impl StatsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statistic; a key may only be set once
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<(), StatsError>
    where
        K: Into<String>,
        V: Into<StatValue>,
    {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(StatsError::DuplicateKey(key));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Move every statistic of `other` into this record.
    ///
    /// Fails without modifying `self` if any key is already present.
    pub fn merge(&mut self, other: StatsRecord) -> Result<(), StatsError> {
        if let Some(key) = other.values.keys().find(|k| self.values.contains_key(*k)) {
            return Err(StatsError::DuplicateKey(key.clone()));
        }
        self.values.extend(other.values);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<StatValue> {
        self.values.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StatValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl<K: Into<String>, V: Into<StatValue>> FromIterator<(K, V)> for StatsRecord {
    /// Later duplicates overwrite earlier ones; use [`StatsRecord::insert`] to reject them
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
