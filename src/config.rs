//! Configuration system for surface sampling, statistics and charts.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub surface: SurfaceConfig,
    pub genes: GeneConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid dimensions and sampling of the population living on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Sites per row
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Probability that a site is occupied (0.0 - 1.0)
    pub initial_density: f64,
    /// Upper bound for sampled scores
    pub max_score: f64,
    /// Upper bound for sampled ages
    pub max_age: u64,
}

/// Gene sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneConfig {
    /// Shortest gene, opening move included
    pub min_length: usize,
    /// Longest gene, opening move included
    pub max_length: usize,
    /// Probability that a slot is a defection (0.0 - 1.0)
    pub defect_bias: f64,
}

/// Statistics run options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Random seed for snapshot generation
    pub seed: Option<u64>,
    /// Append `pop_rel`/`pop_abs` to every record
    #[serde(default)]
    pub include_population_stats: bool,
}

/// Chart output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Records between progress lines in series runs
    pub stats_interval: usize,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            genes: GeneConfig::default(),
            run: RunConfig::default(),
            plot: PlotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            initial_density: 0.6,
            max_score: 50.0,
            max_age: 100,
        }
    }
}

impl Default for GeneConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 6,
            defect_bias: 0.5,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: "Population statistics".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            log_level: "info".to_string(),
        }
    }
}

/// Errors loading or saving a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err("surface width and height must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.surface.initial_density) {
            return Err("initial_density must be between 0.0 and 1.0".to_string());
        }
        if self.surface.max_score.is_nan() || self.surface.max_score < 0.0 {
            return Err("max_score must be >= 0".to_string());
        }
        if self.genes.min_length < 2 {
            return Err("min_length must be >= 2 (opening move plus one reaction)".to_string());
        }
        if self.genes.min_length > self.genes.max_length {
            return Err("min_length cannot exceed max_length".to_string());
        }
        if !(0.0..=1.0).contains(&self.genes.defect_bias) {
            return Err("defect_bias must be between 0.0 and 1.0".to_string());
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err("plot width and height must be > 0".to_string());
        }
        if self.logging.stats_interval == 0 {
            return Err("stats_interval must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.surface.width, loaded.surface.width);
        assert_eq!(config.genes.max_length, loaded.genes.max_length);
        assert_eq!(config.plot.title, loaded.plot.title);
    }

    #[test]
    fn test_optional_sections_default() {
        let yaml = "
surface:
  width: 10
  height: 5
  initial_density: 0.5
  max_score: 10.0
  max_age: 20
genes:
  min_length: 3
  max_length: 3
  defect_bias: 0.2
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.run.seed, None);
        assert!(!config.run.include_population_stats);
        assert_eq!(config.plot.width, 1200);
    }

    #[test]
    fn test_invalid_gene_bounds() {
        let mut config = Config::default();
        config.genes.min_length = 5;
        config.genes.max_length = 3;
        assert!(config.validate().is_err());

        config.genes.min_length = 1;
        config.genes.max_length = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let path = std::env::temp_dir().join("surface_stats_invalid_config.yaml");
        let mut config = Config::default();
        config.surface.width = 0;
        config.save(&path).unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        std::fs::remove_file(&path).ok();
    }
}
