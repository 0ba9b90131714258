//! TOML configuration for search limits and benchmark sweeps.
//!
//! ```
//! use npuzzle_search::config::BenchConfig;
//!
//! let config = BenchConfig::from_toml_str(r#"
//!     sizes = [3]
//!     scramble_moves = [10, 20]
//!     strategies = ["breadth-first", "a-star-manhattan"]
//!
//!     [search]
//!     max_nodes = 50000
//! "#).unwrap();
//!
//! assert_eq!(config.sizes, vec![3]);
//! assert_eq!(config.search.max_nodes, 50_000);
//! assert_eq!(config.search.initial_depth, 5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::heuristic::Strategy;

/// Limits applied to a single search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Ceiling on nodes created in one search.
    pub max_nodes: usize,
    /// Depth ceiling for depth-first search, and the first ceiling tried by
    /// iterative deepening.
    pub initial_depth: usize,
    /// Amount added to the ceiling each time iterative deepening escalates.
    pub depth_increment: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_nodes: 250_000,
            initial_depth: 5,
            depth_increment: 5,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_initial_depth(mut self, depth: usize) -> Self {
        self.initial_depth = depth;
        self
    }

    pub fn with_depth_increment(mut self, increment: usize) -> Self {
        self.depth_increment = increment;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nodes == 0 {
            return Err(ConfigError::Invalid("max_nodes must be positive".into()));
        }
        if self.initial_depth == 0 {
            return Err(ConfigError::Invalid("initial_depth must be positive".into()));
        }
        if self.depth_increment == 0 {
            return Err(ConfigError::Invalid("depth_increment must be positive".into()));
        }
        Ok(())
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Parameters of a benchmark sweep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BenchConfig {
    /// Board sizes to generate.
    pub sizes: Vec<usize>,
    /// Number of random moves used to scramble each board.
    pub scramble_moves: Vec<usize>,
    /// Strategies run on every scrambled board.
    pub strategies: Vec<Strategy>,
    /// How many times the whole sweep is repeated.
    pub repetitions: usize,
    /// Seed for the scrambling RNG; `None` draws from entropy.
    pub seed: Option<u64>,
    pub search: SearchConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![3, 4, 5],
            scramble_moves: vec![10, 30, 50, 100],
            strategies: Strategy::ALL.to_vec(),
            repetitions: 5,
            seed: None,
            search: SearchConfig::default(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&size) = self.sizes.iter().find(|&&s| s < 2) {
            return Err(ConfigError::Invalid(format!(
                "board size {} is too small (must be at least 2)",
                size
            )));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid("at least one strategy is required".into()));
        }
        self.search.validate()
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
