//! Error types for the puzzle model, the search engine and configuration.

use thiserror::Error;

use crate::puzzle::Move;

/// Errors raised by the board model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("illegal move {direction}: empty cell at ({row}, {col}) would leave the board")]
    IllegalMove {
        direction: Move,
        row: usize,
        col: usize,
    },

    #[error("invalid board size {size} (must be at least 2)")]
    InvalidSize { size: usize },

    #[error("board is not square: row {row} has {got} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("board tiles must be exactly 0..{expected}: {detail}")]
    InvalidTiles { expected: usize, detail: String },
}

/// Terminal outcomes of a search that did not reach the goal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("no solution found: node budget exhausted after {nodes} nodes")]
    BudgetExhausted { nodes: usize },

    #[error("no solution found: frontier emptied after {nodes} nodes")]
    EmptyFrontier { nodes: usize },
}

impl SearchError {
    /// Number of nodes created before the search gave up.
    pub fn nodes(&self) -> usize {
        match *self {
            SearchError::BudgetExhausted { nodes } | SearchError::EmptyFrontier { nodes } => nodes,
        }
    }

    /// Short tag used in benchmark records.
    pub fn tag(&self) -> &'static str {
        match self {
            SearchError::BudgetExhausted { .. } => "budget_exhausted",
            SearchError::EmptyFrontier { .. } => "frontier_empty",
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while running a benchmark sweep.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
