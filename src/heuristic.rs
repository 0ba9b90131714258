//! Named heuristics and the strategy selector.
//!
//! The engine only sees a heuristic as `Fn(&Puzzle) -> usize`; this module
//! gives the three built-in estimates a name so they can be picked from the
//! command line or a config file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Cells not holding their goal tile.
    Mismatch,
    /// Sum of `|tile - goal tile|` over all cells.
    AbsoluteDifference,
    /// Sum of Manhattan distances of every tile to its goal cell.
    Manhattan,
}

impl Heuristic {
    pub fn evaluate(&self, puzzle: &Puzzle) -> usize {
        match self {
            Heuristic::Mismatch => puzzle.mismatch_count(),
            Heuristic::AbsoluteDifference => puzzle.total_absolute_difference(),
            Heuristic::Manhattan => puzzle.manhattan_distance(),
        }
    }

    /// Adapts the heuristic to the callback form taken by
    /// [`SearchTree::best_first`](crate::tree::SearchTree::best_first).
    pub fn as_fn(self) -> impl Fn(&Puzzle) -> usize {
        move |puzzle: &Puzzle| self.evaluate(puzzle)
    }
}

/// Every way the engine can be asked to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    IterativeDeepening,
    AStarMismatch,
    AStarAbsolute,
    AStarManhattan,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::IterativeDeepening,
        Strategy::AStarMismatch,
        Strategy::AStarAbsolute,
        Strategy::AStarManhattan,
    ];

    /// The heuristic guiding this strategy, if it is a best-first one.
    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            Strategy::AStarMismatch => Some(Heuristic::Mismatch),
            Strategy::AStarAbsolute => Some(Heuristic::AbsoluteDifference),
            Strategy::AStarManhattan => Some(Heuristic::Manhattan),
            Strategy::DepthFirst | Strategy::BreadthFirst | Strategy::IterativeDeepening => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DepthFirst => "depth-first",
            Strategy::BreadthFirst => "breadth-first",
            Strategy::IterativeDeepening => "iterative-deepening",
            Strategy::AStarMismatch => "a-star-mismatch",
            Strategy::AStarAbsolute => "a-star-absolute",
            Strategy::AStarManhattan => "a-star-manhattan",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heuristic::Mismatch => "mismatch",
            Heuristic::AbsoluteDifference => "absolute-difference",
            Heuristic::Manhattan => "manhattan",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
