//! Sliding-tile puzzle solver.
//!
//! A [`Puzzle`](puzzle::Puzzle) is an `n x n` board with one empty cell. A
//! [`SearchTree`](tree::SearchTree) explores the boards reachable from it with
//! breadth-first, depth-limited, iterative-deepening or best-first (A*)
//! search, and returns the moves of the empty cell that reach the goal.
//!
//! ```
//! use npuzzle_search::heuristic::Heuristic;
//! use npuzzle_search::puzzle::{Move, Puzzle};
//! use npuzzle_search::tree::SearchTree;
//!
//! let mut board = Puzzle::new(3).unwrap();
//! board.apply_all(&[Move::Down, Move::Right, Move::Down]).unwrap();
//!
//! let mut tree = SearchTree::new(board);
//! let moves = tree.best_first(Heuristic::Manhattan.as_fn()).unwrap();
//! assert_eq!(moves, vec![Move::Up, Move::Left, Move::Up]);
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod node;
pub mod puzzle;
pub mod render;
pub mod tree;

pub use error::{PuzzleError, SearchError};
pub use heuristic::{Heuristic, Strategy};
pub use puzzle::{Move, Puzzle};
pub use tree::SearchTree;
