//! The search engine.
//!
//! Every strategy runs the same expansion step on a node taken from its
//! frontier: replay the node's moves onto a fresh clone of the initial board,
//! stop if that board is the goal, otherwise insert one child per legal move
//! that does not undo the node's last move. Strategies differ only in how the
//! frontier is ordered and pruned.
//!
//! ```
//! use npuzzle_search::puzzle::{Move, Puzzle};
//! use npuzzle_search::tree::SearchTree;
//!
//! let mut board = Puzzle::new(3).unwrap();
//! board.apply_all(&[Move::Right, Move::Down]).unwrap();
//!
//! let mut tree = SearchTree::new(board);
//! let solution = tree.breadth_first().unwrap();
//! assert_eq!(solution, vec![Move::Up, Move::Left]);
//! assert!(tree.board().unwrap().is_goal());
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::heuristic::{Heuristic, Strategy};
use crate::node::{MoveTree, NodeId};
use crate::puzzle::{Move, Puzzle};

/// Result of examining one node.
enum Examined {
    Goal,
    Open(Puzzle),
}

/// How a depth-limited pass ended.
enum DepthOutcome {
    Found(NodeId),
    Exhausted,
    /// Frontier ran dry. `cut_off` is set if some node was left unexpanded
    /// because it sat on the ceiling.
    Drained { cut_off: bool },
}

/// Owns the initial board and the node tree of the current search.
#[derive(Debug, Clone)]
pub struct SearchTree {
    initial: Puzzle,
    config: SearchConfig,
    tree: MoveTree,
    nodes_created: usize,
    board: Option<Puzzle>,
    last_examined: Vec<Move>,
}

impl SearchTree {
    pub fn new(initial: Puzzle) -> Self {
        Self::with_config(initial, SearchConfig::default())
    }

    pub fn with_config(initial: Puzzle, config: SearchConfig) -> Self {
        Self {
            initial,
            config,
            tree: MoveTree::new(),
            nodes_created: 1,
            board: None,
            last_examined: Vec::new(),
        }
    }

    pub fn initial(&self) -> &Puzzle {
        &self.initial
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes created by the last search, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes_created
    }

    /// Board reached by the last node examined, set once a search ends.
    /// After a successful search this is the goal board.
    pub fn board(&self) -> Option<&Puzzle> {
        self.board.as_ref()
    }

    /// Move sequence of the last node taken from the frontier.
    pub fn last_examined(&self) -> &[Move] {
        &self.last_examined
    }

    /// Runs the named strategy.
    pub fn solve(&mut self, strategy: Strategy) -> Result<Vec<Move>, SearchError> {
        match strategy {
            Strategy::DepthFirst => self.depth_first(),
            Strategy::BreadthFirst => self.breadth_first(),
            Strategy::IterativeDeepening => self.iterative_deepening(),
            Strategy::AStarMismatch => {
                self.best_first_named(strategy.name(), Heuristic::Mismatch.as_fn())
            }
            Strategy::AStarAbsolute => {
                self.best_first_named(strategy.name(), Heuristic::AbsoluteDifference.as_fn())
            }
            Strategy::AStarManhattan => {
                self.best_first_named(strategy.name(), Heuristic::Manhattan.as_fn())
            }
        }
    }

    /// FIFO expansion. The first goal found is at minimum depth.
    pub fn breadth_first(&mut self) -> Result<Vec<Move>, SearchError> {
        let started = self.begin("breadth-first");
        let mut frontier = VecDeque::from([self.tree.root()]);

        let result = loop {
            let Some(id) = frontier.pop_front() else {
                break Err(self.drained());
            };
            let board = match self.examine(id) {
                Examined::Goal => break Ok(id),
                Examined::Open(board) => board,
            };
            if let Err(e) = self.check_budget() {
                break Err(e);
            }
            frontier.extend(self.expand(id, &board).into_iter().map(|(child, _)| child));
            trace!(event = "expand", depth = self.tree.get(id).depth(), frontier = frontier.len());
        };

        self.finish("breadth-first", started, result)
    }

    /// LIFO expansion that never expands a node at or beyond
    /// `initial_depth`.
    pub fn depth_first(&mut self) -> Result<Vec<Move>, SearchError> {
        let started = self.begin("depth-first");
        let result = match self.depth_limited(self.config.initial_depth) {
            DepthOutcome::Found(id) => Ok(id),
            DepthOutcome::Exhausted => Err(self.exhausted()),
            DepthOutcome::Drained { .. } => Err(self.drained()),
        };
        self.finish("depth-first", started, result)
    }

    /// Depth-limited search whose ceiling grows by `depth_increment` instead
    /// of giving up.
    ///
    /// A pass ends once only nodes sitting on the ceiling are left to look
    /// at. If any were cut off, the tree is discarded and a new pass starts
    /// from the root with a higher ceiling. The node budget spans all passes.
    pub fn iterative_deepening(&mut self) -> Result<Vec<Move>, SearchError> {
        let started = self.begin("iterative-deepening");
        let mut ceiling = self.config.initial_depth;

        let result = loop {
            match self.depth_limited(ceiling) {
                DepthOutcome::Found(id) => break Ok(id),
                DepthOutcome::Exhausted => break Err(self.exhausted()),
                DepthOutcome::Drained { cut_off: false } => break Err(self.drained()),
                DepthOutcome::Drained { cut_off: true } => {
                    // A zero increment would re-run the same pass forever.
                    ceiling = ceiling.saturating_add(self.config.depth_increment.max(1));
                    debug!(event = "deepen", ceiling, nodes = self.nodes_created);
                    self.tree = MoveTree::new();
                }
            }
        };

        self.finish("iterative-deepening", started, result)
    }

    /// A* ordering by `heuristic(board) + depth`, ties broken by insertion
    /// order. Admissibility of `heuristic` is not checked.
    pub fn best_first<F>(&mut self, heuristic: F) -> Result<Vec<Move>, SearchError>
    where
        F: Fn(&Puzzle) -> usize,
    {
        self.best_first_named("best-first", heuristic)
    }

    fn best_first_named<F>(&mut self, name: &'static str, heuristic: F) -> Result<Vec<Move>, SearchError>
    where
        F: Fn(&Puzzle) -> usize,
    {
        let started = self.begin(name);
        let mut frontier = BinaryHeap::new();
        let mut sequence: u64 = 0;
        frontier.push(Reverse((heuristic(&self.initial), sequence, self.tree.root())));

        let result = loop {
            let Some(Reverse((cost, _, id))) = frontier.pop() else {
                break Err(self.drained());
            };
            let board = match self.examine(id) {
                Examined::Goal => break Ok(id),
                Examined::Open(board) => board,
            };
            if let Err(e) = self.check_budget() {
                break Err(e);
            }
            for (child, movement) in self.expand(id, &board) {
                let Some(child_board) = board.try_move(movement) else {
                    continue;
                };
                sequence += 1;
                let estimate = heuristic(&child_board) + self.tree.get(child).depth();
                frontier.push(Reverse((estimate, sequence, child)));
            }
            trace!(event = "expand", cost, depth = self.tree.get(id).depth(), frontier = frontier.len());
        };

        self.finish(name, started, result)
    }

    fn depth_limited(&mut self, ceiling: usize) -> DepthOutcome {
        let mut frontier = vec![self.tree.root()];
        let mut cut_off = false;

        while let Some(id) = frontier.pop() {
            let board = match self.examine(id) {
                Examined::Goal => return DepthOutcome::Found(id),
                Examined::Open(board) => board,
            };
            if self.tree.get(id).depth() >= ceiling {
                cut_off = true;
                continue;
            }
            if self.check_budget().is_err() {
                return DepthOutcome::Exhausted;
            }

            // Pushed in reverse so children pop in generation order.
            let children = self.expand(id, &board);
            frontier.extend(children.into_iter().rev().map(|(child, _)| child));
            trace!(event = "expand", depth = self.tree.get(id).depth(), ceiling, frontier = frontier.len());
        }

        DepthOutcome::Drained { cut_off }
    }

    fn begin(&mut self, strategy: &'static str) -> Instant {
        self.tree = MoveTree::new();
        self.nodes_created = self.tree.len();
        self.board = None;
        self.last_examined.clear();

        info!(
            event = "search_start",
            strategy,
            size = self.initial.size(),
            max_nodes = self.config.max_nodes,
        );
        Instant::now()
    }

    fn finish(
        &mut self,
        strategy: &'static str,
        started: Instant,
        result: Result<NodeId, SearchError>,
    ) -> Result<Vec<Move>, SearchError> {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(id) => {
                let moves = self.tree.get(id).moves().to_vec();
                info!(
                    event = "search_end",
                    strategy,
                    nodes = self.nodes_created,
                    solution_len = moves.len(),
                    duration_ms,
                );
                Ok(moves)
            }
            Err(e) => {
                let mut board = self.initial.clone();
                let replayed = board.apply_all(&self.last_examined);
                debug_assert!(replayed.is_ok(), "stored move sequence must replay cleanly");
                self.board = Some(board);
                info!(
                    event = e.tag(),
                    strategy,
                    nodes = self.nodes_created,
                    last_depth = self.last_examined.len(),
                    duration_ms,
                );
                Err(e)
            }
        }
    }

    /// Clone of the initial board with `id`'s moves replayed onto it.
    fn materialize(&self, id: NodeId) -> Puzzle {
        let mut board = self.initial.clone();
        let replayed = board.apply_all(self.tree.get(id).moves());
        // Sequences only ever grow from legal_moves() of this same replay.
        debug_assert!(replayed.is_ok(), "stored move sequence must replay cleanly");
        board
    }

    fn examine(&mut self, id: NodeId) -> Examined {
        let board = self.materialize(id);
        self.last_examined.clear();
        self.last_examined.extend_from_slice(self.tree.get(id).moves());

        if board.is_goal() {
            self.board = Some(board);
            Examined::Goal
        } else {
            Examined::Open(board)
        }
    }

    fn check_budget(&self) -> Result<(), SearchError> {
        if self.nodes_created >= self.config.max_nodes {
            Err(self.exhausted())
        } else {
            Ok(())
        }
    }

    /// Inserts one child per legal move on `board` that does not undo the
    /// node's last move.
    fn expand(&mut self, id: NodeId, board: &Puzzle) -> Vec<(NodeId, Move)> {
        let last = self.tree.get(id).last_move();
        board
            .legal_moves()
            .into_iter()
            .filter(|m| last.map_or(true, |l| !m.is_inverse_of(l)))
            .map(|m| (self.grow(id, m), m))
            .collect()
    }

    fn grow(&mut self, parent: NodeId, movement: Move) -> NodeId {
        let before = self.tree.len();
        let child = self.tree.insert(parent, movement);
        self.nodes_created += self.tree.len() - before;
        child
    }

    fn exhausted(&self) -> SearchError {
        SearchError::BudgetExhausted {
            nodes: self.nodes_created,
        }
    }

    fn drained(&self) -> SearchError {
        SearchError::EmptyFrontier {
            nodes: self.nodes_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_solves(initial: &Puzzle, moves: &[Move]) {
        let mut board = initial.clone();
        board.apply_all(moves).unwrap();
        assert!(board.is_goal());
    }

    fn scrambled(size: usize, moves: &[Move]) -> Puzzle {
        let mut p = Puzzle::new(size).unwrap();
        p.apply_all(moves).unwrap();
        p
    }

    #[test]
    fn solved_board_needs_no_moves() {
        let mut tree = SearchTree::new(Puzzle::new(3).unwrap());
        for strategy in Strategy::ALL {
            assert_eq!(tree.solve(strategy).unwrap(), Vec::<Move>::new());
            assert_eq!(tree.node_count(), 1);
        }
    }

    #[test]
    fn root_expansion_skips_nothing() {
        let mut tree = SearchTree::new(scrambled(3, &[Move::Right, Move::Down]));
        let root = tree.tree.root();
        let board = tree.materialize(root);
        let children = tree.expand(root, &board);
        assert_eq!(children.len(), 4);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn expansion_skips_reverse_of_last_move() {
        let mut tree = SearchTree::new(scrambled(3, &[Move::Right, Move::Down]));
        let root = tree.tree.root();
        let up = tree.grow(root, Move::Up);
        let board = tree.materialize(up);
        let moves: Vec<Move> = tree.expand(up, &board).into_iter().map(|(_, m)| m).collect();
        assert_eq!(moves, vec![Move::Left, Move::Right]);
    }

    #[test]
    fn re_expansion_creates_no_nodes() {
        let mut tree = SearchTree::new(scrambled(3, &[Move::Right, Move::Down]));
        let root = tree.tree.root();
        let board = tree.materialize(root);
        let first = tree.expand(root, &board);
        let count = tree.node_count();
        let second = tree.expand(root, &board);
        assert_eq!(first, second);
        assert_eq!(tree.node_count(), count);
    }

    #[test]
    fn depth_first_gives_up_below_ceiling() {
        let moves = [Move::Right, Move::Down, Move::Right, Move::Down];
        let config = SearchConfig::default().with_initial_depth(2);
        let mut tree = SearchTree::with_config(scrambled(3, &moves), config);
        assert!(matches!(
            tree.depth_first(),
            Err(SearchError::EmptyFrontier { .. })
        ));
        assert!(tree.last_examined().len() <= 2);
    }

    #[test]
    fn iterative_deepening_climbs_past_initial_ceiling() {
        let moves = [Move::Right, Move::Down, Move::Right, Move::Down];
        let config = SearchConfig::default()
            .with_initial_depth(1)
            .with_depth_increment(1);
        let mut tree = SearchTree::with_config(scrambled(3, &moves), config);
        let solution = tree.iterative_deepening().unwrap();
        assert_eq!(solution.len(), 4);
        assert!(tree.board().unwrap().is_goal());
    }

    #[test]
    fn budget_spans_deepening_passes() {
        // Two tiles swapped: unreachable from the goal.
        let board = Puzzle::from_rows(vec![
            vec![0, 2, 1, 3],
            vec![4, 5, 6, 7],
            vec![8, 9, 10, 11],
            vec![12, 13, 14, 15],
        ])
        .unwrap();
        let config = SearchConfig::default()
            .with_max_nodes(500)
            .with_initial_depth(1)
            .with_depth_increment(1);
        let mut tree = SearchTree::with_config(board, config);
        match tree.iterative_deepening() {
            Err(SearchError::BudgetExhausted { nodes }) => {
                assert!(nodes >= 500);
                assert!(nodes < 500 + 4);
            }
            other => panic!("expected budget exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn zero_depth_and_increment_still_terminate() {
        let config = SearchConfig::default()
            .with_initial_depth(0)
            .with_depth_increment(0);
        let mut tree = SearchTree::with_config(scrambled(3, &[Move::Right, Move::Down]), config);
        assert_eq!(tree.iterative_deepening().unwrap(), vec![Move::Up, Move::Left]);

        let config = config.with_max_nodes(50);
        let board = Puzzle::from_rows(vec![vec![0, 2, 1], vec![3, 4, 5], vec![6, 7, 8]]).unwrap();
        let mut tree = SearchTree::with_config(board, config);
        assert!(matches!(
            tree.iterative_deepening(),
            Err(SearchError::BudgetExhausted { .. })
        ));
    }

    #[test]
    fn huge_increment_saturates_ceiling() {
        let moves = [Move::Right, Move::Down, Move::Right, Move::Down];
        let config = SearchConfig::default()
            .with_max_nodes(5_000)
            .with_initial_depth(1)
            .with_depth_increment(usize::MAX);
        let mut tree = SearchTree::with_config(scrambled(3, &moves), config);
        // With an unbounded ceiling only the budget can stop the pass.
        match tree.iterative_deepening() {
            Ok(solution) => assert_solves(&scrambled(3, &moves), &solution),
            Err(e) => assert!(matches!(e, SearchError::BudgetExhausted { .. })),
        }
    }

    #[test]
    fn board_reflects_last_examined_after_failure() {
        let config = SearchConfig::default().with_max_nodes(30);
        let board = Puzzle::from_rows(vec![vec![0, 2, 1], vec![3, 4, 5], vec![6, 7, 8]]).unwrap();
        let mut tree = SearchTree::with_config(board.clone(), config);
        assert!(tree.breadth_first().is_err());

        let mut expected = board;
        expected.apply_all(tree.last_examined()).unwrap();
        assert!(!tree.last_examined().is_empty());
        assert_eq!(tree.board(), Some(&expected));
    }

    #[test]
    fn best_first_tie_break_is_stable() {
        // A constant heuristic turns best-first into breadth-first order.
        let board = scrambled(3, &[Move::Right, Move::Down]);
        let mut guided = SearchTree::new(board.clone());
        let mut plain = SearchTree::new(board);
        assert_eq!(guided.best_first(|_| 0).unwrap(), plain.breadth_first().unwrap());
        assert_eq!(guided.node_count(), plain.node_count());
    }
}
