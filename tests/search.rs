use rand::{rngs::StdRng, SeedableRng};

use npuzzle_search::config::SearchConfig;
use npuzzle_search::{Heuristic, Move, Puzzle, SearchError, SearchTree, Strategy};

fn from_goal(size: usize, moves: &[Move]) -> Puzzle {
    let mut p = Puzzle::new(size).unwrap();
    for &m in moves {
        // Illegal moves are skipped, same as a scrambler would.
        let _ = p.apply_move(m);
    }
    p
}

fn assert_solves(initial: &Puzzle, moves: &[Move]) {
    let mut board = initial.clone();
    board.apply_all(moves).unwrap();
    assert!(board.is_goal(), "{moves:?} does not solve\n{initial}");
}

fn has_adjacent_reversal(moves: &[Move]) -> bool {
    moves.windows(2).any(|w| w[1].is_inverse_of(w[0]))
}

#[test]
fn breadth_first_returns_reverse_of_scramble() {
    let board = from_goal(3, &[Move::Right, Move::Down]);
    assert_eq!(board.empty_cell(), (1, 1));

    let mut tree = SearchTree::new(board);
    assert_eq!(tree.breadth_first().unwrap(), vec![Move::Up, Move::Left]);
    assert!(tree.board().unwrap().is_goal());
}

#[test]
fn breadth_first_finds_shortest_paths() {
    let scrambles: [&[Move]; 4] = [
        &[Move::Down],
        &[Move::Right, Move::Right],
        &[Move::Down, Move::Right, Move::Down],
        &[Move::Right, Move::Down, Move::Left, Move::Down],
    ];

    for (k, scramble) in scrambles.iter().enumerate() {
        let board = from_goal(3, scramble);
        let mut tree = SearchTree::new(board.clone());
        let moves = tree.breadth_first().unwrap();
        assert_eq!(moves.len(), k + 1, "scramble {scramble:?}");
        assert_solves(&board, &moves);
    }
}

#[test]
fn every_strategy_solves_and_avoids_reversals() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5 {
        let mut board = Puzzle::new(3).unwrap();
        board.scramble(6, &mut rng);

        for strategy in Strategy::ALL {
            let config = SearchConfig::default().with_initial_depth(6);
            let mut tree = SearchTree::with_config(board.clone(), config);
            let moves = tree
                .solve(strategy)
                .unwrap_or_else(|e| panic!("{strategy} failed: {e}"));
            assert_solves(&board, &moves);
            assert!(!has_adjacent_reversal(&moves), "{strategy}: {moves:?}");
        }
    }
}

#[test]
fn manhattan_a_star_is_no_longer_than_breadth_first() {
    let scrambles: [&[Move]; 3] = [
        &[Move::Up, Move::Left, Move::Down, Move::Right],
        &[Move::Down, Move::Right, Move::Down, Move::Right, Move::Up, Move::Left],
        &[Move::Right, Move::Right, Move::Down, Move::Left, Move::Down, Move::Right],
    ];

    for scramble in scrambles {
        let board = from_goal(3, scramble);
        let bfs = SearchTree::new(board.clone()).breadth_first().unwrap();

        let mut tree = SearchTree::new(board.clone());
        let guided = tree.best_first(Heuristic::Manhattan.as_fn()).unwrap();

        assert_solves(&board, &guided);
        assert!(guided.len() <= bfs.len(), "{guided:?} vs {bfs:?}");
    }
}

#[test]
fn manhattan_a_star_expands_fewer_nodes() {
    let board = from_goal(
        3,
        &[Move::Down, Move::Right, Move::Down, Move::Right, Move::Up, Move::Left],
    );
    let mut plain = SearchTree::new(board.clone());
    plain.breadth_first().unwrap();
    let mut guided = SearchTree::new(board);
    guided.solve(Strategy::AStarManhattan).unwrap();
    assert!(guided.node_count() < plain.node_count());
}

#[test]
fn budget_of_one_is_a_typed_failure() {
    let board = from_goal(3, &[Move::Right, Move::Down]);
    for strategy in Strategy::ALL {
        let config = SearchConfig::default().with_max_nodes(1);
        let mut tree = SearchTree::with_config(board.clone(), config);
        assert_eq!(
            tree.solve(strategy),
            Err(SearchError::BudgetExhausted { nodes: 1 }),
            "{strategy}"
        );
        assert_eq!(tree.node_count(), 1);
        assert!(tree.last_examined().is_empty());
    }
}

#[test]
fn unsolvable_board_exhausts_the_budget() {
    let board = Puzzle::from_rows(vec![vec![0, 2, 1], vec![3, 4, 5], vec![6, 7, 8]]).unwrap();
    assert!(!board.is_solvable());

    let config = SearchConfig::default().with_max_nodes(2_000);
    for strategy in [
        Strategy::BreadthFirst,
        Strategy::IterativeDeepening,
        Strategy::AStarManhattan,
    ] {
        let mut tree = SearchTree::with_config(board.clone(), config);
        let err = tree.solve(strategy).unwrap_err();
        assert!(matches!(err, SearchError::BudgetExhausted { .. }), "{strategy}: {err}");
        assert!(err.nodes() >= 2_000);
        assert!(!tree.board().unwrap().is_goal());
    }
}

#[test]
fn shallow_depth_limit_drains_the_frontier() {
    let board = from_goal(3, &[Move::Right, Move::Right, Move::Down, Move::Down]);
    let config = SearchConfig::default().with_initial_depth(3);
    let mut tree = SearchTree::with_config(board, config);
    let err = tree.depth_first().unwrap_err();
    assert!(matches!(err, SearchError::EmptyFrontier { .. }));
    assert_eq!(err.tag(), "frontier_empty");
}

#[test]
fn searches_do_not_leak_state_between_calls() {
    let board = from_goal(3, &[Move::Right, Move::Down, Move::Right]);
    let mut tree = SearchTree::new(board);

    let first = tree.breadth_first().unwrap();
    let first_nodes = tree.node_count();
    tree.iterative_deepening().unwrap();
    let second = tree.breadth_first().unwrap();

    assert_eq!(first, second);
    assert_eq!(tree.node_count(), first_nodes);
}

#[test]
fn larger_board_with_a_star() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut board = Puzzle::new(4).unwrap();
    board.scramble(12, &mut rng);

    let mut tree = SearchTree::new(board.clone());
    let moves = tree.solve(Strategy::AStarManhattan).unwrap();
    assert!(moves.len() <= 12);
    assert_solves(&board, &moves);
}
