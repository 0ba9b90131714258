//! Terminal rendering of boards.

use crossterm::style::Stylize;

use crate::puzzle::{Move, Puzzle};

/// Renders `puzzle` one row per line. Tiles already on their goal cell are
/// green, misplaced tiles yellow, and the empty cell a grey dot.
pub fn render(puzzle: &Puzzle) -> String {
    let width = (puzzle.size() * puzzle.size() - 1).to_string().len().max(2);
    let mut out = String::new();

    for (i, row) in puzzle.rows().iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let cell = if value == 0 {
                format!("{:>width$}", ".").dark_grey()
            } else if value == puzzle.goal_tile(i, j) {
                format!("{:>width$}", value).green()
            } else {
                format!("{:>width$}", value).yellow().bold()
            };
            out.push_str(&format!("{} ", cell));
        }
        out.push('\n');
    }
    out
}

/// Renders every board along `moves`, starting from `initial`. Stops at the
/// first move that cannot be applied.
pub fn replay(initial: &Puzzle, moves: &[Move]) -> String {
    let mut board = initial.clone();
    let mut out = String::new();

    for (step, &item) in moves.iter().enumerate() {
        if board.apply_move(item).is_err() {
            out.push_str(&format!("{:>3}. {} (illegal, stopping)\n", step + 1, item));
            break;
        }
        out.push_str(&format!("{:>3}. {}\n{}\n", step + 1, item, render(&board)));
    }
    out
}
