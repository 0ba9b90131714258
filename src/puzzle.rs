use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::PuzzleError;

/// Direction in which the empty cell shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Fixed generation order used by every strategy.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(d_row, d_col)` applied to the empty cell.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn is_inverse_of(&self, other: Move) -> bool {
        self.opposite() == other
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An `n x n` sliding-tile board. Tile `0` is the empty cell.
///
/// The goal layout is ascending in row-major order with the empty cell at
/// `(0, 0)`. `row`/`col` always locate the `0` tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    size: usize,
    board: Vec<Vec<u32>>,
    row: usize,
    col: usize,
}

impl Puzzle {
    /// Builds a board in goal order.
    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        if size < 2 {
            return Err(PuzzleError::InvalidSize { size });
        }

        let board = (0..size)
            .map(|i| (0..size).map(|j| (i * size + j) as u32).collect())
            .collect();

        Ok(Self {
            size,
            board,
            row: 0,
            col: 0,
        })
    }

    /// Builds a board from explicit rows, checking that it is square and
    /// holds every tile `0..n²` exactly once.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, PuzzleError> {
        let size = rows.len();
        if size < 2 {
            return Err(PuzzleError::InvalidSize { size });
        }

        let cells = size * size;
        let mut seen = vec![false; cells];
        let mut empty = None;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(PuzzleError::NotSquare {
                    row: i,
                    expected: size,
                    got: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                let idx = value as usize;
                if idx >= cells {
                    return Err(PuzzleError::InvalidTiles {
                        expected: cells,
                        detail: format!("tile {} at ({}, {}) is out of range", value, i, j),
                    });
                }
                if seen[idx] {
                    return Err(PuzzleError::InvalidTiles {
                        expected: cells,
                        detail: format!("tile {} appears more than once", value),
                    });
                }
                seen[idx] = true;
                if value == 0 {
                    empty = Some((i, j));
                }
            }
        }

        // Every row has `size` cells and no tile repeats, so all tiles are present.
        let (row, col) = empty.ok_or_else(|| PuzzleError::InvalidTiles {
            expected: cells,
            detail: "missing empty cell".to_string(),
        })?;

        Ok(Self {
            size,
            board: rows,
            row,
            col,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.board
    }

    pub fn tile(&self, row: usize, col: usize) -> u32 {
        self.board[row][col]
    }

    /// Coordinates `(row, col)` of the empty cell.
    pub fn empty_cell(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Tile that belongs at `(row, col)` in the goal layout.
    pub fn goal_tile(&self, row: usize, col: usize) -> u32 {
        (row * self.size + col) as u32
    }

    fn target(&self, movement: Move) -> Option<(usize, usize)> {
        let (dr, dc) = movement.as_offset();
        let new_row = self.row.checked_add_signed(dr)?;
        let new_col = self.col.checked_add_signed(dc)?;

        if new_row < self.size && new_col < self.size {
            Some((new_row, new_col))
        } else {
            None
        }
    }

    pub fn is_legal(&self, movement: Move) -> bool {
        self.target(movement).is_some()
    }

    /// Moves whose displacement keeps the empty cell on the board, in
    /// [`Move::ALL`] order.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&m| self.is_legal(m))
            .collect()
    }

    /// Slides the tile at the target cell into the empty cell. An illegal move
    /// leaves the board untouched.
    pub fn apply_move(&mut self, movement: Move) -> Result<(), PuzzleError> {
        let (new_row, new_col) = self.target(movement).ok_or(PuzzleError::IllegalMove {
            direction: movement,
            row: self.row,
            col: self.col,
        })?;

        self.board[self.row][self.col] = self.board[new_row][new_col];
        self.board[new_row][new_col] = 0;

        self.row = new_row;
        self.col = new_col;
        Ok(())
    }

    /// Replays `moves` in order, stopping at the first illegal one.
    pub fn apply_all(&mut self, moves: &[Move]) -> Result<(), PuzzleError> {
        moves.iter().try_for_each(|&m| self.apply_move(m))
    }

    pub fn try_move(&self, dir: Move) -> Option<Self> {
        let mut new_puzzle = self.clone();
        new_puzzle.apply_move(dir).ok().map(|_| new_puzzle)
    }

    /// Applies `count` random legal moves, never immediately undoing the
    /// previous one, and returns the moves applied.
    pub fn scramble<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Move> {
        let mut applied: Vec<Move> = Vec::with_capacity(count);

        for _ in 0..count {
            let last = applied.last().copied();
            let candidates: Vec<Move> = self
                .legal_moves()
                .into_iter()
                .filter(|m| last.map_or(true, |l| !m.is_inverse_of(l)))
                .collect();

            // Every cell of a board with size >= 2 has at least two legal moves.
            if let Some(&m) = candidates.choose(rng) {
                if self.apply_move(m).is_ok() {
                    applied.push(m);
                }
            }
        }

        applied
    }

    pub fn is_goal(&self) -> bool {
        self.board.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, &value)| value == self.goal_tile(i, j))
        })
    }

    pub fn is_solvable(&self) -> bool {
        let flat_board: Vec<u32> = self
            .board
            .iter()
            .flat_map(|row| row.iter().cloned())
            .collect();

        let inversions = Self::count_inversions(&flat_board);

        if self.size % 2 == 1 {
            // A vertical slide jumps an even number of tiles, so inversion
            // parity is invariant and the goal has none.
            inversions % 2 == 0
        } else {
            // Goal has zero inversions and the empty cell on row 0.
            (inversions + self.row) % 2 == 0
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    /// Number of cells (empty cell included) not holding their goal tile.
    pub fn mismatch_count(&self) -> usize {
        self.cells()
            .filter(|&(i, j, value)| value != self.goal_tile(i, j))
            .count()
    }

    /// Sum over all cells of `|value - goal_value|`.
    pub fn total_absolute_difference(&self) -> usize {
        self.cells()
            .map(|(i, j, value)| value.abs_diff(self.goal_tile(i, j)) as usize)
            .sum()
    }

    /// Sum of row and column distances of every tile from its goal cell. The
    /// empty cell is not counted, which keeps the estimate admissible.
    pub fn manhattan_distance(&self) -> usize {
        self.cells()
            .filter(|&(_, _, value)| value != 0)
            .map(|(i, j, value)| {
                let target_row = value as usize / self.size;
                let target_col = value as usize % self.size;
                i.abs_diff(target_row) + j.abs_diff(target_col)
            })
            .sum()
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.board.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| (i, j, value))
        })
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
