//! Benchmark sweeps over board sizes, scramble lengths and strategies.
//!
//! Each row of the output records one search:
//! `size,movements,strategy,time,out,memory` where `time` is in seconds,
//! `out` is the solution length or a failure tag and `memory` is the number
//! of nodes the search created.

use std::io::Write;
use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::config::BenchConfig;
use crate::error::{BenchError, SearchError};
use crate::heuristic::Strategy;
use crate::puzzle::Puzzle;
use crate::tree::SearchTree;

pub const CSV_HEADER: &str = "size,movements,strategy,time,out,memory";

/// One search in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchRecord {
    pub size: usize,
    pub movements: usize,
    pub strategy: Strategy,
    pub seconds: f64,
    pub outcome: Result<usize, SearchError>,
    pub nodes: usize,
}

impl BenchRecord {
    pub fn to_csv_row(&self) -> String {
        let out = match &self.outcome {
            Ok(len) => len.to_string(),
            Err(e) => e.tag().to_string(),
        };
        format!(
            "{},{},{},{:.6},{},{}",
            self.size, self.movements, self.strategy, self.seconds, out, self.nodes
        )
    }
}

/// Runs the whole sweep, writing the header and then one CSV row per search
/// to `out` as soon as it finishes.
///
/// Every strategy for a given repetition, size and scramble length sees the
/// same scrambled board.
pub fn run<R, W>(config: &BenchConfig, rng: &mut R, mut out: W) -> Result<Vec<BenchRecord>, BenchError>
where
    R: Rng + ?Sized,
    W: Write,
{
    config.validate()?;
    writeln!(out, "{}", CSV_HEADER)?;

    let mut records = Vec::new();
    for repetition in 0..config.repetitions {
        for &size in &config.sizes {
            for &movements in &config.scramble_moves {
                let mut board = Puzzle::new(size)?;
                board.scramble(movements, rng);

                for &strategy in &config.strategies {
                    let record = run_one(&board, movements, strategy, config);
                    info!(
                        event = "bench_record",
                        repetition,
                        size,
                        movements,
                        strategy = strategy.name(),
                        seconds = record.seconds,
                        solved = record.outcome.is_ok(),
                        nodes = record.nodes,
                    );
                    writeln!(out, "{}", record.to_csv_row())?;
                    records.push(record);
                }
            }
        }
    }

    out.flush()?;
    Ok(records)
}

fn run_one(board: &Puzzle, movements: usize, strategy: Strategy, config: &BenchConfig) -> BenchRecord {
    let mut tree = SearchTree::with_config(board.clone(), config.search);

    let start = Instant::now();
    let outcome = tree.solve(strategy).map(|moves| moves.len());
    let seconds = start.elapsed().as_secs_f64();

    BenchRecord {
        size: board.size(),
        movements,
        strategy,
        seconds,
        outcome,
        nodes: tree.node_count(),
    }
}
