use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use npuzzle_search::config::{BenchConfig, SearchConfig};
use npuzzle_search::render::{render, replay};
use npuzzle_search::{bench, Puzzle, SearchTree, Strategy};

#[derive(Parser, Debug)]
#[command(name = "npuzzle", version, about = "Solve n x n sliding-tile puzzles")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scramble (or read) one board and solve it
    Solve {
        /// Board size n for an n x n puzzle
        #[arg(short = 'n', long, default_value_t = 3)]
        size: usize,
        /// Number of random moves applied to the goal board
        #[arg(short = 'm', long, default_value_t = 20)]
        scramble: usize,
        /// Explicit board as comma-separated tiles in row-major order (0 is empty)
        #[arg(long, value_name = "TILES", conflicts_with_all = ["size", "scramble"])]
        tiles: Option<String>,
        /// Seed for the scrambling RNG
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short = 's', long, value_enum, default_value_t = Strategy::AStarManhattan)]
        strategy: Strategy,
        /// TOML file with search limits
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the node budget
        #[arg(long)]
        max_nodes: Option<usize>,
        /// Print every intermediate board of the solution
        #[arg(long)]
        steps: bool,
    },
    /// Run a benchmark sweep and write CSV results
    Bench {
        /// TOML file describing the sweep
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output CSV file
        #[arg(short = 'o', long, value_name = "FILE", default_value = "results.txt")]
        output: PathBuf,
    },
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("npuzzle_search=info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn parse_tiles(tiles: &str) -> Result<Puzzle> {
    let values = tiles
        .split(',')
        .map(|t| t.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid tile list '{tiles}'"))?;

    let size = (1..=values.len())
        .find(|n| n * n >= values.len())
        .unwrap_or(0);
    if size * size != values.len() {
        bail!("{} tiles do not form a square board", values.len());
    }

    let rows = values.chunks(size).map(|row| row.to_vec()).collect();
    Ok(Puzzle::from_rows(rows)?)
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[allow(clippy::too_many_arguments)]
fn solve(
    size: usize,
    scramble: usize,
    tiles: Option<String>,
    seed: Option<u64>,
    strategy: Strategy,
    config: Option<PathBuf>,
    max_nodes: Option<usize>,
    steps: bool,
) -> Result<()> {
    let mut search = match config {
        Some(path) => SearchConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(max_nodes) = max_nodes {
        search = search.with_max_nodes(max_nodes);
        search.validate()?;
    }

    let board = match tiles {
        Some(tiles) => parse_tiles(&tiles)?,
        None => {
            let mut board = Puzzle::new(size)?;
            let mut rng = rng_from(seed);
            board.scramble(scramble, &mut rng);
            board
        }
    };

    println!("Initial puzzle:\n{}", render(&board));
    if !board.is_solvable() {
        tracing::warn!(event = "unsolvable", "board parity does not match the goal; search will exhaust its budget");
    }

    let mut tree = SearchTree::with_config(board.clone(), search);
    match tree.solve(strategy) {
        Ok(moves) => {
            let listed: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
            println!(
                "Solved with {} in {} moves ({} nodes): {}",
                strategy,
                moves.len(),
                tree.node_count(),
                listed.join(" ")
            );
            if steps {
                print!("{}", replay(&board, &moves));
            }
            Ok(())
        }
        Err(e) => Err(anyhow!(e).context(format!(
            "{} gave up at depth {}",
            strategy,
            tree.last_examined().len()
        ))),
    }
}

fn run_bench(config: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let config = match config {
        Some(path) => BenchConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => BenchConfig::default(),
    };

    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut rng = rng_from(config.seed);
    let records = bench::run(&config, &mut rng, BufWriter::new(file))?;

    let solved = records.iter().filter(|r| r.outcome.is_ok()).count();
    println!(
        "Wrote {} records to {} ({} solved)",
        records.len(),
        output.display(),
        solved
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    match cli.cmd {
        Command::Solve {
            size,
            scramble,
            tiles,
            seed,
            strategy,
            config,
            max_nodes,
            steps,
        } => solve(size, scramble, tiles, seed, strategy, config, max_nodes, steps),
        Command::Bench { config, output } => run_bench(config, output),
    }
}
