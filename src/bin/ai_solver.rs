use clap::{ArgAction, Parser};
use log::{info, warn};
use match3_solver::engine::Board;
use match3_solver::solver::{solve, SolverConfig, DEFAULT_MAX_OUTCOMES};
use match3_solver::utils::board_from_str;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the board file (35 symbols, row-major); stdin when omitted
    board_file: Option<PathBuf>,

    /// Stop exploring once more than this many terminal boards were found
    #[clap(short, long, default_value_t = DEFAULT_MAX_OUTCOMES)]
    max_outcomes: usize,

    /// Shuffle the move order with this seed
    #[clap(long)]
    shuffle_seed: Option<u64>,

    /// Solve a random board generated from this seed instead of reading one
    #[clap(long, conflicts_with = "board_file")]
    random_seed: Option<u64>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn read_board(args: &Args) -> Result<Board, String> {
    if let Some(seed) = args.random_seed {
        return Ok(Board::random_with_seed(seed));
    }

    let content = match &args.board_file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buffer
        }
    };

    // Rows may be split across lines.
    let symbols: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    board_from_str(&symbols).map_err(|e| format!("Invalid board: {}", e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let board = match read_board(&args) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Initial board:\n{}", board);

    let config = SolverConfig {
        max_outcomes: args.max_outcomes,
        shuffle_seed: args.shuffle_seed,
    };

    let solution = match solve(&board, &config) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if solution.truncated {
        warn!(
            "Exploration cap of {} outcomes reached; the result is the best of a partial search",
            config.max_outcomes
        );
    }
    info!(
        "Chose 1 of {} outcomes ({} boards expanded): {} steps, {} locks",
        solution.outcomes_found,
        solution.nodes_expanded,
        solution.steps().len(),
        solution.best.locked_total()
    );
    info!("Final board:\n{}", solution.best.board());

    for step in solution.steps() {
        println!("{}", step);
    }
    ExitCode::SUCCESS
}
