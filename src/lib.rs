//! # Match-3 Swap Solver Library
//!
//! This library models a 7x5 tile-matching board and searches every sequence
//! of productive swaps reachable from it, picking the terminal board that ranks
//! best under a fixed heuristic.
//!
//! It is used by the `ai_solver` binary, which reads a 35-character board and
//! prints the winning swaps, one `x1 y1 x2 y2` line per swap.
//!
//! ## Modules
//! - `engine`: symbols, the grid and lock mask, match detection (`detect_locks`)
//!   and the swap legality rule (`Board::try_swap`).
//! - `solver`: the bounded depth-first search (`search`, `solve`) and its `SolverConfig`.
//! - `heuristics`: `SearchOutcome`, its ranking key `OutcomeScore` and `select_best`.
//! - `utils`: parsing board text (`board_from_str`).
//! - `error`: `DecodeError` and `SolveError`.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod solver;
pub mod utils;
