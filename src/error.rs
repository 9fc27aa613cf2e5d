//! Error types shared by the board parser and the solver.
use thiserror::Error;

/// Failure to turn board text into a `Board`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A character outside the `BGPRSY` alphabet.
    #[error("unknown symbol '{ch}' at position {position}")]
    UnknownSymbol { ch: char, position: usize },
    /// The input does not hold exactly one character per cell.
    #[error("expected {expected} board characters, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// Failure of a whole search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The exploration cap stopped the search before any terminal board was reached.
    #[error("no terminal board reached after expanding {nodes_expanded} boards")]
    NoSolutionFound { nodes_expanded: usize },
}
