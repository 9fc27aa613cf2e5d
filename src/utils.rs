use crate::engine::{Board, Grid, Symbol, CELL_COUNT};
use crate::error::DecodeError;

/// Parses board text into a `Board`.
///
/// The text must hold exactly `CELL_COUNT` (35) characters, one per cell,
/// row-major: the first 7 characters are row 0 from column 0 to column 6,
/// the next 7 are row 1, and so on for 5 rows. Locks are detected before
/// the board is returned.
///
/// Valid characters are `B`, `G`, `P`, `R`, `S` and `Y`.
///
/// # Errors
/// * `DecodeError::UnknownSymbol` for the first character outside the alphabet.
/// * `DecodeError::WrongLength` if the text is not exactly 35 characters long.
///
/// # Examples
/// ```
/// use match3_solver::utils::board_from_str;
/// use match3_solver::engine::Symbol;
///
/// let board = board_from_str("BGPRSYBGPRSYBGPRSYBGPRSYBGPRSYBGPRS").unwrap();
/// assert_eq!(board.symbol_at(0, 0), Symbol::Blue);
/// assert_eq!(board.symbol_at(6, 0), Symbol::Blue);
/// assert_eq!(board.symbol_at(0, 1), Symbol::Green);
///
/// assert!(board_from_str("BGPRSX").is_err());
/// ```
pub fn board_from_str(text: &str) -> Result<Board, DecodeError> {
    let mut cells = [Symbol::Blue; CELL_COUNT];
    let mut found = 0;

    for (position, ch) in text.chars().enumerate() {
        let symbol = Symbol::decode(ch, position)?;
        if position < CELL_COUNT {
            cells[position] = symbol;
        }
        found += 1;
    }

    if found != CELL_COUNT {
        return Err(DecodeError::WrongLength {
            expected: CELL_COUNT,
            found,
        });
    }
    Ok(Board::from_grid(Grid::from_cells(cells)))
}
