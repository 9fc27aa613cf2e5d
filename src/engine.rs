//! Board model for the 7x5 swap puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Symbol`: the six tile kinds and their one-character codes.
//! - `Grid` and `LockMask`: flat row-major cell arrays.
//! - `detect_locks`: derives the lock mask of a grid from its runs of three or more.
//! - `Board`: a grid together with its lock mask, and the swap legality rule.
//! - `SwapStep`: one recorded exchange of two cells.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::error::DecodeError;

/// Number of columns on the board.
pub const WIDTH: usize = 7;
/// Number of rows on the board.
pub const HEIGHT: usize = 5;
/// Number of cells on the board.
pub const CELL_COUNT: usize = WIDTH * HEIGHT;
/// Number of distinct symbols.
pub const SYMBOL_COUNT: usize = 6;
/// Minimum run length that locks its cells.
pub const MIN_RUN: usize = 3;

const LONGEST_LINE: usize = if WIDTH > HEIGHT { WIDTH } else { HEIGHT };

/// One of the six tile kinds.
///
/// Variants are declared in alphabet order of their character codes, so the
/// derived ordering and `index()` both follow the `BGPRSY` alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// `B`, index 0.
    Blue,
    /// `G`, index 1.
    Green,
    /// `P`, index 2.
    Purple,
    /// `R`, index 3.
    Red,
    /// `S`, index 4.
    Silver,
    /// `Y`, index 5.
    Yellow,
}

impl Symbol {
    /// All symbols in alphabet order.
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Blue,
        Symbol::Green,
        Symbol::Purple,
        Symbol::Red,
        Symbol::Silver,
        Symbol::Yellow,
    ];

    /// Converts the symbol to its character code.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_solver::engine::Symbol;
    /// assert_eq!(Symbol::Purple.to_char(), 'P');
    /// assert_eq!(Symbol::Silver.to_char(), 'S');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Symbol::Blue => 'B',
            Symbol::Green => 'G',
            Symbol::Purple => 'P',
            Symbol::Red => 'R',
            Symbol::Silver => 'S',
            Symbol::Yellow => 'Y',
        }
    }

    /// Looks up the symbol for a character code, `None` outside the alphabet.
    pub fn from_char(ch: char) -> Option<Symbol> {
        match ch {
            'B' => Some(Symbol::Blue),
            'G' => Some(Symbol::Green),
            'P' => Some(Symbol::Purple),
            'R' => Some(Symbol::Red),
            'S' => Some(Symbol::Silver),
            'Y' => Some(Symbol::Yellow),
            _ => None,
        }
    }

    /// Decodes the character found at `position` of some board text.
    ///
    /// # Errors
    /// `DecodeError::UnknownSymbol` when `ch` is not one of `BGPRSY`.
    pub fn decode(ch: char, position: usize) -> Result<Symbol, DecodeError> {
        Symbol::from_char(ch).ok_or(DecodeError::UnknownSymbol { ch, position })
    }

    /// Position of the symbol in the alphabet, `0..SYMBOL_COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Row-major index of the cell at column `x`, row `y`.
pub fn cell_index(x: usize, y: usize) -> usize {
    y * WIDTH + x
}

/// The symbols of every cell, stored row-major.
///
/// Two boards are the same search node exactly when their grids are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid([Symbol; CELL_COUNT]);

impl Grid {
    /// Wraps a row-major cell array.
    pub fn from_cells(cells: [Symbol; CELL_COUNT]) -> Self {
        Grid(cells)
    }

    /// The symbol at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the board.
    pub fn get(&self, x: usize, y: usize) -> Symbol {
        self.0[cell_index(x, y)]
    }

    /// The row-major cell array.
    pub fn cells(&self) -> &[Symbol; CELL_COUNT] {
        &self.0
    }

    /// True if some row holds the same symbol in all of its columns.
    pub fn has_full_match_row(&self) -> bool {
        self.0
            .chunks_exact(WIDTH)
            .any(|row| row.iter().all(|&s| s == row[0]))
    }
}

/// Which cells are locked, stored row-major like `Grid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LockMask([bool; CELL_COUNT]);

impl LockMask {
    fn unlocked() -> Self {
        LockMask([false; CELL_COUNT])
    }

    /// Whether the cell at column `x`, row `y` is locked.
    pub fn is_locked(&self, x: usize, y: usize) -> bool {
        self.0[cell_index(x, y)]
    }

    /// Locked flag by row-major index.
    pub fn is_locked_at(&self, index: usize) -> bool {
        self.0[index]
    }

    /// Total number of locked cells.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&locked| locked).count()
    }
}

/// Derives the lock mask of `grid`.
///
/// Every row and every column is scanned independently. A maximal run of at
/// least `MIN_RUN` equal symbols locks all of its cells; row and column locks
/// are combined. The result depends on `grid` alone.
///
/// # Examples
///
/// ```
/// use match3_solver::engine::detect_locks;
/// use match3_solver::utils::board_from_str;
///
/// let board = board_from_str(concat!(
///     "BBBGPRS",
///     "GPRSYBG",
///     "PRSYBGP",
///     "RSYBGPR",
///     "SYBGPRS",
/// )).unwrap();
/// let mask = detect_locks(board.grid());
/// assert!(mask.is_locked(0, 0) && mask.is_locked(2, 0));
/// assert!(!mask.is_locked(3, 0));
/// assert_eq!(mask.count(), 3);
/// ```
pub fn detect_locks(grid: &Grid) -> LockMask {
    let mut mask = LockMask::unlocked();
    for x in 0..WIDTH {
        mark_runs(grid, &mut mask, (0..HEIGHT).map(|y| cell_index(x, y)));
    }
    for y in 0..HEIGHT {
        mark_runs(grid, &mut mask, (0..WIDTH).map(|x| cell_index(x, y)));
    }
    mask
}

// Walks one line of cells, grouping consecutive equal symbols into runs.
fn mark_runs(grid: &Grid, mask: &mut LockMask, line: impl Iterator<Item = usize>) {
    let mut run = [0usize; LONGEST_LINE];
    let mut run_len = 0;

    for index in line {
        if run_len > 0 && grid.0[run[0]] != grid.0[index] {
            lock_run(mask, &run[..run_len]);
            run_len = 0;
        }
        run[run_len] = index;
        run_len += 1;
    }
    // The last run of the line has no differing cell after it.
    lock_run(mask, &run[..run_len]);
}

fn lock_run(mask: &mut LockMask, run: &[usize]) {
    if run.len() >= MIN_RUN {
        for &index in run {
            mask.0[index] = true;
        }
    }
}

/// A grid together with the lock mask derived from it.
///
/// Boards are never changed in place once built: `try_swap` returns a new board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    locks: LockMask,
}

impl Board {
    /// Builds a board from a grid, computing its locks.
    pub fn from_grid(grid: Grid) -> Self {
        Board {
            grid,
            locks: detect_locks(&grid),
        }
    }

    /// Creates a board with symbols drawn from a `SmallRng` seeded with `seed`.
    ///
    /// The same seed always produces the same board. Random boards usually
    /// contain runs already, so some cells may start locked.
    pub fn random_with_seed(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut cells = [Symbol::Blue; CELL_COUNT];
        for cell in cells.iter_mut() {
            *cell = Symbol::ALL[rng.gen_range(0..SYMBOL_COUNT)];
        }
        Board::from_grid(Grid(cells))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn locks(&self) -> &LockMask {
        &self.locks
    }

    /// The symbol at column `x`, row `y`.
    pub fn symbol_at(&self, x: usize, y: usize) -> Symbol {
        self.grid.get(x, y)
    }

    /// Whether the cell at column `x`, row `y` is locked.
    pub fn is_locked(&self, x: usize, y: usize) -> bool {
        self.locks.is_locked(x, y)
    }

    /// Number of locked cells on the board.
    pub fn locked_count(&self) -> usize {
        self.locks.count()
    }

    /// Swaps the cells `(x1, y1)` and `(x2, y2)` if the move is productive.
    ///
    /// The swap is rejected (returns `None`) when either coordinate is off the
    /// board, when either cell is already locked, or when after the exchange
    /// neither of the two cells ends up locked. An accepted swap returns the new
    /// board with its locks recomputed; `self` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_solver::utils::board_from_str;
    ///
    /// let board = board_from_str(concat!(
    ///     "BBBBBBB",
    ///     "GGGGGGG",
    ///     "RGRRSYB",
    ///     "PPPPPPP",
    ///     "YYYYYYY",
    /// )).unwrap();
    /// assert!(board.try_swap(1, 2, 2, 2).is_none());
    /// let swapped = board.try_swap(0, 2, 1, 2).unwrap();
    /// assert!(swapped.is_locked(1, 2) && swapped.is_locked(3, 2));
    /// ```
    pub fn try_swap(&self, x1: isize, y1: isize, x2: isize, y2: isize) -> Option<Board> {
        let first = checked_index(x1, y1)?;
        let second = checked_index(x2, y2)?;

        if self.locks.is_locked_at(first) || self.locks.is_locked_at(second) {
            return None;
        }

        let mut grid = self.grid;
        grid.0.swap(first, second);
        let swapped = Board::from_grid(grid);

        if swapped.locks.is_locked_at(first) || swapped.locks.is_locked_at(second) {
            Some(swapped)
        } else {
            None
        }
    }
}

fn checked_index(x: isize, y: isize) -> Option<usize> {
    if (0..WIDTH as isize).contains(&x) && (0..HEIGHT as isize).contains(&y) {
        Some(cell_index(x as usize, y as usize))
    } else {
        None
    }
}

impl fmt::Display for Board {
    /// One line per row; each cell is its symbol followed by `*` when locked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if x > 0 {
                    write!(f, " ")?;
                }
                let marker = if self.is_locked(x, y) { '*' } else { ' ' };
                write!(f, "{}{}", self.symbol_at(x, y).to_char(), marker)?;
            }
            if y < HEIGHT - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// One exchange of two cells, in the order it was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwapStep {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl fmt::Display for SwapStep {
    /// Formats the step as `x1 y1 x2 y2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x1, self.y1, self.x2, self.y2)
    }
}
