//! Scoring of terminal boards and selection of the best one.
use crate::engine::{Board, SwapStep, Symbol, CELL_COUNT, SYMBOL_COUNT};
use std::cmp::Reverse;

/// The symbol whose locked cells rank second, right after a full match row.
///
/// This is the symbol at alphabet position 2.
pub const PRIORITY_SYMBOL: Symbol = Symbol::Purple;

/// A terminal board reached by the search, with the steps that led to it.
///
/// The scoring attributes are computed once, when the outcome is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    board: Board,
    steps: Vec<SwapStep>,
    locked_total: usize,
    locked_per_symbol: [usize; SYMBOL_COUNT],
    has_full_match_row: bool,
}

impl SearchOutcome {
    pub fn new(board: Board, steps: Vec<SwapStep>) -> Self {
        let mut locked_per_symbol = [0; SYMBOL_COUNT];
        let cells = board.grid().cells();
        for index in 0..CELL_COUNT {
            if board.locks().is_locked_at(index) {
                locked_per_symbol[cells[index].index()] += 1;
            }
        }

        SearchOutcome {
            board,
            steps,
            locked_total: locked_per_symbol.iter().sum(),
            locked_per_symbol,
            has_full_match_row: board.grid().has_full_match_row(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn steps(&self) -> &[SwapStep] {
        &self.steps
    }

    pub fn locked_total(&self) -> usize {
        self.locked_total
    }

    pub fn locked_per_symbol(&self) -> &[usize; SYMBOL_COUNT] {
        &self.locked_per_symbol
    }

    /// Locked cells holding `symbol`.
    pub fn locked_of(&self, symbol: Symbol) -> usize {
        self.locked_per_symbol[symbol.index()]
    }

    pub fn has_full_match_row(&self) -> bool {
        self.has_full_match_row
    }

    /// The key this outcome is ranked by.
    pub fn score(&self) -> OutcomeScore {
        OutcomeScore {
            full_match_row: self.has_full_match_row,
            priority_locks: self.locked_of(PRIORITY_SYMBOL),
            locked_total: self.locked_total,
            fewer_steps: Reverse(self.steps.len()),
        }
    }
}

/// Ranking key of an outcome; a greater key is a better outcome.
///
/// Fields compare in declaration order:
/// 1. a board with a full match row beats one without,
/// 2. more locked `PRIORITY_SYMBOL` cells,
/// 3. more locked cells overall,
/// 4. fewer steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct OutcomeScore {
    pub full_match_row: bool,
    pub priority_locks: usize,
    pub locked_total: usize,
    pub fewer_steps: Reverse<usize>,
}

/// Picks the outcome with the greatest `OutcomeScore`.
///
/// When several outcomes share the greatest score the earliest one wins.
/// Returns `None` for an empty slice.
pub fn select_best(outcomes: &[SearchOutcome]) -> Option<&SearchOutcome> {
    let mut best: Option<(&SearchOutcome, OutcomeScore)> = None;
    for outcome in outcomes {
        let score = outcome.score();
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((outcome, score));
        }
    }
    best.map(|(outcome, _)| outcome)
}
