use crate::engine::{Board, Grid, SwapStep, HEIGHT, WIDTH};
use crate::error::SolveError;
use crate::heuristics::{select_best, SearchOutcome};
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Number of collected outcomes past which the search stops exploring.
pub const DEFAULT_MAX_OUTCOMES: usize = 1000;

/// Neighbour offsets tried from every cell. Together with the reverse moves,
/// tried from the other cell, they cover every 8-connected pair of cells.
pub const SWAP_OFFSETS: [(isize, isize); 4] = [(0, 1), (1, -1), (1, 0), (1, 1)];

/// Tunables for one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Exploration stops once more than this many terminal boards were collected.
    pub max_outcomes: usize,
    /// When set, the move order is shuffled with a `SmallRng` seeded by this value.
    pub shuffle_seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_outcomes: DEFAULT_MAX_OUTCOMES,
            shuffle_seed: None,
        }
    }
}

/// Everything a search collected.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Terminal boards in the order they were found.
    pub outcomes: Vec<SearchOutcome>,
    /// True if the exploration cap left some boards unexplored, in which case
    /// `outcomes` is a sample rather than every reachable terminal board.
    pub truncated: bool,
    /// Number of distinct boards that were expanded.
    pub nodes_expanded: usize,
}

/// The best outcome of a search.
#[derive(Clone, Debug)]
pub struct Solution {
    pub best: SearchOutcome,
    /// Number of terminal boards the best one was chosen from.
    pub outcomes_found: usize,
    pub truncated: bool,
    pub nodes_expanded: usize,
}

impl Solution {
    /// Swaps leading from the initial board to the best terminal board.
    pub fn steps(&self) -> &[SwapStep] {
        self.best.steps()
    }
}

#[derive(Clone, Copy, Debug)]
struct Move {
    x: usize,
    y: usize,
    dx: isize,
    dy: isize,
}

impl Move {
    fn apply(&self, board: &Board) -> Option<Board> {
        let (x, y) = (self.x as isize, self.y as isize);
        board.try_swap(x, y, x + self.dx, y + self.dy)
    }

    // Only called for moves `apply` accepted, so both cells are on the board.
    fn step(&self) -> SwapStep {
        SwapStep {
            x1: self.x,
            y1: self.y,
            x2: (self.x as isize + self.dx) as usize,
            y2: (self.y as isize + self.dy) as usize,
        }
    }
}

fn move_order(shuffle_seed: Option<u64>) -> Vec<Move> {
    let mut moves = Vec::with_capacity(WIDTH * HEIGHT * SWAP_OFFSETS.len());
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            for &(dx, dy) in &SWAP_OFFSETS {
                moves.push(Move { x, y, dx, dy });
            }
        }
    }
    if let Some(seed) = shuffle_seed {
        let mut rng = SmallRng::seed_from_u64(seed);
        moves.shuffle(&mut rng);
    }
    moves
}

struct Frame {
    board: Board,
    next_move: usize,
    any_swap: bool,
}

/// State owned by one search: the visited grids and the outcomes found so far.
struct SearchContext {
    moves: Vec<Move>,
    max_outcomes: usize,
    visited: HashSet<Grid>,
    outcomes: Vec<SearchOutcome>,
    truncated: bool,
    nodes_expanded: usize,
}

impl SearchContext {
    fn new(config: &SolverConfig) -> Self {
        SearchContext {
            moves: move_order(config.shuffle_seed),
            max_outcomes: config.max_outcomes,
            visited: HashSet::new(),
            outcomes: Vec::new(),
            truncated: false,
            nodes_expanded: 0,
        }
    }

    /// Returns a frame for `board` if it still has to be expanded.
    fn enter(&mut self, board: Board) -> Option<Frame> {
        if !self.visited.insert(*board.grid()) {
            return None;
        }
        if self.outcomes.len() > self.max_outcomes {
            self.truncated = true;
            return None;
        }
        self.nodes_expanded += 1;
        Some(Frame {
            board,
            next_move: 0,
            any_swap: false,
        })
    }

    /// Depth-first exploration from `initial`.
    ///
    /// Every accepted swap is explored before the next move of the same board
    /// is tried. `path` always holds the steps from `initial` to the top frame.
    fn run(&mut self, initial: Board) {
        let mut stack: Vec<Frame> = Vec::new();
        let mut path: Vec<SwapStep> = Vec::new();
        stack.extend(self.enter(initial));

        while let Some(frame) = stack.last_mut() {
            let mut child = None;
            while frame.next_move < self.moves.len() {
                let mv = self.moves[frame.next_move];
                frame.next_move += 1;
                if let Some(next) = mv.apply(&frame.board) {
                    frame.any_swap = true;
                    child = Some((next, mv.step()));
                    break;
                }
            }

            match child {
                Some((board, step)) => {
                    if let Some(next_frame) = self.enter(board) {
                        path.push(step);
                        stack.push(next_frame);
                    }
                }
                None => {
                    if let Some(done) = stack.pop() {
                        if !done.any_swap {
                            trace!("terminal board after {} steps:\n{}", path.len(), done.board);
                            self.outcomes.push(SearchOutcome::new(done.board, path.clone()));
                        }
                    }
                    path.pop();
                }
            }
        }
    }
}

/// Explores every board reachable from `initial` by productive swaps and
/// collects the terminal ones.
///
/// Each distinct grid is expanded at most once per search, reached through the
/// first path that finds it, so the steps attached to an outcome are not
/// necessarily the shortest way to its board.
pub fn search(initial: &Board, config: &SolverConfig) -> SearchReport {
    let mut context = SearchContext::new(config);
    context.run(*initial);

    debug!(
        "search expanded {} boards, found {} outcomes{}",
        context.nodes_expanded,
        context.outcomes.len(),
        if context.truncated { " (truncated)" } else { "" }
    );

    SearchReport {
        outcomes: context.outcomes,
        truncated: context.truncated,
        nodes_expanded: context.nodes_expanded,
    }
}

/// Searches from `initial` and returns the best terminal board found.
///
/// # Errors
/// `SolveError::NoSolutionFound` if the search collected no outcome at all.
///
/// # Examples
/// ```
/// use match3_solver::solver::{solve, SolverConfig};
/// use match3_solver::utils::board_from_str;
///
/// let board = board_from_str(concat!(
///     "BBBBBBB",
///     "GGGGGGG",
///     "RGRRSYB",
///     "PPPPPPP",
///     "YYYYYYY",
/// )).unwrap();
/// let solution = solve(&board, &SolverConfig::default()).unwrap();
/// let steps: Vec<String> = solution.steps().iter().map(|s| s.to_string()).collect();
/// assert_eq!(steps, vec!["0 2 1 2"]);
/// ```
pub fn solve(initial: &Board, config: &SolverConfig) -> Result<Solution, SolveError> {
    let report = search(initial, config);
    let best = select_best(&report.outcomes)
        .cloned()
        .ok_or(SolveError::NoSolutionFound {
            nodes_expanded: report.nodes_expanded,
        })?;

    debug!(
        "best outcome: {} steps, {} locks, full row: {}",
        best.steps().len(),
        best.locked_total(),
        best.has_full_match_row()
    );

    Ok(Solution {
        best,
        outcomes_found: report.outcomes.len(),
        truncated: report.truncated,
        nodes_expanded: report.nodes_expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str;

    fn board_with_free_row(row: &str) -> Board {
        board_from_str(&format!("BBBBBBBGGGGGGG{}PPPPPPPYYYYYYY", row)).unwrap()
    }

    fn config(max_outcomes: usize) -> SolverConfig {
        SolverConfig {
            max_outcomes,
            ..SolverConfig::default()
        }
    }

    // Plain recursive walk used to cross-check the explicit stack.
    fn recursive_search(
        board: Board,
        steps: Vec<SwapStep>,
        moves: &[Move],
        max_outcomes: usize,
        visited: &mut HashSet<Grid>,
        outcomes: &mut Vec<SearchOutcome>,
    ) {
        if !visited.insert(*board.grid()) {
            return;
        }
        if outcomes.len() > max_outcomes {
            return;
        }
        let mut any_swap = false;
        for mv in moves {
            if let Some(next) = mv.apply(&board) {
                any_swap = true;
                let mut next_steps = steps.clone();
                next_steps.push(mv.step());
                recursive_search(next, next_steps, moves, max_outcomes, visited, outcomes);
            }
        }
        if !any_swap {
            outcomes.push(SearchOutcome::new(board, steps));
        }
    }

    #[test]
    fn test_move_order_covers_each_cell_and_offset() {
        let moves = move_order(None);
        assert_eq!(moves.len(), WIDTH * HEIGHT * 4);
        let first: Vec<(usize, usize, isize, isize)> =
            moves.iter().take(5).map(|m| (m.x, m.y, m.dx, m.dy)).collect();
        assert_eq!(
            first,
            vec![(0, 0, 0, 1), (0, 0, 1, -1), (0, 0, 1, 0), (0, 0, 1, 1), (0, 1, 0, 1)]
        );
    }

    #[test]
    fn test_shuffled_move_order_is_seeded() {
        let key = |moves: Vec<Move>| -> Vec<(usize, usize, isize, isize)> {
            moves.iter().map(|m| (m.x, m.y, m.dx, m.dy)).collect()
        };
        assert_eq!(key(move_order(Some(7))), key(move_order(Some(7))));
        let mut shuffled = key(move_order(Some(7)));
        let mut plain = key(move_order(None));
        assert_ne!(shuffled, plain);
        shuffled.sort();
        plain.sort();
        assert_eq!(shuffled, plain);
    }

    #[test]
    fn test_search_no_legal_swaps_returns_initial_board() {
        let board = board_from_str(&"B".repeat(35)).unwrap();
        let report = search(&board, &SolverConfig::default());
        assert_eq!(report.outcomes.len(), 1);
        assert!(!report.truncated);
        assert_eq!(report.nodes_expanded, 1);
        let outcome = &report.outcomes[0];
        assert!(outcome.steps().is_empty());
        assert_eq!(outcome.board(), &board);
    }

    #[test]
    fn test_search_unlocked_board_without_moves() {
        // Nothing is locked and no exchange of neighbours lines up three.
        let board = board_from_str(concat!(
            "BGPBGPB",
            "RSYRSYR",
            "PBGPBGP",
            "YRSYRSY",
            "GPBGPBG",
        ))
        .unwrap();
        assert_eq!(board.locked_count(), 0);
        let solution = solve(&board, &SolverConfig::default()).unwrap();
        assert!(solution.steps().is_empty());
        assert_eq!(solution.outcomes_found, 1);
        assert_eq!(solution.best.board(), &board);
    }

    #[test]
    fn test_solve_single_forced_move() {
        let board = board_with_free_row("RGRRSYB");
        let solution = solve(&board, &SolverConfig::default()).unwrap();
        assert_eq!(solution.steps(), &[SwapStep { x1: 0, y1: 2, x2: 1, y2: 2 }]);
        assert_eq!(solution.outcomes_found, 1);
        assert!(!solution.truncated);
        assert_eq!(solution.best.locked_total(), 31);
    }

    #[test]
    fn test_search_explicit_stack_matches_recursion() {
        for seed in 0..6 {
            let board = Board::random_with_seed(seed);
            for max_outcomes in [0, 3, 40] {
                let report = search(&board, &config(max_outcomes));

                let mut visited = HashSet::new();
                let mut expected = Vec::new();
                recursive_search(
                    board,
                    Vec::new(),
                    &move_order(None),
                    max_outcomes,
                    &mut visited,
                    &mut expected,
                );
                assert_eq!(report.outcomes, expected, "seed {} cap {}", seed, max_outcomes);
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = Board::random_with_seed(42);
        let first = solve(&board, &config(100)).unwrap();
        let second = solve(&board, &config(100)).unwrap();
        assert_eq!(first.best, second.best);
        assert_eq!(first.outcomes_found, second.outcomes_found);

        let shuffled = SolverConfig {
            max_outcomes: 100,
            shuffle_seed: Some(3),
        };
        let a = solve(&board, &shuffled).unwrap();
        let b = solve(&board, &shuffled).unwrap();
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_search_outcomes_bounded_by_cap() {
        for seed in 0..6 {
            let board = Board::random_with_seed(seed);
            for max_outcomes in [0, 1, 10] {
                let report = search(&board, &config(max_outcomes));
                assert!(!report.outcomes.is_empty());
                assert!(report.outcomes.len() <= max_outcomes + 1);
            }
        }
    }

    #[test]
    fn test_search_reports_truncation() {
        // Both (0,2)-(1,2) and (3,2)-(4,2) open separate branches.
        let board = board_with_free_row("RGRRGRR");
        let capped = search(&board, &config(0));
        assert_eq!(capped.outcomes.len(), 1);
        assert!(capped.truncated);

        let full = search(&board, &SolverConfig::default());
        assert!(!full.truncated);
        assert!(full.outcomes.len() > 1);
    }

    #[test]
    fn test_search_outcomes_are_distinct_terminal_boards() {
        let board = Board::random_with_seed(9);
        let report = search(&board, &config(200));
        let grids: HashSet<Grid> = report.outcomes.iter().map(|o| *o.board().grid()).collect();
        assert_eq!(grids.len(), report.outcomes.len());
        for outcome in &report.outcomes {
            let mut replay = board;
            for step in outcome.steps() {
                replay = replay
                    .try_swap(
                        step.x1 as isize,
                        step.y1 as isize,
                        step.x2 as isize,
                        step.y2 as isize,
                    )
                    .expect("recorded step must be a productive swap");
            }
            assert_eq!(&replay, outcome.board());
            assert!(move_order(None).iter().all(|m| m.apply(&replay).is_none()));
        }
    }

    #[test]
    fn test_shuffle_finds_same_terminal_boards_when_complete() {
        let board = board_with_free_row("RGRRGRR");
        let plain = search(&board, &SolverConfig::default());
        let shuffled = search(
            &board,
            &SolverConfig {
                shuffle_seed: Some(11),
                ..SolverConfig::default()
            },
        );
        assert!(!plain.truncated && !shuffled.truncated);
        let grids = |r: &SearchReport| -> HashSet<Grid> {
            r.outcomes.iter().map(|o| *o.board().grid()).collect()
        };
        assert_eq!(grids(&plain), grids(&shuffled));
    }
}
