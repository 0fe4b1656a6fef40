//! Defines the Sudoku solve function and its depth-first search.

use crate::core::*;

pub mod state;
mod tables;

use state::*;

/// The fewest givens a puzzle may have and still be worth solving: no
/// 9x9 Sudoku with fewer than 17 givens has a unique solution, so anything
/// below this is rejected as trivially ambiguous.
pub const MIN_GIVENS: usize = 17;

/// What `solve` found.
pub struct Solution {
  /// The number of solutions found, bounded by the caller's limit.  Zero
  /// means the puzzle has no solution, or was rejected for having fewer
  /// than [`MIN_GIVENS`] givens.
  pub count: i32,

  /// The first solution found, when there was one.
  pub board: Option<SolvedBoard>,

  /// How many digits were tried by guessing.  Zero means propagation alone
  /// solved (or refuted) the puzzle.
  pub num_guesses: u64,
}

/// Solves the given puzzle, counting solutions up to `limit`.
///
/// The search runs constraint propagation to a fixed point, then guesses:
/// bivalue cells first, with a full state snapshot per branch.  The result
/// is deterministic for a given input.
pub fn solve(clues: &Board, limit: i32) -> Solution {
  let mut solver = Solver {
    limit,
    count: 0,
    first: None,
    num_guesses: 0,
  };
  if limit >= 1 && clues.len() >= MIN_GIVENS {
    if let Ok(mut state) = State::from_board(clues) {
      match state.propagate() {
        Ok(Outcome::Solved) => solver.record(&state),
        Ok(Outcome::Stalled) => solver.search(&mut state),
        Err(Invalid) => {}
      }
    }
  }
  Solution {
    count: solver.count,
    board: solver.first,
    num_guesses: solver.num_guesses,
  }
}

/// The per-call search context: the solution bound, what's been found so
/// far, and the guess counter.
struct Solver {
  limit: i32,
  count: i32,
  first: Option<SolvedBoard>,
  num_guesses: u64,
}

impl Solver {
  /// Notes one more solution, keeping the board of the first.
  fn record(&mut self, state: &State) {
    if self.first.is_none() {
      let board = state.to_board();
      // Safe because this is only called on states with every cell solved.
      self.first = Some(unsafe { SolvedBoard::new(&board) });
    }
    self.count += 1;
  }

  /// Explores the given propagated state: records it if it's complete,
  /// otherwise picks a cell and tries its digits.  Unwinds once the
  /// solution bound is reached.
  fn search(&mut self, state: &mut State) {
    if self.count >= self.limit {
      return;
    }
    if state.is_solved() {
      self.record(state);
      return;
    }
    if !self.guess_bivalue(state) {
      self.guess_first_cell(state);
    }
  }

  /// Guesses at the lowest cell known to have exactly two candidate digits.
  /// The first digit explores a snapshot of the state; the second reuses
  /// the state itself, saving a copy.  Returns false when no such cell is
  /// known.
  fn guess_bivalue(&mut self, state: &mut State) -> bool {
    let Some(cell) = state.first_pair() else {
      return false;
    };
    let digits = state.candidates_at(cell);
    debug_assert_eq!(2, digits.len());
    let mut digits = digits.iter();
    let (Some(first), Some(second)) = (digits.next(), digits.next()) else {
      return false;
    };

    let mut snapshot = *state;
    state.remove_candidate(cell, first);
    self.num_guesses += 1;
    snapshot.assign_in_band(cell, first);
    if snapshot.propagate().is_ok() {
      self.search(&mut snapshot);
    }
    if self.count >= self.limit {
      return true;
    }

    self.num_guesses += 1;
    state.assign_in_band(cell, second);
    if state.propagate().is_ok() {
      self.search(state);
    }
    true
  }

  /// Guesses every candidate digit of the lowest unsolved cell, each on its
  /// own snapshot of the state.
  fn guess_first_cell(&mut self, state: &mut State) {
    let Some(cell) = state.first_unsolved() else {
      return;
    };
    for digit in state.candidates_at(cell).iter() {
      if self.count >= self.limit {
        return;
      }
      let mut snapshot = *state;
      state.remove_candidate(cell, digit);
      self.num_guesses += 1;
      snapshot.assign_in_band(cell, digit);
      if snapshot.propagate().is_ok() {
        self.search(&mut snapshot);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use paste::paste;
  use std::str::FromStr;

  /// A classical easy puzzle and its solution.
  const EASY: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
  const EASY_SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

  /// A well-known 17-given puzzle with a unique solution.
  const SEVENTEEN: &str =
    "000000010400000000020000000000050407008000300001090000300400200050100000000806000";
  const SEVENTEEN_SOLVED: &str =
    "693784512487512936125963874932651487568247391741398625319475268856129743274836159";

  /// `EASY_SOLVED` with one unavoidable rectangle cleared, leaving exactly
  /// two completions.
  const TWO_SOLUTIONS: &str =
    "534678912672195348198342567859761423426853791713924856961.3728.287.1963.345286179";

  /// A puzzle that propagation alone completes.
  const NO_GUESSES: &str =
    "..1.....8....57.3......49.....519....2.3......762.......3....4..64...5.18......96";

  /// A puzzle with a unique solution that propagation alone can't finish.
  const NEEDS_GUESSES: &str =
    ".6.5.4.3.1...9...8.........9...5...6.4.6.2.7.7...4...5.........4...8...1.5.2.3.4.";

  macro_rules! solve_test {
    ($name:ident, $clues:expr, $limit:expr, $count:expr) => {
      paste! {
          #[test]
          fn [<test_solve_ $name>]() {
              let clues = Board::from_str($clues).unwrap();
              let solution = solve(&clues, $limit);
              assert_eq!($count, solution.count);
              if solution.count > 0 {
                  let board = solution.board.expect("count > 0 must come with a board");
                  let mut board = board.board();
                  assert_eq!(BoardState::Solved, board.state());
                  // The givens survive into the solution.
                  board.intersect(&clues);
                  assert_eq!(board, clues);
              } else {
                  assert!(solution.board.is_none());
              }
          }
      }
    };
  }

  solve_test!(easy, EASY, 1, 1);
  solve_test!(easy_unique, EASY, 2, 1);
  solve_test!(seventeen_givens, SEVENTEEN, 2, 1);
  solve_test!(needs_guesses_unique, NEEDS_GUESSES, 2, 1);
  solve_test!(
    no_solution,
    "1....6....59.....82....8....45...3....3...7....6..3.54...325..6........17389.....",
    1,
    0
  );
  solve_test!(
    duplicate_given_in_row,
    "53..7..5.6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
    1,
    0
  );
  solve_test!(two_solutions_probed, TWO_SOLUTIONS, 2, 2);
  solve_test!(two_solutions_first_only, TWO_SOLUTIONS, 1, 1);
  solve_test!(two_solutions_exhausted, TWO_SOLUTIONS, 9, 2);
  solve_test!(already_solved, EASY_SOLVED, 1, 1);
  solve_test!(
    solved_but_broken,
    "554678912672195348198342567859761423426853791713924856961537284287419635345286179",
    1,
    0
  );
  solve_test!(empty_board, &".".repeat(81), 1, 0);
  solve_test!(
    sixteen_givens,
    // The 16 givens don't clear the minimum, so the board is rejected as
    // ambiguous without being solved.
    "000000013020500000000000000103000070000802000004000000000040500670000200000010000",
    2,
    0
  );

  #[test]
  fn test_solutions_written_out() {
    let clues = Board::from_str(EASY).unwrap();
    let solution = solve(&clues, 1);
    assert_eq!(EASY_SOLVED, solution.board.unwrap().to_string());

    let clues = Board::from_str(SEVENTEEN).unwrap();
    let solution = solve(&clues, 2);
    assert_eq!(SEVENTEEN_SOLVED, solution.board.unwrap().to_string());
  }

  #[test]
  fn test_propagation_only_puzzle_needs_no_guesses() {
    let clues = Board::from_str(NO_GUESSES).unwrap();
    let solution = solve(&clues, 1);
    assert_eq!(1, solution.count);
    assert_eq!(0, solution.num_guesses);
  }

  #[test]
  fn test_hard_puzzle_needs_guesses() {
    let clues = Board::from_str(NEEDS_GUESSES).unwrap();
    let solution = solve(&clues, 1);
    assert_eq!(1, solution.count);
    assert!(solution.num_guesses > 0);
  }

  #[test]
  fn test_limit_below_one_finds_nothing() {
    let clues = Board::from_str(EASY).unwrap();
    let solution = solve(&clues, 0);
    assert_eq!(0, solution.count);
    assert!(solution.board.is_none());
  }

  #[test]
  fn test_deterministic() {
    let clues = Board::from_str(SEVENTEEN).unwrap();
    let first = solve(&clues, 1);
    let second = solve(&clues, 1);
    assert_eq!(first.count, second.count);
    assert_eq!(first.num_guesses, second.num_guesses);
    assert_eq!(first.board.unwrap(), second.board.unwrap());
  }

  mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
      /// Clearing cells of a solved board leaves a puzzle this solver can
      /// re-complete, with the remaining givens intact.
      #[test]
      fn cleared_boards_still_solve(cleared in prop::collection::vec(0..81usize, 0..70)) {
        let solved: Board = EASY_SOLVED.parse().unwrap();
        let mut clues = solved;
        for &i in &cleared {
          clues[Cell::from_index(i).unwrap()] = None;
        }
        let solution = solve(&clues, 2);
        if clues.len() >= MIN_GIVENS {
          prop_assert!(solution.count >= 1);
          let mut board = solution.board.unwrap().board();
          prop_assert_eq!(BoardState::Solved, board.state());
          board.intersect(&clues);
          prop_assert_eq!(board, clues);
        } else {
          prop_assert_eq!(0, solution.count);
        }
      }

      /// Boards parse back from their display form.
      #[test]
      fn parse_display_round_trip(chars in "[1-9.]{81}") {
        let board: Board = chars.parse().unwrap();
        prop_assert_eq!(chars, board.to_string());
      }
    }
  }
}
