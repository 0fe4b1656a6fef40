//! Defines the State struct that's at the heart of the band-oriented solver.

use super::tables::*;
use crate::core::bits::*;
use crate::core::*;

/// What the propagation driver concluded about a state that's still
/// consistent: either every cell is assigned, or no further progress can be
/// made without guessing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
  Solved,
  Stalled,
}

/// Tracks the possible digit placements during solving.
///
/// For each digit, one 27-bit word per band records the cells that can still
/// take that digit.  Snapshotting the whole struct before a guess is a plain
/// copy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct State {
  /// The remaining possibilities, one cell set per digit.
  candidates: [BandBoard; 9],

  /// A copy of `candidates` from the last per-band transform, for skipping
  /// bands that carry no new information.
  prev_candidates: [BandBoard; 9],

  /// The cells that have been definitively assigned a digit.
  solved_cells: BandBoard,

  /// Which digit-rows are done: bit `9d + r` records that digit `d` has
  /// found its cell in row `r`.  The 81 bits span the three band words.
  solved_rows: BandBoard,

  /// Cells seen with exactly two remaining digits; guides guessing.
  pairs: BandBoard,
}

impl State {
  /// Makes a State with every placement still possible.
  pub fn new() -> State {
    State {
      candidates: [BandBoard::ONES; 9],
      prev_candidates: [BandBoard::ZERO; 9],
      solved_cells: BandBoard::ZERO,
      solved_rows: BandBoard::ZERO,
      pairs: BandBoard::ZERO,
    }
  }

  /// Makes a State with the given board's digits placed but all other
  /// possibilities still open.  Returns `Err(Invalid)` if the board's clues
  /// are inconsistent with the rules of Sudoku.
  pub fn from_board(clues: &Board) -> Result<State, Invalid> {
    let mut state = State::new();
    for (cell, digit) in clues.iter() {
      state.place(cell, digit)?;
    }
    Ok(state)
  }

  /// Tells whether every cell has been assigned a digit.
  pub fn is_solved(&self) -> bool {
    self.solved_cells == BandBoard::ONES
  }

  /// Assigns the given digit to the given cell and updates all of the cell's
  /// peers: the cell leaves every other digit's candidates, and the cell's
  /// 20 peers leave this digit's candidates.  Fails when the placement was
  /// already ruled out.
  pub fn place(&mut self, cell: Cell, digit: Digit) -> Result<(), Invalid> {
    let fill = BandBoard::singleton(cell.index() as i32);
    if (self.candidates[digit.index()] & fill).is_empty() {
      return Err(Invalid);
    }
    let row_bit = 9 * digit.index() + cell.row().index();
    *self.solved_rows.band_mut(row_bit / 27) |= Bits27::singleton((row_bit % 27) as i32);
    self.solved_cells |= fill;
    for plane in self.candidates.iter_mut() {
      *plane &= !fill;
    }
    let plane = &mut self.candidates[digit.index()];
    *plane &= clear_peers(cell).0;
    *plane |= fill;
    Ok(())
  }

  /// Assigns the given digit to the given cell by clearing only the cell's
  /// in-band peers from the digit's candidates.  The rest of the
  /// assignment's consequences (the other digits at this cell, the peers in
  /// the other bands, `solved_cells`) flow through the next propagation
  /// passes, so this is the cheap form used when guessing.
  pub fn assign_in_band(&mut self, cell: Cell, digit: Digit) {
    *self.candidates[digit.index()].band_mut(cell.band().index()) &= band_assign_mask(cell);
  }

  /// Removes one possible placement.
  pub fn remove_candidate(&mut self, cell: Cell, digit: Digit) {
    *self.candidates[digit.index()].band_mut(cell.band().index()) &=
      Bits27::singleton(cell.band_bit()).const_not();
  }

  /// The digits that could still go in the given cell.
  pub fn candidates_at(&self, cell: Cell) -> DigitSet {
    let band = cell.band().index();
    let bit = Bits27::singleton(cell.band_bit());
    let mut digits = DigitSet::new();
    for (i, plane) in self.candidates.iter().enumerate() {
      if !(plane.band(band) & bit).is_empty() {
        digits.0.insert(i as i32);
      }
    }
    digits
  }

  /// The lowest-numbered cell known to have exactly two possible digits, if
  /// any.
  pub fn first_pair(&self) -> Option<Cell> {
    // Safe because BandBoard only returns values in 0..81.
    self
      .pairs
      .smallest_value()
      .map(|value| unsafe { Cell::new_unchecked(value as i8) })
  }

  /// The lowest-numbered cell with no assigned digit, if any.
  pub fn first_unsolved(&self) -> Option<Cell> {
    // Safe because BandBoard only returns values in 0..81.
    (!self.solved_cells)
      .smallest_value()
      .map(|value| unsafe { Cell::new_unchecked(value as i8) })
  }

  /// Renders the assigned cells as a board, leaving the rest empty.
  pub fn to_board(&self) -> Board {
    let mut board = Board::new();
    for (i, plane) in self.candidates.iter().enumerate() {
      // Safe because i is in 0..9.
      let digit = unsafe { Digit::from_index_unchecked(i) };
      for cell in CellSet(*plane & self.solved_cells).iter() {
        board[cell] = Some(digit);
      }
    }
    board
  }

  /// Finds cells forced by row, column, or box uniqueness, and applies
  /// locked-candidate eliminations, one digit-band at a time, until a full
  /// sweep changes nothing.  Fails when some band runs out of cells for a
  /// digit.
  pub fn hidden_singles(&mut self) -> Result<(), Invalid> {
    let mut changed = true;
    while changed {
      changed = false;
      for d in 0..Digit::COUNT {
        for b in 0..BandBoard::BANDS {
          let band = self.candidates[d].band(b);
          if band == self.prev_candidates[d].band(b) {
            continue;
          }
          changed = true;
          let triads = band_triads(band);
          let band = band & keep_locked_candidates(triads);
          if band.is_empty() {
            return Err(Invalid);
          }
          let cols = band_cols(band);

          // Columns this band has locked are gone from the other two bands.
          let elim = col_locked_eliminations(cols);
          *self.candidates[d].band_mut((b + 1) % 3) &= elim;
          *self.candidates[d].band_mut((b + 2) % 3) &= elim;
          *self.candidates[d].band_mut(b) = band;
          *self.prev_candidates[d].band_mut(b) = band;

          // Rows whose digit is pinned both ways hold a new hidden single.
          let rows = hidden_single_rows(triad_row_singles(triads) & col_singles(cols));
          let row_bit = 9 * d + 3 * b;
          let (word, shift) = (row_bit / 27, (row_bit % 27) as u32);
          let recorded = (self.solved_rows.band(word).backing_int() >> shift) & 0b111;
          if recorded != rows.backing_int() as u32 {
            *self.solved_rows.band_mut(word) |=
              Bits27::from_backing_int((rows.backing_int() as u32) << shift);
            let solved = band & row_fill(rows);
            *self.solved_cells.band_mut(b) |= solved;
            for other in 0..Digit::COUNT {
              if other != d {
                *self.candidates[other].band_mut(b) &= solved.const_not();
              }
            }
          }
        }
      }
    }
    Ok(())
  }

  /// Finds cells with exactly one possible digit left and assigns them,
  /// returning how many there were.  Also refreshes `pairs` along the way.
  /// Fails when some cell has no possible digit left.
  pub fn naked_singles(&mut self) -> Result<i32, Invalid> {
    // `rN` ends up holding the cells with at least N candidate digits.
    let mut r1 = self.candidates[0];
    let mut r2 = BandBoard::ZERO;
    let mut r3 = BandBoard::ZERO;
    for plane in &self.candidates[1..] {
      r3 |= r2 & *plane;
      r2 |= r1 & *plane;
      r1 |= *plane;
    }
    if r1 != BandBoard::ONES {
      return Err(Invalid);
    }
    self.pairs = r2 & !r3;

    let mut count = 0;
    for value in (r1 & !r2 & !self.solved_cells).values() {
      // Safe because BandBoard only returns values in 0..81.
      let cell = unsafe { Cell::new_unchecked(value as i8) };
      let band = cell.band().index();
      let bit = Bits27::singleton(cell.band_bit());
      for d in 0..Digit::COUNT {
        if !(self.candidates[d].band(band) & bit).is_empty() {
          *self.candidates[d].band_mut(band) &= band_assign_mask(cell);
          count += 1;
          break;
        }
      }
    }
    Ok(count)
  }

  /// Alternates the hidden-singles and naked-singles passes until the board
  /// is solved or neither pass can make progress.  Fails as soon as either
  /// pass finds a contradiction.
  pub fn propagate(&mut self) -> Result<Outcome, Invalid> {
    loop {
      self.hidden_singles()?;
      if self.is_solved() {
        debug_assert!(self.invariants_hold());
        return Ok(Outcome::Solved);
      }
      if self.naked_singles()? == 0 {
        debug_assert!(self.invariants_hold());
        return Ok(Outcome::Stalled);
      }
    }
  }

  /// Checks the candidate-structure invariants that must hold whenever
  /// propagation comes to rest.
  fn invariants_hold(&self) -> bool {
    let solved = CellSet(self.solved_cells);
    for cell in Cell::all() {
      let digits = self.candidates_at(cell);
      if digits.is_empty() {
        return false;
      }
      if solved.contains(cell) {
        if digits.len() != 1 {
          return false;
        }
      }
    }
    true
  }
}

impl Default for State {
  fn default() -> Self {
    Self::new()
  }
}
