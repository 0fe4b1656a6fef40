//! Defines the Cell type, which identifies the cells (or squares or
//! locations) of a Sudoku grid, and the Band type for the grid's three
//! horizontal bands.

use super::bits::*;
use super::set::Set;
use super::units::*;
use crate::define_id_types;
use crate::define_set_operators;
use paste::paste;
use seq_macro::seq;
use serde::Serialize;
use std::fmt;

define_id_types! {
    /// Identifies one of the 81 cells in a Sudoku grid.
    ///
    /// Sudokus are represented as length-81 arrays in row-major order.
    /// `Cell(0)` is the top left square of the grid, and `Cell(80)` is the
    /// bottom right.
    Cell: i8[81];

    /// Identifies one of the three horizontal bands of a Sudoku grid, each of
    /// which holds three full rows (27 cells) and fits in a 27-bit word.
    #[derive(Debug)]
    Band: i8[3];
}

// Constant Cell values, C11 through C99.
seq!(R in 1..=9 {
    seq!(K in 1..=9 {
        paste! {
            #[allow(clippy::identity_op, clippy::erasing_op, clippy::eq_op)]
            pub const [<C R K>]: Cell = Cell((R - 1) * 9 + (K - 1));
        }
    });
});

impl Cell {
  /// Converts from row/col to Cell.
  pub const fn at(row: Row, col: Col) -> Cell {
    Cell(row.get() * 9 + col.get())
  }

  /// This cell's row.
  pub const fn row(self) -> Row {
    // Safe because Cells are in 0..81.
    unsafe { Row::new_unchecked(self.0 / 9) }
  }

  /// This cell's column.
  pub const fn col(self) -> Col {
    // Safe because Cells are in 0..81.
    unsafe { Col::new_unchecked(self.0 % 9) }
  }

  /// This cell's block.
  pub const fn blk(self) -> Blk {
    Blk::from_bands(self.band(), self.col_band())
  }

  /// This cell's horizontal band.
  pub const fn band(self) -> Band {
    Band(self.0 / 27)
  }

  /// This cell's bit position within its band word.
  pub const fn band_bit(self) -> i32 {
    (self.0 % 27) as i32
  }

  /// The vertical band (stack of blocks) this cell's column inhabits.
  const fn col_band(self) -> Band {
    Band(self.0 / 3 % 3)
  }

  /// This cell's row within its band.
  const fn band_row(self) -> i8 {
    self.0 / 9 % 3
  }

  /// This cell's peer cells, meaning the cells that share this cell's row,
  /// column, or block.
  pub fn peers(self) -> CellSet {
    // Safe because Cells' IDs are in 0..81.
    unsafe { *PEERS.get_unchecked(self.0 as usize) }
  }

  /// Calculates this cell's peer set.
  pub const fn calc_peers(self) -> CellSet {
    let same_band = self.calc_band_peers();
    let diff_band = Bits27::from_backing_int(0o_001_001_001 << self.col().get());
    let bits = match self.band().get() {
      0 => BandBoard::new([same_band, diff_band, diff_band]),
      1 => BandBoard::new([diff_band, same_band, diff_band]),
      _ => BandBoard::new([diff_band, diff_band, same_band]),
    };
    CellSet(bits)
  }

  /// Calculates this cell's peer bits within its own band.
  const fn calc_band_peers(self) -> Bits27 {
    let same_row = Bits9::from_backing_int(0o_777 ^ (1 << self.col().get()));
    let diff_row = Bits9::from_backing_int(7 << (3 * self.col_band().get()));
    match self.band_row() {
      0 => Bits27::from_bits9s(same_row, diff_row, diff_row),
      1 => Bits27::from_bits9s(diff_row, same_row, diff_row),
      _ => Bits27::from_bits9s(diff_row, diff_row, same_row),
    }
  }

  /// Returns a singleton set containing just this cell.
  pub fn as_set(self) -> CellSet {
    CellSet::singleton(self)
  }
}

impl fmt::Display for Cell {
  /// Prints this cell as (r, c), where r and c are the one-based numbers of
  /// the cell's row and column.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.row().get() + 1, self.col().get() + 1)
  }
}

impl fmt::Debug for Cell {
  /// Prints this cell as Crc, where r and c are the one-based numbers of
  /// the cell's row and column.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "C{}{}", self.row().get() + 1, self.col().get() + 1)
  }
}

/// A set of `Cell`s, backed by one band word per band.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct CellSet(pub BandBoard);

impl CellSet {
  /// Makes a new empty CellSet.
  pub const fn new() -> Self {
    CellSet(BandBoard::ZERO)
  }

  /// Makes a new single-valued CellSet.
  pub fn singleton(cell: Cell) -> Self {
    CellSet(BandBoard::singleton(cell.index() as i32))
  }

  /// Makes a new CellSet containing all cells.
  pub const fn all() -> Self {
    CellSet(BandBoard::ONES)
  }

  /// Returns the bits that represent the given band in this set.
  pub fn band_bits(&self, band: Band) -> Bits27 {
    self.0.band(band.index())
  }

  /// Returns a pointer to the bits that represent the given band in this
  /// set.
  pub fn band_bits_mut(&mut self, band: Band) -> &mut Bits27 {
    self.0.band_mut(band.index())
  }
}

impl Set for CellSet {
  type Item = Cell;
  type Bits = BandBoard;

  fn bits(&self) -> &Self::Bits {
    &self.0
  }

  fn mut_bits(&mut self) -> &mut Self::Bits {
    &mut self.0
  }

  fn to_bits_value(&self, item: Self::Item) -> i32 {
    item.index() as i32
  }

  fn from_bits_value(&self, value: i32) -> Self::Item {
    // Safe because BandBoard only returns values in 0..81.
    unsafe { Cell::new_unchecked(value as i8) }
  }
}
define_set_operators!(CellSet);

impl fmt::Debug for CellSet {
  /// Prints this set as a list of cells.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "CellSet(")?;
    let mut prev = false;
    for cell in self.iter() {
      if prev {
        write!(f, ", ")?;
      }
      write!(f, "{:?}", cell)?;
      prev = true;
    }
    write!(f, ")")
  }
}

/// Translates a bare int ID into a Cell, then calculates its peers.
const fn calc_peers(id: i8) -> CellSet {
  unsafe {
    // Safe because this is only called with IDs in 0..81.
    Cell::new_unchecked(id).calc_peers()
  }
}

seq!(C in 0..81 {
    /// Memoizes all cells' peer cells.
    static PEERS: [CellSet; 81] = [
        #(
            calc_peers(C),
        )*
    ];
});

#[cfg(test)]
mod tests {
  use super::*;

  fn check_eq(set: CellSet, cells: &[Cell]) {
    let contents: Vec<_> = set.iter().collect();
    assert_eq!(contents[..], *cells);
  }

  #[test]
  fn basics() {
    assert_eq!(81, CellSet::all().len());
    let mut set = CellSet::new();
    assert!(set.insert(C11));
    assert!(set.insert(C12));
    assert!(set.insert(C13));
    check_eq(set, &[C11, C12, C13]);

    assert!(!set.remove(C21));
    assert!(set.remove(C12));
    check_eq(set, &[C11, C13]);
  }

  #[test]
  fn ops() {
    let mut set1 = C99.as_set();
    let mut set2 = C13.as_set();
    let mut set3 = set1 | set2;
    check_eq(set3, &[C13, C99]);
    assert_eq!(Some(C13), set3.smallest_item());
    assert_eq!(set1, set3 ^ set2);

    set1 |= C18.as_set();
    set2 ^= C19.as_set();
    check_eq(set1 & set2, &[]);
    set3 -= set2;
    check_eq(set3, &[C99]);
  }

  #[test]
  fn peers() {
    let mut count_cells = 0;
    for cell in Cell::all() {
      count_cells += 1;
      assert_eq!(20, cell.peers().len());
      let mut count_same_row = 0;
      let mut count_same_col = 0;
      let mut count_same_blk = 0;
      for peer in cell.peers().iter() {
        assert_ne!(cell, peer);
        // Ensure the unsafe code generates legit cells.
        assert_eq!(Cell::new(peer.get()), Some(peer));
        let same_row = cell.row() == peer.row();
        let same_col = cell.col() == peer.col();
        let same_blk = cell.blk() == peer.blk();
        assert!(same_row || same_col || same_blk);
        assert!(!(same_row && same_col && same_blk));
        if same_row {
          count_same_row += 1;
        }
        if same_col {
          count_same_col += 1;
        }
        if same_blk {
          count_same_blk += 1;
        }
      }
      assert_eq!(8, count_same_row);
      assert_eq!(8, count_same_col);
      assert_eq!(8, count_same_blk);
    }
    assert_eq!(81, count_cells);
  }
}
