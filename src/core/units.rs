//! Defines types for the Sudoku "units": the rows, columns, and blocks that
//! must each contain every digit exactly once in a solution.

use super::bits::*;
use super::cell::*;
use crate::define_id_types;
use serde::Serialize;
use std::fmt;

define_id_types! {
    /// Identifies one of the 9 rows in a Sudoku grid.
    ///
    /// Rows are numbered top to bottom.
    Row: i8[9];

    /// Identifies one of the 9 columns in a Sudoku grid.
    ///
    /// Columns are numbered left to right.
    Col: i8[9];

    /// Identifies one of the 9 3x3 blocks in a Sudoku grid.
    ///
    /// Blocks are numbered in row-major order.
    Blk: i8[9];
}

impl Row {
  /// Tells which band this row inhabits.
  pub const fn band(self) -> Band {
    // Safe because Rows are in 0..9.
    unsafe { Band::new_unchecked(self.0 / 3) }
  }

  /// Tells which row this is within its band, 0 through 2.
  pub const fn band_row(self) -> i8 {
    self.0 % 3
  }

  /// The cells that make up this row.
  pub fn cells(self) -> CellSet {
    let mut set = CellSet::new();
    *set.band_bits_mut(self.band()) =
      Bits27::from_backing_int(0o_777 << (9 * self.band_row()));
    set
  }
}

impl Col {
  /// The cells that make up this column.
  pub fn cells(self) -> CellSet {
    let band_bits = Bits27::from_backing_int(0o_001_001_001 << self.get());
    CellSet(BandBoard::new([band_bits; 3]))
  }
}

impl Blk {
  /// Locates a block by its horizontal and vertical bands.
  pub const fn from_bands(band: Band, col_band: Band) -> Self {
    Self(band.get() * 3 + col_band.get())
  }

  /// Tells which horizontal band this block inhabits.
  pub const fn band(self) -> Band {
    // Safe because Blks are in 0..9.
    unsafe { Band::new_unchecked(self.0 / 3) }
  }

  /// Tells which vertical band this block inhabits.
  pub const fn col_band(self) -> Band {
    // Safe because Blks are in 0..9.
    unsafe { Band::new_unchecked(self.0 % 3) }
  }

  /// The cells that make up this block.
  pub fn cells(self) -> CellSet {
    let mut set = CellSet::new();
    *set.band_bits_mut(self.band()) =
      Bits27::from_backing_int(0o_007_007_007 << (3 * self.col_band().get()));
    set
  }
}

/// Iterates the cell sets of all 27 units: rows, then columns, then blocks.
pub fn all_unit_cells() -> impl Iterator<Item = CellSet> {
  Row::all()
    .map(Row::cells)
    .chain(Col::all().map(Col::cells))
    .chain(Blk::all().map(Blk::cells))
}

impl fmt::Display for Row {
  /// Prints this row as Rn, where n is the one-based number of the row.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "R{}", self.0 + 1)
  }
}

impl fmt::Display for Col {
  /// Prints this column as Cn, where n is the one-based number of the column.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "C{}", self.0 + 1)
  }
}

impl fmt::Display for Blk {
  /// Prints this block as Bn, where n is the one-based number of the block.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "B{}", self.0 + 1)
  }
}

#[cfg(test)]
mod tests {
  use super::super::set::Set;
  use super::*;

  #[test]
  fn unit_cells() {
    for cell in Cell::all() {
      assert!(cell.row().cells().contains(cell));
      assert!(cell.col().cells().contains(cell));
      assert!(cell.blk().cells().contains(cell));
      assert_eq!(cell.as_set(), cell.row().cells() & cell.col().cells());
      assert_eq!(
        cell.peers(),
        (cell.row().cells() | cell.col().cells() | cell.blk().cells()) - cell.as_set()
      );
    }
    let mut count = 0;
    for cells in all_unit_cells() {
      assert_eq!(9, cells.len());
      count += 1;
    }
    assert_eq!(27, count);
  }
}
