//! Static lookup tables for the solver.
//!
//! Each table maps the 9-bit pattern of one digit within one band (either
//! triad occupancy or column occupancy) to a precomputed consequence: a mask
//! that applies locked-candidate eliminations, or a mask that flags newly
//! forced cells.  All of them are generated at compile time from pure
//! `const fn`s, so regenerating and embedding are the same thing.

use crate::core::bits::*;
use crate::core::*;
use seq_macro::seq;

/// Converts 3 bits into a single bit: either zero or the given non-zero bit.
const fn or_triad(bits: Bits3, nonzero_bit: u8) -> u8 {
  if bits.backing_int() == 0 {
    0
  } else {
    nonzero_bit
  }
}

/// The actual logic behind `or_triads`.
#[rustfmt::skip]
const fn or_triads_impl(bits: Bits9) -> Bits3 {
    let [bits0, bits1, bits2] = bits.to_bits3s();
    Bits3::from_backing_int(
        or_triad(bits0, 1 << 0) |
        or_triad(bits1, 1 << 1) |
        or_triad(bits2, 1 << 2),
    )
}

seq!(B in 0..512 {
    /// A lookup table that memoizes all possible values of `or_triads`.
    static OR_TRIADS: [Bits3; 512] = [
        #(
            or_triads_impl(Bits9::from_backing_int(B)),
        )*
    ];
});

/// Folds each triple of bits into one bit: which of the three triads of a
/// 9-bit group are occupied.
pub fn or_triads(bits: Bits9) -> Bits3 {
  // Safe because Bits9s are guaranteed to be in 0..512.
  unsafe { *OR_TRIADS.get_unchecked(bits.backing_int() as usize) }
}

/// Packs a band's triad occupancy into 9 bits: bit `3r + t` is set when
/// triad `t` of the band's row `r` still holds the digit.
pub fn band_triads(band: Bits27) -> Bits9 {
  let [r0, r1, r2] = band.to_bits9s();
  Bits9::from_bits3s(or_triads(r0), or_triads(r1), or_triads(r2))
}

/// ORs a band's three rows together into 9 bits of column occupancy.
pub fn band_cols(band: Bits27) -> Bits9 {
  let bits = band.backing_int();
  Bits9::from_backing_int((bits | (bits >> 9) | (bits >> 18)) as u16)
}

/// Maps the 9-bit mask of pinned triads (triads whose row and column are
/// both forced) to the 3-bit mask of band rows that now hold a hidden
/// single.  The same fold as `or_triads`, keyed by triads instead of cells.
pub fn hidden_single_rows(pinned: Bits9) -> Bits3 {
  or_triads(pinned)
}

/// Returns a mask that zeroes the rest of the band row when the given row's
/// digit is confined to a single triad.
const fn row_keep_mask(triads: Bits9, row: u16) -> u32 {
  let row_bits = (0b111 << (3 * row)) & triads.backing_int();
  match row_bits.count_ones() {
    0 => 0,
    1 => match row_bits >> (3 * row) {
      0b001 => 0o_770_770_770 | (0o_007 << (9 * row)),
      0b010 => 0o_707_707_707 | (0o_070 << (9 * row)),
      0b100 => 0o_077_077_077 | (0o_700 << (9 * row)),
      _ => panic!("unreachable"),
    },
    _ => 0o_777_777_777,
  }
}

/// Returns a mask that zeroes the rest of the box when the given box's digit
/// is confined to a single row of the band.
const fn box_keep_mask(triads: Bits9, bx: u16) -> u32 {
  let box_bits = (0o_111 << bx) & triads.backing_int();
  match box_bits.count_ones() {
    0 => 0,
    1 => match box_bits >> bx {
      0o_001 => 0o_777_777_000 | (0o_000_000_007 << (3 * bx)),
      0o_010 => 0o_777_000_777 | (0o_000_007_000 << (3 * bx)),
      0o_100 => 0o_000_777_777 | (0o_007_000_000 << (3 * bx)),
      _ => panic!("unreachable"),
    },
    _ => 0o_777_777_777,
  }
}

/// Transforms the given bit mask to zero when a full unit is zero within it.
const fn zero_if_unit_empty(bits: u32, unit_mask: u32) -> u32 {
  if bits & unit_mask == 0 {
    0
  } else {
    bits
  }
}

/// Calculates the in-band locked-candidate mask: which cells of a band
/// survive pointing and claiming, given the band's triad occupancy.  The
/// mask is all zero when some row or box of the band has lost the digit
/// entirely.
#[rustfmt::skip]
const fn keep_locked_impl(triads: Bits9) -> Bits27 {
    let bits =
        row_keep_mask(triads, 0) &
        row_keep_mask(triads, 1) &
        row_keep_mask(triads, 2) &
        box_keep_mask(triads, 0) &
        box_keep_mask(triads, 1) &
        box_keep_mask(triads, 2);
    let bits =
        zero_if_unit_empty(bits, 0o_000_000_777) &
        zero_if_unit_empty(bits, 0o_000_777_000) &
        zero_if_unit_empty(bits, 0o_777_000_000) &
        zero_if_unit_empty(bits, 0o_007_007_007) &
        zero_if_unit_empty(bits, 0o_070_070_070) &
        zero_if_unit_empty(bits, 0o_700_700_700);
    Bits27::from_backing_int(bits)
}

seq!(B in 0..512 {
    /// Memoizes `keep_locked_impl` for all triad masks.
    static KEEP_LOCKED_CANDIDATES: [Bits27; 512] = [
        #(
            keep_locked_impl(Bits9::from_backing_int(B)),
        )*
    ];
});

/// Looks up the in-band locked-candidate elimination mask for a band's triad
/// occupancy.
pub fn keep_locked_candidates(triads: Bits9) -> Bits27 {
  // Safe because Bits9s are guaranteed to be in 0..512.
  unsafe { *KEEP_LOCKED_CANDIDATES.get_unchecked(triads.backing_int() as usize) }
}

/// The forced-triad bit for one row: the row's triad bits, when the row has
/// exactly one triad left.
const fn forced_triad_in_row(triads: Bits9, row: u16) -> u16 {
  let row_bits = (0b111 << (3 * row)) & triads.backing_int();
  if row_bits.count_ones() == 1 {
    row_bits
  } else {
    0
  }
}

/// Calculates which triads each row of a band is confined to, after the
/// in-band locked-candidate eliminations have been applied.
const fn triad_row_singles_impl(triads: Bits9) -> Bits9 {
  let kept = keep_locked_impl(triads);
  let [r0, r1, r2] = kept.to_bits9s();
  let kept_triads = Bits9::from_bits3s(or_triads_impl(r0), or_triads_impl(r1), or_triads_impl(r2));
  let triads = Bits9::from_backing_int(kept_triads.backing_int() & triads.backing_int());
  Bits9::from_backing_int(
    forced_triad_in_row(triads, 0) | forced_triad_in_row(triads, 1) | forced_triad_in_row(triads, 2),
  )
}

seq!(B in 0..512 {
    /// Memoizes `triad_row_singles_impl` for all triad masks.
    static TRIAD_ROW_SINGLES: [Bits9; 512] = [
        #(
            triad_row_singles_impl(Bits9::from_backing_int(B)),
        )*
    ];
});

/// Looks up which triads are the sole survivor of their row, given a band's
/// triad occupancy.
pub fn triad_row_singles(triads: Bits9) -> Bits9 {
  // Safe because Bits9s are guaranteed to be in 0..512.
  unsafe { *TRIAD_ROW_SINGLES.get_unchecked(triads.backing_int() as usize) }
}

/// Returns a mask that zeroes a column in the peer bands when the given box
/// has a single possible column in this band.
const fn col_keep_mask(cols: Bits9, bx: u16) -> u32 {
  let box_bits = (0b111 << (3 * bx)) & cols.backing_int();
  match box_bits.count_ones() {
    0 => 0,
    1 => match box_bits >> (3 * bx) {
      0b001 => 0o_777_777_777 ^ (0o_001_001_001 << (3 * bx)),
      0b010 => 0o_777_777_777 ^ (0o_002_002_002 << (3 * bx)),
      0b100 => 0o_777_777_777 ^ (0o_004_004_004 << (3 * bx)),
      _ => panic!("unreachable"),
    },
    _ => 0o_777_777_777,
  }
}

/// Calculates the peer-band elimination mask for a band's column occupancy:
/// columns that this band has locked get cleared from the other two bands.
#[rustfmt::skip]
const fn col_locked_impl(cols: Bits9) -> Bits27 {
    let bits =
        col_keep_mask(cols, 0) &
        col_keep_mask(cols, 1) &
        col_keep_mask(cols, 2);
    let bits =
        zero_if_unit_empty(bits, 0o_007_007_007) &
        zero_if_unit_empty(bits, 0o_070_070_070) &
        zero_if_unit_empty(bits, 0o_700_700_700);
    Bits27::from_backing_int(bits)
}

seq!(B in 0..512 {
    /// Memoizes `col_locked_impl` for all column masks.
    static COL_LOCKED_ELIMINATIONS: [Bits27; 512] = [
        #(
            col_locked_impl(Bits9::from_backing_int(B)),
        )*
    ];
});

/// Looks up the peer-band elimination mask for a band's column occupancy.
pub fn col_locked_eliminations(cols: Bits9) -> Bits27 {
  // Safe because Bits9s are guaranteed to be in 0..512.
  unsafe { *COL_LOCKED_ELIMINATIONS.get_unchecked(cols.backing_int() as usize) }
}

const fn has_empty_box(cols: Bits9) -> bool {
  let bits = cols.backing_int();
  bits & 0o_007 == 0 || bits & 0o_070 == 0 || bits & 0o_700 == 0
}

/// The per-box single-column bit: set when the box's digit has exactly one
/// column left in this band.
const fn single_col_box_bit(cols: Bits9, bx: u16) -> u8 {
  let box_bits = (0b111 << (3 * bx)) & cols.backing_int();
  if box_bits.count_ones() == 1 {
    1 << bx
  } else {
    0
  }
}

/// Calculates which boxes of a band are confined to a single column, as a
/// triad mask replicated across the band's three rows.
const fn col_singles_impl(cols: Bits9) -> Bits9 {
  if has_empty_box(cols) {
    return Bits9::ZERO;
  }
  let boxes = Bits3::from_backing_int(
    single_col_box_bit(cols, 0) | single_col_box_bit(cols, 1) | single_col_box_bit(cols, 2),
  );
  Bits9::from_bits3s(boxes, boxes, boxes)
}

seq!(B in 0..512 {
    /// Memoizes `col_singles_impl` for all column masks.
    static COL_SINGLES: [Bits9; 512] = [
        #(
            col_singles_impl(Bits9::from_backing_int(B)),
        )*
    ];
});

/// Looks up which boxes have a forced column, given a band's column
/// occupancy.
pub fn col_singles(cols: Bits9) -> Bits9 {
  // Safe because Bits9s are guaranteed to be in 0..512.
  unsafe { *COL_SINGLES.get_unchecked(cols.backing_int() as usize) }
}

const fn row_fill_impl(rows: u32) -> Bits27 {
  Bits27::from_backing_int(
    0o_777 * (rows & 1) + 0o_777_000 * ((rows & 2) >> 1) + 0o_777_000_000 * ((rows & 4) >> 2),
  )
}

seq!(B in 0..8 {
    /// Expands a 3-bit row mask into the full 27-bit band rows.
    static ROW_FILL: [Bits27; 8] = [
        #(
            row_fill_impl(B),
        )*
    ];
});

/// Expands a 3-bit band-row mask into a 27-bit mask covering those whole
/// rows.
pub fn row_fill(rows: Bits3) -> Bits27 {
  // Safe because Bits3s are guaranteed to be in 0..8.
  unsafe { *ROW_FILL.get_unchecked(rows.backing_int() as usize) }
}

/// Calculates the inverse of the given cell's peer set, for removing all
/// peers with an `&` operation.
const fn clear_peers_impl(cell_id: i8) -> CellSet {
  // Safe because this is only called with IDs in 0..81.
  let cell = unsafe { Cell::new_unchecked(cell_id) };
  CellSet(cell.calc_peers().0.const_not())
}

seq!(C in 0..81 {
    /// Memoizes `clear_peers_impl` for all cells.
    static CLEAR_PEERS: [CellSet; 81] = [
        #(
            clear_peers_impl(C),
        )*
    ];
});

/// Given a cell, returns the set of cells that is the complement of the
/// cell's peers.
pub fn clear_peers(cell: Cell) -> CellSet {
  // Safe because Cells are guaranteed to be in 0..81.
  unsafe { *CLEAR_PEERS.get_unchecked(cell.index()) }
}

/// The band word that assigns a digit to a cell within its own band: it
/// keeps the cell and clears the cell's 14 in-band peers.
pub fn band_assign_mask(cell: Cell) -> Bits27 {
  clear_peers(cell).band_bits(cell.band())
}
