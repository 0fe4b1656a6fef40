//! Defines the core Sudoku types.
//!
//! Among these are:
//!
//! - Board: the 9x9 Sudoku grid
//! - Digit: the 9 digits that go in the grid's cells
//! - Cell: the 81 cells of the grid
//! - Row, Col and Blk: the units that must each hold every digit once

pub mod bits;
mod board;
mod cell;
mod digit;
mod id_types;
pub mod set;
mod units;

pub use board::*;
pub use cell::*;
pub use digit::*;
pub use set::Set;
pub use units::*;

/// Marker error for Sudoku boards that admit no solution.
#[derive(Debug)]
pub struct Invalid;
