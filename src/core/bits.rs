//! Types for working with bitmasks treated as sets.

use seq_macro::seq;
use static_assertions::const_assert;
use std::{
  fmt::Debug,
  ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not},
};

/// Operations on a fixed-capacity collection of bits.
///
/// You can see a `Bits` object as a set of bits, or as a set of values
/// (integers) in the range 0..CAPACITY.
pub trait Bits
where
  Self: BitAnd<Output = Self>
    + BitAndAssign
    + BitOr<Output = Self>
    + BitOrAssign
    + BitXor<Output = Self>
    + BitXorAssign
    + Copy
    + Eq
    + Not<Output = Self>
    + Sized,
{
  /// The number of bit positions in the collection, each of which will be
  /// present (a `1` bit) or absent (a `0` bit).
  const CAPACITY: i32;

  /// The instance of the Bits object with no `1` bits.  The empty set.
  const ZERO: Self;

  /// The instance of the Bits object with all possible `1` bits (CAPACITY of
  /// them).  The universal set.
  const ONES: Self;

  /// Returns a Bits instance consisting of the single `1` bit that
  /// corresponds to the given value.
  ///
  /// ## Panics
  ///
  /// Panics if the value is not representable in the set, meaning it's
  /// negative or greater than or equal to the set's capacity.
  fn singleton(value: i32) -> Self;

  /// The number of `1` bits in this collection.
  fn len(self) -> i32;

  /// Whether this is the empty set, meaning no `1` bits.
  fn is_empty(self) -> bool {
    self == Self::ZERO
  }

  /// Tells whether the given value's corresponding bit is `1`.
  fn contains(self, value: i32) -> bool {
    Self::is_valid_value(value) && !(self & Self::singleton(value)).is_empty()
  }

  /// The single `1` bit corresponding to the smallest value, or None if there
  /// are no `1` bits.
  fn smallest_bit(self) -> Option<Self>;

  /// The smallest value in the collection whose bit is `1`, or None if there
  /// are no `1` bits.
  fn smallest_value(self) -> Option<i32>;

  /// Tells whether the given value is representable in the set, meaning it's
  /// in the range 0..Self::CAPACITY.
  fn is_valid_value(n: i32) -> bool {
    n >= 0 && n < Self::CAPACITY
  }

  /// Ensures the given number is representable in the set.
  ///
  /// ## Panics
  ///
  /// Panics if the value is not representable in the set, meaning it's
  /// negative or greater than or equal to the set's capacity.
  fn check(n: i32) {
    assert!(
      Self::is_valid_value(n),
      "{} is out of bounds, must be in 0..{}",
      n,
      Self::CAPACITY
    );
  }

  /// Adds a value to the set.  Tells whether the (bit corresponding to the)
  /// value was previously absent from the set.
  ///
  /// ## Panics
  ///
  /// Panics if the value is not representable in the set, meaning it's
  /// negative or greater than or equal to the set's capacity.
  fn insert(&mut self, value: i32) -> bool;

  /// Removes a value from the set.  Tells whether the (bit corresponding to
  /// the) value was present in the set.
  ///
  /// ## Panics
  ///
  /// Panics if the value is not representable in the set, meaning it's
  /// negative or greater than or equal to the set's capacity.
  fn remove(&mut self, value: i32) -> bool;

  /// Iterates the values in this set, smallest first.
  fn values(self) -> BitValues<Self> {
    BitValues(self)
  }
}

/// Iterates through the values (integers) of a `Bits` instance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BitValues<T: Bits>(T);

impl<T: Bits> Iterator for BitValues<T> {
  type Item = i32;
  fn next(&mut self) -> Option<i32> {
    let bit = self.0.smallest_bit()?;
    self.0 ^= bit;
    bit.smallest_value()
  }
}

/// Implements the Bits trait for a built-in integer type.
macro_rules! impl_int_bits {
  ($int:ty) => {
    const_assert!(<$int>::MIN == 0); // True only for unsigned int types
    impl Bits for $int {
      const CAPACITY: i32 = <$int>::BITS as i32;
      const ZERO: $int = 0;
      const ONES: $int = <$int>::MAX; // Note, only works for unsigned int types
      fn singleton(value: i32) -> $int {
        Self::check(value);
        1 << value
      }
      fn len(self) -> i32 {
        self.count_ones() as i32
      }
      fn smallest_bit(self) -> Option<$int> {
        if self == 0 {
          None
        } else {
          Some(self & !(self - 1))
        }
      }
      fn smallest_value(self) -> Option<i32> {
        self.smallest_bit().map(|bit| bit.trailing_zeros() as i32)
      }
      fn insert(&mut self, value: i32) -> bool {
        let bit = Self::singleton(value);
        if (bit & *self) == 0 {
          *self |= bit;
          true
        } else {
          false
        }
      }
      fn remove(&mut self, value: i32) -> bool {
        let bit = Self::singleton(value);
        if (bit & *self) == 0 {
          false
        } else {
          *self &= !bit;
          true
        }
      }
    }
  };
}

impl_int_bits!(u8);
impl_int_bits!(u16);
impl_int_bits!(u32);

/// Defines Bits-implementing newtypes for Bits-implementing int types.
/// The purpose is to have a smaller capacity than the int type.
macro_rules! define_narrow_bits_types {
    (
        $(
        $(#[$outer:meta])*
        $type_name:ident : $int:ty[$capacity:expr];
        )*
    ) => {
        $(
        #[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
        $(#[$outer])*
        pub struct $type_name($int);

        // The enclosed type must be strictly bigger than the new type.
        const_assert!(<$int>::CAPACITY > $capacity);

        // These newtypes let you manipulate the wrapped int.
        impl $type_name {
            /// Reads the wrapped int bitmask.
            pub const fn backing_int(self) -> $int {
                self.0
            }

            /// Makes a new instance from the underlying int type.
            pub const fn from_backing_int(int: $int) -> Self {
                Self(int & Self::ONES.0)
            }

            /// Const form of `&`.
            pub const fn const_bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }

            /// Const form of `|`.
            pub const fn const_bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }

            /// Const form of `^`.
            pub const fn const_bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }

            /// Const form of `!`.
            pub const fn const_not(self) -> Self {
                self.const_bitxor(Self::ONES)
            }
        }

        impl Bits for $type_name {
            const CAPACITY: i32 = $capacity;
            const ZERO: Self = Self(<$int>::ZERO);
            const ONES: Self = Self((1 << $capacity) - 1);
            fn singleton(value: i32) -> Self {
                Self::check(value);
                Self(<$int>::singleton(value))
            }
            fn len(self) -> i32 {
                self.0.len()
            }
            fn smallest_bit(self) -> Option<Self> {
                self.0.smallest_bit().map(Self)
            }
            fn smallest_value(self) -> Option<i32> {
                self.0.smallest_value()
            }
            fn insert(&mut self, value: i32) -> bool {
                Self::check(value);
                self.0.insert(value)
            }
            fn remove(&mut self, value: i32) -> bool {
                Self::check(value);
                self.0.remove(value)
            }
        }

        impl BitAnd for $type_name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                self.const_bitand(rhs)
            }
        }
        impl BitAndAssign for $type_name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0
            }
        }
        impl BitOr for $type_name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.const_bitor(rhs)
            }
        }
        impl BitOrAssign for $type_name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0
            }
        }
        impl BitXor for $type_name {
            type Output = Self;
            fn bitxor(self, rhs: Self) -> Self {
                self.const_bitxor(rhs)
            }
        }
        impl BitXorAssign for $type_name {
            fn bitxor_assign(&mut self, rhs: Self) {
                self.0 ^= rhs.0
            }
        }
        impl Not for $type_name {
            type Output = Self;
            fn not(self) -> Self {
                self.const_not()
            }
        }
        impl Debug for $type_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
              write!(f, "{}({:#o})", stringify!($type_name), self.0)  // octal
            }
        }
        )*
    };
}

define_narrow_bits_types! {
    /// A 3-bit set, used for triad and row intermediates.
    Bits3: u8[3];

    /// A 9-bit set for the many universes of 9 elements in the world of
    /// Sudoku.
    Bits9: u16[9];

    /// A 27-bit set holding one horizontal band: three rows of nine cells.
    Bits27: u32[27];
}

impl Bits9 {
  /// Converts a Bits9 into 3 Bits3 values.
  pub const fn to_bits3s(self) -> [Bits3; 3] {
    [
      Bits3::from_backing_int(self.0 as u8),
      Bits3::from_backing_int((self.0 >> 3) as u8),
      Bits3::from_backing_int((self.0 >> 6) as u8),
    ]
  }

  /// Converts 3 Bits3 values into a Bits9.
  pub const fn from_bits3s(b0: Bits3, b1: Bits3, b2: Bits3) -> Self {
    Self::from_backing_int(
      b0.backing_int() as u16 | ((b1.backing_int() as u16) << 3) | ((b2.backing_int() as u16) << 6),
    )
  }
}

impl Bits27 {
  /// Converts a Bits27 into 3 Bits9 values, one per row.
  pub const fn to_bits9s(self) -> [Bits9; 3] {
    [
      Bits9::from_backing_int(self.0 as u16),
      Bits9::from_backing_int((self.0 >> 9) as u16),
      Bits9::from_backing_int((self.0 >> 18) as u16),
    ]
  }

  /// Converts 3 Bits9 values into a Bits27.
  pub const fn from_bits9s(b0: Bits9, b1: Bits9, b2: Bits9) -> Self {
    Self::from_backing_int(
      b0.backing_int() as u32
        | ((b1.backing_int() as u32) << 9)
        | ((b2.backing_int() as u32) << 18),
    )
  }
}

/// An 81-bit set covering a full Sudoku grid: one 27-bit lane per horizontal
/// band, plus a fourth lane that is kept zero so the whole object is a single
/// aligned 128-bit quantity.
///
/// Every operation preserves the two invariants that the high 5 bits of each
/// lane and the entire fourth lane are zero, which is what lets the lane-wise
/// loops below compile down to plain 128-bit vector ops.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[repr(C, align(16))]
pub struct BandBoard([Bits27; 4]);

const_assert!(std::mem::size_of::<BandBoard>() == 16);
const_assert!(std::mem::align_of::<BandBoard>() == 16);

impl BandBoard {
  /// The number of live lanes.
  pub const BANDS: usize = 3;

  /// Makes a BandBoard from its three band words.
  pub const fn new(bands: [Bits27; 3]) -> Self {
    Self([bands[0], bands[1], bands[2], Bits27::ZERO])
  }

  /// Reads the band word at the given lane.
  ///
  /// ## Panics
  ///
  /// Panics if the lane is 3 or more.
  pub const fn band(self, band: usize) -> Bits27 {
    assert!(band < Self::BANDS);
    self.0[band]
  }

  /// Returns a pointer to the band word at the given lane.
  ///
  /// ## Panics
  ///
  /// Panics if the lane is 3 or more.
  pub fn band_mut(&mut self, band: usize) -> &mut Bits27 {
    assert!(band < Self::BANDS);
    // Safe because we've just checked the lane.
    unsafe { self.0.get_unchecked_mut(band) }
  }

  /// Const form of `!`.  The fourth lane stays zero.
  pub const fn const_not(self) -> Self {
    seq!(I in 0..4 {
        return Self([#(self.0[I].const_bitxor(Self::ONES.0[I]),)*]);
    });
  }
}

impl Bits for BandBoard {
  const CAPACITY: i32 = 81;
  const ZERO: Self = Self([Bits27::ZERO; 4]);
  const ONES: Self = Self([Bits27::ONES, Bits27::ONES, Bits27::ONES, Bits27::ZERO]);

  fn singleton(value: i32) -> Self {
    Self::check(value);
    let mut answer = Self::ZERO;
    // Safe because we've just checked the value.
    unsafe {
      *answer.0.get_unchecked_mut((value / 27) as usize) = Bits27::singleton(value % 27);
    }
    answer
  }

  fn len(self) -> i32 {
    // The fourth lane is always zero, so summing it is free.
    self.0.iter().map(|b| b.len()).sum()
  }

  fn smallest_bit(self) -> Option<Self> {
    for band in 0..Self::BANDS {
      if !self.0[band].is_empty() {
        let mut answer = Self::ZERO;
        answer.0[band] = self.0[band].smallest_bit().unwrap();
        return Some(answer);
      }
    }
    None
  }

  fn smallest_value(self) -> Option<i32> {
    for band in 0..Self::BANDS {
      if let Some(value) = self.0[band].smallest_value() {
        return Some(27 * band as i32 + value);
      }
    }
    None
  }

  fn insert(&mut self, value: i32) -> bool {
    Self::check(value);
    // Safe because we've just checked the value.
    unsafe { self.0.get_unchecked_mut((value / 27) as usize) }.insert(value % 27)
  }

  fn remove(&mut self, value: i32) -> bool {
    Self::check(value);
    // Safe because we've just checked the value.
    unsafe { self.0.get_unchecked_mut((value / 27) as usize) }.remove(value % 27)
  }
}

impl BitAnd for BandBoard {
  type Output = Self;
  fn bitand(mut self, rhs: Self) -> Self {
    self &= rhs;
    self
  }
}
impl BitAndAssign for BandBoard {
  fn bitand_assign(&mut self, rhs: Self) {
    for i in 0..4 {
      self.0[i] &= rhs.0[i];
    }
  }
}
impl BitOr for BandBoard {
  type Output = Self;
  fn bitor(mut self, rhs: Self) -> Self {
    self |= rhs;
    self
  }
}
impl BitOrAssign for BandBoard {
  fn bitor_assign(&mut self, rhs: Self) {
    for i in 0..4 {
      self.0[i] |= rhs.0[i];
    }
  }
}
impl BitXor for BandBoard {
  type Output = Self;
  fn bitxor(mut self, rhs: Self) -> Self {
    self ^= rhs;
    self
  }
}
impl BitXorAssign for BandBoard {
  fn bitxor_assign(&mut self, rhs: Self) {
    for i in 0..4 {
      self.0[i] ^= rhs.0[i];
    }
  }
}
impl Not for BandBoard {
  type Output = Self;
  fn not(self) -> Self {
    self ^ Self::ONES
  }
}

impl Debug for BandBoard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "BandBoard({:#o}, {:#o}, {:#o})",
      self.0[0].backing_int(),
      self.0[1].backing_int(),
      self.0[2].backing_int()
    )
  }
}

impl Default for BandBoard {
  fn default() -> Self {
    Self::ZERO
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use paste::paste;

  macro_rules! simple_bits_test {
    ($type_name:ty, $capacity:expr) => {
      paste! {
          #[test]
          fn [<bits_ops_ $type_name:snake>]() {
              assert_eq!($capacity, <$type_name>::CAPACITY);
              assert_eq!(<$type_name>::ZERO, !<$type_name>::ONES);
              assert_eq!(!<$type_name>::ZERO, <$type_name>::ONES);

              let mut bits = <$type_name>::ZERO;
              assert_eq!(None, bits.smallest_bit());
              assert_eq!(None, bits.smallest_value());

              bits.insert(1);
              bits.insert(2);

              assert_eq!(1, bits.smallest_value().unwrap());
              assert_eq!(2, bits.len());

              let values: Vec<_> = bits.values().collect();
              assert_eq!([1, 2], values[..]);

              assert!(bits.insert(0));
              assert!(!bits.insert(2));
              let values: Vec<_> = bits.values().collect();
              assert_eq!([0, 1, 2], values[..]);

              assert!(bits.remove(2));
              assert!(!bits.remove(2));
              let values: Vec<_> = bits.values().collect();
              assert_eq!([0, 1], values[..]);
          }

          #[test]
          fn [<full_range_ $type_name:snake>]() {
              let mut over = <$type_name>::ONES;
              let mut under = <$type_name>::ZERO;
              for i in 0..$capacity {
                  assert_eq!(i, under.len());
                  assert_eq!($capacity - i, over.len());
                  let on = <$type_name>::singleton(i);
                  assert_eq!(1, on.len());
                  assert_eq!(on, over.smallest_bit().unwrap());
                  assert_eq!(0, (under & on).len());
                  assert!(!under.contains(i));
                  assert_eq!(1, (over & on).len());
                  assert!(over.contains(i));
                  under |= on;
                  over ^= on;
              }
              assert_eq!(<$type_name>::ZERO, over);
              assert!(over.is_empty());
              assert_eq!(<$type_name>::ONES, under);
              assert!(!under.is_empty());
          }

          #[test]
          #[should_panic(expected = "out of bounds")]
          fn [<check_ $type_name:snake>]() {
              <$type_name>::check($capacity + 1);
          }

          #[test]
          #[should_panic(expected = "out of bounds")]
          fn [<insert_ $type_name:snake>]() {
              let mut bits = <$type_name>::ZERO;
              bits.insert($capacity);
          }
      }
    };
  }

  simple_bits_test!(u8, 8);
  simple_bits_test!(u16, 16);
  simple_bits_test!(u32, 32);
  simple_bits_test!(Bits3, 3);
  simple_bits_test!(Bits9, 9);
  simple_bits_test!(Bits27, 27);
  simple_bits_test!(BandBoard, 81);

  #[test]
  fn band_board_spare_lane_stays_zero() {
    let mut board = BandBoard::ONES;
    board = !board;
    board |= BandBoard::ONES;
    board ^= BandBoard::singleton(80);
    board &= BandBoard::ONES;
    for band in 0..BandBoard::BANDS {
      let ones = if band == 2 {
        Bits27::ONES ^ Bits27::singleton(26)
      } else {
        Bits27::ONES
      };
      assert_eq!(ones, board.band(band));
    }
    assert_eq!(80, board.len());
  }

  #[test]
  fn bits3_9_27() {
    let parts = Bits9::from_backing_int(0o174).to_bits3s();
    assert_eq!(
      [
        Bits3::from_backing_int(4),
        Bits3::from_backing_int(7),
        Bits3::from_backing_int(1)
      ],
      parts[..]
    );

    let parts = Bits27::from_backing_int(0o_174_345_202).to_bits9s();
    assert_eq!(
      [
        Bits9::from_backing_int(0o202),
        Bits9::from_backing_int(0o345),
        Bits9::from_backing_int(0o174)
      ],
      parts[..]
    );
  }
}
