// Copyright (c) 2018 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0. See glrtable's idx.rs for the full text.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A size or position expressed in both chars and bytes at once, so that callers working in
/// either unit never have to re-derive the other from scratch. Used for tree sizes, padding, and
/// cursor/stack positions alike.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Length {
    pub chars: u32,
    pub bytes: u32
}

impl Length {
    pub const ZERO: Length = Length { chars: 0, bytes: 0 };

    pub fn new(chars: u32, bytes: u32) -> Self {
        Length { chars, bytes }
    }

    pub fn is_zero(self) -> bool {
        self == Length::ZERO
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length {
            chars: self.chars + rhs.chars,
            bytes: self.bytes + rhs.bytes
        }
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        *self = *self + rhs;
    }
}

impl Sub for Length {
    type Output = Length;

    /// Saturates at zero in each component rather than panicking: breakdown and repair paths
    /// sometimes compute a "remaining" length from two sizes that are only approximately ordered
    /// (e.g. across a lossy error-mode lex), and a clamped zero is a safer degenerate answer than
    /// a panic partway through a parse.
    fn sub(self, rhs: Length) -> Length {
        Length {
            chars: self.chars.saturating_sub(rhs.chars),
            bytes: self.bytes.saturating_sub(rhs.bytes)
        }
    }
}

impl SubAssign for Length {
    fn sub_assign(&mut self, rhs: Length) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums_both_components() {
        let a = Length::new(1, 2);
        let b = Length::new(3, 4);
        assert_eq!(a + b, Length::new(4, 6));
    }

    #[test]
    fn sub_saturates_at_zero() {
        let a = Length::new(1, 1);
        let b = Length::new(3, 0);
        assert_eq!(a - b, Length::new(0, 1));
    }
}
