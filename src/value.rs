//! The element-type polymorphism described in the design notes: a pure
//! equality/ordering `Element` for the enumeration-only paths, and the
//! arithmetic-capable `Number` subset used by constraints and partitions.

use std::fmt::Debug;

/// Anything that can sit in the base sequence `v` and be copied into an
/// output row. Combinations/permutations/multiset machinery only ever
/// compares and copies elements; it never does arithmetic on them.
pub trait Element: Copy + Clone + PartialEq + PartialOrd + Debug + Send + Sync + 'static {}

impl Element for i64 {}
impl Element for f64 {}
impl Element for bool {}
impl Element for u8 {}
impl Element for char {}

/// A factor-coded integer (the analogue of an R factor level), carried as
/// an opaque `Element` wherever the original package allows `v` to be a
/// `factor`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Factor(pub u32);

impl Element for Factor {}

/// The arithmetic-capable subset of `Element` used by `fun`/`comparison`
/// constraints and the partition subsystem. Per the design notes, this is
/// monomorphised only for `i64` and `f64` rather than made generic over
/// every numeric type.
pub trait Number: Element {
    const ZERO: Self;
    const ONE: Self;

    fn to_f64(self) -> f64;
    fn from_f64(x: f64) -> Self;
    fn checked_add(self, other: Self) -> Option<Self>;
    fn checked_sub(self, other: Self) -> Option<Self>;

    /// True if this value is an exact non-negative integer representable
    /// as `i64` — used by the partition-recognition logic of
    /// `PartitionDesign`, which requires `v` to be integral.
    fn as_integral(self) -> Option<i64>;
}

impl Number for i64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn to_f64(self) -> f64 {
        self as f64
    }

    /// Truncating: an aggregate over `i64` input (e.g. `Mean`) is not
    /// generally integral, and this trait has no fallible return.
    fn from_f64(x: f64) -> Self {
        x as i64
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        i64::checked_add(self, other)
    }

    fn checked_sub(self, other: Self) -> Option<Self> {
        i64::checked_sub(self, other)
    }

    fn as_integral(self) -> Option<i64> {
        Some(self)
    }
}

impl Number for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(x: f64) -> Self {
        x
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        Some(self + other)
    }

    fn checked_sub(self, other: Self) -> Option<Self> {
        Some(self - other)
    }

    fn as_integral(self) -> Option<i64> {
        if self.fract() == 0.0 && self.is_finite() && self.abs() < (1i64 << 53) as f64 {
            Some(self as i64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_recognition() {
        assert_eq!(3.0_f64.as_integral(), Some(3));
        assert_eq!(3.5_f64.as_integral(), None);
        assert_eq!(f64::NAN.as_integral(), None);
        assert_eq!(5_i64.as_integral(), Some(5));
    }
}
