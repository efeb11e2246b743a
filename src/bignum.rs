//! The `Count` variant (`Small(f64) | Big(BigInt)`) described in the
//! design notes: counts are carried as `f64` for as long as they stay
//! below `2^53 - 1`, and promote to arbitrary precision the instant an
//! arithmetic operation would exceed it. No call site mixes the two
//! representations directly; everything goes through the methods here.

use factorial::Factorial;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

/// `2^53 - 1`, the largest integer an `f64` represents exactly.
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// An exact non-negative count, promoting from `f64` to `BigInt` the
/// moment it would lose precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Count {
    Small(f64),
    Big(BigInt),
}

impl Count {
    pub fn zero() -> Self {
        Count::Small(0.0)
    }

    pub fn one() -> Self {
        Count::Small(1.0)
    }

    pub fn from_u64(n: u64) -> Self {
        let f = n as f64;
        if f <= MAX_SAFE_INT {
            Count::Small(f)
        } else {
            Count::Big(BigInt::from(n))
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Count::Small(f) => *f == 0.0,
            Count::Big(b) => b.is_zero(),
        }
    }

    /// Exact `BigInt` view, for arithmetic that must promote.
    pub fn to_big(&self) -> BigInt {
        match self {
            Count::Small(f) => BigInt::from(*f as i64),
            Count::Big(b) => b.clone(),
        }
    }

    /// Lossy `f64` view, for display/approximate comparisons only.
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Count::Small(f) => *f,
            Count::Big(b) => b.to_f64().unwrap_or(f64::INFINITY),
        }
    }

    /// Exact `u64` if this count is small and non-negative, else `None`.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Count::Small(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
            Count::Big(b) => b.to_u64(),
            _ => None,
        }
    }

    pub fn exceeds_i32_max(&self) -> bool {
        match self {
            Count::Small(f) => *f > i32::MAX as f64,
            Count::Big(b) => b > &BigInt::from(i32::MAX),
        }
    }

    fn promote_pair(a: &Count, b: &Count) -> Option<(BigInt, BigInt)> {
        match (a, b) {
            (Count::Big(_), _) | (_, Count::Big(_)) => Some((a.to_big(), b.to_big())),
            _ => None,
        }
    }

    pub fn add(&self, other: &Count) -> Count {
        if let Some((a, b)) = Self::promote_pair(self, other) {
            return Count::Big(a + b);
        }
        let (Count::Small(a), Count::Small(b)) = (self, other) else { unreachable!() };
        let r = a + b;
        if r <= MAX_SAFE_INT {
            Count::Small(r)
        } else {
            Count::Big(BigInt::from(*a as i64) + BigInt::from(*b as i64))
        }
    }

    pub fn sub(&self, other: &Count) -> Count {
        if let Some((a, b)) = Self::promote_pair(self, other) {
            return Count::Big(a - b);
        }
        let (Count::Small(a), Count::Small(b)) = (self, other) else { unreachable!() };
        Count::Small(a - b)
    }

    pub fn mul(&self, other: &Count) -> Count {
        if let Some((a, b)) = Self::promote_pair(self, other) {
            return Count::Big(a * b);
        }
        let (Count::Small(a), Count::Small(b)) = (self, other) else { unreachable!() };
        let r = a * b;
        if r <= MAX_SAFE_INT {
            Count::Small(r)
        } else {
            Count::Big(BigInt::from(*a as i64) * BigInt::from(*b as i64))
        }
    }

    pub fn add_u64(&self, n: u64) -> Count {
        self.add(&Count::from_u64(n))
    }

    pub fn mul_u64(&self, n: u64) -> Count {
        self.mul(&Count::from_u64(n))
    }

    /// Exact division, valid only when `other` is known to divide `self`
    /// evenly (true at every call site: the multiplicative recurrences in
    /// `count.rs` always divide a running product by the next factor of
    /// a binomial coefficient computation).
    pub fn div_exact(&self, other: &Count) -> Count {
        match (self, other) {
            (Count::Small(a), Count::Small(b)) => Count::Small(a / b),
            _ => Count::Big(self.to_big() / other.to_big()),
        }
    }

    pub fn div_exact_u64(&self, n: u64) -> Count {
        self.div_exact(&Count::from_u64(n))
    }

    pub fn pow_u32(&self, exp: u32) -> Count {
        let mut result = Count::one();
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base.clone());
            e >>= 1;
        }
        result
    }

    pub fn cmp_u64(&self, n: u64) -> Ordering {
        match self {
            Count::Small(f) => f.partial_cmp(&(n as f64)).unwrap_or(Ordering::Equal),
            Count::Big(b) => b.cmp(&BigInt::from(n)),
        }
    }

    /// The wire encoding of SPEC_FULL.md §6: a little-endian `u32` header
    /// word of `1`, followed by the little-endian magnitude limbs. Only
    /// meaningful (and only returns `Some`) once a count has promoted to
    /// `Big`; small counts are carried by the caller as a plain integer.
    pub fn to_bigint_wire(&self) -> Option<(u32, Vec<u8>)> {
        match self {
            Count::Small(_) => None,
            Count::Big(b) => {
                debug_assert!(!b.is_negative(), "counts are never negative");
                Some((1u32, b.to_bytes_le().1))
            }
        }
    }
}

/// `n!` with an early-out through the `factorial` crate's checked path,
/// falling back to a `Count`-promoting accumulation for the cases it
/// would overflow `u64`.
pub fn count_factorial(n: u64) -> Count {
    if let Some(f) = n.checked_factorial() {
        Count::from_u64(f)
    } else {
        let mut acc = Count::one();
        for i in 2..=n {
            acc = acc.mul_u64(i);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_stays_small() {
        let c = Count::from_u64(10).mul_u64(10);
        assert_eq!(c, Count::Small(100.0));
    }

    #[test]
    fn promotes_on_overflow() {
        let huge = Count::Small(MAX_SAFE_INT);
        let c = huge.add_u64(10);
        match c {
            Count::Big(_) => {}
            Count::Small(_) => panic!("expected promotion to Big"),
        }
    }

    #[test]
    fn factorial_promotes_past_twenty_one() {
        // 21! overflows u64.
        let c = count_factorial(21);
        assert!(matches!(c, Count::Big(_)));
        assert_eq!(c.to_big().to_string(), "51090942171709440000");
    }

    #[test]
    fn wire_format_round_trips_magnitude() {
        let c = Count::Big(BigInt::from(300_000_000_000_000_000_i64));
        let (header, limbs) = c.to_bigint_wire().unwrap();
        assert_eq!(header, 1);
        let back = BigInt::from_bytes_le(num_bigint::Sign::Plus, &limbs);
        assert_eq!(back, c.to_big());
    }
}
