//! Stateful iterator facade (spec.md §4.8, SPEC_FULL.md §9 "Cursor
//! lifecycle"): unsynchronised, borrowing the base sequence and owning
//! its current index tuple plus rank. `Cursor` is `!Sync` by
//! construction — it holds a single mutable `z`/`rank` pair with no
//! interior locking, so concurrent use from multiple threads is the
//! caller's problem, same as a `std::slice::Iter`.

use crate::enumerate::{advance, retreat, unrank_start};
use crate::error::{EngineError, Result};
use crate::family::Family;
use crate::value::Element;
use num_bigint::BigInt;
use num_traits::Zero;

pub struct Cursor<'a, V: Element> {
    v: &'a [V],
    family: Family,
    n: usize,
    m: usize,
    reps: Option<&'a [u32]>,
    z: Vec<usize>,
    rank: BigInt,
    total: BigInt,
}

/// A read-only snapshot of a cursor's position, for display/debugging.
#[derive(Debug, Clone)]
pub struct CursorSummary {
    pub rank: BigInt,
    pub total: BigInt,
}

impl<'a, V: Element> Cursor<'a, V> {
    pub fn new(v: &'a [V], family: Family, m: usize, reps: Option<&'a [u32]>, total: BigInt) -> Result<Self> {
        if total.is_zero() {
            return Err(EngineError::invalid("v", "family has no elements to iterate"));
        }
        let n = v.len();
        let z = unrank_start(family, n, m, reps, &BigInt::from(0));
        Ok(Cursor { v, family, n, m, reps, z, rank: BigInt::from(0), total })
    }

    pub fn at_rank(v: &'a [V], family: Family, m: usize, reps: Option<&'a [u32]>, total: BigInt, rank: BigInt) -> Result<Self> {
        if rank < BigInt::from(0) || rank >= total {
            return Err(EngineError::invalid("rank", "out of range"));
        }
        let n = v.len();
        let z = unrank_start(family, n, m, reps, &rank);
        Ok(Cursor { v, family, n, m, reps, z, rank, total })
    }

    fn current_row(&self) -> Vec<V> {
        self.z.iter().map(|&i| self.v[i]).collect()
    }

    pub fn current(&self) -> Vec<V> {
        self.current_row()
    }

    pub fn front(&mut self) -> Vec<V> {
        self.z = unrank_start(self.family, self.n, self.m, self.reps, &BigInt::from(0));
        self.rank = BigInt::from(0);
        self.current_row()
    }

    pub fn back(&mut self) -> Vec<V> {
        let last_rank = &self.total - 1;
        self.z = unrank_start(self.family, self.n, self.m, self.reps, &last_rank);
        self.rank = last_rank;
        self.current_row()
    }

    /// Advance by one row, returning `None` (and leaving position
    /// unchanged) once past the last row.
    pub fn next(&mut self) -> Option<Vec<V>> {
        if &self.rank + 1 >= self.total {
            return None;
        }
        let advanced = advance(self.family, &mut self.z, self.n, self.reps);
        debug_assert!(advanced, "rank bookkeeping says more rows remain but successor disagrees");
        self.rank += 1;
        Some(self.current_row())
    }

    /// Advance by `k` rows in one step (spec.md's `next(k)`).
    pub fn advance_by(&mut self, k: u64) -> Option<Vec<V>> {
        let target = &self.rank + BigInt::from(k);
        if target >= self.total {
            return None;
        }
        self.jump(target).ok()
    }

    pub fn prev(&mut self) -> Option<Vec<V>> {
        if self.rank.is_zero() {
            return None;
        }
        let retreated = retreat(self.family, &mut self.z, self.n, self.reps);
        debug_assert!(retreated, "rank bookkeeping says a prior row exists but predecessor disagrees");
        self.rank -= 1;
        Some(self.current_row())
    }

    pub fn retreat_by(&mut self, k: u64) -> Option<Vec<V>> {
        if BigInt::from(k) > self.rank {
            return None;
        }
        let target = &self.rank - BigInt::from(k);
        self.jump(target).ok()
    }

    /// Re-position at an arbitrary 0-indexed rank via `unrank`, rather
    /// than walking there one successor step at a time.
    pub fn jump(&mut self, rank: BigInt) -> Result<Vec<V>> {
        if rank < BigInt::from(0) || rank >= self.total {
            return Err(EngineError::invalid("rank", "out of range"));
        }
        self.z = unrank_start(self.family, self.n, self.m, self.reps, &rank);
        self.rank = rank;
        Ok(self.current_row())
    }

    pub fn summary(&self) -> CursorSummary {
        CursorSummary { rank: self.rank.clone(), total: self.total.clone() }
    }

    pub fn source_vector(&self) -> &[V] {
        self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count;

    #[test]
    fn next_and_prev_are_inverses_at_interior_rank() {
        let v: Vec<i64> = (0..5).collect();
        let total = count(Family::CombinationsNoRep, 5, 3, None).to_big();
        let mut cursor = Cursor::new(&v, Family::CombinationsNoRep, 3, None, total).unwrap();
        let first = cursor.current();
        let advanced = cursor.next().unwrap();
        assert_ne!(first, advanced);
        let back = cursor.prev().unwrap();
        assert_eq!(back, first);
    }

    #[test]
    fn next_returns_none_past_last_row() {
        let v: Vec<i64> = (0..3).collect();
        let total = count(Family::CombinationsNoRep, 3, 3, None).to_big();
        let mut cursor = Cursor::new(&v, Family::CombinationsNoRep, 3, None, total).unwrap();
        assert!(cursor.next().is_none());
    }

    #[test]
    fn jump_matches_stepwise_next() {
        let v: Vec<i64> = (0..6).collect();
        let total = count(Family::CombinationsNoRep, 6, 3, None).to_big();
        let mut stepwise = Cursor::new(&v, Family::CombinationsNoRep, 3, None, total.clone()).unwrap();
        for _ in 0..5 {
            stepwise.next();
        }
        let mut jumped = Cursor::new(&v, Family::CombinationsNoRep, 3, None, total).unwrap();
        jumped.jump(BigInt::from(5)).unwrap();
        assert_eq!(stepwise.current(), jumped.current());
    }

    #[test]
    fn front_and_back_bound_the_sequence() {
        let v: Vec<i64> = (0..4).collect();
        let total = count(Family::CombinationsNoRep, 4, 2, None).to_big();
        let mut cursor = Cursor::new(&v, Family::CombinationsNoRep, 2, None, total).unwrap();
        let back = cursor.back();
        assert!(cursor.next().is_none());
        let front = cursor.front();
        assert_eq!(front, vec![0, 1]);
        assert_eq!(back, vec![2, 3]);
    }
}
