//! Recognition/classification of a sum-equality constraint as an integer
//! partition (SPEC_FULL.md §2 `PartitionDesign`, spec.md §4.5).
//!
//! A request is partition-shaped when its base values `v`, once shifted
//! and scaled to start at `0` or `1` with unit step, form a contiguous
//! run of integers. Recognising that early lets `count`/`enumerate` use
//! the partition-specialised paths of `partition::enumerate` instead of
//! falling through to the generic constraint search.

use crate::family::Family;
use crate::bignum::Count;
use num_integer::Integer;
use serde::Serialize;

/// The eleven partition shapes `jwood000/algosRcpp` distinguishes, plus
/// the `NotPartition` sentinel for anything that doesn't map onto a
/// contiguous integer run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartitionType {
    NotPartition,
    RepStdAll,
    RepNoZero,
    RepShort,
    RepCapped,
    DstctStdAll,
    DstctShort,
    DstctSpecial,
    DstctOneZero,
    DstctNoZero,
    DistCapped,
    Multiset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintType {
    General,
    PartitionEsque,
    PartMapping,
    PartStandard,
}

/// The partition descriptor of spec.md §3: everything needed to run a
/// partition-specialised enumerator and to map its output back onto the
/// caller's original `v`.
#[derive(Debug, Clone)]
pub struct PartDesign {
    pub width: usize,
    pub mapped_target: i64,
    pub count: Count,
    pub shift: i64,
    pub slope: i64,
    pub target: i64,
    pub ctype: ConstraintType,
    pub ptype: PartitionType,
    /// Lower/upper bound of the mapped, unit-step value run (`v'`).
    pub lo: i64,
    pub hi: i64,
    /// The `rep_allowed` signal used to classify `ptype`: `true` for the
    /// `Rep*` shapes (non-decreasing parts), `false` for the `Dstct*`
    /// shapes (strictly increasing parts). Exposed so callers don't need
    /// to re-derive it from `ptype`'s name.
    pub rep_allowed: bool,
}

/// A read-only diagnostic view of a [`PartDesign`], mirroring the
/// original source's verbose `GetDesign`/`bShowDetail` report. Not a new
/// enumeration path — just a `Serialize`-able snapshot for callers who
/// want to log or display how a constraint was classified.
#[derive(Debug, Clone, Serialize)]
pub struct PartDesignReport {
    pub width: usize,
    pub mapped_target: i64,
    pub count_display: String,
    pub ctype: ConstraintType,
    pub ptype: PartitionType,
    pub shift: i64,
    pub slope: i64,
    pub target: i64,
}

impl PartDesign {
    pub fn describe(&self) -> PartDesignReport {
        PartDesignReport {
            width: self.width,
            mapped_target: self.mapped_target,
            count_display: match &self.count {
                Count::Small(f) => format!("{f}"),
                Count::Big(b) => b.to_string(),
            },
            ctype: self.ctype,
            ptype: self.ptype,
            shift: self.shift,
            slope: self.slope,
            target: self.target,
        }
    }

    /// `true` when the underlying `ptype` is anything other than
    /// [`PartitionType::NotPartition`].
    pub fn is_partition(&self) -> bool {
        self.ptype != PartitionType::NotPartition
    }

    /// `true` for the eight "ranged" shapes `partition::enumerate` can
    /// walk directly (a contiguous `[lo, hi]` run with no per-value
    /// multiplicity cap). `RepCapped`/`DistCapped`/`Multiset` carry a cap
    /// the simple range can't express and fall back to
    /// [`crate::constraint`]'s general search instead.
    pub fn is_ranged(&self) -> bool {
        matches!(
            self.ptype,
            PartitionType::RepStdAll
                | PartitionType::RepNoZero
                | PartitionType::RepShort
                | PartitionType::DstctStdAll
                | PartitionType::DstctShort
                | PartitionType::DstctSpecial
                | PartitionType::DstctOneZero
                | PartitionType::DstctNoZero
        )
    }
}

fn gcd_of_diffs(v: &[i64]) -> i64 {
    if v.len() < 2 {
        return 1;
    }
    let base = v[0];
    let mut g = 0i64;
    for &x in &v[1..] {
        g = g.gcd(&(x - base).abs());
    }
    if g == 0 {
        1
    } else {
        g
    }
}

/// Attempt to recognise `sum(z) == target` (over `m` chosen values of
/// `v`, `family`, and optional multiset `reps`) as an integer partition.
/// Always succeeds with a `PartDesign` — unrecognised shapes carry
/// `ptype: PartitionType::NotPartition` rather than an `Option::None`, so
/// callers can still read `shift`/`slope`/`target` for diagnostics.
pub fn recognize(v: &[i64], m: usize, target: i64, family: Family, reps: Option<&[u32]>) -> PartDesign {
    let mut sorted = v.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let step = gcd_of_diffs(&sorted);
    let shift = sorted[0];

    let mapped: Vec<i64> = sorted.iter().map(|&x| (x - shift) / step).collect();
    let is_contiguous = mapped.iter().enumerate().all(|(i, &x)| x == i as i64);

    let not_partition = || PartDesign {
        width: m,
        mapped_target: target,
        count: Count::zero(),
        shift,
        slope: step,
        target,
        ctype: ConstraintType::General,
        ptype: PartitionType::NotPartition,
        lo: 0,
        hi: 0,
        rep_allowed: false,
    };

    if !is_contiguous || (target - (m as i64) * shift) % step != 0 {
        return not_partition();
    }
    let mapped_target = (target - (m as i64) * shift) / step;
    let lo = 0i64;
    let hi = (mapped.len() as i64) - 1;
    if mapped_target < 0 || mapped_target > hi * m as i64 {
        return not_partition();
    }

    let has_zero = mapped.contains(&0);
    let width_maximal = m == mapped.len();
    let rep_allowed = family.allows_repeated_indices() || matches!(family, Family::MultisetCombinations);

    let ptype = if reps.is_some() {
        PartitionType::Multiset
    } else if rep_allowed {
        if hi < 2 {
            PartitionType::RepCapped
        } else if !has_zero {
            PartitionType::RepNoZero
        } else if !width_maximal {
            PartitionType::RepShort
        } else {
            PartitionType::RepStdAll
        }
    } else if hi < 2 {
        if width_maximal {
            PartitionType::DstctSpecial
        } else {
            PartitionType::DistCapped
        }
    } else if !has_zero {
        PartitionType::DstctNoZero
    } else if !width_maximal && (mapped.len() as i64) > m as i64 + 1 {
        PartitionType::DstctShort
    } else if width_maximal {
        PartitionType::DstctStdAll
    } else {
        PartitionType::DstctOneZero
    };

    let ctype = match ptype {
        PartitionType::NotPartition => ConstraintType::General,
        PartitionType::Multiset => ConstraintType::PartMapping,
        PartitionType::RepStdAll | PartitionType::DstctStdAll => ConstraintType::PartStandard,
        _ => ConstraintType::PartitionEsque,
    };

    let strict = !rep_allowed && reps.is_none();
    let count = super::enumerate::partition_count(lo, hi, m, mapped_target, !strict, None);

    PartDesign {
        width: m,
        mapped_target,
        count,
        shift,
        slope: step,
        target,
        ctype,
        ptype,
        lo,
        hi,
        rep_allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_standard_distinct_partition() {
        let v = [1, 2, 3, 4, 5];
        let design = recognize(&v, 3, 9, Family::CombinationsNoRep, None);
        assert!(design.is_partition());
        assert_ne!(design.ptype, PartitionType::NotPartition);
    }

    #[test]
    fn non_arithmetic_v_is_not_a_partition() {
        let v = [1, 2, 4, 100];
        let design = recognize(&v, 2, 5, Family::CombinationsNoRep, None);
        assert_eq!(design.ptype, PartitionType::NotPartition);
    }

    #[test]
    fn rep_allowed_family_is_recognised_as_repetition_partition() {
        let v = [0, 1, 2, 3, 4, 5, 6, 7];
        let design = recognize(&v, 3, 10, Family::CombinationsRep, None);
        assert!(matches!(
            design.ptype,
            PartitionType::RepStdAll | PartitionType::RepNoZero | PartitionType::RepShort
        ));
    }

    #[test]
    fn width_maximal_distinct_zero_inclusive_is_std_all() {
        let v = [0, 1, 2, 3, 4];
        let design = recognize(&v, 5, 10, Family::CombinationsNoRep, None);
        assert_eq!(design.ptype, PartitionType::DstctStdAll);
        assert!(design.is_ranged());
    }
}
