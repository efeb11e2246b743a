//! Dense enumeration specialised for the partition shapes `design.rs`
//! recognises (spec.md §4.6 `PartitionEnumerate`).
//!
//! The eight "ranged" partition types (`RepStdAll`/`RepNoZero`/`RepShort`/
//! `DstctStdAll`/`DstctShort`/`DstctSpecial`/`DstctOneZero`/`DstctNoZero`)
//! share one skeleton here: a partition is a sequence of `m` integers in
//! `[lo, hi]`, non-decreasing when repetition is allowed and strictly
//! increasing otherwise, summing to the mapped target. The two capped
//! types and `Multiset` need a per-value multiplicity ceiling the simple
//! range doesn't express, so they fall back to [`crate::constraint`]'s
//! general monotone search, same as the `m == 1` degenerate case folds
//! into it per SPEC_FULL.md's supplemented-features section.

use crate::bignum::Count;

fn min_reachable(v: i64, len: usize, strict: bool) -> i64 {
    if len == 0 {
        return 0;
    }
    let l = len as i64;
    if strict {
        l * v + l * (l - 1) / 2
    } else {
        l * v
    }
}

fn max_reachable(cap: i64, len: usize, strict: bool) -> i64 {
    if len == 0 {
        return 0;
    }
    let l = len as i64;
    if strict {
        l * cap - l * (l - 1) / 2
    } else {
        l * cap
    }
}

/// Fill `suffix` with the lexicographically smallest legal sequence in
/// `[lo, hi]` (non-decreasing, or strictly increasing from `lo` when
/// `strict`) that sums to `sum_needed`. Assumes feasibility has already
/// been checked via [`min_reachable`]/[`max_reachable`].
///
/// Greedy left to right: at each position, take the smallest value for
/// which the rest of the suffix can still reach the remaining sum, same
/// feasibility check [`next_partition`] uses to pick its next candidate.
fn fill_smallest(suffix: &mut [i64], lo: i64, hi: i64, strict: bool, sum_needed: i64) {
    let len = suffix.len();
    let mut remaining_sum = sum_needed;
    let mut floor = lo;
    for (i, slot) in suffix.iter_mut().enumerate() {
        let rest_len = len - i - 1;
        let mut v = floor;
        loop {
            let rest_lo = if strict { v + 1 } else { v };
            let rest_needed = remaining_sum - v;
            let lo_reach = min_reachable(rest_lo, rest_len, strict);
            let hi_reach = max_reachable(hi, rest_len, strict);
            if rest_needed >= lo_reach && rest_needed <= hi_reach {
                *slot = v;
                remaining_sum = rest_needed;
                floor = if strict { v + 1 } else { v };
                break;
            }
            v += 1;
        }
    }
}

/// In-place lexicographic successor over a ranged partition. Mirrors
/// `successor::next_combination`'s "rightmost movable position, refill
/// suffix with the smallest legal continuation" shape, but the
/// continuation must also hit an exact target sum rather than just stay
/// in range.
pub fn next_partition(z: &mut [i64], lo: i64, hi: i64, strict: bool) -> bool {
    let m = z.len();
    for j in (0..m).rev() {
        let old_tail_sum: i64 = z[j..].iter().sum();
        let mut candidate = z[j] + 1;
        while candidate <= hi {
            let rest_len = m - j - 1;
            let rest_lo = if strict { candidate + 1 } else { candidate };
            let needed_rest_sum = old_tail_sum - candidate;
            let lo_reach = min_reachable(rest_lo, rest_len, strict);
            let hi_reach = max_reachable(hi, rest_len, strict);
            if needed_rest_sum >= lo_reach && needed_rest_sum <= hi_reach {
                z[j] = candidate;
                fill_smallest(&mut z[j + 1..], rest_lo, hi, strict, needed_rest_sum);
                return true;
            }
            candidate += 1;
        }
    }
    false
}

pub fn prev_partition(z: &mut [i64], lo: i64, hi: i64, strict: bool) -> bool {
    let m = z.len();
    let mut w: Vec<i64> = (0..m).map(|i| lo + hi - z[m - 1 - i]).collect();
    if !next_partition(&mut w, lo, hi, strict) {
        return false;
    }
    for i in 0..m {
        z[i] = lo + hi - w[m - 1 - i];
    }
    true
}

/// The lexicographically first partition of `target` into exactly `m`
/// parts within `[lo, hi]`.
pub fn first_partition(lo: i64, hi: i64, m: usize, target: i64, strict: bool) -> Option<Vec<i64>> {
    let lo_reach = min_reachable(lo, m, strict);
    let hi_reach = max_reachable(hi, m, strict);
    if target < lo_reach || target > hi_reach {
        return None;
    }
    let mut z = vec![0i64; m];
    fill_smallest(&mut z, lo, hi, strict, target);
    Some(z)
}

/// Counting DP over `(parts used, running sum)`: a bounded (0/1 if
/// `!rep_allowed`, capped-unbounded otherwise) knapsack, matching
/// spec.md §4.5's "computed by the DP tables in §4.5" and §4.6's per-type
/// tabulation. `caps`, when given, overrides the implicit per-value
/// ceiling (`1` for distinct, `m` for repeated) with an explicit
/// multiset cap — used by the `Multiset` partition type.
pub fn partition_count(
    lo: i64,
    hi: i64,
    m: usize,
    target: i64,
    rep_allowed: bool,
    caps: Option<&[u32]>,
) -> Count {
    if target < 0 || m == 0 && target != 0 {
        return if m == 0 && target == 0 { Count::one() } else { Count::zero() };
    }
    let target = target as usize;
    // dp[parts][sum]
    let mut dp = vec![vec![Count::zero(); target + 1]; m + 1];
    dp[0][0] = Count::one();
    let values = lo..=hi;
    for (idx, v) in values.enumerate() {
        if v < 0 {
            continue;
        }
        let cap = caps.map(|c| c[idx] as usize).unwrap_or(if rep_allowed { m } else { 1 });
        let mut next = dp.clone();
        for parts in 0..=m {
            for sum in 0..=target {
                if dp[parts][sum].is_zero() {
                    continue;
                }
                let mut add_value = 0usize;
                let mut copies = 0usize;
                while copies < cap {
                    copies += 1;
                    add_value += v.max(0) as usize;
                    let new_parts = parts + copies;
                    let new_sum = sum + add_value;
                    if new_parts > m || new_sum > target {
                        break;
                    }
                    next[new_parts][new_sum] = next[new_parts][new_sum].add(&dp[parts][sum]);
                }
            }
        }
        dp = next;
    }
    dp[m][target].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_partition_enumerates_3_distinct_parts_summing_to_9_from_1_to_5() {
        // mapped: lo=0, hi=4 (v' = v - 1), target' = 9 - 3 = 6, strict.
        let mut z = first_partition(0, 4, 3, 6, true).unwrap();
        let mut rows = vec![z.clone()];
        while next_partition(&mut z, 0, 4, true) {
            rows.push(z.clone());
        }
        for row in &rows {
            assert_eq!(row.iter().sum::<i64>(), 6);
            for w in row.windows(2) {
                assert!(w[0] < w[1]);
            }
        }
        // unique, sorted ascending lexicographically
        for w in rows.windows(2) {
            assert!(w[0] < w[1]);
        }
        // exhaustive: {0,2,4} and {1,2,3} are the only two strictly
        // increasing triples from [0,4] summing to 6.
        assert_eq!(rows, vec![vec![0, 2, 4], vec![1, 2, 3]]);
    }

    #[test]
    fn next_and_prev_partition_are_inverses() {
        let lo = 0;
        let hi = 5;
        let mut z = first_partition(lo, hi, 3, 7, false).unwrap();
        while next_partition(&mut z, lo, hi, false) {
            let after = z.clone();
            assert!(prev_partition(&mut z, lo, hi, false));
            assert!(next_partition(&mut z, lo, hi, false));
            assert_eq!(z, after);
        }
    }

    #[test]
    fn partition_count_matches_brute_force_small_case() {
        // partitions of 6 into 3 distinct parts from {0,1,2,3,4}
        let count = partition_count(0, 4, 3, 6, false, None).to_u64();
        let mut brute = 0u64;
        for a in 0..5i64 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    if a + b + c == 6 {
                        brute += 1;
                    }
                }
            }
        }
        assert_eq!(count, Some(brute));
    }
}
