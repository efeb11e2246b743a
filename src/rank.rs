//! Rank/unrank (SPEC_FULL.md §4.2): map a tuple `z` to its 0-indexed
//! position in lexicographic order and back. Ranks are carried as
//! `BigInt` throughout rather than tagged `Count::Small`/`Count::Big`:
//! rank arithmetic must stay exact through every intermediate
//! subtraction, and the families here are never hot enough in practice
//! to justify duplicating the fast/slow split that `Count` uses for raw
//! cardinality.

use crate::count::{combinations_no_rep, multiset_combinations, multiset_permutations_partial, permutations_no_rep};
use num_bigint::BigInt;
use num_traits::Zero;

fn binom(n: usize, k: usize) -> BigInt {
    combinations_no_rep(n as u64, k as u64).to_big()
}

fn perm(n: usize, k: usize) -> BigInt {
    permutations_no_rep(n as u64, k as u64).to_big()
}

/// Rank of a strictly increasing combination `z` of `m` values from
/// `[0, n)`, in the order produced by `successor::next_combination`.
pub fn rank_combination(z: &[usize], n: usize) -> BigInt {
    let m = z.len();
    let mut rank = BigInt::zero();
    let mut lo = 0usize;
    for (i, &zi) in z.iter().enumerate() {
        for v in lo..zi {
            rank += binom(n - 1 - v, m - i - 1);
        }
        lo = zi + 1;
    }
    rank
}

pub fn unrank_combination(n: usize, m: usize, rank: &BigInt) -> Vec<usize> {
    let mut z = vec![0usize; m];
    let mut remaining = rank.clone();
    let mut lo = 0usize;
    for i in 0..m {
        let mut v = lo;
        loop {
            let c = binom(n - 1 - v, m - i - 1);
            if remaining < c {
                break;
            }
            remaining -= c;
            v += 1;
        }
        z[i] = v;
        lo = v + 1;
    }
    z
}

/// Combinations with repetition reduce to combinations without repetition
/// over `[0, n+m-1)` via the standard shift `z'[i] = z[i] + i`.
pub fn rank_combination_rep(z: &[usize], n: usize) -> BigInt {
    let m = z.len();
    let shifted: Vec<usize> = z.iter().enumerate().map(|(i, &v)| v + i).collect();
    rank_combination(&shifted, n + m - 1)
}

pub fn unrank_combination_rep(n: usize, m: usize, rank: &BigInt) -> Vec<usize> {
    let shifted = unrank_combination(n + m - 1, m, rank);
    shifted.into_iter().enumerate().map(|(i, v)| v - i).collect()
}

/// Lehmer-code-style rank for partial (or full) permutations without
/// repetition: at each position, count how many still-available values
/// are smaller than the one chosen, weighted by the number of ways to
/// arrange the rest.
pub fn rank_permutation(z: &[usize], n: usize) -> BigInt {
    let m = z.len();
    let mut used = vec![false; n];
    let mut rank = BigInt::zero();
    for (i, &zi) in z.iter().enumerate() {
        let smaller_available = used[..zi].iter().filter(|&&u| !u).count();
        rank += BigInt::from(smaller_available) * perm(n - i - 1, m - i - 1);
        used[zi] = true;
    }
    rank
}

pub fn unrank_permutation(n: usize, m: usize, rank: &BigInt) -> Vec<usize> {
    let mut used = vec![false; n];
    let mut z = vec![0usize; m];
    let mut remaining = rank.clone();
    for i in 0..m {
        let block = perm(n - i - 1, m - i - 1);
        let mut r = if block.is_zero() {
            BigInt::zero()
        } else {
            &remaining / &block
        };
        if !block.is_zero() {
            remaining -= &r * &block;
        }
        // walk to the r-th smallest unused value
        let mut v = 0usize;
        loop {
            if !used[v] {
                if r.is_zero() {
                    break;
                }
                r -= 1;
            }
            v += 1;
        }
        used[v] = true;
        z[i] = v;
    }
    z
}

/// Base-`n` numeral rank for permutations with repetition.
pub fn rank_permutation_rep(z: &[usize], n: usize) -> BigInt {
    let mut rank = BigInt::zero();
    let base = BigInt::from(n);
    for &digit in z {
        rank = rank * &base + BigInt::from(digit);
    }
    rank
}

pub fn unrank_permutation_rep(n: usize, m: usize, rank: &BigInt) -> Vec<usize> {
    let base = BigInt::from(n);
    let mut digits = vec![0usize; m];
    let mut remaining = rank.clone();
    for i in (0..m).rev() {
        let d = &remaining % &base;
        digits[i] = d.to_string().parse().unwrap_or(0);
        remaining /= &base;
    }
    digits
}

/// Rank of a non-decreasing sequence of kind-indices respecting
/// `reps` caps: at each position, sum over smaller candidate kinds the
/// number of ways to complete the remaining suffix from that kind
/// onward with one unit of supply already spent.
pub fn rank_combination_multiset(z: &[usize], reps: &[u32]) -> BigInt {
    let m = z.len();
    let mut avail = reps.to_vec();
    let mut rank = BigInt::zero();
    let mut lo = 0usize;
    for (i, &zi) in z.iter().enumerate() {
        let suffix_len = m - i - 1;
        for k in lo..zi {
            if avail[k] > 0 {
                avail[k] -= 1;
                rank += multiset_combinations(&avail[k..], suffix_len).to_big();
                avail[k] += 1;
            }
        }
        avail[zi] -= 1;
        lo = zi;
    }
    rank
}

pub fn unrank_combination_multiset(reps: &[u32], m: usize, rank: &BigInt) -> Vec<usize> {
    let mut avail = reps.to_vec();
    let mut z = vec![0usize; m];
    let mut remaining = rank.clone();
    let mut lo = 0usize;
    for (i, slot) in z.iter_mut().enumerate() {
        let suffix_len = m - i - 1;
        let mut k = lo;
        loop {
            if avail[k] == 0 {
                k += 1;
                continue;
            }
            avail[k] -= 1;
            let ways = multiset_combinations(&avail[k..], suffix_len).to_big();
            if remaining < ways {
                *slot = k;
                lo = k;
                break;
            }
            remaining -= ways;
            avail[k] += 1;
            k += 1;
        }
    }
    z
}

/// Rank of an arbitrary-order arrangement of kind-indices respecting
/// `reps` caps (covers both full-word and partial multiset
/// permutations: the only difference is whether `z.len()` equals the
/// total multiset size).
pub fn rank_multiset_permutation(z: &[usize], reps: &[u32]) -> BigInt {
    let m = z.len();
    let mut avail = reps.to_vec();
    let mut rank = BigInt::zero();
    for (i, &zi) in z.iter().enumerate() {
        let suffix_len = m - i - 1;
        for k in 0..zi {
            if avail[k] > 0 {
                avail[k] -= 1;
                rank += multiset_permutations_partial(&avail, suffix_len).to_big();
                avail[k] += 1;
            }
        }
        avail[zi] -= 1;
    }
    rank
}

pub fn unrank_multiset_permutation(reps: &[u32], m: usize, rank: &BigInt) -> Vec<usize> {
    let mut avail = reps.to_vec();
    let mut z = vec![0usize; m];
    let mut remaining = rank.clone();
    for (i, slot) in z.iter_mut().enumerate() {
        let suffix_len = m - i - 1;
        let mut k = 0;
        loop {
            if avail[k] == 0 {
                k += 1;
                continue;
            }
            avail[k] -= 1;
            let ways = multiset_permutations_partial(&avail, suffix_len).to_big();
            if remaining < ways {
                *slot = k;
                break;
            }
            remaining -= ways;
            avail[k] += 1;
            k += 1;
        }
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::successor;

    #[test]
    fn unrank_zero_is_lex_first_combination() {
        assert_eq!(unrank_combination(5, 3, &BigInt::zero()), vec![0, 1, 2]);
    }

    #[test]
    fn rank_and_unrank_combination_round_trip_all() {
        let n = 6;
        let m = 3;
        let mut z: Vec<usize> = (0..m).collect();
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_combination(&z, n), r);
            assert_eq!(unrank_combination(n, m, &r), z);
            if !successor::next_combination(&mut z, n) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_combination_rep_round_trip() {
        let n = 4;
        let m = 3;
        let mut z = vec![0usize; m];
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_combination_rep(&z, n), r);
            assert_eq!(unrank_combination_rep(n, m, &r), z);
            if !successor::next_combination_rep(&mut z, n) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_partial_permutation_round_trip() {
        let n = 5;
        let m = 3;
        let mut z: Vec<usize> = (0..m).collect();
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_permutation(&z, n), r);
            assert_eq!(unrank_permutation(n, m, &r), z);
            if !successor::next_partial_permutation(&mut z, n) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_permutation_rep_round_trip() {
        let n = 3;
        let m = 3;
        let mut z = vec![0usize; m];
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_permutation_rep(&z, n), r);
            assert_eq!(unrank_permutation_rep(n, m, &r), z);
            if !successor::next_permutation_rep(&mut z, n) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_multiset_combination_round_trip() {
        let reps = [2u32, 1, 2];
        let m = 3;
        let mut z = vec![0usize, 0, 1];
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_combination_multiset(&z, &reps), r);
            assert_eq!(unrank_combination_multiset(&reps, m, &r), z);
            if !successor::next_combination_multiset(&mut z, &reps) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_multiset_permutation_partial_round_trip() {
        let reps = [2u32, 1, 1];
        let m = 2;
        let mut z = vec![0usize, 0];
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_multiset_permutation(&z, &reps), r);
            assert_eq!(unrank_multiset_permutation(&reps, m, &r), z);
            if !successor::next_multiset_permutation_partial(&mut z, &reps) {
                break;
            }
            r += 1;
        }
    }

    #[test]
    fn rank_and_unrank_multiset_permutation_full_round_trip() {
        let reps = [2u32, 2];
        let m = 4;
        let mut z = vec![0usize, 0, 1, 1];
        let mut r = BigInt::zero();
        loop {
            assert_eq!(rank_multiset_permutation(&z, &reps), r);
            assert_eq!(unrank_multiset_permutation(&reps, m, &r), z);
            if !successor::next_permutation(&mut z) {
                break;
            }
            r += 1;
        }
    }
}
