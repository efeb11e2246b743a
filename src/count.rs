//! Exact cardinality for every family (SPEC_FULL.md §4.1).
//!
//! Every formula here is implemented directly over [`Count`], so the
//! `f64`→`BigInt` promotion threshold is crossed transparently wherever it
//! happens to occur, and the caller never has to think about it.

use crate::bignum::{count_factorial, Count};
use crate::family::Family;
use tracing::trace;

/// `C(n, m)`, computed via the standard multiplicative recurrence
/// `C(n, m) = C(n, m-1) * (n - m + 1) / m`, using the symmetry
/// `C(n, m) == C(n, n - m)` to minimise the number of multiplications.
pub fn combinations_no_rep(n: u64, m: u64) -> Count {
    if m > n {
        return Count::zero();
    }
    let m = m.min(n - m);
    let mut acc = Count::one();
    for i in 0..m {
        acc = acc.mul_u64(n - i);
        acc = acc.div_exact_u64(i + 1);
    }
    acc
}

/// `C(n + m - 1, m)`.
pub fn combinations_rep(n: u64, m: u64) -> Count {
    if n == 0 {
        return if m == 0 { Count::one() } else { Count::zero() };
    }
    combinations_no_rep(n + m - 1, m)
}

/// The falling factorial `n * (n-1) * ... * (n-m+1)`.
pub fn permutations_no_rep(n: u64, m: u64) -> Count {
    if m > n {
        return Count::zero();
    }
    let mut acc = Count::one();
    for i in 0..m {
        acc = acc.mul_u64(n - i);
    }
    acc
}

/// `n^m`.
pub fn permutations_rep(n: u64, m: u64) -> Count {
    if n == 0 {
        return if m == 0 { Count::one() } else { Count::zero() };
    }
    Count::from_u64(n).pow_u32(m as u32)
}

/// Dynamic-programming recurrence over a `(m+1) x len(reps)` table:
/// `f(i, s)` is the number of ways to choose `s` items total from the
/// first `i` distinct kinds, respecting `reps[0..i]`.
pub fn multiset_combinations(reps: &[u32], m: usize) -> Count {
    let total: u64 = reps.iter().map(|&r| r as u64).sum();
    if m as u64 > total {
        return Count::zero();
    }
    let mut dp = vec![Count::zero(); m + 1];
    dp[0] = Count::one();
    for &r in reps {
        let mut next = vec![Count::zero(); m + 1];
        for s in 0..=m {
            let cap = (r as usize).min(s);
            let mut acc = Count::zero();
            for take in 0..=cap {
                acc = acc.add(&dp[s - take]);
            }
            next[s] = acc;
        }
        dp = next;
    }
    dp[m].clone()
}

/// `(sum reps)! / prod(reps[i]!)`: arrangements of the whole multiset.
pub fn multiset_permutations_full(reps: &[u32]) -> Count {
    let total: u64 = reps.iter().map(|&r| r as u64).sum();
    let mut acc = count_factorial(total);
    for &r in reps {
        acc = acc.div_exact(&count_factorial(r as u64));
    }
    acc
}

/// A length-`m` DP marginalising over each kind's usage from `0` to
/// `reps[i]`: `P(i, s) = sum_{c=0}^{min(reps[i], s)} C(s, c) * P(i-1, s-c)`,
/// since choosing which `c` of the `s` output slots hold kind `i` costs a
/// factor of `C(s, c)`, and the rest are filled by the first `i-1` kinds.
pub fn multiset_permutations_partial(reps: &[u32], m: usize) -> Count {
    let mut dp = vec![Count::zero(); m + 1];
    dp[0] = Count::one();
    for &r in reps {
        let mut next = vec![Count::zero(); m + 1];
        for s in 0..=m {
            let cap = (r as usize).min(s);
            let mut acc = Count::zero();
            for c in 0..=cap {
                let binom = combinations_no_rep(s as u64, c as u64);
                acc = acc.add(&binom.mul(&dp[s - c]));
            }
            next[s] = acc;
        }
        dp = next;
    }
    dp[m].clone()
}

/// Top-level dispatch matching SPEC_FULL.md §6's `count(...)` entry point.
/// `reps` is `Some` only for the multiset families.
pub fn count(family: Family, n: u64, m: u64, reps: Option<&[u32]>) -> Count {
    let result = match family {
        Family::CombinationsNoRep => combinations_no_rep(n, m),
        Family::CombinationsRep => combinations_rep(n, m),
        Family::PermutationsNoRep => permutations_no_rep(n, m),
        Family::PermutationsRep => permutations_rep(n, m),
        Family::MultisetCombinations => {
            multiset_combinations(reps.expect("multiset family requires reps"), m as usize)
        }
        Family::MultisetPermutationsFull => {
            multiset_permutations_full(reps.expect("multiset family requires reps"))
        }
        Family::MultisetPermutationsPartial => {
            multiset_permutations_partial(reps.expect("multiset family requires reps"), m as usize)
        }
    };
    trace!(?family, n, m, count = ?result, "computed cardinality");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_1_to_5_choose_3() {
        // Scenario 1 of SPEC_FULL.md / spec.md §8.
        assert_eq!(combinations_no_rep(5, 3).to_u64(), Some(10));
    }

    #[test]
    fn permutations_rep_0_to_3_width_3() {
        // Scenario 2.
        assert_eq!(permutations_rep(3, 3).to_u64(), Some(64));
    }

    #[test]
    fn multiset_combinations_matches_scenario_3() {
        // v=(1,2,3), freqs=(2,1,2), m=3 -> 6 rows.
        assert_eq!(multiset_combinations(&[2, 1, 2], 3).to_u64(), Some(6));
    }

    #[test]
    fn count_1_to_20_choose_10() {
        // Scenario 4.
        assert_eq!(combinations_no_rep(20, 10).to_u64(), Some(184_756));
        assert_eq!(combinations_rep(20, 10).to_u64(), Some(20_030_010));
    }

    #[test]
    fn combinations_rep_matches_stars_and_bars() {
        for n in 1..8u64 {
            for m in 0..8u64 {
                let direct = combinations_no_rep(n + m - 1, m);
                assert_eq!(combinations_rep(n, m), direct);
            }
        }
    }

    #[test]
    fn multiset_permutations_full_matches_factorial_identity() {
        // Full word arrangement of reps=[2,2]: 4!/(2!2!) = 6
        assert_eq!(multiset_permutations_full(&[2, 2]).to_u64(), Some(6));
    }

    #[test]
    fn multiset_permutations_partial_matches_full_at_max_width() {
        let reps = [2u32, 1, 3];
        let total: usize = reps.iter().map(|&r| r as usize).sum();
        assert_eq!(
            multiset_permutations_partial(&reps, total),
            multiset_permutations_full(&reps)
        );
    }

    #[test]
    fn combinations_no_rep_matches_brute_force_for_small_n() {
        use itertools::Itertools;
        for n in 0..8usize {
            for m in 0..=n {
                let brute = (0..n).combinations(m).count() as u64;
                assert_eq!(combinations_no_rep(n as u64, m as u64).to_u64(), Some(brute));
            }
        }
    }

    #[test]
    fn permutations_no_rep_matches_brute_force_for_small_n() {
        use itertools::Itertools;
        for n in 0..7usize {
            for m in 0..=n {
                let brute = (0..n).permutations(m).count() as u64;
                assert_eq!(permutations_no_rep(n as u64, m as u64).to_u64(), Some(brute));
            }
        }
    }
}
