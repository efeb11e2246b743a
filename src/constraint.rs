//! Monotone search with pruning for general (non-partition) aggregate
//! constraints (spec.md §4.7). `PartitionDesign` intercepts the
//! partition-reducible sum-equality cases before this module ever runs;
//! everything that reaches here is a `sum`/`product`/`mean`/`min`/`max`
//! aggregate compared against one or two targets over a combination
//! family, with `v` sorted ascending so growing a prefix only ever grows
//! (or holds) the aggregate.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Product,
    Mean,
    Min,
    Max,
}

impl Aggregate {
    pub fn apply(self, vals: &[f64]) -> f64 {
        match self {
            Aggregate::Sum => vals.iter().sum(),
            Aggregate::Product => vals.iter().product(),
            Aggregate::Mean => vals.iter().sum::<f64>() / vals.len() as f64,
            Aggregate::Min => vals.iter().cloned().fold(f64::INFINITY, f64::min),
            Aggregate::Max => vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Monotone prune is only meaningful for aggregates whose value over
    /// an ascending prefix moves predictably as more (larger-or-equal)
    /// elements are appended. `Min`/`Max` lock in as soon as the first
    /// (`Min`) or last (`Max`) element is chosen, which this module
    /// doesn't attempt to bound early — those two fall back to a
    /// depth-only check (never pruned, always correct, just less
    /// eager).
    fn is_prunable(self) -> bool {
        matches!(self, Aggregate::Sum | Aggregate::Product | Aggregate::Mean)
    }
}

/// A tagged comparison, per SPEC_FULL.md §9's "carries bound values
/// directly rather than function pointers." `Eq`'s tolerance is supplied
/// separately by the caller (spec.md §6's `tolerance` option) rather than
/// baked into the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Lt(f64),
    Le(f64),
    Gt(f64),
    Ge(f64),
    Eq(f64),
    /// Inclusive two-sided range `[lo, hi]`, already normalised per
    /// spec.md §6 ("`targets[0]` is the less-than bound, `targets[1]`
    /// the greater-than bound").
    Between(f64, f64),
}

impl Comparison {
    pub fn satisfied(self, x: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Lt(t) => x < t,
            Comparison::Le(t) => x <= t,
            Comparison::Gt(t) => x > t,
            Comparison::Ge(t) => x >= t,
            Comparison::Eq(t) => (x - t).abs() <= tolerance,
            Comparison::Between(lo, hi) => x >= lo - tolerance && x <= hi + tolerance,
        }
    }

    /// Could any completion of the current prefix, whose achievable
    /// aggregate lies in `[full_min, full_max]`, still satisfy this
    /// comparison? A relaxed (necessary, not sufficient) check used to
    /// prune whole lex-subtrees.
    fn relaxed(self, full_min: f64, full_max: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Lt(t) => full_min < t,
            Comparison::Le(t) => full_min <= t,
            Comparison::Gt(t) => full_max > t,
            Comparison::Ge(t) => full_max >= t,
            Comparison::Eq(t) => full_min <= t + tolerance && full_max >= t - tolerance,
            Comparison::Between(lo, hi) => full_min <= hi + tolerance && full_max >= lo - tolerance,
        }
    }
}

fn min_tail(v: &[f64], next_idx: usize, remaining: usize, rep: bool) -> f64 {
    if remaining == 0 {
        0.0
    } else if rep {
        v[next_idx] * remaining as f64
    } else {
        v[next_idx..next_idx + remaining].iter().sum()
    }
}

fn max_tail(v: &[f64], n: usize, remaining: usize, rep: bool) -> f64 {
    if remaining == 0 {
        0.0
    } else if rep {
        v[n - 1] * remaining as f64
    } else {
        v[n - remaining..n].iter().sum()
    }
}

fn bounds_for(aggregate: Aggregate, prefix: &[f64], v: &[f64], next_idx: usize, n: usize, m: usize, rep: bool) -> (f64, f64) {
    let remaining = m - prefix.len();
    match aggregate {
        Aggregate::Sum => {
            let prefix_sum: f64 = prefix.iter().sum();
            let tail_min = min_tail(v, next_idx, remaining, rep);
            let tail_max = max_tail(v, n, remaining, rep);
            (prefix_sum + tail_min, prefix_sum + tail_max)
        }
        Aggregate::Mean => {
            let prefix_sum: f64 = prefix.iter().sum();
            let tail_min = min_tail(v, next_idx, remaining, rep);
            let tail_max = max_tail(v, n, remaining, rep);
            ((prefix_sum + tail_min) / m as f64, (prefix_sum + tail_max) / m as f64)
        }
        Aggregate::Product => {
            let prefix_prod: f64 = prefix.iter().product();
            (
                prefix_prod * tail_min_product(v, next_idx, remaining, rep),
                prefix_prod * tail_max_product(v, n, remaining, rep),
            )
        }
        Aggregate::Min | Aggregate::Max => (f64::NEG_INFINITY, f64::INFINITY),
    }
}

fn tail_min_product(v: &[f64], next_idx: usize, remaining: usize, rep: bool) -> f64 {
    if remaining == 0 {
        1.0
    } else if rep {
        v[next_idx].powi(remaining as i32)
    } else {
        v[next_idx..next_idx + remaining].iter().product()
    }
}

fn tail_max_product(v: &[f64], n: usize, remaining: usize, rep: bool) -> f64 {
    if remaining == 0 {
        1.0
    } else if rep {
        v[n - 1].powi(remaining as i32)
    } else {
        v[n - remaining..n].iter().product()
    }
}

/// Enumerate every (`m`-width, from `n` sorted-ascending values of `v`)
/// combination whose aggregate satisfies `comparison`, using the
/// monotone prune when the aggregate/family allow it, and falling back
/// to a full enumerate-then-filter otherwise.
///
/// `b_lower` mirrors the original's `bLower`: the caller asked for a
/// specific rank window, which this module can't reconcile with
/// monotone pruning (the window is relative to the *unconstrained*
/// lexicographic order), so it forces the fallback.
pub fn search(
    v: &[f64],
    n: usize,
    m: usize,
    rep: bool,
    aggregate: Aggregate,
    comparison: Comparison,
    tolerance: f64,
    b_lower: bool,
) -> Vec<Vec<usize>> {
    let has_negative = v.iter().any(|&x| x < 0.0);
    let special_case = b_lower || (aggregate == Aggregate::Product && has_negative) || !aggregate.is_prunable();
    debug!(n, m, rep, ?aggregate, special_case, "constraint search dispatch");
    if special_case {
        return brute_force(v, n, m, rep, aggregate, comparison, tolerance);
    }
    let mut results = Vec::new();
    let mut z: Vec<usize> = Vec::with_capacity(m);
    let mut prefix_vals: Vec<f64> = Vec::with_capacity(m);
    monotone_dfs(v, n, m, rep, aggregate, comparison, tolerance, &mut z, &mut prefix_vals, &mut results);
    results
}

#[allow(clippy::too_many_arguments)]
fn monotone_dfs(
    v: &[f64],
    n: usize,
    m: usize,
    rep: bool,
    aggregate: Aggregate,
    comparison: Comparison,
    tolerance: f64,
    z: &mut Vec<usize>,
    prefix_vals: &mut Vec<f64>,
    results: &mut Vec<Vec<usize>>,
) {
    if z.len() == m {
        if comparison.satisfied(aggregate.apply(prefix_vals), tolerance) {
            results.push(z.clone());
        }
        return;
    }
    let start = if rep {
        z.last().copied().unwrap_or(0)
    } else {
        z.last().map(|&x| x + 1).unwrap_or(0)
    };
    let remaining_after = m - z.len() - 1;
    let last_allowed = if rep { n } else { n - remaining_after };
    for next in start..last_allowed {
        z.push(next);
        prefix_vals.push(v[next]);
        let (lo, hi) = bounds_for(aggregate, prefix_vals, v, next, n, m, rep);
        if comparison.relaxed(lo, hi, tolerance) {
            monotone_dfs(v, n, m, rep, aggregate, comparison, tolerance, z, prefix_vals, results);
        }
        prefix_vals.pop();
        z.pop();
    }
}

fn brute_force(
    v: &[f64],
    n: usize,
    m: usize,
    rep: bool,
    aggregate: Aggregate,
    comparison: Comparison,
    tolerance: f64,
) -> Vec<Vec<usize>> {
    let mut results = Vec::new();
    let mut z: Vec<usize> = (0..m).collect();
    if m > n {
        return results;
    }
    loop {
        let vals: Vec<f64> = z.iter().map(|&i| v[i]).collect();
        if comparison.satisfied(aggregate.apply(&vals), tolerance) {
            results.push(z.clone());
        }
        let advanced = if rep {
            crate::successor::next_combination_rep(&mut z, n)
        } else {
            crate::successor::next_combination(&mut z, n)
        };
        if !advanced {
            break;
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_less_than_target_matches_brute_force() {
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let pruned = search(&v, 5, 3, false, Aggregate::Sum, Comparison::Lt(8.0), 0.0, false);
        let brute = brute_force(&v, 5, 3, false, Aggregate::Sum, Comparison::Lt(8.0), 0.0);
        assert_eq!(pruned, brute);
        assert!(!pruned.is_empty());
    }

    #[test]
    fn between_comparison_matches_brute_force() {
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cmp = Comparison::Between(7.0, 9.0);
        let pruned = search(&v, 6, 3, false, Aggregate::Sum, cmp, 0.0, false);
        let brute = brute_force(&v, 6, 3, false, Aggregate::Sum, cmp, 0.0);
        assert_eq!(pruned, brute);
    }

    #[test]
    fn product_with_negative_values_forces_fallback_but_is_still_correct() {
        let v = vec![-3.0, -1.0, 2.0, 4.0];
        let cmp = Comparison::Gt(0.0);
        let pruned = search(&v, 4, 2, false, Aggregate::Product, cmp, 0.0, false);
        let brute = brute_force(&v, 4, 2, false, Aggregate::Product, cmp, 0.0);
        assert_eq!(pruned, brute);
    }

    #[test]
    fn min_aggregate_falls_back_and_matches_brute_force() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        let cmp = Comparison::Ge(2.0);
        let pruned = search(&v, 4, 2, false, Aggregate::Min, cmp, 0.0, false);
        let brute = brute_force(&v, 4, 2, false, Aggregate::Min, cmp, 0.0);
        assert_eq!(pruned, brute);
    }
}
