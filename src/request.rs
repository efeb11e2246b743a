//! The immutable request descriptor argument normalisation produces
//! (spec.md §3 "Lifecycle", SPEC_FULL.md §6), built through
//! [`RequestBuilder`] so every option is validated exactly once, up
//! front, per spec.md §7.

use crate::config::EngineConfig;
use crate::constraint::{Aggregate, Comparison};
use crate::error::{EngineError, Result};
use crate::family::Family;
use crate::value::Element;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// A validated request: everything downstream (`count`, `enumerate`,
/// `nth`, `cursor`) reads from this rather than re-checking options.
pub struct Request<V: Element> {
    pub v: Vec<V>,
    pub m: usize,
    pub family: Family,
    pub reps: Option<Vec<u32>>,
    pub lower: Option<BigInt>,
    pub upper: Option<BigInt>,
    pub constraint: Option<(Aggregate, Comparison, f64)>,
    pub apply_fun: Option<Box<dyn Fn(&[V]) -> bool>>,
    pub keep_result: bool,
    pub parallel: bool,
    pub n_threads: Option<usize>,
}

impl<V: Element> Request<V> {
    pub fn n(&self) -> usize {
        self.v.len()
    }

    /// `true` if the caller asked for a specific rank window rather than
    /// the full enumeration — this is spec.md §4.7's `bLower`, which
    /// forces `ConstraintEngine`'s special-case fallback.
    pub fn b_lower(&self) -> bool {
        self.lower.is_some()
    }
}

pub struct RequestBuilder<V: Element> {
    v: Vec<V>,
    m: Option<usize>,
    family: Family,
    reps: Option<Vec<u32>>,
    lower: Option<BigInt>,
    upper: Option<BigInt>,
    constraint: Option<(Aggregate, Comparison, f64)>,
    apply_fun: Option<Box<dyn Fn(&[V]) -> bool>>,
    keep_result: bool,
    parallel: bool,
    n_threads: Option<usize>,
}

impl<V: Element> RequestBuilder<V> {
    pub fn new(v: Vec<V>, family: Family) -> Self {
        RequestBuilder {
            v,
            m: None,
            family,
            reps: None,
            lower: None,
            upper: None,
            constraint: None,
            apply_fun: None,
            keep_result: false,
            parallel: false,
            n_threads: None,
        }
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = Some(m);
        self
    }

    pub fn with_freqs(mut self, reps: Vec<u32>) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_lower_upper(mut self, lower: Option<BigInt>, upper: Option<BigInt>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn with_constraint(mut self, aggregate: Aggregate, comparison: Comparison, tolerance: f64) -> Self {
        self.constraint = Some((aggregate, comparison, tolerance));
        self
    }

    pub fn with_apply_fun(mut self, f: Box<dyn Fn(&[V]) -> bool>) -> Self {
        self.apply_fun = Some(f);
        self
    }

    pub fn with_parallel(mut self, parallel: bool, n_threads: Option<usize>) -> Self {
        self.parallel = parallel;
        self.n_threads = n_threads;
        self
    }

    pub fn with_keep_result(mut self, keep_result: bool) -> Self {
        self.keep_result = keep_result;
        self
    }

    /// Validates every option per spec.md §6/§7 and produces an
    /// immutable [`Request`]. Normalises two-limit comparisons so
    /// `targets[0]` is always the "less-than" bound (spec.md §6's
    /// "Comparison normalisation").
    pub fn build(self, config: &EngineConfig) -> Result<Request<V>> {
        if self.v.is_empty() {
            return Err(EngineError::invalid("v", "must be non-empty"));
        }
        let m = self.m.unwrap_or(self.v.len());
        if m == 0 {
            return Err(EngineError::invalid("m", "must be at least 1"));
        }

        if let Some(reps) = &self.reps {
            if reps.len() != self.v.len() {
                return Err(EngineError::invalid("freqs", "length must match v"));
            }
            if reps.iter().any(|&r| r == 0) {
                return Err(EngineError::invalid("freqs", "frequencies must be positive"));
            }
        }

        if !self.family.is_combination() && self.family != Family::PermutationsRep {
            let n = self.v.len();
            if m > n && !self.family.allows_repeated_indices() {
                return Err(EngineError::invalid("m", "cannot exceed length of v without repetition"));
            }
        }

        if let (Some(lo), Some(hi)) = (&self.lower, &self.upper) {
            if lo > hi {
                return Err(EngineError::invalid("lower/upper", "lower must not exceed upper"));
            }
        }

        let constraint = match self.constraint {
            Some((agg, Comparison::Between(lo, hi), tol)) if lo > hi => {
                Some((agg, Comparison::Between(hi, lo), tol))
            }
            other => other,
        };

        if constraint.is_some() && self.apply_fun.is_some() {
            return Err(EngineError::unsupported(
                "apply_fun",
                "cannot be combined with a constraint in the same request",
            ));
        }

        if constraint.is_some() && !self.family.is_combination() {
            return Err(EngineError::unsupported(
                "family",
                "constrained requests select a subset of v, not an arrangement of it; pass a combination family and permute the result separately",
            ));
        }

        let n_rows_cap = BigInt::from(config.max_rows);
        if let (Some(lo), Some(hi)) = (&self.lower, &self.upper) {
            let span = hi - lo + BigInt::from(1);
            if span > n_rows_cap {
                return Err(EngineError::overflow("lower/upper"));
            }
        }

        Ok(Request {
            v: self.v,
            m,
            family: self.family,
            reps: self.reps,
            lower: self.lower,
            upper: self.upper,
            constraint,
            apply_fun: self.apply_fun,
            keep_result: self.keep_result,
            parallel: self.parallel,
            n_threads: self.n_threads,
        })
    }
}

/// Resolve a request's `[lower, upper]` window into a 0-indexed start
/// rank and row count against a known total, per spec.md §3's
/// "resolves `[lower, upper]` into an index-tuple start `z` and a row
/// count."
pub fn resolve_window(lower: Option<&BigInt>, upper: Option<&BigInt>, total: &BigInt) -> Result<(BigInt, u64)> {
    let start = lower.map(|l| l - 1).unwrap_or_else(|| BigInt::from(0));
    let end = upper.cloned().unwrap_or_else(|| total.clone());
    if &start < &BigInt::from(0) || &end > total {
        return Err(EngineError::invalid("lower/upper", "rank window out of range"));
    }
    let n_rows = (&end - &start).to_u64().ok_or_else(|| EngineError::overflow("upper"))?;
    Ok((start, n_rows))
}
