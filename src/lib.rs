//! A high-performance enumeration engine for combinations, permutations,
//! and integer partitions over finite sequences (SPEC_FULL.md §1).
//!
//! The per-family algorithms ([`count`], [`rank`], [`successor`],
//! [`enumerate`]) are generic over any [`value::Element`] and have no
//! dependency on `Request`. The facade in this module — [`combinatorics`],
//! [`count_request`], [`nth`], [`cursor`] — targets the arithmetic-capable
//! [`value::Number`] subset, since constraints, partitions, and
//! `keep_result` all need to compute an aggregate; a caller enumerating a
//! `char`/`bool`/`Factor` sequence with no constraint can call
//! [`enumerate::enumerate_dense`] directly instead of going through
//! `Request`.

pub mod bignum;
pub mod config;
pub mod constraint;
pub mod count;
pub mod cursor;
pub mod enumerate;
pub mod error;
pub mod family;
pub mod logging;
pub mod partition;
pub mod rank;
pub mod request;
pub mod successor;
pub mod value;

use bignum::Count;
use config::EngineConfig;
use constraint::{Aggregate, Comparison};
use cursor::Cursor;
use error::{EngineError, Result};
use num_bigint::BigInt;
use partition::design::{recognize as recognize_partition, PartDesign};
use partition::enumerate::{first_partition, next_partition};
use request::{resolve_window, Request};
use std::collections::HashMap;
use value::Number;

/// Recognise `sum(z) == target` as a partition, when the constraint is an
/// exact-sum equality over integral `v` and the request has no rank window
/// (a window needs a position within the *unconstrained* lexicographic
/// order, which the partition enumerator doesn't track).
fn recognize_sum_partition<V: Number>(
    request: &Request<V>,
    aggregate: Aggregate,
    comparison: Comparison,
) -> Option<PartDesign> {
    if request.b_lower() || aggregate != Aggregate::Sum {
        return None;
    }
    let Comparison::Eq(target) = comparison else { return None };
    let v_int: Vec<i64> = request.v.iter().map(|x| x.as_integral()).collect::<Option<_>>()?;
    let design = recognize_partition(&v_int, request.m, target as i64, request.family, request.reps.as_deref());
    design.is_ranged().then_some(design)
}

/// Walk the ranged partition `design` describes, yielding index rows into
/// `v` (spec.md §2's "partition-reducible calls take the specialised
/// path"). Mirrors `constraint::search`'s `Vec<Vec<usize>>` shape so
/// callers can treat the two paths identically afterwards.
fn partition_index_rows<V: Number>(v: &[V], design: &PartDesign) -> Vec<Vec<usize>> {
    let strict = !design.rep_allowed;
    let mut value_to_index: HashMap<i64, usize> = HashMap::new();
    for (i, x) in v.iter().enumerate() {
        if let Some(iv) = x.as_integral() {
            value_to_index.entry(iv).or_insert(i);
        }
    }

    let Some(mut z) = first_partition(design.lo, design.hi, design.width, design.mapped_target, strict) else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    loop {
        let row: Option<Vec<usize>> = z
            .iter()
            .map(|&part| value_to_index.get(&(part * design.slope + design.shift)).copied())
            .collect();
        if let Some(row) = row {
            rows.push(row);
        }
        if !next_partition(&mut z, design.lo, design.hi, strict) {
            break;
        }
    }
    rows
}

/// Exact cardinality of a request, taking any recognised partition shape
/// or general constraint into account.
pub fn count_request<V: Number>(request: &Request<V>) -> Result<Count> {
    let n = request.n() as u64;
    let m = request.m as u64;
    let reps = request.reps.as_deref();

    if let Some((aggregate, comparison, tolerance)) = &request.constraint {
        let target = match comparison {
            Comparison::Eq(t) => Some(*t),
            Comparison::Between(lo, _) => Some(*lo),
            _ => None,
        };
        if let (Aggregate::Sum, Some(target)) = (aggregate, target) {
            let v_int: Option<Vec<i64>> = request.v.iter().map(|x| x.as_integral()).collect();
            if let Some(v_int) = v_int {
                let design = recognize_partition(&v_int, request.m, target as i64, request.family, reps);
                if design.is_partition() {
                    return Ok(design.count);
                }
            }
        }
        let v_f64: Vec<f64> = request.v.iter().map(|x| x.to_f64()).collect();
        let rows = constraint::search(
            &v_f64,
            request.n(),
            request.m,
            request.family.allows_repeated_indices(),
            *aggregate,
            *comparison,
            *tolerance,
            request.b_lower(),
        );
        return Ok(Count::from_u64(rows.len() as u64));
    }

    Ok(count::count(request.family, n, m, reps))
}

/// The `combinatorics` entry point of spec.md §6: resolve `[lower,
/// upper]`, run the constrained search or dense enumeration, and
/// optionally append the aggregate as a trailing column
/// (`keep_result`).
pub fn combinatorics<V: Number>(request: &Request<V>, config: &EngineConfig) -> Result<Vec<V>> {
    let n = request.n();
    let m = request.m;
    let reps = request.reps.as_deref();

    if let Some((aggregate, comparison, tolerance)) = &request.constraint {
        let index_rows = match recognize_sum_partition(request, *aggregate, *comparison) {
            Some(design) => partition_index_rows(&request.v, &design),
            None => {
                let v_f64: Vec<f64> = request.v.iter().map(|x| x.to_f64()).collect();
                constraint::search(
                    &v_f64,
                    n,
                    m,
                    request.family.allows_repeated_indices(),
                    *aggregate,
                    *comparison,
                    *tolerance,
                    request.b_lower(),
                )
            }
        };
        let mut out = Vec::with_capacity(index_rows.len() * (m + request.keep_result as usize));
        for row in &index_rows {
            let vals: Vec<V> = row.iter().map(|&i| request.v[i]).collect();
            if request.keep_result {
                let as_f64: Vec<f64> = vals.iter().map(|x| x.to_f64()).collect();
                let agg = aggregate.apply(&as_f64);
                out.extend(vals);
                out.push(V::from_f64(agg));
            } else {
                out.extend(vals);
            }
        }
        return Ok(out);
    }

    let total = count::count(request.family, n as u64, m as u64, reps).to_big();
    let (start, n_rows) = resolve_window(request.lower.as_ref(), request.upper.as_ref(), &total)?;
    if BigInt::from(n_rows) > BigInt::from(config.max_rows) {
        return Err(EngineError::overflow("upper"));
    }

    let parallel = request.parallel || config.should_parallelise(n_rows);
    let flat = enumerate::enumerate_dense(
        &request.v,
        request.family,
        n,
        m,
        reps,
        &start,
        n_rows,
        parallel,
        request.n_threads.or(config.default_n_threads),
        &total,
    );

    if let Some(apply_fun) = &request.apply_fun {
        let mut out = Vec::new();
        for row in flat.chunks(m) {
            if apply_fun(row) {
                out.extend_from_slice(row);
            }
        }
        return Ok(out);
    }

    Ok(flat)
}

/// The `nth` entry point: the element tuple at a single 1-based `index`.
pub fn nth<V: Number>(request: &Request<V>, index: BigInt) -> Result<Vec<V>> {
    let n = request.n();
    let reps = request.reps.as_deref();
    let total = count::count(request.family, n as u64, request.m as u64, reps).to_big();
    let rank0 = &index - 1;
    if rank0 < BigInt::from(0) || rank0 >= total {
        return Err(EngineError::invalid("index", "out of range"));
    }
    let z = enumerate::unrank_start(request.family, n, request.m, reps, &rank0);
    Ok(z.into_iter().map(|i| request.v[i]).collect())
}

/// The `cursor` entry point: a stateful iterator positioned at rank 0.
pub fn cursor<V: Number>(request: &Request<V>) -> Result<Cursor<'_, V>> {
    let n = request.n();
    let reps = request.reps.as_deref();
    let total = count::count(request.family, n as u64, request.m as u64, reps).to_big();
    Cursor::new(&request.v, request.family, request.m, reps, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use family::Family;
    use request::RequestBuilder;

    #[test]
    fn combinatorics_enumerates_full_matrix_matching_count() {
        let config = EngineConfig::default();
        let request = RequestBuilder::new(vec![1i64, 2, 3, 4, 5], Family::CombinationsNoRep)
            .with_m(3)
            .build(&config)
            .unwrap();
        let rows = combinatorics(&request, &config).unwrap();
        assert_eq!(rows.len(), 10 * 3);
    }

    #[test]
    fn nth_matches_first_row_of_full_enumeration() {
        let config = EngineConfig::default();
        let request = RequestBuilder::new(vec![1i64, 2, 3, 4, 5], Family::CombinationsNoRep)
            .with_m(3)
            .build(&config)
            .unwrap();
        let rows = combinatorics(&request, &config).unwrap();
        let first_row = nth(&request, BigInt::from(1)).unwrap();
        assert_eq!(first_row, rows[0..3].to_vec());
    }

    #[test]
    fn combinatorics_dispatches_sum_constraint_through_partition_enumerate() {
        let config = EngineConfig::default();
        let request = RequestBuilder::new(vec![1i64, 2, 3, 4, 5], Family::CombinationsNoRep)
            .with_m(3)
            .with_constraint(Aggregate::Sum, Comparison::Eq(9.0), config.default_tolerance)
            .build(&config)
            .unwrap();
        let rows = combinatorics(&request, &config).unwrap();
        assert_eq!(rows, vec![1, 3, 5, 2, 3, 4]);
    }

    #[test]
    fn constrained_permutation_request_is_rejected() {
        let config = EngineConfig::default();
        let err = RequestBuilder::new(vec![1i64, 2, 3, 4, 5], Family::PermutationsNoRep)
            .with_m(3)
            .with_constraint(Aggregate::Sum, Comparison::Eq(9.0), config.default_tolerance)
            .build(&config);
        assert!(err.is_err());
    }

    #[test]
    fn cursor_first_row_matches_nth_one() {
        let config = EngineConfig::default();
        let request = RequestBuilder::new(vec![1i64, 2, 3, 4, 5], Family::CombinationsNoRep)
            .with_m(3)
            .build(&config)
            .unwrap();
        let c = cursor(&request).unwrap();
        assert_eq!(c.current(), nth(&request, BigInt::from(1)).unwrap());
    }
}
