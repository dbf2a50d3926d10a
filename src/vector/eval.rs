//! Dispatch and loop strategy for elementwise evaluation.
//!
//! [`evaluate`] intercepts vector-only expressions and drives a single
//! in-order pass over the destination: N lazy reads, N combine-and-stores,
//! nothing materialized in between. Everything else is handed, unmodified,
//! to the rank-general seam.
//!
//! The pass itself is chosen by length: below [`UNROLL_LENGTH`] the
//! build-generated straight-line body runs, otherwise a runtime loop. The
//! strategies are observably identical; only the execution shape differs.

use super::coercion::Scalar;
use super::core::Vector;
use super::expr::Expr;
use super::general::{GeneralEvaluator, Unplumbed};
use super::update::Update;
use crate::error::Error;
use crate::shape_err;

include!(concat!(env!("OUT_DIR"), "/unrolled.rs"));

/// Storage alignment hint for the runtime loop.
///
/// `Aligned` is the default for vectors owned by this crate. `Unaligned`
/// exists for rank-general callers driving reinterpreted storage and is
/// not reachable through ordinary vector arithmetic. The hint never
/// changes observable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Aligned,
    Unaligned,
}

/// Evaluate `expr` into `dest` under `update`, with no rank-general
/// engine available.
pub fn evaluate<T, E, U, const N: usize>(
    dest: &mut Vector<T, N>,
    expr: &E,
    update: U,
) -> Result<(), Error>
where
    T: Scalar,
    E: Expr<N>,
    U: Update<T, E::Output>,
{
    evaluate_with(dest, expr, update, &Unplumbed)
}

/// Evaluate `expr` into `dest` under `update`, delegating expressions
/// outside the vector-only fast path to `general`.
///
/// No element is read or written until every precondition holds; on
/// success exactly `N` reads and `N` combine-and-stores happen. The error
/// kinds are precondition violations: programmer errors, not retryable
/// runtime conditions.
pub fn evaluate_with<T, E, U, G, const N: usize>(
    dest: &mut Vector<T, N>,
    expr: &E,
    update: U,
    general: &G,
) -> Result<(), Error>
where
    T: Scalar,
    E: Expr<N>,
    U: Update<T, E::Output>,
    G: GeneralEvaluator,
{
    let meta = expr.meta();
    if !meta.vector_only() {
        // not vector-only, punt to the rank-general evaluator
        return general.evaluate(dest, expr, update);
    }

    if !expr.shape_check(N) {
        if cfg!(debug_assertions) {
            let mut rendered = String::new();
            expr.pretty(&mut rendered);
            eprintln!(
                "[fixvec] shape check failed: module {} line {}\n          expression: {}",
                file!(),
                line!(),
                rendered
            );
        }
        return Err(shape_err!(expr));
    }
    if !expr.unit_stride() {
        return Err(Error::NonUnitStride);
    }
    if meta.rank > 1 {
        return Err(Error::RankTooHigh(meta.rank));
    }

    run(dest.as_mut_array(), expr, update, Alignment::Aligned);
    Ok(())
}

/// Drive one full pass over `data`, selecting the loop strategy by length.
///
/// Exposed for rank-general callers that hold raw storage; ordinary code
/// goes through [`evaluate`].
pub fn run<T, E, U, const N: usize>(data: &mut [T; N], expr: &E, _update: U, alignment: Alignment)
where
    T: Scalar,
    E: Expr<N>,
    U: Update<T, E::Output>,
{
    if N < UNROLL_LENGTH {
        unrolled::<T, E, U, N>(data, expr);
        return;
    }

    // Both arms traverse indices in ascending order and produce identical
    // destination contents; the split only carries the vectorization hint.
    match alignment {
        Alignment::Aligned => {
            for (i, slot) in data.iter_mut().enumerate() {
                U::update(slot, expr.read(i));
            }
        }
        Alignment::Unaligned => {
            let data = data.as_mut_slice();
            for i in 0..N {
                U::update(&mut data[i], expr.read(i));
            }
        }
    }
}
