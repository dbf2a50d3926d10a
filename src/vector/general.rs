use super::coercion::Scalar;
use super::core::Vector;
use super::expr::Expr;
use super::update::Update;
use crate::error::Error;

/// Seam to the external rank-general evaluator.
///
/// Expressions that fail fast-path eligibility are handed here unmodified.
/// Implementations must honor the same update contract as the fast path:
/// one combine-and-store per destination element, driven by lazy reads,
/// with no intermediate containers.
pub trait GeneralEvaluator {
    fn evaluate<T, E, U, const N: usize>(
        &self,
        dest: &mut Vector<T, N>,
        expr: &E,
        update: U,
    ) -> Result<(), Error>
    where
        T: Scalar,
        E: Expr<N>,
        U: Update<T, E::Output>;
}

/// Default seam with no rank-general engine wired in.
///
/// Reports the classification that forced delegation as a typed error.
/// These are non-retryable: the same expression will always classify the
/// same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unplumbed;

impl GeneralEvaluator for Unplumbed {
    fn evaluate<T, E, U, const N: usize>(
        &self,
        _dest: &mut Vector<T, N>,
        expr: &E,
        _update: U,
    ) -> Result<(), Error>
    where
        T: Scalar,
        E: Expr<N>,
        U: Update<T, E::Output>,
    {
        let meta = expr.meta();
        if meta.placeholders > 0 {
            Err(Error::UnexpectedPlaceholder(meta.placeholders))
        } else {
            Err(Error::RankTooHigh(meta.rank))
        }
    }
}
