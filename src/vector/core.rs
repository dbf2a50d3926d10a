use std::fmt;

use super::coercion::{CoercibleInto, Scalar};
use super::eval::evaluate;
use super::expr::{Constant, Ex, Expr, IndexMapping, IndexPlaceholder, VecRef};
use super::update::{Assign, Update};

/// Vector
///
/// A fixed-length numeric container: exactly `N` contiguous, unit-stride
/// elements, never resized. Arithmetic over vectors builds lazy
/// [`Expr`](super::expr::Expr) nodes; storage is only written through
/// assignment, compound assignment, or direct indexed writes.
///
/// The destination of an evaluation must not alias storage referenced by
/// the expression; the borrow rules enforce this for vectors from this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize> {
    data: [T; N],
}

impl<T, const N: usize> Vector<T, N>
where
    T: Scalar,
{
    /// Fill all `N` slots with `value`.
    pub fn broadcast(value: T) -> Self {
        Vector { data: [value; N] }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub(crate) fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Elementwise numeric cast into another element type, with the same
    /// semantics as a scalar `as` cast per element.
    pub fn convert<U>(&self) -> Vector<U, N>
    where
        U: Scalar,
        T: CoercibleInto<U>,
    {
        Vector {
            data: std::array::from_fn(|i| CoercibleInto::<U>::coerce_into(self.data[i])),
        }
    }

    /// View this vector as a lazy expression operand.
    pub fn as_expr(&self) -> Ex<VecRef<'_, T, N>, N> {
        Ex::new(VecRef::new(self))
    }

    /// Lift this vector into dimension `D` of a rank-general expression.
    ///
    /// The resulting node carries an unresolved placeholder and therefore
    /// routes to the rank-general evaluator, never the fast path.
    pub fn index_map<const D: usize>(
        &self,
        _index: IndexPlaceholder<D>,
    ) -> Ex<IndexMapping<VecRef<'_, T, N>, D>, N> {
        Ex::new(IndexMapping::<_, D>::new::<N>(VecRef::new(self)))
    }

    /// Evaluate `expr` elementwise into this vector in a single pass.
    ///
    /// # Panics
    ///
    /// Panics if the expression is not vector-only (it carries index
    /// placeholders or rank-general operands); such expressions go through
    /// [`evaluate_with`](super::eval::evaluate_with) and a rank-general
    /// evaluator instead.
    pub fn assign<E>(&mut self, expr: Ex<E, N>) -> &mut Self
    where
        E: Expr<N>,
        Assign: Update<T, E::Output>,
    {
        match evaluate(self, &expr, Assign) {
            Ok(()) => self,
            Err(e) => panic!("{}", e),
        }
    }

    /// Broadcast-store `value` through the expression engine.
    pub fn initialize(&mut self, value: T) -> &mut Self {
        self.assign(Ex::new(Constant(value)))
    }
}

impl<T, const N: usize> Default for Vector<T, N>
where
    T: Scalar,
{
    fn default() -> Self {
        Vector::broadcast(T::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N>
where
    T: Scalar,
{
    fn from(data: [T; N]) -> Self {
        Vector { data }
    }
}

/// Converting copy: elementwise cast from a vector of another element type.
impl<T, U, const N: usize> From<&Vector<U, N>> for Vector<T, N>
where
    T: Scalar,
    U: Scalar + CoercibleInto<T>,
{
    fn from(x: &Vector<U, N>) -> Self {
        x.convert()
    }
}

impl<T, const N: usize> std::ops::Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> std::ops::IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T, const N: usize> fmt::Display for Vector<T, N>
where
    T: Scalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_fills_every_slot() {
        let w: Vector<f64, 3> = Vector::broadcast(2.5);
        assert_eq!(w.as_slice(), &[2.5, 2.5, 2.5]);
    }

    #[test]
    fn assign_copies_and_detaches() {
        let mut b = Vector::from([1, 2, 3, 4]);
        let mut a: Vector<i32, 4> = Vector::default();
        a.assign(b.as_expr());
        assert_eq!(a, b);

        b[0] = 99;
        assert_eq!(a.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn initialize_broadcasts_through_the_expression_path() {
        let mut v = Vector::from([1, 2, 3]);
        v.initialize(7);
        assert_eq!(v.as_slice(), &[7, 7, 7]);
    }

    #[test]
    fn converting_copy_matches_scalar_casts() {
        let ints = Vector::from([1i32, -2, 3]);
        let floats: Vector<f64, 3> = Vector::from(&ints);
        assert_eq!(floats.as_slice(), &[1.0, -2.0, 3.0]);

        let halves = Vector::from([0.5f64, 1.5, -2.5]);
        let truncated: Vector<i32, 3> = halves.convert();
        assert_eq!(truncated.as_slice(), &[0.5f64 as i32, 1.5f64 as i32, -2.5f64 as i32]);
    }

    #[test]
    fn indexed_reads_and_writes() {
        let mut v = Vector::from([1, 2, 3]);
        assert_eq!(v[1], 2);
        v[1] = 20;
        assert_eq!(v[1], 20);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn display_lists_elements() {
        let v = Vector::from([1, 2, 3]);
        assert_eq!(format!("{}", v), "[1, 2, 3]");
    }
}
