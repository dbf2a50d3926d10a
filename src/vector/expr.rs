use std::any::type_name;
use std::marker::PhantomData;

use super::coercion::{CommonNum, Scalar};
use super::core::Vector;

/// Classification of an expression, fixed at construction time.
///
/// The dispatcher consults this record, never the elements, to decide
/// between the vector-only fast path and delegation to a rank-general
/// evaluator. Composite nodes sum the operand and placeholder counts of
/// their children and take the maximum rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprMeta {
    /// Count of rank-general array operands. Always zero for expressions
    /// this crate constructs; reserved for the delegation contract.
    pub array_operands: usize,
    /// Count of unresolved index placeholders.
    pub placeholders: usize,
    /// 0 for constants, 1 for vector references, higher only through the
    /// rank-general seam.
    pub rank: usize,
}

impl ExprMeta {
    pub fn scalar() -> Self {
        ExprMeta::default()
    }

    pub fn vector() -> Self {
        ExprMeta {
            rank: 1,
            ..ExprMeta::default()
        }
    }

    pub fn combine(self, other: Self) -> Self {
        ExprMeta {
            array_operands: self.array_operands + other.array_operands,
            placeholders: self.placeholders + other.placeholders,
            rank: self.rank.max(other.rank),
        }
    }

    /// Eligibility for the vector-only fast path.
    pub fn vector_only(&self) -> bool {
        self.array_operands == 0 && self.placeholders == 0 && self.rank <= 1
    }
}

/// A lazily evaluated elementwise computation over length-`N` operands.
///
/// Nodes are immutable values; [`read`](Expr::read) is pure and safe to
/// call in any order. Nothing is materialized until an assignment drives
/// the evaluator.
pub trait Expr<const N: usize> {
    type Output: Scalar;

    /// The computed value at index `i`.
    fn read(&self, i: usize) -> Self::Output;

    /// Classification record for dispatch, computable without reading any
    /// element.
    fn meta(&self) -> ExprMeta;

    /// Whether every array-like operand agrees with `len`.
    fn shape_check(&self, len: usize) -> bool;

    /// Whether consecutive logical elements occupy consecutive slots. Every
    /// node this crate constructs iterates contiguously.
    fn unit_stride(&self) -> bool {
        true
    }

    /// Terse textual rendering used by the shape-check diagnostic.
    fn pretty(&self, buf: &mut String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BinOpKind {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnOpKind {
    #[strum(serialize = "-")]
    Neg,
}

pub trait BinOp {
    const KIND: BinOpKind;
}

/// Application of a binary operator on the promoted common type.
pub trait BinKernel<C>: BinOp {
    fn apply(l: C, r: C) -> C;
}

macro_rules! bin_op {
    ( $name:ident, $kind:ident, $trait:ident, $method:ident ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl BinOp for $name {
            const KIND: BinOpKind = BinOpKind::$kind;
        }

        impl<C> BinKernel<C> for $name
        where
            C: std::ops::$trait<Output = C>,
        {
            #[inline]
            fn apply(l: C, r: C) -> C {
                std::ops::$trait::$method(l, r)
            }
        }
    };
}

bin_op!(OpAdd, Add, Add, add);
bin_op!(OpSub, Sub, Sub, sub);
bin_op!(OpMul, Mul, Mul, mul);
bin_op!(OpDiv, Div, Div, div);

pub trait UnaryOp {
    const KIND: UnOpKind;
}

pub trait UnaryKernel<C>: UnaryOp {
    fn apply(x: C) -> C;
}

#[derive(Debug, Clone, Copy)]
pub struct OpNeg;

impl UnaryOp for OpNeg {
    const KIND: UnOpKind = UnOpKind::Neg;
}

impl<C> UnaryKernel<C> for OpNeg
where
    C: std::ops::Neg<Output = C>,
{
    #[inline]
    fn apply(x: C) -> C {
        -x
    }
}

/// Wrapper that carries the expression length and hosts the operator
/// impls, so nodes compose with `+`, `-`, `*`, `/` without evaluating.
#[derive(Debug, Clone, Copy)]
pub struct Ex<E, const N: usize>(pub(crate) E);

impl<E, const N: usize> Ex<E, N> {
    pub fn new(expr: E) -> Self
    where
        E: Expr<N>,
    {
        Ex(expr)
    }
}

impl<E, const N: usize> Expr<N> for Ex<E, N>
where
    E: Expr<N>,
{
    type Output = E::Output;

    #[inline]
    fn read(&self, i: usize) -> Self::Output {
        self.0.read(i)
    }

    fn meta(&self) -> ExprMeta {
        self.0.meta()
    }

    fn shape_check(&self, len: usize) -> bool {
        self.0.shape_check(len)
    }

    fn unit_stride(&self) -> bool {
        self.0.unit_stride()
    }

    fn pretty(&self, buf: &mut String) {
        self.0.pretty(buf)
    }
}

/// A broadcast scalar operand.
#[derive(Debug, Clone, Copy)]
pub struct Constant<T>(pub T);

impl<T, const N: usize> Expr<N> for Constant<T>
where
    T: Scalar,
{
    type Output = T;

    #[inline]
    fn read(&self, _i: usize) -> T {
        self.0
    }

    fn meta(&self) -> ExprMeta {
        ExprMeta::scalar()
    }

    fn shape_check(&self, _len: usize) -> bool {
        true
    }

    fn pretty(&self, buf: &mut String) {
        buf.push_str(&format!("{}", self.0));
    }
}

/// A read-only view of a vector operand.
#[derive(Debug, Clone, Copy)]
pub struct VecRef<'a, T, const N: usize>(&'a Vector<T, N>);

impl<'a, T, const N: usize> VecRef<'a, T, N>
where
    T: Scalar,
{
    pub(crate) fn new(vector: &'a Vector<T, N>) -> Self {
        VecRef(vector)
    }
}

impl<'a, T, const N: usize> Expr<N> for VecRef<'a, T, N>
where
    T: Scalar,
{
    type Output = T;

    #[inline]
    fn read(&self, i: usize) -> T {
        self.0[i]
    }

    fn meta(&self) -> ExprMeta {
        ExprMeta::vector()
    }

    fn shape_check(&self, len: usize) -> bool {
        len == N
    }

    fn pretty(&self, buf: &mut String) {
        buf.push_str(&format!("vec<{},{}>", type_name::<T>(), N));
    }
}

pub type Promoted<L, R> = <(L, R) as CommonNum>::Common;

/// Elementwise combination of two operands, promoted to their common
/// numeric type.
#[derive(Debug, Clone, Copy)]
pub struct BinExpr<L, R, Op> {
    left: L,
    right: R,
    meta: ExprMeta,
    op: PhantomData<Op>,
}

impl<L, R, Op> BinExpr<L, R, Op> {
    pub(crate) fn new<const N: usize>(left: L, right: R) -> Self
    where
        L: Expr<N>,
        R: Expr<N>,
    {
        let meta = left.meta().combine(right.meta());
        BinExpr {
            left,
            right,
            meta,
            op: PhantomData,
        }
    }
}

impl<L, R, Op, const N: usize> Expr<N> for BinExpr<L, R, Op>
where
    L: Expr<N>,
    R: Expr<N>,
    (L::Output, R::Output): CommonNum,
    Promoted<L::Output, R::Output>: Scalar,
    Op: BinKernel<Promoted<L::Output, R::Output>>,
{
    type Output = Promoted<L::Output, R::Output>;

    #[inline]
    fn read(&self, i: usize) -> Self::Output {
        let (l, r) = (self.left.read(i), self.right.read(i)).into_common();
        Op::apply(l, r)
    }

    fn meta(&self) -> ExprMeta {
        self.meta
    }

    fn shape_check(&self, len: usize) -> bool {
        self.left.shape_check(len) && self.right.shape_check(len)
    }

    fn unit_stride(&self) -> bool {
        self.left.unit_stride() && self.right.unit_stride()
    }

    fn pretty(&self, buf: &mut String) {
        buf.push('(');
        self.left.pretty(buf);
        buf.push_str(&format!(" {} ", <Op as BinOp>::KIND));
        self.right.pretty(buf);
        buf.push(')');
    }
}

/// Elementwise application of a unary operator.
#[derive(Debug, Clone, Copy)]
pub struct UnaryExpr<E, Op> {
    inner: E,
    meta: ExprMeta,
    op: PhantomData<Op>,
}

impl<E, Op> UnaryExpr<E, Op> {
    pub(crate) fn new<const N: usize>(inner: E) -> Self
    where
        E: Expr<N>,
    {
        let meta = inner.meta();
        UnaryExpr {
            inner,
            meta,
            op: PhantomData,
        }
    }
}

impl<E, Op, const N: usize> Expr<N> for UnaryExpr<E, Op>
where
    E: Expr<N>,
    Op: UnaryKernel<E::Output>,
{
    type Output = E::Output;

    #[inline]
    fn read(&self, i: usize) -> Self::Output {
        Op::apply(self.inner.read(i))
    }

    fn meta(&self) -> ExprMeta {
        self.meta
    }

    fn shape_check(&self, len: usize) -> bool {
        self.inner.shape_check(len)
    }

    fn unit_stride(&self) -> bool {
        self.inner.unit_stride()
    }

    fn pretty(&self, buf: &mut String) {
        buf.push('(');
        buf.push_str(&format!("{}", <Op as UnaryOp>::KIND));
        self.inner.pretty(buf);
        buf.push(')');
    }
}

/// Symbolic marker lifting a vector into dimension `D` of a rank-general
/// expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexPlaceholder<const D: usize>;

/// Maps placeholder dimension `D` to reads from the wrapped operand.
///
/// This is the sole hook offered to the rank-general evaluator; carrying a
/// placeholder makes the expression ineligible for the fast path, so it is
/// always routed through the delegation seam.
#[derive(Debug, Clone, Copy)]
pub struct IndexMapping<E, const D: usize> {
    inner: E,
    meta: ExprMeta,
}

impl<E, const D: usize> IndexMapping<E, D> {
    pub(crate) fn new<const N: usize>(inner: E) -> Self
    where
        E: Expr<N>,
    {
        let inner_meta = inner.meta();
        let meta = ExprMeta {
            array_operands: inner_meta.array_operands,
            placeholders: inner_meta.placeholders + 1,
            rank: inner_meta.rank.max(D + 1),
        };
        IndexMapping { inner, meta }
    }
}

impl<E, const D: usize, const N: usize> Expr<N> for IndexMapping<E, D>
where
    E: Expr<N>,
{
    type Output = E::Output;

    /// Reads along the mapped dimension; the rank-general evaluator drives
    /// any other dimension itself.
    #[inline]
    fn read(&self, i: usize) -> Self::Output {
        self.inner.read(i)
    }

    fn meta(&self) -> ExprMeta {
        self.meta
    }

    fn shape_check(&self, len: usize) -> bool {
        self.inner.shape_check(len)
    }

    fn unit_stride(&self) -> bool {
        self.inner.unit_stride()
    }

    fn pretty(&self, buf: &mut String) {
        self.inner.pretty(buf);
        buf.push_str(&format!("[i{}]", D));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_rank_zero() {
        let c = Constant(2);
        let meta = <Constant<i32> as Expr<4>>::meta(&c);
        assert_eq!(meta, ExprMeta::scalar());
        assert!(meta.vector_only());
        assert_eq!(meta.rank, 0);
    }

    #[test]
    fn vector_references_are_rank_one() {
        let v = Vector::from([1, 2, 3]);
        let r = VecRef::new(&v);
        assert_eq!(r.meta(), ExprMeta::vector());
        assert!(r.meta().vector_only());
        assert!(r.shape_check(3));
        assert!(!r.shape_check(4));
    }

    #[test]
    fn composition_combines_classification() {
        let v = Vector::from([1, 2, 3, 4]);
        let e = BinExpr::<_, _, OpAdd>::new::<4>(VecRef::new(&v), Constant(2));
        let meta = e.meta();
        assert_eq!(meta.rank, 1);
        assert_eq!(meta.placeholders, 0);
        assert_eq!(meta.array_operands, 0);
        assert!(meta.vector_only());
    }

    #[test]
    fn index_mapping_disqualifies_the_fast_path() {
        let v = Vector::from([1, 2, 3, 4]);
        let mapped = IndexMapping::<_, 1>::new::<4>(VecRef::new(&v));
        let meta = mapped.meta();
        assert_eq!(meta.placeholders, 1);
        assert_eq!(meta.rank, 2);
        assert!(!meta.vector_only());
    }

    #[test]
    fn lazy_reads_compute_per_index() {
        let v = Vector::from([10, 20, 30]);
        let e = BinExpr::<_, _, OpMul>::new::<3>(VecRef::new(&v), Constant(3));
        assert_eq!(e.read(0), 30);
        assert_eq!(e.read(2), 90);
        // reads are pure: same index, same value
        assert_eq!(e.read(2), 90);
    }

    #[test]
    fn mixed_operands_read_as_the_common_type() {
        let v = Vector::from([1, 2]);
        let e = BinExpr::<_, _, OpAdd>::new::<2>(VecRef::new(&v), Constant(0.5f64));
        let x: f64 = e.read(0);
        assert_eq!(x, 1.5);
    }

    #[test]
    fn pretty_renders_terse_expressions() {
        let v = Vector::from([5, 5, 5, 5]);
        let e = BinExpr::<_, _, OpAdd>::new::<4>(VecRef::new(&v), Constant(2));
        let mut buf = String::new();
        e.pretty(&mut buf);
        assert_eq!(buf, "(vec<i32,4> + 2)");

        let n = UnaryExpr::<_, OpNeg>::new::<4>(VecRef::new(&v));
        buf.clear();
        n.pretty(&mut buf);
        assert_eq!(buf, "(-vec<i32,4>)");
    }
}
