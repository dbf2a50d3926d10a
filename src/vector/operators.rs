//! Operator surface: `+ - * /` compose lazy nodes, the compound
//! assignments drive one evaluation pass under the matching update policy.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::ops::{
    AddAssign, BitAndAssign, BitOrAssign, BitXorAssign, DivAssign, MulAssign, RemAssign, ShlAssign,
    ShrAssign, SubAssign,
};

use super::coercion::Scalar;
use super::core::Vector;
use super::eval::evaluate;
use super::expr::{
    BinExpr, Constant, Ex, Expr, OpAdd, OpDiv, OpMul, OpNeg, OpSub, UnaryExpr, VecRef,
};
use super::update::{
    AddInto, BitAndInto, BitOrInto, BitXorInto, DivInto, MulInto, RemInto, ShlInto, ShrInto,
    SubInto, Update,
};

/// Run one evaluation for an operator trigger.
///
/// Vector-only arithmetic built by the operators below is statically
/// eligible and shape-correct, so the error arm is unreachable there;
/// anything else surfacing here is a precondition violation and aborts.
fn drive<T, E, U, const N: usize>(dest: &mut Vector<T, N>, expr: &E, update: U)
where
    T: Scalar,
    E: Expr<N>,
    U: Update<T, E::Output>,
{
    if let Err(e) = evaluate(dest, expr, update) {
        panic!("vector update `{}` failed: {}", U::KIND, e);
    }
}

macro_rules! lazy_binop {
    ( $std:ident, $method:ident, $op:ident ) => {
        impl<L, R, const N: usize> $std<Ex<R, N>> for Ex<L, N>
        where
            L: Expr<N>,
            R: Expr<N>,
            BinExpr<L, R, $op>: Expr<N>,
        {
            type Output = Ex<BinExpr<L, R, $op>, N>;

            fn $method(self, rhs: Ex<R, N>) -> Self::Output {
                Ex::new(BinExpr::new::<N>(self.0, rhs.0))
            }
        }

        impl<'a, L, T, const N: usize> $std<&'a Vector<T, N>> for Ex<L, N>
        where
            L: Expr<N>,
            T: Scalar,
            BinExpr<L, VecRef<'a, T, N>, $op>: Expr<N>,
        {
            type Output = Ex<BinExpr<L, VecRef<'a, T, N>, $op>, N>;

            fn $method(self, rhs: &'a Vector<T, N>) -> Self::Output {
                Ex::new(BinExpr::new::<N>(self.0, VecRef::new(rhs)))
            }
        }

        impl<'a, R, T, const N: usize> $std<Ex<R, N>> for &'a Vector<T, N>
        where
            R: Expr<N>,
            T: Scalar,
            BinExpr<VecRef<'a, T, N>, R, $op>: Expr<N>,
        {
            type Output = Ex<BinExpr<VecRef<'a, T, N>, R, $op>, N>;

            fn $method(self, rhs: Ex<R, N>) -> Self::Output {
                Ex::new(BinExpr::new::<N>(VecRef::new(self), rhs.0))
            }
        }

        impl<'a, 'b, T, U, const N: usize> $std<&'b Vector<U, N>> for &'a Vector<T, N>
        where
            T: Scalar,
            U: Scalar,
            BinExpr<VecRef<'a, T, N>, VecRef<'b, U, N>, $op>: Expr<N>,
        {
            type Output = Ex<BinExpr<VecRef<'a, T, N>, VecRef<'b, U, N>, $op>, N>;

            fn $method(self, rhs: &'b Vector<U, N>) -> Self::Output {
                Ex::new(BinExpr::new::<N>(VecRef::new(self), VecRef::new(rhs)))
            }
        }
    };
}

macro_rules! lazy_binop_scalar {
    ( $std:ident, $method:ident, $op:ident, $( $s:ty ),+ ) => {
        $(
            impl<L, const N: usize> $std<$s> for Ex<L, N>
            where
                L: Expr<N>,
                BinExpr<L, Constant<$s>, $op>: Expr<N>,
            {
                type Output = Ex<BinExpr<L, Constant<$s>, $op>, N>;

                fn $method(self, rhs: $s) -> Self::Output {
                    Ex::new(BinExpr::new::<N>(self.0, Constant(rhs)))
                }
            }

            impl<R, const N: usize> $std<Ex<R, N>> for $s
            where
                R: Expr<N>,
                BinExpr<Constant<$s>, R, $op>: Expr<N>,
            {
                type Output = Ex<BinExpr<Constant<$s>, R, $op>, N>;

                fn $method(self, rhs: Ex<R, N>) -> Self::Output {
                    Ex::new(BinExpr::new::<N>(Constant(self), rhs.0))
                }
            }

            impl<'a, T, const N: usize> $std<$s> for &'a Vector<T, N>
            where
                T: Scalar,
                BinExpr<VecRef<'a, T, N>, Constant<$s>, $op>: Expr<N>,
            {
                type Output = Ex<BinExpr<VecRef<'a, T, N>, Constant<$s>, $op>, N>;

                fn $method(self, rhs: $s) -> Self::Output {
                    Ex::new(BinExpr::new::<N>(VecRef::new(self), Constant(rhs)))
                }
            }

            impl<'a, T, const N: usize> $std<&'a Vector<T, N>> for $s
            where
                T: Scalar,
                BinExpr<Constant<$s>, VecRef<'a, T, N>, $op>: Expr<N>,
            {
                type Output = Ex<BinExpr<Constant<$s>, VecRef<'a, T, N>, $op>, N>;

                fn $method(self, rhs: &'a Vector<T, N>) -> Self::Output {
                    Ex::new(BinExpr::new::<N>(Constant(self), VecRef::new(rhs)))
                }
            }
        )+
    };
}

lazy_binop!(Add, add, OpAdd);
lazy_binop!(Sub, sub, OpSub);
lazy_binop!(Mul, mul, OpMul);
lazy_binop!(Div, div, OpDiv);

lazy_binop_scalar!(Add, add, OpAdd, i32, i64, u32, u64, f32, f64);
lazy_binop_scalar!(Sub, sub, OpSub, i32, i64, u32, u64, f32, f64);
lazy_binop_scalar!(Mul, mul, OpMul, i32, i64, u32, u64, f32, f64);
lazy_binop_scalar!(Div, div, OpDiv, i32, i64, u32, u64, f32, f64);

impl<E, const N: usize> Neg for Ex<E, N>
where
    E: Expr<N>,
    UnaryExpr<E, OpNeg>: Expr<N>,
{
    type Output = Ex<UnaryExpr<E, OpNeg>, N>;

    fn neg(self) -> Self::Output {
        Ex::new(UnaryExpr::new::<N>(self.0))
    }
}

impl<'a, T, const N: usize> Neg for &'a Vector<T, N>
where
    T: Scalar,
    UnaryExpr<VecRef<'a, T, N>, OpNeg>: Expr<N>,
{
    type Output = Ex<UnaryExpr<VecRef<'a, T, N>, OpNeg>, N>;

    fn neg(self) -> Self::Output {
        Ex::new(UnaryExpr::new::<N>(VecRef::new(self)))
    }
}

macro_rules! compound {
    ( $std:ident, $method:ident, $policy:ident, $( $s:ty ),+ ) => {
        impl<T, E, const N: usize> $std<Ex<E, N>> for Vector<T, N>
        where
            T: Scalar,
            E: Expr<N>,
            $policy: Update<T, E::Output>,
        {
            fn $method(&mut self, rhs: Ex<E, N>) {
                drive(self, &rhs, $policy);
            }
        }

        impl<T, U, const N: usize> $std<&Vector<U, N>> for Vector<T, N>
        where
            T: Scalar,
            U: Scalar,
            $policy: Update<T, U>,
        {
            fn $method(&mut self, rhs: &Vector<U, N>) {
                drive(self, &VecRef::new(rhs), $policy);
            }
        }

        $(
            impl<T, const N: usize> $std<$s> for Vector<T, N>
            where
                T: Scalar,
                $policy: Update<T, $s>,
            {
                fn $method(&mut self, rhs: $s) {
                    drive(self, &Constant(rhs), $policy);
                }
            }
        )+
    };
}

compound!(AddAssign, add_assign, AddInto, i32, i64, u32, u64, f32, f64);
compound!(SubAssign, sub_assign, SubInto, i32, i64, u32, u64, f32, f64);
compound!(MulAssign, mul_assign, MulInto, i32, i64, u32, u64, f32, f64);
compound!(DivAssign, div_assign, DivInto, i32, i64, u32, u64, f32, f64);
compound!(RemAssign, rem_assign, RemInto, i32, i64, u32, u64, f32, f64);
compound!(BitXorAssign, bitxor_assign, BitXorInto, i32, i64, u32, u64, f32, f64);
compound!(BitAndAssign, bitand_assign, BitAndInto, i32, i64, u32, u64, f32, f64);
compound!(BitOrAssign, bitor_assign, BitOrInto, i32, i64, u32, u64, f32, f64);
compound!(ShlAssign, shl_assign, ShlInto, i32, i64, u32, u64, f32, f64);
compound!(ShrAssign, shr_assign, ShrInto, i32, i64, u32, u64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_add_then_scale() {
        let mut v = Vector::from([5, 5, 5, 5]);
        v += &Vector::from([1, 2, 3, 4]);
        assert_eq!(v.as_slice(), &[6, 7, 8, 9]);

        v *= 2;
        assert_eq!(v.as_slice(), &[12, 14, 16, 18]);
    }

    #[test]
    fn assignment_evaluates_in_one_pass_without_temporaries() {
        let a = Vector::from([1.0, 2.0, 3.0, 4.0]);
        let b = Vector::from([4.0, 3.0, 2.0, 1.0]);
        let mut out: Vector<f64, 4> = Vector::broadcast(0.0);
        out.assign(&a * 2.0 + &b);
        assert_eq!(out.as_slice(), &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn expressions_nest_arbitrarily() {
        let a = Vector::from([1, 2, 3]);
        let b = Vector::from([10, 20, 30]);
        let c = Vector::from([100, 200, 300]);
        let mut out: Vector<i32, 3> = Vector::default();
        out.assign((&a + &b) * 2 + &c / 100);
        assert_eq!(out.as_slice(), &[23, 46, 69]);
    }

    #[test]
    fn scalars_compose_on_either_side() {
        let v = Vector::from([1.0, 2.0, 4.0]);
        let mut out: Vector<f64, 3> = Vector::default();

        out.assign(2.0 * &v);
        assert_eq!(out.as_slice(), &[2.0, 4.0, 8.0]);

        out.assign(8.0 / &v);
        assert_eq!(out.as_slice(), &[8.0, 4.0, 2.0]);

        out.assign(10.0 - &v);
        assert_eq!(out.as_slice(), &[9.0, 8.0, 6.0]);
    }

    #[test]
    fn mixed_element_types_promote() {
        let ints = Vector::from([1, 2, 3]);
        let mut out: Vector<f64, 3> = Vector::default();
        out.assign(&ints + 0.5);
        assert_eq!(out.as_slice(), &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn negation_is_lazy() {
        let v = Vector::from([1, -2, 3]);
        let mut out: Vector<i32, 3> = Vector::default();
        out.assign(-&v);
        assert_eq!(out.as_slice(), &[-1, 2, -3]);
    }

    #[test]
    fn compound_updates_with_expression_operands() {
        let a = Vector::from([1, 2, 3]);
        let b = Vector::from([10, 10, 10]);
        let mut v = Vector::from([100, 100, 100]);
        v += &a * &b;
        assert_eq!(v.as_slice(), &[110, 120, 130]);

        v -= &a;
        assert_eq!(v.as_slice(), &[109, 118, 127]);
    }

    #[test]
    fn integer_compound_family() {
        let mut v = Vector::from([17u32, 18, 19]);
        v %= 10;
        assert_eq!(v.as_slice(), &[7, 8, 9]);

        v &= 0b1110;
        assert_eq!(v.as_slice(), &[6, 8, 8]);

        v |= 1;
        assert_eq!(v.as_slice(), &[7, 9, 9]);

        v ^= 0b1111;
        assert_eq!(v.as_slice(), &[8, 6, 6]);

        v <<= 2;
        assert_eq!(v.as_slice(), &[32, 24, 24]);

        v >>= 3;
        assert_eq!(v.as_slice(), &[4, 3, 3]);
    }

    #[test]
    fn division_compound_on_floats() {
        let mut v = Vector::from([2.0f64, 4.0, 8.0]);
        v /= 2.0;
        assert_eq!(v.as_slice(), &[1.0, 2.0, 4.0]);
    }

    #[test]
    fn update_laws_hold_per_element() {
        let before = Vector::from([3, 7, 11, 13, 17, 19, 23, 29, 31]);
        let mut v = before;
        v += 4;
        for i in 0..9 {
            assert_eq!(v[i], before[i] + 4);
        }

        let mut v = before;
        v *= 3;
        for i in 0..9 {
            assert_eq!(v[i], before[i] * 3);
        }
    }
}
