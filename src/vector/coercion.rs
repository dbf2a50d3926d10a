use std::fmt::{Debug, Display};

/// Atomic element types storable in a [`Vector`](crate::vector::Vector).
///
/// Implemented for the fixed set of machine numerics the promotion lattice
/// below covers. Elements are plain values: copyable, comparable, printable,
/// and coercible to themselves so the assign policy is total.
pub trait Scalar: Copy + Default + PartialEq + Debug + Display + CoercibleInto<Self> + 'static {}

impl Scalar for i32 {}
impl Scalar for i64 {}
impl Scalar for u32 {}
impl Scalar for u64 {}
impl Scalar for f32 {}
impl Scalar for f64 {}

/// Elementwise numeric conversion with the language's `as`-cast semantics:
/// int-to-int truncates, float-to-int saturates, int-to-float rounds to the
/// nearest representable value.
pub trait CoercibleInto<T>: Sized {
    fn coerce_into(self) -> T;
}

macro_rules! coercible {
    ( $from:ty => $($to:ty),+ ) => {
        $(
            impl CoercibleInto<$to> for $from {
                #[inline]
                fn coerce_into(self) -> $to {
                    self as $to
                }
            }
        )+
    };
}

coercible!(i32 => i32, i64, u32, u64, f32, f64);
coercible!(i64 => i32, i64, u32, u64, f32, f64);
coercible!(u32 => i32, i64, u32, u64, f32, f64);
coercible!(u64 => i32, i64, u32, u64, f32, f64);
coercible!(f32 => i32, i64, u32, u64, f32, f64);
coercible!(f64 => i32, i64, u32, u64, f32, f64);

// Common representation for numeric calculations
pub trait CommonNum: Sized {
    type Common;
    fn into_common(self) -> (Self::Common, Self::Common);
}

macro_rules! register {
    (
      $trait:ident, ($lty:ty, $rty:ty) => $target:ty
    ) => {
        // register unification into RHS
        impl $trait for ($lty, $rty)
        where
            $lty: CoercibleInto<$target>,
            $rty: CoercibleInto<$target>,
        {
            type Common = $target;
            fn into_common(self) -> ($target, $target) {
                (
                    CoercibleInto::<$target>::coerce_into(self.0),
                    CoercibleInto::<$target>::coerce_into(self.1),
                )
            }
        }

        // register unification into LHS
        impl $trait for ($rty, $lty)
        where
            $lty: CoercibleInto<$target>,
            $rty: CoercibleInto<$target>,
        {
            type Common = $target;
            fn into_common(self) -> ($target, $target) {
                (
                    CoercibleInto::<$target>::coerce_into(self.0),
                    CoercibleInto::<$target>::coerce_into(self.1),
                )
            }
        }
    };

    (
      $trait:ident, $lty:ty => $target:ty
    ) => {
        impl $trait for ($lty, $lty)
        where
            $lty: CoercibleInto<$target>,
        {
            type Common = $target;
            fn into_common(self) -> ($target, $target) {
                (
                    CoercibleInto::<$target>::coerce_into(self.0),
                    CoercibleInto::<$target>::coerce_into(self.1),
                )
            }
        }
    };
}

// register common numerics used for mathematical operators; pairs of mixed
// signedness are deliberately absent and must be converted explicitly
register!(CommonNum, i32 => i32);
register!(CommonNum, i64 => i64);
register!(CommonNum, u32 => u32);
register!(CommonNum, u64 => u64);
register!(CommonNum, f32 => f32);
register!(CommonNum, f64 => f64);
register!(CommonNum, (i32, i64) => i64);
register!(CommonNum, (u32, u64) => u64);
register!(CommonNum, (f32, f64) => f64);
register!(CommonNum, (i32, f32) => f32);
register!(CommonNum, (i32, f64) => f64);
register!(CommonNum, (i64, f32) => f32);
register!(CommonNum, (i64, f64) => f64);
register!(CommonNum, (u32, f32) => f32);
register!(CommonNum, (u32, f64) => f64);
register!(CommonNum, (u64, f32) => f32);
register!(CommonNum, (u64, f64) => f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casts_follow_as_semantics() {
        assert_eq!(CoercibleInto::<i32>::coerce_into(3.9f64), 3);
        assert_eq!(CoercibleInto::<i32>::coerce_into(-3.9f64), -3);
        assert_eq!(CoercibleInto::<i32>::coerce_into(1e300f64), i32::MAX);
        assert_eq!(CoercibleInto::<f64>::coerce_into(7i32), 7.0);
        assert_eq!(CoercibleInto::<u32>::coerce_into(-1i32), u32::MAX);
    }

    #[test]
    fn mixed_pairs_promote_to_the_wider_type() {
        let (l, r): (f64, f64) = (2i32, 0.5f64).into_common();
        assert_eq!((l, r), (2.0, 0.5));

        let (l, r): (i64, i64) = (2i32, 3i64).into_common();
        assert_eq!((l, r), (2, 3));

        let (l, r): (f64, f64) = (0.25f32, 4.0f64).into_common();
        assert_eq!((l, r), (0.25, 4.0));
    }

    #[test]
    fn same_type_pairs_are_identity() {
        let (l, r): (i32, i32) = (5, 6).into_common();
        assert_eq!((l, r), (5, 6));
    }
}
