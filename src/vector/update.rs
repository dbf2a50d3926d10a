//! Combine-and-store policies applied uniformly across one evaluation.
//!
//! Each policy is a stateless, total function from the current destination
//! element and one expression read to the new destination element. Numeric
//! edge cases pass through untouched: integer division by zero panics as
//! the language defines, float division produces inf/NaN, and overflow
//! follows the build profile's native behavior.

use super::coercion::CoercibleInto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UpdateKind {
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+=")]
    AddInto,
    #[strum(serialize = "-=")]
    SubInto,
    #[strum(serialize = "*=")]
    MulInto,
    #[strum(serialize = "/=")]
    DivInto,
    #[strum(serialize = "%=")]
    RemInto,
    #[strum(serialize = "^=")]
    BitXorInto,
    #[strum(serialize = "&=")]
    BitAndInto,
    #[strum(serialize = "|=")]
    BitOrInto,
    #[strum(serialize = "<<=")]
    ShlInto,
    #[strum(serialize = ">>=")]
    ShrInto,
}

/// One combine-and-store rule: fold `src` into `dest`.
///
/// `src` is coerced into the destination element type before the combine,
/// so mixed-type evaluations store through the destination's numeric
/// conversion rules.
pub trait Update<T, S> {
    const KIND: UpdateKind;

    fn update(dest: &mut T, src: S);
}

/// Store the source, ignoring the current destination element.
#[derive(Debug, Clone, Copy)]
pub struct Assign;

impl<T, S> Update<T, S> for Assign
where
    S: CoercibleInto<T>,
{
    const KIND: UpdateKind = UpdateKind::Assign;

    #[inline]
    fn update(dest: &mut T, src: S) {
        *dest = src.coerce_into();
    }
}

macro_rules! update_op {
    ( $name:ident, $kind:ident, $trait:ident, $method:ident ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl<T, S> Update<T, S> for $name
        where
            S: CoercibleInto<T>,
            T: std::ops::$trait<Output = T> + Copy,
        {
            const KIND: UpdateKind = UpdateKind::$kind;

            #[inline]
            fn update(dest: &mut T, src: S) {
                *dest = std::ops::$trait::$method(*dest, src.coerce_into());
            }
        }
    };
}

update_op!(AddInto, AddInto, Add, add);
update_op!(SubInto, SubInto, Sub, sub);
update_op!(MulInto, MulInto, Mul, mul);
update_op!(DivInto, DivInto, Div, div);
update_op!(RemInto, RemInto, Rem, rem);
update_op!(BitXorInto, BitXorInto, BitXor, bitxor);
update_op!(BitAndInto, BitAndInto, BitAnd, bitand);
update_op!(BitOrInto, BitOrInto, BitOr, bitor);
// shift amount is taken from the source operand
update_op!(ShlInto, ShlInto, Shl, shl);
update_op!(ShrInto, ShrInto, Shr, shr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_ignores_the_destination() {
        let mut x = 7i32;
        Assign::update(&mut x, 3i32);
        assert_eq!(x, 3);
    }

    #[test]
    fn assign_coerces_into_the_destination_type() {
        let mut x = 0i32;
        Assign::update(&mut x, 3.9f64);
        assert_eq!(x, 3);
    }

    #[test]
    fn arithmetic_policies_combine_with_the_destination() {
        let mut x = 10i32;
        AddInto::update(&mut x, 5i32);
        assert_eq!(x, 15);
        SubInto::update(&mut x, 3i32);
        assert_eq!(x, 12);
        MulInto::update(&mut x, 2i32);
        assert_eq!(x, 24);
        DivInto::update(&mut x, 6i32);
        assert_eq!(x, 4);
        RemInto::update(&mut x, 3i32);
        assert_eq!(x, 1);
    }

    #[test]
    fn float_division_by_zero_is_not_trapped() {
        let mut x = 1.0f64;
        DivInto::update(&mut x, 0.0f64);
        assert!(x.is_infinite());
    }

    #[test]
    fn bit_policies_apply_to_integer_elements() {
        let mut x = 0b1100u32;
        BitAndInto::update(&mut x, 0b1010u32);
        assert_eq!(x, 0b1000);
        BitOrInto::update(&mut x, 0b0011u32);
        assert_eq!(x, 0b1011);
        BitXorInto::update(&mut x, 0b0001u32);
        assert_eq!(x, 0b1010);
        ShlInto::update(&mut x, 1u32);
        assert_eq!(x, 0b10100);
        ShrInto::update(&mut x, 2u32);
        assert_eq!(x, 0b101);
    }

    #[test]
    fn kinds_render_as_their_operator() {
        assert_eq!(format!("{}", UpdateKind::AddInto), "+=");
        assert_eq!(format!("{}", UpdateKind::Assign), "=");
        assert_eq!(format!("{}", UpdateKind::ShlInto), "<<=");
    }
}
