//! Lazy, temporary-free arithmetic over fixed-length numeric vectors.
//!
//! Arithmetic on [`Vector`]s builds composable expression nodes instead of
//! computing; assignment or compound assignment then evaluates the whole
//! expression in a single pass over the elements, allocating nothing in
//! between, however deep the expression goes.
//!
//! ```
//! use fixvec::Vector;
//!
//! let a = Vector::from([1.0, 2.0, 3.0, 4.0]);
//! let b = Vector::from([4.0, 3.0, 2.0, 1.0]);
//!
//! let mut out: Vector<f64, 4> = Vector::broadcast(0.0);
//! out.assign(&a * 2.0 + &b);
//! assert_eq!(out.as_slice(), &[6.0, 7.0, 8.0, 9.0]);
//!
//! out += 1.0;
//! assert_eq!(out.as_slice(), &[7.0, 8.0, 9.0, 10.0]);
//! ```
//!
//! Lengths are part of the type, so operands of different lengths never
//! meet at runtime:
//!
//! ```compile_fail
//! use fixvec::Vector;
//!
//! let a = Vector::from([1, 2, 3]);
//! let b = Vector::from([1, 2]);
//! let _ = &a + &b;
//! ```

pub mod error;
pub mod vector;

pub use error::Error;
pub use vector::{
    evaluate, evaluate_with, run, Alignment, GeneralEvaluator, Unplumbed, Vector, UNROLL_LENGTH,
};
