use core::fmt;

/// Build a [`Error::ShapeMismatch`] carrying the pretty-printed expression
/// and the location of the failed check.
#[macro_export]
macro_rules! shape_err {
    ( $expr:expr ) => {{
        let mut rendered = String::new();
        $expr.pretty(&mut rendered);
        $crate::error::Error::ShapeMismatch(rendered, std::file!(), std::line!())
    }};
}

/// Precondition violations detected at the fast-path dispatch boundary.
///
/// Every kind here indicates a defect in caller code, not a runtime data
/// condition. None of them is retryable: retrying the same evaluation with
/// the same expression will fail the same way. Hosts decide whether to
/// abort or unwind; the evaluator itself never touches an element once a
/// check fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An array-like operand disagrees with the destination length. Carries
    /// the pretty-printed expression and the file/line of the failed check.
    ShapeMismatch(String, &'static str, u32),
    /// The fast path was handed an expression whose iteration is not
    /// contiguous.
    NonUnitStride,
    /// The fast path was handed a multi-dimensional expression.
    RankTooHigh(usize),
    /// The fast path was handed an expression with unresolved index
    /// placeholders and no rank-general evaluator is plumbed in.
    UnexpectedPlaceholder(usize),
}

impl Error {
    fn as_str(&self) -> String {
        match self {
            Error::ShapeMismatch(expr, file, line) => {
                format!("shape check failed ({}:{}) for expression: {}", file, line, expr)
            }
            Error::NonUnitStride => "expression iteration is not unit-stride".to_string(),
            Error::RankTooHigh(rank) => {
                format!("expression has rank {}, vector evaluation requires rank <= 1", rank)
            }
            Error::UnexpectedPlaceholder(count) => format!(
                "expression holds {} unresolved index placeholder(s) and no rank-general evaluator is available",
                count
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_expression() {
        let err = Error::ShapeMismatch("(vec<i32,4> + 2)".to_string(), "src/vector/eval.rs", 41);
        let msg = format!("{}", err);
        assert!(msg.contains("(vec<i32,4> + 2)"));
        assert!(msg.contains("src/vector/eval.rs:41"));
    }

    #[test]
    fn display_reports_rank_and_placeholder_counts() {
        assert!(format!("{}", Error::RankTooHigh(3)).contains("rank 3"));
        assert!(format!("{}", Error::UnexpectedPlaceholder(2)).contains("2 unresolved"));
        assert!(format!("{}", Error::NonUnitStride).contains("unit-stride"));
    }
}
