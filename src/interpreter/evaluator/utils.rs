use crate::{
    ast::Expr,
    backend::term::{Assumption, BackendResult, Term},
    bridge,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Checks that a builtin received exactly `expected` arguments.
///
/// The dispatcher already enforces the arity declared in the builtin table;
/// builtins call this as well so they can be used directly.
///
/// # Example
/// ```
/// use symstat::{ast::Expr, interpreter::evaluator::utils::check_arity};
///
/// assert!(check_arity("Mean", &[Expr::from(1)], 1).is_ok());
/// assert!(check_arity("Mean", &[] as &[Expr], 1).is_err());
/// ```
pub fn check_arity<T>(operator: &'static str, args: &[T], expected: usize) -> EvalResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount { operator: operator.to_string(),
                                          expected: expected.to_string(),
                                          found:    args.len(), })
    }
}

/// Converts a host expression for `operator`, attaching the operator name to
/// any failure.
pub fn convert(operator: &'static str,
               expr: &Expr,
               assumption: Option<Assumption>)
               -> EvalResult<Term> {
    bridge::to_backend(expr, assumption).map_err(|e| RuntimeError::conversion(operator, e))
}

/// Converts every element of a list for `operator`.
pub fn convert_all(operator: &'static str, items: &[Expr]) -> EvalResult<Vec<Term>> {
    items.iter().map(|item| convert(operator, item, None)).collect()
}

/// Attaches the operator name to a backend result.
pub fn in_backend<T>(operator: &'static str, result: BackendResult<T>) -> EvalResult<T> {
    result.map_err(|e| RuntimeError::backend(operator, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    #[test]
    fn conversion_failures_name_the_operator() {
        let err = convert("PDF", &Expr::String("x".into()), None).unwrap_err();
        assert_eq!(err,
                   RuntimeError::NotConvertible { operator: "PDF",
                                                  found:    "\"x\"".into(), });
    }

    #[test]
    fn backend_failures_name_the_operator() {
        let result: BackendResult<()> = Err(BackendError::Overflow);
        assert_eq!(in_backend("Variance", result),
                   Err(RuntimeError::Overflow { operator: "Variance" }));
    }
}
