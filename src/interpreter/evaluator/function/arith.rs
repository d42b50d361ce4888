use crate::{
    ast::Expr,
    backend::term::{BackendResult, Term},
    bridge::{from_backend, to_backend},
    error::{BackendError, ConversionError, RuntimeError},
    interpreter::evaluator::core::{Context, EvalResult},
};

/// Rebuilds an arithmetic call through the backend so the result is in
/// canonical form.
///
/// Arguments without a backend counterpart (strings, lists, unknown calls)
/// leave the call unevaluated without a message.
fn fold(operator: &'static str,
        args: &[Expr],
        build: impl FnOnce(Vec<Term>) -> BackendResult<Term>)
        -> EvalResult<Option<Expr>> {
    let terms = match args.iter()
                          .map(|arg| to_backend(arg, None))
                          .collect::<Result<Vec<_>, _>>()
    {
        Ok(terms) => terms,
        Err(ConversionError::NotConvertible { .. }) => return Ok(None),
        Err(ConversionError::Backend(e)) => return Err(RuntimeError::backend(operator, e)),
    };

    let term = build(terms).map_err(|e| RuntimeError::backend(operator, e))?;
    Ok(Some(from_backend(&term)))
}

fn exactly<const N: usize>(terms: Vec<Term>) -> BackendResult<[Term; N]> {
    terms.try_into().map_err(|terms: Vec<Term>| {
                        let details = format!("expected {N} arguments, got {}", terms.len());
                        BackendError::Unsupported { details }
                    })
}

/// `Plus[a, b, ...]`
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::{core::Context, function::arith::plus},
/// };
///
/// let mut ctx = Context::new();
/// let a = Expr::symbol("a");
/// let r = plus(&mut ctx, &[a.clone(), Expr::from(1), a, Expr::rational(1, 2)]).unwrap();
///
/// assert_eq!(r.unwrap().to_string(), "Plus[Rational[3, 2], Times[2, a]]");
/// ```
pub fn plus(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    fold("Plus", args, Term::add)
}

/// `Times[a, b, ...]`
pub fn times(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    fold("Times", args, Term::mul)
}

/// `Power[base, exponent]`
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::{core::Context, function::arith::power},
/// };
///
/// let mut ctx = Context::new();
/// let r = power(&mut ctx, &[Expr::rational(4, 9), Expr::rational(-1, 2)]).unwrap();
/// assert_eq!(r, Some(Expr::rational(3, 2)));
///
/// assert_eq!(power(&mut ctx, &[Expr::from(0), Expr::from(-1)]).unwrap_err().tag(), "infy");
/// ```
pub fn power(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    fold("Power", args, |terms| {
        let [base, exponent] = exactly(terms)?;
        Term::pow(base, exponent)
    })
}

/// `Sqrt[x]`, kept as `Power[x, 1/2]` unless `x` is a perfect square.
pub fn sqrt(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    fold("Sqrt", args, |terms| {
        let [x] = exactly(terms)?;
        Term::sqrt(x)
    })
}

/// `Conjugate[z]`; real values are returned unchanged.
pub fn conjugate(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    fold("Conjugate", args, |terms| {
        let [z] = exactly(terms)?;
        Term::conjugate(z)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_sums_fold() {
        let mut ctx = Context::new();
        let r = plus(&mut ctx, &[Expr::rational(1, 3), Expr::rational(2, 3)]).unwrap();
        assert_eq!(r, Some(Expr::from(1)));
    }

    #[test]
    fn reals_are_contagious() {
        let mut ctx = Context::new();
        let r = times(&mut ctx, &[Expr::from(0.5), Expr::symbol("Pi")]).unwrap().unwrap();
        assert!((r.to_f64().unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(matches!(r, Expr::Number(_)));
    }

    #[test]
    fn perfect_squares_have_exact_roots() {
        let mut ctx = Context::new();
        assert_eq!(sqrt(&mut ctx, &[Expr::from(49)]).unwrap(), Some(Expr::from(7)));
        assert_eq!(sqrt(&mut ctx, &[Expr::from(2)]).unwrap(),
                   Some(Expr::call("Power", [Expr::from(2), Expr::rational(1, 2)])));
    }

    #[test]
    fn conjugate_of_an_unknown_symbol_stays() {
        let mut ctx = Context::new();
        let r = conjugate(&mut ctx, &[Expr::symbol("z")]).unwrap();
        assert_eq!(r, Some(Expr::call("Conjugate", [Expr::symbol("z")])));
    }

    #[test]
    fn lists_are_left_alone() {
        let mut ctx = Context::new();
        let r = plus(&mut ctx, &[Expr::list([Expr::from(1)]), Expr::from(2)]).unwrap();
        assert_eq!(r, None);
    }

    #[test]
    fn overflow_is_reported() {
        let mut ctx = Context::new();
        let err = times(&mut ctx, &[Expr::from(i64::MAX), Expr::from(2)]).unwrap_err();
        assert_eq!(err, RuntimeError::Overflow { operator: "Times" });
    }
}
