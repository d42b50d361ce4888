use statrs::function::{erf, gamma};

use crate::{
    backend::term::{BackendResult, Constant, Term},
    error::BackendError,
    interpreter::value::core::Number,
};

/// Special functions the backend applies symbolically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    /// `exp(x)`
    Exp,
    /// The error function.
    Erf,
    /// Euler's gamma function.
    Gamma,
    /// Regularized lower incomplete gamma `P(s, x)`.
    GammaRegularizedLower,
    /// Complex conjugate of a term that is not known to be real.
    Conjugate,
}

impl Func {
    /// Number of arguments the function takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::GammaRegularizedLower => 2,
            _ => 1,
        }
    }

    /// Name used when printing terms.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exp => "exp",
            Self::Erf => "erf",
            Self::Gamma => "gamma",
            Self::GammaRegularizedLower => "P",
            Self::Conjugate => "conjugate",
        }
    }

    /// Whether the function maps reals to reals, so that it commutes with
    /// conjugation.
    #[must_use]
    pub const fn is_real_analytic(self) -> bool {
        !matches!(self, Self::Conjugate)
    }

    /// Evaluates the function at real arguments.
    ///
    /// Returns `None` outside the domain (poles of gamma, negative `x` for the
    /// incomplete gamma) or when the result is not finite.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::special::Func;
    ///
    /// let g = Func::Gamma.evaluate(&[5.0]).unwrap();
    /// assert!((g - 24.0).abs() < 1e-9);
    /// assert_eq!(Func::Gamma.evaluate(&[-2.0]), None);
    /// assert_eq!(Func::GammaRegularizedLower.evaluate(&[1.5, 0.0]), Some(0.0));
    /// ```
    #[must_use]
    pub fn evaluate(self, args: &[f64]) -> Option<f64> {
        let value = match (self, args) {
            (Self::Exp, [x]) => x.exp(),
            (Self::Erf, [x]) => erf::erf(*x),
            (Self::Gamma, [x]) => {
                if *x <= 0.0 && x.fract() == 0.0 {
                    return None;
                }
                gamma::gamma(*x)
            },
            (Self::GammaRegularizedLower, [s, x]) => {
                if *s <= 0.0 || *x < 0.0 || x.is_nan() {
                    return None;
                }
                if *x == 0.0 {
                    0.0
                } else if x.is_infinite() {
                    1.0
                } else {
                    gamma::gamma_lr(*s, *x)
                }
            },
            (Self::Conjugate, [x]) => *x,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Exact special values: `exp(0)`, `erf(0)`, gamma at positive integers and
/// positive half-integers, and `P(s, 0)`.
///
/// Returns `Ok(None)` when no exact rule applies.
pub(crate) fn exact(func: Func, args: &[Term]) -> BackendResult<Option<Term>> {
    let numbers: Vec<Option<&Number>> = args.iter().map(Term::as_number).collect();

    match (func, numbers.as_slice()) {
        (Func::Exp, [Some(Number::Integer(0))]) => Ok(Some(Term::int(1))),
        (Func::Erf, [Some(Number::Integer(0))]) => Ok(Some(Term::int(0))),
        (Func::GammaRegularizedLower, [_, Some(Number::Integer(0))]) => Ok(Some(Term::int(0))),
        (Func::Gamma, [Some(Number::Integer(n))]) if *n <= 0 => Err(BackendError::DivisionByZero),
        (Func::Gamma, [Some(Number::Integer(n))]) => factorial(n - 1).map(Some),
        (Func::Gamma, [Some(Number::Rational(r))]) if *r.denom() == 2 && *r.numer() > 0 => {
            half_integer_gamma(*r.numer()).map(Some)
        },
        _ => Ok(None),
    }
}

fn factorial(n: i64) -> BackendResult<Term> {
    (2..=n).try_fold(1_i64, i64::checked_mul)
           .map(Term::int)
           .ok_or(BackendError::Overflow)
}

/// `Gamma(m/2)` for odd positive `m`, as a rational multiple of `sqrt(pi)`.
fn half_integer_gamma(m: i64) -> BackendResult<Term> {
    let mut coefficient = Number::Integer(1);
    for j in 1..=(m - 1) / 2 {
        let factor = Number::rational(2 * j - 1, 2).ok_or(BackendError::DivisionByZero)?;
        coefficient = coefficient.checked_mul(factor)
                                 .ok_or(BackendError::Overflow)?;
    }
    Term::mul([Term::Num(coefficient), Term::sqrt(Term::Const(Constant::Pi))?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_of_integers_is_a_factorial() {
        assert_eq!(Term::gamma(Term::int(6)).unwrap(), Term::int(120));
        assert_eq!(Term::gamma(Term::int(0)), Err(BackendError::DivisionByZero));
    }

    #[test]
    fn gamma_of_half_integers_is_exact() {
        let g = Term::gamma(Term::rational(5, 2).unwrap()).unwrap();
        let expected = 0.75 * std::f64::consts::PI.sqrt();
        assert!((g.to_f64().unwrap() - expected).abs() < 1e-12);
        assert!(matches!(g, Term::Mul(_)));
    }

    #[test]
    fn inexact_arguments_evaluate_numerically() {
        let e = Term::erf(Term::real(0.5)).unwrap();
        let Term::Num(Number::Real(v)) = e else {
            panic!("expected a real, got {e:?}");
        };
        assert!((v - 0.520_499_877_813_046_5).abs() < 1e-9);
    }

    #[test]
    fn symbolic_arguments_stay_symbolic() {
        let x = Term::symbol("x", None);
        assert_eq!(Term::exp(x.clone()).unwrap(), Term::Apply(Func::Exp, vec![x]));
    }
}
