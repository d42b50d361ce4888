use crate::{
    backend::term::Term,
    error::RuntimeError,
    interpreter::evaluator::{core::EvalResult, utils::in_backend},
    util::num::usize_to_i64_checked,
};

/// Arithmetic mean `(x1 + ... + xn) / n`, exact for exact inputs.
///
/// # Errors
/// `DivisionByZero` for an empty list.
///
/// # Example
/// ```
/// use symstat::{backend::term::Term, interpreter::evaluator::function::moments::mean};
///
/// let m = mean("Mean", vec![Term::int(1), Term::int(2)]).unwrap();
/// assert_eq!(m, Term::rational(3, 2).unwrap());
/// assert!(mean("Mean", vec![]).is_err());
/// ```
pub fn mean(operator: &'static str, values: Vec<Term>) -> EvalResult<Term> {
    if values.is_empty() {
        return Err(RuntimeError::DivisionByZero { operator });
    }
    let n = usize_to_i64_checked(values.len(), operator)?;

    in_backend(operator, Term::add(values).and_then(|sum| Term::div(sum, Term::int(n))))
}

/// Unbiased sample covariance
/// `sum((x - mean(x)) * conjugate(y - mean(y))) / (n - 1)`.
///
/// # Errors
/// - `LengthMismatch` when the lists differ in length.
/// - `DivisionByZero` for fewer than two observations.
pub fn covariance(operator: &'static str, xs: &[Term], ys: &[Term]) -> EvalResult<Term> {
    if xs.len() != ys.len() {
        return Err(RuntimeError::LengthMismatch { operator,
                                                  left: xs.len(),
                                                  right: ys.len() });
    }
    if xs.len() < 2 {
        return Err(RuntimeError::DivisionByZero { operator });
    }
    let n = usize_to_i64_checked(xs.len(), operator)?;

    let x_mean = mean(operator, xs.to_vec())?;
    let y_mean = mean(operator, ys.to_vec())?;

    let products = xs.iter()
                     .zip(ys)
                     .map(|(x, y)| {
                         let dx = Term::sub(x.clone(), x_mean.clone())?;
                         let dy = Term::sub(y.clone(), y_mean.clone())?;
                         Term::mul([dx, Term::conjugate(dy)?])
                     })
                     .collect::<Result<Vec<_>, _>>();

    in_backend(operator,
               products.and_then(Term::add)
                       .and_then(|sum| Term::div(sum, Term::int(n - 1))))
}

/// Unbiased sample variance, the covariance of a list with itself.
///
/// # Errors
/// `DivisionByZero` for fewer than two observations.
pub fn variance(operator: &'static str, values: &[Term]) -> EvalResult<Term> {
    covariance(operator, values, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::core::Number;

    fn ints(values: &[i64]) -> Vec<Term> {
        values.iter().copied().map(Term::int).collect()
    }

    #[test]
    fn variance_of_integers_is_exact() {
        assert_eq!(variance("Variance", &ints(&[1, 2, 3, 4])).unwrap(),
                   Term::rational(5, 3).unwrap());
    }

    #[test]
    fn variance_of_a_single_value_divides_by_zero() {
        assert_eq!(variance("Variance", &ints(&[7])),
                   Err(RuntimeError::DivisionByZero { operator: "Variance" }));
    }

    #[test]
    fn covariance_of_opposite_lists_is_negative() {
        let c = covariance("Covariance", &ints(&[1, 2, 3]), &ints(&[3, 2, 1])).unwrap();
        assert_eq!(c, Term::int(-1));
    }

    #[test]
    fn covariance_needs_equal_lengths() {
        assert!(matches!(covariance("Covariance", &ints(&[1, 2]), &ints(&[1, 2, 3])),
                         Err(RuntimeError::LengthMismatch { left: 2, right: 3, .. })));
    }

    #[test]
    fn reals_make_the_mean_inexact() {
        let m = mean("Mean", vec![Term::int(1), Term::real(2.0)]).unwrap();
        assert_eq!(m, Term::Num(Number::Real(1.5)));
    }
}
