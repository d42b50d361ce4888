/// Symbolic terms and their smart constructors.
///
/// A [`term::Term`] is always kept in canonical form: exact numbers are
/// folded, like terms are collected and inexact numbers are contagious.
pub mod term;

/// Special functions: `exp`, `erf`, gamma, regularized incomplete gamma and
/// conjugation, with exact special values and numeric evaluation.
pub mod special;

/// Random variables for the supported laws: densities, distribution
/// functions, moments and sampling.
///
/// # Example
/// ```
/// use symstat::backend::{random_variable::RandomVariable, term::Term};
///
/// let x = RandomVariable::bernoulli("rv#0".into(), Term::rational(1, 3).unwrap()).unwrap();
/// assert_eq!(x.expectation().unwrap(), Term::rational(1, 3).unwrap());
/// assert_eq!(x.variance().unwrap(), Term::rational(2, 9).unwrap());
/// ```
pub mod random_variable;
