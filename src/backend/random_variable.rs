use rand::Rng;
use rand_distr::{Bernoulli, ChiSquared, Distribution, Normal, Weibull};

use crate::{
    backend::term::{BackendResult, Constant, Term},
    error::BackendError,
};

/// The law of a random variable with its parameters as backend terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Law {
    /// Normal with mean and standard deviation.
    Normal {
        /// Mean.
        mean: Term,
        /// Standard deviation, positive.
        std:  Term,
    },
    /// Weibull with shape and scale.
    Weibull {
        /// Shape, positive.
        shape: Term,
        /// Scale, positive.
        scale: Term,
    },
    /// Chi with `k` degrees of freedom.
    Chi {
        /// Degrees of freedom, positive.
        k: Term,
    },
    /// Bernoulli with success probability `p`.
    Bernoulli {
        /// Success probability in `[0, 1]`.
        p: Term,
    },
}

impl Law {
    /// Backend name of the law, used in error reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "Normal",
            Self::Weibull { .. } => "Weibull",
            Self::Chi { .. } => "Chi",
            Self::Bernoulli { .. } => "Bernoulli",
        }
    }
}

/// A named random variable.
///
/// Every conversion of a distribution expression creates a new one with a
/// fresh name; random variables are never shared between queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVariable {
    name: String,
    law:  Law,
}

fn invalid(distribution: &'static str, parameter: &'static str, details: String) -> BackendError {
    BackendError::InvalidParameter { distribution,
                                     parameter,
                                     details }
}

fn require_real(distribution: &'static str,
                parameter: &'static str,
                value: &Term)
                -> BackendResult<()> {
    if value.as_number().is_some() && !value.is_real() {
        return Err(invalid(distribution, parameter, format!("{value} is not real")));
    }
    Ok(())
}

fn require_positive(distribution: &'static str,
                    parameter: &'static str,
                    value: &Term)
                    -> BackendResult<()> {
    require_real(distribution, parameter, value)?;
    if value.is_positive() == Some(false) {
        return Err(invalid(distribution, parameter, format!("{value} is not positive")));
    }
    Ok(())
}

fn require_unit_interval(distribution: &'static str,
                         parameter: &'static str,
                         value: &Term)
                         -> BackendResult<()> {
    require_real(distribution, parameter, value)?;
    if value.in_unit_interval() == Some(false) {
        return Err(invalid(distribution, parameter, format!("{value} is not in [0, 1]")));
    }
    Ok(())
}

/// `true` when `x` is a number below zero.
fn is_negative_number(x: &Term) -> bool {
    x.to_f64().is_some_and(|v| v < 0.0)
}

impl RandomVariable {
    /// A normal random variable.
    ///
    /// # Errors
    /// `InvalidParameter` when `std` is decidably not positive or `mean` is a
    /// non-real number.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::{random_variable::RandomVariable, term::Term};
    ///
    /// assert!(RandomVariable::normal("rv#0".into(), Term::int(0), Term::int(1)).is_ok());
    /// assert!(RandomVariable::normal("rv#1".into(), Term::int(0), Term::int(-1)).is_err());
    /// ```
    pub fn normal(name: String, mean: Term, std: Term) -> BackendResult<Self> {
        require_real("Normal", "mean", &mean)?;
        require_positive("Normal", "std", &std)?;
        Ok(Self { name,
                  law: Law::Normal { mean, std } })
    }

    /// A Weibull random variable with the given shape and scale.
    pub fn weibull(name: String, shape: Term, scale: Term) -> BackendResult<Self> {
        require_positive("Weibull", "shape", &shape)?;
        require_positive("Weibull", "scale", &scale)?;
        Ok(Self { name,
                  law: Law::Weibull { shape, scale } })
    }

    /// A chi random variable with `k` degrees of freedom.
    pub fn chi(name: String, k: Term) -> BackendResult<Self> {
        require_positive("Chi", "k", &k)?;
        Ok(Self { name,
                  law: Law::Chi { k } })
    }

    /// A Bernoulli random variable with success probability `p`.
    pub fn bernoulli(name: String, p: Term) -> BackendResult<Self> {
        require_unit_interval("Bernoulli", "p", &p)?;
        Ok(Self { name,
                  law: Law::Bernoulli { p } })
    }

    /// The internal name of the variable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The law of the variable.
    #[must_use]
    pub const fn law(&self) -> &Law {
        &self.law
    }

    /// Density (probability mass for Bernoulli) at `x`.
    ///
    /// # Errors
    /// Arithmetic failures of the backend, such as overflow.
    pub fn density(&self, x: Term) -> BackendResult<Term> {
        match &self.law {
            Law::Normal { mean, std } => {
                let deviation = Term::sub(x, mean.clone())?;
                let spread = Term::mul([Term::int(2), Term::pow(std.clone(), Term::int(2))?])?;
                let exponent = Term::neg(Term::div(Term::pow(deviation, Term::int(2))?, spread)?)?;
                let norm = Term::mul([std.clone(),
                                      Term::sqrt(Term::mul([Term::int(2),
                                                            Term::Const(Constant::Pi)])?)?])?;
                Term::div(Term::exp(exponent)?, norm)
            },
            Law::Weibull { shape, scale } => {
                if is_negative_number(&x) {
                    return Ok(Term::int(0));
                }
                let ratio = Term::div(x, scale.clone())?;
                let factor = Term::div(shape.clone(), scale.clone())?;
                let power = Term::pow(ratio.clone(), Term::sub(shape.clone(), Term::int(1))?)?;
                let tail = Term::exp(Term::neg(Term::pow(ratio, shape.clone())?)?)?;
                Term::mul([factor, power, tail])
            },
            Law::Chi { k } => {
                if is_negative_number(&x) {
                    return Ok(Term::int(0));
                }
                let half_k = Term::div(k.clone(), Term::int(2))?;
                let scale = Term::pow(Term::int(2), Term::sub(Term::int(1), half_k.clone())?)?;
                let power = Term::pow(x.clone(), Term::sub(k.clone(), Term::int(1))?)?;
                let tail = Term::exp(Term::neg(Term::div(Term::pow(x, Term::int(2))?,
                                                         Term::int(2))?)?)?;
                Term::div(Term::mul([scale, power, tail])?, Term::gamma(half_k)?)
            },
            Law::Bernoulli { p } => {
                if let Some(v) = x.to_f64()
                   && v != 0.0
                   && v != 1.0
                {
                    return Ok(Term::int(0));
                }
                let success = Term::pow(p.clone(), x.clone())?;
                let failure = Term::pow(Term::sub(Term::int(1), p.clone())?,
                                        Term::sub(Term::int(1), x)?)?;
                Term::mul([success, failure])
            },
        }
    }

    /// Cumulative distribution function at `x`.
    ///
    /// # Errors
    /// `Unsupported` for a Bernoulli variable at a symbolic point.
    pub fn cdf(&self, x: Term) -> BackendResult<Term> {
        match &self.law {
            Law::Normal { mean, std } => {
                let root_two = Term::sqrt(Term::int(2))?;
                let argument = Term::div(Term::sub(x, mean.clone())?,
                                         Term::mul([std.clone(), root_two])?)?;
                let sum = Term::add([Term::int(1), Term::erf(argument)?])?;
                Term::mul([Term::rational(1, 2)?, sum])
            },
            Law::Weibull { shape, scale } => {
                if is_negative_number(&x) {
                    return Ok(Term::int(0));
                }
                let ratio = Term::div(x, scale.clone())?;
                let tail = Term::exp(Term::neg(Term::pow(ratio, shape.clone())?)?)?;
                Term::sub(Term::int(1), tail)
            },
            Law::Chi { k } => {
                if is_negative_number(&x) {
                    return Ok(Term::int(0));
                }
                let half_k = Term::div(k.clone(), Term::int(2))?;
                let half_square = Term::div(Term::pow(x, Term::int(2))?, Term::int(2))?;
                Term::gamma_regularized_lower(half_k, half_square)
            },
            Law::Bernoulli { p } => {
                let Some(v) = x.to_f64() else {
                    return Err(BackendError::Unsupported { details: format!("the Bernoulli \
                                                                             CDF needs a \
                                                                             numeric point, \
                                                                             got {x}") });
                };
                if v < 0.0 {
                    Ok(Term::int(0))
                } else if v < 1.0 {
                    Term::sub(Term::int(1), p.clone())
                } else {
                    Ok(Term::int(1))
                }
            },
        }
    }

    /// Expected value.
    pub fn expectation(&self) -> BackendResult<Term> {
        match &self.law {
            Law::Normal { mean, .. } => Ok(mean.clone()),
            Law::Weibull { shape, scale } => {
                let g1 = Term::gamma(Term::add([Term::int(1),
                                                Term::div(Term::int(1), shape.clone())?])?)?;
                Term::mul([scale.clone(), g1])
            },
            Law::Chi { k } => chi_mean(k),
            Law::Bernoulli { p } => Ok(p.clone()),
        }
    }

    /// Variance.
    pub fn variance(&self) -> BackendResult<Term> {
        match &self.law {
            Law::Normal { std, .. } => Term::pow(std.clone(), Term::int(2)),
            Law::Weibull { shape, scale } => {
                let g1 = Term::gamma(Term::add([Term::int(1),
                                                Term::div(Term::int(1), shape.clone())?])?)?;
                let g2 = Term::gamma(Term::add([Term::int(1),
                                                Term::div(Term::int(2), shape.clone())?])?)?;
                let spread = Term::sub(g2, Term::pow(g1, Term::int(2))?)?;
                Term::mul([Term::pow(scale.clone(), Term::int(2))?, spread])
            },
            Law::Chi { k } => Term::sub(k.clone(), Term::pow(chi_mean(k)?, Term::int(2))?),
            Law::Bernoulli { p } => {
                Term::mul([p.clone(), Term::sub(Term::int(1), p.clone())?])
            },
        }
    }

    /// Draws a single sample.
    ///
    /// # Errors
    /// `Unsupported` when a parameter has no numeric value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BackendResult<Term> {
        Ok(self.sampler()?.draw(rng))
    }

    /// A lazy, unbounded stream of independent samples.
    ///
    /// # Errors
    /// `Unsupported` when a parameter has no numeric value.
    ///
    /// # Example
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use symstat::backend::{random_variable::RandomVariable, term::Term};
    ///
    /// let coin = RandomVariable::bernoulli("rv#0".into(), Term::real(0.5)).unwrap();
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let flips: Vec<Term> = coin.samples(&mut rng).unwrap().take(10).collect();
    ///
    /// assert_eq!(flips.len(), 10);
    /// assert!(flips.iter().all(|t| *t == Term::int(0) || *t == Term::int(1)));
    /// ```
    pub fn samples<'r, R: Rng + ?Sized>(&self, rng: &'r mut R) -> BackendResult<Samples<'r, R>> {
        Ok(Samples { sampler: self.sampler()?,
                     rng })
    }

    fn sampler(&self) -> BackendResult<Sampler> {
        let distribution = self.law.name();
        let numeric = |parameter: &'static str, value: &Term| {
            value.to_f64()
                 .ok_or_else(|| BackendError::Unsupported { details: format!("sampling needs \
                                                                              a numeric \
                                                                              {parameter}, \
                                                                              got {value}") })
        };

        match &self.law {
            Law::Normal { mean, std } => {
                Normal::new(numeric("mean", mean)?, numeric("std", std)?)
                    .map(Sampler::Normal)
                    .map_err(|e| invalid(distribution, "std", e.to_string()))
            },
            Law::Weibull { shape, scale } => {
                Weibull::new(numeric("scale", scale)?, numeric("shape", shape)?)
                    .map(Sampler::Weibull)
                    .map_err(|e| invalid(distribution, "shape", e.to_string()))
            },
            Law::Chi { k } => {
                ChiSquared::new(numeric("k", k)?).map(Sampler::Chi)
                                                 .map_err(|e| invalid(distribution, "k", e.to_string()))
            },
            Law::Bernoulli { p } => {
                Bernoulli::new(numeric("p", p)?).map(Sampler::Bernoulli)
                                                .map_err(|e| invalid(distribution, "p", e.to_string()))
            },
        }
    }
}

/// `sqrt(2) Gamma((k+1)/2) / Gamma(k/2)`
fn chi_mean(k: &Term) -> BackendResult<Term> {
    let upper = Term::gamma(Term::div(Term::add([k.clone(), Term::int(1)])?, Term::int(2))?)?;
    let lower = Term::gamma(Term::div(k.clone(), Term::int(2))?)?;
    Term::mul([Term::sqrt(Term::int(2))?, Term::div(upper, lower)?])
}

/// Numeric sampling distribution behind a random variable.
#[derive(Debug)]
enum Sampler {
    Normal(Normal<f64>),
    Weibull(Weibull<f64>),
    Chi(ChiSquared<f64>),
    Bernoulli(Bernoulli),
}

impl Sampler {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Term {
        match self {
            Self::Normal(d) => Term::real(d.sample(rng)),
            Self::Weibull(d) => Term::real(d.sample(rng)),
            Self::Chi(d) => Term::real(d.sample(rng).sqrt()),
            Self::Bernoulli(d) => Term::int(i64::from(d.sample(rng))),
        }
    }
}

/// Unbounded iterator of samples, see [`RandomVariable::samples`].
pub struct Samples<'r, R: Rng + ?Sized> {
    sampler: Sampler,
    rng:     &'r mut R,
}

impl<R: Rng + ?Sized> Iterator for Samples<'_, R> {
    type Item = Term;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sampler.draw(self.rng))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        backend::term::Assumption,
        interpreter::value::core::Number,
    };

    fn standard_normal() -> RandomVariable {
        RandomVariable::normal("rv#0".into(), Term::int(0), Term::int(1)).unwrap()
    }

    #[test]
    fn standard_normal_density_at_zero_is_exact() {
        let density = standard_normal().density(Term::int(0)).unwrap();
        let two_pi = Term::Mul(vec![Term::int(2), Term::Const(Constant::Pi)]);
        assert_eq!(density,
                   Term::Pow(Box::new(two_pi), Box::new(Term::rational(-1, 2).unwrap())));
    }

    #[test]
    fn standard_normal_cdf_at_zero_is_one_half() {
        assert_eq!(standard_normal().cdf(Term::int(0)).unwrap(), Term::rational(1, 2).unwrap());
    }

    #[test]
    fn symbolic_sigma_with_positive_assumption_is_accepted() {
        let sigma = Term::symbol("s", Some(Assumption::Positive));
        let rv = RandomVariable::normal("rv#0".into(), Term::symbol("m", Some(Assumption::Real)), sigma.clone());
        assert_eq!(rv.unwrap().variance().unwrap(), Term::pow(sigma, Term::int(2)).unwrap());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(RandomVariable::bernoulli("rv#0".into(), Term::rational(3, 2).unwrap()),
                         Err(BackendError::InvalidParameter { parameter: "p", .. })));
        assert!(matches!(RandomVariable::chi("rv#0".into(), Term::int(0)),
                         Err(BackendError::InvalidParameter { parameter: "k", .. })));
    }

    #[test]
    fn weibull_with_unit_shape_is_exponential() {
        let rv = RandomVariable::weibull("rv#0".into(), Term::int(1), Term::int(2)).unwrap();
        assert_eq!(rv.expectation().unwrap(), Term::int(2));
        assert_eq!(rv.variance().unwrap(), Term::int(4));
        assert_eq!(rv.density(Term::int(-3)).unwrap(), Term::int(0));
    }

    #[test]
    fn chi_with_two_degrees_has_known_cdf() {
        let rv = RandomVariable::chi("rv#0".into(), Term::int(2)).unwrap();
        let cdf = rv.cdf(Term::real(1.0)).unwrap();
        let expected = 1.0 - (-0.5_f64).exp();
        assert!((cdf.to_f64().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn bernoulli_mass_and_cdf() {
        let rv = RandomVariable::bernoulli("rv#0".into(), Term::rational(1, 4).unwrap()).unwrap();
        assert_eq!(rv.density(Term::int(1)).unwrap(), Term::rational(1, 4).unwrap());
        assert_eq!(rv.density(Term::int(0)).unwrap(), Term::rational(3, 4).unwrap());
        assert_eq!(rv.density(Term::int(2)).unwrap(), Term::int(0));
        assert_eq!(rv.cdf(Term::rational(1, 2).unwrap()).unwrap(),
                   Term::rational(3, 4).unwrap());
        assert!(matches!(rv.cdf(Term::symbol("x", None)),
                         Err(BackendError::Unsupported { .. })));
    }

    #[test]
    fn symbolic_parameters_cannot_be_sampled() {
        let rv = RandomVariable::normal("rv#0".into(), Term::symbol("m", None), Term::int(1)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(rv.sample(&mut rng), Err(BackendError::Unsupported { .. })));
    }

    #[test]
    fn normal_samples_match_moments() {
        let rv = RandomVariable::normal("rv#0".into(), Term::int(3), Term::int(2)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<f64> = rv.samples(&mut rng)
                                 .unwrap()
                                 .take(20_000)
                                 .map(|t| match t {
                                     Term::Num(Number::Real(v)) => v,
                                     other => panic!("expected a real sample, got {other:?}"),
                                 })
                                 .collect();
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!((mean - 3.0).abs() < 0.1);
        assert!((variance - 4.0).abs() < 0.3);
    }
}
