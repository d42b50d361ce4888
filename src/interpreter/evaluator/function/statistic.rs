use crate::{
    ast::Expr,
    backend::{
        random_variable::RandomVariable,
        term::{BackendResult, Term},
    },
    bridge::from_backend,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{
                distribution::{Classified, classify, malformed},
                moments,
            },
            utils::{check_arity, convert, convert_all, in_backend},
        },
        value::core::Number,
    },
    util::num::i64_to_usize_checked,
};

/// Builds a backend random variable from a distribution argument, or reports
/// why the argument is not one.
fn random_variable(context: &mut Context,
                   operator: &'static str,
                   arg: &Expr)
                   -> EvalResult<RandomVariable> {
    match classify(arg) {
        Classified::Distribution(distribution, params) => {
            distribution.to_backend(context, params, operator)
        },
        Classified::Malformed { distribution, found } => Err(malformed(distribution, found)),
        Classified::List(_) | Classified::Other => {
            Err(RuntimeError::ExpectedDistribution { operator,
                                                     found: arg.to_string() })
        },
    }
}

fn point_statistic(context: &mut Context,
                   operator: &'static str,
                   args: &[Expr],
                   statistic: fn(&RandomVariable, Term) -> BackendResult<Term>)
                   -> EvalResult<Option<Expr>> {
    check_arity(operator, args, 2)?;

    let rv = random_variable(context, operator, &args[0])?;
    let x = convert(operator, &args[1], None)?;
    let result = in_backend(operator, statistic(&rv, x))?;

    Ok(Some(from_backend(&result)))
}

/// `PDF[dist, x]`: the density of `dist` at `x`, or the probability mass for
/// discrete distributions.
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::{core::Context, function::statistic::pdf},
/// };
///
/// let mut ctx = Context::new();
/// let dist = Expr::call("NormalDistribution", [Expr::from(0), Expr::from(1)]);
/// let density = pdf(&mut ctx, &[dist, Expr::from(0)]).unwrap().unwrap();
///
/// assert_eq!(density.to_string(), "Power[Times[2, Pi], Rational[-1, 2]]");
/// assert!((density.to_f64().unwrap() - 0.398_942_280_401_432_7).abs() < 1e-12);
/// ```
pub fn pdf(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    point_statistic(context, "PDF", args, RandomVariable::density)
}

/// `CDF[dist, x]`: the cumulative distribution function of `dist` at `x`.
pub fn cdf(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    point_statistic(context, "CDF", args, RandomVariable::cdf)
}

/// Applies a list statistic or a distribution moment, whichever the argument
/// calls for.
fn moment(context: &mut Context,
          operator: &'static str,
          arg: &Expr,
          of_list: fn(&'static str, Vec<Term>) -> EvalResult<Term>,
          of_distribution: fn(&RandomVariable) -> BackendResult<Term>)
          -> EvalResult<Term> {
    match classify(arg) {
        Classified::List(items) => of_list(operator, convert_all(operator, items)?),
        Classified::Distribution(distribution, params) => {
            let rv = distribution.to_backend(context, params, operator)?;
            in_backend(operator, of_distribution(&rv))
        },
        Classified::Malformed { distribution, found } => Err(malformed(distribution, found)),
        Classified::Other => {
            Err(RuntimeError::ExpectedListOrDistribution { operator,
                                                           found: arg.to_string() })
        },
    }
}

/// `Mean[list]` is `Total[list] / Length[list]`; `Mean[dist]` is the
/// expectation of the distribution.
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::{core::Context, function::statistic::mean},
/// };
///
/// let mut ctx = Context::new();
/// let values = Expr::list([Expr::symbol("a"), Expr::symbol("b"), Expr::from(213)]);
/// let m = mean(&mut ctx, &[values]).unwrap().unwrap();
///
/// assert_eq!(m.to_string(), "Times[Rational[1, 3], Plus[213, a, b]]");
/// ```
pub fn mean(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    check_arity("Mean", args, 1)?;

    let m = moment(context, "Mean", &args[0], moments::mean, RandomVariable::expectation)?;
    Ok(Some(from_backend(&m)))
}

/// `Variance[list]` is the unbiased sample variance; `Variance[dist]` is the
/// variance of the distribution.
pub fn variance(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    check_arity("Variance", args, 1)?;

    let v = moment(context,
                   "Variance",
                   &args[0],
                   |operator, values| moments::variance(operator, &values),
                   RandomVariable::variance)?;
    Ok(Some(from_backend(&v)))
}

/// `StandardDeviation[x]` is `Sqrt[Variance[x]]`.
pub fn standard_deviation(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    const OPERATOR: &str = "StandardDeviation";
    check_arity(OPERATOR, args, 1)?;

    let v = moment(context,
                   OPERATOR,
                   &args[0],
                   |operator, values| moments::variance(operator, &values),
                   RandomVariable::variance)?;
    let sd = in_backend(OPERATOR, Term::sqrt(v))?;
    Ok(Some(from_backend(&sd)))
}

/// `Covariance[xs, ys]` is the unbiased sample covariance of two lists of
/// equal length.
pub fn covariance(_: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    const OPERATOR: &str = "Covariance";
    check_arity(OPERATOR, args, 2)?;

    fn list(arg: &Expr) -> EvalResult<&[Expr]> {
        arg.as_list()
           .ok_or_else(|| RuntimeError::ExpectedList { operator: OPERATOR,
                                                       found:    arg.to_string(), })
    }
    let xs = list(&args[0])?;
    let ys = list(&args[1])?;
    if xs.len() != ys.len() {
        return Err(RuntimeError::LengthMismatch { operator: OPERATOR,
                                                  left:     xs.len(),
                                                  right:    ys.len(), });
    }

    let c = moments::covariance(OPERATOR,
                                &convert_all(OPERATOR, xs)?,
                                &convert_all(OPERATOR, ys)?)?;
    Ok(Some(from_backend(&c)))
}

/// `RandomVariate[dist]` draws one sample; `RandomVariate[dist, n]` draws a
/// list of `n` independent samples.
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::{
///         core::{Context, ContextConfig},
///         function::statistic::random_variate,
///     },
/// };
///
/// let mut ctx = Context::with_config(ContextConfig { seed: Some(3) });
/// let coin = Expr::call("BernoulliDistribution", [Expr::rational(1, 2)]);
///
/// let flips = random_variate(&mut ctx, &[coin.clone(), Expr::from(5)]).unwrap().unwrap();
/// assert_eq!(flips.as_list().map(<[Expr]>::len), Some(5));
///
/// let one = random_variate(&mut ctx, &[coin]).unwrap().unwrap();
/// assert!(one == Expr::from(0) || one == Expr::from(1));
/// ```
pub fn random_variate(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    const OPERATOR: &str = "RandomVariate";
    if !(1..=2).contains(&args.len()) {
        return Err(RuntimeError::ArgumentCount { operator: OPERATOR.to_string(),
                                                 expected: "1 or 2".to_string(),
                                                 found:    args.len(), });
    }

    let rv = random_variable(context, OPERATOR, &args[0])?;
    let count = match args.get(1) {
        None => 1,
        Some(arg) => sample_count(arg)?,
    };

    if count == 1 {
        let sample = in_backend(OPERATOR, rv.sample(context.rng()))?;
        return Ok(Some(from_backend(&sample)));
    }

    let samples = in_backend(OPERATOR, rv.samples(context.rng()))?;
    Ok(Some(Expr::list(samples.take(count).map(|t| from_backend(&t)))))
}

/// Largest number of samples a single `RandomVariate` call materializes.
pub const MAX_SAMPLE_COUNT: usize = 10_000_000;

fn sample_count(arg: &Expr) -> EvalResult<usize> {
    let invalid = || RuntimeError::InvalidSampleCount { found: arg.to_string(),
                                                        limit: MAX_SAMPLE_COUNT, };
    match arg.as_number() {
        Some(Number::Integer(n)) if *n > 0 => {
            let count = i64_to_usize_checked(*n, invalid())?;
            if count > MAX_SAMPLE_COUNT {
                return Err(invalid());
            }
            Ok(count)
        },
        _ => Err(invalid()),
    }
}

/// `SeedRandom[n]` reseeds the random generator with `n`; `SeedRandom[]`
/// reseeds it from the operating system. Returns `Null`.
pub fn seed_random(context: &mut Context, args: &[Expr]) -> EvalResult<Option<Expr>> {
    const OPERATOR: &str = "SeedRandom";

    let seed = match args {
        [] => None,
        [arg] => {
            let invalid = || RuntimeError::InvalidSeed { operator: OPERATOR,
                                                         found:    arg.to_string(), };
            let n = arg.as_number().ok_or_else(invalid)?;
            let Number::Integer(n) = n else {
                return Err(invalid());
            };
            Some(u64::try_from(*n).map_err(|_| invalid())?)
        },
        _ => {
            return Err(RuntimeError::ArgumentCount { operator: OPERATOR.to_string(),
                                                     expected: "0 or 1".to_string(),
                                                     found:    args.len(), });
        },
    };

    context.reseed(seed);
    Ok(Some(Expr::null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::evaluator::core::ContextConfig;

    fn normal(mu: Expr, sigma: Expr) -> Expr {
        Expr::call("NormalDistribution", [mu, sigma])
    }

    #[test]
    fn pdf_needs_a_distribution() {
        let mut ctx = Context::new();
        let err = pdf(&mut ctx, &[Expr::list([]), Expr::from(0)]).unwrap_err();
        assert_eq!(err.tag(), "dist");
    }

    #[test]
    fn malformed_distributions_report_their_arity() {
        let mut ctx = Context::new();
        let broken = Expr::call("NormalDistribution", [Expr::from(0)]);
        let err = mean(&mut ctx, &[broken]).unwrap_err();
        assert_eq!(err,
                   RuntimeError::ArgumentCount { operator: "NormalDistribution".into(),
                                                 expected: "2".into(),
                                                 found:    1, });
    }

    #[test]
    fn mean_of_a_symbol_is_rejected() {
        let mut ctx = Context::new();
        let err = mean(&mut ctx, &[Expr::symbol("x")]).unwrap_err();
        assert_eq!(err.tag(), "rectn");
    }

    #[test]
    fn variance_of_a_normal_is_sigma_squared() {
        let mut ctx = Context::new();
        let v = variance(&mut ctx, &[normal(Expr::symbol("m"), Expr::symbol("s"))]).unwrap();
        assert_eq!(v, Some(Expr::call("Power", [Expr::symbol("s"), Expr::from(2)])));
    }

    #[test]
    fn standard_deviation_of_a_normal_is_sigma() {
        let mut ctx = Context::new();
        let sd = standard_deviation(&mut ctx, &[normal(Expr::from(1), Expr::symbol("s"))]);
        assert_eq!(sd.unwrap(), Some(Expr::symbol("s")));
    }

    #[test]
    fn standard_deviation_of_a_list_stays_exact() {
        let mut ctx = Context::new();
        let values = Expr::list([Expr::from(1), Expr::from(2), Expr::from(3), Expr::from(4)]);
        let sd = standard_deviation(&mut ctx, &[values]).unwrap().unwrap();
        assert_eq!(sd.to_string(), "Power[Rational[5, 3], Rational[1, 2]]");
    }

    #[test]
    fn covariance_rejects_non_lists() {
        let mut ctx = Context::new();
        let err = covariance(&mut ctx, &[Expr::symbol("x"), Expr::list([])]).unwrap_err();
        assert_eq!(err.tag(), "vector");
    }

    #[test]
    fn sample_counts_must_be_positive_integers() {
        let mut ctx = Context::with_config(ContextConfig { seed: Some(0) });
        let dist = normal(Expr::from(0), Expr::from(1));
        for bad in [Expr::from(0),
                    Expr::from(-3),
                    Expr::from(2.5),
                    Expr::symbol("n"),
                    Expr::from(i64::MAX)]
        {
            let err = random_variate(&mut ctx, &[dist.clone(), bad]).unwrap_err();
            assert_eq!(err.tag(), "array");
        }
    }

    #[test]
    fn symbolic_parameters_cannot_be_sampled() {
        let mut ctx = Context::new();
        let dist = normal(Expr::symbol("m"), Expr::from(1));
        let err = random_variate(&mut ctx, &[dist]).unwrap_err();
        assert_eq!(err.tag(), "unsup");
    }

    #[test]
    fn seeding_makes_sampling_repeatable() {
        let mut ctx = Context::new();
        let dist = normal(Expr::from(0), Expr::from(1));

        seed_random(&mut ctx, &[Expr::from(11)]).unwrap();
        let first = random_variate(&mut ctx, &[dist.clone(), Expr::from(4)]).unwrap();
        seed_random(&mut ctx, &[Expr::from(11)]).unwrap();
        let second = random_variate(&mut ctx, &[dist, Expr::from(4)]).unwrap();

        assert_eq!(first, second);
        assert!(seed_random(&mut ctx, &[Expr::from(-1)]).is_err());
    }
}
