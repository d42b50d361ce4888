use crate::{
    ast::Expr,
    backend::{
        random_variable::RandomVariable,
        term::{Assumption, BackendResult, Term},
    },
    bridge,
    error::{BackendError, RuntimeError},
    interpreter::evaluator::core::{Context, EvalResult},
};

/// A parameter of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// The name the host uses for the parameter.
    pub name:       &'static str,
    /// The name the backend uses in its reports.
    pub backend:    &'static str,
    /// Domain assumption attached to symbols in the parameter.
    pub assumption: Option<Assumption>,
}

const fn parameter(name: &'static str,
                   backend: &'static str,
                   assumption: Option<Assumption>)
                   -> Parameter {
    Parameter { name,
                backend,
                assumption }
}

type Constructor = fn(String, Vec<Term>) -> BackendResult<RandomVariable>;

/// The supported distribution families.
///
/// A distribution expression is an ordinary call such as
/// `NormalDistribution[mu, sigma]`; it is recognized by its head and its
/// number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// `NormalDistribution[mu, sigma]`
    Normal,
    /// `WeibullDistribution[alpha, beta]` with shape `alpha` and scale `beta`.
    Weibull,
    /// `ChiDistribution[k]`
    Chi,
    /// `BernoulliDistribution[p]`
    Bernoulli,
}

/// How an argument relates to the distributions and lists the statistic
/// operators accept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified<'a> {
    /// A list with its elements.
    List(&'a [Expr]),
    /// A well-formed distribution expression with its parameters.
    Distribution(Distribution, &'a [Expr]),
    /// A distribution head with the wrong number of parameters.
    Malformed {
        /// The family named by the head.
        distribution: Distribution,
        /// The number of parameters given.
        found:        usize,
    },
    /// Anything else.
    Other,
}

impl Distribution {
    /// All families, in declaration order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Weibull, Self::Chi, Self::Bernoulli];

    /// The head of the distribution expression.
    #[must_use]
    pub const fn head(self) -> &'static str {
        match self {
            Self::Normal => "NormalDistribution",
            Self::Weibull => "WeibullDistribution",
            Self::Chi => "ChiDistribution",
            Self::Bernoulli => "BernoulliDistribution",
        }
    }

    /// The parameters, in the order they appear in the expression.
    #[must_use]
    pub const fn parameters(self) -> &'static [Parameter] {
        const NORMAL: &[Parameter] = &[parameter("mu", "mean", None),
                                       parameter("sigma", "std", Some(Assumption::Positive))];
        const WEIBULL: &[Parameter] = &[parameter("alpha", "shape", Some(Assumption::Positive)),
                                        parameter("beta", "scale", Some(Assumption::Positive))];
        const CHI: &[Parameter] = &[parameter("k", "k", Some(Assumption::Positive))];
        const BERNOULLI: &[Parameter] = &[parameter("p", "p", Some(Assumption::UnitInterval))];

        match self {
            Self::Normal => NORMAL,
            Self::Weibull => WEIBULL,
            Self::Chi => CHI,
            Self::Bernoulli => BERNOULLI,
        }
    }

    /// Number of parameters.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.parameters().len()
    }

    /// Looks a family up by the head of its expression.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::evaluator::function::distribution::Distribution;
    ///
    /// assert_eq!(Distribution::from_head("ChiDistribution"), Some(Distribution::Chi));
    /// assert_eq!(Distribution::from_head("Chi"), None);
    /// ```
    #[must_use]
    pub fn from_head(head: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.head() == head)
    }

    fn constructor(self) -> Constructor {
        match self {
            Self::Normal => |name, params| {
                let [mean, std] = exactly("Normal", params)?;
                RandomVariable::normal(name, mean, std)
            },
            Self::Weibull => |name, params| {
                let [shape, scale] = exactly("Weibull", params)?;
                RandomVariable::weibull(name, shape, scale)
            },
            Self::Chi => |name, params| {
                let [k] = exactly("Chi", params)?;
                RandomVariable::chi(name, k)
            },
            Self::Bernoulli => |name, params| {
                let [p] = exactly("Bernoulli", params)?;
                RandomVariable::bernoulli(name, p)
            },
        }
    }

    /// Builds a fresh backend random variable from the parameters of a
    /// distribution expression.
    ///
    /// A new name is allocated on every call, and each parameter is converted
    /// with its domain assumption attached.
    ///
    /// # Errors
    /// - `NotConvertible` when a parameter has no backend counterpart.
    /// - `InvalidParameter` when a parameter is decidably outside its domain,
    ///   e.g. a negative `sigma`.
    pub fn to_backend(self,
                      context: &mut Context,
                      params: &[Expr],
                      operator: &'static str)
                      -> EvalResult<RandomVariable> {
        let name = context.fresh_name();

        let terms = self.parameters()
                        .iter()
                        .zip(params)
                        .map(|(parameter, expr)| {
                            bridge::to_backend(expr, parameter.assumption)
                                .map_err(|e| RuntimeError::conversion(operator, e))
                        })
                        .collect::<EvalResult<Vec<_>>>()?;

        let build = self.constructor();
        build(name, terms).map_err(|error| self.attach(operator, error))
    }

    /// Names the host distribution and parameter in a backend failure.
    fn attach(self, operator: &'static str, error: BackendError) -> RuntimeError {
        match error {
            BackendError::InvalidParameter { parameter, details, .. } => {
                RuntimeError::InvalidParameter { distribution: self.head(),
                                                 parameter: self.host_parameter(parameter),
                                                 details }
            },
            other => RuntimeError::backend(operator, other),
        }
    }

    fn host_parameter(self, backend: &'static str) -> &'static str {
        self.parameters()
            .iter()
            .find(|p| p.backend == backend)
            .map_or(backend, |p| p.name)
    }
}

fn exactly<const N: usize>(distribution: &str, params: Vec<Term>) -> BackendResult<[Term; N]> {
    params.try_into().map_err(|params: Vec<Term>| {
                         let details =
                             format!("{distribution} takes {N} parameters, got {}", params.len());
                         BackendError::Unsupported { details }
                     })
}

/// Classifies an argument of a statistic operator.
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::function::distribution::{Classified, Distribution, classify},
/// };
///
/// let chi = Expr::call("ChiDistribution", [Expr::from(3)]);
/// assert!(matches!(classify(&chi), Classified::Distribution(Distribution::Chi, _)));
///
/// let broken = Expr::call("ChiDistribution", []);
/// assert_eq!(classify(&broken),
///            Classified::Malformed { distribution: Distribution::Chi,
///                                    found:        0, });
///
/// assert_eq!(classify(&Expr::symbol("x")), Classified::Other);
/// ```
#[must_use]
pub fn classify(expr: &Expr) -> Classified<'_> {
    match expr {
        Expr::List(items) => Classified::List(items),
        Expr::Call { head, args } => match Distribution::from_head(head) {
            Some(distribution) if distribution.arity() == args.len() => {
                Classified::Distribution(distribution, args)
            },
            Some(distribution) => Classified::Malformed { distribution,
                                                          found: args.len() },
            None => Classified::Other,
        },
        _ => Classified::Other,
    }
}

/// Argument-count failure for a malformed distribution expression.
#[must_use]
pub fn malformed(distribution: Distribution, found: usize) -> RuntimeError {
    RuntimeError::ArgumentCount { operator: distribution.head().to_string(),
                                  expected: distribution.arity().to_string(),
                                  found }
}

/// Distribution constructors never rewrite: the expression itself is the
/// value and carries its parameters.
#[allow(clippy::unnecessary_wraps)]
pub const fn inert(_: &mut Context, _: &[Expr]) -> EvalResult<Option<Expr>> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_has_a_distinct_head() {
        for d in Distribution::ALL {
            assert_eq!(Distribution::from_head(d.head()), Some(d));
        }
    }

    #[test]
    fn each_conversion_uses_a_fresh_name() {
        let mut ctx = Context::new();
        let params = [Expr::from(0), Expr::from(1)];
        let a = Distribution::Normal.to_backend(&mut ctx, &params, "PDF").unwrap();
        let b = Distribution::Normal.to_backend(&mut ctx, &params, "PDF").unwrap();
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn invalid_parameters_use_host_names() {
        let mut ctx = Context::new();
        let params = [Expr::from(0), Expr::from(-1)];
        let err = Distribution::Normal.to_backend(&mut ctx, &params, "PDF").unwrap_err();
        assert!(matches!(err,
                         RuntimeError::InvalidParameter { distribution: "NormalDistribution",
                                                          parameter:    "sigma",
                                                          .. }));
    }

    #[test]
    fn unconvertible_parameters_are_reported() {
        let mut ctx = Context::new();
        let params = [Expr::String("p".into())];
        let err = Distribution::Bernoulli.to_backend(&mut ctx, &params, "Mean").unwrap_err();
        assert_eq!(err.tag(), "conv");
    }
}
