use std::fmt::Display;

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::evaluator::{
        core::{Context, EvalResult},
        function::{arith, distribution, statistic},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the context and its evaluated arguments. It returns
/// `Ok(Some(expr))` to rewrite the call, `Ok(None)` to leave it unevaluated
/// without complaint, or an error to leave it unevaluated with a message.
type BuiltinFn = fn(&mut Context, &[Expr]) -> EvalResult<Option<Expr>>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `Variadic` accepts any number of arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    Variadic,
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Heads with a builtin definition.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "Plus"                  => { arity: Arity::Variadic, func: arith::plus },
    "Times"                 => { arity: Arity::Variadic, func: arith::times },
    "Power"                 => { arity: Arity::Exact(2), func: arith::power },
    "Sqrt"                  => { arity: Arity::Exact(1), func: arith::sqrt },
    "Conjugate"             => { arity: Arity::Exact(1), func: arith::conjugate },
    "NormalDistribution"    => { arity: Arity::Variadic, func: distribution::inert },
    "WeibullDistribution"   => { arity: Arity::Variadic, func: distribution::inert },
    "ChiDistribution"       => { arity: Arity::Variadic, func: distribution::inert },
    "BernoulliDistribution" => { arity: Arity::Variadic, func: distribution::inert },
    "PDF"                   => { arity: Arity::Exact(2), func: statistic::pdf },
    "CDF"                   => { arity: Arity::Exact(2), func: statistic::cdf },
    "Mean"                  => { arity: Arity::Exact(1), func: statistic::mean },
    "Variance"              => { arity: Arity::Exact(1), func: statistic::variance },
    "StandardDeviation"     => { arity: Arity::Exact(1), func: statistic::standard_deviation },
    "Covariance"            => { arity: Arity::Exact(2), func: statistic::covariance },
    "RandomVariate"         => { arity: Arity::OneOf(&[1, 2]), func: statistic::random_variate },
    "SeedRandom"            => { arity: Arity::OneOf(&[0, 1]), func: statistic::seed_random },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::Variadic => true,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                for (index, n) in counts.iter().enumerate() {
                    match index {
                        0 => write!(f, "{n}")?,
                        i if i + 1 == counts.len() => write!(f, " or {n}")?,
                        _ => write!(f, ", {n}")?,
                    }
                }
                Ok(())
            },
            Self::Variadic => write!(f, "any number of"),
        }
    }
}

/// Returns `true` if `name` has a builtin definition.
///
/// # Example
/// ```
/// use symstat::interpreter::evaluator::function::core::is_builtin;
///
/// assert!(is_builtin("Mean"));
/// assert!(!is_builtin("Probability"));
/// ```
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

impl Context {
    /// Applies the builtin named `head` to already evaluated arguments.
    ///
    /// Heads without a builtin definition are left alone (`Ok(None)`). For a
    /// builtin, the argument count is checked before the handler runs.
    ///
    /// # Parameters
    /// - `head`: Head of the call.
    /// - `args`: Evaluated arguments.
    ///
    /// # Returns
    /// The rewritten expression, `None` when the call stays as it is, or the
    /// failure to report.
    ///
    /// # Example
    /// ```
    /// use symstat::{ast::Expr, interpreter::evaluator::core::Context};
    ///
    /// let mut ctx = Context::new();
    /// let r = ctx.apply("Plus", &[Expr::from(1), Expr::rational(1, 2)]).unwrap();
    /// assert_eq!(r, Some(Expr::rational(3, 2)));
    ///
    /// assert_eq!(ctx.apply("Foo", &[]).unwrap(), None);
    /// assert!(ctx.apply("PDF", &[Expr::from(1)]).is_err());
    /// ```
    pub fn apply(&mut self, head: &str, args: &[Expr]) -> EvalResult<Option<Expr>> {
        let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == head) else {
            trace!(head, "no builtin");
            return Ok(None);
        };

        if !builtin.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCount { operator: head.to_string(),
                                                     expected: builtin.arity.to_string(),
                                                     found:    args.len(), });
        }

        trace!(head, arguments = args.len(), "dispatching builtin");
        (builtin.func)(self, args)
    }
}
