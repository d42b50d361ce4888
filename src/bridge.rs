use crate::{
    ast::Expr,
    backend::{
        special::Func,
        term::{Assumption, Constant, Term},
    },
    error::ConversionError,
    interpreter::value::core::Number,
};

/// Converts a host expression into a backend term.
///
/// Free symbols become backend symbols carrying `assumption`; the assumption
/// reaches every symbol inside a compound expression. `Pi` and `E` become
/// constants. Arithmetic heads and the special functions the backend knows
/// are rebuilt through the backend's smart constructors, so the result is
/// canonical.
///
/// # Errors
/// `NotConvertible` for strings, lists and calls without a backend
/// counterpart; `Backend` when rebuilding the term fails (e.g. `1/0`).
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     backend::term::{Assumption, Term},
///     bridge::to_backend,
/// };
///
/// let sigma = to_backend(&Expr::symbol("s"), Some(Assumption::Positive)).unwrap();
/// assert_eq!(sigma.is_positive(), Some(true));
///
/// let sum = to_backend(&Expr::call("Plus", [Expr::from(1), Expr::from(2)]), None).unwrap();
/// assert_eq!(sum, Term::int(3));
///
/// assert!(to_backend(&Expr::String("x".into()), None).is_err());
/// ```
pub fn to_backend(expr: &Expr, assumption: Option<Assumption>) -> Result<Term, ConversionError> {
    let not_convertible = || ConversionError::NotConvertible { found: expr.to_string() };

    match expr {
        Expr::Number(n) => Ok(Term::Num(*n)),
        Expr::Symbol(name) => Ok(match name.as_str() {
                                     "Pi" => Term::Const(Constant::Pi),
                                     "E" => Term::Const(Constant::E),
                                     _ => Term::symbol(name, assumption),
                                 }),
        Expr::String(_) | Expr::List(_) => Err(not_convertible()),
        Expr::Call { head, args } => {
            let terms = args.iter()
                            .map(|arg| to_backend(arg, assumption))
                            .collect::<Result<Vec<_>, _>>()?;

            let term = match (head.as_str(), terms.as_slice()) {
                ("Plus", _) => Term::add(terms)?,
                ("Times", _) => Term::mul(terms)?,
                ("Power", [base, exponent]) => Term::pow(base.clone(), exponent.clone())?,
                ("Sqrt", [x]) => Term::sqrt(x.clone())?,
                ("Exp", [x]) => Term::exp(x.clone())?,
                ("Erf", [x]) => Term::erf(x.clone())?,
                ("Gamma", [x]) => Term::gamma(x.clone())?,
                ("GammaRegularized", [s, lower, x])
                    if lower.as_number().is_some_and(Number::is_exact_zero) =>
                {
                    Term::gamma_regularized_lower(s.clone(), x.clone())?
                },
                ("Conjugate", [x]) => Term::conjugate(x.clone())?,
                _ => return Err(not_convertible()),
            };
            Ok(term)
        },
    }
}

/// Converts a backend term back into a host expression.
///
/// Exact numbers stay exact. `exp(x)` comes back as `Power[E, x]` and the
/// regularized lower incomplete gamma as `GammaRegularized[s, 0, x]`.
///
/// # Example
/// ```
/// use symstat::{
///     ast::Expr,
///     backend::term::{Constant, Term},
///     bridge::from_backend,
/// };
///
/// let t = Term::mul([Term::rational(1, 2).unwrap(), Term::Const(Constant::Pi)]).unwrap();
/// assert_eq!(from_backend(&t).to_string(), "Times[Rational[1, 2], Pi]");
/// ```
#[must_use]
pub fn from_backend(term: &Term) -> Expr {
    let all = |terms: &[Term]| terms.iter().map(from_backend).collect::<Vec<_>>();

    match term {
        Term::Num(n) => Expr::Number(*n),
        Term::Sym(symbol) => Expr::Symbol(symbol.name.clone()),
        Term::Const(Constant::Pi) => Expr::symbol("Pi"),
        Term::Const(Constant::E) => Expr::symbol("E"),
        Term::Add(terms) => Expr::call("Plus", all(terms)),
        Term::Mul(factors) => Expr::call("Times", all(factors)),
        Term::Pow(base, exponent) => {
            Expr::call("Power", [from_backend(base), from_backend(exponent)])
        },
        Term::Apply(Func::Exp, args) => {
            Expr::call("Power", std::iter::once(Expr::symbol("E")).chain(all(args)))
        },
        Term::Apply(Func::Erf, args) => Expr::call("Erf", all(args)),
        Term::Apply(Func::Gamma, args) => Expr::call("Gamma", all(args)),
        Term::Apply(Func::GammaRegularizedLower, args) => match args.as_slice() {
            [s, x] => Expr::call("GammaRegularized",
                                 [from_backend(s), Expr::from(0), from_backend(x)]),
            _ => Expr::call("GammaRegularized", all(args)),
        },
        Term::Apply(Func::Conjugate, args) => Expr::call("Conjugate", all(args)),
    }
}
