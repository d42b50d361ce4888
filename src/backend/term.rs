use std::{cmp::Ordering, collections::BTreeMap};

use crate::{
    backend::special::{self, Func},
    error::BackendError,
    interpreter::value::core::Number,
};

/// Result type used throughout the backend.
pub type BackendResult<T> = Result<T, BackendError>;

/// A domain assumption attached to a backend symbol.
///
/// Every assumption implies that the symbol is real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Assumption {
    /// The symbol is real.
    Real,
    /// The symbol is real and strictly positive.
    Positive,
    /// The symbol is real and lies in `[0, 1]`.
    UnitInterval,
}

impl Assumption {
    /// The more specific of two assumptions about the same symbol. Two
    /// unrelated specific assumptions keep the first.
    fn strongest(first: Option<Self>, second: Option<Self>) -> Option<Self> {
        match (first, second) {
            (None | Some(Self::Real), Some(s)) => Some(s),
            (f, _) => f,
        }
    }
}

/// A free backend symbol.
///
/// Symbols are identified by name alone: the assumption is metadata, so `s`
/// and a positive `s` are the same symbol and collect as like terms.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// The symbol name as the host spells it.
    pub name:       String,
    /// What the backend may assume about the symbol.
    pub assumption: Option<Assumption>,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Mathematical constants known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number.
    E,
}

/// A backend term.
///
/// Terms are only built through the smart constructors ([`Term::add`],
/// [`Term::mul`], [`Term::pow`], [`Term::apply`], ...), which keep them in a
/// canonical form:
/// - sums and products are flat, with at most one numeric part placed first,
/// - like terms and like bases are collected,
/// - exact numbers fold exactly,
/// - an inexact number turns the whole node inexact when every other operand
///   has a numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A number.
    Num(Number),
    /// A free symbol.
    Sym(Symbol),
    /// A named constant.
    Const(Constant),
    /// A sum of at least two terms.
    Add(Vec<Self>),
    /// A product of at least two factors.
    Mul(Vec<Self>),
    /// `base ^ exponent`.
    Pow(Box<Self>, Box<Self>),
    /// A special function applied to its arguments.
    Apply(Func, Vec<Self>),
}

fn overflow<T>(value: Option<T>) -> BackendResult<T> {
    value.ok_or(BackendError::Overflow)
}

/// The slot for `key` in `map`, created with `empty` when missing. When an
/// equal symbol is already a key, the key keeps the stronger assumption.
fn slot<V>(map: &mut BTreeMap<Term, V>, key: Term, empty: V) -> &mut V {
    let (key, value) = match map.remove_entry(&key) {
        Some((Term::Sym(mut kept), value)) => {
            if let Term::Sym(incoming) = key {
                kept.assumption = Assumption::strongest(kept.assumption, incoming.assumption);
            }
            (Term::Sym(kept), value)
        },
        Some(existing) => existing,
        None => (key, empty),
    };
    map.entry(key).or_insert(value)
}

impl From<Number> for Term {
    fn from(n: Number) -> Self {
        Self::Num(n)
    }
}

impl Term {
    /// An exact integer.
    #[must_use]
    pub const fn int(v: i64) -> Self {
        Self::Num(Number::Integer(v))
    }

    /// A machine real.
    #[must_use]
    pub const fn real(v: f64) -> Self {
        Self::Num(Number::Real(v))
    }

    /// The exact fraction `numer / denom`.
    pub fn rational(numer: i64, denom: i64) -> BackendResult<Self> {
        Number::rational(numer, denom).map(Self::Num)
                                      .ok_or(BackendError::DivisionByZero)
    }

    /// A free symbol with an optional assumption.
    #[must_use]
    pub fn symbol(name: &str, assumption: Option<Assumption>) -> Self {
        Self::Sym(Symbol { name: name.to_string(),
                           assumption })
    }

    /// Returns the number if this term is numeric.
    #[must_use]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Num(n) => Some(n),
            _ => None,
        }
    }

    const fn is_exact_zero(&self) -> bool {
        matches!(self, Self::Num(Number::Integer(0)))
    }

    const fn is_exact_one(&self) -> bool {
        matches!(self, Self::Num(Number::Integer(1)))
    }

    const fn is_integer(&self) -> bool {
        matches!(self, Self::Num(Number::Integer(_)))
    }

    const fn is_inexact_number(&self) -> bool {
        matches!(self, Self::Num(Number::Real(_) | Number::Complex(_)))
    }

    /// Numeric value of the term, if it has one and it is a finite real.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::term::{Constant, Term};
    ///
    /// let two_pi = Term::mul([Term::int(2), Term::Const(Constant::Pi)]).unwrap();
    /// assert!((two_pi.to_f64().unwrap() - std::f64::consts::TAU).abs() < 1e-12);
    /// assert_eq!(Term::symbol("x", None).to_f64(), None);
    /// ```
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Num(n) => n.to_f64()?,
            Self::Sym(_) => return None,
            Self::Const(Constant::Pi) => std::f64::consts::PI,
            Self::Const(Constant::E) => std::f64::consts::E,
            Self::Add(terms) => terms.iter()
                                     .map(Self::to_f64)
                                     .sum::<Option<f64>>()?,
            Self::Mul(factors) => factors.iter()
                                         .map(Self::to_f64)
                                         .product::<Option<f64>>()?,
            Self::Pow(base, exponent) => base.to_f64()?.powf(exponent.to_f64()?),
            Self::Apply(func, args) => {
                let values = args.iter().map(Self::to_f64).collect::<Option<Vec<_>>>()?;
                func.evaluate(&values)?
            },
        };
        value.is_finite().then_some(value)
    }

    /// Whether the term is known to be real.
    #[must_use]
    pub fn is_real(&self) -> bool {
        match self {
            Self::Num(n) => !matches!(n, Number::Complex(_)),
            Self::Sym(s) => s.assumption.is_some(),
            Self::Const(_) => true,
            Self::Add(terms) | Self::Mul(terms) => terms.iter().all(Self::is_real),
            Self::Pow(base, exponent) => {
                (base.is_real() && exponent.is_integer())
                || (base.is_positive() == Some(true) && exponent.is_real())
            },
            Self::Apply(_, args) => args.iter().all(Self::is_real),
        }
    }

    /// Decides strict positivity: `Some(true)`, `Some(false)`, or `None` when
    /// undecidable.
    #[must_use]
    pub fn is_positive(&self) -> Option<bool> {
        match self {
            Self::Num(n) => Some(n.sign() == Some(Ordering::Greater)),
            Self::Sym(s) => (s.assumption == Some(Assumption::Positive)).then_some(true),
            Self::Const(_) => Some(true),
            Self::Add(terms) | Self::Mul(terms) => {
                terms.iter()
                     .all(|t| t.is_positive() == Some(true))
                     .then_some(true)
            },
            Self::Pow(base, exponent) => {
                (base.is_positive() == Some(true) && exponent.is_real()).then_some(true)
            },
            Self::Apply(Func::Exp, args) => args.iter().all(Self::is_real).then_some(true),
            Self::Apply(Func::Gamma, args) => {
                args.iter()
                    .all(|a| a.is_positive() == Some(true))
                    .then_some(true)
            },
            Self::Apply(..) => None,
        }
    }

    /// Decides membership in `[0, 1]`: `Some(true)`, `Some(false)`, or `None`
    /// when undecidable.
    #[must_use]
    pub fn in_unit_interval(&self) -> Option<bool> {
        match self {
            Self::Num(n) => Some(n.to_f64().is_some_and(|v| (0.0..=1.0).contains(&v))),
            Self::Sym(s) => (s.assumption == Some(Assumption::UnitInterval)).then_some(true),
            _ => None,
        }
    }

    /// Splits a leading numeric coefficient off a product.
    fn split_coefficient(self) -> (Number, Self) {
        match self {
            Self::Mul(mut factors) if matches!(factors.first(), Some(Self::Num(_))) => {
                let Self::Num(coefficient) = factors.remove(0) else {
                    unreachable!("first factor checked above")
                };
                let rest = if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                };
                (coefficient, rest)
            },
            other => (Number::Integer(1), other),
        }
    }

    /// Multiplies a non-numeric term by a numeric coefficient.
    fn scaled(coefficient: Number, rest: Self) -> Self {
        if coefficient.is_exact_one() {
            return rest;
        }
        match rest {
            Self::Mul(mut factors) => {
                factors.insert(0, Self::Num(coefficient));
                Self::Mul(factors)
            },
            other => Self::Mul(vec![Self::Num(coefficient), other]),
        }
    }

    /// Sums terms, collecting numbers and like terms.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::term::Term;
    ///
    /// let a = Term::symbol("a", None);
    /// let sum = Term::add([Term::int(2), a.clone(), Term::int(3), a.clone()]).unwrap();
    ///
    /// assert_eq!(sum, Term::Add(vec![Term::int(5), Term::mul([Term::int(2), a]).unwrap()]));
    /// ```
    pub fn add(terms: impl IntoIterator<Item = Self>) -> BackendResult<Self> {
        let mut constant = Number::Integer(0);
        let mut collected: BTreeMap<Self, Number> = BTreeMap::new();

        let mut pending: Vec<Self> = terms.into_iter().collect();
        pending.reverse();
        while let Some(term) = pending.pop() {
            match term {
                Self::Num(n) => constant = overflow(constant.checked_add(n))?,
                Self::Add(inner) => pending.extend(inner.into_iter().rev()),
                other => {
                    let (coefficient, rest) = other.split_coefficient();
                    let entry = slot(&mut collected, rest, Number::Integer(0));
                    *entry = overflow(entry.checked_add(coefficient))?;
                },
            }
        }

        collected.retain(|_, coefficient| !coefficient.is_zero());

        if !constant.is_exact() || collected.values().any(|c| !c.is_exact()) {
            let numeric = collected.iter()
                                   .map(|(term, c)| Some(c.to_f64()? * term.to_f64()?))
                                   .sum::<Option<f64>>();
            if let Some(v) = numeric {
                return Ok(Self::Num(overflow(constant.checked_add(Number::Real(v)))?));
            }
        }

        let mut out: Vec<Self> = collected.into_iter()
                                          .map(|(rest, c)| Self::scaled(c, rest))
                                          .collect();

        match (out.len(), constant.is_zero()) {
            (0, _) => Ok(Self::Num(constant)),
            (1, true) => Ok(out.remove(0)),
            (_, true) => Ok(Self::Add(out)),
            (_, false) => {
                out.insert(0, Self::Num(constant));
                Ok(Self::Add(out))
            },
        }
    }

    /// Multiplies factors, collecting numbers and like bases.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::term::Term;
    ///
    /// let x = Term::symbol("x", None);
    /// let product = Term::mul([x.clone(), Term::int(3), x.clone()]).unwrap();
    ///
    /// assert_eq!(product,
    ///            Term::Mul(vec![Term::int(3), Term::pow(x, Term::int(2)).unwrap()]));
    /// ```
    pub fn mul(factors: impl IntoIterator<Item = Self>) -> BackendResult<Self> {
        let mut coefficient = Number::Integer(1);
        let mut powers: BTreeMap<Self, Vec<Self>> = BTreeMap::new();

        let mut pending: Vec<Self> = factors.into_iter().collect();
        pending.reverse();
        while let Some(factor) = pending.pop() {
            match factor {
                Self::Num(n) => coefficient = overflow(coefficient.checked_mul(n))?,
                Self::Mul(inner) => pending.extend(inner.into_iter().rev()),
                Self::Pow(base, exponent) => slot(&mut powers, *base, Vec::new()).push(*exponent),
                other => slot(&mut powers, other, Vec::new()).push(Self::int(1)),
            }
        }

        if coefficient.is_zero() {
            return Ok(Self::Num(coefficient));
        }

        let mut out = Vec::with_capacity(powers.len());
        let mut spliced = false;
        for (base, exponents) in powers {
            match Self::pow(base, Self::add(exponents)?)? {
                Self::Num(n) => coefficient = overflow(coefficient.checked_mul(n))?,
                Self::Mul(inner) => {
                    spliced = true;
                    out.extend(inner);
                },
                other => out.push(other),
            }
        }

        if spliced {
            out.insert(0, Self::Num(coefficient));
            return Self::mul(out);
        }

        if !coefficient.is_exact()
           && let Some(v) = out.iter().map(Self::to_f64).product::<Option<f64>>()
        {
            return Ok(Self::Num(overflow(coefficient.checked_mul(Number::Real(v)))?));
        }

        if coefficient.is_zero() {
            return Ok(Self::Num(coefficient));
        }

        match (out.len(), coefficient.is_exact_one()) {
            (0, _) => Ok(Self::Num(coefficient)),
            (1, true) => Ok(out.remove(0)),
            (_, true) => Ok(Self::Mul(out)),
            (_, false) => {
                out.insert(0, Self::Num(coefficient));
                Ok(Self::Mul(out))
            },
        }
    }

    /// Raises `base` to `exponent`.
    ///
    /// Exact numeric powers fold exactly, including exact roots of perfect
    /// powers; other rational powers of exact numbers stay symbolic.
    ///
    /// # Errors
    /// `DivisionByZero` for zero raised to a negative power, `Overflow` when
    /// exact arithmetic overflows.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::term::Term;
    ///
    /// let half = Term::rational(1, 2).unwrap();
    /// assert_eq!(Term::pow(Term::int(9), half.clone()).unwrap(), Term::int(3));
    ///
    /// let root_two = Term::pow(Term::int(2), half).unwrap();
    /// assert!(matches!(root_two, Term::Pow(..)));
    /// ```
    pub fn pow(base: Self, exponent: Self) -> BackendResult<Self> {
        if exponent.is_exact_zero() {
            return Ok(Self::int(1));
        }
        if exponent.is_exact_one() {
            return Ok(base);
        }
        if base.is_exact_one() {
            return Ok(Self::int(1));
        }

        if let (Self::Num(b), Self::Num(e)) = (&base, &exponent) {
            return Self::pow_numbers(*b, *e);
        }

        if base.is_exact_zero() && exponent.is_positive() == Some(true) {
            return Ok(Self::int(0));
        }

        if (base.is_inexact_number() || exponent.is_inexact_number())
           && let (Some(b), Some(e)) = (base.to_f64(), exponent.to_f64())
        {
            return Self::pow_numbers(Number::Real(b), Number::Real(e));
        }

        match base {
            Self::Pow(inner, inner_exponent)
                if exponent.is_integer() || inner.is_positive() == Some(true) =>
            {
                Self::pow(*inner, Self::mul([*inner_exponent, exponent])?)
            },
            Self::Mul(factors) if exponent.is_integer() => {
                let powered = factors.into_iter()
                                     .map(|f| Self::pow(f, exponent.clone()))
                                     .collect::<BackendResult<Vec<_>>>()?;
                Self::mul(powered)
            },
            base => Ok(Self::Pow(Box::new(base), Box::new(exponent))),
        }
    }

    fn pow_numbers(base: Number, exponent: Number) -> BackendResult<Self> {
        if base.is_zero() {
            return match exponent.sign() {
                Some(Ordering::Less) => Err(BackendError::DivisionByZero),
                Some(Ordering::Greater) => Ok(Self::Num(base)),
                _ => Ok(Self::int(1)),
            };
        }

        match exponent {
            Number::Integer(k) => overflow(base.checked_powi(k)).map(Self::Num),
            Number::Rational(r) if base.is_exact() => {
                let root = u32::try_from(*r.denom()).ok()
                                                    .and_then(|d| base.exact_root(d));
                match root {
                    Some(root) => overflow(root.checked_powi(*r.numer())).map(Self::Num),
                    None => Ok(Self::Pow(Box::new(Self::Num(base)),
                                         Box::new(Self::Num(exponent)))),
                }
            },
            _ => {
                base.powf(exponent)
                    .map(Self::Num)
                    .ok_or_else(|| BackendError::Unsupported { details: format!("cannot raise \
                                                                                 {base} to \
                                                                                 {exponent}") })
            },
        }
    }

    /// Applies a special function, folding exact special values and
    /// evaluating numerically when an argument is inexact.
    ///
    /// # Errors
    /// `Unsupported` when the number of arguments does not match the
    /// function, `DivisionByZero` at poles of `Gamma`.
    pub fn apply(func: Func, mut args: Vec<Self>) -> BackendResult<Self> {
        if args.len() != func.arity() {
            return Err(BackendError::Unsupported { details: format!("{} expects {} \
                                                                     arguments, got {}",
                                                                    func.name(),
                                                                    func.arity(),
                                                                    args.len()) });
        }

        if func == Func::Conjugate {
            return Self::conjugate(args.remove(0));
        }

        if let Some(term) = special::exact(func, &args)? {
            return Ok(term);
        }

        if args.iter().any(Self::is_inexact_number)
           && let Some(values) = args.iter().map(Self::to_f64).collect::<Option<Vec<_>>>()
           && let Some(v) = func.evaluate(&values)
        {
            return Ok(Self::real(v));
        }

        Ok(Self::Apply(func, args))
    }

    /// `-term`
    pub fn neg(term: Self) -> BackendResult<Self> {
        Self::mul([Self::int(-1), term])
    }

    /// `left - right`
    pub fn sub(left: Self, right: Self) -> BackendResult<Self> {
        Self::add([left, Self::neg(right)?])
    }

    /// `left / right`
    ///
    /// # Errors
    /// `DivisionByZero` if `right` is a numeric zero.
    pub fn div(left: Self, right: Self) -> BackendResult<Self> {
        if right.as_number().is_some_and(Number::is_zero) {
            return Err(BackendError::DivisionByZero);
        }
        Self::mul([left, Self::pow(right, Self::int(-1))?])
    }

    /// `term ^ (1/2)`
    pub fn sqrt(term: Self) -> BackendResult<Self> {
        Self::pow(term, Self::rational(1, 2)?)
    }

    /// `exp(term)`
    pub fn exp(term: Self) -> BackendResult<Self> {
        Self::apply(Func::Exp, vec![term])
    }

    /// `erf(term)`
    pub fn erf(term: Self) -> BackendResult<Self> {
        Self::apply(Func::Erf, vec![term])
    }

    /// `Gamma(term)`
    pub fn gamma(term: Self) -> BackendResult<Self> {
        Self::apply(Func::Gamma, vec![term])
    }

    /// Regularized lower incomplete gamma `P(s, x)`.
    pub fn gamma_regularized_lower(s: Self, x: Self) -> BackendResult<Self> {
        Self::apply(Func::GammaRegularizedLower, vec![s, x])
    }

    /// Complex conjugate. Real terms are returned unchanged; conjugation
    /// distributes over sums, products, integer powers and real-analytic
    /// functions.
    ///
    /// # Example
    /// ```
    /// use symstat::backend::term::{Assumption, Term};
    ///
    /// let a = Term::symbol("a", None);
    /// let conj = Term::conjugate(a.clone()).unwrap();
    /// assert_eq!(Term::conjugate(conj).unwrap(), a);
    ///
    /// let r = Term::symbol("r", Some(Assumption::Real));
    /// assert_eq!(Term::conjugate(r.clone()).unwrap(), r);
    /// ```
    pub fn conjugate(term: Self) -> BackendResult<Self> {
        match term {
            Self::Num(n) => Ok(Self::Num(n.conj())),
            t if t.is_real() => Ok(t),
            Self::Add(terms) => {
                Self::add(terms.into_iter()
                               .map(Self::conjugate)
                               .collect::<BackendResult<Vec<_>>>()?)
            },
            Self::Mul(factors) => {
                Self::mul(factors.into_iter()
                                 .map(Self::conjugate)
                                 .collect::<BackendResult<Vec<_>>>()?)
            },
            Self::Pow(base, exponent) if exponent.is_integer() => {
                Self::pow(Self::conjugate(*base)?, *exponent)
            },
            Self::Apply(Func::Conjugate, mut args) if args.len() == 1 => Ok(args.remove(0)),
            Self::Apply(func, args) if func.is_real_analytic() => {
                let args = args.into_iter()
                               .map(Self::conjugate)
                               .collect::<BackendResult<Vec<_>>>()?;
                Self::apply(func, args)
            },
            other => Ok(Self::Apply(Func::Conjugate, vec![other])),
        }
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Add(_) => 1,
            Self::Mul(_) => 2,
            Self::Pow(..) => 3,
            Self::Num(Number::Rational(_) | Number::Complex(_)) => 2,
            _ => 4,
        }
    }

    fn fmt_child(&self, f: &mut std::fmt::Formatter<'_>, parent: u8) -> std::fmt::Result {
        if self.precedence() <= parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Sym(s) => write!(f, "{}", s.name),
            Self::Const(Constant::Pi) => write!(f, "pi"),
            Self::Const(Constant::E) => write!(f, "E"),
            Self::Add(terms) => {
                for (index, term) in terms.iter().enumerate() {
                    if index > 0 {
                        write!(f, " + ")?;
                    }
                    term.fmt_child(f, 1)?;
                }
                Ok(())
            },
            Self::Mul(factors) => {
                for (index, factor) in factors.iter().enumerate() {
                    if index > 0 {
                        write!(f, "*")?;
                    }
                    factor.fmt_child(f, 2)?;
                }
                Ok(())
            },
            Self::Pow(base, exponent) => {
                base.fmt_child(f, 3)?;
                write!(f, "^")?;
                exponent.fmt_child(f, 3)
            },
            Self::Apply(func, args) => {
                write!(f, "{}(", func.name())?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Term {
        Term::symbol("x", None)
    }

    #[test]
    fn like_terms_cancel() {
        let t = Term::sub(x(), x()).unwrap();
        assert_eq!(t, Term::int(0));
    }

    #[test]
    fn exact_fractions_stay_exact() {
        let t = Term::div(Term::int(6), Term::int(4)).unwrap();
        assert_eq!(t, Term::rational(3, 2).unwrap());
    }

    #[test]
    fn real_operands_are_contagious() {
        let pi = Term::Const(Constant::Pi);
        let t = Term::mul([Term::real(0.5), pi]).unwrap();
        let Term::Num(Number::Real(v)) = t else {
            panic!("expected a real, got {t:?}");
        };
        assert!((v - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn symbolic_operands_block_contagion() {
        let t = Term::mul([Term::real(0.5), x()]).unwrap();
        assert_eq!(t, Term::Mul(vec![Term::real(0.5), x()]));
    }

    #[test]
    fn nested_powers_combine() {
        let root = Term::sqrt(Term::mul([Term::int(2), Term::Const(Constant::Pi)]).unwrap()).unwrap();
        let inverse = Term::div(Term::int(1), root).unwrap();
        let expected = Term::Pow(Box::new(Term::Mul(vec![Term::int(2),
                                                         Term::Const(Constant::Pi)])),
                                 Box::new(Term::rational(-1, 2).unwrap()));
        assert_eq!(inverse, expected);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(Term::div(x(), Term::int(0)), Err(BackendError::DivisionByZero));
        assert_eq!(Term::pow(Term::int(0), Term::int(-2)), Err(BackendError::DivisionByZero));
    }

    #[test]
    fn conjugate_of_a_square_is_real_part_squared_for_reals() {
        let d = Term::sub(Term::int(3), Term::int(5)).unwrap();
        let t = Term::mul([d.clone(), Term::conjugate(d).unwrap()]).unwrap();
        assert_eq!(t, Term::int(4));
    }

    #[test]
    fn positivity_follows_assumptions() {
        assert_eq!(Term::symbol("s", Some(Assumption::Positive)).is_positive(), Some(true));
        assert_eq!(Term::int(-1).is_positive(), Some(false));
        assert_eq!(x().is_positive(), None);
    }

    #[test]
    fn symbols_collect_regardless_of_assumption() {
        let plain = Term::symbol("s", None);
        let positive = Term::symbol("s", Some(Assumption::Positive));

        let ratio = Term::div(plain.clone(), positive.clone()).unwrap();
        assert_eq!(ratio, Term::int(1));

        let difference = Term::sub(positive, plain).unwrap();
        assert_eq!(difference, Term::int(0));
    }

    #[test]
    fn collected_symbols_keep_the_stronger_assumption() {
        let plain = Term::symbol("s", None);
        let positive = Term::symbol("s", Some(Assumption::Positive));

        let square = Term::mul([plain, positive]).unwrap();
        let root = Term::sqrt(square).unwrap();
        assert_eq!(root.is_positive(), Some(true));

        let Term::Sym(kept) = &root else { panic!("expected a symbol, got {root}") };
        assert_eq!(kept.assumption, Some(Assumption::Positive));
    }
}
