use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, Signed, Zero};
use ordered_float::OrderedFloat;

use crate::{interpreter::value::complex::ComplexNumber, util::num::i64_to_f64_checked};

/// A leaf of the numeric tower.
///
/// Exact values (`Integer`, `Rational`) stay exact under addition,
/// multiplication and integer powers. Any `Real` or `Complex` operand makes
/// the result inexact. Constructors and arithmetic keep values normalized:
/// a rational with denominator one is an `Integer`, a complex with zero
/// imaginary part is a `Real`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// A 64 bit integer.
    Integer(i64),
    /// An exact fraction in lowest terms with a positive denominator.
    Rational(Rational64),
    /// A machine precision real.
    Real(f64),
    /// A machine precision complex value.
    Complex(ComplexNumber),
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<ComplexNumber> for Number {
    fn from(c: ComplexNumber) -> Self {
        c.into_number()
    }
}

impl From<Rational64> for Number {
    fn from(r: Rational64) -> Self {
        if r.is_integer() {
            Self::Integer(*r.numer())
        } else {
            Self::Rational(r)
        }
    }
}

/// Operands of a binary operation brought to a common level of the tower.
enum Promoted {
    Integers(i64, i64),
    Rationals(Rational64, Rational64),
    Reals(f64, f64),
    Complexes(ComplexNumber, ComplexNumber),
}

impl Number {
    /// Builds the exact fraction `numer / denom`, normalized.
    ///
    /// Returns `None` for a zero denominator.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::core::Number;
    ///
    /// assert_eq!(Number::rational(4, 2), Some(Number::Integer(2)));
    /// assert!(matches!(Number::rational(1, 3), Some(Number::Rational(_))));
    /// assert_eq!(Number::rational(1, 0), None);
    /// ```
    #[must_use]
    pub fn rational(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Rational64::new(numer, denom).into())
    }

    /// Returns `true` for `Integer` and `Rational`.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Rational(_))
    }

    /// Returns `true` if the value is zero, exact or not.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(i) => *i == 0,
            Self::Rational(r) => r.is_zero(),
            Self::Real(r) => *r == 0.0,
            Self::Complex(c) => c.real == 0.0 && c.imaginary == 0.0,
        }
    }

    /// Returns `true` only for the exact value one.
    #[must_use]
    pub const fn is_exact_one(&self) -> bool {
        matches!(self, Self::Integer(1))
    }

    /// Returns `true` only for the exact value zero.
    #[must_use]
    pub const fn is_exact_zero(&self) -> bool {
        matches!(self, Self::Integer(0))
    }

    /// Converts to `f64`, or `None` for complex values and integers too large
    /// to be represented exactly.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => i64_to_f64_checked(*i, ()).ok(),
            Self::Rational(r) => {
                let n = i64_to_f64_checked(*r.numer(), ()).ok()?;
                let d = i64_to_f64_checked(*r.denom(), ()).ok()?;
                Some(n / d)
            },
            Self::Real(r) => Some(*r),
            Self::Complex(_) => None,
        }
    }

    /// Converts to `ComplexNumber`, or `None` when an integer is too large.
    #[must_use]
    pub fn to_complex(&self) -> Option<ComplexNumber> {
        match self {
            Self::Complex(c) => Some(*c),
            _ => self.to_f64().map(ComplexNumber::from),
        }
    }

    /// Returns the exact value as a rational, if it is exact.
    #[must_use]
    pub fn to_rational(&self) -> Option<Rational64> {
        match self {
            Self::Integer(i) => Some(Rational64::from_integer(*i)),
            Self::Rational(r) => Some(*r),
            _ => None,
        }
    }

    /// Compares against zero. `None` for non-real complex values.
    #[must_use]
    pub fn sign(&self) -> Option<Ordering> {
        match self {
            Self::Integer(i) => Some(i.cmp(&0)),
            Self::Rational(r) => Some(if r.is_positive() {
                                          Ordering::Greater
                                      } else if r.is_negative() {
                                          Ordering::Less
                                      } else {
                                          Ordering::Equal
                                      }),
            Self::Real(r) => r.partial_cmp(&0.0),
            Self::Complex(_) => None,
        }
    }

    fn promote(self, other: Self) -> Option<Promoted> {
        use Number::{Complex, Integer, Rational};

        Some(match (self, other) {
                 (Integer(a), Integer(b)) => Promoted::Integers(a, b),
                 (Integer(_) | Rational(_), Integer(_) | Rational(_)) => {
                     Promoted::Rationals(self.to_rational()?, other.to_rational()?)
                 },
                 (Complex(_), _) | (_, Complex(_)) => {
                     Promoted::Complexes(self.to_complex()?, other.to_complex()?)
                 },
                 _ => Promoted::Reals(self.to_f64()?, other.to_f64()?),
             })
    }

    /// Adds two numbers, returning `None` on overflow.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::core::Number;
    ///
    /// let third = Number::rational(1, 3).unwrap();
    /// let sum = third.checked_add(Number::rational(2, 3).unwrap()).unwrap();
    /// assert_eq!(sum, Number::Integer(1));
    ///
    /// assert_eq!(Number::Integer(i64::MAX).checked_add(Number::Integer(1)), None);
    /// ```
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(match self.promote(other)? {
                 Promoted::Integers(a, b) => Self::Integer(a.checked_add(b)?),
                 Promoted::Rationals(a, b) => a.checked_add(&b)?.into(),
                 Promoted::Reals(a, b) => Self::Real(a + b),
                 Promoted::Complexes(a, b) => (a + b).into(),
             })
    }

    /// Multiplies two numbers, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        Some(match self.promote(other)? {
                 Promoted::Integers(a, b) => Self::Integer(a.checked_mul(b)?),
                 Promoted::Rationals(a, b) => a.checked_mul(&b)?.into(),
                 Promoted::Reals(a, b) => Self::Real(a * b),
                 Promoted::Complexes(a, b) => (a * b).into(),
             })
    }

    /// Negates, returning `None` on overflow.
    #[must_use]
    pub fn checked_neg(self) -> Option<Self> {
        Some(match self {
                 Self::Integer(i) => Self::Integer(i.checked_neg()?),
                 Self::Rational(r) => Self::Rational(Rational64::new_raw(r.numer().checked_neg()?,
                                                                         *r.denom())),
                 Self::Real(r) => Self::Real(-r),
                 Self::Complex(c) => Self::Complex(-c),
             })
    }

    /// Returns `1 / self`, or `None` for zero and on overflow.
    #[must_use]
    pub fn checked_recip(self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(match self {
                 Self::Integer(_) | Self::Rational(_) => {
                     let r = self.to_rational()?;
                     if r.numer() == &i64::MIN {
                         return None;
                     }
                     r.recip().into()
                 },
                 Self::Real(r) => Self::Real(r.recip()),
                 Self::Complex(c) => c.recip().into(),
             })
    }

    /// Raises to an integer power, exactly for exact bases.
    ///
    /// Returns `None` on overflow or for zero raised to a negative power.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::core::Number;
    ///
    /// let half = Number::rational(1, 2).unwrap();
    /// assert_eq!(half.checked_powi(-3), Some(Number::Integer(8)));
    /// assert_eq!(Number::Integer(0).checked_powi(-1), None);
    /// ```
    #[must_use]
    pub fn checked_powi(self, exp: i64) -> Option<Self> {
        match self {
            Self::Integer(_) | Self::Rational(_) => {
                let base = if exp < 0 { self.checked_recip()? } else { self };
                let r = base.to_rational()?;
                let e = u32::try_from(exp.unsigned_abs()).ok()?;
                let numer = r.numer().checked_pow(e)?;
                let denom = r.denom().checked_pow(e)?;
                Self::rational(numer, denom)
            },
            Self::Real(r) => {
                let e = i32::try_from(exp).ok()?;
                let v = r.powi(e);
                v.is_finite().then_some(Self::Real(v))
            },
            Self::Complex(c) => c.checked_powi(exp).map(Self::from),
        }
    }

    /// Raises to a real power with inexact arithmetic, taking the principal
    /// branch for negative bases.
    #[must_use]
    pub fn powf(self, exp: Self) -> Option<Self> {
        let e = exp.to_complex()?;
        let base = self.to_complex()?;
        if e.imaginary != 0.0 {
            return None;
        }
        if base.imaginary == 0.0 && (base.real >= 0.0 || e.real.fract() == 0.0) {
            let v = base.real.powf(e.real);
            return v.is_finite().then_some(Self::Real(v));
        }
        let c = base.powf(e.real);
        c.is_finite().then(|| c.into())
    }

    /// Returns the exact `n`-th root when one exists among the rationals.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::core::Number;
    ///
    /// let q = Number::rational(9, 4).unwrap();
    /// assert_eq!(q.exact_root(2), Number::rational(3, 2));
    /// assert_eq!(Number::Integer(2).exact_root(2), None);
    /// ```
    #[must_use]
    pub fn exact_root(self, n: u32) -> Option<Self> {
        let r = self.to_rational()?;
        if r.is_negative() || n == 0 {
            return None;
        }
        let numer = integer_root(*r.numer(), n)?;
        let denom = integer_root(*r.denom(), n)?;
        Self::rational(numer, denom)
    }

    /// Returns the complex conjugate; real values are unchanged.
    #[must_use]
    pub fn conj(self) -> Self {
        match self {
            Self::Complex(c) => c.conj().into(),
            other => other,
        }
    }

    /// Total order used to sort terms: exact and inexact values interleave by
    /// real part, ties broken by kind.
    fn rank(&self) -> u8 {
        match self {
            Self::Integer(_) => 0,
            Self::Rational(_) => 1,
            Self::Real(_) => 2,
            Self::Complex(_) => 3,
        }
    }
}

/// Integer `n`-th root of a non-negative value, if it is exact.
fn integer_root(value: i64, n: u32) -> Option<i64> {
    if value < 0 {
        return None;
    }
    let guess = i64_to_f64_checked(value, ()).ok()?.powf(1.0 / f64::from(n)).round();
    #[allow(clippy::cast_possible_truncation)]
    let guess = guess as i64;

    (guess.saturating_sub(1)..=guess.saturating_add(1)).find(|c| {
                                                            *c >= 0
                                                            && c.checked_pow(n) == Some(value)
                                                        })
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Self::Complex(a), Self::Complex(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Integer(i) => i.hash(state),
            Self::Rational(r) => r.hash(state),
            Self::Real(r) => OrderedFloat(*r).hash(state),
            Self::Complex(c) => c.hash(state),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Rational(a), Self::Rational(b)) => a.cmp(b),
            _ => {
                let far = ComplexNumber::new(f64::INFINITY, 0.0);
                let a = self.to_complex().unwrap_or(far);
                let b = other.to_complex().unwrap_or(far);
                a.cmp(&b)
            },
        };
        by_value.then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Real(r) => write!(f, "{r:?}"),
            Self::Complex(c) => write!(f, "{c}"),
        }
    }
}
