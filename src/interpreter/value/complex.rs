use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
    ops,
};

use ordered_float::OrderedFloat;

use crate::interpreter::value::core::Number;

/// `1.0` as a complex number.
pub const ONE: ComplexNumber = ComplexNumber::new(1.0, 0.0);

/// Represents an inexact complex number with real and imaginary parts.
///
/// Exact complex arithmetic is not part of the numeric tower; as soon as a
/// complex operand takes part in an operation the result is inexact.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    /// The real part of the number.
    pub real:      f64,
    /// The imaginary part of the number.
    pub imaginary: f64,
}

impl Display for ComplexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.real, self.imaginary) {
            (real, 0.0) => write!(f, "{real:?}"),
            (0.0, imaginary) => write!(f, "{imaginary:?}*I"),
            (real, imaginary) if imaginary > 0.0 => write!(f, "{real:?} + {imaginary:?}*I"),
            (real, imaginary) => write!(f, "{real:?} - {:?}*I", -imaginary),
        }
    }
}

impl ComplexNumber {
    /// Constructs a new complex number from real and imaginary components.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!(c.real, 5.0);
    /// assert_eq!(c.imaginary, -1.0);
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Collapses to `Number::Real` if the imaginary part is zero, otherwise
    /// returns `Number::Complex`.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::{complex::ComplexNumber, core::Number};
    /// let real = ComplexNumber::new(3.0, 0.0);
    /// assert_eq!(real.into_number(), Number::Real(3.0));
    ///
    /// let complex = ComplexNumber::new(2.0, 1.0);
    /// assert!(matches!(complex.into_number(), Number::Complex(_)));
    /// ```
    #[must_use]
    pub const fn into_number(self) -> Number {
        if self.imaginary == 0.0 {
            Number::Real(self.real)
        } else {
            Number::Complex(self)
        }
    }

    /// Returns `true` when both parts are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }

    /// Returns the absolute value (magnitude) of the complex number.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(3.0, 4.0);
    /// assert_eq!(c.abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.real.hypot(self.imaginary)
    }
    /// Returns the complex conjugate of the number.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(1.0, 5.0);
    /// assert_eq!(c.conj(), ComplexNumber::new(1.0, -5.0));
    /// ```
    #[must_use]
    pub const fn conj(&self) -> Self {
        Self { real:      self.real,
               imaginary: -self.imaginary, }
    }
    /// Returns the reciprocal (1/z) of the complex number.
    #[must_use]
    pub const fn recip(&self) -> Self {
        let coj_squared = self.real * self.real + self.imaginary * self.imaginary;

        Self { real:      self.real / coj_squared,
               imaginary: -(self.imaginary / coj_squared), }
    }
    /// Returns the argument (phase angle) in radians.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.imaginary.atan2(self.real)
    }
    /// Raises the complex number to an integer power by repeated squaring.
    ///
    /// Returns `None` when the base is zero and the exponent negative, or when
    /// an intermediate result stops being finite.
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::complex::{ComplexNumber, ONE};
    /// let c = ComplexNumber::new(2.0, 0.0);
    /// assert_eq!(c.checked_powi(0), Some(ONE));
    /// assert_eq!(c.checked_powi(3), Some(ComplexNumber::new(8.0, 0.0)));
    /// assert_eq!(ComplexNumber::new(0.0, 0.0).checked_powi(-1), None);
    /// ```
    #[must_use]
    pub fn checked_powi(self, exp: i64) -> Option<Self> {
        if exp == 0 {
            return Some(ONE);
        }

        if self.real == 0.0 && self.imaginary == 0.0 && exp < 0 {
            return None;
        }

        let mut base = self;
        let mut result = ONE;
        let mut n = exp.unsigned_abs();

        while n > 0 {
            if n % 2 == 1 {
                result *= base;
                if !result.is_finite() {
                    return None;
                }
            }
            base = base * base;
            if !base.is_finite() && n > 1 {
                return None;
            }
            n /= 2;
        }

        if exp < 0 {
            result = result.recip();
        }

        result.is_finite().then_some(result)
    }
    /// Raises the complex number to a floating-point power (principal
    /// branch).
    ///
    /// # Example
    /// ```
    /// use symstat::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(-4.0, 0.0);
    /// let res = c.powf(0.5);
    /// assert!(res.real.abs() < 1e-10);
    /// assert!((res.imaginary - 2.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn powf(self, exp: f64) -> Self {
        let r = self.abs();
        let theta = self.arg();

        let new_r = r.powf(exp);
        let new_theta = theta * exp;

        Self { real:      new_r * new_theta.cos(),
               imaginary: new_r * new_theta.sin(), }
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { real:      -self.real,
               imaginary: -self.imaginary, }
    }
}

impl ops::Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { real:      self.real + rhs.real,
               imaginary: self.imaginary + rhs.imaginary, }
    }
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { real:      self.real
                              .mul_add(rhs.real, -(self.imaginary * rhs.imaginary)),
               imaginary: self.real.mul_add(rhs.imaginary, self.imaginary * rhs.real), }
    }
}

impl ops::MulAssign for ComplexNumber {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T> From<T> for ComplexNumber where T: Into<f64>
{
    fn from(value: T) -> Self {
        Self { real:      value.into(),
               imaginary: 0.0, }
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.real) == OrderedFloat(other.real)
        && OrderedFloat(self.imaginary) == OrderedFloat(other.imaginary)
    }
}

impl Eq for ComplexNumber {}

impl Hash for ComplexNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.real).hash(state);
        OrderedFloat(self.imaginary).hash(state);
    }
}

impl PartialOrd for ComplexNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let real_cmp = OrderedFloat(self.real).cmp(&OrderedFloat(other.real));
        if real_cmp == Ordering::Equal {
            OrderedFloat(self.imaginary).cmp(&OrderedFloat(other.imaginary))
        } else {
            real_cmp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_powers_invert() {
        let c = ComplexNumber::new(0.0, 2.0);
        let inv = c.checked_powi(-1).unwrap();
        assert!(inv.real.abs() < 1e-12);
        assert!((inv.imaginary + 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_imaginary_collapses_to_real() {
        assert_eq!((ComplexNumber::new(1.0, 2.0) * ComplexNumber::new(1.0, -2.0)).into_number(),
                   Number::Real(5.0));
    }
}
