use crate::interpreter::value::core::Number;

/// A node of the host expression tree.
///
/// Everything the evaluator manipulates is an `Expr`: numbers, symbols,
/// strings, lists and calls `head[arg1, arg2, ...]`. Distribution
/// expressions are ordinary calls such as `NormalDistribution[0, 1]`; they
/// stay unevaluated and act as carriers of their parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A leaf of the numeric tower.
    Number(Number),
    /// A named symbol such as `a`, `Pi` or `Null`.
    Symbol(String),
    /// A string literal.
    String(String),
    /// An ordered list `{e1, e2, ...}`.
    List(Vec<Self>),
    /// A call `head[args...]`.
    Call {
        /// The head symbol.
        head: String,
        /// The arguments in order.
        args: Vec<Self>,
    },
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Self::Number(Number::Integer(v))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Self::Number(Number::Real(v))
    }
}

impl From<Vec<Self>> for Expr {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl Expr {
    /// Builds a symbol.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::Symbol(name.to_string())
    }

    /// Builds a call `head[args...]`.
    ///
    /// # Example
    /// ```
    /// use symstat::ast::Expr;
    ///
    /// let dist = Expr::call("NormalDistribution", [Expr::from(0), Expr::from(1)]);
    /// assert_eq!(dist.to_string(), "NormalDistribution[0, 1]");
    /// ```
    #[must_use]
    pub fn call(head: &str, args: impl IntoIterator<Item = Self>) -> Self {
        Self::Call { head: head.to_string(),
                     args: args.into_iter().collect(), }
    }

    /// Builds a list from any iterator of expressions.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Builds the exact fraction `numer / denom`.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    #[must_use]
    pub fn rational(numer: i64, denom: i64) -> Self {
        match Number::rational(numer, denom) {
            Some(n) => Self::Number(n),
            None => panic!("rational with zero denominator: {numer}/{denom}"),
        }
    }

    /// The `Null` symbol returned by builtins evaluated for their effect.
    #[must_use]
    pub fn null() -> Self {
        Self::symbol("Null")
    }

    /// Returns the number if this is a numeric leaf.
    #[must_use]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the elements if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Evaluates the expression numerically if it only contains numbers, the
    /// constants `Pi` and `E`, and arithmetic heads.
    ///
    /// Used to compare exact symbolic results against floating point
    /// expectations.
    ///
    /// # Example
    /// ```
    /// use symstat::ast::Expr;
    ///
    /// // 1 / Sqrt[2 Pi]
    /// let e = Expr::call("Power",
    ///                    [Expr::call("Times", [Expr::from(2), Expr::symbol("Pi")]),
    ///                     Expr::rational(-1, 2)]);
    /// let v = e.to_f64().unwrap();
    /// assert!((v - 0.398_942_280_401_432_7).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.to_f64(),
            Self::Symbol(s) => match s.as_str() {
                "Pi" => Some(std::f64::consts::PI),
                "E" => Some(std::f64::consts::E),
                _ => None,
            },
            Self::Call { head, args } => {
                let values = args.iter().map(Self::to_f64).collect::<Option<Vec<_>>>()?;
                let v = match (head.as_str(), values.as_slice()) {
                    ("Plus", vs) => vs.iter().sum(),
                    ("Times", vs) => vs.iter().product(),
                    ("Power", [b, e]) => b.powf(*e),
                    ("Sqrt", [x]) => x.sqrt(),
                    ("Exp", [x]) => x.exp(),
                    _ => return None,
                };
                v.is_finite().then_some(v)
            },
            Self::String(_) | Self::List(_) => None,
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn write_all(f: &mut std::fmt::Formatter<'_>, items: &[Expr]) -> std::fmt::Result {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Number(Number::Rational(r)) => write!(f, "Rational[{}, {}]", r.numer(), r.denom()),
            Self::Number(Number::Complex(c)) => {
                write!(f, "Complex[{:?}, {:?}]", c.real, c.imaginary)
            },
            Self::Number(n) => write!(f, "{n}"),
            Self::Symbol(s) => write!(f, "{s}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "{{")?;
                write_all(f, items)?;
                write!(f, "}}")
            },
            Self::Call { head, args } => {
                write!(f, "{head}[")?;
                write_all(f, args)?;
                write!(f, "]")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_full_form() {
        let e = Expr::call("Times",
                           [Expr::rational(1, 3),
                            Expr::call("Plus", [Expr::from(213), Expr::symbol("a")])]);
        assert_eq!(e.to_string(), "Times[Rational[1, 3], Plus[213, a]]");
        assert_eq!(Expr::list([Expr::from(1), Expr::from(0.5)]).to_string(), "{1, 0.5}");
    }

    #[test]
    fn symbolic_values_have_no_numeric_value() {
        assert_eq!(Expr::call("Plus", [Expr::from(1), Expr::symbol("a")]).to_f64(), None);
    }
}
