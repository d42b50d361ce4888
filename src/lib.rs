//! # symstat
//!
//! symstat is the probability and statistics layer of a symbolic computation
//! language, written in Rust. Distribution expressions such as
//! `NormalDistribution[mu, sigma]` are translated into backend random
//! variables whose densities, distribution functions, moments and samples are
//! returned as exact host expressions wherever the inputs are exact.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Expr,
    interpreter::evaluator::core::{Context, ContextConfig, Message},
};

/// Defines the host expression tree.
///
/// This module declares the `Expr` enum: numbers, symbols, strings, lists and
/// calls `head[args...]`. Distribution expressions are ordinary calls.
///
/// # Responsibilities
/// - Represents every value the evaluator manipulates.
/// - Prints expressions in full form, e.g. `Times[Rational[1, 3], a]`.
/// - Evaluates purely numeric expressions to `f64` for comparisons.
pub mod ast;
/// The computer-algebra backend.
///
/// Symbolic terms with exact folding, special functions and random variables
/// for the supported distribution families. The backend knows nothing about
/// host expressions; the [`bridge`] converts between the two.
pub mod backend;
/// Conversion between host expressions and backend terms.
///
/// # Responsibilities
/// - Converts numbers, constants, symbols and the known heads to terms,
///   attaching domain assumptions to symbols.
/// - Converts terms back, keeping exact values exact.
pub mod bridge;
/// Provides unified error types for evaluation and the backend.
///
/// This module defines all errors a builtin, the backend or the conversion
/// bridge can raise, each with the message tag the evaluator records it
/// under.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches the operator name to low-level failures.
pub mod error;
/// Orchestrates evaluation.
///
/// Ties together the evaluator, the builtin table and the numeric tower.
///
/// # Responsibilities
/// - Provides the evaluation context and its entry points.
/// - Defines the numeric values the rest of the crate computes with.
pub mod interpreter;
/// General utilities for safe numeric conversion and fresh names.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize` and `f64` without silent data
///   loss.
/// - Allocate random variable names that never collide.
pub mod util;

/// Evaluates an expression in a fresh context.
///
/// Returns the evaluated expression together with every message recorded
/// along the way. Failing calls are returned unevaluated.
///
/// # Examples
/// ```
/// use symstat::{ast::Expr, evaluate, interpreter::evaluator::core::ContextConfig};
///
/// let mean = Expr::call("Mean", [Expr::list([Expr::from(1), Expr::from(2), Expr::from(3)])]);
/// let (result, messages) = evaluate(&mean, ContextConfig::default());
/// assert_eq!(result, Expr::from(2));
/// assert!(messages.is_empty());
///
/// let variance = Expr::call("Variance", [Expr::list([Expr::from(1)])]);
/// let (result, messages) = evaluate(&variance, ContextConfig::default());
/// assert_eq!(result, variance);
/// assert_eq!(messages[0].to_string(), "Variance::infy: Variance: division by zero.");
/// ```
#[must_use]
pub fn evaluate(expr: &Expr, config: ContextConfig) -> (Expr, Vec<Message>) {
    let mut context = Context::with_config(config);
    let result = context.evaluate(expr);
    (result, context.take_messages())
}
