/// The evaluator module rewrites expressions with the builtins.
///
/// The evaluator walks an expression bottom-up, dispatches calls to the
/// builtin table and records failures as messages, leaving failed calls
/// unevaluated.
///
/// # Responsibilities
/// - Evaluates call arguments before the call itself.
/// - Checks argument counts and dispatches to builtins.
/// - Owns per-context state: fresh names, the random generator, messages.
pub mod evaluator;
/// The value module defines the numeric tower.
///
/// Exact integers and rationals, machine reals and complex values, with
/// checked arithmetic that keeps exact values exact and reports overflow.
///
/// # Responsibilities
/// - Defines the `Number` enum and its normalization rules.
/// - Implements checked arithmetic, exact roots and comparisons.
pub mod value;
