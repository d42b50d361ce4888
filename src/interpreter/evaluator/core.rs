use std::fmt::Display;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{ast::Expr, error::RuntimeError, util::names::FreshNames};

/// Result type used by the evaluator.
///
/// All builtins return either a value of type `T` or a `RuntimeError`
/// describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Settings for a new [`Context`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextConfig {
    /// Seed of the random generator. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

/// A diagnostic recorded while evaluating.
///
/// Messages are named `symbol::tag` the way the host language names them,
/// e.g. `Mean::rectn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The symbol the message is attached to.
    pub symbol: String,
    /// The message tag.
    pub tag:    &'static str,
    /// Human readable text.
    pub text:   String,
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}: {}", self.symbol, self.tag, self.text)
    }
}

/// Stores the runtime evaluation context.
///
/// The context owns everything a statistical query may touch: the allocator
/// of fresh random variable names, the random generator used for sampling and
/// the messages recorded so far. Nothing is shared between contexts.
///
/// ## Usage
///
/// A `Context` is created once and reused for any number of evaluations.
/// Failures never abort an evaluation; they are recorded as [`Message`]s and
/// the failing call is returned unevaluated.
///
/// ```
/// use symstat::{
///     ast::Expr,
///     interpreter::evaluator::core::{Context, ContextConfig},
/// };
///
/// let mut ctx = Context::with_config(ContextConfig { seed: Some(1) });
///
/// let mean = Expr::call("Mean", [Expr::list([Expr::from(1), Expr::from(2), Expr::from(3)])]);
/// assert_eq!(ctx.evaluate(&mean), Expr::from(2));
///
/// let bad = Expr::call("Mean", [Expr::symbol("x")]);
/// assert_eq!(ctx.evaluate(&bad), bad);
/// assert_eq!(ctx.take_messages()[0].tag, "rectn");
/// ```
#[derive(Debug)]
pub struct Context {
    names:    FreshNames,
    rng:      StdRng,
    messages: Vec<Message>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Creates a context from explicit settings.
    #[must_use]
    pub fn with_config(config: ContextConfig) -> Self {
        Self { names:    FreshNames::new(),
               rng:      seeded(config.seed),
               messages: Vec::new(), }
    }

    /// Evaluates an expression bottom-up.
    ///
    /// Lists and call arguments are evaluated first. A call whose head is a
    /// builtin is then rewritten by that builtin; a builtin that declines, an
    /// unknown head, or a failure leaves the call in place with its evaluated
    /// arguments. Failures are additionally recorded as messages.
    pub fn evaluate(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::List(items) => Expr::List(items.iter().map(|e| self.evaluate(e)).collect()),
            Expr::Call { head, args } => {
                let args: Vec<Expr> = args.iter().map(|a| self.evaluate(a)).collect();
                match self.apply(head, &args) {
                    Ok(Some(result)) => result,
                    Ok(None) => Expr::Call { head: head.clone(),
                                             args },
                    Err(error) => {
                        self.report(head, &error);
                        Expr::Call { head: head.clone(),
                                     args }
                    },
                }
            },
            other => other.clone(),
        }
    }

    /// Messages recorded so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Removes and returns all recorded messages.
    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Replaces the random generator. `None` seeds from the operating system.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = seeded(seed);
    }

    /// Returns a random variable name never handed out by this context before.
    pub(crate) fn fresh_name(&mut self) -> String {
        self.names.allocate()
    }

    /// The random generator used for sampling.
    pub(crate) const fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Records `error`, raised while evaluating a call with head `head`.
    ///
    /// Argument count and parameter failures of a distribution are attached
    /// to the distribution head rather than to the operator using it.
    fn report(&mut self, head: &str, error: &RuntimeError) {
        let symbol = match error {
            RuntimeError::ArgumentCount { operator, .. } => operator.as_str(),
            RuntimeError::InvalidParameter { distribution, .. } => distribution,
            _ => head,
        };

        let message = Message { symbol: symbol.to_string(),
                                tag:    error.tag(),
                                text:   error.to_string(), };
        debug!(%message, "recorded message");
        self.messages.push(message);
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
