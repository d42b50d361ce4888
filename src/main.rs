use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use symstat::{
    ast::Expr,
    evaluate,
    interpreter::evaluator::{core::ContextConfig, function::distribution::Distribution},
};
use tracing_subscriber::EnvFilter;

/// symstat evaluates probability and statistics queries symbolically, exactly
/// where the inputs are exact.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Seed for the random generator, for repeatable samples.
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Density (or probability mass) of a distribution at a point.
    Pdf {
        #[command(flatten)]
        distribution: DistributionArgs,
        /// The point, e.g. `0`, `1/2`, `0.3` or `x`.
        #[arg(long, allow_negative_numbers = true)]
        at:           String,
    },
    /// Cumulative distribution function at a point.
    Cdf {
        #[command(flatten)]
        distribution: DistributionArgs,
        /// The point, e.g. `0`, `1/2`, `0.3` or `x`.
        #[arg(long, allow_negative_numbers = true)]
        at:           String,
    },
    /// Mean of a distribution or of a list of values.
    Mean(Source),
    /// Variance of a distribution or of a list of values.
    Variance(Source),
    /// Standard deviation of a distribution or of a list of values.
    StdDev(Source),
    /// Random samples from a distribution.
    Sample {
        #[command(flatten)]
        distribution: DistributionArgs,
        /// Number of samples.
        #[arg(short, long, default_value_t = 1)]
        count:        u64,
    },
}

#[derive(Args, Debug)]
struct DistributionArgs {
    /// Distribution name: `normal`, `weibull`, `chi` or `bernoulli`.
    name:   String,
    /// Parameters: integers, `p/q` rationals, reals or symbol names.
    #[arg(allow_negative_numbers = true)]
    params: Vec<String>,
}

#[derive(Args, Debug)]
struct Source {
    /// Distribution name followed by its parameters.
    #[arg(allow_negative_numbers = true, conflicts_with = "list")]
    distribution: Vec<String>,
    /// Comma separated values instead of a distribution.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    list:         Option<Vec<String>>,
}

/// Parses a single atom: an integer, a `p/q` rational, a real or a symbol.
fn parse_atom(text: &str) -> anyhow::Result<Expr> {
    let text = text.trim();

    if let Ok(i) = text.parse::<i64>() {
        return Ok(Expr::from(i));
    }
    if let Some((numer, denom)) = text.split_once('/') {
        let numer: i64 = numer.trim().parse().with_context(|| format!("bad numerator in {text}"))?;
        let denom: i64 = denom.trim().parse().with_context(|| format!("bad denominator in {text}"))?;
        if denom == 0 {
            bail!("{text} has a zero denominator");
        }
        return Ok(Expr::rational(numer, denom));
    }
    if let Ok(r) = text.parse::<f64>() {
        return Ok(Expr::from(r));
    }

    let mut chars = text.chars();
    if chars.next().is_some_and(char::is_alphabetic) && chars.all(char::is_alphanumeric) {
        return Ok(Expr::symbol(text));
    }
    bail!("{text} is not a number or a symbol")
}

fn distribution(name: &str, params: &[String]) -> anyhow::Result<Expr> {
    let family = Distribution::ALL.into_iter()
                                  .find(|d| {
                                      let head = d.head();
                                      head.eq_ignore_ascii_case(name)
                                      || head.trim_end_matches("Distribution")
                                             .eq_ignore_ascii_case(name)
                                  })
                                  .with_context(|| {
                                      format!("unknown distribution {name}; expected one of \
                                               normal, weibull, chi, bernoulli")
                                  })?;

    let args = params.iter()
                     .map(|p| parse_atom(p))
                     .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Expr::call(family.head(), args))
}

impl DistributionArgs {
    fn to_expr(&self) -> anyhow::Result<Expr> {
        distribution(&self.name, &self.params)
    }
}

impl Source {
    fn to_expr(&self) -> anyhow::Result<Expr> {
        if let Some(values) = &self.list {
            let items = values.iter()
                              .map(|v| parse_atom(v))
                              .collect::<anyhow::Result<Vec<_>>>()?;
            return Ok(Expr::List(items));
        }
        match self.distribution.split_first() {
            Some((name, params)) => distribution(name, params),
            None => bail!("give either a distribution or --list"),
        }
    }
}

fn query(command: &Command) -> anyhow::Result<Expr> {
    Ok(match command {
           Command::Pdf { distribution, at } => {
               Expr::call("PDF", [distribution.to_expr()?, parse_atom(at)?])
           },
           Command::Cdf { distribution, at } => {
               Expr::call("CDF", [distribution.to_expr()?, parse_atom(at)?])
           },
           Command::Mean(source) => Expr::call("Mean", [source.to_expr()?]),
           Command::Variance(source) => Expr::call("Variance", [source.to_expr()?]),
           Command::StdDev(source) => Expr::call("StandardDeviation", [source.to_expr()?]),
           Command::Sample { distribution, count } => {
               let count = i64::try_from(*count).context("sample count is too large")?;
               Expr::call("RandomVariate", [distribution.to_expr()?, Expr::from(count)])
           },
       })
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let cli = Cli::parse();
    let expr = query(&cli.command)?;
    tracing::debug!(%expr, "evaluating");

    let (result, messages) = evaluate(&expr, ContextConfig { seed: cli.seed });
    for message in &messages {
        eprintln!("{message}");
    }
    println!("{result}");

    if !messages.is_empty() {
        bail!("evaluation reported {} message(s)", messages.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms_parse_into_the_numeric_tower() {
        assert_eq!(parse_atom("-3").unwrap(), Expr::from(-3));
        assert_eq!(parse_atom("2/4").unwrap(), Expr::rational(1, 2));
        assert_eq!(parse_atom("0.25").unwrap(), Expr::from(0.25));
        assert_eq!(parse_atom("sigma").unwrap(), Expr::symbol("sigma"));
        assert!(parse_atom("1/0").is_err());
        assert!(parse_atom("a-b").is_err());
    }

    #[test]
    fn distribution_names_are_forgiving() {
        let e = distribution("Normal", &["0".into(), "1".into()]).unwrap();
        assert_eq!(e.to_string(), "NormalDistribution[0, 1]");
        let e = distribution("bernoullidistribution", &["1/2".into()]).unwrap();
        assert_eq!(e.to_string(), "BernoulliDistribution[Rational[1, 2]]");
        assert!(distribution("poisson", &[]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
