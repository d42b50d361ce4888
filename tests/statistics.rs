use symstat::{
    ast::Expr,
    evaluate,
    interpreter::{
        evaluator::core::{ContextConfig, Message},
        value::{complex::ComplexNumber, core::Number},
    },
};

fn eval(expr: &Expr) -> (Expr, Vec<Message>) {
    evaluate(expr, ContextConfig { seed: Some(2024) })
}

fn assert_evaluates_to(expr: &Expr, expected: &str) {
    let (result, messages) = eval(expr);
    assert!(messages.is_empty(), "{expr} reported {messages:?}");
    assert_eq!(result.to_string(), expected, "while evaluating {expr}");
}

fn assert_fails_with(expr: &Expr, symbol: &str, tag: &str) {
    let (result, messages) = eval(expr);
    assert_eq!(&result, expr, "a failing call must stay unevaluated");
    assert_eq!(messages.len(), 1, "expected one message, got {messages:?}");
    assert_eq!(messages[0].symbol, symbol);
    assert_eq!(messages[0].tag, tag);
}

fn numeric(expr: &Expr) -> f64 {
    let (result, messages) = eval(expr);
    assert!(messages.is_empty(), "{expr} reported {messages:?}");
    result.to_f64()
          .unwrap_or_else(|| panic!("{expr} evaluated to {result}, which is not numeric"))
}

fn complex_value(expr: &Expr) -> ComplexNumber {
    let (result, messages) = eval(expr);
    assert!(messages.is_empty(), "{expr} reported {messages:?}");
    match &result {
        Expr::Number(n) => n.to_complex().expect("a finite number"),
        other => panic!("{expr} evaluated to {other}, which is not a number"),
    }
}

fn complex(re: f64, im: f64) -> Expr {
    Expr::from(Number::Complex(ComplexNumber::new(re, im)))
}

fn ints(values: &[i64]) -> Expr {
    Expr::list(values.iter().copied().map(Expr::from))
}

fn normal(mu: Expr, sigma: Expr) -> Expr {
    Expr::call("NormalDistribution", [mu, sigma])
}

fn mentions(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Symbol(s) => s == name,
        Expr::Call { head, args } => head == name || args.iter().any(|a| mentions(a, name)),
        Expr::List(items) => items.iter().any(|a| mentions(a, name)),
        _ => false,
    }
}

fn numeric_distributions() -> Vec<Expr> {
    vec![normal(Expr::from(1), Expr::from(2)),
         Expr::call("WeibullDistribution", [Expr::from(2), Expr::from(1)]),
         Expr::call("ChiDistribution", [Expr::from(3)]),
         Expr::call("BernoulliDistribution", [Expr::rational(1, 3)])]
}

#[test]
fn mean_of_integers_is_exact() {
    assert_evaluates_to(&Expr::call("Mean", [ints(&[1, 2, 3])]), "2");
    assert_evaluates_to(&Expr::call("Mean", [ints(&[1, 2])]), "Rational[3, 2]");
}

#[test]
fn mean_of_symbols_stays_symbolic() {
    let values = Expr::list([Expr::symbol("a"), Expr::symbol("b"), Expr::from(213)]);
    assert_evaluates_to(&Expr::call("Mean", [values]), "Times[Rational[1, 3], Plus[213, a, b]]");
}

#[test]
fn standard_normal_density_at_zero() {
    let pdf = Expr::call("PDF", [normal(Expr::from(0), Expr::from(1)), Expr::from(0)]);
    assert_evaluates_to(&pdf, "Power[Times[2, Pi], Rational[-1, 2]]");
    assert!((numeric(&pdf) - 0.398_942_280_401_432_7).abs() < 1e-12);
}

#[test]
fn standard_normal_cdf_at_zero_is_one_half() {
    let cdf = Expr::call("CDF", [normal(Expr::from(0), Expr::from(1)), Expr::from(0)]);
    assert_evaluates_to(&cdf, "Rational[1, 2]");
}

#[test]
fn arguments_are_evaluated_before_the_statistic() {
    let mu = Expr::call("Plus", [Expr::from(1), Expr::from(1)]);
    let pdf = Expr::call("PDF", [normal(mu, Expr::from(1)), Expr::from(2)]);
    assert_evaluates_to(&pdf, "Power[Times[2, Pi], Rational[-1, 2]]");
}

#[test]
fn symbolic_scale_is_assumed_positive() {
    let pdf = Expr::call("PDF", [normal(Expr::from(0), Expr::symbol("s")), Expr::from(0)]);
    assert_evaluates_to(&pdf, "Times[Power[s, -1], Power[Times[2, Pi], Rational[-1, 2]]]");

    let sd = Expr::call("StandardDeviation", [normal(Expr::symbol("m"), Expr::symbol("s"))]);
    assert_evaluates_to(&sd, "s");
}

#[test]
fn scale_cancels_against_a_point_of_the_same_name() {
    let dist = normal(Expr::from(0), Expr::symbol("s"));

    let (cdf, messages) = eval(&Expr::call("CDF", [dist.clone(), Expr::symbol("s")]));
    assert!(messages.is_empty(), "{messages:?}");
    assert!(!mentions(&cdf, "s"), "{cdf} still depends on s");

    let scaled = Expr::call("Times", [Expr::symbol("s"),
                                      Expr::call("PDF", [dist, Expr::symbol("s")])]);
    let (density, _) = eval(&scaled);
    assert!(!mentions(&density, "s"), "{density} still depends on s");
    assert!((numeric(&scaled) - 0.241_970_724_519_143_37).abs() < 1e-12);
}

#[test]
fn weibull_mean_is_symbolic_in_its_parameters() {
    let dist = Expr::call("WeibullDistribution", [Expr::symbol("a"), Expr::symbol("b")]);
    assert_evaluates_to(&Expr::call("Mean", [dist]), "Times[b, Gamma[Plus[1, Power[a, -1]]]]");
}

#[test]
fn bernoulli_moments_are_exact() {
    let dist = Expr::call("BernoulliDistribution", [Expr::rational(1, 4)]);
    assert_evaluates_to(&Expr::call("Mean", [dist.clone()]), "Rational[1, 4]");
    assert_evaluates_to(&Expr::call("Variance", [dist]), "Rational[3, 16]");
}

#[test]
fn sample_variance_uses_n_minus_one() {
    assert_evaluates_to(&Expr::call("Variance", [ints(&[1, 2, 3, 4])]), "Rational[5, 3]");
    assert_evaluates_to(&Expr::call("Covariance", [ints(&[1, 2, 3]), ints(&[3, 2, 1])]), "-1");
}

#[test]
fn variance_of_complex_values_is_real() {
    let values = Expr::list([complex(1.0, 1.0), complex(1.0, -1.0)]);
    let v = complex_value(&Expr::call("Variance", [values]));
    assert!((v.real - 2.0).abs() < 1e-12, "{v}");
    assert!(v.imaginary.abs() < 1e-12, "{v}");
}

#[test]
fn covariance_conjugates_the_second_list() {
    let xs = Expr::list([Expr::symbol("a"), Expr::symbol("b")]);
    let ys = Expr::list([Expr::symbol("c"), Expr::symbol("d")]);
    let (c, messages) = eval(&Expr::call("Covariance", [xs, ys]));
    assert!(messages.is_empty(), "{messages:?}");

    let text = c.to_string();
    assert!(text.contains("Conjugate[c]") && text.contains("Conjugate[d]"), "{text}");
    assert!(!text.contains("Conjugate[a]") && !text.contains("Conjugate[b]"), "{text}");

    let imaginary = Expr::list([complex(0.0, 1.0), Expr::from(0)]);
    let real = ints(&[1, 0]);
    let forward = complex_value(&Expr::call("Covariance", [imaginary.clone(), real.clone()]));
    let backward = complex_value(&Expr::call("Covariance", [real, imaginary]));
    assert!(forward.real.abs() < 1e-12 && (forward.imaginary - 0.5).abs() < 1e-12, "{forward}");
    assert!(backward.real.abs() < 1e-12 && (backward.imaginary + 0.5).abs() < 1e-12, "{backward}");
}

#[test]
fn variance_of_one_value_is_reported() {
    assert_fails_with(&Expr::call("Variance", [ints(&[1])]), "Variance", "infy");
}

#[test]
fn mean_of_an_empty_list_is_reported() {
    assert_fails_with(&Expr::call("Mean", [ints(&[])]), "Mean", "infy");
}

#[test]
fn non_distributions_are_reported() {
    assert_fails_with(&Expr::call("Mean", [Expr::symbol("x")]), "Mean", "rectn");
    assert_fails_with(&Expr::call("PDF", [ints(&[1, 2]), Expr::from(0)]), "PDF", "dist");
    assert_fails_with(&Expr::call("Covariance", [ints(&[1, 2]), ints(&[1, 2, 3])]),
                      "Covariance",
                      "vctmat");
}

#[test]
fn malformed_and_invalid_distributions_are_reported_under_their_head() {
    let short = Expr::call("NormalDistribution", [Expr::from(0)]);
    assert_fails_with(&Expr::call("Mean", [short]), "NormalDistribution", "argx");

    let negative = normal(Expr::from(0), Expr::from(-1));
    assert_fails_with(&Expr::call("PDF", [negative, Expr::from(0)]), "NormalDistribution", "par");

    let outside = Expr::call("BernoulliDistribution", [Expr::from(2)]);
    assert_fails_with(&Expr::call("Mean", [outside]), "BernoulliDistribution", "par");
}

#[test]
fn weibull_density_at_zero_diverges_below_shape_one() {
    let dist = Expr::call("WeibullDistribution", [Expr::rational(1, 2), Expr::from(1)]);
    assert_fails_with(&Expr::call("PDF", [dist.clone(), Expr::from(0)]), "PDF", "infy");
    assert_evaluates_to(&Expr::call("CDF", [dist, Expr::from(0)]), "0");
}

#[test]
fn unsupported_queries_are_reported() {
    let coin = Expr::call("BernoulliDistribution", [Expr::rational(1, 2)]);
    assert_fails_with(&Expr::call("CDF", [coin, Expr::symbol("x")]), "CDF", "unsup");

    let symbolic = normal(Expr::symbol("m"), Expr::from(1));
    assert_fails_with(&Expr::call("RandomVariate", [symbolic]), "RandomVariate", "unsup");
}

#[test]
fn probability_is_left_alone() {
    let e = Expr::call("Probability", [Expr::symbol("x"), normal(Expr::from(0), Expr::from(1))]);
    let (result, messages) = eval(&e);
    assert_eq!(result, e);
    assert!(messages.is_empty());
}

#[test]
fn cdf_is_non_decreasing_and_pdf_non_negative() {
    for dist in numeric_distributions() {
        let mut previous = f64::NEG_INFINITY;
        for step in -12..=16 {
            let x = Expr::from(f64::from(step) * 0.25);
            let cdf = numeric(&Expr::call("CDF", [dist.clone(), x.clone()]));
            let pdf = numeric(&Expr::call("PDF", [dist.clone(), x]));

            assert!(cdf >= previous - 1e-12, "{dist}: CDF decreased at step {step}");
            assert!((0.0..=1.0 + 1e-12).contains(&cdf), "{dist}: CDF {cdf} out of range");
            assert!(pdf >= 0.0, "{dist}: negative density at step {step}");
            previous = cdf;
        }
    }
}

#[test]
fn bernoulli_samples_are_zeros_and_ones() {
    let coin = Expr::call("BernoulliDistribution", [Expr::from(0.5)]);
    let (result, messages) = eval(&Expr::call("RandomVariate", [coin, Expr::from(1000)]));
    assert!(messages.is_empty());

    let samples = result.as_list().expect("a list of samples");
    assert_eq!(samples.len(), 1000);
    assert!(samples.iter().all(|s| *s == Expr::from(0) || *s == Expr::from(1)));

    let ones = samples.iter().filter(|s| **s == Expr::from(1)).count();
    assert!((400..=600).contains(&ones), "{ones} ones in 1000 fair flips");
}

#[test]
fn empirical_moments_approach_theoretical_ones() {
    for dist in numeric_distributions() {
        let (result, messages) = eval(&Expr::call("RandomVariate", [dist.clone(), Expr::from(20_000)]));
        assert!(messages.is_empty());
        let values: Vec<f64> = result.as_list()
                                     .expect("a list of samples")
                                     .iter()
                                     .map(|s| s.to_f64().expect("numeric sample"))
                                     .collect();
        assert_eq!(values.len(), 20_000);

        let n = 20_000.0;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

        let expected_mean = numeric(&Expr::call("Mean", [dist.clone()]));
        let expected_variance = numeric(&Expr::call("Variance", [dist.clone()]));

        assert!((mean - expected_mean).abs() < 0.05 * expected_mean.abs().max(1.0),
                "{dist}: sample mean {mean}, expected {expected_mean}");
        assert!((variance - expected_variance).abs() < 0.1 * expected_variance.max(0.1),
                "{dist}: sample variance {variance}, expected {expected_variance}");
    }
}

#[test]
fn single_draws_are_not_wrapped_in_a_list() {
    let dist = normal(Expr::from(0), Expr::from(1));
    let (implicit, _) = eval(&Expr::call("RandomVariate", [dist.clone()]));
    let (explicit, _) = eval(&Expr::call("RandomVariate", [dist, Expr::from(1)]));

    assert!(matches!(implicit, Expr::Number(_)));
    assert!(matches!(explicit, Expr::Number(_)));
}

#[test]
fn invalid_sample_counts_are_reported() {
    let dist = normal(Expr::from(0), Expr::from(1));
    assert_fails_with(&Expr::call("RandomVariate", [dist.clone(), Expr::from(0)]),
                      "RandomVariate",
                      "array");
    assert_fails_with(&Expr::call("RandomVariate", [dist.clone(), Expr::from(1.5)]),
                      "RandomVariate",
                      "array");
    assert_fails_with(&Expr::call("RandomVariate", [dist, Expr::from(i64::MAX)]),
                      "RandomVariate",
                      "array");
}

#[test]
fn seeding_repeats_samples() {
    let dist = Expr::call("WeibullDistribution", [Expr::from(2), Expr::from(3)]);
    let draw = Expr::call("RandomVariate", [dist, Expr::from(5)]);
    let program = Expr::list([Expr::call("SeedRandom", [Expr::from(9)]),
                              draw.clone(),
                              Expr::call("SeedRandom", [Expr::from(9)]),
                              draw]);

    let (result, messages) = evaluate(&program, ContextConfig::default());
    assert!(messages.is_empty());

    let items = result.as_list().expect("a list");
    assert_eq!(items[0], Expr::null());
    assert_eq!(items[1], items[3]);
}
