use guardband::core::montecarlo::{MonteCarloEvaluator, CHUNK_SIZE};
use guardband::{evaluate_gamma, evaluate_tau, simulate, ChannelParameters};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(beta: f64) -> ChannelParameters {
    ChannelParameters::new(0.0, 1.0, 0.25, beta).unwrap()
}

#[test]
fn injected_rng_is_reproducible() {
    let mc = MonteCarloEvaluator::new(200_000).unwrap();
    let a = mc.simulate(&params(0.2), &mut StdRng::seed_from_u64(11)).unwrap();
    let b = mc.simulate(&params(0.2), &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a, b);

    let c = mc.simulate(&params(0.2), &mut StdRng::seed_from_u64(12)).unwrap();
    assert_ne!(a.0.value, c.0.value);
}

#[test]
fn free_function_matches_evaluator() {
    let (g1, t1) = simulate(0.0, 1.0, 0.25, 0.2, 100_000, &mut StdRng::seed_from_u64(3)).unwrap();
    let (g2, t2) = MonteCarloEvaluator::new(100_000)
        .unwrap()
        .simulate(&params(0.2), &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert_eq!((g1, t1), (g2, t2));
    assert_eq!(g1.sample_count, 100_000);
}

#[test]
fn invalid_inputs_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(simulate(0.0, 0.0, 0.25, 0.2, 10, &mut rng).unwrap_err().is_invalid_parameter());
    assert!(simulate(0.0, 1.0, -0.1, 0.2, 10, &mut rng).unwrap_err().is_invalid_parameter());
    assert!(simulate(0.0, 1.0, 0.25, -0.2, 10, &mut rng).unwrap_err().is_invalid_parameter());
    assert!(simulate(f64::NAN, 1.0, 0.25, 0.2, 10, &mut rng).unwrap_err().is_invalid_parameter());
    assert!(simulate(0.0, 1.0, 0.25, 0.2, 0, &mut rng).unwrap_err().is_invalid_parameter());
}

#[test]
fn counts_cover_every_sample() {
    // Two full chunks plus a ragged tail.
    let n = 2 * CHUNK_SIZE + 17;
    let mc = MonteCarloEvaluator::new(n).unwrap();
    let tally = mc.tally(&params(0.3), 5).unwrap();
    assert!(tally.errors + tally.ignores <= n);
    assert!(tally.ignores > 0);

    let everything_ignored = ChannelParameters::new(0.0, 1.0, 0.25, 1e6).unwrap();
    let tally = mc.tally(&everything_ignored, 5).unwrap();
    assert_eq!(tally.ignores, n);
    assert_eq!(tally.errors, 0);
}

#[test]
fn ten_million_samples_track_the_quadrature() {
    let mc = MonteCarloEvaluator::new(10_000_000).unwrap();
    let (gamma, tau) = mc.simulate_seeded(&params(0.3), 2024).unwrap();
    let g = evaluate_gamma(1.0, 0.25, 0.0, 0.3).unwrap();
    let t = evaluate_tau(1.0, 0.25, 0.0, 0.3).unwrap();

    assert!(
        (gamma.value - g.value).abs() <= 4.0 * gamma.standard_error(),
        "gamma mc={} analytic={}",
        gamma.value,
        g.value
    );
    assert!(
        (tau.value - t.value).abs() <= 4.0 * tau.standard_error(),
        "tau mc={} analytic={}",
        tau.value,
        t.value
    );
}
