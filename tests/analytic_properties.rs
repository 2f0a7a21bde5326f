use guardband::core::analytic::{threshold_only_error, AnalyticEvaluator};
use guardband::{evaluate_gamma, evaluate_tau, ChannelParameters};

#[test]
fn zero_band_reduces_to_threshold_detector() {
    // sigma_X = 1, sigma_noise = 0.25: arctan(0.25) / pi ~ 0.0780
    let gamma = evaluate_gamma(1.0, 0.25, 0.0, 0.0).unwrap();
    let tau = evaluate_tau(1.0, 0.25, 0.0, 0.0).unwrap();
    assert!((gamma.value - threshold_only_error(1.0, 0.25)).abs() < 1e-4);
    assert!((gamma.value - 0.077979).abs() < 1e-5, "gamma = {}", gamma.value);
    assert!(tau.value.abs() < 1e-12);
}

#[test]
fn zero_band_matches_closed_form_across_noise_levels() {
    for &noise in &[0.05, 0.1, 0.5, 1.0, 2.0] {
        let gamma = evaluate_gamma(1.0, noise, 0.0, 0.0).unwrap();
        let expected = threshold_only_error(1.0, noise);
        assert!(
            (gamma.value - expected).abs() < 1e-6,
            "noise {noise}: {} vs {expected}",
            gamma.value
        );
    }
}

#[test]
fn invariant_under_threshold_reflection() {
    let ev = AnalyticEvaluator::default();
    for &beta in &[0.0, 0.15, 0.4] {
        for &mu in &[0.3, 1.7] {
            let pos = ChannelParameters::new(mu, 1.0, 0.25, beta).unwrap();
            let neg = ChannelParameters::new(-mu, 1.0, 0.25, beta).unwrap();
            let (g_pos, t_pos) = ev.evaluate(&pos).unwrap();
            let (g_neg, t_neg) = ev.evaluate(&neg).unwrap();
            assert!((g_pos.value - g_neg.value).abs() < 1e-7, "gamma at mu = +/-{mu}, beta {beta}");
            assert!((t_pos.value - t_neg.value).abs() < 1e-7, "tau at mu = +/-{mu}, beta {beta}");
        }
    }
}

#[test]
fn wider_band_discards_more_and_errs_less() {
    let ev = AnalyticEvaluator::default();
    let base = ChannelParameters::new(0.0, 1.0, 0.25, 0.0).unwrap();
    let mut prev: Option<(f64, f64)> = None;
    for i in 0..=15 {
        let beta = 0.1 * i as f64;
        let (gamma, tau) = ev.evaluate(&base.with_beta(beta).unwrap()).unwrap();
        if let Some((g, t)) = prev {
            assert!(gamma.value <= g + 1e-10, "gamma rose at beta {beta}: {g} -> {}", gamma.value);
            assert!(tau.value >= t - 1e-10, "tau fell at beta {beta}: {t} -> {}", tau.value);
        }
        prev = Some((gamma.value, tau.value));
    }
}

#[test]
fn values_are_probabilities() {
    let ev = AnalyticEvaluator::default();
    for &sigma_x in &[0.5, 1.0, 3.0] {
        for &noise in &[0.01, 0.3, 1.0, 4.0] {
            for &beta in &[0.0, 0.05, 0.5, 2.0] {
                let p = ChannelParameters::new(0.2, sigma_x, noise, beta).unwrap();
                let (gamma, tau) = ev.evaluate(&p).unwrap();
                for (name, v) in [("gamma", gamma.value), ("tau", tau.value)] {
                    assert!(
                        (-1e-12..=1.0 + 1e-12).contains(&v),
                        "{name} = {v} for {p:?}"
                    );
                }
                // gamma + tau is not asserted: only the individual ranges are guaranteed.
            }
        }
    }
}

#[test]
fn error_bounds_are_reported_and_small() {
    let gamma = evaluate_gamma(1.0, 0.5, 0.0, 0.3).unwrap();
    let tau = evaluate_tau(1.0, 0.5, 0.0, 0.3).unwrap();
    assert!(gamma.error_estimate >= 0.0 && gamma.error_estimate < 1e-7);
    assert!(tau.error_estimate >= 0.0 && tau.error_estimate < 1e-7);
}

#[test]
fn huge_band_discards_almost_everything() {
    let gamma = evaluate_gamma(1.0, 0.25, 0.0, 10.0).unwrap();
    let tau = evaluate_tau(1.0, 0.25, 0.0, 10.0).unwrap();
    assert!(gamma.value < 1e-12);
    assert!((tau.value - 1.0).abs() < 1e-7);
}

/// Maclaurin series; accurate to ~1e-15 for |z| <= 1.
fn erf(z: f64) -> f64 {
    let mut term = z;
    let mut sum = z;
    for n in 1..60 {
        term *= -z * z / n as f64;
        sum += term / (2 * n + 1) as f64;
    }
    sum * 2.0 / std::f64::consts::PI.sqrt()
}

#[test]
fn quiet_channel_gamma_matches_closed_form() {
    for &noise in &[1e-3, 1e-4] {
        let gamma = evaluate_gamma(1.0, noise, 0.0, 0.0).unwrap();
        let expected = threshold_only_error(1.0, noise);
        assert!(
            (gamma.value - expected).abs() <= 1e-5 * expected,
            "noise {noise}: {} vs {expected}",
            gamma.value
        );
    }
}

#[test]
fn quiet_channel_tau_matches_received_marginal() {
    // Y - mu_x ~ N(0, sigma_x^2 + sigma_noise^2), so tau = erf(beta / sqrt(2 (sx^2 + sn^2))).
    for &noise in &[1e-3, 1e-4, 0.25] {
        for &beta in &[0.05, 0.3, 1.0] {
            let tau = evaluate_tau(1.0, noise, 0.0, beta).unwrap();
            let expected = erf(beta / (2.0 * (1.0 + noise * noise)).sqrt());
            assert!(
                (tau.value - expected).abs() < 1e-7,
                "noise {noise}, beta {beta}: {} vs {expected}",
                tau.value
            );
        }
    }
}

#[test]
fn invariant_under_common_rescaling() {
    let ev = AnalyticEvaluator::default();
    let cases = [(1.0, 0.25, 0.7, 0.3), (1.0, 1.0, 5.0, 1.0), (1.0, 0.25, 1.0, 0.3)];
    for (sigma_x, noise, mu, beta) in cases {
        let base = ChannelParameters::new(mu, sigma_x, noise, beta).unwrap();
        let (g0, t0) = ev.evaluate(&base).unwrap();
        assert!(g0.value > 1e-3, "{base:?}");
        for k in [1e-3, 1e3] {
            let scaled = ChannelParameters::new(mu * k, sigma_x * k, noise * k, beta * k).unwrap();
            let (g, t) = ev.evaluate(&scaled).unwrap();
            assert!((g.value - g0.value).abs() < 1e-8, "gamma at k={k}: {} vs {}", g.value, g0.value);
            assert!((t.value - t0.value).abs() < 1e-8, "tau at k={k}: {} vs {}", t.value, t0.value);
        }
    }
}
