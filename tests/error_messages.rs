use guardband::core::error::IntegrationFailure;
use guardband::core::quadrature::Tolerance;
use guardband::{evaluate_gamma, AnalyticEvaluator, ChannelParameters, EvalError, MonteCarloEvaluator};

#[test]
fn invalid_parameter_messages() {
    let err = evaluate_gamma(-1.0, 0.25, 0.0, 0.3).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Invalid Parameter: sigma_x = -1 (must be finite and > 0)");

    let err = ChannelParameters::new(0.0, 1.0, 0.25, -0.5).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Invalid Parameter: beta = -0.5 (must be finite and >= 0)");

    let err = MonteCarloEvaluator::new(0).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Invalid Parameter: sample_count = 0 (must be > 0)");
}

#[test]
fn integration_message_carries_both_numbers() {
    let err = EvalError::integration(0.5, 0.25, IntegrationFailure::SubdivisionLimit);
    insta::assert_snapshot!(
        err.to_string(),
        @"Numerical Integration Error: subdivision limit reached (estimate 5e-1, error bound 2.5e-1)"
    );
}

#[test]
fn starved_evaluator_reports_integration_failure() {
    let ev = AnalyticEvaluator::new(
        Tolerance {
            epsabs: 0.0,
            epsrel: 1e-14,
            limit: 1,
        },
        1e-4,
    );
    let p = ChannelParameters::new(0.0, 1.0, 0.25, 0.3).unwrap();
    let err = ev.gamma(&p).unwrap_err();
    assert!(err.is_numerical_integration(), "{err}");
    assert!(err.to_string().starts_with("Numerical Integration Error: "));
}
