//! Evaluation core: both probability engines, the harness that compares them
//! and the sweep driver built on top.

#[macro_use]
pub mod debug; // gated debug logging (GUARDBAND_DEBUG=1) provides debug_log! macro
pub mod analytic;
pub mod error;
pub mod harness;
pub mod montecarlo;
pub mod params;
pub mod qkd;
pub mod quadrature;
pub mod sweep;

pub use analytic::{evaluate_gamma, evaluate_tau, AnalyticEvaluator};
pub use error::{EvalError, IntegrationFailure};
pub use harness::{Comparison, ComparisonHarness, ComparisonReport, DEFAULT_AGREEMENT_SIGMAS};
pub use montecarlo::{simulate, MonteCarloEvaluator};
pub use params::{ChannelParameters, IntegrationResult, SampleEstimate};
