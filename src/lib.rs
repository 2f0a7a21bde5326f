pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;

pub use crate::core::{
    evaluate_gamma, evaluate_tau, simulate, AnalyticEvaluator, ChannelParameters, Comparison,
    ComparisonHarness, ComparisonReport, EvalError, IntegrationResult, MonteCarloEvaluator,
    SampleEstimate,
};
