pub mod band;
pub mod compare;
pub mod evaluate;
pub mod generate;
pub mod sweep;

use crate::cli::ChannelArgs;
use crate::core::{ChannelParameters, EvalError};

impl ChannelArgs {
    pub fn params(&self) -> Result<ChannelParameters, EvalError> {
        ChannelParameters::new(self.mu_x, self.sigma_x, self.sigma_noise, self.beta)
    }
}

/// `12.3456%`
pub(crate) fn pct(v: f64) -> String {
    format!("{:.4}%", v * 100.0)
}
