//! Key-rate style quantities derived from gamma and tau.

/// Binary entropy H2(p)
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 { 0.0 } else { -p*p.log2() - (1.0-p)*(1.0-p).log2() }
}

/// Fraction of symbols kept after the guard band: 1 - tau.
pub fn throughput(tau: f64) -> f64 {
    (1.0 - tau).clamp(0.0, 1.0)
}

/// Error rate among kept symbols: gamma / (1 - tau). Zero when nothing is kept.
pub fn conditional_qber(gamma: f64, tau: f64) -> f64 {
    let kept = throughput(tau);
    if kept <= 0.0 { 0.0 } else { (gamma / kept).clamp(0.0, 1.0) }
}

/// Kept-bit fraction left after ideal reconciliation:
/// (1 - tau) * [1 - H2(qber)], with qber conditioned on keeping the symbol.
pub fn reconciled_fraction(gamma: f64, tau: f64) -> f64 {
    let q = conditional_qber(gamma, tau).min(0.5);
    (throughput(tau) * (1.0 - binary_entropy(q))).max(0.0)
}
