//! Adaptive Gauss–Kronrod quadrature over finite and (semi-)infinite ranges.
//!
//! Each 1-D pass bisects the subinterval with the largest error estimate
//! until `error <= max(epsabs, epsrel * |value|)` or `limit` subintervals are
//! live. Infinite ranges are mapped onto (0, 1] with `x = a + (1 - t) / t`.
//! `integrate_2d` nests two passes (outer X, inner Y) and reports the outer
//! error bound; `integrate_2d_split` lets the inner limits depend on X.

use serde::{Deserialize, Serialize};

use super::error::{EvalError, IntegrationFailure};
use super::params::IntegrationResult;

pub const DEFAULT_EPSABS: f64 = 1.49e-8;
pub const DEFAULT_EPSREL: f64 = 1.49e-8;
pub const DEFAULT_LIMIT: usize = 200;

// 15-point Kronrod abscissae (xgk) and weights (wgk); the odd abscissae are
// shared with the embedded 7-point Gauss rule (wg).
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

/// One end of an integration range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    NegInfinity,
    Finite(f64),
    PosInfinity,
}

impl Bound {
    fn rank(&self) -> (i8, f64) {
        match *self {
            Bound::NegInfinity => (-1, 0.0),
            Bound::Finite(v) => (0, v),
            Bound::PosInfinity => (1, 0.0),
        }
    }

    fn is_after(&self, other: &Bound) -> bool {
        let (ra, va) = self.rank();
        let (rb, vb) = other.rank();
        ra > rb || (ra == rb && ra == 0 && va > vb)
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        if v == f64::INFINITY {
            Bound::PosInfinity
        } else if v == f64::NEG_INFINITY {
            Bound::NegInfinity
        } else {
            Bound::Finite(v)
        }
    }
}

/// Stopping rule and subdivision budget for a single 1-D pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub epsabs: f64,
    pub epsrel: f64,
    pub limit: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsabs: DEFAULT_EPSABS,
            epsrel: DEFAULT_EPSREL,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Tolerance {
    fn target(&self, value: f64) -> f64 {
        self.epsabs.max(self.epsrel * value.abs())
    }
}

/// The integrator gave up; carries the last estimate and its error bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureError {
    pub estimate: f64,
    pub error_estimate: f64,
    pub reason: IntegrationFailure,
}

impl QuadratureError {
    fn new(estimate: f64, error_estimate: f64, reason: IntegrationFailure) -> Self {
        Self { estimate, error_estimate, reason }
    }
}

impl From<QuadratureError> for EvalError {
    fn from(e: QuadratureError) -> Self {
        EvalError::integration(e.estimate, e.error_estimate, e.reason)
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// 15-point Gauss–Kronrod rule on [a, b] with the QUADPACK error heuristic.
fn gauss_kronrod_15<F>(f: &mut F, a: f64, b: f64) -> Result<Segment, QuadratureError>
where
    F: FnMut(f64) -> Result<f64, QuadratureError>,
{
    let centr = 0.5 * (a + b);
    let hlgth = 0.5 * (b - a);
    let dhlgth = hlgth.abs();

    let mut eval = |x: f64| -> Result<f64, QuadratureError> {
        let v = f(x)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(QuadratureError::new(f64::NAN, f64::INFINITY, IntegrationFailure::NonFinite))
        }
    };

    let fc = eval(centr)?;
    let mut resg = fc * WG[3];
    let mut resk = fc * WGK[7];
    let mut resabs = resk.abs();
    let mut fv1 = [0.0f64; 7];
    let mut fv2 = [0.0f64; 7];

    for j in 0..7 {
        let absc = hlgth * XGK[j];
        let f1 = eval(centr - absc)?;
        let f2 = eval(centr + absc)?;
        fv1[j] = f1;
        fv2[j] = f2;
        let fsum = f1 + f2;
        resk += WGK[j] * fsum;
        resabs += WGK[j] * (f1.abs() + f2.abs());
        // Odd Kronrod nodes double as Gauss nodes.
        if j % 2 == 1 {
            resg += WG[j / 2] * fsum;
        }
    }

    let reskh = resk * 0.5;
    let mut resasc = WGK[7] * (fc - reskh).abs();
    for j in 0..7 {
        resasc += WGK[j] * ((fv1[j] - reskh).abs() + (fv2[j] - reskh).abs());
    }

    let value = resk * hlgth;
    resabs *= dhlgth;
    resasc *= dhlgth;
    let mut error = ((resk - resg) * hlgth).abs();
    if resasc != 0.0 && error != 0.0 {
        error = resasc * (200.0 * error / resasc).powf(1.5).min(1.0);
    }
    if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * resabs);
    }

    Ok(Segment { a, b, value, error })
}

fn totals(segments: &[Segment]) -> (f64, f64) {
    segments
        .iter()
        .fold((0.0, 0.0), |(v, e), s| (v + s.value, e + s.error))
}

/// Globally adaptive bisection on a finite interval `a < b`.
fn adapt<F>(mut f: F, a: f64, b: f64, tol: &Tolerance) -> Result<IntegrationResult, QuadratureError>
where
    F: FnMut(f64) -> Result<f64, QuadratureError>,
{
    let mut segments = vec![gauss_kronrod_15(&mut f, a, b)?];

    loop {
        let (value, error) = totals(&segments);
        if error <= tol.target(value) {
            return Ok(IntegrationResult::new(value, error));
        }
        if segments.len() >= tol.limit.max(1) {
            return Err(QuadratureError::new(value, error, IntegrationFailure::SubdivisionLimit));
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, l), (_, r)| l.error.total_cmp(&r.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        if !(seg.a < mid && mid < seg.b) {
            return Err(QuadratureError::new(value, error, IntegrationFailure::RoundOff));
        }
        segments.push(gauss_kronrod_15(&mut f, seg.a, mid)?);
        segments.push(gauss_kronrod_15(&mut f, mid, seg.b)?);
    }
}

/// Integrate a fallible integrand between two bounds.
///
/// Reversed bounds negate the result; equal bounds give exactly zero.
pub fn try_integrate<F>(
    mut f: F,
    lower: Bound,
    upper: Bound,
    tol: &Tolerance,
) -> Result<IntegrationResult, QuadratureError>
where
    F: FnMut(f64) -> Result<f64, QuadratureError>,
{
    for b in [lower, upper] {
        if let Bound::Finite(v) = b {
            if !v.is_finite() {
                return Err(QuadratureError::new(f64::NAN, f64::INFINITY, IntegrationFailure::NonFinite));
            }
        }
    }
    if lower.is_after(&upper) {
        return try_integrate(f, upper, lower, tol).map(|r| IntegrationResult::new(-r.value, r.error_estimate));
    }

    match (lower, upper) {
        (Bound::Finite(a), Bound::Finite(b)) => {
            if a == b {
                Ok(IntegrationResult::default())
            } else {
                adapt(f, a, b, tol)
            }
        }
        (Bound::Finite(a), Bound::PosInfinity) => adapt(
            |t| {
                let x = a + (1.0 - t) / t;
                Ok(f(x)? / (t * t))
            },
            0.0,
            1.0,
            tol,
        ),
        (Bound::NegInfinity, Bound::Finite(b)) => adapt(
            |t| {
                let x = b - (1.0 - t) / t;
                Ok(f(x)? / (t * t))
            },
            0.0,
            1.0,
            tol,
        ),
        (Bound::NegInfinity, Bound::PosInfinity) => adapt(
            |t| {
                let x = (1.0 - t) / t;
                Ok((f(x)? + f(-x)?) / (t * t))
            },
            0.0,
            1.0,
            tol,
        ),
        // Both ends at the same infinity.
        _ => Ok(IntegrationResult::default()),
    }
}

/// Integrate an infallible integrand between two bounds.
pub fn integrate<F>(
    mut f: F,
    lower: Bound,
    upper: Bound,
    tol: &Tolerance,
) -> Result<IntegrationResult, QuadratureError>
where
    F: FnMut(f64) -> f64,
{
    try_integrate(|x| Ok(f(x)), lower, upper, tol)
}

/// Like [`try_integrate`], additionally splitting the range at `points`.
///
/// Points outside the open range are ignored. Splitting at a narrow peak keeps
/// the Kronrod nodes from stepping over it. The pieces share `epsabs`, so the
/// summed error bound stays within the caller's tolerance.
pub fn try_integrate_split<F>(
    mut f: F,
    lower: Bound,
    upper: Bound,
    points: &[f64],
    tol: &Tolerance,
) -> Result<IntegrationResult, QuadratureError>
where
    F: FnMut(f64) -> Result<f64, QuadratureError>,
{
    if lower.is_after(&upper) {
        return try_integrate_split(f, upper, lower, points, tol)
            .map(|r| IntegrationResult::new(-r.value, r.error_estimate));
    }

    let mut inner: Vec<f64> = points
        .iter()
        .copied()
        .filter(|&p| p.is_finite())
        .filter(|&p| Bound::Finite(p).is_after(&lower) && upper.is_after(&Bound::Finite(p)))
        .collect();
    inner.sort_by(f64::total_cmp);
    inner.dedup();

    let mut edges = Vec::with_capacity(inner.len() + 2);
    edges.push(lower);
    edges.extend(inner.into_iter().map(Bound::Finite));
    edges.push(upper);

    let piece_tol = Tolerance {
        epsabs: tol.epsabs / (edges.len() - 1) as f64,
        ..*tol
    };
    let mut total = IntegrationResult::default();
    for pair in edges.windows(2) {
        total = total + try_integrate(&mut f, pair[0], pair[1], &piece_tol)?;
    }
    Ok(total)
}

/// Rectangle-region double integral of `f(x, y)`: outer pass over X, inner over Y.
///
/// Any inner failure aborts the whole integral with that failure.
pub fn integrate_2d<F>(
    f: F,
    x: (Bound, Bound),
    y: (Bound, Bound),
    tol: &Tolerance,
) -> Result<IntegrationResult, QuadratureError>
where
    F: Fn(f64, f64) -> f64,
{
    integrate_2d_split(f, x, &[], move |_| y, &[], tol)
}

/// Double integral over `x.0 <= X <= x.1`, `y(X).0 <= Y <= y(X).1`.
///
/// The outer pass splits at `x_points` and every inner pass at `y_points`.
/// Put outer points where the inner limits sweep across a peak of `f`.
pub fn integrate_2d_split<F, Y>(
    f: F,
    x: (Bound, Bound),
    x_points: &[f64],
    y: Y,
    y_points: &[f64],
    tol: &Tolerance,
) -> Result<IntegrationResult, QuadratureError>
where
    F: Fn(f64, f64) -> f64,
    Y: Fn(f64) -> (Bound, Bound),
{
    try_integrate_split(
        |xv| {
            let (lo, hi) = y(xv);
            try_integrate_split(|yv| Ok(f(xv, yv)), lo, hi, y_points, tol).map(|r| r.value)
        },
        x.0,
        x.1,
        x_points,
        tol,
    )
}
