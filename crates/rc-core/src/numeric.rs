use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// The last sample is pinned to `end` so the grid never overshoots the span.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut out: Vec<Real> = (0..n).map(|i| start + i as Real * step).collect();
            out[n - 1] = end;
            out
        }
    }
}

/// Finite-difference derivative of `values` with respect to `grid`.
///
/// Second-order central differences on the (possibly non-uniform) interior,
/// first-order one-sided differences at both ends. Fewer than two samples
/// cannot be differentiated and yield NaN.
pub fn gradient(values: &[Real], grid: &[Real]) -> CoreResult<Vec<Real>> {
    if values.len() != grid.len() {
        return Err(CoreError::LengthMismatch {
            what: "gradient values vs grid",
            expected: grid.len(),
            got: values.len(),
        });
    }

    let n = values.len();
    if n < 2 {
        return Ok(vec![Real::NAN; n]);
    }

    let mut out = vec![0.0; n];
    out[0] = (values[1] - values[0]) / (grid[1] - grid[0]);
    out[n - 1] = (values[n - 1] - values[n - 2]) / (grid[n - 1] - grid[n - 2]);

    for i in 1..n - 1 {
        let hs = grid[i] - grid[i - 1];
        let hd = grid[i + 1] - grid[i];
        let a = -hd / (hs * (hs + hd));
        let b = (hd - hs) / (hs * hd);
        let c = hs / (hd * (hs + hd));
        out[i] = a * values[i - 1] + b * values[i] + c * values[i + 1];
    }

    Ok(out)
}

/// Largest magnitude in the series. NaN for an empty series, and any NaN
/// sample poisons the result.
pub fn peak_abs(values: &[Real]) -> Real {
    if values.is_empty() {
        return Real::NAN;
    }
    values.iter().fold(0.0, |acc: Real, v| {
        if acc.is_nan() || v.is_nan() {
            Real::NAN
        } else {
            acc.max(v.abs())
        }
    })
}

/// Root mean square, `sqrt(mean(x^2))`.
pub fn rms(values: &[Real]) -> Real {
    if values.is_empty() {
        return Real::NAN;
    }
    let sum_sq: Real = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as Real).sqrt()
}

/// Peak-to-peak spread, `max - min`.
pub fn peak_to_peak(values: &[Real]) -> Real {
    if values.is_empty() {
        return Real::NAN;
    }
    let mut lo = Real::INFINITY;
    let mut hi = Real::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            return Real::NAN;
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    hi - lo
}
