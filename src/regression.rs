//! Ordinary least squares fit of `y = intercept + slope * x`.
//!
//! The confidence band is the analytic interval of the fitted mean,
//! `ŷ ± t(1 - α/2, n - 2) · s · sqrt(1/n + (x - x̄)² / Sxx)`.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
  pub slope:     f64,
  pub intercept: f64,
  n:             usize,
  x_mean:        f64,
  sxx:           f64,
  /// Residual standard error. `None` with two points, which leaves no degrees of freedom.
  residual:      Option<f64>,
}

impl LinearFit {
  /// Fits the points, skipping non-finite ones. `None` when fewer than two
  /// points remain or all x values are equal.
  pub fn fit(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
    let points =
      points.into_iter().filter(|(x, y)| x.is_finite() && y.is_finite()).collect::<Vec<_>>();
    let n = points.len();
    if n < 2 {
      return None;
    }

    let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let sxx = points.iter().map(|p| (p.0 - x_mean).powi(2)).sum::<f64>();
    let sxy = points.iter().map(|p| (p.0 - x_mean) * (p.1 - y_mean)).sum::<f64>();
    if sxx == 0.0 {
      return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let residual = (n > 2).then(|| {
      let sse = points.iter().map(|p| (p.1 - intercept - slope * p.0).powi(2)).sum::<f64>();
      (sse / (n - 2) as f64).sqrt()
    });

    Some(LinearFit { slope, intercept, n, x_mean, sxx, residual })
  }

  pub fn predict(&self, x: f64) -> f64 { self.intercept + self.slope * x }

  /// `(lower, upper)` bounds of the mean response at `x`, for a two-sided
  /// `level` such as `0.95`.
  pub fn confidence(&self, x: f64, level: f64) -> Option<(f64, f64)> {
    let residual = self.residual?;
    let t = t_quantile(0.5 + level / 2.0, (self.n - 2) as f64);
    let se = residual * (1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx).sqrt();
    let y = self.predict(x);
    Some((y - t * se, y + t * se))
  }
}

/// Quantile of the standard normal distribution (Acklam's rational approximation).
pub fn normal_quantile(p: f64) -> f64 {
  const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
  ];
  const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
  ];
  const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
  ];
  const D: [f64; 4] =
    [7.784695709041462e-03, 3.224671290700398e-01, 2.445134137142996e+00, 3.754408661907416e+00];
  const LOW: f64 = 0.02425;

  if p <= 0.0 {
    return f64::NEG_INFINITY;
  }
  if p >= 1.0 {
    return f64::INFINITY;
  }

  if p < LOW {
    let q = (-2.0 * p.ln()).sqrt();
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
      / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
  } else if p <= 1.0 - LOW {
    let q = p - 0.5;
    let r = q * q;
    (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
      / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
  } else {
    -normal_quantile(1.0 - p)
  }
}

/// Quantile of Student's t distribution with `df` degrees of freedom.
///
/// Exact for one and two degrees of freedom, otherwise the Cornish-Fisher
/// expansion around the normal quantile.
pub fn t_quantile(p: f64, df: f64) -> f64 {
  if df <= 1.0 {
    return (PI * (p - 0.5)).tan();
  }
  if df <= 2.0 {
    return (2.0 * p - 1.0) / (2.0 * p * (1.0 - p)).sqrt();
  }

  let z = normal_quantile(p);
  let z2 = z * z;
  let g1 = (z2 + 1.0) * z / 4.0;
  let g2 = ((5.0 * z2 + 16.0) * z2 + 3.0) * z / 96.0;
  let g3 = (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0) * z / 384.0;
  let g4 = ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0) * z / 92160.0;

  z + g1 / df + g2 / df.powi(2) + g3 / df.powi(3) + g4 / df.powi(4)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64, tolerance: f64) -> bool { (a - b).abs() <= tolerance }

  #[test]
  fn exact_line() {
    let fit = LinearFit::fit([(1.0, 3.0), (2.0, 5.0), (3.0, 7.0), (4.0, 9.0)]).unwrap();
    assert!(close(fit.slope, 2.0, 1e-12));
    assert!(close(fit.intercept, 1.0, 1e-12));

    let (lo, hi) = fit.confidence(2.5, 0.95).unwrap();
    assert!(close(lo, 6.0, 1e-9) && close(hi, 6.0, 1e-9));
  }

  #[test]
  fn band_widens_away_from_mean() {
    let fit =
      LinearFit::fit([(1.0, 2.2), (2.0, 2.5), (3.0, 3.6), (4.0, 4.7), (5.0, 5.1)]).unwrap();

    let (lo_mid, hi_mid) = fit.confidence(3.0, 0.95).unwrap();
    let (lo_far, hi_far) = fit.confidence(8.0, 0.95).unwrap();
    assert!(lo_mid < fit.predict(3.0) && fit.predict(3.0) < hi_mid);
    assert!(hi_far - lo_far > hi_mid - lo_mid);
  }

  #[test]
  fn degenerate_inputs() {
    assert!(LinearFit::fit([(1.0, 1.0)]).is_none());
    assert!(LinearFit::fit([(2.0, 1.0), (2.0, 5.0)]).is_none());
    assert!(LinearFit::fit([(1.0, f64::NAN), (2.0, 1.0)]).is_none());

    let two = LinearFit::fit([(0.0, 0.0), (1.0, 1.0)]).unwrap();
    assert!(two.confidence(0.5, 0.95).is_none());
  }

  #[test]
  fn quantiles_match_tables() {
    assert!(close(normal_quantile(0.975), 1.959964, 1e-6));
    assert!(close(normal_quantile(0.5), 0.0, 1e-12));
    assert!(close(normal_quantile(0.01), -2.326348, 1e-6));

    assert!(close(t_quantile(0.975, 1.0), 12.7062, 1e-3));
    assert!(close(t_quantile(0.975, 2.0), 4.3027, 1e-3));
    assert!(close(t_quantile(0.975, 5.0), 2.5706, 5e-3));
    assert!(close(t_quantile(0.975, 10.0), 2.2281, 1e-3));
    assert!(close(t_quantile(0.975, 30.0), 2.0423, 1e-4));
  }
}
