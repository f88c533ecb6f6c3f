//! closed-form survival and hazard curves for the parametric families
//!
//! note the weibull here is parameterised as S(t) = exp(-(λt)^k), which is not
//! the same λ as the weibull cohort generator (S(t) = exp(-λ t^k)).

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result, SurvivalError};

/// S(t) = exp(-λt)
pub fn exponential_survival(t: f64, lambda: f64) -> f64 {
    (-lambda * t).exp()
}

/// S(t) = exp(-(λt)^k)
pub fn weibull_survival(t: f64, lambda: f64, k: f64) -> f64 {
    (-(lambda * t).powf(k)).exp()
}

/// h(t) = kλ(λt)^(k-1): rising for k > 1, falling for k < 1, flat at k = 1
pub fn weibull_hazard(t: f64, lambda: f64, k: f64) -> f64 {
    k * lambda * (lambda * t).powf(k - 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum ParametricModel {
    Exponential { lambda: f64 },
    Weibull { lambda: f64, shape: f64 },
}

/// one grid point of a parametric curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: f64,
    pub survival: f64,
    pub hazard: f64,
    pub cumulative_hazard: f64,
}

impl ParametricModel {
    pub fn exponential(lambda: f64) -> Result<Self> {
        ensure_positive("lambda", lambda)?;
        Ok(Self::Exponential { lambda })
    }

    pub fn weibull(lambda: f64, shape: f64) -> Result<Self> {
        ensure_positive("lambda", lambda)?;
        ensure_positive("shape", shape)?;
        Ok(Self::Weibull { lambda, shape })
    }

    pub fn survival(&self, t: f64) -> f64 {
        match *self {
            Self::Exponential { lambda } => exponential_survival(t, lambda),
            Self::Weibull { lambda, shape } => weibull_survival(t, lambda, shape),
        }
    }

    pub fn hazard(&self, t: f64) -> f64 {
        match *self {
            Self::Exponential { lambda } => lambda,
            Self::Weibull { lambda, shape } => weibull_hazard(t, lambda, shape),
        }
    }

    /// H(t) = -ln S(t)
    pub fn cumulative_hazard(&self, t: f64) -> f64 {
        match *self {
            Self::Exponential { lambda } => lambda * t,
            Self::Weibull { lambda, shape } => (lambda * t).powf(shape),
        }
    }

    /// evaluate the model on a time grid
    pub fn curve(&self, times: ArrayView1<f64>) -> Vec<CurvePoint> {
        times
            .iter()
            .map(|&time| CurvePoint {
                time,
                survival: self.survival(time),
                hazard: self.hazard(time),
                cumulative_hazard: self.cumulative_hazard(time),
            })
            .collect()
    }
}

/// most points a single grid may hold
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// evenly spaced grid from `start` up to and including `end` when it lands on a step
///
/// both ends must be finite and the grid may not exceed `MAX_GRID_POINTS`.
pub fn time_grid(start: f64, end: f64, step: f64) -> Result<Array1<f64>> {
    ensure_positive("step", step)?;
    if !start.is_finite() {
        return Err(SurvivalError::invalid_parameter("start", start));
    }
    if !end.is_finite() {
        return Err(SurvivalError::invalid_parameter("end", end));
    }
    if end < start {
        return Ok(Array1::zeros(0));
    }

    // count in f64 first, a huge span would overflow usize
    let steps = ((end - start) / step).floor();
    if !steps.is_finite() || steps >= MAX_GRID_POINTS as f64 {
        return Err(SurvivalError::invalid_parameter(
            "step",
            format!("{} (grid from {} to {} exceeds {} points)", step, start, end, MAX_GRID_POINTS),
        ));
    }
    let n = steps as usize + 1;
    Ok(Array1::from_iter((0..n).map(|i| start + i as f64 * step)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weibull_reduces_to_exponential() {
        for &t in &[0.0, 0.5, 3.0, 12.0] {
            assert_relative_eq!(weibull_survival(t, 0.1, 1.0), exponential_survival(t, 0.1), epsilon = 1e-12);
            assert_relative_eq!(weibull_hazard(t.max(0.1), 0.1, 1.0), 0.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weibull_hazard_shape() {
        let rising = [1.0, 2.0, 4.0].map(|t| weibull_hazard(t, 0.1, 2.0));
        assert!(rising[0] < rising[1] && rising[1] < rising[2]);

        let falling = [1.0, 2.0, 4.0].map(|t| weibull_hazard(t, 0.1, 0.8));
        assert!(falling[0] > falling[1] && falling[1] > falling[2]);
    }

    #[test]
    fn test_cumulative_hazard_matches_survival() {
        let models = [
            ParametricModel::exponential(0.2).unwrap(),
            ParametricModel::weibull(0.1, 1.5).unwrap(),
        ];
        for model in &models {
            for &t in &[0.5, 2.0, 7.5] {
                assert_relative_eq!(model.survival(t), (-model.cumulative_hazard(t)).exp(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_curve_on_grid() {
        let grid = time_grid(0.0, 2.0, 0.5).unwrap();
        assert_eq!(grid.len(), 5);

        let model = ParametricModel::exponential(0.3).unwrap();
        let curve = model.curve(grid.view());
        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0].survival, 1.0);
        assert_relative_eq!(curve[4].cumulative_hazard, 0.6, epsilon = 1e-12);
        assert!(curve.iter().all(|p| p.hazard == 0.3));
    }

    #[test]
    fn test_invalid_models() {
        assert!(ParametricModel::exponential(0.0).is_err());
        assert!(ParametricModel::weibull(0.1, -1.0).is_err());
        assert!(time_grid(0.0, 1.0, 0.0).is_err());
        assert!(time_grid(2.0, 1.0, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_time_grid_rejects_unbounded_spans() {
        let err = time_grid(0.0, f64::INFINITY, 1.0).unwrap_err();
        assert!(matches!(err, SurvivalError::InvalidParameter { ref parameter, .. } if parameter == "end"));
        assert!(time_grid(f64::NEG_INFINITY, 1.0, 1.0).is_err());
        assert!(time_grid(0.0, f64::NAN, 1.0).is_err());

        // finite but far too many points
        assert!(matches!(
            time_grid(0.0, 1e30, 1.0),
            Err(SurvivalError::InvalidParameter { .. })
        ));
        assert!(time_grid(0.0, 1.0, 1e-300).is_err());

        let grid = time_grid(0.0, (MAX_GRID_POINTS - 1) as f64, 1.0).unwrap();
        assert_eq!(grid.len(), MAX_GRID_POINTS);
    }

    #[test]
    fn test_model_serde_tag() {
        let model = ParametricModel::weibull(0.1, 2.0).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"distribution\":\"weibull\""));
        let back: ParametricModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
