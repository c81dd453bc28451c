use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, RenderResult};

use super::{point::Point, resolution::Resolution};

/// Immutable description of one render: the viewport on the complex plane
/// plus the iteration bound and the output grid. Built once per render
/// request and read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub center: Point,
    /// Complex-plane distance covered by one pixel.
    pub step: f64,
    pub max_iteration: u32,
    pub resolution: Resolution,
}

impl RenderConfig {
    pub const DEFAULT_CENTER_X: f64 = -0.743644786;
    pub const DEFAULT_CENTER_Y: f64 = 0.1318252536;
    pub const DEFAULT_STEP: f64 = 0.00029336;
    pub const DEFAULT_MAX_ITERATION: u32 = 10000;
    pub const DEFAULT_WIDTH: u16 = 1200;
    pub const DEFAULT_HEIGHT: u16 = 800;

    pub fn new(center: Point, step: f64, max_iteration: u32, resolution: Resolution) -> Self {
        Self {
            center,
            step,
            max_iteration,
            resolution,
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(RenderError::Config(format!(
                "step must be finite and positive, got {}",
                self.step
            )));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(RenderError::Config("center must be finite".to_string()));
        }
        if self.max_iteration == 0 {
            return Err(RenderError::Config(
                "max_iteration must be at least 1".to_string(),
            ));
        }
        if self.resolution.nx == 0 || self.resolution.ny == 0 {
            return Err(RenderError::Config(format!(
                "resolution must be non-empty, got {}x{}",
                self.resolution.nx, self.resolution.ny
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let wrapped = serde_json::json!({ "RenderConfig": self });
        serde_json::to_value(wrapped)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let v: serde_json::Value = serde_json::from_str(raw)?;
        serde_json::from_value(v["RenderConfig"].clone())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            center: Point::new(Self::DEFAULT_CENTER_X, Self::DEFAULT_CENTER_Y),
            step: Self::DEFAULT_STEP,
            max_iteration: Self::DEFAULT_MAX_ITERATION,
            resolution: Resolution::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_step() {
        let mut config = RenderConfig::default();
        config.step = 0.0;
        assert!(config.validate().is_err());
        config.step = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_iterations_and_empty_grid() {
        let mut config = RenderConfig::default();
        config.max_iteration = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.resolution = Resolution::new(0, 800);
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let config = RenderConfig::default();
        let raw = serde_json::to_string(&config.to_json().unwrap()).unwrap();
        let parsed = RenderConfig::from_json(&raw).unwrap();
        assert_eq!(parsed.center, config.center);
        assert_eq!(parsed.step, config.step);
        assert_eq!(parsed.max_iteration, config.max_iteration);
        assert_eq!(parsed.resolution, config.resolution);
    }
}
