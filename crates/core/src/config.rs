//! Tunable constants for the voyage path and the scroll tracker.
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "curve": { "amplitude": 80.0 }, "tracker": { "marker_offset_y": -18.0 } }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal deflection of each zig-zag bend, in px.
pub const DEFAULT_AMPLITUDE: f64 = 60.0;
/// Vertical length of one bend, in px.
pub const DEFAULT_PERIOD: f64 = 160.0;
/// Chords per quadratic segment when measuring arc length.
pub const DEFAULT_FLATTEN_STEPS: usize = 32;
/// Visual lead-in before the ship starts moving, in px.
pub const DEFAULT_SCROLL_OFFSET: f64 = 100.0;
/// Shortest bend a config may ask for, in px.
pub const MIN_PERIOD: f64 = 1.0;
/// Most chords per segment the sampler will build.
pub const MAX_FLATTEN_STEPS: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    pub curve: CurveConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub amplitude: f64,
    pub period: f64,
    pub flatten_steps: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            period: DEFAULT_PERIOD,
            flatten_steps: DEFAULT_FLATTEN_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub scroll_offset: f64,
    pub marker_offset_y: Option<f64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            marker_offset_y: None,
        }
    }
}

impl WakeConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: WakeConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.curve;
        if !c.amplitude.is_finite() || c.amplitude < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "curve.amplitude",
                requirement: "finite and >= 0",
                value: c.amplitude,
            });
        }
        if !c.period.is_finite() || c.period < MIN_PERIOD {
            return Err(ConfigError::OutOfRange {
                field: "curve.period",
                requirement: "finite and >= 1",
                value: c.period,
            });
        }
        if c.flatten_steps == 0 || c.flatten_steps > MAX_FLATTEN_STEPS {
            return Err(ConfigError::OutOfRange {
                field: "curve.flatten_steps",
                requirement: "between 1 and 256",
                value: c.flatten_steps as f64,
            });
        }
        if !self.tracker.scroll_offset.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "tracker.scroll_offset",
                requirement: "finite",
                value: self.tracker.scroll_offset,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = WakeConfig::from_json(b"{}").unwrap();
        assert_eq!(config, WakeConfig::default());
        assert_eq!(config.tracker.scroll_offset, 100.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            WakeConfig::from_json(br#"{"curve":{"amplitude":80.0},"tracker":{"marker_offset_y":-18.0}}"#)
                .unwrap();
        assert_eq!(config.curve.amplitude, 80.0);
        assert_eq!(config.curve.period, DEFAULT_PERIOD);
        assert_eq!(config.tracker.marker_offset_y, Some(-18.0));
    }

    #[test]
    fn rejects_non_positive_period() {
        let err = WakeConfig::from_json(br#"{"curve":{"period":0.0}}"#).unwrap_err();
        assert!(err.to_string().contains("curve.period"));
    }

    #[test]
    fn rejects_sub_pixel_period() {
        let err = WakeConfig::from_json(br#"{"curve":{"period":1e-9}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "curve.period",
                ..
            }
        ));
        assert!(WakeConfig::from_json(br#"{"curve":{"period":1.0}}"#).is_ok());
    }

    #[test]
    fn rejects_excessive_flatten_steps() {
        let err = WakeConfig::from_json(br#"{"curve":{"flatten_steps":100000}}"#).unwrap_err();
        assert!(err.to_string().contains("curve.flatten_steps"));
        assert!(WakeConfig::from_json(br#"{"curve":{"flatten_steps":256}}"#).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            WakeConfig::from_json(b"{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
