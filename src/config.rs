//! Configuration management for the try-on engine

use crate::{
    constants::{DEFAULT_INITIAL_SCALE, DEFAULT_TARGET_FPS, SCALE_CHANGE_THRESHOLD},
    filters::PoseSmoother,
    parameters::TransformParameters,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial transform coefficients
    pub transform: TransformParameters,

    /// Scale stabilizer configuration
    pub stabilizer: StabilizerConfig,

    /// Optional position/rotation smoothing
    pub smoothing: SmoothingConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// What happens to the stabilized scale while no face is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceLossPolicy {
    /// Keep the last stable scale so re-detection continues from it
    #[default]
    Preserve,
    /// Return to the initial scale
    Reset,
}

/// Scale stabilizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Minimum change in scale that is published
    pub threshold: f64,

    /// Scale published before the first face
    pub initial_scale: f64,

    /// Behaviour across frames without a face
    pub on_face_lost: FaceLossPolicy,
}

/// Smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec for position and rotation (`none`, `exponential:0.5`,
    /// `moving_average:5`, `median:5`)
    pub filter: String,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display refresh rate the loop is paced to
    pub target_fps: u32,

    /// Draw anchor dots over the video
    pub debug_markers: bool,

    /// Show the glasses at start-up
    pub overlay_enabled: bool,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            threshold: SCALE_CHANGE_THRESHOLD,
            initial_scale: DEFAULT_INITIAL_SCALE,
            on_face_lost: FaceLossPolicy::Preserve,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            debug_markers: true,
            overlay_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the channel smoother, or `None` when smoothing is off
    ///
    /// # Errors
    ///
    /// Returns an error if the filter spec is invalid.
    pub fn create_smoother(&self) -> Result<Option<PoseSmoother>> {
        match self.smoothing.filter.trim().to_lowercase().as_str() {
            "" | "none" | "nofilter" => Ok(None),
            spec => PoseSmoother::from_spec(spec).map(Some),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.transform
            .validate()
            .map_err(|e| Error::ConfigError(format!("Transform parameters: {e}")))?;

        if !(self.stabilizer.threshold.is_finite() && self.stabilizer.threshold >= 0.0) {
            return Err(Error::ConfigError(
                "Stabilizer threshold must be a non-negative number".to_string(),
            ));
        }
        if !(self.stabilizer.initial_scale.is_finite() && self.stabilizer.initial_scale > 0.0) {
            return Err(Error::ConfigError("Initial scale must be greater than 0".to_string()));
        }

        self.create_smoother()
            .map_err(|e| Error::ConfigError(format!("Smoothing: {e}")))?;

        if self.display.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Glasses Try-On Configuration

# Transform coefficients (live-tunable at runtime)
transform:
  coordinate_factor: 5.0
  horizontal_sensitivity: 1.0
  vertical_sensitivity: 0.7
  x_offset: 0.0
  y_offset: 0.0
  z_offset: 0.0
  yaw_multiplier: 3.0
  tilt_multiplier: 1.0
  rotation_sensitivity: 1.0
  scale_divider: 20.0
  scale_multiplier: 5.0

# Scale stabilizer
stabilizer:
  threshold: 0.05
  initial_scale: 1.0
  on_face_lost: preserve

# Position/rotation smoothing (none, exponential:A, moving_average:N, median:N)
smoothing:
  filter: "none"

# Display settings
display:
  target_fps: 60
  debug_markers: true
  overlay_enabled: true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.transform, defaults.transform);
        assert_eq!(parsed.stabilizer.threshold, defaults.stabilizer.threshold);
        assert_eq!(parsed.stabilizer.on_face_lost, FaceLossPolicy::Preserve);
        assert_eq!(parsed.display.target_fps, 60);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("transform:\n  scale_multiplier: 10.0\nstabilizer:\n  on_face_lost: reset\n")
            .unwrap();
        assert_eq!(config.transform.scale_multiplier, 10.0);
        assert_eq!(config.transform.scale_divider, 20.0);
        assert_eq!(config.stabilizer.on_face_lost, FaceLossPolicy::Reset);
        assert_eq!(config.stabilizer.initial_scale, 1.0);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Config::from_yaml("transform: [1, 2"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.display.target_fps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transform.tilt_multiplier = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stabilizer.initial_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.filter = "median:4".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create_smoother() {
        let mut config = Config::default();
        assert!(config.create_smoother().unwrap().is_none());
        config.smoothing.filter = "exponential:0.3".to_string();
        assert!(config.create_smoother().unwrap().is_some());
    }

    #[test]
    fn test_blank_smoothing_filter_is_valid() {
        for filter in ["", "  ", " None "] {
            let mut config = Config::default();
            config.smoothing.filter = filter.to_string();
            assert!(config.create_smoother().unwrap().is_none());
            assert!(config.validate().is_ok(), "'{filter}' should mean no smoothing");
        }
    }
}
