//! Live-tunable transform coefficients and the store that owns them.
//!
//! The store is a cheap cloneable handle. The settings surface writes through
//! one clone, the frame loop reads the latest snapshot through another at the
//! top of every tick. Last write wins.

use crate::{
    constants::{
        DEFAULT_COORDINATE_FACTOR, DEFAULT_HORIZONTAL_SENSITIVITY, DEFAULT_ROTATION_SENSITIVITY,
        DEFAULT_SCALE_DIVIDER, DEFAULT_SCALE_MULTIPLIER, DEFAULT_TILT_MULTIPLIER, DEFAULT_VERTICAL_SENSITIVITY,
        DEFAULT_YAW_MULTIPLIER,
    },
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Coefficients read by the coordinate mapper and pose estimator every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParameters {
    /// Half-width of the renderer space the image is mapped onto
    pub coordinate_factor: f64,
    pub horizontal_sensitivity: f64,
    pub vertical_sensitivity: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    /// Gain applied to the depth difference between the eyes
    pub yaw_multiplier: f64,
    /// Gain applied to the eye-line slope
    pub tilt_multiplier: f64,
    /// Overall gain applied to both rotation channels
    pub rotation_sensitivity: f64,
    pub scale_divider: f64,
    pub scale_multiplier: f64,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            coordinate_factor: DEFAULT_COORDINATE_FACTOR,
            horizontal_sensitivity: DEFAULT_HORIZONTAL_SENSITIVITY,
            vertical_sensitivity: DEFAULT_VERTICAL_SENSITIVITY,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            yaw_multiplier: DEFAULT_YAW_MULTIPLIER,
            tilt_multiplier: DEFAULT_TILT_MULTIPLIER,
            rotation_sensitivity: DEFAULT_ROTATION_SENSITIVITY,
            scale_divider: DEFAULT_SCALE_DIVIDER,
            scale_multiplier: DEFAULT_SCALE_MULTIPLIER,
        }
    }
}

impl TransformParameters {
    /// Field names and values, in declaration order
    pub fn fields(&self) -> [(&'static str, f64); 11] {
        [
            ("coordinate_factor", self.coordinate_factor),
            ("horizontal_sensitivity", self.horizontal_sensitivity),
            ("vertical_sensitivity", self.vertical_sensitivity),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
            ("z_offset", self.z_offset),
            ("yaw_multiplier", self.yaw_multiplier),
            ("tilt_multiplier", self.tilt_multiplier),
            ("rotation_sensitivity", self.rotation_sensitivity),
            ("scale_divider", self.scale_divider),
            ("scale_multiplier", self.scale_multiplier),
        ]
    }

    /// Reject NaN and infinite coefficients
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` naming the first non-finite field.
    pub fn validate(&self) -> Result<()> {
        match self.fields().into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(Error::InvalidParameter {
                name: name.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }
}

/// Partial update from the settings surface; `None` fields are left as they are
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterUpdate {
    pub coordinate_factor: Option<f64>,
    pub horizontal_sensitivity: Option<f64>,
    pub vertical_sensitivity: Option<f64>,
    pub x_offset: Option<f64>,
    pub y_offset: Option<f64>,
    pub z_offset: Option<f64>,
    pub yaw_multiplier: Option<f64>,
    pub tilt_multiplier: Option<f64>,
    pub rotation_sensitivity: Option<f64>,
    pub scale_divider: Option<f64>,
    pub scale_multiplier: Option<f64>,
}

impl ParameterUpdate {
    /// Update a single field by name, the way a slider reports its value.
    ///
    /// Accepts both `scale_multiplier` and `scaleMultiplier` spellings.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownParameter` if no field has that name.
    pub fn single(name: &str, value: f64) -> Result<Self> {
        let mut update = Self::default();
        let slot = match normalize_name(name).as_str() {
            "coordinate_factor" => &mut update.coordinate_factor,
            "horizontal_sensitivity" => &mut update.horizontal_sensitivity,
            "vertical_sensitivity" => &mut update.vertical_sensitivity,
            "x_offset" => &mut update.x_offset,
            "y_offset" => &mut update.y_offset,
            "z_offset" => &mut update.z_offset,
            "yaw_multiplier" => &mut update.yaw_multiplier,
            "tilt_multiplier" => &mut update.tilt_multiplier,
            "rotation_sensitivity" => &mut update.rotation_sensitivity,
            "scale_divider" => &mut update.scale_divider,
            "scale_multiplier" => &mut update.scale_multiplier,
            _ => return Err(Error::UnknownParameter(name.to_string())),
        };
        *slot = Some(value);
        Ok(update)
    }

    /// Parse a `name=value` assignment
    ///
    /// # Errors
    ///
    /// Returns an error if the text has no `=`, the value is not a number or
    /// the name is unknown.
    pub fn parse_assignment(text: &str) -> Result<Self> {
        let (name, value) = text
            .split_once('=')
            .ok_or_else(|| Error::InvalidInput(format!("Expected name=value, got '{text}'")))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|e| Error::InvalidInput(format!("Invalid value for {}: {e}", name.trim())))?;
        Self::single(name.trim(), value)
    }

    /// Overlay the set fields onto `params`
    pub fn merged_into(&self, params: TransformParameters) -> TransformParameters {
        TransformParameters {
            coordinate_factor: self.coordinate_factor.unwrap_or(params.coordinate_factor),
            horizontal_sensitivity: self.horizontal_sensitivity.unwrap_or(params.horizontal_sensitivity),
            vertical_sensitivity: self.vertical_sensitivity.unwrap_or(params.vertical_sensitivity),
            x_offset: self.x_offset.unwrap_or(params.x_offset),
            y_offset: self.y_offset.unwrap_or(params.y_offset),
            z_offset: self.z_offset.unwrap_or(params.z_offset),
            yaw_multiplier: self.yaw_multiplier.unwrap_or(params.yaw_multiplier),
            tilt_multiplier: self.tilt_multiplier.unwrap_or(params.tilt_multiplier),
            rotation_sensitivity: self.rotation_sensitivity.unwrap_or(params.rotation_sensitivity),
            scale_divider: self.scale_divider.unwrap_or(params.scale_divider),
            scale_multiplier: self.scale_multiplier.unwrap_or(params.scale_multiplier),
        }
    }
}

fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            normalized.push('_');
            normalized.push(ch.to_ascii_lowercase());
        } else {
            normalized.push(ch);
        }
    }
    normalized
}

/// Shared owner of the current `TransformParameters`
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    inner: Arc<RwLock<TransformParameters>>,
}

impl ParameterStore {
    /// Create a store holding `initial`
    ///
    /// # Errors
    ///
    /// Returns an error if any initial coefficient is not finite.
    pub fn new(initial: TransformParameters) -> Result<Self> {
        initial.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(initial)),
        })
    }

    /// Latest parameters
    pub fn get(&self) -> TransformParameters {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge a partial update into the current parameters.
    ///
    /// The update is applied atomically: if any field is non-finite nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for NaN or infinite values.
    pub fn set(&self, update: &ParameterUpdate) -> Result<TransformParameters> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let merged = update.merged_into(*guard);
        merged.validate()?;
        *guard = merged;
        debug!("Transform parameters updated: {update:?}");
        Ok(merged)
    }
}
