//! Optional smoothing of the position and rotation channels.
//!
//! By default only scale is stabilized and the other channels are published
//! raw. A filter spec such as `exponential:0.4` turns on per-channel smoothing
//! for position and rotation.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MEDIAN_WINDOW, DEFAULT_MOVING_AVERAGE_WINDOW},
    pose_estimation::Vec3,
    Error, Result,
};

/// Trait for all single-channel filters
pub trait ChannelFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl ChannelFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter from a spec string: `name` or `name:parameter`
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or invalid parameters.
pub fn create_filter(spec: &str) -> Result<Box<dyn ChannelFilter>> {
    let (name, param) = match spec.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (spec, None),
    };

    match name.trim().to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" => {
            let alpha = parse_param(param, DEFAULT_EXPONENTIAL_ALPHA)?;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
        }
        "moving_average" | "movingaverage" => {
            let window = parse_window(param, DEFAULT_MOVING_AVERAGE_WINDOW)?;
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
        }
        "median" => {
            let window = parse_window(param, DEFAULT_MEDIAN_WINDOW)?;
            if window % 2 == 0 {
                return Err(Error::FilterError(format!("Median window size must be odd, got {window}")));
            }
            Ok(Box::new(median::MedianFilter::new(window)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

fn parse_param(param: Option<&str>, default: f64) -> Result<f64> {
    param.map_or(Ok(default), |p| {
        p.trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid filter parameter: {p}")))
    })
}

fn parse_window(param: Option<&str>, default: usize) -> Result<usize> {
    let window = param.map_or(Ok(default), |p| {
        p.trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid window size: {p}")))
    })?;
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(window)
}

/// One filter per position and rotation component
pub struct PoseSmoother {
    position: [Box<dyn ChannelFilter>; 3],
    rotation: [Box<dyn ChannelFilter>; 3],
}

impl PoseSmoother {
    /// Build a smoother using the same filter spec for all six channels
    ///
    /// # Errors
    ///
    /// Returns an error if the spec is invalid.
    pub fn from_spec(spec: &str) -> Result<Self> {
        Ok(Self {
            position: [create_filter(spec)?, create_filter(spec)?, create_filter(spec)?],
            rotation: [create_filter(spec)?, create_filter(spec)?, create_filter(spec)?],
        })
    }

    /// Smooth a position and rotation pair in place
    pub fn apply(&mut self, position: &mut Vec3, rotation: &mut Vec3) {
        Self::apply_vec(&mut self.position, position);
        Self::apply_vec(&mut self.rotation, rotation);
    }

    fn apply_vec(filters: &mut [Box<dyn ChannelFilter>; 3], value: &mut Vec3) {
        value.x = filters[0].apply(value.x);
        value.y = filters[1].apply(value.y);
        value.z = filters[2].apply(value.z);
    }

    pub fn reset(&mut self) {
        for filter in self.position.iter_mut().chain(self.rotation.iter_mut()) {
            filter.reset();
        }
    }

    pub fn name(&self) -> &str {
        self.position[0].name()
    }
}
