//! Mapping from normalized image coordinates into renderer space.

use crate::{landmarks::Landmark, parameters::TransformParameters};

/// A point in renderer space. Renderer `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RendererPoint {
    pub x: f64,
    pub y: f64,
}

/// Map a landmark onto `[-coordinate_factor, coordinate_factor]`, centred on
/// the image midpoint, with the vertical axis flipped.
pub fn map_point(landmark: &Landmark, params: &TransformParameters) -> RendererPoint {
    RendererPoint {
        x: (landmark.x * 2.0 - 1.0) * params.coordinate_factor * params.horizontal_sensitivity,
        y: -(landmark.y * 2.0 - 1.0) * params.coordinate_factor * params.vertical_sensitivity,
    }
}
