//! Rigid-body pose of the glasses from the three face anchors.
//!
//! Position comes from the nose bridge, roll from the slope of the eye line,
//! a yaw proxy from the depth difference between the eyes and the uniform
//! scale from the eye distance in pixels. Pitch is not observable from these
//! anchors and is held at zero.

use crate::{
    coordinate_mapper::{map_point, RendererPoint},
    landmarks::AnchorSet,
    parameters::TransformParameters,
};

/// Three-component vector in renderer space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Pose handed to the renderer.
///
/// `rotation` holds Euler angles in radians applied as roll about z, yaw
/// about y and pitch about x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f64,
}

/// Unstabilized output of the estimator for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseCandidate {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Scale before the stabilizer gate; zero for coincident eyes
    pub scale: f64,
    /// Eye-to-eye distance in canvas pixels
    pub eye_distance: f64,
}

impl PoseCandidate {
    /// Combine with the scale the stabilizer decided to publish
    pub fn with_scale(&self, scale: f64) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
            scale,
        }
    }
}

/// Estimate the pose of the glasses on a canvas of `canvas_width` x `canvas_height` pixels
pub fn estimate_pose(
    anchors: &AnchorSet,
    canvas_width: u32,
    canvas_height: u32,
    params: &TransformParameters,
) -> PoseCandidate {
    let mut candidate = PoseCandidate::default();
    estimate_pose_into(anchors, canvas_width, canvas_height, params, &mut candidate);
    candidate
}

/// Same as [`estimate_pose`], filling a record owned by the caller
pub fn estimate_pose_into(
    anchors: &AnchorSet,
    canvas_width: u32,
    canvas_height: u32,
    params: &TransformParameters,
    out: &mut PoseCandidate,
) {
    let RendererPoint { x, y } = map_point(&anchors.nose_bridge, params);
    out.position = Vec3::new(x + params.x_offset, y + params.y_offset, params.z_offset);

    let dx = (anchors.right_eye.x - anchors.left_eye.x) * f64::from(canvas_width);
    let dy = (anchors.right_eye.y - anchors.left_eye.y) * f64::from(canvas_height);
    out.eye_distance = dx.hypot(dy);
    out.scale = if out.eye_distance == 0.0 {
        0.0
    } else {
        (out.eye_distance / params.scale_divider) * params.scale_multiplier
    };

    // atan2(0, 0) is 0 for both signed zeros we can produce here
    let tilt = dy.atan2(dx);
    let yaw = (anchors.right_eye.z - anchors.left_eye.z) * params.yaw_multiplier;
    out.rotation = Vec3::new(
        0.0,
        yaw * params.rotation_sensitivity,
        -tilt * params.tilt_multiplier * params.rotation_sensitivity,
    );
}

/// Anchors mapped into renderer space at depth zero, for debug markers
pub fn anchor_positions(anchors: &AnchorSet, params: &TransformParameters) -> [Vec3; 3] {
    [anchors.left_eye, anchors.right_eye, anchors.nose_bridge].map(|landmark| {
        let point = map_point(&landmark, params);
        Vec3::new(point.x, point.y, 0.0)
    })
}
