//! Facial landmarks and the three anchors the pose is derived from.

use crate::{
    constants::{FACE_MESH_LANDMARK_COUNT, LEFT_PUPIL_INDEX, NOSE_BRIDGE_INDEX, RIGHT_PUPIL_INDEX},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// One tracked face point.
///
/// `x` and `y` are normalized to the image width and height. `z` is relative
/// depth on the same scale; more negative values are closer to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position of this landmark in pixels on a canvas of the given size
    pub fn to_pixels(&self, width: u32, height: u32) -> (f64, f64) {
        (self.x * f64::from(width), self.y * f64::from(height))
    }
}

/// Left eye, right eye and nose bridge of a single face
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorSet {
    pub left_eye: Landmark,
    pub right_eye: Landmark,
    pub nose_bridge: Landmark,
}

/// Positions of the anchors inside the detector's landmark array.
///
/// Only the pupil-centre convention is supported. Eye corners sit at
/// different depths and widths than the pupils and produce a different
/// eye distance, so mixing the two would change the published scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorIndices {
    pub left_eye: usize,
    pub right_eye: usize,
    pub nose_bridge: usize,
}

/// Canonical anchors for the 478-point face mesh
pub const FACE_MESH_ANCHORS: AnchorIndices = AnchorIndices {
    left_eye: LEFT_PUPIL_INDEX,
    right_eye: RIGHT_PUPIL_INDEX,
    nose_bridge: NOSE_BRIDGE_INDEX,
};

impl Default for AnchorIndices {
    fn default() -> Self {
        FACE_MESH_ANCHORS
    }
}

impl AnchorIndices {
    /// Check the table against a detector topology with `landmark_count` points
    ///
    /// # Errors
    ///
    /// Returns an error if an index is outside the topology or two anchors
    /// share an index.
    pub fn validate(&self, landmark_count: usize) -> Result<()> {
        for (name, index) in self.named() {
            if index >= landmark_count {
                return Err(Error::InvalidInput(format!(
                    "Anchor {name} at index {index} is outside a topology of {landmark_count} landmarks"
                )));
            }
        }
        if self.left_eye == self.right_eye
            || self.left_eye == self.nose_bridge
            || self.right_eye == self.nose_bridge
        {
            return Err(Error::InvalidInput(format!("Anchor indices must be distinct: {self:?}")));
        }
        Ok(())
    }

    /// Minimum number of landmarks a detection needs to carry all anchors
    pub fn required_len(&self) -> usize {
        self.left_eye.max(self.right_eye).max(self.nose_bridge) + 1
    }

    /// Select the anchors from a full landmark set.
    ///
    /// Returns `None` when the detector produced fewer points than the table
    /// addresses.
    pub fn extract(&self, landmarks: &[Landmark]) -> Option<AnchorSet> {
        Some(AnchorSet {
            left_eye: *landmarks.get(self.left_eye)?,
            right_eye: *landmarks.get(self.right_eye)?,
            nose_bridge: *landmarks.get(self.nose_bridge)?,
        })
    }

    fn named(&self) -> [(&'static str, usize); 3] {
        [
            ("left_eye", self.left_eye),
            ("right_eye", self.right_eye),
            ("nose_bridge", self.nose_bridge),
        ]
    }
}

/// Build a full face-mesh landmark set with only the anchors populated.
///
/// Used by traces and synthetic faces that only record the three anchors.
pub fn expand_anchors(anchors: &AnchorSet, indices: &AnchorIndices) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::default(); indices.required_len().max(FACE_MESH_LANDMARK_COUNT)];
    landmarks[indices.left_eye] = anchors.left_eye;
    landmarks[indices.right_eye] = anchors.right_eye;
    landmarks[indices.nose_bridge] = anchors.nose_bridge;
    landmarks
}
