//! Boundaries between the frame loop and its external collaborators.
//!
//! Video capture, landmark detection, 2D drawing and 3D rendering live outside
//! this crate. The frame loop only talks to them through these traits.

use crate::{
    landmarks::Landmark,
    pose_estimation::{Pose, Vec3},
    Result,
};
use image::{Rgb, RgbImage};

/// One captured video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: RgbImage,
}

impl VideoFrame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// A frame of the given size filled with one colour
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Video that has not delivered its first decoded frame reports zero size
    pub fn has_content(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Source of the most recent video frame
pub trait FrameSource {
    /// Latest frame, or `None` if capture has not started
    fn latest_frame(&mut self) -> Option<VideoFrame>;
}

/// Lifecycle of the external landmark detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorStatus {
    /// Model assets are still being loaded
    Loading,
    /// Ready to accept frames
    Ready,
    /// Initialization failed; tracking cannot start this session
    Failed(String),
}

/// Face-landmark detector boundary.
///
/// `detect` returns the landmarks of the single tracked face, or an empty
/// vector when no face is visible.
pub trait LandmarkDetector {
    fn status(&self) -> DetectorStatus;

    /// Run detection on `frame` captured at `timestamp_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if this detection call failed.
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Result<Vec<Landmark>>;
}

/// Dot drawn over the video to show where an anchor was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Centre in canvas pixels
    pub x: f64,
    pub y: f64,
    pub radius: u32,
    pub color: [u8; 3],
}

/// 2D canvas the raw video is drawn onto
pub trait DrawingSurface {
    /// False until the canvas has a drawing context and a size
    fn is_ready(&self) -> bool;

    /// Canvas size in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Replace the canvas content with `frame`
    fn draw_frame(&mut self, frame: &VideoFrame);

    /// Overlay anchor markers on the current content
    fn draw_markers(&mut self, markers: &[Marker]);
}

/// 3D renderer holding the glasses mesh
pub trait PoseRenderer {
    /// Show the mesh at `pose`, or hide it when `pose` is `None`
    fn render(&mut self, pose: Option<&Pose>);

    /// Debug spheres at the anchors mapped into renderer space
    fn anchor_markers(&mut self, _positions: &[Vec3; 3]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame_has_no_content() {
        assert!(!VideoFrame::new(RgbImage::new(0, 0)).has_content());
        assert!(!VideoFrame::solid(640, 0, [0, 0, 0]).has_content());
        assert!(VideoFrame::solid(640, 480, [0, 0, 0]).has_content());
    }
}
