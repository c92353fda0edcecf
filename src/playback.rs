//! Headless collaborators for replaying landmark data through the frame loop.
//!
//! A recorded trace or a synthetic swaying face stands in for the detector, a
//! fixed-size solid frame stands in for the camera, and poses are logged
//! instead of rendered.

use crate::{
    frame_loop::LoopControl,
    interfaces::{DetectorStatus, FrameSource, LandmarkDetector, PoseRenderer, VideoFrame},
    landmarks::{expand_anchors, AnchorIndices, AnchorSet, Landmark},
    pose_estimation::{Pose, Vec3},
    Error, Result,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use std::path::Path;

/// Anchors recorded for one frame, normalized `[x, y, z]`
#[derive(Debug, Clone, Copy, Deserialize)]
struct TraceAnchors {
    left_eye: [f64; 3],
    right_eye: [f64; 3],
    nose_bridge: [f64; 3],
}

impl From<TraceAnchors> for AnchorSet {
    fn from(anchors: TraceAnchors) -> Self {
        let point = |[x, y, z]: [f64; 3]| Landmark::new(x, y, z);
        Self {
            left_eye: point(anchors.left_eye),
            right_eye: point(anchors.right_eye),
            nose_bridge: point(anchors.nose_bridge),
        }
    }
}

/// Trace file layout; `null` entries are frames without a face
#[derive(Debug, Deserialize)]
struct TraceFile {
    frames: Vec<Option<TraceAnchors>>,
}

/// Detector that replays anchors recorded in a YAML trace
#[derive(Debug, Clone)]
pub struct TraceDetector {
    frames: Vec<Option<AnchorSet>>,
    indices: AnchorIndices,
    next: usize,
}

impl TraceDetector {
    /// Load a trace from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid trace.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a trace from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::TraceError` if the text is not a valid trace.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let trace: TraceFile =
            serde_yaml::from_str(content).map_err(|e| Error::TraceError(format!("Failed to parse trace: {e}")))?;
        if trace.frames.is_empty() {
            return Err(Error::TraceError("Trace contains no frames".to_string()));
        }

        Ok(Self {
            frames: trace.frames.into_iter().map(|frame| frame.map(AnchorSet::from)).collect(),
            indices: AnchorIndices::default(),
            next: 0,
        })
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames not yet replayed
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.next)
    }
}

impl LandmarkDetector for TraceDetector {
    fn status(&self) -> DetectorStatus {
        DetectorStatus::Ready
    }

    fn detect(&mut self, _frame: &VideoFrame, timestamp_ms: f64) -> Result<Vec<Landmark>> {
        let Some(frame) = self.frames.get(self.next) else {
            return Ok(Vec::new());
        };
        self.next += 1;
        debug!("Trace frame {} at {timestamp_ms:.1} ms", self.next);
        Ok(frame.map_or_else(Vec::new, |anchors| expand_anchors(&anchors, &self.indices)))
    }
}

/// Detector producing a face that sways and tilts, with random jitter
#[derive(Debug, Clone)]
pub struct SyntheticFace {
    rng: StdRng,
    indices: AnchorIndices,
    frame: u64,
    jitter: f64,
    dropout: f64,
}

impl SyntheticFace {
    /// Create a synthetic face with a fixed seed
    ///
    /// # Panics
    ///
    /// Panics if `jitter` is negative.
    pub fn new(seed: u64, jitter: f64) -> Self {
        assert!(jitter >= 0.0, "Jitter must be non-negative");
        Self {
            rng: StdRng::seed_from_u64(seed),
            indices: AnchorIndices::default(),
            frame: 0,
            jitter,
            dropout: 0.0,
        }
    }

    /// Probability that a frame reports no face
    ///
    /// # Panics
    ///
    /// Panics if `probability` is outside [0, 1].
    #[must_use]
    pub fn with_dropout(mut self, probability: f64) -> Self {
        assert!((0.0..=1.0).contains(&probability), "Dropout must be in [0, 1]");
        self.dropout = probability;
        self
    }

    #[allow(clippy::cast_precision_loss)] // Frame counter only drives a slow sine
    fn anchors(&mut self) -> AnchorSet {
        let t = self.frame as f64 / 30.0;
        let center_x = 0.5 + 0.1 * (t * 0.8).sin();
        let center_y = 0.45 + 0.03 * (t * 1.3).sin();
        let half_span = 0.1 + 0.01 * (t * 0.5).sin();
        let tilt = 0.15 * (t * 0.6).sin();
        let (sin, cos) = tilt.sin_cos();

        let mut point = |dx: f64, dy: f64, z: f64| {
            let jx = if self.jitter > 0.0 { self.rng.gen_range(-self.jitter..=self.jitter) } else { 0.0 };
            let jy = if self.jitter > 0.0 { self.rng.gen_range(-self.jitter..=self.jitter) } else { 0.0 };
            Landmark::new(center_x + dx * cos - dy * sin + jx, center_y + dx * sin + dy * cos + jy, z)
        };

        // Nose bridge drifts sideways as the head turns
        let turn = 0.02 * (t * 0.8).cos();
        AnchorSet {
            left_eye: point(-half_span, 0.0, 0.0),
            right_eye: point(half_span, 0.0, 0.0),
            nose_bridge: point(turn, -0.02, -0.03),
        }
    }
}

impl LandmarkDetector for SyntheticFace {
    fn status(&self) -> DetectorStatus {
        DetectorStatus::Ready
    }

    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> Result<Vec<Landmark>> {
        self.frame += 1;
        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            return Ok(Vec::new());
        }
        let anchors = self.anchors();
        Ok(expand_anchors(&anchors, &self.indices))
    }
}

/// Solid-colour frames for a fixed number of ticks, then stops the loop
#[derive(Debug, Clone)]
pub struct PlaybackSource {
    frame: VideoFrame,
    frames_left: u64,
    control: LoopControl,
}

impl PlaybackSource {
    pub fn new(width: u32, height: u32, frames: u64, control: LoopControl) -> Self {
        Self {
            frame: VideoFrame::solid(width, height, [32, 32, 32]),
            frames_left: frames,
            control,
        }
    }
}

impl FrameSource for PlaybackSource {
    fn latest_frame(&mut self) -> Option<VideoFrame> {
        if self.frames_left == 0 {
            self.control.stop();
            return None;
        }
        self.frames_left -= 1;
        Some(self.frame.clone())
    }
}

/// Renderer that logs every published pose
#[derive(Debug, Default)]
pub struct LogRenderer {
    shown: u64,
    hidden: u64,
    last_anchors: Option<[Vec3; 3]>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks on which the glasses were shown
    pub fn shown(&self) -> u64 {
        self.shown
    }

    /// Ticks on which the glasses were hidden
    pub fn hidden(&self) -> u64 {
        self.hidden
    }

    pub fn last_anchors(&self) -> Option<&[Vec3; 3]> {
        self.last_anchors.as_ref()
    }
}

impl PoseRenderer for LogRenderer {
    fn render(&mut self, pose: Option<&Pose>) {
        match pose {
            Some(pose) => {
                self.shown += 1;
                info!(
                    "pos=({:7.3}, {:7.3}, {:7.3}) roll={:7.3} yaw={:7.3} scale={:7.3}",
                    pose.position.x, pose.position.y, pose.position.z, pose.rotation.z, pose.rotation.y, pose.scale
                );
            }
            None => {
                self.hidden += 1;
                info!("glasses hidden");
            }
        }
    }

    fn anchor_markers(&mut self, positions: &[Vec3; 3]) {
        self.last_anchors = Some(*positions);
    }
}
