//! Helper mocks and utilities for tests

#![allow(dead_code)]

use glasses_tryon::{
    config::Config,
    frame_loop::{FrameLoop, LoopControl},
    interfaces::{DetectorStatus, FrameSource, LandmarkDetector, PoseRenderer, VideoFrame},
    landmarks::{expand_anchors, AnchorIndices, AnchorSet, Landmark},
    parameters::ParameterStore,
    pose_estimation::{Pose, Vec3},
    surface::ImageSurface,
    Error, Result,
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

/// Anchors with the pupils 0.2 of the width apart, level, nose centred
pub fn level_face() -> AnchorSet {
    AnchorSet {
        left_eye: Landmark::new(0.4, 0.5, 0.0),
        right_eye: Landmark::new(0.6, 0.5, 0.0),
        nose_bridge: Landmark::new(0.5, 0.45, 0.0),
    }
}

/// Same face with the eye distance multiplied by `factor`
pub fn scaled_face(factor: f64) -> AnchorSet {
    let half = 0.1 * factor;
    AnchorSet {
        left_eye: Landmark::new(0.5 - half, 0.5, 0.0),
        right_eye: Landmark::new(0.5 + half, 0.5, 0.0),
        nose_bridge: Landmark::new(0.5, 0.45, 0.0),
    }
}

/// Full landmark vector for the given anchors
pub fn mesh(anchors: &AnchorSet) -> Vec<Landmark> {
    expand_anchors(anchors, &AnchorIndices::default())
}

/// Frame source that hands out the same frame, or nothing
pub struct StaticSource {
    pub frame: Option<VideoFrame>,
}

impl StaticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Some(VideoFrame::solid(width, height, [40, 40, 40])),
        }
    }

    pub fn empty() -> Self {
        Self { frame: None }
    }
}

impl FrameSource for StaticSource {
    fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.frame.clone()
    }
}

/// One scripted detector response
pub enum Step {
    Face(AnchorSet),
    Landmarks(Vec<Landmark>),
    NoFace,
    Fail(String),
    Unavailable(String),
    /// Raise the stop flag while "detecting", then report a face
    StopDuring(AnchorSet),
}

/// Detector that replays a script and records the timestamps it was given
pub struct ScriptedDetector {
    pub status: Rc<RefCell<DetectorStatus>>,
    pub steps: VecDeque<Step>,
    pub timestamps: Vec<f64>,
    pub control: Option<LoopControl>,
}

impl ScriptedDetector {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            status: Rc::new(RefCell::new(DetectorStatus::Ready)),
            steps: steps.into(),
            timestamps: Vec::new(),
            control: None,
        }
    }

    pub fn with_status(mut self, status: DetectorStatus) -> Self {
        self.status = Rc::new(RefCell::new(status));
        self
    }

    pub fn with_control(mut self, control: LoopControl) -> Self {
        self.control = Some(control);
        self
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn status(&self) -> DetectorStatus {
        self.status.borrow().clone()
    }

    fn detect(&mut self, _frame: &VideoFrame, timestamp_ms: f64) -> Result<Vec<Landmark>> {
        self.timestamps.push(timestamp_ms);
        match self.steps.pop_front() {
            Some(Step::Face(anchors)) => Ok(mesh(&anchors)),
            Some(Step::Landmarks(landmarks)) => Ok(landmarks),
            Some(Step::NoFace) | None => Ok(Vec::new()),
            Some(Step::Fail(reason)) => Err(Error::DetectionFailed(reason)),
            Some(Step::Unavailable(reason)) => Err(Error::DetectorUnavailable(reason)),
            Some(Step::StopDuring(anchors)) => {
                if let Some(control) = &self.control {
                    control.stop();
                }
                Ok(mesh(&anchors))
            }
        }
    }
}

/// What the renderer was told on one call
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Shown(Pose),
    Hidden,
}

/// Renderer that records every call
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Rendered>,
    pub anchor_markers: Vec<[Vec3; 3]>,
}

impl RecordingRenderer {
    pub fn poses(&self) -> Vec<Pose> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Rendered::Shown(pose) => Some(*pose),
                Rendered::Hidden => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&Rendered> {
        self.calls.last()
    }
}

impl PoseRenderer for RecordingRenderer {
    fn render(&mut self, pose: Option<&Pose>) {
        self.calls.push(pose.map_or(Rendered::Hidden, |pose| Rendered::Shown(*pose)));
    }

    fn anchor_markers(&mut self, positions: &[Vec3; 3]) {
        self.anchor_markers.push(*positions);
    }
}

pub type TestLoop = FrameLoop<StaticSource, ScriptedDetector, ImageSurface, RecordingRenderer>;

/// Loop over a 640x480 static source with default settings
pub fn create_test_loop(steps: Vec<Step>) -> Result<TestLoop> {
    create_test_loop_with(steps, &Config::default(), LoopControl::default())
}

pub fn create_test_loop_with(steps: Vec<Step>, config: &Config, control: LoopControl) -> Result<TestLoop> {
    let detector = ScriptedDetector::new(steps).with_control(control.clone());
    FrameLoop::new(
        StaticSource::new(WIDTH, HEIGHT),
        detector,
        ImageSurface::with_size(WIDTH, HEIGHT),
        RecordingRenderer::default(),
        ParameterStore::new(config.transform)?,
        control,
        config,
    )
}
