//! Frame loop controller.
//!
//! One tick pulls the latest video frame, runs the landmark detector on it,
//! turns the anchors into a pose and hands the pose to the renderer while the
//! raw frame goes to the drawing surface. `run` repeats ticks at the display
//! refresh rate until the loop is stopped.
//!
//! Settings changes, stop requests and detector readiness are all observed at
//! the top of the next tick. Nothing here blocks on them.

use crate::{
    config::{Config, FaceLossPolicy},
    constants::{DEBUG_MARKER_RADIUS, FACE_MESH_LANDMARK_COUNT, MIN_TIMESTAMP_STEP_MS},
    filters::PoseSmoother,
    interfaces::{DetectorStatus, DrawingSurface, FrameSource, LandmarkDetector, Marker, PoseRenderer, VideoFrame},
    landmarks::{AnchorIndices, AnchorSet},
    parameters::{ParameterStore, TransformParameters},
    pose_estimation::{anchor_positions, estimate_pose_into, Pose, PoseCandidate},
    stabilizer::ScaleStabilizer,
    Error, Result,
};
use log::{debug, error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

const LEFT_EYE_COLOR: [u8; 3] = [255, 0, 0];
const RIGHT_EYE_COLOR: [u8; 3] = [0, 0, 255];
const NOSE_BRIDGE_COLOR: [u8; 3] = [0, 255, 0];

/// Flags shared between the loop and whoever drives it
#[derive(Debug)]
struct ControlFlags {
    stopped: AtomicBool,
    overlay_enabled: AtomicBool,
}

/// Cloneable handle used to stop the loop and toggle the overlay
#[derive(Debug, Clone)]
pub struct LoopControl {
    flags: Arc<ControlFlags>,
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LoopControl {
    pub fn new(overlay_enabled: bool) -> Self {
        Self {
            flags: Arc::new(ControlFlags {
                stopped: AtomicBool::new(false),
                overlay_enabled: AtomicBool::new(overlay_enabled),
            }),
        }
    }

    /// Request the loop to stop. No tick starts after this returns.
    pub fn stop(&self) {
        self.flags.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flags.stopped.load(Ordering::SeqCst)
    }

    /// Show or remove the glasses without stopping the video
    pub fn set_overlay_enabled(&self, enabled: bool) {
        self.flags.overlay_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn overlay_enabled(&self) -> bool {
        self.flags.overlay_enabled.load(Ordering::SeqCst)
    }
}

/// Phase reached by the most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Detecting,
    FacePresent,
    FaceAbsent,
    Stopped,
}

/// Whether the detector can be used this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingState {
    /// Waiting for the detector to report ready
    Starting,
    Active,
    /// The detector failed to initialize; video keeps running without tracking
    Disabled(String),
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Video, canvas or detector not ready yet; nothing was done
    NotReady,
    /// A pose was published
    FacePresent,
    /// No face; the glasses were hidden
    FaceAbsent,
    /// Overlay switched off; frame drawn, glasses hidden
    OverlayHidden,
    /// Tracking unavailable; frame drawn, glasses hidden
    TrackingDisabled,
    /// Detection failed this tick; frame drawn, pose left as it was
    Skipped,
    /// The loop was stopped; any detection result was discarded
    Stopped,
}

/// Options taken from the configuration at construction time
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub target_fps: u32,
    pub debug_markers: bool,
    pub face_loss_policy: FaceLossPolicy,
}

impl From<&Config> for LoopOptions {
    fn from(config: &Config) -> Self {
        Self {
            target_fps: config.display.target_fps,
            debug_markers: config.display.debug_markers,
            face_loss_policy: config.stabilizer.on_face_lost,
        }
    }
}

/// Counters collected while the loop runs
#[derive(Debug, Clone, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub not_ready: u64,
    pub face_present: u64,
    pub face_absent: u64,
    pub skipped: u64,
    pub poses_published: u64,
    pub elapsed: Duration,
}

impl LoopStats {
    /// Average ticks per second over the last `run`
    #[allow(clippy::cast_precision_loss)] // Tick counts stay far below 2^52
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

/// The detect → transform → render loop
pub struct FrameLoop<S, D, C, R> {
    source: S,
    detector: D,
    surface: C,
    renderer: R,
    params: ParameterStore,
    control: LoopControl,
    anchors: AnchorIndices,
    stabilizer: ScaleStabilizer,
    smoother: Option<PoseSmoother>,
    options: LoopOptions,
    phase: LoopPhase,
    tracking: TrackingState,
    // Reused every tick
    candidate: PoseCandidate,
    markers: [Marker; 3],
    last_pose: Option<Pose>,
    stats: LoopStats,
    clock: Instant,
    last_timestamp_ms: f64,
}

impl<S, D, C, R> FrameLoop<S, D, C, R>
where
    S: FrameSource,
    D: LandmarkDetector,
    C: DrawingSurface,
    R: PoseRenderer,
{
    /// Create a loop over the given collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        source: S,
        detector: D,
        surface: C,
        renderer: R,
        params: ParameterStore,
        control: LoopControl,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        let anchors = AnchorIndices::default();
        anchors.validate(FACE_MESH_LANDMARK_COUNT)?;

        let smoother = config.create_smoother()?;
        if let Some(smoother) = &smoother {
            info!("Smoothing position and rotation with {}", smoother.name());
        }

        Ok(Self {
            source,
            detector,
            surface,
            renderer,
            params,
            control,
            anchors,
            stabilizer: ScaleStabilizer::new(config.stabilizer.threshold, config.stabilizer.initial_scale),
            smoother,
            options: LoopOptions::from(config),
            phase: LoopPhase::Idle,
            tracking: TrackingState::Starting,
            candidate: PoseCandidate::default(),
            markers: [Marker {
                x: 0.0,
                y: 0.0,
                radius: DEBUG_MARKER_RADIUS,
                color: [0, 0, 0],
            }; 3],
            last_pose: None,
            stats: LoopStats::default(),
            clock: Instant::now(),
            last_timestamp_ms: f64::NEG_INFINITY,
        })
    }

    /// Run ticks paced to the target refresh rate until stopped
    pub fn run(&mut self) -> &LoopStats {
        let interval = Duration::from_secs_f64(1.0 / f64::from(self.options.target_fps.max(1)));
        info!("Starting frame loop at {} fps", self.options.target_fps);

        let start = Instant::now();
        let mut next_tick = start;
        loop {
            if self.tick() == TickOutcome::Stopped {
                break;
            }

            // Never schedule another tick once a stop was requested
            if self.control.is_stopped() {
                self.phase = LoopPhase::Stopped;
                break;
            }

            next_tick += interval;
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            } else {
                // Running behind; do not try to catch up with a burst of ticks
                next_tick = now;
            }
        }

        self.stats.elapsed += start.elapsed();
        info!(
            "Frame loop stopped after {} ticks ({} with a face, {:.1} fps)",
            self.stats.ticks,
            self.stats.face_present,
            self.stats.fps()
        );
        &self.stats
    }

    /// Run a single tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.control.is_stopped() {
            self.phase = LoopPhase::Stopped;
            return TickOutcome::Stopped;
        }
        self.stats.ticks += 1;

        // Settings are read once per tick; later writes apply from the next one
        let params = self.params.get();

        let Some(frame) = self.source.latest_frame().filter(VideoFrame::has_content) else {
            return self.not_ready("video source");
        };
        if !self.surface.is_ready() {
            return self.not_ready("drawing surface");
        }

        if let Some(outcome) = self.check_tracking(&frame) {
            return outcome;
        }

        if !self.control.overlay_enabled() {
            self.surface.draw_frame(&frame);
            self.renderer.render(None);
            // History from before the toggle must not leak into the next pose
            if let Some(smoother) = &mut self.smoother {
                smoother.reset();
            }
            self.phase = LoopPhase::Idle;
            return TickOutcome::OverlayHidden;
        }

        self.phase = LoopPhase::Detecting;
        let timestamp_ms = self.next_timestamp_ms();
        let detection = self.detector.detect(&frame, timestamp_ms);

        if self.control.is_stopped() {
            debug!("Discarding detection at {timestamp_ms:.1} ms: loop stopped");
            self.phase = LoopPhase::Stopped;
            return TickOutcome::Stopped;
        }

        self.surface.draw_frame(&frame);

        let landmarks = match detection {
            Ok(landmarks) => landmarks,
            Err(Error::DetectorUnavailable(reason)) => {
                self.disable_tracking(reason);
                self.renderer.render(None);
                self.phase = LoopPhase::Idle;
                return TickOutcome::TrackingDisabled;
            }
            Err(e) => {
                warn!("Skipping pose update: {e}");
                self.stats.skipped += 1;
                self.phase = LoopPhase::Idle;
                return TickOutcome::Skipped;
            }
        };

        match self.anchors.extract(&landmarks) {
            Some(anchors) => {
                self.face_present(&anchors, &params);
                TickOutcome::FacePresent
            }
            None => {
                if !landmarks.is_empty() {
                    warn!(
                        "Detector returned {} landmarks, anchors need {}",
                        landmarks.len(),
                        self.anchors.required_len()
                    );
                }
                self.face_absent();
                TickOutcome::FaceAbsent
            }
        }
    }

    /// Drop the carried pose and return the scale to its initial value
    pub fn reset(&mut self) {
        self.last_pose = None;
        self.stabilizer.reset();
        if let Some(smoother) = &mut self.smoother {
            smoother.reset();
        }
    }

    /// Last pose published while a face was visible
    pub fn last_pose(&self) -> Option<&Pose> {
        self.last_pose.as_ref()
    }

    pub fn stabilized_scale(&self) -> f64 {
        self.stabilizer.current()
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn tracking_state(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn control(&self) -> &LoopControl {
        &self.control
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn not_ready(&mut self, what: &str) -> TickOutcome {
        debug!("{what} not ready, retrying next tick");
        self.stats.not_ready += 1;
        self.phase = LoopPhase::Idle;
        TickOutcome::NotReady
    }

    /// Gate on detector readiness. Returns the outcome when the tick must end here.
    fn check_tracking(&mut self, frame: &VideoFrame) -> Option<TickOutcome> {
        if matches!(self.tracking, TrackingState::Starting | TrackingState::Active) {
            match self.detector.status() {
                DetectorStatus::Loading => return Some(self.not_ready("detector")),
                DetectorStatus::Failed(reason) => self.disable_tracking(reason),
                DetectorStatus::Ready => {
                    if self.tracking == TrackingState::Starting {
                        info!("Detector ready, tracking started");
                        self.tracking = TrackingState::Active;
                    }
                }
            }
        }

        if matches!(self.tracking, TrackingState::Disabled(_)) {
            // Keep the video feed alive without tracking
            self.surface.draw_frame(frame);
            self.renderer.render(None);
            self.phase = LoopPhase::Idle;
            return Some(TickOutcome::TrackingDisabled);
        }
        None
    }

    fn disable_tracking(&mut self, reason: String) {
        if !matches!(self.tracking, TrackingState::Disabled(_)) {
            error!("Face tracking unavailable: {reason}");
            self.tracking = TrackingState::Disabled(reason);
        }
    }

    fn face_present(&mut self, anchors: &AnchorSet, params: &TransformParameters) {
        let (width, height) = self.surface.dimensions();
        estimate_pose_into(anchors, width, height, params, &mut self.candidate);

        let scale = self.stabilizer.update(self.candidate.scale);
        let mut pose = self.candidate.with_scale(scale);
        if let Some(smoother) = &mut self.smoother {
            smoother.apply(&mut pose.position, &mut pose.rotation);
        }

        debug!(
            "Pose at ({:.3}, {:.3}, {:.3}) roll {:.3} yaw {:.3} scale {:.3}",
            pose.position.x, pose.position.y, pose.position.z, pose.rotation.z, pose.rotation.y, pose.scale
        );
        self.renderer.render(Some(&pose));

        if self.options.debug_markers {
            self.fill_markers(anchors, width, height);
            self.surface.draw_markers(&self.markers);
            self.renderer.anchor_markers(&anchor_positions(anchors, params));
        }

        self.last_pose = Some(pose);
        self.stats.face_present += 1;
        self.stats.poses_published += 1;
        self.phase = LoopPhase::FacePresent;
    }

    fn face_absent(&mut self) {
        self.renderer.render(None);
        if self.options.face_loss_policy == FaceLossPolicy::Reset {
            self.stabilizer.reset();
        }
        if let Some(smoother) = &mut self.smoother {
            smoother.reset();
        }
        self.stats.face_absent += 1;
        self.phase = LoopPhase::FaceAbsent;
    }

    fn fill_markers(&mut self, anchors: &AnchorSet, width: u32, height: u32) {
        let points = [
            (anchors.left_eye, LEFT_EYE_COLOR),
            (anchors.right_eye, RIGHT_EYE_COLOR),
            (anchors.nose_bridge, NOSE_BRIDGE_COLOR),
        ];
        for (marker, (landmark, color)) in self.markers.iter_mut().zip(points) {
            let (x, y) = landmark.to_pixels(width, height);
            marker.x = x;
            marker.y = y;
            marker.color = color;
        }
    }

    /// Detector timestamps must increase strictly from tick to tick
    fn next_timestamp_ms(&mut self) -> f64 {
        let now = self.clock.elapsed().as_secs_f64() * 1000.0;
        let timestamp = now.max(self.last_timestamp_ms + MIN_TIMESTAMP_STEP_MS);
        self.last_timestamp_ms = timestamp;
        timestamp
    }
}
