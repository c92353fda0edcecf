//! Landmark-to-pose engine for virtual glasses try-on.
//!
//! The library turns the facial landmarks of a tracked face into a 3D pose for
//! a glasses model and drives the per-frame loop around it:
//! - Three anchors (both pupils and the nose bridge) are picked from the mesh
//! - Anchors are mapped into renderer space with live-tunable coefficients
//! - Eye distance gives the scale, which is stabilized against jitter
//! - Eye-line tilt gives roll, the depth difference between the eyes gives yaw
//!
//! Video capture, landmark detection and 3D rendering stay outside the crate,
//! behind the traits in [`interfaces`].
//!
//! # Examples
//!
//! ## Estimating a pose
//!
//! ```
//! use glasses_tryon::{
//!     landmarks::{AnchorSet, Landmark},
//!     parameters::TransformParameters,
//!     pose_estimation::estimate_pose,
//!     stabilizer::ScaleStabilizer,
//! };
//!
//! let anchors = AnchorSet {
//!     left_eye: Landmark::new(0.4, 0.5, 0.0),
//!     right_eye: Landmark::new(0.6, 0.5, 0.0),
//!     nose_bridge: Landmark::new(0.5, 0.45, 0.0),
//! };
//! let params = TransformParameters::default();
//!
//! let candidate = estimate_pose(&anchors, 640, 480, &params);
//! let mut stabilizer = ScaleStabilizer::default();
//! let pose = candidate.with_scale(stabilizer.update(candidate.scale));
//! assert!((pose.scale - 32.0).abs() < 1e-9);
//! ```
//!
//! ## Tuning at runtime
//!
//! ```
//! use glasses_tryon::parameters::{ParameterStore, ParameterUpdate};
//!
//! # fn main() -> glasses_tryon::Result<()> {
//! let store = ParameterStore::default();
//! store.set(&ParameterUpdate::parse_assignment("scaleMultiplier=10")?)?;
//! assert_eq!(store.get().scale_multiplier, 10.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying a synthetic face
//!
//! ```no_run
//! use glasses_tryon::{
//!     config::Config,
//!     frame_loop::{FrameLoop, LoopControl},
//!     parameters::ParameterStore,
//!     playback::{LogRenderer, PlaybackSource, SyntheticFace},
//!     surface::ImageSurface,
//! };
//!
//! # fn main() -> glasses_tryon::Result<()> {
//! let config = Config::default();
//! let control = LoopControl::default();
//! let mut frame_loop = FrameLoop::new(
//!     PlaybackSource::new(640, 480, 120, control.clone()),
//!     SyntheticFace::new(42, 0.002),
//!     ImageSurface::with_size(640, 480),
//!     LogRenderer::new(),
//!     ParameterStore::new(config.transform)?,
//!     control,
//!     &config,
//! )?;
//! let stats = frame_loop.run();
//! println!("{} poses published", stats.poses_published);
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

/// Facial landmarks and anchor extraction
pub mod landmarks;

/// Live-tunable transform coefficients
pub mod parameters;

/// Landmark to renderer-space coordinate mapping
pub mod coordinate_mapper;

/// Pose estimation from the three anchors
pub mod pose_estimation;

/// Threshold gate for the scale channel
pub mod stabilizer;

/// Signal filters for optional position and rotation smoothing
pub mod filters;

/// Traits for capture, detection, drawing and rendering
pub mod interfaces;

/// In-memory drawing surface
pub mod surface;

/// Per-frame detect and render loop
pub mod frame_loop;

/// Trace and synthetic replay collaborators
pub mod playback;

/// Numeric helpers for pixel coordinates
pub mod utils;

pub use error::{Error, Result};
