//! Constants used throughout the engine

/// Number of landmarks in the face mesh topology with iris refinement
pub const FACE_MESH_LANDMARK_COUNT: usize = 478;

/// Left pupil centre in the face mesh topology
pub const LEFT_PUPIL_INDEX: usize = 468;

/// Right pupil centre in the face mesh topology
pub const RIGHT_PUPIL_INDEX: usize = 473;

/// Nose bridge point between the eyes
pub const NOSE_BRIDGE_INDEX: usize = 168;

/// Default transform coefficients
pub const DEFAULT_COORDINATE_FACTOR: f64 = 5.0;
pub const DEFAULT_HORIZONTAL_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_VERTICAL_SENSITIVITY: f64 = 0.7;
pub const DEFAULT_YAW_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_TILT_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_ROTATION_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_SCALE_DIVIDER: f64 = 20.0;
pub const DEFAULT_SCALE_MULTIPLIER: f64 = 5.0;

/// Minimum scale change that is published to the renderer
pub const SCALE_CHANGE_THRESHOLD: f64 = 0.05;

/// Scale shown before the first face is seen
pub const DEFAULT_INITIAL_SCALE: f64 = 1.0;

/// Display refresh rate the loop is paced to
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Radius of the anchor debug dots in pixels
pub const DEBUG_MARKER_RADIUS: u32 = 5;

/// Default filter parameters for optional channel smoothing
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;

/// Smallest step between consecutive detector timestamps in milliseconds
pub const MIN_TIMESTAMP_STEP_MS: f64 = 0.001;
