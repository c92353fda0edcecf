//! Threshold gate that keeps the published scale from jittering.
//!
//! Only scale is gated. Small position and rotation noise is hidden by the
//! frame of the glasses, a changing size is not.

use crate::constants::{DEFAULT_INITIAL_SCALE, SCALE_CHANGE_THRESHOLD};
use log::trace;

/// Decide which scale to publish given the last published one.
///
/// The candidate replaces `previous` only if it differs by more than
/// `threshold`. Candidates that are not strictly positive and finite come from
/// degenerate geometry and never replace `previous`.
#[must_use]
pub fn stabilize(candidate: f64, previous: f64, threshold: f64) -> f64 {
    if !candidate.is_finite() || candidate <= 0.0 {
        return previous;
    }
    if (candidate - previous).abs() > threshold {
        candidate
    } else {
        previous
    }
}

/// Owner of the stabilized scale across frames
#[derive(Debug, Clone)]
pub struct ScaleStabilizer {
    threshold: f64,
    initial: f64,
    current: f64,
}

impl Default for ScaleStabilizer {
    fn default() -> Self {
        Self::new(SCALE_CHANGE_THRESHOLD, DEFAULT_INITIAL_SCALE)
    }
}

impl ScaleStabilizer {
    /// Create a stabilizer publishing `initial` until a face is seen
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is negative or `initial` is not positive
    #[must_use]
    pub fn new(threshold: f64, initial: f64) -> Self {
        assert!(threshold >= 0.0, "Threshold must be non-negative");
        assert!(initial > 0.0 && initial.is_finite(), "Initial scale must be positive");
        Self {
            threshold,
            initial,
            current: initial,
        }
    }

    /// Feed a candidate and return the scale to publish
    pub fn update(&mut self, candidate: f64) -> f64 {
        let next = stabilize(candidate, self.current, self.threshold);
        if next != self.current {
            trace!("Scale {:.3} -> {:.3}", self.current, next);
        }
        self.current = next;
        next
    }

    /// Last published scale
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Return to the initial scale
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
