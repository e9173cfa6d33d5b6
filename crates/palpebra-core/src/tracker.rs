//! Blink detection state machine.
//!
//! A blink is a run of consecutive frames whose averaged EAR stays below a
//! threshold. The tracker keeps two counters: the current closed-run length
//! and the total number of completed blinks. It reports a blink exactly once,
//! on the frame where the run first reaches the configured minimum — frames
//! where the eye simply stays closed afterwards report nothing, and the run
//! only re-arms once the EAR rises back to or above the threshold.

use crate::ear::eye_aspect_ratio;
use crate::geometry::Point2;
use crate::landmarks::{EyeLandmarks, LandmarkError};

/// Tracker configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkConfig {
    /// Averaged EAR below this value counts as a closed-eye frame.
    pub ear_threshold: f32,
    /// Closed-eye frames that must accumulate without interruption before
    /// a blink is reported. Zero is normalized to 1.
    pub min_consecutive_frames: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            min_consecutive_frames: 3,
        }
    }
}

/// Per-session blink tracker.
///
/// Single-threaded, call-and-return: the caller serializes frame delivery
/// (one `process_frame` in flight at a time). State lives for the session;
/// there is no persistence.
#[derive(Debug)]
pub struct BlinkTracker {
    config: BlinkConfig,
    /// Length of the current closed-eye run, saturating at
    /// `min_consecutive_frames`.
    closed_run: u32,
    /// Completed blinks this session. Never decreases.
    total_blinks: u64,
}

impl BlinkTracker {
    pub fn new(mut config: BlinkConfig) -> Self {
        if config.min_consecutive_frames == 0 {
            config.min_consecutive_frames = 1;
        }
        Self {
            config,
            closed_run: 0,
            total_blinks: 0,
        }
    }

    /// Process one frame of eye landmarks and report whether a blink has
    /// just completed.
    ///
    /// Each slice must contain exactly 6 points in the anatomical order of
    /// [`EyeLandmarks`](crate::landmarks::EyeLandmarks). A wrong point count
    /// is rejected before any counter is touched.
    ///
    /// Returns `Ok(true)` exactly on the frame where the consecutive
    /// closed-eye run first reaches `min_consecutive_frames`; `Ok(false)`
    /// otherwise.
    pub fn process_frame(
        &mut self,
        left: &[Point2],
        right: &[Point2],
    ) -> Result<bool, LandmarkError> {
        // Validate both eyes before mutating any state.
        let left = EyeLandmarks::from_slice(left)?;
        let right = EyeLandmarks::from_slice(right)?;
        Ok(self.process_landmarks(&left, &right))
    }

    /// Infallible variant for callers that already hold validated landmarks.
    pub fn process_landmarks(&mut self, left: &EyeLandmarks, right: &EyeLandmarks) -> bool {
        let ear_left = eye_aspect_ratio(left);
        let ear_right = eye_aspect_ratio(right);
        // One degenerate eye makes the average infinite, i.e. "open" —
        // undetectable geometry never accumulates toward a blink.
        let ear = (ear_left + ear_right) / 2.0;

        if ear < self.config.ear_threshold {
            if self.closed_run < self.config.min_consecutive_frames {
                self.closed_run += 1;
                if self.closed_run == self.config.min_consecutive_frames {
                    self.total_blinks += 1;
                    tracing::debug!(
                        ear,
                        total_blinks = self.total_blinks,
                        "blink completed"
                    );
                    return true;
                }
            }
            // Eye held closed past the minimum: run stays saturated,
            // nothing further to report until it reopens.
        } else {
            if self.closed_run > 0 {
                tracing::trace!(ear, run = self.closed_run, "closed run interrupted");
            }
            self.closed_run = 0;
        }

        false
    }

    /// Averaged EAR for a pair of eyes, as used by the threshold test.
    pub fn averaged_ear(left: &EyeLandmarks, right: &EyeLandmarks) -> f32 {
        (eye_aspect_ratio(left) + eye_aspect_ratio(right)) / 2.0
    }

    /// Completed blinks this session.
    pub fn total_blinks(&self) -> u64 {
        self.total_blinks
    }

    /// Length of the current closed-eye run.
    pub fn closed_run(&self) -> u32 {
        self.closed_run
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }

    /// Clear both counters for a fresh session.
    pub fn reset(&mut self) {
        self.closed_run = 0;
        self.total_blinks = 0;
    }
}
