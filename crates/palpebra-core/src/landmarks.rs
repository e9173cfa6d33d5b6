//! Validated eye landmark types.
//!
//! One eye is described by exactly 6 contour points in a fixed anatomical
//! order (the dlib 68-point convention restricted to one eye):
//!
//! ```text
//!        p1   p2
//!   p0             p3
//!        p5   p4
//! ```
//!
//! Points 0 and 3 are the horizontal corners; (1,5) and (2,4) are the
//! upper/lower lid pairs used for the vertical distances of the EAR formula.

use thiserror::Error;

use crate::geometry::Point2;

/// Number of contour points per eye.
pub const EYE_POINT_COUNT: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("eye landmark set must contain exactly {expected} points, got {got}")]
    InvalidPointCount { expected: usize, got: usize },
}

/// An ordered set of 6 contour points for one eye in a single frame.
///
/// Construction validates the point count; a wrong-sized slice is a caller
/// contract violation and fails fast without producing a usable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks {
    points: [Point2; EYE_POINT_COUNT],
}

impl EyeLandmarks {
    pub fn new(points: [Point2; EYE_POINT_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice, rejecting anything but exactly 6 points.
    pub fn from_slice(points: &[Point2]) -> Result<Self, LandmarkError> {
        let points: [Point2; EYE_POINT_COUNT] =
            points
                .try_into()
                .map_err(|_| LandmarkError::InvalidPointCount {
                    expected: EYE_POINT_COUNT,
                    got: points.len(),
                })?;
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Point2 {
        self.points[index]
    }

    pub fn points(&self) -> &[Point2; EYE_POINT_COUNT] {
        &self.points
    }
}

/// Left and right eye landmarks for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePair {
    pub left: EyeLandmarks,
    pub right: EyeLandmarks,
}

impl EyePair {
    pub fn new(left: EyeLandmarks, right: EyeLandmarks) -> Self {
        Self { left, right }
    }
}
