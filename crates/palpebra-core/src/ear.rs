//! Eye Aspect Ratio (EAR) computation.
//!
//! EAR is a scalar derived from six eye-contour points: low when the eye is
//! closed, higher when open. It is the standard lightweight blink proxy —
//! no model inference, just three Euclidean distances per eye.

use crate::landmarks::EyeLandmarks;

/// Horizontal corner distances below this are treated as degenerate
/// geometry rather than divided by.
const DEGENERATE_WIDTH_EPSILON: f32 = 1e-6;

/// Compute the Eye Aspect Ratio for one eye.
///
/// ```text
/// A = dist(p1, p5)      upper/lower lid, outer pair
/// B = dist(p2, p4)      upper/lower lid, inner pair
/// C = dist(p0, p3)      horizontal corners
/// EAR = (A + B) / (2C)
/// ```
///
/// A zero-width landmark set (C below epsilon) means the points do not
/// describe an eye at all. Returns `f32::INFINITY` in that case — the value
/// reads as "eye fully open", so degenerate input can never accumulate
/// toward a blink.
pub fn eye_aspect_ratio(eye: &EyeLandmarks) -> f32 {
    let a = eye.point(1).distance(&eye.point(5));
    let b = eye.point(2).distance(&eye.point(4));
    let c = eye.point(0).distance(&eye.point(3));

    if c < DEGENERATE_WIDTH_EPSILON {
        return f32::INFINITY;
    }

    (a + b) / (2.0 * c)
}
