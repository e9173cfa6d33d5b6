//! External collaborator interfaces.
//!
//! The blink core performs no detection of its own. Face/eye regions and
//! eye contour landmarks come from pluggable backends — a cascade
//! classifier, a landmark model, or a scripted fake in tests. These traits
//! define the contract those backends must meet.

use thiserror::Error;

use crate::geometry::Rect;
use crate::landmarks::EyePair;

/// A single-channel (grayscale) image buffer, row-major, one byte per pixel.
#[derive(Debug, Clone)]
pub struct GrayFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl GrayFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            data,
            width,
            height,
        }
    }
}

/// A detected face with the eye regions found inside it.
#[derive(Debug, Clone)]
pub struct FaceRegion {
    /// Face bounding box in frame coordinates.
    pub bounds: Rect,
    /// Eye bounding boxes in frame coordinates, possibly empty.
    pub eyes: Vec<Rect>,
}

/// Backend failure while detecting regions or extracting landmarks.
///
/// These are runtime failures of an external capability (classifier
/// invocation, model inference), not malformed-geometry conditions — those
/// are covered by [`LandmarkError`](crate::landmarks::LandmarkError).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("detection backend failure: {0}")]
    Backend(String),
}

/// Locates faces and the eye regions inside them in a grayscale frame.
///
/// In production this wraps a pretrained cascade classifier; the core only
/// uses it to decide whether landmark extraction is worth attempting.
pub trait EyeRegionDetector {
    fn detect(&mut self, frame: &GrayFrame) -> Result<Vec<FaceRegion>, ProviderError>;
}

/// Produces six ordered contour points per eye for a detected face.
///
/// Returns `Ok(None)` when no usable landmarks can be extracted from this
/// frame — a normal per-frame outcome, not an error.
pub trait LandmarkProvider {
    fn eye_landmarks(
        &mut self,
        frame: &GrayFrame,
        face: &FaceRegion,
    ) -> Result<Option<EyePair>, ProviderError>;
}
