//! Palpebra core — EAR-based blink detection.
//!
//! The pipeline is deliberately thin: external backends locate eye regions
//! and produce six contour points per eye, and this crate turns that stream
//! of per-frame landmarks into blink events via the Eye Aspect Ratio and a
//! consecutive-closed-frame counter. No camera handling, no model
//! inference, no rendering — those live behind the traits in [`provider`].

pub mod ear;
pub mod geometry;
pub mod landmarks;
pub mod provider;
pub mod session;
pub mod tracker;

pub use ear::eye_aspect_ratio;
pub use geometry::{Point2, Rect};
pub use landmarks::{EyeLandmarks, EyePair, LandmarkError, EYE_POINT_COUNT};
pub use provider::{EyeRegionDetector, FaceRegion, GrayFrame, LandmarkProvider, ProviderError};
pub use session::{observe_fn, BlinkEvent, BlinkObserver, BlinkSession, SessionError, SessionStats};
pub use tracker::{BlinkConfig, BlinkTracker};
