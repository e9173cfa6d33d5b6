//! Per-session frame pipeline: region detection → landmark extraction →
//! blink tracking.
//!
//! The session owns one [`BlinkTracker`] and drives the external detector
//! and landmark provider once per delivered frame. Frames where no face or
//! no landmarks are found leave the tracker untouched: a detector dropout
//! mid-blink must neither reset nor extend the closed-eye run.

use std::sync::mpsc;

use thiserror::Error;

use crate::provider::{EyeRegionDetector, GrayFrame, LandmarkProvider, ProviderError};
use crate::tracker::{BlinkConfig, BlinkTracker};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("region detector error: {0}")]
    Detector(#[source] ProviderError),
    #[error("landmark provider error: {0}")]
    Landmarks(#[source] ProviderError),
}

/// Emitted once per completed blink, at most once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkEvent {
    /// Zero-based index of the frame on which the blink completed.
    pub frame_index: u64,
    /// Averaged EAR of the completing frame.
    pub ear: f32,
    /// Session blink total including this one.
    pub total_blinks: u64,
}

/// Receives blink events as they complete.
pub trait BlinkObserver {
    fn on_blink(&mut self, event: &BlinkEvent);
}

/// Channel flavor: any `mpsc::Sender<BlinkEvent>` is an observer. A closed
/// receiver drops events rather than failing the session.
impl BlinkObserver for mpsc::Sender<BlinkEvent> {
    fn on_blink(&mut self, event: &BlinkEvent) {
        let _ = self.send(event.clone());
    }
}

struct FnObserver<F>(F);

impl<F: FnMut(&BlinkEvent)> BlinkObserver for FnObserver<F> {
    fn on_blink(&mut self, event: &BlinkEvent) {
        (self.0)(event);
    }
}

/// Wrap a closure as a boxed observer.
pub fn observe_fn<F: FnMut(&BlinkEvent) + 'static>(f: F) -> Box<dyn BlinkObserver> {
    Box::new(FnObserver(f))
}

/// Counters accumulated over the life of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_processed: u64,
    /// Frames where no face was found or the provider produced no landmarks.
    pub frames_without_landmarks: u64,
    pub total_blinks: u64,
}

/// A blink-detection session over a serialized stream of frames.
///
/// Synchronous, single-threaded: the caller delivers one frame at a time,
/// the way a capture pipeline already serializes frame delivery. Created at
/// session start, dropped at session end; no state survives it.
pub struct BlinkSession<D, P> {
    detector: D,
    provider: P,
    tracker: BlinkTracker,
    frame_index: u64,
    frames_without_landmarks: u64,
    observers: Vec<Box<dyn BlinkObserver>>,
}

impl<D: EyeRegionDetector, P: LandmarkProvider> BlinkSession<D, P> {
    pub fn new(detector: D, provider: P, config: BlinkConfig) -> Self {
        Self {
            detector,
            provider,
            tracker: BlinkTracker::new(config),
            frame_index: 0,
            frames_without_landmarks: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of each completed blink.
    pub fn add_observer(&mut self, observer: Box<dyn BlinkObserver>) {
        self.observers.push(observer);
    }

    /// Process one frame end to end.
    ///
    /// Returns the blink event if this frame completed a blink, `None`
    /// otherwise. Backend failures abort the call without consuming a
    /// frame index.
    pub fn process(&mut self, frame: &GrayFrame) -> Result<Option<BlinkEvent>, SessionError> {
        let faces = self
            .detector
            .detect(frame)
            .map_err(SessionError::Detector)?;

        // First face with at least one eye region is the subject; the
        // original pipeline scans faces in detector order the same way.
        let face = faces.iter().find(|f| !f.eyes.is_empty());

        let pair = match face {
            Some(face) => self
                .provider
                .eye_landmarks(frame, face)
                .map_err(SessionError::Landmarks)?,
            None => None,
        };

        let index = self.frame_index;
        self.frame_index += 1;

        let Some(pair) = pair else {
            self.frames_without_landmarks += 1;
            tracing::trace!(frame = index, "no eye landmarks in frame");
            return Ok(None);
        };

        let blinked = self.tracker.process_landmarks(&pair.left, &pair.right);
        if !blinked {
            return Ok(None);
        }

        let event = BlinkEvent {
            frame_index: index,
            ear: BlinkTracker::averaged_ear(&pair.left, &pair.right),
            total_blinks: self.tracker.total_blinks(),
        };
        tracing::info!(
            frame = event.frame_index,
            ear = event.ear,
            total = event.total_blinks,
            "blink detected"
        );
        for obs in &mut self.observers {
            obs.on_blink(&event);
        }
        Ok(Some(event))
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            frames_processed: self.frame_index,
            frames_without_landmarks: self.frames_without_landmarks,
            total_blinks: self.tracker.total_blinks(),
        }
    }

    pub fn tracker(&self) -> &BlinkTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point2, Rect};
    use crate::landmarks::{EyeLandmarks, EyePair};
    use crate::provider::FaceRegion;

    /// Eye landmarks with EAR = lid / width.
    fn eye(lid: f32, width: f32) -> EyeLandmarks {
        let h = lid / 2.0;
        EyeLandmarks::new([
            Point2::new(0.0, 0.0),
            Point2::new(width / 3.0, h),
            Point2::new(2.0 * width / 3.0, h),
            Point2::new(width, 0.0),
            Point2::new(2.0 * width / 3.0, -h),
            Point2::new(width / 3.0, -h),
        ])
    }

    fn open_pair() -> EyePair {
        EyePair::new(eye(2.0, 2.0), eye(2.0, 2.0))
    }

    fn closed_pair() -> EyePair {
        EyePair::new(eye(0.2, 2.0), eye(0.2, 2.0))
    }

    fn blank_frame() -> GrayFrame {
        GrayFrame::new(vec![0u8; 16], 4, 4)
    }

    /// Detector that always reports one face with one eye region.
    struct AlwaysFace;

    impl EyeRegionDetector for AlwaysFace {
        fn detect(&mut self, _frame: &GrayFrame) -> Result<Vec<FaceRegion>, ProviderError> {
            Ok(vec![FaceRegion {
                bounds: Rect::new(0, 0, 4, 4),
                eyes: vec![Rect::new(1, 1, 1, 1)],
            }])
        }
    }

    /// Detector that never finds a face.
    struct NoFace;

    impl EyeRegionDetector for NoFace {
        fn detect(&mut self, _frame: &GrayFrame) -> Result<Vec<FaceRegion>, ProviderError> {
            Ok(Vec::new())
        }
    }

    /// Provider that replays a scripted sequence of per-frame outcomes.
    struct Scripted {
        outcomes: Vec<Option<EyePair>>,
        cursor: usize,
    }

    impl Scripted {
        fn new(outcomes: Vec<Option<EyePair>>) -> Self {
            Self {
                outcomes,
                cursor: 0,
            }
        }
    }

    impl LandmarkProvider for Scripted {
        fn eye_landmarks(
            &mut self,
            _frame: &GrayFrame,
            _face: &FaceRegion,
        ) -> Result<Option<EyePair>, ProviderError> {
            let out = self.outcomes[self.cursor];
            self.cursor += 1;
            Ok(out)
        }
    }

    fn config(min_frames: u32) -> BlinkConfig {
        BlinkConfig {
            ear_threshold: 0.25,
            min_consecutive_frames: min_frames,
        }
    }

    #[test]
    fn test_blink_event_on_completing_frame() {
        let provider = Scripted::new(vec![
            Some(open_pair()),
            Some(closed_pair()),
            Some(closed_pair()),
        ]);
        let mut session = BlinkSession::new(AlwaysFace, provider, config(2));

        assert!(session.process(&blank_frame()).unwrap().is_none());
        assert!(session.process(&blank_frame()).unwrap().is_none());
        let event = session.process(&blank_frame()).unwrap().expect("blink");
        assert_eq!(event.frame_index, 2);
        assert_eq!(event.total_blinks, 1);
        assert!(event.ear < 0.25);
    }

    #[test]
    fn test_no_face_frames_leave_run_intact() {
        // Closed, dropout (no landmarks), closed: the dropout frame must
        // not reset the run, so the blink completes on the third delivery.
        let provider = Scripted::new(vec![
            Some(closed_pair()),
            None,
            Some(closed_pair()),
        ]);
        let mut session = BlinkSession::new(AlwaysFace, provider, config(2));

        assert!(session.process(&blank_frame()).unwrap().is_none());
        assert!(session.process(&blank_frame()).unwrap().is_none());
        let event = session.process(&blank_frame()).unwrap().expect("blink");
        assert_eq!(event.total_blinks, 1);

        let stats = session.stats();
        assert_eq!(stats.frames_processed, 3);
        assert_eq!(stats.frames_without_landmarks, 1);
    }

    #[test]
    fn test_detector_without_face_skips_provider() {
        // Scripted provider would panic past its script; NoFace means it is
        // never consulted.
        let provider = Scripted::new(vec![]);
        let mut session = BlinkSession::new(NoFace, provider, config(1));

        for _ in 0..4 {
            assert!(session.process(&blank_frame()).unwrap().is_none());
        }
        let stats = session.stats();
        assert_eq!(stats.frames_without_landmarks, 4);
        assert_eq!(stats.total_blinks, 0);
    }

    #[test]
    fn test_observers_called_once_per_blink() {
        let provider = Scripted::new(vec![
            Some(closed_pair()),
            Some(closed_pair()),
            Some(closed_pair()),
            Some(open_pair()),
        ]);
        let mut session = BlinkSession::new(AlwaysFace, provider, config(2));

        let (tx, rx) = mpsc::channel();
        session.add_observer(Box::new(tx));

        for _ in 0..4 {
            session.process(&blank_frame()).unwrap();
        }

        let events: Vec<BlinkEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame_index, 1);
    }

    #[test]
    fn test_closure_observer() {
        let provider = Scripted::new(vec![Some(closed_pair())]);
        let mut session = BlinkSession::new(AlwaysFace, provider, config(1));

        let (tx, rx) = mpsc::channel();
        session.add_observer(observe_fn(move |e: &BlinkEvent| {
            let _ = tx.send(e.total_blinks);
        }));

        session.process(&blank_frame()).unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_detector_error_propagates() {
        struct Failing;
        impl EyeRegionDetector for Failing {
            fn detect(&mut self, _: &GrayFrame) -> Result<Vec<FaceRegion>, ProviderError> {
                Err(ProviderError::Backend("cascade not loaded".into()))
            }
        }

        let provider = Scripted::new(vec![]);
        let mut session = BlinkSession::new(Failing, provider, config(1));
        let err = session.process(&blank_frame()).unwrap_err();
        assert!(matches!(err, SessionError::Detector(_)));
        // Failed call consumed no frame index
        assert_eq!(session.stats().frames_processed, 0);
    }
}
