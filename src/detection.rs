//! The detection collaborator contract and per-approach capture session.
//!
//! The model itself is a black box behind [Detector]: images in, labelled
//! boxes out. The confidence threshold, rounding, id assignment and
//! empty-image reporting all live on this side of the seam, so any
//! backend can be dropped in.

use crate::geometry::Direction;
use crate::snapshot::{Detection, Snapshot};
use log::warn;
use std::path::Path;
use thiserror::Error;

/// The confidence below which detections are discarded by the caller.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// An error from the detection collaborator.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The detection backend could not be reached or loaded.
    #[error("detector unavailable: {0}")]
    Unavailable(String),
    /// The backend failed on a particular image.
    #[error("detection failed: {0}")]
    Backend(String),
}

/// A pretrained detection model.
///
/// Implementations run inference on raw image bytes and return every
/// candidate detection; thresholding is applied by the caller.
pub trait Detector {
    fn detect(
        &mut self,
        image: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, CaptureError>;
}

/// Accumulates thresholded detections per approach and produces the
/// snapshot handed off to the simulation.
pub struct CaptureSession<D> {
    detector: D,
    snapshot: Snapshot,
}

impl<D: Detector> CaptureSession<D> {
    /// Creates a session around the given detection backend.
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            snapshot: Snapshot::default(),
        }
    }

    /// Runs detection on one uploaded image for the given approach.
    ///
    /// Detections below [CONFIDENCE_THRESHOLD] are discarded, confidences
    /// are rounded to 2 decimals and ids continue the approach's insertion
    /// order. Returns the number of detections kept; zero is not an error,
    /// but is reported so the uploader can flag the image.
    pub fn process_image(
        &mut self,
        direction: Direction,
        image: &[u8],
        width: u32,
        height: u32,
    ) -> Result<usize, CaptureError> {
        let raw = self.detector.detect(image, width, height)?;
        let records = self.snapshot.direction_mut(direction);
        let mut kept = 0;
        for detection in raw {
            if detection.confidence < CONFIDENCE_THRESHOLD {
                continue;
            }
            records.push(Detection {
                id: records.len(),
                confidence: (detection.confidence * 100.0).round() / 100.0,
                ..detection
            });
            kept += 1;
        }
        if kept == 0 {
            warn!("no vehicles detected in image for {}", direction.name());
        }
        Ok(kept)
    }

    /// Gets the detections accumulated so far.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Discards all accumulated detections.
    pub fn clear(&mut self) {
        self.snapshot = Snapshot::default();
    }

    /// Saves the accumulated detections for the simulation to pick up.
    pub fn save(&self, path: &Path) -> Result<(), crate::snapshot::SnapshotError> {
        self.snapshot.save(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::snapshot::BoundingBox;

    /// A detector that replays a fixed result per call.
    struct Canned(Vec<Vec<Detection>>);

    impl Detector for Canned {
        fn detect(
            &mut self,
            _image: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, CaptureError> {
            if self.0.is_empty() {
                return Err(CaptureError::Unavailable("no model".to_owned()));
            }
            Ok(self.0.remove(0))
        }
    }

    fn detection(class: &str, confidence: f64) -> Detection {
        Detection {
            id: 0,
            class: class.to_owned(),
            confidence,
            bbox: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 50.0,
                y2: 40.0,
            },
        }
    }

    #[test]
    fn threshold_and_rounding_are_applied() {
        let canned = Canned(vec![vec![
            detection("car", 0.923_4),
            detection("bike", 0.499_9),
            detection("bus", 0.5),
        ]]);
        let mut session = CaptureSession::new(canned);
        let kept = session
            .process_image(Direction::Right, &[], 640, 480)
            .unwrap();
        assert_eq!(kept, 2);

        let records = session.snapshot().direction(Direction::Right);
        assert_eq!(records[0].class, "car");
        assert_eq!(records[0].confidence, 0.92);
        assert_eq!(records[1].class, "bus");
    }

    #[test]
    fn ids_continue_across_images() {
        let canned = Canned(vec![
            vec![detection("car", 0.9)],
            vec![detection("truck", 0.8), detection("van", 0.7)],
        ]);
        let mut session = CaptureSession::new(canned);
        session.process_image(Direction::Left, &[], 640, 480).unwrap();
        session.process_image(Direction::Left, &[], 640, 480).unwrap();

        let ids: Vec<usize> = session
            .snapshot()
            .direction(Direction::Left)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn empty_image_is_reported_not_fatal() {
        let canned = Canned(vec![vec![detection("car", 0.2)], vec![detection("car", 0.8)]]);
        let mut session = CaptureSession::new(canned);
        assert_eq!(
            session.process_image(Direction::Up, &[], 640, 480).unwrap(),
            0
        );
        // Processing continues for the remaining images.
        assert_eq!(
            session.process_image(Direction::Up, &[], 640, 480).unwrap(),
            1
        );
    }

    #[test]
    fn unavailable_detector_surfaces_once() {
        let mut session = CaptureSession::new(Canned(vec![]));
        let err = session
            .process_image(Direction::Down, &[], 640, 480)
            .unwrap_err();
        assert!(matches!(err, CaptureError::Unavailable(_)));
        assert!(session.snapshot().is_empty());
    }
}
