//! The detection snapshot file shared between capture and simulation.
//!
//! The snapshot is a JSON object keyed by the four direction names, each
//! holding the detection records for images uploaded for that approach.
//! It is the only hand-off between the two processes: capture writes it
//! atomically, the simulation reads it once at startup.

use crate::geometry::Direction;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// An axis-aligned bounding box in image coordinates,
/// with `x1 < x2` and `y1 < y2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Gets the width of the box.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Gets the height of the box.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// A single detection produced by the detection collaborator.
/// Immutable once written to a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The insertion index within the direction; informational.
    #[serde(default)]
    pub id: usize,
    /// The class label reported by the model.
    pub class: String,
    /// The model confidence, rounded to 2 decimals.
    pub confidence: f64,
    /// The detected bounding box.
    pub bbox: BoundingBox,
}

/// An error reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The detections captured for each approach, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub right: Vec<Detection>,
    #[serde(default)]
    pub down: Vec<Detection>,
    #[serde(default)]
    pub left: Vec<Detection>,
    #[serde(default)]
    pub up: Vec<Detection>,
}

impl Snapshot {
    /// Gets the detections for the given approach.
    pub fn direction(&self, direction: Direction) -> &[Detection] {
        match direction {
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Up => &self.up,
        }
    }

    /// Gets the detections for the given approach, mutably.
    pub fn direction_mut(&mut self, direction: Direction) -> &mut Vec<Detection> {
        match direction {
            Direction::Right => &mut self.right,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Up => &mut self.up,
        }
    }

    /// Gets the total number of detections across all approaches.
    pub fn len(&self) -> usize {
        Direction::ALL
            .iter()
            .map(|d| self.direction(*d).len())
            .sum()
    }

    /// Whether the snapshot holds no detections.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a snapshot from the given path.
    pub fn load(path: &Path) -> Result<Snapshot, SnapshotError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Reads a snapshot, treating any failure as an empty snapshot.
    ///
    /// A missing file just means capture has not run yet; a corrupt file
    /// is logged and ignored. Neither is fatal to the simulation.
    pub fn load_or_empty(path: &Path) -> Snapshot {
        match Snapshot::load(path) {
            Ok(snapshot) => snapshot,
            Err(SnapshotError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "no snapshot at {}; starting with no seeded vehicles",
                    path.display()
                );
                Snapshot::default()
            }
            Err(err) => {
                warn!(
                    "ignoring unreadable snapshot {}: {}",
                    path.display(),
                    err
                );
                Snapshot::default()
            }
        }
    }

    /// Writes the snapshot to the given path atomically.
    ///
    /// The content lands in a temporary sibling first and is renamed into
    /// place, so a reader never observes a partial write.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let content = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);
        fs::write(tmp, content)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}
