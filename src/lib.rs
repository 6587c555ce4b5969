pub use detection::{CaptureError, CaptureSession, Detector, CONFIDENCE_THRESHOLD};
pub use geometry::{Direction, Geometry, Point2d};
pub use render::{ConsoleRenderer, RenderFrame, Renderer, SignalView, VehicleView};
pub use signal::{Aspect, Phase, PhaseEvent, Signal, SignalController, SignalTimings};
pub use simulation::{RunSummary, Simulation, DEFAULT_SIM_TIME, FRAMES_PER_SECOND};
pub use slotmap::{Key, KeyData};
pub use snapshot::{BoundingBox, Detection, Snapshot, SnapshotError};
pub use vehicle::{Vehicle, VehicleClass};
pub use world::World;

use slotmap::{new_key_type, SlotMap};

mod detection;
mod geometry;
mod render;
mod signal;
mod simulation;
mod snapshot;
mod vehicle;
mod world;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
