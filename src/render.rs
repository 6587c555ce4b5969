//! The presentation seam.
//!
//! The core never touches imagery. A renderer gets a [RenderFrame] holding
//! sprite anchors, footprints, signal aspects and caption text, and draws
//! it with whatever toolkit it likes. [ConsoleRenderer] is the headless
//! stand-in used by the binary.

use crate::geometry::{Direction, Point2d, NUM_DIRECTIONS};
use crate::signal::Aspect;
use crate::vehicle::VehicleClass;
use crate::world::World;
use log::debug;

/// What a renderer needs to draw one signal.
#[derive(Clone, Debug)]
pub struct SignalView {
    /// The displayed colour.
    pub aspect: Aspect,
    /// The countdown caption beside the signal.
    pub caption: String,
}

/// What a renderer needs to draw one vehicle.
#[derive(Clone, Copy, Debug)]
pub struct VehicleView {
    /// The vehicle class, selecting the sprite.
    pub class: VehicleClass,
    /// The approach, selecting the sprite rotation.
    pub direction: Direction,
    /// The sprite anchor (top-left corner), in px.
    pub position: Point2d,
    /// The sprite footprint (length along travel, width across), in px.
    pub footprint: (f64, f64),
}

/// A drawable view of the world at one instant.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    /// Simulated seconds elapsed.
    pub elapsed: u32,
    /// The four signals, in signal order.
    pub signals: [SignalView; NUM_DIRECTIONS],
    /// Every vehicle in the world.
    pub vehicles: Vec<VehicleView>,
    /// The crossed counters shown beside each signal.
    pub crossed: [u32; NUM_DIRECTIONS],
}

impl RenderFrame {
    /// Captures a drawable view of the world.
    pub fn capture(world: &World, elapsed: u32) -> Self {
        let controller = world.controller();
        let signals = std::array::from_fn(|index| SignalView {
            aspect: controller.aspect(index),
            caption: controller.caption(index),
        });
        let vehicles = world
            .iter_vehicles()
            .map(|vehicle| VehicleView {
                class: vehicle.class(),
                direction: vehicle.direction(),
                position: vehicle.position(),
                footprint: (vehicle.class().length(), vehicle.class().width()),
            })
            .collect();
        let crossed = Direction::ALL.map(|direction| world.crossed(direction));
        Self {
            elapsed,
            signals,
            vehicles,
            crossed,
        }
    }
}

/// Consumes render frames; purely presentational.
pub trait Renderer {
    fn present(&mut self, frame: &RenderFrame);
}

/// Logs the per-second signal status lines instead of drawing.
#[derive(Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn present(&mut self, frame: &RenderFrame) {
        for (index, signal) in frame.signals.iter().enumerate() {
            debug!(
                "t={:>3} TS{} {:?} [{}] crossed: {}",
                frame.elapsed,
                index + 1,
                signal.aspect,
                signal.caption,
                frame.crossed[index]
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Geometry;
    use crate::signal::SignalTimings;

    #[test]
    fn frame_reflects_world() {
        let mut world = World::new(SignalTimings::default(), Geometry::default());
        world.spawn(VehicleClass::Bike, Direction::Left, 1, false);

        let frame = RenderFrame::capture(&world, 7);
        assert_eq!(frame.elapsed, 7);
        assert_eq!(frame.vehicles.len(), 1);
        assert_eq!(frame.vehicles[0].footprint, (25.0, 15.0));
        assert_eq!(frame.signals[0].aspect, Aspect::Green);
        assert_eq!(frame.signals[2].aspect, Aspect::Red);
    }
}
