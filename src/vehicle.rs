//! Simulated vehicles and their per-frame motion rule.

use crate::geometry::{Direction, Point2d};
use crate::VehicleId;
use serde::{Deserialize, Serialize};

/// The class of a simulated vehicle.
///
/// The class fixes the vehicle's speed and footprint; the core carries no
/// imagery, so the footprint stands in for the sprite a renderer would draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Bus,
    Truck,
    Van,
    Bike,
}

impl VehicleClass {
    /// Parses a detection label into a class.
    ///
    /// Two-wheeler labels fold into [VehicleClass::Bike]; anything
    /// unrecognised is treated as a car.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "bus" => VehicleClass::Bus,
            "truck" => VehicleClass::Truck,
            "van" => VehicleClass::Van,
            "bike" | "motorbike" | "bicycle" => VehicleClass::Bike,
            _ => VehicleClass::Car,
        }
    }

    /// Gets the lowercase name of the class.
    pub fn name(self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
            VehicleClass::Van => "van",
            VehicleClass::Bike => "bike",
        }
    }

    /// The distance travelled per frame, in px.
    pub fn speed(self) -> f64 {
        match self {
            VehicleClass::Car => 2.25,
            VehicleClass::Bus => 1.8,
            VehicleClass::Truck => 1.8,
            VehicleClass::Van => 2.0,
            VehicleClass::Bike => 2.5,
        }
    }

    /// The footprint extent along the direction of travel, in px.
    pub fn length(self) -> f64 {
        match self {
            VehicleClass::Car => 45.0,
            VehicleClass::Bus => 60.0,
            VehicleClass::Truck => 60.0,
            VehicleClass::Van => 50.0,
            VehicleClass::Bike => 25.0,
        }
    }

    /// The footprint extent across the direction of travel, in px.
    pub fn width(self) -> f64 {
        match self {
            VehicleClass::Car => 25.0,
            VehicleClass::Bus => 28.0,
            VehicleClass::Truck => 28.0,
            VehicleClass::Van => 26.0,
            VehicleClass::Bike => 15.0,
        }
    }
}

/// A simulated vehicle.
///
/// Vehicles are created once, at seeding time, and never destroyed; a
/// vehicle that has crossed the intersection keeps driving off-screen.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    pub(crate) id: VehicleId,
    /// The vehicle class.
    class: VehicleClass,
    /// The approach the vehicle travels along.
    direction: Direction,
    /// The lane within the approach, 0-2.
    lane: usize,
    /// The insertion index within the lane queue.
    index: usize,
    /// The sprite anchor (top-left corner), in px.
    pos: Point2d,
    /// The distance travelled per frame, in px.
    speed: f64,
    /// The travel-axis coordinate at which the vehicle halts while queued.
    stop: f64,
    /// Whether the vehicle has passed the stop line; monotonic.
    crossed: bool,
    /// Recorded turn intent. No motion rule consumes this; see DESIGN.md.
    will_turn: bool,
}

impl Vehicle {
    pub(crate) fn new(
        id: VehicleId,
        class: VehicleClass,
        direction: Direction,
        lane: usize,
        index: usize,
        pos: Point2d,
        stop: f64,
        will_turn: bool,
    ) -> Self {
        Self {
            id,
            class,
            direction,
            lane,
            index,
            pos,
            speed: class.speed(),
            stop,
            crossed: false,
            will_turn,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Gets the vehicle class.
    pub fn class(&self) -> VehicleClass {
        self.class
    }

    /// Gets the approach the vehicle travels along.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Gets the lane within the approach.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Gets the insertion index within the lane queue.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets the sprite anchor (top-left corner), in px.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// Gets the stop threshold on the travel axis.
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Whether the vehicle has passed the stop line.
    pub fn has_crossed(&self) -> bool {
        self.crossed
    }

    /// Whether the vehicle intends to turn at the intersection.
    pub fn will_turn(&self) -> bool {
        self.will_turn
    }

    /// The vehicle's leading edge on the travel axis.
    ///
    /// The anchor is the top-left corner, so the leading edge is offset by
    /// the footprint length only when travelling right or down.
    pub fn front_edge(&self) -> f64 {
        let anchor = self.direction.axis(self.pos);
        if self.direction.sign() > 0.0 {
            anchor + self.class.length()
        } else {
            anchor
        }
    }

    /// The vehicle's trailing edge on the travel axis.
    pub fn rear_edge(&self) -> f64 {
        let anchor = self.direction.axis(self.pos);
        if self.direction.sign() > 0.0 {
            anchor
        } else {
            anchor + self.class.length()
        }
    }

    pub(crate) fn set_stop(&mut self, stop: f64) {
        self.stop = stop;
    }

    /// Advances the vehicle by one frame.
    ///
    /// The vehicle moves by its speed iff it is short of its stop threshold,
    /// has already crossed, or its approach is being served green; and, when
    /// it has a predecessor in its lane, it keeps `gap` clear of the
    /// predecessor's trailing edge. Returns `true` iff the vehicle passed
    /// the stop line this frame.
    ///
    /// # Parameters
    /// * `stop_line` - The stop line coordinate for the vehicle's approach
    /// * `go` - Whether the approach is currently served green
    /// * `prev_rear` - The predecessor's trailing edge, updated this frame
    /// * `gap` - The minimum moving gap in px
    pub(crate) fn step(
        &mut self,
        stop_line: f64,
        go: bool,
        prev_rear: Option<f64>,
        gap: f64,
    ) -> bool {
        let sign = self.direction.sign();
        let mut crossed_now = false;

        if !self.crossed && sign * self.front_edge() > sign * stop_line {
            self.crossed = true;
            crossed_now = true;
        }

        let may_proceed =
            sign * self.front_edge() <= sign * self.stop || self.crossed || go;
        let clear = match prev_rear {
            Some(rear) => sign * self.front_edge() < sign * rear - gap,
            None => true,
        };

        if may_proceed && clear {
            if self.direction.horizontal() {
                self.pos.x += sign * self.speed;
            } else {
                self.pos.y += sign * self.speed;
            }
        }
        crossed_now
    }
}
