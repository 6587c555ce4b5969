//! The fixed pixel geometry of the intersection.

use serde::{Deserialize, Serialize};

/// A point in screen space, in px.
pub type Point2d = cgmath::Point2<f64>;

/// The number of approach directions.
pub const NUM_DIRECTIONS: usize = 4;

/// The number of lanes per approach.
pub const NUM_LANES: usize = 3;

/// One of the four cardinal approaches to the intersection,
/// named for the vehicles' direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All directions, in signal order.
    pub const ALL: [Direction; NUM_DIRECTIONS] =
        [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    /// Gets the signal index of the direction.
    pub fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Gets the direction with the given signal index.
    pub fn from_index(index: usize) -> Option<Direction> {
        Direction::ALL.get(index).copied()
    }

    /// Gets the lowercase name used in snapshot files.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Up => "up",
        }
    }

    /// Whether travel is along the x axis.
    pub(crate) fn horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// The sign of travel along the axis; +1 for right/down, -1 for left/up.
    pub(crate) fn sign(self) -> f64 {
        match self {
            Direction::Right | Direction::Down => 1.0,
            Direction::Left | Direction::Up => -1.0,
        }
    }

    /// Projects a point onto the direction's travel axis.
    pub(crate) fn axis(self, point: Point2d) -> f64 {
        if self.horizontal() {
            point.x
        } else {
            point.y
        }
    }
}

/// The pixel layout of the simulated intersection, sized for
/// a 1400x800 backdrop.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// The stop line coordinate for each direction, on its travel axis.
    stop_lines: [f64; NUM_DIRECTIONS],
    /// The default stop threshold for each direction, just short of the stop line.
    default_stops: [f64; NUM_DIRECTIONS],
    /// The spawn origin of each direction/lane, as a sprite anchor (top-left).
    spawns: [[Point2d; NUM_LANES]; NUM_DIRECTIONS],
    /// The spacing reserved behind a queued vehicle, in px.
    pub queue_gap: f64,
    /// The minimum gap kept behind a moving predecessor, in px.
    pub moving_gap: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            stop_lines: [590.0, 330.0, 800.0, 535.0],
            default_stops: [580.0, 320.0, 810.0, 545.0],
            spawns: [
                [
                    Point2d::new(0.0, 348.0),
                    Point2d::new(0.0, 370.0),
                    Point2d::new(0.0, 398.0),
                ],
                [
                    Point2d::new(755.0, 0.0),
                    Point2d::new(727.0, 0.0),
                    Point2d::new(697.0, 0.0),
                ],
                [
                    Point2d::new(1400.0, 498.0),
                    Point2d::new(1400.0, 466.0),
                    Point2d::new(1400.0, 436.0),
                ],
                [
                    Point2d::new(602.0, 800.0),
                    Point2d::new(627.0, 800.0),
                    Point2d::new(657.0, 800.0),
                ],
            ],
            queue_gap: 15.0,
            moving_gap: 15.0,
        }
    }
}

impl Geometry {
    /// Gets the stop line coordinate for the direction, on its travel axis.
    pub fn stop_line(&self, direction: Direction) -> f64 {
        self.stop_lines[direction.index()]
    }

    /// Gets the default stop threshold for the direction.
    pub fn default_stop(&self, direction: Direction) -> f64 {
        self.default_stops[direction.index()]
    }

    /// Gets the spawn origin for the given direction and lane.
    pub fn spawn(&self, direction: Direction, lane: usize) -> Point2d {
        self.spawns[direction.index()][lane]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn direction_indices_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_index(direction.index()), Some(direction));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn default_stop_precedes_stop_line() {
        let geometry = Geometry::default();
        for direction in Direction::ALL {
            let sign = direction.sign();
            let stop = sign * geometry.default_stop(direction);
            let line = sign * geometry.stop_line(direction);
            assert!(stop < line, "{}", direction.name());
        }
    }
}
