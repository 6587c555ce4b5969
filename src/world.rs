//! The simulation world: signals, vehicles and lane queues.

use crate::geometry::{Direction, Geometry, Point2d, NUM_DIRECTIONS, NUM_LANES};
use crate::signal::{PhaseEvent, SignalController, SignalTimings};
use crate::snapshot::Snapshot;
use crate::vehicle::{Vehicle, VehicleClass};
use crate::{VehicleId, VehicleSet};
use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

/// One lane of an approach: its vehicle queue in insertion order and the
/// spawn origin for the next vehicle, which recedes as the queue grows.
#[derive(Clone, Debug)]
struct Lane {
    queue: SmallVec<[VehicleId; 8]>,
    spawn: Point2d,
}

/// The complete state of the intersection.
///
/// The world owns everything the two periodic ticks mutate: the signal
/// controller, the vehicle registry and the per-lane queues. There is no
/// ambient state; both ticks are plain methods.
pub struct World {
    /// The signal controller.
    controller: SignalController,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The lane queues, indexed by direction then lane.
    lanes: [[Lane; NUM_LANES]; NUM_DIRECTIONS],
    /// The number of vehicles that have crossed, per direction.
    crossed: [u32; NUM_DIRECTIONS],
    /// The pixel layout of the intersection.
    geometry: Geometry,
}

impl World {
    /// Creates an empty world.
    pub fn new(timings: SignalTimings, geometry: Geometry) -> Self {
        let lanes = Direction::ALL.map(|direction| {
            std::array::from_fn(|index| Lane {
                queue: SmallVec::new(),
                spawn: geometry.spawn(direction, index),
            })
        });
        Self {
            controller: SignalController::new(timings),
            vehicles: VehicleSet::default(),
            lanes,
            crossed: [0; NUM_DIRECTIONS],
            geometry,
        }
    }

    /// Gets the signal controller.
    pub fn controller(&self) -> &SignalController {
        &self.controller
    }

    /// Gets the pixel layout of the intersection.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, id: VehicleId) -> &Vehicle {
        &self.vehicles[id]
    }

    /// Returns an iterator over all the vehicles in the world.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets the queue of the given direction and lane, in insertion order.
    pub fn lane_queue(&self, direction: Direction, lane: usize) -> &[VehicleId] {
        &self.lanes[direction.index()][lane].queue
    }

    /// Gets the number of vehicles that have crossed from the given direction.
    pub fn crossed(&self, direction: Direction) -> u32 {
        self.crossed[direction.index()]
    }

    /// Whether a lane's stop thresholds strictly recede from the stop line
    /// in queue order. Holds for any freshly seeded queue.
    pub fn lane_is_ordered(&self, direction: Direction, lane: usize) -> bool {
        let sign = direction.sign();
        self.lanes[direction.index()][lane]
            .queue
            .iter()
            .map(|id| sign * self.vehicles[*id].stop())
            .tuple_windows()
            .all(|(ahead, behind)| behind < ahead)
    }

    /// Spawns a vehicle at the back of the given lane.
    ///
    /// The stop threshold chains off the preceding vehicle while that
    /// vehicle is still queued; the head of a queue uses the approach's
    /// default stop. The lane's spawn origin then recedes by the new
    /// vehicle's footprint plus the queue gap, reserving its space.
    pub fn spawn(
        &mut self,
        class: VehicleClass,
        direction: Direction,
        lane_index: usize,
        will_turn: bool,
    ) -> VehicleId {
        let sign = direction.sign();
        let lane = &self.lanes[direction.index()][lane_index];

        let stop = match lane.queue.last().map(|id| &self.vehicles[*id]) {
            Some(prev) if !prev.has_crossed() => {
                prev.stop() - sign * (prev.class().length() + self.geometry.queue_gap)
            }
            _ => self.geometry.default_stop(direction),
        };

        let index = lane.queue.len();
        let pos = lane.spawn;
        let id = self.vehicles.insert_with_key(|id| {
            Vehicle::new(id, class, direction, lane_index, index, pos, stop, will_turn)
        });

        let lane = &mut self.lanes[direction.index()][lane_index];
        lane.queue.push(id);
        let reserved = sign * (class.length() + self.geometry.queue_gap);
        if direction.horizontal() {
            lane.spawn.x -= reserved;
        } else {
            lane.spawn.y -= reserved;
        }
        id
    }

    /// Spawns one vehicle per detection record in the snapshot.
    ///
    /// Records alternate between lanes 1 and 2 of their approach, in
    /// insertion order; lane 0 is left to through traffic the captures
    /// did not see. Returns the number of vehicles created.
    pub fn seed_from_snapshot(&mut self, snapshot: &Snapshot) -> usize {
        let mut created = 0;
        for direction in Direction::ALL {
            for (index, record) in snapshot.direction(direction).iter().enumerate() {
                let class = VehicleClass::from_label(&record.class);
                let lane = index % 2 + 1;
                self.spawn(class, direction, lane, false);
                debug!(
                    "seeded {} in {} lane {} (confidence {:.2})",
                    class.name(),
                    direction.name(),
                    lane,
                    record.confidence
                );
                created += 1;
            }
        }
        created
    }

    /// Advances the signal controller by one simulated second.
    ///
    /// When the active approach's green expires, the stop thresholds of its
    /// still-queued vehicles are released back to the default, letting the
    /// queue roll up to the stop line.
    pub fn tick_second(&mut self) {
        if let Some(PhaseEvent::YellowStarted(direction)) = self.controller.tick() {
            self.release_stops(direction);
        }
    }

    /// Advances every vehicle by one frame.
    ///
    /// Lanes are updated in queue order so a vehicle always sees its
    /// predecessor's position for the current frame.
    pub fn tick_frame(&mut self) {
        let World {
            controller,
            vehicles,
            lanes,
            crossed,
            geometry,
        } = self;

        for direction in Direction::ALL {
            let go = controller.is_go(direction);
            let stop_line = geometry.stop_line(direction);
            for lane in &lanes[direction.index()] {
                let mut prev_rear = None;
                for id in &lane.queue {
                    let vehicle = &mut vehicles[*id];
                    let crossed_now =
                        vehicle.step(stop_line, go, prev_rear, geometry.moving_gap);
                    prev_rear = Some(vehicle.rear_edge());
                    if crossed_now {
                        crossed[direction.index()] += 1;
                    }
                }
            }
        }
    }

    /// Resets the stop thresholds of uncrossed vehicles in the direction.
    fn release_stops(&mut self, direction: Direction) {
        let default = self.geometry.default_stop(direction);
        for lane in &self.lanes[direction.index()] {
            for id in &lane.queue {
                let vehicle = &mut self.vehicles[*id];
                if !vehicle.has_crossed() {
                    vehicle.set_stop(default);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn world() -> World {
        World::new(SignalTimings::default(), Geometry::default())
    }

    #[test]
    fn head_vehicle_uses_default_stop() {
        let mut world = world();
        let id = world.spawn(VehicleClass::Car, Direction::Down, 1, false);
        assert_eq!(world.get_vehicle(id).stop(), 320.0);
    }

    #[test]
    fn queue_stops_chain_off_predecessors() {
        let mut world = world();
        let first = world.spawn(VehicleClass::Bus, Direction::Right, 1, false);
        let second = world.spawn(VehicleClass::Car, Direction::Right, 1, false);
        // 580 - (60 + 15)
        assert_eq!(world.get_vehicle(first).stop(), 580.0);
        assert_eq!(world.get_vehicle(second).stop(), 505.0);
        assert!(world.lane_is_ordered(Direction::Right, 1));

        let mut world = self::world();
        let first = world.spawn(VehicleClass::Bus, Direction::Left, 1, false);
        let second = world.spawn(VehicleClass::Car, Direction::Left, 1, false);
        // 810 + (60 + 15)
        assert_eq!(world.get_vehicle(first).stop(), 810.0);
        assert_eq!(world.get_vehicle(second).stop(), 885.0);
        assert!(world.lane_is_ordered(Direction::Left, 1));
    }

    #[test]
    fn spawns_reserve_space_behind_the_queue() {
        let mut world = world();
        let first = world.spawn(VehicleClass::Van, Direction::Up, 2, false);
        let second = world.spawn(VehicleClass::Van, Direction::Up, 2, false);
        let first_y = world.get_vehicle(first).position().y;
        let second_y = world.get_vehicle(second).position().y;
        // Moving up, later arrivals start further down: 50 + 15 reserved.
        assert_eq!(second_y - first_y, 65.0);
    }

    #[test]
    fn yellow_onset_releases_queued_thresholds() {
        let mut world = world();
        let head = world.spawn(VehicleClass::Car, Direction::Right, 1, false);
        let tail = world.spawn(VehicleClass::Car, Direction::Right, 1, false);

        // Run the controller to the end of right's green.
        for _ in 0..20 {
            world.tick_second();
        }
        assert_eq!(world.get_vehicle(head).stop(), 580.0);
        assert_eq!(world.get_vehicle(tail).stop(), 580.0);
    }
}
