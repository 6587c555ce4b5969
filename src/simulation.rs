//! The cooperative scheduler driving the world.
//!
//! One logical clock drives everything: every call to [Simulation::step]
//! advances exactly one frame, and every 30th frame also delivers the
//! 1 Hz controller tick. Torn reads cannot happen because nothing runs
//! between frames.

use crate::geometry::{Direction, Geometry, NUM_DIRECTIONS};
use crate::signal::SignalTimings;
use crate::world::World;
use log::info;

/// Motion frames per simulated second.
pub const FRAMES_PER_SECOND: u64 = 30;

/// The default simulated duration, in seconds.
pub const DEFAULT_SIM_TIME: u32 = 300;

/// A fixed-tick simulation of the intersection.
pub struct Simulation {
    /// The world being simulated.
    world: World,
    /// The current frame of simulation.
    frame: u64,
    /// Simulated seconds elapsed.
    elapsed: u32,
    /// The simulated duration after which the run is finished.
    sim_time: u32,
}

/// The end-of-run report.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    /// Vehicles that crossed, per direction.
    pub crossed: [u32; NUM_DIRECTIONS],
    /// Total vehicles that crossed.
    pub total: u32,
    /// Simulated seconds elapsed.
    pub elapsed: u32,
    /// Vehicles crossed per simulated second.
    pub per_second: f64,
}

impl Simulation {
    /// Creates a simulation that runs for `sim_time` simulated seconds.
    pub fn new(timings: SignalTimings, geometry: Geometry, sim_time: u32) -> Self {
        Self {
            world: World::new(timings, geometry),
            frame: 0,
            elapsed: 0,
            sim_time,
        }
    }

    /// Gets the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Gets the world, mutably. Seeding happens through this before the run.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Gets the current frame of simulation.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Gets the simulated seconds elapsed.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Whether the simulated time budget has run out.
    pub fn done(&self) -> bool {
        self.elapsed >= self.sim_time
    }

    /// Advances the simulation by one frame (1/30 simulated second).
    ///
    /// Every vehicle takes its motion tick; on each full second the signal
    /// controller ticks as well. Does nothing once the run is finished.
    pub fn step(&mut self) {
        if self.done() {
            return;
        }
        self.world.tick_frame();
        self.frame += 1;
        if self.frame % FRAMES_PER_SECOND == 0 {
            self.world.tick_second();
            self.elapsed += 1;
        }
    }

    /// Advances the simulation by whole simulated seconds.
    pub fn step_seconds(&mut self, seconds: u32) {
        for _ in 0..u64::from(seconds) * FRAMES_PER_SECOND {
            self.step();
        }
    }

    /// Runs the simulation to the end of its time budget.
    pub fn run_to_end(&mut self) {
        while !self.done() {
            self.step();
        }
        info!("simulation finished after {} simulated seconds", self.elapsed);
    }

    /// Gets the end-of-run report.
    pub fn summary(&self) -> RunSummary {
        let crossed =
            Direction::ALL.map(|direction| self.world.crossed(direction));
        let total = crossed.iter().sum();
        let per_second = if self.elapsed > 0 {
            f64::from(total) / f64::from(self.elapsed)
        } else {
            0.0
        };
        RunSummary {
            crossed,
            total,
            elapsed: self.elapsed,
            per_second,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::signal::Phase;

    #[test]
    fn one_second_is_thirty_frames() {
        let mut sim =
            Simulation::new(SignalTimings::default(), Geometry::default(), 10);
        sim.step_seconds(1);
        assert_eq!(sim.frame(), 30);
        assert_eq!(sim.elapsed(), 1);
    }

    #[test]
    fn stops_at_the_time_budget() {
        let mut sim =
            Simulation::new(SignalTimings::default(), Geometry::default(), 2);
        sim.run_to_end();
        assert_eq!(sim.elapsed(), 2);
        let frame = sim.frame();
        sim.step();
        assert_eq!(sim.frame(), frame);
    }

    #[test]
    fn controller_ticks_once_per_second() {
        let mut sim =
            Simulation::new(SignalTimings::default(), Geometry::default(), 60);
        sim.step_seconds(20);
        // Right's 20 s green has just expired.
        assert_eq!(sim.world().controller().phase(), Phase::Yellow);
        sim.step_seconds(5);
        assert_eq!(sim.world().controller().active(), 1);
        assert_eq!(sim.world().controller().phase(), Phase::Green);
    }
}
