//! The fixed-cycle signal controller.
//!
//! The four signals are served round-robin with static green and yellow
//! durations. The `minimum`/`maximum` green bounds are carried on each
//! signal but never consulted; the cycle is fixed, not demand-responsive.

use crate::geometry::{Direction, NUM_DIRECTIONS};

/// The static phase durations of a signal, in simulated seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalTimings {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
    pub minimum: u32,
    pub maximum: u32,
}

impl Default for SignalTimings {
    fn default() -> Self {
        Self {
            red: 150,
            yellow: 5,
            green: 20,
            minimum: 10,
            maximum: 60,
        }
    }
}

/// The countdown state of a single signal.
#[derive(Clone, Copy, Debug)]
pub struct Signal {
    /// The remaining red time in s.
    pub red: u32,
    /// The remaining yellow time in s.
    pub yellow: u32,
    /// The remaining green time in s.
    pub green: u32,
    /// The minimum green time bound in s; carried but unused.
    pub minimum: u32,
    /// The maximum green time bound in s; carried but unused.
    pub maximum: u32,
    /// The cumulative green time served, in s.
    pub total_green: u32,
}

impl Signal {
    fn new(red: u32, timings: &SignalTimings) -> Self {
        Self {
            red,
            yellow: timings.yellow,
            green: timings.green,
            minimum: timings.minimum,
            maximum: timings.maximum,
            total_green: 0,
        }
    }
}

/// The phase of the active signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Green,
    Yellow,
}

/// The displayed colour of a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aspect {
    Red,
    Yellow,
    Green,
}

/// A phase transition produced by a controller tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The active direction's green expired and its yellow began.
    /// Queued stop thresholds in that direction should be released.
    YellowStarted(Direction),
    /// Service advanced to the given direction, which is now green.
    GreenStarted(Direction),
}

/// The round-robin traffic signal controller.
pub struct SignalController {
    /// The four signals, indexed right/down/left/up.
    signals: [Signal; NUM_DIRECTIONS],
    /// The timings restored to a signal at the end of its service.
    timings: SignalTimings,
    /// The index of the signal currently being served.
    active: usize,
    /// The phase of the active signal.
    phase: Phase,
}

impl SignalController {
    /// Creates a controller with the first signal about to be served.
    ///
    /// The second signal's red countdown spans the first signal's full
    /// service; the remaining signals start from the default red time.
    pub fn new(timings: SignalTimings) -> Self {
        let signals = [
            Signal::new(0, &timings),
            Signal::new(timings.yellow + timings.green, &timings),
            Signal::new(timings.red, &timings),
            Signal::new(timings.red, &timings),
        ];
        Self {
            signals,
            timings,
            active: 0,
            phase: Phase::Green,
        }
    }

    /// Gets the index of the signal currently being served.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Gets the direction currently being served.
    pub fn active_direction(&self) -> Direction {
        Direction::from_index(self.active).unwrap()
    }

    /// Gets the phase of the active signal.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gets the signal with the given index.
    pub fn signal(&self, index: usize) -> &Signal {
        &self.signals[index]
    }

    /// Whether vehicles approaching from the given direction have right of way.
    pub fn is_go(&self, direction: Direction) -> bool {
        self.active == direction.index() && self.phase == Phase::Green
    }

    /// Gets the displayed colour of the signal with the given index.
    pub fn aspect(&self, index: usize) -> Aspect {
        if index != self.active {
            Aspect::Red
        } else if self.phase == Phase::Green {
            Aspect::Green
        } else {
            Aspect::Yellow
        }
    }

    /// Gets the countdown caption shown beside the signal with the given index.
    pub fn caption(&self, index: usize) -> String {
        let signal = &self.signals[index];
        if index == self.active {
            match self.phase {
                Phase::Green if signal.green == 0 => "SLOW".to_owned(),
                Phase::Green => signal.green.to_string(),
                Phase::Yellow if signal.yellow == 0 => "STOP".to_owned(),
                Phase::Yellow => signal.yellow.to_string(),
            }
        } else if signal.red == 0 {
            "GO".to_owned()
        } else if signal.red <= 10 {
            signal.red.to_string()
        } else {
            "---".to_owned()
        }
    }

    /// Advances the controller by one simulated second.
    ///
    /// Inactive signals count down their red time (floored at zero); the
    /// active signal counts down its current phase. Expiring the green
    /// starts the yellow; expiring the yellow restores the signal's default
    /// timings and advances service to the next direction.
    pub fn tick(&mut self) -> Option<PhaseEvent> {
        for (index, signal) in self.signals.iter_mut().enumerate() {
            if index != self.active {
                signal.red = signal.red.saturating_sub(1);
            }
        }

        let signal = &mut self.signals[self.active];
        match self.phase {
            Phase::Green => {
                signal.green -= 1;
                signal.total_green += 1;
                if signal.green == 0 {
                    self.phase = Phase::Yellow;
                    return Some(PhaseEvent::YellowStarted(self.active_direction()));
                }
            }
            Phase::Yellow => {
                signal.yellow -= 1;
                if signal.yellow == 0 {
                    signal.red = self.timings.red;
                    signal.yellow = self.timings.yellow;
                    signal.green = self.timings.green;
                    self.active = (self.active + 1) % NUM_DIRECTIONS;
                    let upcoming = &mut self.signals[(self.active + 1) % NUM_DIRECTIONS];
                    upcoming.red = self.timings.yellow + self.timings.green;
                    self.phase = Phase::Green;
                    return Some(PhaseEvent::GreenStarted(self.active_direction()));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn green_runs_out_before_yellow_starts() {
        let timings = SignalTimings::default();
        let mut controller = SignalController::new(timings);
        for _ in 0..timings.green - 1 {
            assert_eq!(controller.tick(), None);
            assert_eq!(controller.phase(), Phase::Green);
        }
        assert_eq!(
            controller.tick(),
            Some(PhaseEvent::YellowStarted(Direction::Right))
        );
        assert_eq!(controller.phase(), Phase::Yellow);
        assert_eq!(controller.signal(0).total_green, timings.green);
    }

    #[test]
    fn yellow_expiry_advances_service() {
        let timings = SignalTimings::default();
        let mut controller = SignalController::new(timings);
        for _ in 0..timings.green + timings.yellow - 1 {
            controller.tick();
        }
        assert_eq!(
            controller.tick(),
            Some(PhaseEvent::GreenStarted(Direction::Down))
        );
        assert_eq!(controller.active(), 1);
        assert_eq!(controller.phase(), Phase::Green);
        // The retired signal is restored to its defaults.
        let retired = controller.signal(0);
        assert_eq!(retired.green, timings.green);
        assert_eq!(retired.yellow, timings.yellow);
        assert_eq!(retired.red, timings.red);
        // The signal after the new active waits out exactly one service.
        assert_eq!(controller.signal(2).red, timings.yellow + timings.green);
    }

    #[test]
    fn red_countdown_floors_at_zero() {
        let mut controller = SignalController::new(SignalTimings {
            red: 2,
            ..SignalTimings::default()
        });
        for _ in 0..10 {
            controller.tick();
        }
        assert_eq!(controller.signal(3).red, 0);
        assert_eq!(controller.caption(3), "GO");
    }

    #[test]
    fn captions_follow_countdowns() {
        let mut controller = SignalController::new(SignalTimings::default());
        assert_eq!(controller.caption(0), "20");
        assert_eq!(controller.caption(2), "---");
        controller.tick();
        assert_eq!(controller.caption(0), "19");
        for _ in 0..19 {
            controller.tick();
        }
        // Yellow phase shows the yellow countdown.
        assert_eq!(controller.phase(), Phase::Yellow);
        assert_eq!(controller.caption(0), "5");
    }
}
