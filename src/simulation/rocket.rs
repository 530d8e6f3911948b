//! Rocket flight state machine
//!
//! The flight path is a closed-form kinematic curve advanced once per frame:
//!
//! - **Grounded**: idle at the launch point until fired.
//! - **Ascending**: for the first 1.5 s the rocket climbs straight up.
//! - **Arcing**: the nose snaps to 45° and the rocket travels towards -X
//!   along a fixed downward-opening parabola in X.
//!
//! Landing (Y below the launch height, or X past -15) and the reset command
//! both return it to the launch point.

use cgmath::Deg;
use log::{debug, info};

use crate::config::RocketConfig;

/// Seconds of vertical climb before the arc begins
pub const ASCENT_DURATION: f32 = 1.5;
/// Heading held for the whole arc
pub const ARC_HEADING: Deg<f32> = Deg(45.0);
/// Flights are cut short once X falls below this
pub const MIN_X: f32 = -15.0;

const ARC_A: f32 = -0.02;
const ARC_B: f32 = -1.0;
const ARC_C_ABOVE_LAUNCH: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Grounded,
    Ascending,
    Arcing,
}

/// Snapshot of the rocket consumed by the scene and the cameras
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocketPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Tilt of the nose away from +Y towards -X
    pub heading: Deg<f32>,
}

#[derive(Debug, Clone)]
pub struct RocketFlight {
    config: RocketConfig,
    phase: FlightPhase,
    x: f32,
    y: f32,
    flight_time: f32,
    heading: Deg<f32>,
}

impl RocketFlight {
    pub fn new(config: RocketConfig) -> Self {
        Self {
            phase: FlightPhase::Grounded,
            x: config.initial_x,
            y: config.initial_y,
            flight_time: 0.0,
            heading: Deg(0.0),
            config,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn is_flying(&self) -> bool {
        self.phase != FlightPhase::Grounded
    }

    pub fn flight_time(&self) -> f32 {
        self.flight_time
    }

    pub fn pose(&self) -> RocketPose {
        RocketPose {
            x: self.x,
            y: self.y,
            z: self.config.launch_z,
            heading: self.heading,
        }
    }

    /// Starts a flight; ignored while already in the air
    pub fn fire(&mut self) {
        if self.phase == FlightPhase::Grounded {
            info!("Rocket launched");
            self.phase = FlightPhase::Ascending;
            self.flight_time = 0.0;
        }
    }

    /// Returns to the launch point immediately, from any phase
    pub fn reset(&mut self) {
        if self.phase != FlightPhase::Grounded {
            info!("Rocket reset after {:.2}s of flight", self.flight_time);
        }
        self.phase = FlightPhase::Grounded;
        self.x = self.config.initial_x;
        self.y = self.config.initial_y;
        self.flight_time = 0.0;
        self.heading = Deg(0.0);
    }

    /// Advances the flight by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if !self.is_flying() {
            return;
        }

        self.flight_time += dt;
        let t = self.flight_time;

        if t <= ASCENT_DURATION {
            self.y += self.config.ascent_rate * dt;
            self.heading = Deg(0.0);
            // The frame that lands exactly on the boundary already turns the nose
            if t >= ASCENT_DURATION {
                self.enter_arc();
            }
        } else {
            self.enter_arc();

            let speed_multiplier = 1.0 + 0.5 * (t - 2.0);
            self.x -= self.config.glide_speed * speed_multiplier * dt;
            self.y = self.arc_height(self.x);
        }

        if self.y < self.config.initial_y || self.x < MIN_X {
            debug!("Rocket landed at x={:.2} y={:.2}", self.x, self.y);
            self.reset();
        }
    }

    fn enter_arc(&mut self) {
        if self.phase == FlightPhase::Ascending {
            debug!("Rocket entering arc at x={:.2} y={:.2}", self.x, self.y);
            self.phase = FlightPhase::Arcing;
        }
        self.heading = ARC_HEADING;
    }

    /// Height of the arc parabola at `x`
    pub fn arc_height(&self, x: f32) -> f32 {
        let dx = x - self.config.initial_x;
        let c = self.config.initial_y + ARC_C_ABOVE_LAUNCH;
        ARC_A * dx * dx + ARC_B * dx + c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config() -> RocketConfig {
        RocketConfig::default()
    }

    fn step(flight: &mut RocketFlight, seconds: f32, dt: f32) {
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            flight.advance(dt);
        }
    }

    #[test]
    fn grounded_rocket_stays_put() {
        let mut flight = RocketFlight::new(config());
        flight.advance(1.0);

        assert_eq!(flight.phase(), FlightPhase::Grounded);
        assert_eq!(flight.pose().x, config().initial_x);
        assert_eq!(flight.pose().y, config().initial_y);
        assert_eq!(flight.flight_time(), 0.0);
    }

    #[test]
    fn fire_starts_ascent() {
        let mut flight = RocketFlight::new(config());
        flight.fire();
        assert_eq!(flight.phase(), FlightPhase::Ascending);

        flight.advance(0.5);
        let pose = flight.pose();
        assert_eq!(pose.x, config().initial_x);
        assert_abs_diff_eq!(pose.y, config().initial_y + 0.5 * config().ascent_rate, epsilon = 1e-5);
        assert_eq!(pose.heading, Deg(0.0));
    }

    #[test]
    fn fire_while_flying_is_ignored() {
        let mut flight = RocketFlight::new(config());
        flight.fire();
        flight.advance(1.0);
        flight.fire();
        assert_abs_diff_eq!(flight.flight_time(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn arc_begins_after_ascent() {
        let mut flight = RocketFlight::new(config());
        flight.fire();
        flight.advance(0.75);
        flight.advance(0.75);

        // exactly 1.5 s: top of the climb, nose already turned
        assert_eq!(flight.phase(), FlightPhase::Arcing);
        assert_eq!(flight.pose().heading, ARC_HEADING);
        assert_eq!(flight.pose().x, config().initial_x);
        assert_abs_diff_eq!(
            flight.pose().y,
            config().initial_y + config().ascent_rate * ASCENT_DURATION,
            epsilon = 1e-5
        );

        flight.advance(0.1);
        let pose = flight.pose();
        assert_eq!(flight.phase(), FlightPhase::Arcing);
        assert_eq!(pose.heading, ARC_HEADING);
        assert!(pose.x < config().initial_x);
        assert_abs_diff_eq!(pose.y, flight.arc_height(pose.x), epsilon = 1e-5);
    }

    #[test]
    fn arc_starts_at_top_of_climb() {
        let flight = RocketFlight::new(config());
        let top_of_climb = config().initial_y + config().ascent_rate * ASCENT_DURATION;
        assert_abs_diff_eq!(flight.arc_height(config().initial_x), top_of_climb, epsilon = 1e-5);
    }

    #[test]
    fn flight_ends_past_min_x() {
        let mut flight = RocketFlight::new(config());
        flight.fire();

        let mut saw_arc = false;
        for _ in 0..10_000 {
            flight.advance(1.0 / 60.0);
            saw_arc |= flight.phase() == FlightPhase::Arcing;
            if !flight.is_flying() {
                break;
            }
            assert!(flight.pose().x >= MIN_X);
        }

        assert!(saw_arc);
        assert_eq!(flight.phase(), FlightPhase::Grounded);
        assert_eq!(flight.pose().x, config().initial_x);
        assert_eq!(flight.pose().y, config().initial_y);
        assert_eq!(flight.flight_time(), 0.0);
    }

    #[test]
    fn flight_ends_when_below_launch_height() {
        // Launching from far out on +X makes the parabola drop below the
        // launch height before X reaches the cut-off.
        let mut cfg = config();
        cfg.initial_x = 60.0;
        cfg.glide_speed = 40.0;
        let mut flight = RocketFlight::new(cfg.clone());
        flight.fire();

        step(&mut flight, 1.5, 0.25);
        let mut landed = false;
        for _ in 0..1000 {
            flight.advance(0.05);
            if !flight.is_flying() {
                landed = true;
                break;
            }
        }

        assert!(landed);
        assert_eq!(flight.pose().x, cfg.initial_x);
        assert_eq!(flight.pose().y, cfg.initial_y);
    }

    #[test]
    fn reset_from_any_phase() {
        let mut flight = RocketFlight::new(config());
        flight.fire();
        step(&mut flight, 2.5, 0.1);
        assert_eq!(flight.phase(), FlightPhase::Arcing);

        flight.reset();
        assert_eq!(flight.phase(), FlightPhase::Grounded);
        assert_eq!(flight.pose().heading, Deg(0.0));
        assert_eq!(flight.pose().x, config().initial_x);
        assert_eq!(flight.flight_time(), 0.0);
    }

    #[test]
    fn arc_speed_grows_after_two_seconds() {
        let mut flight = RocketFlight::new(config());
        flight.fire();
        step(&mut flight, 2.0, 0.1);

        let before = flight.pose().x;
        flight.advance(0.1);
        let early = before - flight.pose().x;

        step(&mut flight, 1.0, 0.1);
        let before = flight.pose().x;
        flight.advance(0.1);
        let late = before - flight.pose().x;

        assert!(late > early);
    }
}
