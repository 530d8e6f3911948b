//! Mutable viewer state: camera, held input and the rocket
//!
//! [`ViewerState::apply`] and [`ViewerState::update`] are the only ways the
//! state changes, apart from [`ViewerState::release_all`] on focus loss.
//! Window-side effects (quitting, warping or hiding the cursor) come back as
//! a [`StateResponse`] for the app layer to carry out.

use crate::{
    config::ViewerConfig,
    controls::{Command, HeldControls},
    gfx::camera::ViewerCamera,
    simulation::{RocketFlight, RocketPose},
};

/// What the window layer must do after a command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateResponse {
    None,
    Quit,
    /// Warp the cursor to this position
    RecenterCursor(f64, f64),
    /// Mouse-look switched; hide and centre the cursor when `true`
    MouseLook(bool),
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub camera: ViewerCamera,
    pub held: HeldControls,
    pub rocket: RocketFlight,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: ViewerCamera::new(
                config.camera.clone(),
                config.window.width,
                config.window.height,
            ),
            held: HeldControls::default(),
            rocket: RocketFlight::new(config.rocket.clone()),
        }
    }

    pub fn apply(&mut self, command: Command) -> StateResponse {
        match command {
            Command::Move { direction, active } => self.held.set(direction, active),
            Command::Boost(active) => self.held.boost = active,
            Command::Brake(active) => self.held.brake = active,
            Command::ToggleMouseLook { center } => {
                return StateResponse::MouseLook(self.camera.toggle_mouse_look(center));
            }
            Command::CursorMoved { position, center } => {
                if let Some((x, y)) = self.camera.cursor_moved(position, center) {
                    return StateResponse::RecenterCursor(x, y);
                }
            }
            Command::CycleCamera => {
                self.camera.cycle_mode();
            }
            Command::Fire => self.rocket.fire(),
            Command::Reset => self.rocket.reset(),
            Command::Quit => return StateResponse::Quit,
        }
        StateResponse::None
    }

    /// Advances the free camera and the rocket by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.camera.advance(&self.held, dt);
        self.rocket.advance(dt);
    }

    pub fn rocket_pose(&self) -> RocketPose {
        self.rocket.pose()
    }

    /// Drops held keys, e.g. when focus is lost and key-up events go missing
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controls::MoveDirection,
        gfx::camera::CameraMode,
        simulation::FlightPhase,
    };
    use approx::assert_relative_eq;

    fn state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    #[test]
    fn fire_then_update_launches_rocket() {
        let mut state = state();
        assert_eq!(state.apply(Command::Fire), StateResponse::None);
        state.update(0.5);

        assert_eq!(state.rocket.phase(), FlightPhase::Ascending);
        assert!(state.rocket_pose().y > ViewerConfig::default().rocket.initial_y);
    }

    #[test]
    fn reset_grounds_rocket() {
        let mut state = state();
        state.apply(Command::Fire);
        state.update(1.0);
        state.apply(Command::Reset);

        assert_eq!(state.rocket.phase(), FlightPhase::Grounded);
        assert_relative_eq!(state.rocket_pose().y, ViewerConfig::default().rocket.initial_y);
    }

    #[test]
    fn held_forward_moves_free_camera() {
        let mut state = state();
        let start = state.camera.free().position;

        state.apply(Command::Move {
            direction: MoveDirection::Forward,
            active: true,
        });
        state.update(1.0);
        let moved = state.camera.free().position;
        assert!(moved.z < start.z, "default heading looks down -Z");

        state.apply(Command::Move {
            direction: MoveDirection::Forward,
            active: false,
        });
        state.update(1.0);
        assert_relative_eq!(state.camera.free().position.z, moved.z);
    }

    #[test]
    fn mouse_look_toggle_reports_new_state() {
        let mut state = state();
        let center = (640.0, 360.0);

        assert_eq!(
            state.apply(Command::ToggleMouseLook { center }),
            StateResponse::MouseLook(true)
        );
        assert_eq!(
            state.apply(Command::CursorMoved {
                position: (700.0, 360.0),
                center,
            }),
            StateResponse::RecenterCursor(640.0, 360.0)
        );
        assert_eq!(
            state.apply(Command::ToggleMouseLook { center }),
            StateResponse::MouseLook(false)
        );
    }

    #[test]
    fn cursor_is_ignored_without_mouse_look() {
        let mut state = state();
        let before = *state.camera.free();
        let response = state.apply(Command::CursorMoved {
            position: (10.0, 10.0),
            center: (640.0, 360.0),
        });

        assert_eq!(response, StateResponse::None);
        assert_eq!(state.camera.free(), &before);
    }

    #[test]
    fn cycle_and_quit() {
        let mut state = state();
        state.apply(Command::CycleCamera);
        assert_eq!(state.camera.mode(), CameraMode::Chase);
        assert_eq!(state.apply(Command::Quit), StateResponse::Quit);
    }

    #[test]
    fn release_all_stops_motion() {
        let mut state = state();
        state.apply(Command::Move {
            direction: MoveDirection::Up,
            active: true,
        });
        state.apply(Command::Boost(true));
        state.release_all();

        let start = state.camera.free().position;
        state.update(1.0);
        assert_eq!(state.camera.free().position, start);
        assert!(!state.held.boost);
    }
}
