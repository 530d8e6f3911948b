//! Input commands and the default key binding
//!
//! The window layer translates winit events into [`Command`]s; the viewer
//! state never sees raw events.

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Held movement key went down (`active`) or up
    Move {
        direction: MoveDirection,
        active: bool,
    },
    Boost(bool),
    Brake(bool),
    /// Turn mouse-look on or off; the cursor is parked at `center`
    ToggleMouseLook { center: (f64, f64) },
    CursorMoved {
        position: (f64, f64),
        center: (f64, f64),
    },
    CycleCamera,
    Fire,
    Reset,
    Quit,
}

/// Maps a key transition onto a command
///
/// Held keys report both edges. One-shot actions only fire on press.
pub fn command_for_key(code: KeyCode, pressed: bool) -> Option<Command> {
    let movement = |direction| Command::Move {
        direction,
        active: pressed,
    };

    let command = match code {
        KeyCode::KeyW => movement(MoveDirection::Forward),
        KeyCode::KeyS => movement(MoveDirection::Backward),
        KeyCode::KeyA => movement(MoveDirection::Left),
        KeyCode::KeyD => movement(MoveDirection::Right),
        KeyCode::KeyE => movement(MoveDirection::Up),
        KeyCode::KeyQ => movement(MoveDirection::Down),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Command::Boost(pressed),
        KeyCode::ControlLeft | KeyCode::ControlRight => Command::Brake(pressed),
        KeyCode::KeyC if pressed => Command::CycleCamera,
        KeyCode::KeyF if pressed => Command::Fire,
        KeyCode::KeyR if pressed => Command::Reset,
        KeyCode::Escape if pressed => Command::Quit,
        _ => return None,
    };

    Some(command)
}

/// Which held inputs are currently down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldControls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
    pub brake: bool,
}

impl HeldControls {
    pub fn set(&mut self, direction: MoveDirection, active: bool) {
        let slot = match direction {
            MoveDirection::Forward => &mut self.forward,
            MoveDirection::Backward => &mut self.backward,
            MoveDirection::Left => &mut self.left,
            MoveDirection::Right => &mut self.right,
            MoveDirection::Up => &mut self.up,
            MoveDirection::Down => &mut self.down,
        };
        *slot = active;
    }

    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    /// Speed factor from the boost and brake modifiers; both stack when held
    pub fn speed_multiplier(&self, boost: f32, brake: f32) -> f32 {
        let mut multiplier = 1.0;
        if self.boost {
            multiplier *= boost;
        }
        if self.brake {
            multiplier *= brake;
        }
        multiplier
    }

    /// Releases everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_report_both_edges() {
        assert_eq!(
            command_for_key(KeyCode::KeyW, true),
            Some(Command::Move {
                direction: MoveDirection::Forward,
                active: true
            })
        );
        assert_eq!(
            command_for_key(KeyCode::KeyQ, false),
            Some(Command::Move {
                direction: MoveDirection::Down,
                active: false
            })
        );
        assert_eq!(command_for_key(KeyCode::ShiftRight, false), Some(Command::Boost(false)));
    }

    #[test]
    fn one_shot_keys_only_fire_on_press() {
        assert_eq!(command_for_key(KeyCode::KeyF, true), Some(Command::Fire));
        assert_eq!(command_for_key(KeyCode::KeyF, false), None);
        assert_eq!(command_for_key(KeyCode::KeyC, true), Some(Command::CycleCamera));
        assert_eq!(command_for_key(KeyCode::Escape, true), Some(Command::Quit));
        assert_eq!(command_for_key(KeyCode::KeyR, false), None);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(command_for_key(KeyCode::KeyZ, true), None);
    }

    #[test]
    fn held_controls_track_state() {
        let mut held = HeldControls::default();
        held.set(MoveDirection::Left, true);
        assert!(held.left && held.is_moving());

        held.set(MoveDirection::Left, false);
        assert!(!held.is_moving());
    }

    #[test]
    fn modifiers_scale_speed() {
        let mut held = HeldControls::default();
        assert_eq!(held.speed_multiplier(4.0, 0.2), 1.0);

        held.boost = true;
        assert_eq!(held.speed_multiplier(4.0, 0.2), 4.0);

        held.brake = true;
        assert!((held.speed_multiplier(4.0, 0.2) - 0.8).abs() < 1e-6);

        held.clear();
        assert_eq!(held, HeldControls::default());
    }
}
