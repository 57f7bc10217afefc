//! Input abstraction layer.
//!
//! Controllers read a [`ControlInput`] rather than Bevy's `ButtonInput`, so
//! tests can script presses directly.  [`InputSnapshot`] is the Bevy resource
//! written by `player::control::keyboard_to_input_system` every frame and
//! consumed by the fixed-rate controller tick.

use bevy::math::Vec2;
use bevy::prelude::Resource;

/// Every action the controllers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Down,
    Jump,
    Dash,
    Attack,
    Weapon1,
    Weapon2,
    Weapon3,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::Weapon1,
        Action::Weapon2,
        Action::Weapon3,
    ];

    /// Weapon-select actions in slot order.
    pub const WEAPON_SLOTS: [Action; 3] = [Action::Weapon1, Action::Weapon2, Action::Weapon3];

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

pub trait ControlInput {
    /// The action is held down this tick.
    fn held(&self, action: Action) -> bool;
    /// The action went down since the previous tick.
    fn just_pressed(&self, action: Action) -> bool;
    /// Cursor in world space, if one is available.
    fn cursor(&self) -> Option<Vec2>;
}

/// Per-tick input state.
///
/// Presses are accumulated until [`clear_edges`](Self::clear_edges) so a press
/// seen by a render frame is never lost when no fixed tick runs that frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    held: u16,
    pressed: u16,
    pub cursor_world: Option<Vec2>,
}

impl InputSnapshot {
    pub fn set_held(&mut self, action: Action, down: bool) {
        if down {
            self.held |= action.bit();
        } else {
            self.held &= !action.bit();
        }
    }

    /// Register a fresh press (also marks the action held).
    pub fn press(&mut self, action: Action) {
        self.pressed |= action.bit();
        self.held |= action.bit();
    }

    pub fn release(&mut self, action: Action) {
        self.set_held(action, false);
    }

    /// Forget presses once a tick has consumed them.
    pub fn clear_edges(&mut self) {
        self.pressed = 0;
    }

    pub fn with_cursor(mut self, cursor: Vec2) -> Self {
        self.cursor_world = Some(cursor);
        self
    }
}

impl ControlInput for InputSnapshot {
    fn held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed & action.bit() != 0
    }

    fn cursor(&self) -> Option<Vec2> {
        self.cursor_world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_edge_and_held() {
        let mut input = InputSnapshot::default();
        input.press(Action::Jump);
        assert!(input.just_pressed(Action::Jump));
        assert!(input.held(Action::Jump));
        assert!(!input.held(Action::Dash));

        input.clear_edges();
        assert!(!input.just_pressed(Action::Jump));
        assert!(input.held(Action::Jump));

        input.release(Action::Jump);
        assert!(!input.held(Action::Jump));
    }

    #[test]
    fn every_action_has_a_distinct_bit() {
        let mut seen = 0u16;
        for action in Action::ALL {
            assert_eq!(seen & action.bit(), 0, "{action:?} overlaps");
            seen |= action.bit();
        }
    }
}
