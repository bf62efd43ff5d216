use crate::ipc::SessionState;
use duolane_ports::input::{KeyBindings, KeyCode, LaneLayout, PointerButton, RawInput};
use duolane_ports::storage::SettingsDto;
use duolane_ports::types::Lane;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    StartSession,
    AttemptHit(Lane),
}

/// Maps raw key and pointer presses onto the two session entry points.
#[derive(Clone, Debug, Default)]
pub struct InputDispatcher {
    bindings: KeyBindings,
    layout: LaneLayout,
}

impl InputDispatcher {
    pub fn new(bindings: KeyBindings, layout: LaneLayout) -> Self {
        Self { bindings, layout }
    }

    pub fn from_settings(settings: &SettingsDto) -> Self {
        Self::new(settings.key_bindings.clone(), settings.lane_layout)
    }

    pub fn dispatch(&self, input: &RawInput, state: SessionState) -> Option<InputAction> {
        match input {
            RawInput::KeyDown { key } => self.dispatch_key(key, state),
            RawInput::PointerDown { button, x } => {
                if state == SessionState::NotStarted {
                    return Some(InputAction::StartSession);
                }
                let lane = match button {
                    PointerButton::Primary => Lane::Left,
                    PointerButton::Secondary => Lane::Right,
                    PointerButton::Other(_) => self.nearest_lane(*x),
                };
                Some(InputAction::AttemptHit(lane))
            }
        }
    }

    fn dispatch_key(&self, key: &KeyCode, state: SessionState) -> Option<InputAction> {
        if state == SessionState::NotStarted && self.bindings.start.contains(key) {
            return Some(InputAction::StartSession);
        }
        if self.bindings.left.contains(key) {
            Some(InputAction::AttemptHit(Lane::Left))
        } else if self.bindings.right.contains(key) {
            Some(InputAction::AttemptHit(Lane::Right))
        } else {
            None
        }
    }

    /// Equidistant presses go right.
    fn nearest_lane(&self, x: f32) -> Lane {
        if (x - self.layout.left_x).abs() < (x - self.layout.right_x).abs() {
            Lane::Left
        } else {
            Lane::Right
        }
    }
}
