use serde::{Deserialize, Serialize};

/// Host key identifier, e.g. `"ArrowLeft"`, `"KeyA"`, `"Space"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub String);

impl From<&str> for KeyCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other(u8),
}

impl PointerButton {
    pub fn from_index(button: u8) -> Self {
        match button {
            0 => PointerButton::Primary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// Raw input as delivered by the host, before lane resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RawInput {
    KeyDown { key: KeyCode },
    PointerDown { button: PointerButton, x: f32 },
}

fn default_left_keys() -> Vec<KeyCode> {
    vec!["ArrowLeft".into(), "KeyA".into()]
}

fn default_right_keys() -> Vec<KeyCode> {
    vec!["ArrowRight".into(), "KeyD".into()]
}

fn default_start_keys() -> Vec<KeyCode> {
    vec!["Space".into()]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(default = "default_left_keys")]
    pub left: Vec<KeyCode>,
    #[serde(default = "default_right_keys")]
    pub right: Vec<KeyCode>,
    #[serde(default = "default_start_keys")]
    pub start: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: default_left_keys(),
            right: default_right_keys(),
            start: default_start_keys(),
        }
    }
}

/// Horizontal screen position of each lane's hit target, used to resolve
/// pointer presses that carry no lane of their own.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    pub left_x: f32,
    pub right_x: f32,
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            left_x: 533.0,
            right_x: 574.0,
        }
    }
}
