use serde::{Deserialize, Serialize};
use std::fmt;

pub type Seconds = f64; // song time, offset-corrected

/// One of the two input tracks. Serialized as its index (0 = left, 1 = right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];

    pub fn index(self) -> u8 {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Lane::Left),
            1 => Some(Lane::Right),
            _ => None,
        }
    }

    /// Nearest lane for an out-of-range index.
    pub fn clamped(index: i64) -> Self {
        if index <= 0 {
            Lane::Left
        } else {
            Lane::Right
        }
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.index()
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::from_index(value as i64).ok_or_else(|| format!("lane out of range: {value}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongId(pub String);

impl SongId {
    /// Song id for an audio file name: everything before the first `.`.
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.split('.').next().unwrap_or(file_name);
        Self(stem.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SongId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
