use crate::input::{KeyBindings, LaneLayout};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDto {
    /// Calibration added to the audio position, in milliseconds.
    pub clock_offset_ms: i32,
    pub key_bindings: KeyBindings,
    pub lane_layout: LaneLayout,
    pub last_song: Option<SongId>,
}

impl SettingsDto {
    pub fn clock_offset_sec(&self) -> Seconds {
        self.clock_offset_ms as f64 / 1000.0
    }
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<SettingsDto, StorageError>;
    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError>;
}
