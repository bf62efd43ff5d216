use crate::types::*;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("track not found: {0}")]
    TrackNotFound(SongId),
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("unsupported config: {0}")]
    UnsupportedConfig(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Playback of one song track. The reported position is the authoritative
/// gameplay clock; it must not move backwards while playing.
pub trait AudioSourcePort: Send {
    fn play(&mut self) -> Result<(), AudioError>;

    /// Playback position in seconds. Stays at 0 before `play`.
    fn position_sec(&self) -> Seconds;

    fn is_playing(&self) -> bool;

    /// True once the track has played through to its end.
    fn has_ended(&self) -> bool;
}

pub trait AudioPlayerPort: Send + Sync {
    fn open_track(&self, song: &SongId) -> Result<Box<dyn AudioSourcePort>, AudioError>;
}
