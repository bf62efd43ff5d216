use duolane_ports::audio::{AudioError, AudioSourcePort};
use duolane_ports::types::Seconds;

/// Gameplay time derived from the audio source. There is no fallback timer:
/// when the source stalls, so does the clock.
pub struct SongClock {
    source: Box<dyn AudioSourcePort>,
    offset_sec: Seconds,
}

impl SongClock {
    pub fn new(source: Box<dyn AudioSourcePort>, offset_sec: Seconds) -> Self {
        Self { source, offset_sec }
    }

    pub fn current_time(&self) -> Seconds {
        self.source.position_sec() + self.offset_sec
    }

    pub fn offset_sec(&self) -> Seconds {
        self.offset_sec
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        self.source.play()
    }

    pub fn is_playing(&self) -> bool {
        self.source.is_playing()
    }

    pub fn playback_ended(&self) -> bool {
        self.source.has_ended()
    }
}
