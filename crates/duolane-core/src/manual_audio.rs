use duolane_ports::audio::{AudioError, AudioPlayerPort, AudioSourcePort};
use duolane_ports::types::{Seconds, SongId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct ManualState {
    position_sec: Seconds,
    duration_sec: Seconds,
    playing: bool,
    ended: bool,
}

/// Audio source whose position is moved by the host instead of a device.
/// Clones share the same playhead, so one clone can be handed to a session
/// while another drives it.
#[derive(Clone, Debug)]
pub struct ManualAudioSource {
    state: Arc<Mutex<ManualState>>,
}

impl ManualAudioSource {
    pub fn new(duration_sec: Seconds) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                position_sec: 0.0,
                duration_sec: duration_sec.max(0.0),
                playing: false,
                ended: false,
            })),
        }
    }

    /// Moves the playhead forward by `dt` while playing.
    pub fn advance(&self, dt: Seconds) {
        let mut state = self.state.lock();
        if !state.playing {
            return;
        }
        let target = state.position_sec + dt.max(0.0);
        Self::move_to(&mut state, target);
    }

    /// Jumps the playhead while playing. Backward jumps are ignored.
    pub fn set_position(&self, position_sec: Seconds) {
        let mut state = self.state.lock();
        if !state.playing || position_sec < state.position_sec {
            return;
        }
        Self::move_to(&mut state, position_sec);
    }

    pub fn duration_sec(&self) -> Seconds {
        self.state.lock().duration_sec
    }

    fn move_to(state: &mut ManualState, target: Seconds) {
        if target >= state.duration_sec {
            state.position_sec = state.duration_sec;
            state.playing = false;
            state.ended = true;
        } else {
            state.position_sec = target;
        }
    }
}

impl AudioSourcePort for ManualAudioSource {
    fn play(&mut self) -> Result<(), AudioError> {
        let mut state = self.state.lock();
        if state.ended {
            return Ok(());
        }
        state.playing = true;
        if state.duration_sec <= 0.0 {
            state.playing = false;
            state.ended = true;
        }
        Ok(())
    }

    fn position_sec(&self) -> Seconds {
        self.state.lock().position_sec
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn has_ended(&self) -> bool {
        self.state.lock().ended
    }
}

/// Player port backed by `ManualAudioSource`s with preset track lengths.
pub struct ManualAudioPort {
    durations: HashMap<SongId, Seconds>,
    opened: Mutex<Option<ManualAudioSource>>,
}

impl ManualAudioPort {
    pub fn new() -> Self {
        Self {
            durations: HashMap::new(),
            opened: Mutex::new(None),
        }
    }

    pub fn with_track(mut self, song: SongId, duration_sec: Seconds) -> Self {
        self.durations.insert(song, duration_sec);
        self
    }

    /// Handle on the most recently opened track.
    pub fn last_opened(&self) -> Option<ManualAudioSource> {
        self.opened.lock().clone()
    }
}

impl Default for ManualAudioPort {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayerPort for ManualAudioPort {
    fn open_track(&self, song: &SongId) -> Result<Box<dyn AudioSourcePort>, AudioError> {
        let duration = self
            .durations
            .get(song)
            .copied()
            .ok_or_else(|| AudioError::TrackNotFound(song.clone()))?;
        let source = ManualAudioSource::new(duration);
        *self.opened.lock() = Some(source.clone());
        Ok(Box::new(source))
    }
}
