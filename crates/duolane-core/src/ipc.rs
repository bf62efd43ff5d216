use duolane_domain_chart::Note;
use duolane_domain_eval::Judgement;
use duolane_ports::input::RawInput;
use duolane_ports::library::SongInfo;
use duolane_ports::storage::SettingsDto;
use duolane_ports::types::{Lane, Seconds, SongId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    ListSongs,
    LoadSong { song: SongId },
    StartSession,
    AttemptHit { lane: Lane },
    Input { input: RawInput },
    SetClockOffsetMs { ms: i32 },
    AbandonSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub max_combo: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    pub accuracy: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    SongsUpdated { songs: Vec<SongInfo> },
    SettingsUpdated { settings: SettingsDto },
    SessionLoaded { song: SongId, note_count: usize },
    SessionLoadFailed { song: SongId, reason: String },
    NoteSpawned { note: Note },
    NoteUpdated { note: Note, progress: f64 },
    /// `delta_sec` is `None` for notes that expired without a press.
    NoteResolved {
        note: Note,
        judgement: Judgement,
        delta_sec: Option<Seconds>,
    },
    ScoreChanged { score: u64, combo: u32, max_combo: u32 },
    SessionStateChanged { state: SessionState },
    SessionFinished { summary: SessionSummary },
}
