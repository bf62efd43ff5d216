use duolane_ports::types::{Lane, Seconds};
use serde::{Deserialize, Serialize};

/// Position of a note in its sorted chart. Stable for the chart's lifetime.
pub type NoteIndex = usize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub index: NoteIndex,
    pub time_sec: Seconds,
    pub lane: Lane,
}

/// Immutable, time-sorted note list for one song.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chart {
    bpm: f64,
    grid_subdiv: u32,
    notes: Vec<Note>,
}

impl Chart {
    pub(crate) fn from_sorted(bpm: f64, grid_subdiv: u32, notes: Vec<Note>) -> Self {
        Self {
            bpm,
            grid_subdiv,
            notes,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn grid_subdiv(&self) -> u32 {
        self.grid_subdiv
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: NoteIndex) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Target time of the last note, if any.
    pub fn last_note_sec(&self) -> Option<Seconds> {
        self.notes.last().map(|n| n.time_sec)
    }
}

/// On-disk chart shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFile {
    pub bpm: f64,
    #[serde(default)]
    pub grid_subdiv: u32,
    pub notes: Vec<NoteRow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub time_sec: f64,
    /// Any JSON number; only exact 0 and 1 are lanes as written.
    pub lane: f64,
}
