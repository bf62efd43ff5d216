#![allow(dead_code)]

use duolane_core::{Event, GameplayConfig, ManualAudioSource, Session};
use duolane_domain_chart::{sanitize_chart, Chart, ChartFile, LanePolicy, NoteRow};

pub fn chart(rows: &[(f64, i64)]) -> Chart {
    let file = ChartFile {
        bpm: 120.0,
        grid_subdiv: 4,
        notes: rows
            .iter()
            .map(|&(time_sec, lane)| NoteRow {
                time_sec,
                lane: lane as f64,
            })
            .collect(),
    };
    sanitize_chart(file, LanePolicy::Drop).chart
}

/// Session plus a handle on its audio playhead.
pub fn session(rows: &[(f64, i64)], duration_sec: f64, offset_sec: f64) -> (Session, ManualAudioSource) {
    let audio = ManualAudioSource::new(duration_sec);
    let session = Session::new(
        chart(rows),
        Box::new(audio.clone()),
        offset_sec,
        GameplayConfig::default(),
    );
    (session, audio)
}

pub fn started(rows: &[(f64, i64)], duration_sec: f64) -> (Session, ManualAudioSource) {
    let (mut session, audio) = session(rows, duration_sec, 0.0);
    session.start().expect("manual audio always starts");
    session.drain_events();
    (session, audio)
}

pub fn resolved_indices(events: &[Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::NoteResolved { note, .. } => Some(note.index),
            _ => None,
        })
        .collect()
}
