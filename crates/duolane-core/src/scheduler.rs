use duolane_domain_chart::{Chart, Note, NoteIndex};
use duolane_ports::types::Seconds;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// How long a note is on its way down before its target time.
    pub approach_sec: Seconds,
    /// Extra head start so notes exist slightly before they become visible.
    pub lookahead_sec: Seconds,
    /// Lateness after which an untouched note is missed.
    pub miss_window_sec: Seconds,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            approach_sec: 1.2,
            lookahead_sec: 0.2,
            miss_window_sec: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLifecycle {
    Pending,
    Active,
    Hit,
    Missed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchedulerEvent {
    Spawned(Note),
    /// `progress` is 0 when the note appears and 1 at its target time.
    Updated { note: Note, progress: f64 },
    Expired(Note),
}

/// Admits chart notes into the active set ahead of their time and expires
/// the ones nobody hit.
pub struct NoteScheduler {
    config: SchedulerConfig,
    chart: Arc<Chart>,
    lifecycle: Vec<NoteLifecycle>,
    active: Vec<NoteIndex>,
    cursor: usize,
}

impl NoteScheduler {
    pub fn new(chart: Arc<Chart>, config: SchedulerConfig) -> Self {
        let lifecycle = vec![NoteLifecycle::Pending; chart.len()];
        Self {
            config,
            chart,
            lifecycle,
            active: Vec::new(),
            cursor: 0,
        }
    }

    pub fn tick(&mut self, now: Seconds) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();

        let spawn_until = now + self.config.approach_sec + self.config.lookahead_sec;
        while let Some(note) = self.chart.note(self.cursor) {
            if note.time_sec > spawn_until {
                break;
            }
            self.lifecycle[note.index] = NoteLifecycle::Active;
            // Chart order is index order, so `active` stays sorted.
            self.active.push(note.index);
            events.push(SchedulerEvent::Spawned(*note));
            self.cursor += 1;
        }

        for note in self.active_notes() {
            events.push(SchedulerEvent::Updated {
                note: *note,
                progress: self.progress(note, now),
            });
        }

        let miss_window = self.config.miss_window_sec;
        let chart = &self.chart;
        let lifecycle = &mut self.lifecycle;
        self.active.retain(|&index| {
            let note = &chart.notes()[index];
            if now - note.time_sec > miss_window {
                lifecycle[index] = NoteLifecycle::Missed;
                events.push(SchedulerEvent::Expired(*note));
                false
            } else {
                true
            }
        });

        events
    }

    /// Removes a note that a hit attempt resolved. Returns false if the note
    /// was not active.
    pub fn retire_hit(&mut self, index: NoteIndex) -> bool {
        let Some(pos) = self.active.iter().position(|&i| i == index) else {
            return false;
        };
        self.active.remove(pos);
        self.lifecycle[index] = NoteLifecycle::Hit;
        true
    }

    pub fn active_notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.active.iter().map(move |&i| &self.chart.notes()[i])
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn lifecycle(&self, index: NoteIndex) -> Option<NoteLifecycle> {
        self.lifecycle.get(index).copied()
    }

    /// Every note has been spawned and resolved.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.chart.len() && self.active.is_empty()
    }

    pub fn spawned_index(&self) -> usize {
        self.cursor
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn progress(&self, note: &Note, now: Seconds) -> f64 {
        let approach = self.config.approach_sec;
        (now - (note.time_sec - approach)) / approach
    }
}
