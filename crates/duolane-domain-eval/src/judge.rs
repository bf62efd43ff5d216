use duolane_domain_chart::Note;
use duolane_ports::types::{Lane, Seconds};
use serde::{Deserialize, Serialize};

/// Absolute-delta thresholds, in seconds. Each bound is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub great: Seconds,
    pub good: Seconds,
    pub miss: Seconds,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            great: 0.12,
            good: 0.20,
            miss: 0.25,
        }
    }
}

impl TimingWindows {
    /// `None` when the delta is outside every window.
    pub fn classify(&self, abs_delta: Seconds) -> Option<Judgement> {
        if abs_delta <= self.great {
            Some(Judgement::Great)
        } else if abs_delta <= self.good {
            Some(Judgement::Good)
        } else if abs_delta <= self.miss {
            Some(Judgement::Miss)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgement {
    Great,
    Good,
    Miss,
}

impl Judgement {
    pub fn base_points(self) -> u64 {
        match self {
            Judgement::Great => 300,
            Judgement::Good => 150,
            Judgement::Miss => 0,
        }
    }

    pub fn is_miss(self) -> bool {
        matches!(self, Judgement::Miss)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitResolution {
    /// Nothing eligible on the lane. Scores as a miss; no note is consumed.
    Unmatched,
    Matched {
        note: Note,
        judgement: Judgement,
        /// `note.time_sec - now`; positive means the press was early.
        delta_sec: Seconds,
    },
}

impl HitResolution {
    pub fn judgement(&self) -> Judgement {
        match self {
            HitResolution::Unmatched => Judgement::Miss,
            HitResolution::Matched { judgement, .. } => *judgement,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        match self {
            HitResolution::Unmatched => None,
            HitResolution::Matched { note, .. } => Some(note),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JudgementEngine {
    windows: TimingWindows,
}

impl JudgementEngine {
    pub fn new(windows: TimingWindows) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> TimingWindows {
        self.windows
    }

    /// Picks the note a press on `lane` at `now` belongs to.
    ///
    /// The closest eligible note wins; exact ties go to the lower chart
    /// index. The caller owns the active set and removes the matched note.
    pub fn resolve<'a, I>(&self, active: I, lane: Lane, now: Seconds) -> HitResolution
    where
        I: IntoIterator<Item = &'a Note>,
    {
        let mut best: Option<(&Note, Seconds)> = None;

        for note in active {
            if note.lane != lane {
                continue;
            }
            let abs_delta = press_delta(note, now).abs();
            if abs_delta > self.windows.miss {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, current_abs)) => {
                    abs_delta < current_abs
                        || (abs_delta == current_abs && note.index < current.index)
                }
            };
            if better {
                best = Some((note, abs_delta));
            }
        }

        let Some((note, abs_delta)) = best else {
            return HitResolution::Unmatched;
        };

        // Eligible notes always fall inside the miss window.
        let judgement = self.windows.classify(abs_delta).unwrap_or(Judgement::Miss);
        HitResolution::Matched {
            note: *note,
            judgement,
            delta_sec: press_delta(note, now),
        }
    }
}

/// `note.time_sec - now` at microsecond resolution, so a press exactly on a
/// window edge is not pushed past it by float error.
fn press_delta(note: &Note, now: Seconds) -> Seconds {
    ((note.time_sec - now) * 1_000_000.0).round() / 1_000_000.0
}
