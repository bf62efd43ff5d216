use crate::clock::SongClock;
use crate::ipc::{Event, SessionState, SessionSummary};
use crate::scheduler::{NoteScheduler, SchedulerConfig, SchedulerEvent};
use duolane_domain_chart::{parse_chart_bytes, Chart, ChartError, LanePolicy, SanitizeReport};
use duolane_domain_eval::{HitResolution, Judgement, JudgementEngine, ScoreState, TimingWindows};
use duolane_ports::audio::{AudioError, AudioPlayerPort, AudioSourcePort};
use duolane_ports::library::{LibraryError, SongLibraryPort};
use duolane_ports::types::{Lane, Seconds, SongId};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("library error: {0}")]
    Library(#[from] LibraryError),
    #[error("chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameplayConfig {
    pub approach_sec: Seconds,
    pub lookahead_sec: Seconds,
    pub windows: TimingWindows,
    pub lane_policy: LanePolicy,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        let scheduler = SchedulerConfig::default();
        Self {
            approach_sec: scheduler.approach_sec,
            lookahead_sec: scheduler.lookahead_sec,
            windows: TimingWindows::default(),
            lane_policy: LanePolicy::Drop,
        }
    }
}

impl GameplayConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            approach_sec: self.approach_sec,
            lookahead_sec: self.lookahead_sec,
            miss_window_sec: self.windows.miss,
        }
    }
}

/// One play-through of one chart.
///
/// Driven by a single thread: `tick` once per frame, `start` and
/// `attempt_hit` in between. Calls that make no sense in the current state
/// are ignored rather than reported.
pub struct Session {
    chart: Arc<Chart>,
    clock: SongClock,
    scheduler: NoteScheduler,
    engine: JudgementEngine,
    score: ScoreState,
    state: SessionState,
    started_at: Option<Instant>,
    events: VecDeque<Event>,
}

impl Session {
    pub fn new(
        chart: Chart,
        audio: Box<dyn AudioSourcePort>,
        clock_offset_sec: Seconds,
        config: GameplayConfig,
    ) -> Self {
        let chart = Arc::new(chart);
        Self {
            scheduler: NoteScheduler::new(chart.clone(), config.scheduler_config()),
            chart,
            clock: SongClock::new(audio, clock_offset_sec),
            engine: JudgementEngine::new(config.windows),
            score: ScoreState::new(),
            state: SessionState::NotStarted,
            started_at: None,
            events: VecDeque::new(),
        }
    }

    /// Looks up `song`, loads its chart and opens its track. Fails without
    /// side effects if any of the three is unavailable.
    pub fn load(
        library: &dyn SongLibraryPort,
        player: &dyn AudioPlayerPort,
        song: &SongId,
        clock_offset_sec: Seconds,
        config: GameplayConfig,
    ) -> Result<Self, SessionError> {
        let bytes = library.read_chart(song)?;
        let loaded = parse_chart_bytes(&bytes, config.lane_policy)?;
        log_sanitize_report(song, &loaded.report);
        let audio = player.open_track(song)?;

        log::info!(
            "loaded song {} ({} notes, offset {:.3}s)",
            song,
            loaded.chart.len(),
            clock_offset_sec
        );
        Ok(Self::new(loaded.chart, audio, clock_offset_sec, config))
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Ok(());
        }
        self.clock.play()?;
        self.started_at = Some(Instant::now());
        self.set_state(SessionState::Running);
        Ok(())
    }

    pub fn tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        let now = self.clock.current_time();

        for event in self.scheduler.tick(now) {
            match event {
                SchedulerEvent::Spawned(note) => {
                    self.events.push_back(Event::NoteSpawned { note });
                }
                SchedulerEvent::Updated { note, progress } => {
                    self.events.push_back(Event::NoteUpdated { note, progress });
                }
                SchedulerEvent::Expired(note) => {
                    log::debug!("note {} expired at {:.3}s", note.index, now);
                    self.events.push_back(Event::NoteResolved {
                        note,
                        judgement: Judgement::Miss,
                        delta_sec: None,
                    });
                    self.register(Judgement::Miss);
                }
            }
        }

        if self.scheduler.is_exhausted() && self.clock.playback_ended() {
            self.finish();
        }
    }

    /// Resolves a press on `lane`. Returns the judgement, or `None` when the
    /// press was ignored because the session is not running.
    pub fn attempt_hit(&mut self, lane: Lane) -> Option<Judgement> {
        if self.state != SessionState::Running || !self.clock.is_playing() {
            return None;
        }
        let now = self.clock.current_time();
        let resolution = self.engine.resolve(self.scheduler.active_notes(), lane, now);

        if let HitResolution::Matched {
            note,
            judgement,
            delta_sec,
        } = resolution
        {
            self.scheduler.retire_hit(note.index);
            log::debug!(
                "lane {} hit note {}: {:?} ({:+.3}s)",
                lane.index(),
                note.index,
                judgement,
                delta_sec
            );
            self.events.push_back(Event::NoteResolved {
                note,
                judgement,
                delta_sec: Some(delta_sec),
            });
        }

        let judgement = resolution.judgement();
        self.register(judgement);
        Some(judgement)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn scheduler(&self) -> &NoteScheduler {
        &self.scheduler
    }

    pub fn current_time(&self) -> Seconds {
        self.clock.current_time()
    }

    pub fn clock_offset_sec(&self) -> Seconds {
        self.clock.offset_sec()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Final result, once the session has finished.
    pub fn summary(&self) -> Option<SessionSummary> {
        (self.state == SessionState::Finished).then(|| self.build_summary())
    }

    fn register(&mut self, judgement: Judgement) {
        self.score.register(judgement);
        self.events.push_back(Event::ScoreChanged {
            score: self.score.score(),
            combo: self.score.combo(),
            max_combo: self.score.max_combo(),
        });
    }

    fn finish(&mut self) {
        self.set_state(SessionState::Finished);
        let summary = self.build_summary();
        if let Some(started_at) = self.started_at {
            let wall = started_at.elapsed().as_secs_f64();
            log::info!(
                "session finished: score {} max combo {} (song {:.2}s, wall {:.2}s)",
                summary.score,
                summary.max_combo,
                self.clock.current_time(),
                wall
            );
        }
        self.events.push_back(Event::SessionFinished { summary });
    }

    fn build_summary(&self) -> SessionSummary {
        let tally = self.score.tally();
        SessionSummary {
            score: self.score.score(),
            max_combo: self.score.max_combo(),
            great: tally.great,
            good: tally.good,
            miss: tally.miss,
            accuracy: self.score.accuracy(),
        }
    }

    fn set_state(&mut self, state: SessionState) {
        log::info!("session state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.events.push_back(Event::SessionStateChanged { state });
    }
}

fn log_sanitize_report(song: &SongId, report: &SanitizeReport) {
    if report.is_clean() {
        return;
    }
    log::warn!(
        "chart {} sanitized: reordered={} dropped_lane={} clamped_lane={} dropped_time={}",
        song,
        report.reordered,
        report.dropped_lane,
        report.clamped_lane,
        report.dropped_time
    );
}
