use anyhow::{anyhow, Result};
use duolane_core::{
    AppCore, Command, Event, GameplayConfig, ManualAudioPort, ManualAudioSource, SessionSummary,
};
use duolane_domain_chart::parse_chart_bytes;
use duolane_infra_audio_cpal::{CpalAudioPort, PcmTrack};
use duolane_infra_storage_fs::FsSongLibrary;
use duolane_ports::audio::{AudioError, AudioPlayerPort, AudioSourcePort};
use duolane_ports::library::SongLibraryPort;
use duolane_ports::types::{Lane, Seconds, SongId};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TAIL_SEC: Seconds = 1.0;
const SILENT_TRACK_RATE_HZ: u32 = 48_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AudioBackend {
    /// Virtual playhead advanced one frame at a time, as fast as possible
    Virtual,
    /// Silent track on the default cpal output device, in real time
    Cpal,
}

pub struct AutoplayOptions {
    pub fps: u32,
    pub jitter_sec: Seconds,
    pub offset_ms: i32,
    pub audio: AudioBackend,
}

struct SharedPlayer(Arc<ManualAudioPort>);

impl AudioPlayerPort for SharedPlayer {
    fn open_track(&self, song: &SongId) -> Result<Box<dyn AudioSourcePort>, AudioError> {
        self.0.open_track(song)
    }
}

/// Runs one session against a track that lasts one second past the last
/// note.
pub fn run(
    library: FsSongLibrary,
    song: &SongId,
    options: &AutoplayOptions,
) -> Result<SessionSummary> {
    let config = GameplayConfig::default();
    let chart = parse_chart_bytes(&library.read_chart(song)?, config.lane_policy)?.chart;
    let duration = chart.last_note_sec().unwrap_or(0.0) + TAIL_SEC;

    // Only the virtual backend needs stepping by hand.
    let (player, manual): (Box<dyn AudioPlayerPort>, Option<Arc<ManualAudioPort>>) =
        match options.audio {
            AudioBackend::Virtual => {
                let port = Arc::new(ManualAudioPort::new().with_track(song.clone(), duration));
                (Box::new(SharedPlayer(port.clone())), Some(port))
            }
            AudioBackend::Cpal => {
                let port = CpalAudioPort::new();
                port.register_track(
                    song.clone(),
                    PcmTrack::silent(SILENT_TRACK_RATE_HZ, duration),
                );
                (Box::new(port), None)
            }
        };
    let mut core = AppCore::new(Box::new(library), player, None, config);

    core.handle_command(Command::SetClockOffsetMs {
        ms: options.offset_ms,
    })?;
    core.handle_command(Command::LoadSong { song: song.clone() })?;
    core.handle_command(Command::StartSession)?;

    let source: Option<ManualAudioSource> = match &manual {
        Some(port) => Some(
            port.last_opened()
                .ok_or_else(|| anyhow!("no track opened for {}", song))?,
        ),
        None => None,
    };
    let dt = 1.0 / options.fps.max(1) as f64;
    let max_frames = ((duration + TAIL_SEC) / dt).ceil() as u64;

    for _ in 0..max_frames {
        match &source {
            Some(source) => source.advance(dt),
            None => thread::sleep(Duration::from_secs_f64(dt)),
        }
        core.tick();

        for lane in due_presses(&core, options.jitter_sec) {
            core.handle_command(Command::AttemptHit { lane })?;
        }

        for event in core.drain_events() {
            if let Event::SessionFinished { summary } = event {
                return Ok(summary);
            }
            log::debug!("{:?}", event);
        }
    }

    core.session()
        .and_then(|s| s.summary())
        .ok_or_else(|| anyhow!("session did not finish within {} frames", max_frames))
}

/// Lanes of active notes whose press time has come. Even-indexed notes are
/// pressed late by the jitter, odd ones early.
fn due_presses(core: &AppCore, jitter_sec: Seconds) -> Vec<Lane> {
    let Some(session) = core.session() else {
        return Vec::new();
    };
    let now = session.current_time();
    session
        .scheduler()
        .active_notes()
        .filter(|note| {
            let shift = if note.index % 2 == 0 { jitter_sec } else { -jitter_sec };
            now >= note.time_sec + shift
        })
        .map(|note| note.lane)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn songs_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("musicInfo.json"),
            r#"{"1.mp3": {"artist": "A", "title": "T"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("1.json"),
            r#"{"bpm": 120, "notes": [
                {"timeSec": 1.0, "lane": 0},
                {"timeSec": 1.5, "lane": 1},
                {"timeSec": 2.0, "lane": 0},
                {"timeSec": 2.0, "lane": 1}
            ]}"#,
        )
        .unwrap();
        dir
    }

    fn options(jitter_sec: Seconds) -> AutoplayOptions {
        AutoplayOptions {
            fps: 60,
            jitter_sec,
            offset_ms: 0,
            audio: AudioBackend::Virtual,
        }
    }

    #[test]
    fn autoplay_hits_every_note() {
        let dir = songs_dir();
        let library = FsSongLibrary::new(dir.path().to_path_buf());

        let summary = run(library, &SongId::from("1"), &options(0.0)).unwrap();

        assert_eq!(summary.great, 4);
        assert_eq!(summary.miss, 0);
        assert_eq!(summary.max_combo, 4);
    }

    #[test]
    fn wide_jitter_degrades_to_good() {
        let dir = songs_dir();
        let library = FsSongLibrary::new(dir.path().to_path_buf());

        let summary = run(library, &SongId::from("1"), &options(0.15)).unwrap();

        assert_eq!(summary.great + summary.good, 4);
        assert!(summary.good > 0);
        assert_eq!(summary.miss, 0);
    }

    #[test]
    fn missing_chart_is_an_error() {
        let dir = songs_dir();
        let library = FsSongLibrary::new(dir.path().to_path_buf());

        assert!(run(library, &SongId::from("2"), &options(0.0)).is_err());
    }
}
