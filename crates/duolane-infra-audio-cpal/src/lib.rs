mod track;

pub use track::PcmTrack;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig, SupportedStreamConfigRange};
use duolane_ports::audio::{AudioError, AudioPlayerPort, AudioSourcePort};
use duolane_ports::types::{Seconds, SongId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

/// Plays host-decoded tracks on a cpal output device.
pub struct CpalAudioPort {
    device_name: Option<String>,
    tracks: Mutex<HashMap<SongId, PcmTrack>>,
}

impl CpalAudioPort {
    /// Uses the host's default output device.
    pub fn new() -> Self {
        Self {
            device_name: None,
            tracks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_device_name(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
            tracks: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_track(&self, song: SongId, track: PcmTrack) {
        self.tracks.lock().insert(song, track);
    }

    pub fn output_device_names() -> Result<Vec<String>, AudioError> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        Ok(devices
            .map(|d| d.name().unwrap_or_else(|_| "Unknown Output".to_string()))
            .collect())
    }
}

impl Default for CpalAudioPort {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayerPort for CpalAudioPort {
    fn open_track(&self, song: &SongId) -> Result<Box<dyn AudioSourcePort>, AudioError> {
        let track = self
            .tracks
            .lock()
            .get(song)
            .cloned()
            .ok_or_else(|| AudioError::TrackNotFound(song.clone()))?;
        Ok(Box::new(CpalTrackSource::new(track, self.device_name.clone())))
    }
}

/// Written by the audio callback, read by the game thread.
#[derive(Default)]
struct PlaybackClock {
    frames: AtomicU64,
    playing: AtomicBool,
    ended: AtomicBool,
}

struct StreamHandle {
    stop_tx: mpsc::Sender<()>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

/// One track on one output stream. The position counts frames handed to the
/// device, so it runs ahead of what is audible by the output latency; the
/// session's clock offset absorbs that.
pub struct CpalTrackSource {
    track: PcmTrack,
    device_name: Option<String>,
    clock: Arc<PlaybackClock>,
    stream: Option<StreamHandle>,
}

impl CpalTrackSource {
    fn new(track: PcmTrack, device_name: Option<String>) -> Self {
        Self {
            track,
            device_name,
            clock: Arc::new(PlaybackClock::default()),
            stream: None,
        }
    }
}

impl AudioSourcePort for CpalTrackSource {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.stream.is_some() || self.clock.ended.load(Ordering::Acquire) {
            return Ok(());
        }
        if self.track.frames() == 0 {
            self.clock.ended.store(true, Ordering::Release);
            return Ok(());
        }
        let renderer = TrackRenderer::new(self.track.clone(), self.clock.clone());
        self.stream = Some(open_stream(
            self.device_name.clone(),
            self.track.sample_rate_hz(),
            renderer,
        )?);
        self.clock.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn position_sec(&self) -> Seconds {
        let frames = self.clock.frames.load(Ordering::Acquire);
        frames as f64 / self.track.sample_rate_hz() as f64
    }

    fn is_playing(&self) -> bool {
        self.clock.playing.load(Ordering::Acquire) && !self.clock.ended.load(Ordering::Acquire)
    }

    fn has_ended(&self) -> bool {
        self.clock.ended.load(Ordering::Acquire)
    }
}

struct TrackRenderer {
    track: PcmTrack,
    clock: Arc<PlaybackClock>,
    cursor: usize,
}

impl TrackRenderer {
    fn new(track: PcmTrack, clock: Arc<PlaybackClock>) -> Self {
        Self {
            track,
            clock,
            cursor: 0,
        }
    }

    /// Copies the next `left.len()` frames; silence past the end.
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let total = self.track.frames();
        let available = total.saturating_sub(self.cursor).min(left.len());
        let end = self.cursor + available;

        left[..available].copy_from_slice(&self.track.left()[self.cursor..end]);
        right[..available].copy_from_slice(&self.track.right()[self.cursor..end]);
        left[available..].fill(0.0);
        right[available..].fill(0.0);

        self.cursor = end;
        self.clock.frames.store(end as u64, Ordering::Release);
        if end >= total {
            self.clock.ended.store(true, Ordering::Release);
        }
    }
}

fn open_stream(
    device_name: Option<String>,
    sample_rate_hz: u32,
    renderer: TrackRenderer,
) -> Result<StreamHandle, AudioError> {
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    // cpal streams are not Send on every platform, so the stream lives and
    // dies on its own thread.
    let join_handle = thread::spawn(move || {
        let stream = match build_stream(device_name.as_deref(), sample_rate_hz, renderer) {
            Ok(stream) => stream,
            Err(err) => {
                let _ = ready_tx.send(Err(err));
                return;
            }
        };
        if let Err(err) = stream.play() {
            let _ = ready_tx.send(Err(AudioError::Backend(err.to_string())));
            return;
        }
        let _ = ready_tx.send(Ok(()));
        let _ = stop_rx.recv();
        drop(stream);
    });

    match ready_rx
        .recv()
        .map_err(|e| AudioError::Backend(e.to_string()))?
    {
        Ok(()) => Ok(StreamHandle {
            stop_tx,
            join_handle: Some(join_handle),
        }),
        Err(err) => {
            let _ = join_handle.join();
            Err(err)
        }
    }
}

fn find_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, AudioError> {
    match name {
        None => host
            .default_output_device()
            .ok_or_else(|| AudioError::DeviceUnavailable("no default output device".to_string())),
        Some(name) => host
            .output_devices()
            .map_err(|e| AudioError::Backend(e.to_string()))?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| AudioError::DeviceUnavailable(name.to_string())),
    }
}

fn build_stream(
    device_name: Option<&str>,
    sample_rate_hz: u32,
    renderer: TrackRenderer,
) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = find_device(&host, device_name)?;
    let mut supported = device
        .supported_output_configs()
        .map_err(|e| AudioError::Backend(e.to_string()))?;
    let chosen = select_supported_config(&mut supported, sample_rate_hz)?;

    let sample_format = chosen.sample_format();
    let mut config = chosen.config();
    config.buffer_size = BufferSize::Default;

    let stream = match sample_format {
        SampleFormat::F32 => {
            build_typed_stream::<f32, _>(&device, &config, renderer, write_interleaved_f32)
        }
        SampleFormat::I16 => {
            build_typed_stream::<i16, _>(&device, &config, renderer, write_interleaved_i16)
        }
        SampleFormat::U16 => {
            build_typed_stream::<u16, _>(&device, &config, renderer, write_interleaved_u16)
        }
        other => {
            return Err(AudioError::UnsupportedConfig(format!(
                "sample format {:?}",
                other
            )))
        }
    };
    stream.map_err(|e| AudioError::Backend(e.to_string()))
}

fn build_typed_stream<T, W>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: TrackRenderer,
    write: W,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    W: Fn(&mut [T], usize, &[f32], &[f32]) + Send + 'static,
{
    let channels = config.channels as usize;
    let mut left: Vec<f32> = vec![0.0; 8192];
    let mut right: Vec<f32> = vec![0.0; 8192];

    device.build_output_stream(
        config,
        move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
            let frames = data.len() / channels.max(1);
            if frames > left.len() {
                left.resize(frames, 0.0);
                right.resize(frames, 0.0);
            }
            renderer.render(&mut left[..frames], &mut right[..frames]);
            write(data, channels, &left[..frames], &right[..frames]);
        },
        |err| log::error!("cpal stream error: {}", err),
        None,
    )
}

fn select_supported_config(
    supported: &mut dyn Iterator<Item = SupportedStreamConfigRange>,
    sample_rate_hz: u32,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let mut best: Option<cpal::SupportedStreamConfig> = None;
    let mut best_score: i32 = -1;

    for config_range in supported {
        let min = config_range.min_sample_rate().0;
        let max = config_range.max_sample_rate().0;
        if sample_rate_hz < min || sample_rate_hz > max {
            continue;
        }

        let format_score = match config_range.sample_format() {
            SampleFormat::F32 => 3,
            SampleFormat::I16 => 2,
            SampleFormat::U16 => 1,
            _ => continue,
        };
        // Stereo first, then mono, then anything wider.
        let channel_score = match config_range.channels() {
            2 => 20,
            1 => 10,
            _ => 0,
        };
        let score = channel_score + format_score;

        if score > best_score {
            best = Some(config_range.with_sample_rate(SampleRate(sample_rate_hz)));
            best_score = score;
        }
    }

    best.ok_or_else(|| {
        AudioError::UnsupportedConfig(format!("no output config at {} Hz", sample_rate_hz))
    })
}

fn write_interleaved_f32(data: &mut [f32], channels: usize, left: &[f32], right: &[f32]) {
    write_interleaved(data, channels, left, right, |v| v, 0.0);
}

fn write_interleaved_i16(data: &mut [i16], channels: usize, left: &[f32], right: &[f32]) {
    write_interleaved(data, channels, left, right, f32_to_i16, 0);
}

fn write_interleaved_u16(data: &mut [u16], channels: usize, left: &[f32], right: &[f32]) {
    write_interleaved(data, channels, left, right, f32_to_u16, u16::MAX / 2);
}

fn write_interleaved<T: Copy>(
    data: &mut [T],
    channels: usize,
    left: &[f32],
    right: &[f32],
    convert: impl Fn(f32) -> T,
    silence: T,
) {
    if channels == 0 {
        return;
    }
    for (frame, out) in data.chunks_exact_mut(channels).enumerate() {
        let l = left.get(frame).copied().unwrap_or(0.0);
        let r = right.get(frame).copied().unwrap_or(0.0);
        if channels == 1 {
            out[0] = convert((l + r) * 0.5);
            continue;
        }
        out[0] = convert(l);
        out[1] = convert(r);
        for sample in &mut out[2..] {
            *sample = silence;
        }
    }
}

fn f32_to_i16(value: f32) -> i16 {
    let v = value.clamp(-1.0, 1.0);
    (v * i16::MAX as f32) as i16
}

fn f32_to_u16(value: f32) -> u16 {
    let v = value.clamp(-1.0, 1.0);
    let scaled = (v * 0.5 + 0.5) * u16::MAX as f32;
    scaled.round().clamp(0.0, u16::MAX as f32) as u16
}
