use std::sync::Arc;

/// A decoded stereo track. Channels are padded to the same length.
#[derive(Clone, Debug)]
pub struct PcmTrack {
    sample_rate_hz: u32,
    left: Arc<[f32]>,
    right: Arc<[f32]>,
}

impl PcmTrack {
    pub fn new(sample_rate_hz: u32, mut left: Vec<f32>, mut right: Vec<f32>) -> Self {
        let frames = left.len().max(right.len());
        left.resize(frames, 0.0);
        right.resize(frames, 0.0);
        Self {
            sample_rate_hz: sample_rate_hz.max(1),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Splits interleaved samples. Mono is duplicated to both sides; channels
    /// past the second are ignored.
    pub fn from_interleaved(sample_rate_hz: u32, channels: u16, samples: &[f32]) -> Self {
        let channels = channels.max(1) as usize;
        let frames = samples.len() / channels;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(channels) {
            left.push(frame[0]);
            right.push(if channels > 1 { frame[1] } else { frame[0] });
        }
        Self::new(sample_rate_hz, left, right)
    }

    pub fn silent(sample_rate_hz: u32, duration_sec: f64) -> Self {
        let frames = (duration_sec.max(0.0) * sample_rate_hz as f64).round() as usize;
        Self::new(sample_rate_hz, vec![0.0; frames], vec![0.0; frames])
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn duration_sec(&self) -> f64 {
        self.frames() as f64 / self.sample_rate_hz as f64
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }
}
