use std::time::Duration;

use crate::DetectionError;

/// Decoded pcm audio.
///
/// Samples are interleaved and normalized to the range -1 - 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Creates a buffer, checking the sample count is a whole number of frames.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self, DetectionError> {
        if sample_rate == 0 {
            return Err(DetectionError::CorruptInput(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        if channels == 0 {
            return Err(DetectionError::CorruptInput(
                "channel count must be greater than zero".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(DetectionError::CorruptInput(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(AudioBuffer {
            samples,
            sample_rate,
            channels,
        })
    }
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    pub fn channels(&self) -> u16 {
        self.channels
    }
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }
    /// Averages the channels of each frame into a single sample.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels == 1 {
            return self.samples.clone();
        }
        let channels = self.channels as usize;
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}
