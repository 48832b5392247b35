use log::debug;

use crate::{
    audio::AudioBuffer,
    config::{AudioFmt, ExtractorConfig},
    DetectionError,
};

use super::{FeatureNormalizer, MfccExtractor};

/// Fixed length model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        FeatureVector(values)
    }
    pub fn values(&self) -> &[f32] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

/// Turns decoded audio into fixed length feature vectors.
///
/// Mfcc frames are mean normalized and then averaged into a fixed number of time
/// segments, so the output length does not depend on the clip duration.
pub struct FeatureExtractor {
    sample_rate: u32,
    channels: u16,
    segments: usize,
    mfcc_extractor: MfccExtractor,
}

impl FeatureExtractor {
    /// Fails with `InvalidConfig` when the framing can not be applied to the format.
    pub fn new(fmt: &AudioFmt, config: &ExtractorConfig) -> Result<Self, DetectionError> {
        config.validate(fmt)?;
        let sample_rate = fmt.sample_rate as usize;
        let samples_per_frame = sample_rate * config.frame_length_ms / 1000;
        let samples_per_shift = sample_rate * config.frame_shift_ms / 1000;
        Ok(FeatureExtractor {
            sample_rate: fmt.sample_rate,
            channels: fmt.channels,
            segments: config.segments,
            mfcc_extractor: MfccExtractor::new(
                fmt.sample_rate as usize,
                samples_per_frame,
                samples_per_shift,
                config.num_coefficients,
                config.pre_emphasis,
            ),
        })
    }
    /// Length of every vector returned by [`FeatureExtractor::extract`].
    pub fn dimensionality(&self) -> usize {
        self.segments * self.mfcc_extractor.frame_size()
    }
    pub fn extract(&self, audio: &AudioBuffer) -> Result<FeatureVector, DetectionError> {
        if audio.sample_rate() != self.sample_rate || audio.channels() != self.channels {
            return Err(DetectionError::IncompatibleAudioFormat(format!(
                "expected {}hz with {} channels, got {}hz with {} channels",
                self.sample_rate,
                self.channels,
                audio.sample_rate(),
                audio.channels()
            )));
        }
        if audio.is_empty() {
            return Err(DetectionError::EmptyInput);
        }
        let frames = FeatureNormalizer::normalize(self.mfcc_extractor.compute(&audio.to_mono()));
        let features = pool_segments(&frames, self.segments, self.mfcc_extractor.frame_size());
        debug!(
            "extracted {} features from {} frames",
            features.len(),
            frames.len()
        );
        Ok(FeatureVector(features))
    }
}

/// Averages the frames into `segments` contiguous groups and concatenates the means.
/// When there are fewer frames than segments some frames feed several segments.
fn pool_segments(frames: &[Vec<f32>], segments: usize, frame_size: usize) -> Vec<f32> {
    let num_frames = frames.len();
    let mut pooled = Vec::with_capacity(segments * frame_size);
    for segment in 0..segments {
        let start = (segment * num_frames / segments).min(num_frames - 1);
        let end = ((segment + 1) * num_frames / segments).max(start + 1);
        let group = &frames[start..end];
        for j in 0..frame_size {
            pooled.push(group.iter().map(|frame| frame[j]).sum::<f32>() / group.len() as f32);
        }
    }
    pooled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(&AudioFmt::default(), &ExtractorConfig::default()).unwrap()
    }

    fn noise(len: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 8) as f32 / (1 << 24) as f32 - 0.5
            })
            .collect()
    }

    #[test]
    fn it_always_returns_the_configured_dimensionality() {
        let extractor = extractor();
        assert_eq!(extractor.dimensionality(), 120);
        for len in [1, 100, 480, 481, 1600, 16000, 48000] {
            let audio = AudioBuffer::new(noise(len, len as u32), 16000, 1).unwrap();
            assert_eq!(extractor.extract(&audio).unwrap().len(), 120, "len {}", len);
        }
    }

    #[test]
    fn it_is_bit_identical_between_calls() {
        let extractor = extractor();
        let audio = AudioBuffer::new(noise(8000, 7), 16000, 1).unwrap();
        let first = extractor.extract(&audio).unwrap();
        let second = extractor.extract(&audio).unwrap();
        assert_eq!(
            first.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn it_rejects_empty_audio() {
        let audio = AudioBuffer::new(Vec::new(), 16000, 1).unwrap();
        assert_eq!(extractor().extract(&audio), Err(DetectionError::EmptyInput));
    }

    #[test]
    fn it_rejects_mismatched_formats() {
        let audio = AudioBuffer::new(vec![0.; 800], 8000, 1).unwrap();
        assert!(matches!(
            extractor().extract(&audio),
            Err(DetectionError::IncompatibleAudioFormat(_))
        ));
        let audio = AudioBuffer::new(vec![0.; 800], 16000, 2).unwrap();
        assert!(matches!(
            extractor().extract(&audio),
            Err(DetectionError::IncompatibleAudioFormat(_))
        ));
    }

    #[test]
    fn it_downmixes_configured_stereo_input() {
        let fmt = AudioFmt {
            sample_rate: 16000,
            channels: 2,
        };
        let extractor = FeatureExtractor::new(&fmt, &ExtractorConfig::default()).unwrap();
        let mono = noise(4000, 3);
        let stereo = mono.iter().flat_map(|s| [*s, *s]).collect::<Vec<_>>();
        let features = extractor
            .extract(&AudioBuffer::new(stereo, 16000, 2).unwrap())
            .unwrap();
        let expected = self::extractor()
            .extract(&AudioBuffer::new(mono, 16000, 1).unwrap())
            .unwrap();
        assert_eq!(features, expected);
    }

    #[test]
    fn it_refuses_unusable_framing() {
        let config = ExtractorConfig {
            num_coefficients: 0,
            ..Default::default()
        };
        assert!(matches!(
            FeatureExtractor::new(&AudioFmt::default(), &config),
            Err(DetectionError::InvalidConfig(_))
        ));
        let fmt = AudioFmt {
            sample_rate: 20,
            channels: 1,
        };
        assert!(matches!(
            FeatureExtractor::new(&fmt, &ExtractorConfig::default()),
            Err(DetectionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn it_pools_frames_into_segments() {
        let frames = vec![vec![1.], vec![3.], vec![5.], vec![7.]];
        assert_eq!(pool_segments(&frames, 2, 1), vec![2., 6.]);
        assert_eq!(pool_segments(&frames[0..1], 3, 1), vec![1., 1., 1.]);
    }
}
