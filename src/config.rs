use crate::{
    constants::{
        DETECTOR_DEFAULT_CHANNELS, DETECTOR_DEFAULT_DANGER_THRESHOLD, DETECTOR_DEFAULT_SAMPLE_RATE,
        DETECTOR_DEFAULT_THRESHOLD, FEATURE_EXTRACTOR_FRAME_LENGTH_MS,
        FEATURE_EXTRACTOR_FRAME_SHIFT_MS, FEATURE_EXTRACTOR_NUM_COEFFICIENT,
        FEATURE_EXTRACTOR_PRE_EMPHASIS, FEATURE_EXTRACTOR_SEGMENTS,
    },
    DetectionError,
};
/// Audio format the pipeline works with.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct AudioFmt {
    /// Sample rate required by the feature extractor.
    /// The decoder rejects (or resamples) anything else.
    pub sample_rate: u32,
    /// Number of interleaved channels required by the feature extractor.
    pub channels: u16,
}
impl Default for AudioFmt {
    fn default() -> AudioFmt {
        AudioFmt {
            sample_rate: DETECTOR_DEFAULT_SAMPLE_RATE,
            channels: DETECTOR_DEFAULT_CHANNELS,
        }
    }
}
/// Configures the mfcc feature extraction.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Analysis window length.
    pub frame_length_ms: usize,
    /// Distance between consecutive analysis windows.
    pub frame_shift_ms: usize,
    /// Number of mel filters. The first cepstral coefficient is discarded,
    /// so each frame yields one value less.
    pub num_coefficients: usize,
    /// Pre-emphasis filter coefficient.
    pub pre_emphasis: f32,
    /// Number of time segments the frames are pooled into.
    pub segments: usize,
}
impl ExtractorConfig {
    /// Length of the feature vectors produced with this configuration.
    pub fn dimensionality(&self) -> usize {
        self.segments * self.num_coefficients.saturating_sub(1)
    }
}
impl Default for ExtractorConfig {
    fn default() -> ExtractorConfig {
        ExtractorConfig {
            frame_length_ms: FEATURE_EXTRACTOR_FRAME_LENGTH_MS,
            frame_shift_ms: FEATURE_EXTRACTOR_FRAME_SHIFT_MS,
            num_coefficients: FEATURE_EXTRACTOR_NUM_COEFFICIENT,
            pre_emphasis: FEATURE_EXTRACTOR_PRE_EMPHASIS,
            segments: FEATURE_EXTRACTOR_SEGMENTS,
        }
    }
}
/// Configures how inference scores become detections.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct DetectorConfig {
    /// Minimum score reported as detected. A score equal to it counts.
    pub threshold: f32,
    /// Minimum score reported with the danger detection type.
    pub danger_threshold: f32,
}
impl Default for DetectorConfig {
    fn default() -> DetectorConfig {
        DetectorConfig {
            threshold: DETECTOR_DEFAULT_THRESHOLD,
            danger_threshold: DETECTOR_DEFAULT_DANGER_THRESHOLD,
        }
    }
}
/// Encapsulates all the service configurations.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Default)]
pub struct DetectionConfig {
    /// Configures expected audio format.
    pub fmt: AudioFmt,
    /// Configures feature extraction.
    pub extractor: ExtractorConfig,
    /// Configures detection.
    pub detector: DetectorConfig,
    /// Model file loaded when the service starts.
    pub model_path: Option<String>,
}
fn invalid(msg: &str) -> Result<(), DetectionError> {
    Err(DetectionError::InvalidConfig(msg.to_string()))
}
impl AudioFmt {
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.sample_rate == 0 {
            return invalid("sample rate must be greater than zero");
        }
        if self.channels == 0 {
            return invalid("channels must be greater than zero");
        }
        Ok(())
    }
}
impl ExtractorConfig {
    /// Checks the framing is usable at the provided audio format.
    pub fn validate(&self, fmt: &AudioFmt) -> Result<(), DetectionError> {
        fmt.validate()?;
        if self.segments == 0 {
            return invalid("segments must be greater than zero");
        }
        if self.num_coefficients < 2 {
            return invalid("at least two coefficients are required");
        }
        if self.frame_shift_ms == 0 || self.frame_shift_ms > self.frame_length_ms {
            return invalid("frame shift must be in range 1 - frame length");
        }
        if (fmt.sample_rate as usize * self.frame_shift_ms) < 1000 {
            return invalid("frame shift is shorter than one sample");
        }
        if (fmt.sample_rate as usize * self.frame_length_ms) < 2000 {
            return invalid("frame length is shorter than two samples");
        }
        Ok(())
    }
}
impl DetectionConfig {
    pub fn validate(&self) -> Result<(), DetectionError> {
        self.extractor.validate(&self.fmt)?;
        if !(0. ..=1.).contains(&self.detector.threshold) {
            return invalid("threshold must be in range 0 - 1");
        }
        if !(0. ..=1.).contains(&self.detector.danger_threshold)
            || self.detector.danger_threshold < self.detector.threshold
        {
            return invalid("danger threshold must be in range threshold - 1");
        }
        Ok(())
    }
}
