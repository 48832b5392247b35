pub const DETECTOR_DEFAULT_SAMPLE_RATE: u32 = 16000;
pub const DETECTOR_DEFAULT_CHANNELS: u16 = 1;
pub const DETECTOR_DEFAULT_THRESHOLD: f32 = 0.5;
pub const DETECTOR_DEFAULT_DANGER_THRESHOLD: f32 = 0.9;
pub const FEATURE_EXTRACTOR_FRAME_LENGTH_MS: usize = 30;
pub const FEATURE_EXTRACTOR_FRAME_SHIFT_MS: usize = 10;
pub const FEATURE_EXTRACTOR_NUM_COEFFICIENT: usize = 16;
pub const FEATURE_EXTRACTOR_PRE_EMPHASIS: f32 = 0.97;
pub const FEATURE_EXTRACTOR_SEGMENTS: usize = 8;
pub const MODEL_FILE_VERSION: u32 = 0;
pub const SERVICE_NAME: &str = "audio_detection";
