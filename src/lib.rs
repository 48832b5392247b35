mod audio;
mod config;
mod constants;
mod error;
mod features;
mod inference;
mod model;
mod result;
mod service;
pub use audio::AudioBuffer;
pub use audio::AudioDecoder;
pub use audio::Container;
pub use config::AudioFmt;
pub use config::DetectionConfig;
pub use config::DetectorConfig;
pub use config::ExtractorConfig;
pub use constants::SERVICE_NAME;
pub use error::{DetectionError, Result};
pub use features::{FeatureExtractor, FeatureVector};
pub use inference::{InferenceEngine, InferenceOutput};
pub use model::{ClassifierModel, DenseLayer, Model};
pub use result::{DetectionContext, DetectionResult, DetectionType, ResultAssembler};
pub use service::{
    Availability, DetectionResponse, DetectionService, Health, HealthStatus, ServiceStatus,
};
