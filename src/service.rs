use std::{path::Path, sync::Arc, time::Instant};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    audio::AudioDecoder,
    constants::SERVICE_NAME,
    features::FeatureExtractor,
    inference::InferenceEngine,
    model::{ClassifierModel, Model},
    result::{DetectionContext, DetectionResult, ResultAssembler},
    DetectionConfig, DetectionError,
};

const DETECTION_SUCCESS_MESSAGE: &str = "Detection completed successfully";
const DETECTION_FAILURE_MESSAGE: &str = "Detection failed";

/// Envelope handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<DetectionResult>,
}
impl DetectionResponse {
    /// Transport status: 200 on success, 500 for any pipeline failure.
    pub fn status_code(&self) -> u16 {
        if self.success {
            200
        } else {
            500
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Operational,
    Unavailable,
}

/// Whether detections can currently be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub status: Availability,
    pub service: &'static str,
    pub model_version: Option<String>,
}

/// Process wide detection handle.
///
/// Build it once at startup and share it by reference with the request handlers,
/// it is `Send + Sync` and every call is independent.
pub struct DetectionService {
    decoder: AudioDecoder,
    extractor: FeatureExtractor,
    engine: InferenceEngine,
    assembler: ResultAssembler,
}

impl DetectionService {
    /// Validates the configuration and loads the configured model.
    ///
    /// A model that fails to load does not fail construction, the service
    /// reports itself unavailable until a model is installed.
    pub fn new(config: &DetectionConfig) -> Result<Self, DetectionError> {
        config.validate()?;
        let service = DetectionService {
            decoder: AudioDecoder::new(config.fmt.sample_rate),
            extractor: FeatureExtractor::new(&config.fmt, &config.extractor)?,
            engine: InferenceEngine::new(),
            assembler: ResultAssembler::new(&config.detector),
        };
        if let Some(model_path) = &config.model_path {
            // failure already logged by the engine
            let _ = service.load_model(model_path);
        }
        Ok(service)
    }
    /// Loads a model file, atomically replacing the current model on success.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Model>, DetectionError> {
        let model = self.engine.load(path)?;
        self.check_model(&model);
        Ok(model)
    }
    /// Installs an in memory model, atomically replacing the current one.
    pub fn install_model(&self, classifier: ClassifierModel) -> Result<Arc<Model>, DetectionError> {
        let model = self.engine.install(classifier)?;
        self.check_model(&model);
        Ok(model)
    }
    fn check_model(&self, model: &Model) {
        if model.input_size() != self.extractor.dimensionality() {
            warn!(
                "model {} expects {} features but the extractor produces {}, detections will fail",
                model.version(),
                model.input_size(),
                self.extractor.dimensionality()
            );
        }
    }
    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }
    /// Runs the full pipeline over an uploaded file.
    pub fn run_detection(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
    ) -> Result<DetectionResult, DetectionError> {
        let started = Instant::now();
        info!(
            "Processing detection for file: {} ({} bytes)",
            filename.unwrap_or("<unnamed>"),
            bytes.len()
        );
        let audio = self.decoder.decode(bytes, filename)?;
        debug!(
            "decoded {} frames ({:?})",
            audio.frames(),
            audio.duration()
        );
        let features = self.extractor.extract(&audio)?;
        let output = self.engine.infer(&features)?;
        let result = self.assembler.assemble(
            &output,
            &DetectionContext {
                filename,
                size_bytes: bytes.len(),
                elapsed: started.elapsed(),
            },
        );
        info!(
            "Detection completed: label {}, confidence {}, detected {}",
            output.label, result.confidence, result.detected
        );
        Ok(result)
    }
    /// Runs the pipeline and wraps the outcome in the response envelope.
    /// Failures are reduced to a generic message.
    pub fn detect(&self, bytes: &[u8], filename: Option<&str>) -> DetectionResponse {
        match self.run_detection(bytes, filename) {
            Ok(result) => DetectionResponse {
                success: true,
                message: DETECTION_SUCCESS_MESSAGE.to_string(),
                data: Some(result),
            },
            Err(err) => {
                warn!("Detection failed for {:?}: {}", filename, err);
                DetectionResponse {
                    success: false,
                    message: DETECTION_FAILURE_MESSAGE.to_string(),
                    data: None,
                }
            }
        }
    }
    /// The process is running.
    pub fn liveness(&self) -> HealthStatus {
        HealthStatus {
            status: Health::Healthy,
        }
    }
    /// A model is installed and detections can be served.
    pub fn readiness(&self) -> HealthStatus {
        HealthStatus {
            status: if self.engine.is_ready() {
                Health::Healthy
            } else {
                Health::Unhealthy
            },
        }
    }
    pub fn status(&self) -> ServiceStatus {
        let model = self.engine.model();
        ServiceStatus {
            status: if model.is_some() {
                Availability::Operational
            } else {
                Availability::Unavailable
            },
            service: SERVICE_NAME,
            model_version: model.map(|model| model.version().to_string()),
        }
    }
}
