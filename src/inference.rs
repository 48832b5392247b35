use std::{path::Path, sync::Arc};

use arc_swap::ArcSwapOption;
use log::{debug, warn};

use crate::{
    features::FeatureVector,
    model::{ClassifierModel, Model},
    DetectionError,
};

/// Classifier output for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutput {
    /// Most probable label, ties resolved by the smallest label name.
    pub label: String,
    /// Probability that a non background label applies, in range 0 - 1.
    pub score: f32,
    /// Version of the model that produced the output.
    pub model_version: String,
}

/// Runs the installed model.
///
/// The model is swapped atomically: calls in flight keep the snapshot they
/// started with, so reloading never exposes a partially updated model.
pub struct InferenceEngine {
    model: ArcSwapOption<Model>,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceEngine {
    /// Creates an engine without a model, every inference fails until one is installed.
    pub fn new() -> Self {
        InferenceEngine {
            model: ArcSwapOption::empty(),
        }
    }
    /// Reads a model file and installs it.
    ///
    /// On failure the previously installed model, if any, is kept.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Model>, DetectionError> {
        let path = path.as_ref();
        ClassifierModel::load_from_file(path)
            .and_then(|classifier| self.install(classifier))
            .map_err(|err| {
                warn!("Unable to load model {}: {}", path.display(), err);
                err
            })
    }
    /// Validates and installs a model, replacing the current one.
    pub fn install(&self, classifier: ClassifierModel) -> Result<Arc<Model>, DetectionError> {
        let model = Arc::new(Model::new(classifier)?);
        let previous = self.model.swap(Some(model.clone()));
        debug!(
            "model {} installed (replaces {:?})",
            model.version(),
            previous.as_ref().map(|previous| previous.version())
        );
        Ok(model)
    }
    /// Removes the installed model.
    pub fn unload(&self) {
        self.model.store(None);
    }
    /// Snapshot of the installed model.
    pub fn model(&self) -> Option<Arc<Model>> {
        self.model.load_full()
    }
    pub fn is_ready(&self) -> bool {
        self.model.load().is_some()
    }
    pub fn infer(&self, features: &FeatureVector) -> Result<InferenceOutput, DetectionError> {
        let model = self.model().ok_or_else(|| {
            DetectionError::ModelUnavailable("no model has been loaded".to_string())
        })?;
        if features.len() != model.input_size() {
            return Err(DetectionError::DimensionMismatch {
                expected: model.input_size(),
                found: features.len(),
            });
        }
        let probabilities = model.predict(features.values());
        Ok(InferenceOutput {
            label: select_label(model.labels(), &probabilities).to_string(),
            score: positive_score(&model, &probabilities),
            model_version: model.version().to_string(),
        })
    }
}

fn select_label<'a>(labels: &'a [String], probabilities: &[f32]) -> &'a str {
    labels
        .iter()
        .zip(probabilities.iter())
        .min_by(|(label_a, prob_a), (label_b, prob_b)| {
            prob_b.total_cmp(prob_a).then_with(|| label_a.cmp(label_b))
        })
        .map(|(label, _)| label.as_str())
        .unwrap_or_default()
}

fn positive_score(model: &Model, probabilities: &[f32]) -> f32 {
    let score = match model.background_label() {
        Some(background_label) => model
            .labels()
            .iter()
            .zip(probabilities.iter())
            .filter(|(label, _)| label.as_str() != background_label)
            .map(|(_, prob)| prob)
            .sum::<f32>(),
        None => probabilities.iter().copied().fold(0., f32::max),
    };
    if score.is_nan() {
        0.
    } else {
        score.clamp(0., 1.)
    }
}
