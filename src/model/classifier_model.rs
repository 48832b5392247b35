use savefile_derive::Savefile;

use crate::DetectionError;

/// Persisted form of a feed-forward classifier.
#[derive(Savefile, Clone, Debug, PartialEq)]
pub struct ClassifierModel {
    /// Free form version identifier reported with every detection.
    pub version: String,
    /// Output labels, one per unit of the last layer.
    pub labels: Vec<String>,
    /// Label meaning nothing was detected, if the model has one.
    pub background_label: Option<String>,
    /// Expected feature vector length.
    pub input_size: usize,
    pub layers: Vec<DenseLayer>,
}

/// Fully connected layer. Weights are stored row-major, one row per output.
#[derive(Savefile, Clone, Debug, PartialEq)]
pub struct DenseLayer {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

impl DenseLayer {
    pub fn new(inputs: usize, outputs: usize, weights: Vec<f32>, biases: Vec<f32>) -> Self {
        DenseLayer {
            inputs,
            outputs,
            weights,
            biases,
        }
    }
    /// Layer with all weights and biases set to zero.
    pub fn zeroed(inputs: usize, outputs: usize) -> Self {
        Self::new(inputs, outputs, vec![0.; inputs * outputs], vec![0.; outputs])
    }
}

impl ClassifierModel {
    /// Checks labels and layer shapes are consistent.
    pub fn validate(&self) -> Result<(), DetectionError> {
        let invalid = |msg: String| Err(DetectionError::ModelUnavailable(msg));
        if self.labels.is_empty() {
            return invalid("model declares no labels".to_string());
        }
        let mut sorted_labels = self.labels.clone();
        sorted_labels.sort();
        sorted_labels.dedup();
        if sorted_labels.len() != self.labels.len() {
            return invalid("model labels are not unique".to_string());
        }
        if let Some(background_label) = &self.background_label {
            if !self.labels.contains(background_label) {
                return invalid(format!(
                    "background label \"{}\" is not a model label",
                    background_label
                ));
            }
        }
        if self.layers.is_empty() {
            return invalid("model has no layers".to_string());
        }
        let mut inputs = self.input_size;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.inputs != inputs {
                return invalid(format!(
                    "layer {} expects {} inputs, previous size is {}",
                    index, layer.inputs, inputs
                ));
            }
            if layer.outputs == 0 {
                return invalid(format!("layer {} has no outputs", index));
            }
            if layer.weights.len() != layer.inputs * layer.outputs
                || layer.biases.len() != layer.outputs
            {
                return invalid(format!("layer {} parameters do not match its shape", index));
            }
            if layer
                .weights
                .iter()
                .chain(layer.biases.iter())
                .any(|value| !value.is_finite())
            {
                return invalid(format!("layer {} has non finite parameters", index));
            }
            inputs = layer.outputs;
        }
        if inputs != self.labels.len() {
            return invalid(format!(
                "model has {} outputs for {} labels",
                inputs,
                self.labels.len()
            ));
        }
        Ok(())
    }
}
