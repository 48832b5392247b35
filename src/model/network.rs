use simple_matrix::Matrix;

use crate::DetectionError;

use super::ClassifierModel;

struct Layer {
    inputs: usize,
    outputs: usize,
    weights: Matrix<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn forward(&self, input: &[f32]) -> Vec<f32> {
        (0..self.outputs)
            .map(|row| {
                (0..self.inputs).fold(self.biases[row], |acc, column| {
                    acc + self.weights.get(row, column).unwrap_or(&0.) * input[column]
                })
            })
            .collect()
    }
}

/// A loaded classifier, immutable while serving.
pub struct Model {
    version: String,
    labels: Vec<String>,
    background_label: Option<String>,
    input_size: usize,
    layers: Vec<Layer>,
}

impl Model {
    /// Validates the persisted model and builds its weight matrices.
    pub fn new(classifier: ClassifierModel) -> Result<Self, DetectionError> {
        classifier.validate()?;
        let layers = classifier
            .layers
            .into_iter()
            .map(|layer| Layer {
                inputs: layer.inputs,
                outputs: layer.outputs,
                weights: Matrix::from_iter(layer.outputs, layer.inputs, layer.weights.into_iter()),
                biases: layer.biases,
            })
            .collect();
        Ok(Model {
            version: classifier.version,
            labels: classifier.labels,
            background_label: classifier.background_label,
            input_size: classifier.input_size,
            layers,
        })
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn background_label(&self) -> Option<&str> {
        self.background_label.as_deref()
    }
    /// Declared feature vector length.
    pub fn input_size(&self) -> usize {
        self.input_size
    }
    /// Runs the network, returning one probability per label.
    /// The input length must match [`Model::input_size`].
    pub(crate) fn predict(&self, input: &[f32]) -> Vec<f32> {
        let last = self.layers.len() - 1;
        let logits = self
            .layers
            .iter()
            .enumerate()
            .fold(input.to_vec(), |activations, (index, layer)| {
                let output = layer.forward(&activations);
                if index == last {
                    output
                } else {
                    output.into_iter().map(|value| value.max(0.)).collect()
                }
            });
        softmax(&logits)
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits
        .iter()
        .map(|logit| (logit - max).exp())
        .collect::<Vec<_>>();
    let sum = exps.iter().sum::<f32>();
    exps.into_iter().map(|exp| exp / sum).collect()
}
