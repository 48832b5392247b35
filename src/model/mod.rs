mod classifier_model;
mod model_file;
mod network;
pub use classifier_model::{ClassifierModel, DenseLayer};
pub use network::Model;
