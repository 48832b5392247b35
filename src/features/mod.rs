mod feature_extractor;
mod mfcc;
mod normalizer;
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub(crate) use mfcc::MfccExtractor;
pub(crate) use normalizer::FeatureNormalizer;
