/// Cepstral mean normalization.
pub(crate) struct FeatureNormalizer {}
impl FeatureNormalizer {
    /// Subtracts from every coefficient its mean over all the frames.
    pub fn normalize(mut frames: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
        let num_frames = frames.len();
        if num_frames == 0 {
            return frames;
        }
        let num_features = frames[0].len();
        let mut means = vec![0.; num_features];
        for frame in frames.iter() {
            for (mean, value) in means.iter_mut().zip(frame.iter()) {
                *mean += value;
            }
        }
        for mean in means.iter_mut() {
            *mean /= num_frames as f32;
        }
        for frame in frames.iter_mut() {
            for (value, mean) in frame.iter_mut().zip(means.iter()) {
                *value -= mean;
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_centers_each_coefficient() {
        let frames = vec![vec![1., 10.], vec![3., 20.]];
        assert_eq!(
            FeatureNormalizer::normalize(frames),
            vec![vec![-1., -5.], vec![1., 5.]]
        );
    }

    #[test]
    fn it_keeps_empty_input_empty() {
        assert!(FeatureNormalizer::normalize(Vec::new()).is_empty());
    }
}
