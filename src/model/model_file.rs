use std::{fs, path::Path};

use savefile::prelude::{load_from_mem, save_to_mem};

use crate::{constants::MODEL_FILE_VERSION, DetectionError};

use super::ClassifierModel;

impl ClassifierModel {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let bytes = self.save_to_buffer()?;
        fs::write(path, bytes)
            .map_err(|err| format!("Unable to write file {}: {}", path.display(), err))
    }
    pub fn save_to_buffer(&self) -> Result<Vec<u8>, String> {
        save_to_mem(MODEL_FILE_VERSION, self).map_err(|err| format!("{:?}", err))
    }
    /// Reads and validates a model file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectionError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            DetectionError::ModelUnavailable(format!(
                "Unable to open file {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::load_from_buffer(&bytes)
    }
    /// Decodes and validates a model.
    pub fn load_from_buffer(buffer: &[u8]) -> Result<Self, DetectionError> {
        let model: ClassifierModel = load_from_mem(buffer, MODEL_FILE_VERSION).map_err(|err| {
            DetectionError::ModelUnavailable(format!("Unable to decode model: {:?}", err))
        })?;
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DenseLayer;

    fn model() -> ClassifierModel {
        ClassifierModel {
            version: "2024.1".to_string(),
            labels: vec!["dog".to_string(), "cat".to_string()],
            background_label: None,
            input_size: 2,
            layers: vec![DenseLayer::new(
                2,
                2,
                vec![0.5, -1., 2., 0.25],
                vec![0.1, -0.1],
            )],
        }
    }

    #[test]
    fn it_writes_and_reads_model_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.adm");
        model().save_to_file(&path).unwrap();
        assert_eq!(ClassifierModel::load_from_file(&path).unwrap(), model());
    }

    #[test]
    fn it_reports_missing_files_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClassifierModel::load_from_file(dir.path().join("missing.adm"));
        assert!(matches!(result, Err(DetectionError::ModelUnavailable(_))));
    }

    #[test]
    fn it_rejects_garbage_buffers() {
        let result = ClassifierModel::load_from_buffer(b"definitely not a model");
        assert!(matches!(result, Err(DetectionError::ModelUnavailable(_))));
    }

    #[test]
    fn it_validates_decoded_models() {
        let mut broken = model();
        broken.input_size = 3;
        let bytes = broken.save_to_buffer().unwrap();
        assert!(ClassifierModel::load_from_buffer(&bytes).is_err());
    }
}
