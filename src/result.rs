use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;
use serde_json::Value;

use crate::{config::DetectorConfig, inference::InferenceOutput};

/// Severity attached to a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionType {
    Info,
    Warning,
    Danger,
}
impl DetectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionType::Info => "info",
            DetectionType::Warning => "warning",
            DetectionType::Danger => "danger",
        }
    }
}
impl std::fmt::Display for DetectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
impl std::str::FromStr for DetectionType {
    type Err = String;
    /// Unknown values map to info.
    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Self::Warning),
            "danger" | "critical" => Ok(Self::Danger),
            _ => Ok(Self::Info),
        }
    }
}

/// Request facts the result reports back.
pub struct DetectionContext<'a> {
    pub filename: Option<&'a str>,
    pub size_bytes: usize,
    /// Wall clock time spent in the whole pipeline.
    pub elapsed: Duration,
}

/// Outcome of a detection request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected: bool,
    pub confidence: f32,
    pub details: BTreeMap<String, Value>,
}

impl DetectionResult {
    pub fn detection_type(&self) -> DetectionType {
        self.details
            .get("detection_type")
            .and_then(Value::as_str)
            .and_then(|value| value.parse().ok())
            .unwrap_or(DetectionType::Info)
    }
}

/// Shapes inference output into detection results.
pub struct ResultAssembler {
    threshold: f32,
    danger_threshold: f32,
}

impl ResultAssembler {
    pub fn new(config: &DetectorConfig) -> Self {
        ResultAssembler {
            threshold: config.threshold,
            danger_threshold: config.danger_threshold,
        }
    }
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
    pub fn assemble(
        &self,
        output: &InferenceOutput,
        context: &DetectionContext,
    ) -> DetectionResult {
        let detected = output.score >= self.threshold;
        let detection_type = if !detected {
            DetectionType::Info
        } else if output.score >= self.danger_threshold {
            DetectionType::Danger
        } else {
            DetectionType::Warning
        };
        let mut details = BTreeMap::new();
        details.insert(
            "filename".to_string(),
            context.filename.map(Value::from).unwrap_or(Value::Null),
        );
        details.insert("size_bytes".to_string(), Value::from(context.size_bytes));
        details.insert(
            "processing_time_ms".to_string(),
            Value::from(context.elapsed.as_millis() as u64),
        );
        details.insert("label".to_string(), Value::from(output.label.as_str()));
        details.insert(
            "model_version".to_string(),
            Value::from(output.model_version.as_str()),
        );
        details.insert(
            "detection_type".to_string(),
            Value::from(detection_type.as_str()),
        );
        DetectionResult {
            detected,
            confidence: output.score,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(score: f32) -> InferenceOutput {
        InferenceOutput {
            label: "kiai".to_string(),
            score,
            model_version: "v3".to_string(),
        }
    }

    fn context() -> DetectionContext<'static> {
        DetectionContext {
            filename: Some("round1.wav"),
            size_bytes: 32044,
            elapsed: Duration::from_millis(42),
        }
    }

    #[test]
    fn the_threshold_is_a_closed_lower_bound() {
        let assembler = ResultAssembler::new(&DetectorConfig::default());
        assert!(assembler.assemble(&output(0.5), &context()).detected);
        let just_below = f32::from_bits(0.5_f32.to_bits() - 1);
        assert!(!assembler.assemble(&output(just_below), &context()).detected);
    }

    #[test]
    fn it_honours_a_configured_threshold() {
        let assembler = ResultAssembler::new(&DetectorConfig {
            threshold: 0.8,
            danger_threshold: 0.95,
        });
        assert!(!assembler.assemble(&output(0.7), &context()).detected);
        assert!(assembler.assemble(&output(0.8), &context()).detected);
    }

    #[test]
    fn it_copies_the_score_and_reports_the_context() {
        let result =
            ResultAssembler::new(&DetectorConfig::default()).assemble(&output(0.625), &context());
        assert_eq!(result.confidence, 0.625);
        assert_eq!(result.details["filename"], Value::from("round1.wav"));
        assert_eq!(result.details["size_bytes"], Value::from(32044));
        assert_eq!(result.details["processing_time_ms"], Value::from(42));
        assert_eq!(result.details["label"], Value::from("kiai"));
        assert_eq!(result.details["model_version"], Value::from("v3"));
    }

    #[test]
    fn a_missing_filename_is_null() {
        let context = DetectionContext {
            filename: None,
            ..context()
        };
        let result =
            ResultAssembler::new(&DetectorConfig::default()).assemble(&output(0.1), &context);
        assert_eq!(result.details["filename"], Value::Null);
    }

    #[test]
    fn it_grades_detections() {
        let assembler = ResultAssembler::new(&DetectorConfig::default());
        let grade = |score| assembler.assemble(&output(score), &context()).detection_type();
        assert_eq!(grade(0.2), DetectionType::Info);
        assert_eq!(grade(0.6), DetectionType::Warning);
        assert_eq!(grade(0.9), DetectionType::Danger);
    }

    #[test]
    fn it_parses_backend_type_aliases() {
        assert_eq!("WARN".parse::<DetectionType>(), Ok(DetectionType::Warning));
        assert_eq!("critical".parse::<DetectionType>(), Ok(DetectionType::Danger));
        assert_eq!("whatever".parse::<DetectionType>(), Ok(DetectionType::Info));
    }

    #[test]
    fn it_serializes_to_the_response_shape() {
        let result =
            ResultAssembler::new(&DetectorConfig::default()).assemble(&output(0.75), &context());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["detected"], Value::Bool(true));
        assert_eq!(json["confidence"], Value::from(0.75));
        assert_eq!(json["details"]["detection_type"], Value::from("warning"));
    }
}
