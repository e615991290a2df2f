//! Interpretation of classification-service responses.
//!
//! The prediction service answers with a loosely typed JSON object. Depending on the model
//! build it carries the class under `label`, `predicted_label` or `examination_result_model`
//! (or only a numeric `index`), and the score under `confidence`, `model_confidence` or as a
//! `probabilities` vector. This module extracts those fields and maps the class onto the disease
//! vocabulary. It does not talk to the service.

use derm_types::Code;
use serde::Serialize;
use serde_json::Value;

use crate::normalise::normalise_model_label;
use crate::{CodeLabelRegistry, RegistryError, RegistryResult};

const LABEL_KEYS: [&str; 3] = ["label", "predicted_label", "examination_result_model"];

/// Fields extracted from one prediction-service response.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Class name as reported by the service, if any.
    pub raw_label: Option<String>,
    /// Canonical disease code, when the class could be normalised.
    pub code: Option<Code>,
    /// Model confidence, when the response carried a usable score.
    pub confidence: Option<f64>,
}

/// A normalised result in the shape the backend stores it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// `"<label> (<CODE>)"`.
    pub examination_result_model: String,
    pub model_confidence: f64,
}

impl Prediction {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` when the body is not a JSON object.
    pub fn from_json(body: &str) -> RegistryResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| RegistryError::InvalidInput(format!("invalid prediction JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> RegistryResult<Self> {
        let Value::Object(fields) = value else {
            return Err(RegistryError::InvalidInput(
                "prediction response must be a JSON object".into(),
            ));
        };

        let raw_label = LABEL_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(label_text))
            .or_else(|| fields.get("index").and_then(label_text));

        let code = raw_label.as_deref().and_then(normalise_model_label);

        let confidence = fields
            .get("confidence")
            .and_then(as_score)
            .or_else(|| fields.get("model_confidence").and_then(as_score))
            .or_else(|| fields.get("probabilities").and_then(max_probability));

        Ok(Self {
            raw_label,
            code,
            confidence,
        })
    }

    /// Renders the prediction for storage. Returns `None` when the class was not normalised.
    ///
    /// A missing confidence is stored as `0.0`; scores are rounded to six decimal places.
    pub fn to_analysis(&self, registry: &CodeLabelRegistry) -> Option<AnalysisResult> {
        let code = self.code.as_ref()?;
        let confidence = self.confidence.unwrap_or(0.0);
        Some(AnalysisResult {
            examination_result_model: registry.disease_display_with_code(code.as_str()),
            model_confidence: (confidence * 1e6).round() / 1e6,
        })
    }
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Non-finite values (`"NaN"`, `"inf"`) count as unusable.
fn as_score(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        other => number_score(other),
    }
}

fn number_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

// Every entry must be a JSON number; numeric strings inside the vector are rejected.
fn max_probability(value: &Value) -> Option<f64> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .iter()
        .map(number_score)
        .collect::<Option<Vec<f64>>>()?
        .into_iter()
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> CodeLabelRegistry {
        CodeLabelRegistry::standard().expect("registry")
    }

    #[test]
    fn reads_label_and_confidence() {
        let prediction =
            Prediction::from_json(r#"{"label": "melanoma", "index": 6, "confidence": 0.93}"#)
                .expect("parse");
        assert_eq!(prediction.raw_label.as_deref(), Some("melanoma"));
        assert_eq!(prediction.code.as_ref().map(Code::as_str), Some("MEL"));
        assert_eq!(prediction.confidence, Some(0.93));
    }

    #[test]
    fn label_keys_are_tried_in_order() {
        let prediction = Prediction::from_value(&json!({
            "label": null,
            "predicted_label": "dermatofibroma",
            "examination_result_model": "melanoma"
        }))
        .expect("parse");
        assert_eq!(prediction.code.as_ref().map(Code::as_str), Some("DF"));
    }

    #[test]
    fn falls_back_to_index_when_no_label() {
        let prediction = Prediction::from_value(&json!({ "index": 4 })).expect("parse");
        assert_eq!(prediction.raw_label.as_deref(), Some("4"));
        assert_eq!(prediction.code, None);
    }

    #[test]
    fn confidence_sources_in_priority_order() {
        let prediction = Prediction::from_value(&json!({
            "label": "bcc",
            "model_confidence": "0.71",
            "probabilities": [0.1, 0.8]
        }))
        .expect("parse");
        assert_eq!(prediction.confidence, Some(0.71));

        let prediction = Prediction::from_value(&json!({
            "label": "bcc",
            "confidence": "not a number",
            "probabilities": [0.1, 0.8, 0.05]
        }))
        .expect("parse");
        assert_eq!(prediction.confidence, Some(0.8));
    }

    #[test]
    fn unusable_probabilities_give_no_confidence() {
        let empty = Prediction::from_value(&json!({ "label": "bcc", "probabilities": [] }))
            .expect("parse");
        assert_eq!(empty.confidence, None);

        let mixed = Prediction::from_value(&json!({ "label": "bcc", "probabilities": [0.2, "x"] }))
            .expect("parse");
        assert_eq!(mixed.confidence, None);

        let stringly = Prediction::from_value(&json!({
            "label": "bcc",
            "probabilities": ["0.9", 0.1]
        }))
        .expect("parse");
        assert_eq!(stringly.confidence, None);
    }

    #[test]
    fn non_finite_confidence_is_stored_as_zero() {
        for raw in ["NaN", "inf", "-inf", " infinity "] {
            let prediction =
                Prediction::from_value(&json!({ "label": "mel", "confidence": raw })).expect("parse");
            assert_eq!(prediction.confidence, None, "confidence {raw:?}");

            let analysis = prediction.to_analysis(&registry()).expect("normalised");
            assert_eq!(analysis.model_confidence, 0.0);
            let stored = serde_json::to_value(&analysis).expect("serialise");
            assert_eq!(stored["model_confidence"], json!(0.0));
        }

        let fallback = Prediction::from_value(&json!({
            "label": "mel",
            "confidence": "NaN",
            "probabilities": [0.3, 0.6]
        }))
        .expect("parse");
        assert_eq!(fallback.confidence, Some(0.6));
    }

    #[test]
    fn renders_analysis_result() {
        let prediction = Prediction::from_value(&json!({
            "label": "melanocytic_Nevi",
            "confidence": 0.123_456_789
        }))
        .expect("parse");
        let analysis = prediction.to_analysis(&registry()).expect("normalised");
        assert_eq!(
            analysis.examination_result_model,
            "Меланоцитарные невусы (NV)"
        );
        assert_eq!(analysis.model_confidence, 0.123457);
    }

    #[test]
    fn missing_confidence_is_stored_as_zero() {
        let prediction = Prediction::from_value(&json!({ "label": "akiec" })).expect("parse");
        let analysis = prediction.to_analysis(&registry()).expect("normalised");
        assert_eq!(analysis.examination_result_model, "Актинический кератоз (AK)");
        assert_eq!(analysis.model_confidence, 0.0);
    }

    #[test]
    fn unnormalised_prediction_has_no_analysis() {
        let prediction = Prediction::from_value(&json!({ "label": "psoriasis" })).expect("parse");
        assert_eq!(prediction.to_analysis(&registry()), None);
    }

    #[test]
    fn rejects_non_object_bodies() {
        let err = Prediction::from_json("[1, 2]").expect_err("array body");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("JSON object")));

        let err = Prediction::from_json("{not json").expect_err("malformed");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("invalid prediction JSON")));
    }
}
