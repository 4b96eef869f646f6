//! External response contract.

use super::orchestrator::PipelineOutcome;
use crate::core::FoodError;
use crate::nutrition::NutritionRecord;
use serde::Serialize;
use tracing::error;

const RECOGNIZED_MESSAGE: &str = "Food item recognized successfully.";
const NOT_RECOGNIZED_MESSAGE: &str = "Food item not recognized.";
const NUTRITION_UNAVAILABLE_MESSAGE: &str = "Calorie information not found.";
const INVALID_IMAGE_MESSAGE: &str = "Unable to decode the uploaded image.";

/// Machine-checkable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotRecognized,
    NutritionUnavailable,
    InvalidImage,
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotRecognized | ErrorKind::NutritionUnavailable => 404,
            ErrorKind::InvalidImage => 400,
            ErrorKind::Internal => 500,
        }
    }
}

/// JSON body returned for a classify request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifyResponse {
    Success {
        message: String,
        food_name: String,
        confidence: f32,
        nutrition: NutritionRecord,
    },
    Error { kind: ErrorKind, message: String },
}

impl ClassifyResponse {
    /// Maps a pipeline result onto the response contract.
    ///
    /// Undecodable uploads become `invalid_image`; every other error is
    /// logged and reported as `internal` with its display text.
    pub fn from_result(result: Result<PipelineOutcome, FoodError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(err) if err.is_decode_error() => {
                Self::error(ErrorKind::InvalidImage, INVALID_IMAGE_MESSAGE)
            }
            Err(err) => {
                error!(error = %err, "classify request failed");
                Self::error(ErrorKind::Internal, err.to_string())
            }
        }
    }

    pub fn from_outcome(outcome: PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Success {
                category,
                confidence,
                nutrition,
            } => ClassifyResponse::Success {
                message: RECOGNIZED_MESSAGE.to_string(),
                food_name: category,
                confidence,
                nutrition,
            },
            PipelineOutcome::NotRecognized => {
                Self::error(ErrorKind::NotRecognized, NOT_RECOGNIZED_MESSAGE)
            }
            PipelineOutcome::NutritionUnavailable { .. } => {
                Self::error(ErrorKind::NutritionUnavailable, NUTRITION_UNAVAILABLE_MESSAGE)
            }
        }
    }

    fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ClassifyResponse::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ClassifyResponse::Success { .. } => 200,
            ClassifyResponse::Error { kind, .. } => kind.status_code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClassifyResponse::Success { message, .. } | ClassifyResponse::Error { message, .. } => {
                message
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LabelTable;
    use crate::domain::RawImage;
    use crate::pipeline::orchestrator::tests::{
        StubClassifier, banana_record, pipeline, png_image,
    };
    use serde_json::json;

    fn banana_id() -> usize {
        LabelTable::default_food().id_of("banana").unwrap()
    }

    #[test]
    fn test_success_body() {
        let pipeline = pipeline(
            StubClassifier::peaked(banana_id(), 0.92, 36),
            Some(banana_record()),
        );
        let response = ClassifyResponse::from_result(pipeline.classify_and_enrich(&png_image()));

        assert_eq!(response.status_code(), 200);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Food item recognized successfully.");
        assert_eq!(body["food_name"], "banana");
        assert_eq!(body["nutrition"], json!({"calories": 89.0, "name": "banana"}));
        assert!((body["confidence"].as_f64().unwrap() - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_low_confidence_body() {
        let mut probabilities = vec![0.2; 5];
        probabilities.extend(vec![0.0; 31]);
        let pipeline = pipeline(
            StubClassifier {
                probabilities: Some(probabilities),
            },
            Some(banana_record()),
        );
        let response = ClassifyResponse::from_result(pipeline.classify_and_enrich(&png_image()));

        assert_eq!(response.status_code(), 404);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "kind": "not_recognized",
                "message": "Food item not recognized."
            })
        );
    }

    #[test]
    fn test_nutrition_unavailable_body() {
        let response = ClassifyResponse::from_outcome(PipelineOutcome::NutritionUnavailable {
            category: "kiwi".to_string(),
        });
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.message(), "Calorie information not found.");
        assert_eq!(
            serde_json::to_value(&response).unwrap()["kind"],
            "nutrition_unavailable"
        );
    }

    #[test]
    fn test_invalid_image_body() {
        let pipeline = pipeline(StubClassifier::peaked(0, 0.9, 36), None);
        let response = ClassifyResponse::from_result(
            pipeline.classify_and_enrich(&RawImage::from_bytes(b"\x00\x01garbage".to_vec())),
        );
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.message(), "Unable to decode the uploaded image.");
    }

    #[test]
    fn test_internal_fault_body() {
        let pipeline = pipeline(StubClassifier::failing(), None);
        let response = ClassifyResponse::from_result(pipeline.classify_and_enrich(&png_image()));
        assert_eq!(response.status_code(), 500);
        assert!(response.message().contains("stub"));
        let json = response.to_json().unwrap();
        assert!(json.contains("\"kind\":\"internal\""));
    }
}
