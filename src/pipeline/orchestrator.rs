//! Classify-and-enrich orchestration.

use crate::core::config::{ConfigValidator, FoodLensConfig};
use crate::core::inference::{FoodClassifier, OrtClassifier};
use crate::core::{FoodError, LabelTable};
use crate::domain::{ClassificationResult, RawImage};
use crate::nutrition::{NutritionRecord, NutritionResolver};
use crate::processors::{ConfidenceGate, ImageNormalizer};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Business result of one classify-and-enrich call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success {
        category: String,
        confidence: f32,
        nutrition: NutritionRecord,
    },
    /// The classifier was not confident enough.
    NotRecognized,
    /// The category was recognized but no provider had data for it.
    NutritionUnavailable { category: String },
}

/// Normalizer, classifier, gate and resolver wired together.
///
/// Immutable after construction and shared by reference across requests.
pub struct FoodPipeline {
    classifier: Arc<dyn FoodClassifier>,
    normalizer: ImageNormalizer,
    gate: ConfidenceGate,
    labels: LabelTable,
    nutrition: NutritionResolver,
}

impl std::fmt::Debug for FoodPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodPipeline")
            .field("classifier", &self.classifier.name())
            .field("normalizer", &self.normalizer)
            .field("gate", &self.gate)
            .field("labels", &self.labels.len())
            .field("nutrition", &self.nutrition)
            .finish()
    }
}

impl FoodPipeline {
    pub fn new(
        classifier: Arc<dyn FoodClassifier>,
        normalizer: ImageNormalizer,
        gate: ConfidenceGate,
        labels: LabelTable,
        nutrition: NutritionResolver,
    ) -> Self {
        Self {
            classifier,
            normalizer,
            gate,
            labels,
            nutrition,
        }
    }

    /// Validates the configuration and builds every component from it.
    pub fn from_config(config: &FoodLensConfig) -> Result<Self, FoodError> {
        config.validate()?;

        let labels = match &config.model.labels_path {
            Some(path) => LabelTable::from_file(path)?,
            None => LabelTable::default_food(),
        };
        let classifier = OrtClassifier::from_config(&config.model)?;
        let normalizer = ImageNormalizer::new(config.model.input_size, config.model.channel_order)?;
        let gate = ConfidenceGate::new(config.gate.confidence_threshold)?;
        let nutrition = NutritionResolver::from_config(config)?;

        info!(
            model = classifier.model_name(),
            labels = labels.len(),
            threshold = gate.threshold(),
            "pipeline ready"
        );
        Ok(Self::new(
            Arc::new(classifier),
            normalizer,
            gate,
            labels,
            nutrition,
        ))
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn gate(&self) -> &ConfidenceGate {
        &self.gate
    }

    /// Normalizes, classifies and gates one image, without nutrition lookup.
    pub fn classify(&self, image: &RawImage) -> Result<ClassificationResult, FoodError> {
        let tensor = self.normalizer.normalize(image)?;
        let distribution = self.classifier.classify(&tensor)?;
        if distribution.len() != self.labels.len() {
            warn!(
                outputs = distribution.len(),
                labels = self.labels.len(),
                "classifier output size differs from the label table"
            );
        }
        Ok(self.gate.apply(&distribution, &self.labels))
    }

    /// Classifies one image and, when recognized, resolves its nutrition.
    pub fn classify_and_enrich(&self, image: &RawImage) -> Result<PipelineOutcome, FoodError> {
        let (category, confidence) = match self.classify(image)? {
            ClassificationResult::Recognized {
                category,
                confidence,
                ..
            } => (category, confidence),
            ClassificationResult::Unrecognized => return Ok(PipelineOutcome::NotRecognized),
        };
        debug!(%category, confidence, "recognized");

        match self.nutrition.resolve(&category)? {
            Some(nutrition) => Ok(PipelineOutcome::Success {
                category,
                confidence,
                nutrition,
            }),
            None => Ok(PipelineOutcome::NutritionUnavailable { category }),
        }
    }

    /// Reads an image file and runs [`Self::classify_and_enrich`] on it.
    pub fn classify_file(&self, path: impl AsRef<Path>) -> Result<PipelineOutcome, FoodError> {
        let image = RawImage::from_path(path.as_ref())?;
        self.classify_and_enrich(&image)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::errors::SimpleError;
    use crate::domain::{CategoryDistribution, NormalizedTensor};
    use crate::nutrition::record::{CALORIES, NutrientValue};
    use crate::nutrition::{PrimaryNutritionSource, ProviderId, ProviderResponse};
    use crate::processors::ChannelOrder;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    pub(crate) struct StubClassifier {
        pub probabilities: Option<Vec<f32>>,
    }

    impl StubClassifier {
        /// Puts `p` on `id` and the rest on category 0 (or 1 when `id` is 0).
        pub(crate) fn peaked(id: usize, p: f32, categories: usize) -> Self {
            let mut probabilities = vec![0.0; categories];
            probabilities[id] = p;
            probabilities[if id == 0 { 1 } else { 0 }] = 1.0 - p;
            Self {
                probabilities: Some(probabilities),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                probabilities: None,
            }
        }
    }

    impl FoodClassifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        fn classify(&self, tensor: &NormalizedTensor) -> Result<CategoryDistribution, FoodError> {
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            match &self.probabilities {
                Some(p) => CategoryDistribution::new(p.clone()),
                None => Err(FoodError::inference_error(
                    "stub",
                    "forward pass",
                    SimpleError::new("session crashed"),
                )),
            }
        }
    }

    pub(crate) struct StubPrimary {
        pub record: Option<NutritionRecord>,
    }

    impl PrimaryNutritionSource for StubPrimary {
        fn id(&self) -> ProviderId {
            ProviderId::NutritionApi
        }

        fn fetch(&self, _category: &str) -> ProviderResponse<NutritionRecord> {
            match &self.record {
                Some(r) => ProviderResponse::success(self.id(), r.clone()),
                None => ProviderResponse::empty(self.id()),
            }
        }
    }

    pub(crate) fn banana_record() -> NutritionRecord {
        let mut record = NutritionRecord::new();
        record.insert("name", NutrientValue::Text("banana".into()));
        record.insert(CALORIES, NutrientValue::Number(89.0));
        record
    }

    pub(crate) fn pipeline(classifier: StubClassifier, record: Option<NutritionRecord>) -> FoodPipeline {
        FoodPipeline::new(
            Arc::new(classifier),
            ImageNormalizer::new(224, ChannelOrder::HWC).unwrap(),
            ConfidenceGate::new(0.5).unwrap(),
            LabelTable::default_food(),
            NutritionResolver::new(Box::new(StubPrimary { record }), None),
        )
    }

    pub(crate) fn png_image() -> RawImage {
        let img = RgbImage::from_pixel(64, 48, Rgb([230, 210, 40]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        RawImage::from_bytes(bytes)
    }

    fn banana_id() -> usize {
        LabelTable::default_food().id_of("banana").unwrap()
    }

    #[test]
    fn test_confident_banana_succeeds() {
        let pipeline = pipeline(
            StubClassifier::peaked(banana_id(), 0.92, 36),
            Some(banana_record()),
        );
        let outcome = pipeline.classify_and_enrich(&png_image()).unwrap();
        assert_eq!(
            outcome,
            PipelineOutcome::Success {
                category: "banana".to_string(),
                confidence: 0.92,
                nutrition: banana_record(),
            }
        );
    }

    #[test]
    fn test_low_confidence_not_recognized() {
        let mut probabilities = vec![0.2; 5];
        probabilities.extend(vec![0.0; 31]);
        let pipeline = pipeline(
            StubClassifier {
                probabilities: Some(probabilities),
            },
            Some(banana_record()),
        );
        let outcome = pipeline.classify_and_enrich(&png_image()).unwrap();
        assert_eq!(outcome, PipelineOutcome::NotRecognized);
    }

    #[test]
    fn test_missing_nutrition_is_unavailable() {
        let pipeline = pipeline(StubClassifier::peaked(banana_id(), 0.92, 36), None);
        let outcome = pipeline.classify_and_enrich(&png_image()).unwrap();
        assert_eq!(
            outcome,
            PipelineOutcome::NutritionUnavailable {
                category: "banana".to_string()
            }
        );
    }

    #[test]
    fn test_garbage_bytes_are_decode_error() {
        let pipeline = pipeline(StubClassifier::peaked(0, 0.9, 36), None);
        let err = pipeline
            .classify_and_enrich(&RawImage::from_bytes(b"not an image".to_vec()))
            .unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_classifier_fault_propagates() {
        let pipeline = pipeline(StubClassifier::failing(), Some(banana_record()));
        let err = pipeline.classify_and_enrich(&png_image()).unwrap_err();
        assert!(matches!(err, FoodError::Inference { .. }));
    }

    #[test]
    fn test_classify_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banana.png");
        std::fs::write(&path, png_image().bytes()).unwrap();

        let pipeline = pipeline(
            StubClassifier::peaked(banana_id(), 0.92, 36),
            Some(banana_record()),
        );
        assert!(matches!(
            pipeline.classify_file(&path).unwrap(),
            PipelineOutcome::Success { .. }
        ));
        assert!(matches!(
            pipeline.classify_file(dir.path().join("missing.png")),
            Err(FoodError::Io(_))
        ));
    }

    #[test]
    fn test_from_config_requires_model() {
        let config = FoodLensConfig::default();
        assert!(matches!(
            FoodPipeline::from_config(&config),
            Err(FoodError::Config(_))
        ));
    }
}
