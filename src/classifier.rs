use std::sync::Arc;

use tracing::{debug, info};

use crate::error::PredictError;
use crate::guidance::{Guidance, GuidanceBook};
use crate::loader::ModelSlot;
use crate::mapping::{LabelSet, WasteLabel};
use crate::postprocess::argmax_and_max;
use crate::preprocess::ImageTensor;

pub const INPUT_KEY: &str = "conv2d_input";
pub const OUTPUT_KEY: &str = "dense_1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub input_key: String,
    pub output_key: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            input_key: INPUT_KEY.to_string(),
            output_key: OUTPUT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: WasteLabel,
    pub score: f32,
    pub guidance: Guidance,
}

impl Classification {
    pub fn guidance_html(&self) -> String {
        self.guidance.to_html()
    }
}

pub struct Classifier {
    slot: Arc<ModelSlot>,
    labels: LabelSet,
    guidance: GuidanceBook,
    config: DispatchConfig,
}

impl Classifier {
    /// Fails with [`PredictError::MissingGuidance`] if any label the model can
    /// produce has no entry in `guidance`.
    pub fn new(
        slot: Arc<ModelSlot>,
        labels: LabelSet,
        guidance: GuidanceBook,
        config: DispatchConfig,
    ) -> Result<Self, PredictError> {
        guidance.check(&labels)?;
        Ok(Self {
            slot,
            labels,
            guidance,
            config,
        })
    }

    /// Score `tensor` with the loaded model and look up guidance for the
    /// winning label.
    pub async fn predict(&self, tensor: ImageTensor) -> Result<Classification, PredictError> {
        let model = self.slot.get().ok_or(PredictError::ModelNotLoaded)?;

        debug!("running prediction");
        let input_key = self.config.input_key.clone();
        let mut outputs = tokio::task::spawn_blocking(move || model.run(&input_key, tensor))
            .await
            .map_err(PredictError::inference)??;

        let scores = outputs
            .remove(&self.config.output_key)
            .ok_or_else(|| PredictError::MissingOutputField(self.config.output_key.clone()))?;
        debug!("prediction output: {:?}", scores);

        self.interpret(&scores)
    }

    /// Map a score vector to a label and its guidance.
    pub fn interpret(&self, scores: &[f32]) -> Result<Classification, PredictError> {
        let (index, score) = argmax_and_max(scores).ok_or(PredictError::EmptyScores)?;
        let label = self
            .labels
            .get(index)
            .ok_or(PredictError::LabelIndexOutOfRange {
                index,
                len: self.labels.len(),
            })?;
        let guidance = self.guidance.lookup(label)?.clone();

        info!("predicted {} (score {:.4})", label, score);
        Ok(Classification {
            label,
            score,
            guidance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::builtin_guidance;
    use crate::model::{InferenceModel, ModelOutputs};

    struct FixedScores(Vec<f32>);

    impl InferenceModel for FixedScores {
        fn run(&self, input_key: &str, tensor: ImageTensor) -> Result<ModelOutputs, PredictError> {
            assert_eq!(input_key, INPUT_KEY);
            assert_eq!(tensor.shape(), [1, 128, 128, 3]);
            Ok(ModelOutputs::from([(OUTPUT_KEY.to_string(), self.0.clone())]))
        }
    }

    fn classifier(slot: Arc<ModelSlot>) -> Classifier {
        Classifier::new(
            slot,
            LabelSet::default(),
            GuidanceBook::builtin(),
            DispatchConfig::default(),
        )
        .unwrap()
    }

    fn blank_tensor() -> ImageTensor {
        let image = image::DynamicImage::new_rgb8(128, 128);
        crate::preprocess::Processor::default().preprocess(&image).unwrap()
    }

    #[tokio::test]
    async fn predict_before_load_is_model_not_loaded() {
        let classifier = classifier(Arc::new(ModelSlot::new()));
        assert!(matches!(
            classifier.predict(blank_tensor()).await,
            Err(PredictError::ModelNotLoaded)
        ));
    }

    #[tokio::test]
    async fn predict_maps_argmax_to_label() {
        let slot = Arc::new(ModelSlot::new());
        slot.install(Arc::new(FixedScores(vec![0.05, 0.9, 0.05])));

        let result = classifier(slot).predict(blank_tensor()).await.unwrap();
        assert_eq!(result.label, WasteLabel::Organic);
        assert_eq!(result.guidance, builtin_guidance(WasteLabel::Organic));
        assert!(result.guidance_html().contains("Composting"));
    }

    #[tokio::test]
    async fn missing_output_field_is_reported() {
        let slot = Arc::new(ModelSlot::new());
        slot.install(Arc::new(FixedScores(vec![1.0, 0.0, 0.0])));
        let classifier = Classifier::new(
            slot,
            LabelSet::default(),
            GuidanceBook::builtin(),
            DispatchConfig {
                output_key: "dense_2".to_string(),
                ..DispatchConfig::default()
            },
        )
        .unwrap();

        assert!(matches!(
            classifier.predict(blank_tensor()).await,
            Err(PredictError::MissingOutputField(field)) if field == "dense_2"
        ));
    }

    #[test]
    fn ties_pick_first_label() {
        let classifier = classifier(Arc::new(ModelSlot::new()));
        let result = classifier.interpret(&[0.2, 0.9, 0.9]).unwrap();
        assert_eq!(result.label, WasteLabel::Organic);
    }

    #[test]
    fn extra_scores_are_out_of_range() {
        let classifier = classifier(Arc::new(ModelSlot::new()));
        assert!(matches!(
            classifier.interpret(&[0.1, 0.1, 0.1, 0.7]),
            Err(PredictError::LabelIndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn empty_scores_are_rejected() {
        let classifier = classifier(Arc::new(ModelSlot::new()));
        assert!(matches!(classifier.interpret(&[]), Err(PredictError::EmptyScores)));
    }

    #[test]
    fn extended_label_set_reaches_metal_guidance() {
        let labels = LabelSet::new(vec![
            WasteLabel::Chemical,
            WasteLabel::Organic,
            WasteLabel::Plastic,
            WasteLabel::Metal,
            WasteLabel::Glass,
        ]);
        let classifier = Classifier::new(
            Arc::new(ModelSlot::new()),
            labels,
            GuidanceBook::builtin(),
            DispatchConfig::default(),
        )
        .unwrap();
        let result = classifier.interpret(&[0.0, 0.1, 0.1, 0.6, 0.2]).unwrap();
        assert_eq!(result.label, WasteLabel::Metal);
    }

    #[test]
    fn label_without_guidance_fails_construction() {
        let chemical_only = LabelSet::new(vec![WasteLabel::Chemical]);
        let book = GuidanceBook::new(
            [(WasteLabel::Chemical, builtin_guidance(WasteLabel::Chemical))],
            &chemical_only,
        )
        .unwrap();

        let result = Classifier::new(
            Arc::new(ModelSlot::new()),
            LabelSet::default(),
            book,
            DispatchConfig::default(),
        );
        assert!(matches!(
            result,
            Err(PredictError::MissingGuidance { label: WasteLabel::Organic })
        ));
    }
}
