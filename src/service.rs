use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use tracing::{error, info};

use crate::classifier::{Classification, Classifier, DispatchConfig};
use crate::error::{PipelineError, PredictError};
use crate::guidance::GuidanceBook;
use crate::loader::{ModelSlot, ReadinessPolicy};
use crate::mapping::LabelSet;
use crate::preprocess::{PreprocessConfig, Processor, decode_image};

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub preprocess: PreprocessConfig,
    pub dispatch: DispatchConfig,
    pub readiness: ReadinessPolicy,
}

/// Context object owning every stage of the classification pipeline.
pub struct WasteService {
    slot: Arc<ModelSlot>,
    processor: Arc<Processor>,
    classifier: Classifier,
    readiness: ReadinessPolicy,
}

impl WasteService {
    pub fn new(
        slot: Arc<ModelSlot>,
        labels: LabelSet,
        guidance: GuidanceBook,
        config: ServiceConfig,
    ) -> Result<Self, PredictError> {
        let classifier = Classifier::new(slot.clone(), labels, guidance, config.dispatch)?;
        Ok(Self {
            slot,
            processor: Arc::new(Processor::new(config.preprocess)),
            classifier,
            readiness: config.readiness,
        })
    }

    /// Wait for the model, then preprocess and classify one decoded image.
    pub async fn classify(&self, image: &DynamicImage) -> Result<Classification, PipelineError> {
        self.slot.await_ready(self.readiness).await?;
        let tensor = self.processor.preprocess(image)?;
        Ok(self.classifier.predict(tensor).await?)
    }

    pub async fn classify_path(&self, path: &Path) -> Result<Classification, PipelineError> {
        let image = decode_image(path)?;
        self.classify(&image).await
    }

    /// Classify many files. Decoding and preprocessing run in parallel off the
    /// scheduler; predictions run one at a time. Each failure is logged and
    /// leaves `None` in that file's position.
    pub async fn classify_paths(&self, paths: &[PathBuf]) -> Vec<Option<Classification>> {
        if let Err(e) = self.slot.await_ready(self.readiness).await {
            error!("prediction skipped: {}", e);
            return vec![None; paths.len()];
        }

        let processor = self.processor.clone();
        let owned = paths.to_vec();
        let tensors = match tokio::task::spawn_blocking(move || processor.preprocess_paths(&owned)).await {
            Ok(tensors) => tensors,
            Err(e) => {
                error!("preprocessing task failed: {}", e);
                return vec![None; paths.len()];
            }
        };

        let mut results = Vec::with_capacity(paths.len());
        for (path, tensor) in paths.iter().zip(tensors) {
            let outcome = match tensor {
                Ok(tensor) => self.classifier.predict(tensor).await.map_err(PipelineError::from),
                Err(e) => Err(e.into()),
            };
            results.push(match outcome {
                Ok(result) => {
                    info!("{}: {}", path.display(), result.label);
                    Some(result)
                }
                Err(e) => {
                    error!("{}: prediction error: {}", path.display(), e);
                    None
                }
            });
        }
        results
    }
}
