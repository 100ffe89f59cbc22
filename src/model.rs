use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider, ExecutionProviderDispatch};
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::Tensor;
use tracing::{debug, info};

use crate::error::{LoadError, PredictError};
use crate::preprocess::ImageTensor;

/// Named output fields of one inference run.
pub type ModelOutputs = HashMap<String, Vec<f32>>;

/// Anything that can score an image tensor.
pub trait InferenceModel: Send + Sync {
    /// Submit `tensor` under `input_key` and return every output field.
    fn run(&self, input_key: &str, tensor: ImageTensor) -> Result<ModelOutputs, PredictError>;
}

/// Where the model artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Path(PathBuf),
    Url(String),
}

impl ModelSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            ModelSource::Url(raw.to_string())
        } else {
            ModelSource::Path(PathBuf::from(raw))
        }
    }

    /// Read the artifact into memory.
    pub fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            ModelSource::Path(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            ModelSource::Url(url) => {
                let fetch_err = |reason: String| LoadError::Fetch {
                    url: url.clone(),
                    reason,
                };
                let response = ureq::get(url).call().map_err(|e| fetch_err(e.to_string()))?;
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| fetch_err(e.to_string()))?;
                Ok(bytes)
            }
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Path(path) => write!(f, "{}", path.display()),
            ModelSource::Url(url) => f.write_str(url),
        }
    }
}

/// Session factory for ONNX models.
pub struct OnnxModel {
    provider: [ExecutionProviderDispatch; 1],
}

impl OnnxModel {
    pub fn new(cuda: bool) -> Self {
        let provider = if cuda {
            [CUDAExecutionProvider::default().build().error_on_failure()]
        } else {
            [CPUExecutionProvider::default().build()]
        };
        Self { provider }
    }

    /// Load the model and check it exposes `input_key` and `output_key`.
    pub fn load_model(
        &self,
        source: &ModelSource,
        input_key: &str,
        output_key: &str,
    ) -> Result<OnnxSession, LoadError> {
        info!("loading model from {}", source);
        let bytes = source.fetch()?;
        debug!("model size: {:.2} MB", bytes.len() as f64 / (1024.0 * 1024.0));

        let session = SessionBuilder::new()?
            .with_execution_providers(self.provider.clone())?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_memory(&bytes)?;

        if !session.inputs.iter().any(|input| input.name == input_key) {
            return Err(LoadError::Malformed(format!(
                "model has no input named '{}'",
                input_key
            )));
        }
        if !session.outputs.iter().any(|output| output.name == output_key) {
            return Err(LoadError::Malformed(format!(
                "model has no output named '{}'",
                output_key
            )));
        }

        info!("model loaded");
        Ok(OnnxSession { session })
    }
}

/// A committed ONNX Runtime session.
pub struct OnnxSession {
    session: Session,
}

impl InferenceModel for OnnxSession {
    fn run(&self, input_key: &str, tensor: ImageTensor) -> Result<ModelOutputs, PredictError> {
        let input = Tensor::from_array(tensor.into_array()).map_err(PredictError::inference)?;
        let feeds = ort::inputs![input_key => input].map_err(PredictError::inference)?;
        let ys = self.session.run(feeds).map_err(PredictError::inference)?;

        let mut outputs = ModelOutputs::new();
        for (name, value) in ys.iter() {
            // Non-float outputs are not scores.
            if let Ok(view) = value.try_extract_tensor::<f32>() {
                outputs.insert(name.to_string(), view.iter().copied().collect());
            }
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            ModelSource::parse("https://example.org/model.onnx"),
            ModelSource::Url("https://example.org/model.onnx".to_string())
        );
        assert_eq!(
            ModelSource::parse("models/model.onnx"),
            ModelSource::Path(PathBuf::from("models/model.onnx"))
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ModelSource::Path(dir.path().join("absent.onnx"));
        assert!(matches!(source.fetch(), Err(LoadError::Io { .. })));
    }

    #[test]
    fn garbage_model_fails_to_load() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"definitely not onnx").unwrap();
        let source = ModelSource::Path(file.path().to_path_buf());
        assert!(
            OnnxModel::new(false)
                .load_model(&source, "conv2d_input", "dense_1")
                .is_err()
        );
    }
}
