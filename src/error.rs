use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::WasteLabel;

/// Failures while acquiring the classification model.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot fetch model from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),
    #[error("model is malformed: {0}")]
    Malformed(String),
    #[error("model load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("model load failed earlier: {0}")]
    Failed(String),
    #[error("model not ready after {attempts} attempts")]
    ReadinessTimeout { attempts: u32 },
}

/// Failures while turning an image into an input tensor.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("invalid input image: {0}")]
    InvalidInput(String),
    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("resize failed: {0}")]
    Resize(String),
    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Failures while dispatching a tensor to the model and interpreting scores.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("model is not loaded")]
    ModelNotLoaded,
    #[error("inference failed: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("model output is missing field '{0}'")]
    MissingOutputField(String),
    #[error("model returned an empty score vector")]
    EmptyScores,
    #[error("label index {index} out of range for {len} labels")]
    LabelIndexOutOfRange { index: usize, len: usize },
    #[error("no disposal guidance for '{label}'")]
    MissingGuidance { label: WasteLabel },
}

impl PredictError {
    pub fn inference<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PredictError::Inference(err.into())
    }
}

/// Failures of the local key-value store and the records kept in it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no listing at index {0}")]
    NoSuchListing(usize),
    #[error("unknown waste label '{0}'")]
    UnknownLabel(String),
    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),
}

/// Any failure of the load → preprocess → predict pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}
