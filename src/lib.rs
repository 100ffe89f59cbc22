pub mod classifier;
pub mod cli;
pub mod error;
pub mod guidance;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod loader;
pub mod mapping;
pub mod model;
pub mod postprocess;
pub mod preprocess;
pub mod render;
pub mod service;
pub mod storage;

pub use crate::classifier::{Classification, Classifier, DispatchConfig};
pub use crate::cli::Args;
pub use crate::error::{LoadError, PipelineError, PredictError, PreprocessError, StoreError};
pub use crate::guidance::GuidanceBook;
pub use crate::i18n::Language;
pub use crate::loader::{ModelSlot, ReadinessPolicy};
pub use crate::mapping::{LabelSet, WasteLabel, load_class_mapping};
pub use crate::model::{InferenceModel, ModelSource, OnnxModel};
pub use crate::preprocess::{ImageTensor, PreprocessConfig, Processor};
pub use crate::service::{ServiceConfig, WasteService};
pub use crate::storage::LocalStore;
