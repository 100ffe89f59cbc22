//! Model acquisition and readiness.
//!
//! The [`ModelSlot`] is the context object shared by everything that needs
//! the model. It is written once by the loader and read on every prediction.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::LoadError;
use crate::model::{InferenceModel, ModelSource, OnnxModel};

pub type ModelHandle = Arc<dyn InferenceModel>;

#[derive(Clone)]
enum LoadState {
    Pending,
    Ready(ModelHandle),
    Failed(String),
}

/// Bounded polling budget for [`ModelSlot::await_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_millis(500),
        }
    }
}

pub struct ModelSlot {
    state: watch::Sender<LoadState>,
}

impl Default for ModelSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSlot {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LoadState::Pending);
        Self { state }
    }

    /// The loaded model, if any.
    pub fn get(&self) -> Option<ModelHandle> {
        match &*self.state.borrow() {
            LoadState::Ready(model) => Some(model.clone()),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Ready(_))
    }

    /// Record the outcome of the one load attempt. Later outcomes are ignored.
    pub fn settle(&self, outcome: Result<ModelHandle, LoadError>) -> bool {
        self.state.send_if_modified(|state| {
            if !matches!(state, LoadState::Pending) {
                warn!("model slot already settled, ignoring new outcome");
                return false;
            }
            *state = match outcome {
                Ok(model) => {
                    info!("model ready");
                    LoadState::Ready(model)
                }
                Err(e) => {
                    error!("model load error: {}", e);
                    LoadState::Failed(e.to_string())
                }
            };
            true
        })
    }

    pub fn install(&self, model: ModelHandle) -> bool {
        self.settle(Ok(model))
    }

    /// Drive a load future to completion and settle the slot with its result.
    pub async fn fill<F>(&self, load: F)
    where
        F: Future<Output = Result<ModelHandle, LoadError>>,
    {
        self.settle(load.await);
    }

    /// Resolves once the load has either succeeded or failed.
    pub async fn wait(&self) -> Result<ModelHandle, LoadError> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, LoadState::Pending))
            .await
            .map_err(|_| LoadError::Failed("model slot closed".to_string()))?;
        match &*state {
            LoadState::Ready(model) => Ok(model.clone()),
            LoadState::Failed(reason) => Err(LoadError::Failed(reason.clone())),
            LoadState::Pending => unreachable!("wait_for returned a pending state"),
        }
    }

    /// Poll for the model up to `policy.max_attempts` times.
    ///
    /// Returns the attempt on which the model was seen. A slot that has
    /// already failed ends the poll at once with [`LoadError::Failed`]. There
    /// is no sleep after the final attempt.
    pub async fn await_ready(&self, policy: ReadinessPolicy) -> Result<u32, LoadError> {
        for attempt in 1..=policy.max_attempts {
            match &*self.state.borrow() {
                LoadState::Ready(_) => return Ok(attempt),
                LoadState::Failed(reason) => return Err(LoadError::Failed(reason.clone())),
                LoadState::Pending => {}
            }
            if attempt < policy.max_attempts {
                debug!("waiting for model to load (attempt {})", attempt);
                tokio::time::sleep(policy.interval).await;
            }
        }
        error!(
            "model failed to load after {} attempts",
            policy.max_attempts
        );
        Err(LoadError::ReadinessTimeout {
            attempts: policy.max_attempts,
        })
    }
}

/// Load an ONNX model off the async scheduler.
pub async fn load(
    source: ModelSource,
    cuda: bool,
    input_key: String,
    output_key: String,
) -> Result<ModelHandle, LoadError> {
    let session = tokio::task::spawn_blocking(move || {
        OnnxModel::new(cuda).load_model(&source, &input_key, &output_key)
    })
    .await??;
    Ok(Arc::new(session))
}

/// Start loading in the background; the slot is settled when it finishes.
pub fn spawn_load(
    slot: Arc<ModelSlot>,
    source: ModelSource,
    cuda: bool,
    input_key: String,
    output_key: String,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        slot.fill(load(source, cuda, input_key, output_key)).await;
    })
}
