//! HTTP serving process
//!
//! Loads the model artifact once at startup into an [`AppState`] that is
//! injected into the handlers. The classifier is immutable shared state, so
//! concurrent requests need no locking.

use crate::config::ServerConfig;
use crate::core::{ClfError, Result};
use crate::kernel::LinearKernel;
use crate::multiclass::OneVsOneSVM;
use crate::persistence::SerializableModel;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod routes;

pub use self::routes::{ErrorResponse, FeatureRecord, PredictResponse};

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    classifier: Arc<OneVsOneSVM<LinearKernel>>,
    model_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(classifier: OneVsOneSVM<LinearKernel>, model_path: PathBuf) -> Self {
        Self {
            classifier: Arc::new(classifier),
            model_path: Arc::new(model_path),
        }
    }

    /// Load the artifact from disk and reconstruct the classifier
    ///
    /// A missing or corrupt artifact is fatal: the serving process must not
    /// start without a usable model.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let path = model_path.as_ref();
        let artifact = SerializableModel::load_from_file(path)?;
        let classifier = artifact.to_classifier()?;
        info!(
            "Loaded model from {:?}: classes {:?}, {} pairwise machines",
            path,
            classifier.classes(),
            classifier.estimators().len()
        );
        Ok(Self::new(classifier, path.to_path_buf()))
    }

    pub fn classifier(&self) -> &OneVsOneSVM<LinearKernel> {
        &self.classifier
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/settings", get(routes::settings))
        .route("/predict", post(routes::predict))
        .with_state(state)
}

/// Load the model and serve requests until the process is stopped
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let state = AppState::load(&config.model_path)?;
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(ClfError::IoError)?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, router).await.map_err(ClfError::IoError)
}
