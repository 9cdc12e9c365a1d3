//! Route handlers and wire types

use crate::core::SparseVector;
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::debug;
use serde::{Deserialize, Serialize};

/// One feature record describing a single iris sample, values in cm
///
/// The key spellings (including the `lenght` typos) are the original wire
/// contract and are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    #[serde(rename = "sepal.lenght")]
    pub sepal_length: f64,
    #[serde(rename = "sepal.width")]
    pub sepal_width: f64,
    #[serde(rename = "petal.lenght")]
    pub petal_length: f64,
    #[serde(rename = "petal.width")]
    pub petal_width: f64,
}

impl FeatureRecord {
    /// Feature vector in training column order
    pub fn to_features(&self) -> SparseVector {
        SparseVector::from_dense(&[
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ])
    }

    /// JSON cannot encode NaN or infinities directly, but this also guards
    /// reconstructed values like 1e999
    fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            ("sepal.lenght", self.sepal_length),
            ("sepal.width", self.sepal_width),
            ("petal.lenght", self.petal_length),
            ("petal.width", self.petal_width),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ApiError::BadRequest(format!(
                    "feature '{name}' must be a finite number"
                )));
            }
        }
        Ok(())
    }
}

/// Prediction response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "target value")]
    pub target_value: u32,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Route-level errors mapped to client or server failures
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// GET /settings: report the configured artifact path
pub async fn settings(State(state): State<AppState>) -> String {
    format!("File directory used is: {}", state.model_path().display())
}

/// POST /predict: classify one feature record
///
/// Malformed bodies (missing keys, wrong types, unknown keys, invalid JSON)
/// are rejected with 400 before inference runs.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(record) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    record.validate()?;

    let prediction = state.classifier().predict(&record.to_features());
    debug!(
        "predicted class {} ({} votes) for {record:?}",
        prediction.class, prediction.votes
    );

    Ok(Json(PredictResponse {
        target_value: prediction.class,
    }))
}
