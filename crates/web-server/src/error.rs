use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use engine::EngineError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Converts engine failures into HTTP responses: missing records are 404,
/// trade/lifecycle rejections are 409, everything else is a 500 with the
/// detail kept out of the response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Engine(err) = self;
        let (status, message) = match &err {
            EngineError::SimulationNotFound(_)
            | EngineError::SymbolNotFound(_)
            | EngineError::StrategyNotFound(_)
            | EngineError::NoMarketData(_) => (StatusCode::NOT_FOUND, err.to_string()),
            rejection if rejection.is_rejection() => (StatusCode::CONFLICT, err.to_string()),
            _ => {
                tracing::error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
