use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    /// Body was missing, not JSON, or carried nothing (`null`, `[]`, `{}` ...).
    #[error("no data received")]
    NoData,
}

impl IntoResponse for ReceiveError {
    fn into_response(self) -> Response {
        let status = match self {
            ReceiveError::NoData => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "status": self.to_string() }))).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
