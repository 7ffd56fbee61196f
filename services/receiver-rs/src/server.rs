use std::future::Future;

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, ServiceBuilder};
use tracing::info;

use crate::config::Config;
use crate::error::{ReceiveError, ServiceError};
use crate::reading::{is_json_content_type, Batch};

pub fn create_router(config: &Config) -> Router {
    Router::new()
        .route("/data", post(data_handler))
        .route("/health", get(health_handler))
        // keine Größenbegrenzung für Batches
        .layer(DefaultBodyLimit::disable())
        .layer(ServiceBuilder::new().layer(ConcurrencyLimitLayer::new(config.concurrency_limit)))
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// Body roh lesen; fehlender Content-Type ist ok, alles außer JSON nicht
async fn data_handler(headers: HeaderMap, body: Bytes) -> Result<Json<Value>, ReceiveError> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let is_json = content_type.to_str().map_or(false, is_json_content_type);
        if !is_json {
            return Err(ReceiveError::NoData);
        }
    }
    let batch = Batch::parse(&body)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    info!("Received data at {}:", timestamp);
    for line in batch.lines() {
        info!("{}", line);
    }

    Ok(Json(json!({ "status": "success" })))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true, "service": "receiver" }))
}
