use std::future::Future;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::error::ServiceError;
use crate::sensor::FakeSensor;
use crate::updater::SnapshotReceiver;

#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotReceiver,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/data.json", get(data_json_handler))
        .route("/health", get(health_handler))
        .with_state(state)
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

async fn data_json_handler(State(state): State<AppState>) -> Json<Vec<FakeSensor>> {
    let snapshot = state.snapshots.borrow().clone();
    Json(snapshot.sensors.clone())
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let generation = state.snapshots.borrow().generation;
    // Sender weg → Updater-Task beendet
    let updater_running = state.snapshots.has_changed().is_ok();
    Json(json!({
        "ok": true,
        "service": "emulator",
        "generation": generation,
        "updater_running": updater_running,
    }))
}
