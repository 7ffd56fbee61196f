use dotenvy::dotenv;
use tracing::info;

mod config;
mod error;
mod reading;
mod server;

use config::Config;
use error::ServiceError;

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv().ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(rust_log.as_deref()))
        .init();

    let config = Config::load();
    let app = server::create_router(&config);

    let (host, port) = config.bind_addr();
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|source| ServiceError::Bind {
            addr: format!("{}:{}", host, port),
            source,
        })?;
    info!("Receiver running → http://{}:{}/data", host, port);

    server::serve(listener, app, shutdown_signal()).await?;
    info!("Receiver stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
