use std::num::ParseFloatError;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("sensor {sensor_id} holds non-numeric value {value:?}: {source}")]
    InvalidValue {
        sensor_id: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
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
