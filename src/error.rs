use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status endpoint returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Malformed status body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid status endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Poll interval must be greater than zero")]
    InvalidInterval,

    #[error("Polling session already started")]
    AlreadyStarted,

    #[error("Polling session already stopped")]
    SessionStopped,
}

pub type MonitorResult<T> = Result<T, MonitorError>;
