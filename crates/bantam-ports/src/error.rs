use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("not found")]
    NotFound,
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("connection error: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid target")]
    InvalidTarget,
    #[error("no transport configured for this target")]
    TransportUnavailable,
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}
