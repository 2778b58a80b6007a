use thiserror::Error;

pub type Result<T, E = PingstatError> = std::result::Result<T, E>;

/// Unified error type covering common failure scenarios across subsystems.
#[derive(Debug, Error)]
pub enum PingstatError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("probe error: {0}")]
    Probe(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("report error: {0}")]
    Report(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
