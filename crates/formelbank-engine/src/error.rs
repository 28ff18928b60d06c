use thiserror::Error;

/// Failure taxonomy for a single engine round trip. `Parse` and
/// `FetchUnavailable` recover locally at the issuing slot; `Engine` and
/// `Transport` surface verbatim in the shared result when raised by a batch
/// command. The client never retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine rejected formula: {0}")]
    Parse(String),
    #[error("no rendered formula available: {0}")]
    FetchUnavailable(String),
    #[error("engine error: {0}")]
    Engine(String),
    #[error("engine transport error: {0}")]
    Transport(String),
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// The engine's own message, without the taxonomy prefix. Batch
    /// failures surface this verbatim in the shared result.
    pub fn message(&self) -> &str {
        match self {
            Self::Parse(message)
            | Self::FetchUnavailable(message)
            | Self::Engine(message)
            | Self::Transport(message)
            | Self::Unavailable(message) => message.as_str(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
