use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReapyError {
    /// The host refused or failed the operation.
    #[error("Host error: {0}")]
    Host(String),
    #[error("Host returned null for {0}")]
    NullHandle(&'static str),
    #[error("Unexpected value: expected {expected}, got {got}")]
    UnexpectedValue { expected: &'static str, got: String },
    #[error("Unknown play state: {0}")]
    UnknownPlayState(i32),
    #[error("Call has no index parameter: {0}")]
    NotIndexable(String),
    #[error("Program has no output #{0}")]
    OutputMissing(usize),
    #[error("Socket error: {0}")]
    Socket(String),
    #[error("Timed out waiting for the host")]
    Timeout,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("String can not be passed to the host: {0}")]
    InvalidString(String),
}

pub type ReapyResult<T> = Result<T, ReapyError>;
