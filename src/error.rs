use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    /// A retrieval was made before anything was recorded.
    #[error("no events recorded")]
    EmptyLog,

    /// The formatter or one of the handler writers failed.
    #[error("log sink failed: {0}")]
    Sink(#[source] std::io::Error),

    #[error("a global logger is already installed")]
    AlreadyInstalled,

    #[error("invalid recorder config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("failed to read recorder config: {0}")]
    ConfigIo(#[source] std::io::Error),
}

pub type RecorderResult<T> = Result<T, RecorderError>;
