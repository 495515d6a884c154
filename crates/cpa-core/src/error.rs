use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogicError {
    #[error("parse manifest err: {0}")]
    Manifest(#[source] Box<LogicError>),

    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("action already registered: {0}")]
    DuplicateAction(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("invalid param '{0}': expected key=value")]
    InvalidParam(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LogicError {
    /// Wrap a manifest failure raised during engine initialization.
    pub fn manifest(err: LogicError) -> Self {
        LogicError::Manifest(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, LogicError>;
