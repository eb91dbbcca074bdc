use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config IO error: {0}")]
    ConfigIo(String),

    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}

/// A returned `OpError` means the session state is exactly what it was
/// before the call; operations leave no partial writes behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("Motion rejected: active priority {active} >= requested {requested}")]
    MotionRejected { active: u8, requested: u8 },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Operation failed: {0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
pub type OpResult<T> = Result<T, OpError>;
