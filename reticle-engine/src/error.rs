//! Error types for reticle-engine

use reticle_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Detector error: {0}")]
    Detector(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session already running")]
    AlreadyRunning,

    #[error("Session closed")]
    SessionClosed,

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
