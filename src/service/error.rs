use thiserror::Error;

use crate::containers::error::EngineError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid volume specification: {0}")]
    InvalidVolumeSpec(String),

    #[error("Invalid command string: {0}")]
    InvalidCommand(String),

    #[error("No matching containers found for name: {0}")]
    NotFound(String),

    #[error("Too many matching containers found for name: {name} ({count} containers)")]
    AmbiguousName { name: String, count: usize },

    #[error("Cannot determine registered name of container {id} (image '{image}')")]
    NameResolution { id: String, image: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
