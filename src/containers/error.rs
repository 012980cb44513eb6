use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Container engine CLI is not installed")]
    NotInstalled,

    #[error("Container engine daemon is not running")]
    DaemonNotRunning,

    #[error("Permission denied talking to the container engine")]
    PermissionDenied,

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Failed to create container: {0}")]
    CreateFailed(String),

    #[error("Failed to start container {id}: {message}")]
    StartFailed { id: String, message: String },

    #[error("Failed to stop container: {0}")]
    StopFailed(String),

    #[error("Failed to remove container: {0}")]
    RemoveFailed(String),

    #[error("Failed to exec in container: {0}")]
    ExecFailed(String),

    #[error("Engine command failed: {0}")]
    CommandFailed(String),

    #[error("Unexpected engine response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Map the stderr of a failed engine command onto the error kinds callers
/// branch on. `fallback` builds the error for anything unrecognised.
pub(crate) fn classify_stderr(
    stderr: &str,
    subject: &str,
    fallback: impl FnOnce(String) -> EngineError,
) -> EngineError {
    let lowered = stderr.to_lowercase();
    if lowered.contains("permission denied") {
        return EngineError::PermissionDenied;
    }
    if stderr.contains("Cannot connect to the Docker daemon")
        || lowered.contains("unable to connect to podman")
    {
        return EngineError::DaemonNotRunning;
    }
    if lowered.contains("no such container") {
        return EngineError::ContainerNotFound(subject.to_string());
    }
    if lowered.contains("no such image") || lowered.contains("unable to find image") {
        return EngineError::ImageNotFound(subject.to_string());
    }
    fallback(stderr.trim().to_string())
}
