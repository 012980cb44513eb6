use std::collections::BTreeMap;

use super::error::Result;
use enum_dispatch::enum_dispatch;
use serde::Deserialize;

/// One row of the engine's running-container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Image reference the container was created from, e.g. `repo/name:tag`.
    pub image: String,
}

/// The subset of `container inspect` output this tool consults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDetails {
    #[serde(default)]
    pub config: Option<InspectConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectConfig {
    /// `KEY=VALUE` entries; the engine reports `null` when unset.
    #[serde(default)]
    pub env: Option<Vec<String>>,
}

impl ContainerDetails {
    pub fn env(&self) -> Option<&[String]> {
        self.config.as_ref()?.env.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    /// Path inside the container.
    pub bind: String,
    pub ro: bool,
}

/// Host path -> bind mount.
pub type BindTable = BTreeMap<String, BindMount>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContainerRequest {
    pub image: String,
    pub environment: Vec<(String, String)>,
    pub command: Option<Vec<String>>,
    /// Guest mount points, in the order the volumes were given.
    pub volumes: Vec<String>,
    pub binds: BindTable,
}

/// An exec that has been created but not yet started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub container_id: String,
    pub command: Vec<String>,
    pub tty: bool,
}

/// A running exec. Yields combined stdout/stderr chunks until the remote
/// command finishes, then reports its exit code. A TTY exec writes to the
/// terminal directly and yields no chunks.
pub trait ExecSession {
    /// Next chunk of output, or `None` once the stream has ended.
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;

    /// Wait for the exec to finish and return its exit code.
    ///
    /// Fails instead when the engine itself could not run the command.
    fn exit_code(self: Box<Self>) -> Result<i64>;
}

#[enum_dispatch]
pub trait ContainerEngine {
    /// Check if the engine CLI is available
    fn is_available(&self) -> bool;

    /// Check if the engine daemon is running
    fn is_daemon_running(&self) -> bool;

    /// Get the engine version string
    fn get_version(&self) -> Result<String>;

    /// Human-readable engine name for messages
    fn display_name(&self) -> &str;

    /// Running containers, in engine listing order.
    fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    fn inspect_container(&self, id: &str) -> Result<ContainerDetails>;

    fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<()>;

    /// Remove a stopped container, optionally with its anonymous volumes.
    fn remove_container(&self, id: &str, remove_volumes: bool) -> Result<()>;

    /// Create a container and return its id.
    fn create_container(&self, request: &CreateContainerRequest) -> Result<String>;

    fn start_container(&self, id: &str) -> Result<()>;

    fn create_exec(&self, container_id: &str, command: &[String], tty: bool)
        -> Result<ExecRequest>;

    fn start_exec(&self, exec: &ExecRequest) -> Result<Box<dyn ExecSession>>;
}
