pub mod container_interface;
mod docker;
pub mod error;
mod exec;
mod podman;
pub(crate) mod runtime_base;

pub use container_interface::{
    BindMount, BindTable, ContainerDetails, ContainerEngine, ContainerSummary,
    CreateContainerRequest, ExecRequest, ExecSession, InspectConfig,
};
pub use docker::Docker;
use enum_dispatch::enum_dispatch;
use error::{EngineError, Result};
pub use podman::Podman;

#[enum_dispatch(ContainerEngine)]
pub enum EngineRuntime {
    Docker,
    Podman,
}

impl Default for EngineRuntime {
    fn default() -> Self {
        Docker::default().into()
    }
}

/// Which engine CLI to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EngineName {
    #[default]
    Docker,
    Podman,
}

impl EngineName {
    /// Returns the CLI binary name for this engine.
    pub fn binary(self) -> &'static str {
        match self {
            EngineName::Docker => "docker",
            EngineName::Podman => "podman",
        }
    }
}

pub fn get_engine_runtime(name: EngineName, binary: Option<&str>) -> EngineRuntime {
    match (name, binary) {
        (EngineName::Docker, None) => Docker::default().into(),
        (EngineName::Docker, Some(bin)) => Docker::with_binary(bin).into(),
        (EngineName::Podman, None) => Podman::default().into(),
        (EngineName::Podman, Some(bin)) => Podman::with_binary(bin).into(),
    }
}

/// Fail early with a readable error when the engine cannot be used at all.
pub fn ensure_engine_ready(engine: &impl ContainerEngine) -> Result<()> {
    if !engine.is_available() {
        return Err(EngineError::NotInstalled);
    }
    if !engine.is_daemon_running() {
        return Err(EngineError::DaemonNotRunning);
    }
    tracing::debug!(
        "Using {} ({})",
        engine.display_name(),
        engine.get_version().unwrap_or_default()
    );
    Ok(())
}
