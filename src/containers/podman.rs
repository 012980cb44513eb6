use super::container_interface::{
    ContainerDetails, ContainerEngine, ContainerSummary, CreateContainerRequest, ExecRequest,
    ExecSession,
};
use super::error::Result;
use super::runtime_base::RuntimeBase;

pub struct Podman {
    base: RuntimeBase,
}

impl Default for Podman {
    fn default() -> Self {
        Self {
            base: RuntimeBase::PODMAN,
        }
    }
}

impl Podman {
    /// Drive a specific `podman`-compatible binary instead of the one on `PATH`.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            base: RuntimeBase::PODMAN.with_binary(binary),
        }
    }
}

impl ContainerEngine for Podman {
    fn is_available(&self) -> bool {
        self.base.is_available()
    }

    fn is_daemon_running(&self) -> bool {
        self.base.is_daemon_running()
    }

    fn get_version(&self) -> Result<String> {
        self.base.get_version()
    }

    fn display_name(&self) -> &str {
        self.base.name
    }

    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        self.base.list_containers()
    }

    fn inspect_container(&self, id: &str) -> Result<ContainerDetails> {
        self.base.inspect_container(id)
    }

    fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<()> {
        self.base.stop_container(id, timeout_secs)
    }

    fn remove_container(&self, id: &str, remove_volumes: bool) -> Result<()> {
        self.base.remove_container(id, remove_volumes)
    }

    fn create_container(&self, request: &CreateContainerRequest) -> Result<String> {
        self.base.run_create(request)
    }

    fn start_container(&self, id: &str) -> Result<()> {
        self.base.start_container(id)
    }

    fn create_exec(
        &self,
        container_id: &str,
        command: &[String],
        tty: bool,
    ) -> Result<ExecRequest> {
        self.base.create_exec(container_id, command, tty)
    }

    fn start_exec(&self, exec: &ExecRequest) -> Result<Box<dyn ExecSession>> {
        self.base.start_exec(exec)
    }
}
