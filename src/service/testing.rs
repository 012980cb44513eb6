//! In-memory engine that records every request, for dispatcher tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

use crate::containers::error::{EngineError, Result};
use crate::containers::{
    ContainerDetails, ContainerEngine, ContainerSummary, CreateContainerRequest, ExecRequest,
    ExecSession, InspectConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Inspect(String),
    Stop { id: String, timeout_secs: u32 },
    Remove { id: String, remove_volumes: bool },
    Create(CreateContainerRequest),
    Start(String),
    CreateExec(ExecRequest),
    StartExec(ExecRequest),
}

struct FakeContainer {
    summary: ContainerSummary,
    env: Option<Vec<String>>,
}

#[derive(Default)]
pub struct FakeEngine {
    containers: Vec<FakeContainer>,
    calls: RefCell<Vec<Call>>,
    readiness_checks: Cell<usize>,
    daemon_down: bool,
    fail_list: bool,
    fail_stop: HashSet<String>,
    fail_start: bool,
    exec_output: Vec<Vec<u8>>,
    exec_exit_code: i64,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running container, optionally carrying `SERVICE_NAME`.
    pub fn with_container(mut self, id: &str, image: &str, service_name: Option<&str>) -> Self {
        let env = service_name.map(|name| {
            vec![
                "PATH=/usr/local/bin:/usr/bin".to_string(),
                format!("SERVICE_NAME={}", name),
            ]
        });
        self.containers.push(FakeContainer {
            summary: ContainerSummary {
                id: id.to_string(),
                image: image.to_string(),
            },
            env,
        });
        self
    }

    /// Report the daemon as not running.
    pub fn without_daemon(mut self) -> Self {
        self.daemon_down = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_stop(mut self, id: &str) -> Self {
        self.fail_stop.insert(id.to_string());
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn with_exec_result(mut self, chunks: &[&[u8]], exit_code: i64) -> Self {
        self.exec_output = chunks.iter().map(|c| c.to_vec()).collect();
        self.exec_exit_code = exit_code;
        self
    }

    /// How many times availability or daemon state was asked for.
    pub fn readiness_checks(&self) -> usize {
        self.readiness_checks.get()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than listing and inspection.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::List | Call::Inspect(_)))
            .cloned()
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

struct FakeExecSession {
    chunks: VecDeque<Vec<u8>>,
    exit_code: i64,
}

impl ExecSession for FakeExecSession {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.chunks.pop_front())
    }

    fn exit_code(self: Box<Self>) -> Result<i64> {
        Ok(self.exit_code)
    }
}

impl ContainerEngine for FakeEngine {
    fn is_available(&self) -> bool {
        self.readiness_checks.set(self.readiness_checks.get() + 1);
        true
    }

    fn is_daemon_running(&self) -> bool {
        self.readiness_checks.set(self.readiness_checks.get() + 1);
        !self.daemon_down
    }

    fn get_version(&self) -> Result<String> {
        Ok("fake 1.0".to_string())
    }

    fn display_name(&self) -> &str {
        "Fake"
    }

    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        self.record(Call::List);
        if self.fail_list {
            return Err(EngineError::DaemonNotRunning);
        }
        Ok(self.containers.iter().map(|c| c.summary.clone()).collect())
    }

    fn inspect_container(&self, id: &str) -> Result<ContainerDetails> {
        self.record(Call::Inspect(id.to_string()));
        let container = self
            .containers
            .iter()
            .find(|c| c.summary.id == id)
            .ok_or_else(|| EngineError::ContainerNotFound(id.to_string()))?;
        Ok(ContainerDetails {
            config: Some(InspectConfig {
                env: container.env.clone(),
            }),
        })
    }

    fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<()> {
        self.record(Call::Stop {
            id: id.to_string(),
            timeout_secs,
        });
        if self.fail_stop.contains(id) {
            return Err(EngineError::StopFailed(format!("cannot stop {}", id)));
        }
        Ok(())
    }

    fn remove_container(&self, id: &str, remove_volumes: bool) -> Result<()> {
        self.record(Call::Remove {
            id: id.to_string(),
            remove_volumes,
        });
        Ok(())
    }

    fn create_container(&self, request: &CreateContainerRequest) -> Result<String> {
        self.record(Call::Create(request.clone()));
        Ok("created0001".to_string())
    }

    fn start_container(&self, id: &str) -> Result<()> {
        self.record(Call::Start(id.to_string()));
        if self.fail_start {
            return Err(EngineError::StartFailed {
                id: id.to_string(),
                message: "port is already allocated".to_string(),
            });
        }
        Ok(())
    }

    fn create_exec(
        &self,
        container_id: &str,
        command: &[String],
        tty: bool,
    ) -> Result<ExecRequest> {
        let exec = ExecRequest {
            container_id: container_id.to_string(),
            command: command.to_vec(),
            tty,
        };
        self.record(Call::CreateExec(exec.clone()));
        Ok(exec)
    }

    fn start_exec(&self, exec: &ExecRequest) -> Result<Box<dyn ExecSession>> {
        self.record(Call::StartExec(exec.clone()));
        Ok(Box::new(FakeExecSession {
            chunks: self.exec_output.iter().cloned().collect(),
            exit_code: self.exec_exit_code,
        }))
    }
}
