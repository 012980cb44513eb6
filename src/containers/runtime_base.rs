use std::borrow::Cow;
use std::process::{Command, Output, Stdio};

use super::container_interface::{
    ContainerDetails, ContainerSummary, CreateContainerRequest, ExecRequest, ExecSession,
};
use super::error::{classify_stderr, EngineError, Result};
use super::exec::ProcessExecSession;

/// Shared implementation for CLI-driven container engines.
///
/// Captures the behavioral differences between engines (Docker, Podman)
/// as configuration, then provides a single implementation of the shared logic.
pub(crate) struct RuntimeBase {
    /// CLI binary name or path (e.g., "docker", "podman", "/usr/local/bin/docker")
    pub binary: Cow<'static, str>,
    /// Human-readable name for log messages (e.g., "Docker", "Podman")
    pub name: &'static str,
    /// Args to check if daemon is running
    pub daemon_check_args: &'static [&'static str],
}

impl RuntimeBase {
    pub const DOCKER: Self = Self {
        binary: Cow::Borrowed("docker"),
        name: "Docker",
        daemon_check_args: &["info"],
    };

    pub const PODMAN: Self = Self {
        binary: Cow::Borrowed("podman"),
        name: "Podman",
        daemon_check_args: &["info"],
    };

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Cow::Owned(binary.into());
        self
    }

    pub fn command(&self) -> Command {
        Command::new(self.binary.as_ref())
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        tracing::debug!("{} args: {}", self.name, args.join(" "));
        let output = self.command().args(args).stdin(Stdio::null()).output()?;
        if !output.status.success() {
            tracing::debug!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        }
        Ok(output)
    }

    pub fn is_available(&self) -> bool {
        self.command()
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn is_daemon_running(&self) -> bool {
        self.command()
            .args(self.daemon_check_args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn get_version(&self) -> Result<String> {
        let output = self.command().arg("--version").output()?;

        if !output.status.success() {
            return Err(EngineError::NotInstalled);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let args = [
            "ps",
            "--no-trunc",
            "--format",
            "{{.ID}}\t{{.Image}}",
        ]
        .map(String::from);
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr, "", EngineError::CommandFailed));
        }

        parse_container_listing(&String::from_utf8_lossy(&output.stdout))
    }

    pub fn inspect_container(&self, id: &str) -> Result<ContainerDetails> {
        let args = ["container", "inspect", id].map(String::from);
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr, id, EngineError::CommandFailed));
        }

        let mut records: Vec<ContainerDetails> = serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
        if records.is_empty() {
            return Err(EngineError::ContainerNotFound(id.to_string()));
        }
        Ok(records.swap_remove(0))
    }

    pub fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<()> {
        let args = vec![
            "stop".to_string(),
            "-t".to_string(),
            timeout_secs.to_string(),
            id.to_string(),
        ];
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr, id, EngineError::StopFailed));
        }

        Ok(())
    }

    pub fn remove_container(&self, id: &str, remove_volumes: bool) -> Result<()> {
        let mut args = vec!["rm".to_string()];
        if remove_volumes {
            args.push("-v".to_string());
        }
        args.push(id.to_string());

        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr, id, EngineError::RemoveFailed));
        }

        Ok(())
    }

    pub fn build_create_args(&self, request: &CreateContainerRequest) -> Vec<String> {
        let mut args = vec!["create".to_string()];

        for (key, value) in &request.environment {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }

        for (host, mount) in &request.binds {
            let spec = if mount.ro {
                format!("{}:{}:ro", host, mount.bind)
            } else {
                format!("{}:{}", host, mount.bind)
            };
            args.push("-v".to_string());
            args.push(spec);
        }

        // Mount points with no bind become anonymous volumes
        for guest in &request.volumes {
            if !request.binds.values().any(|m| &m.bind == guest) {
                args.push("-v".to_string());
                args.push(guest.clone());
            }
        }

        args.push(request.image.clone());

        if let Some(command) = &request.command {
            args.extend(command.iter().cloned());
        }

        args
    }

    pub fn run_create(&self, request: &CreateContainerRequest) -> Result<String> {
        let args = self.build_create_args(request);
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(
                &stderr,
                &request.image,
                EngineError::CreateFailed,
            ));
        }

        let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if container_id.is_empty() {
            return Err(EngineError::InvalidResponse(
                "create returned no container id".to_string(),
            ));
        }
        Ok(container_id)
    }

    pub fn start_container(&self, id: &str) -> Result<()> {
        let args = ["start", id].map(String::from);
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr, id, |message| {
                EngineError::StartFailed {
                    id: id.to_string(),
                    message,
                }
            }));
        }

        Ok(())
    }

    pub fn create_exec(
        &self,
        container_id: &str,
        command: &[String],
        tty: bool,
    ) -> Result<ExecRequest> {
        if command.is_empty() {
            return Err(EngineError::ExecFailed("no command given".to_string()));
        }
        Ok(ExecRequest {
            container_id: container_id.to_string(),
            command: command.to_vec(),
            tty,
        })
    }

    pub fn build_exec_args(&self, exec: &ExecRequest) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        if exec.tty {
            args.push("-i".to_string());
            args.push("-t".to_string());
        }
        args.push(exec.container_id.clone());
        args.extend(exec.command.iter().cloned());
        args
    }

    pub fn start_exec(&self, exec: &ExecRequest) -> Result<Box<dyn ExecSession>> {
        let args = self.build_exec_args(exec);
        tracing::debug!("{} exec args: {}", self.name, args.join(" "));

        let mut cmd = self.command();
        cmd.args(&args);
        // Interactive sessions own our terminal
        let session = if exec.tty {
            cmd.stdin(Stdio::inherit());
            ProcessExecSession::attached(cmd, &exec.container_id)?
        } else {
            cmd.stdin(Stdio::null());
            ProcessExecSession::spawn(cmd, &exec.container_id)?
        };
        Ok(Box::new(session))
    }
}

/// Parse `ps` output formatted as `{{.ID}}\t{{.Image}}`.
pub(crate) fn parse_container_listing(stdout: &str) -> Result<Vec<ContainerSummary>> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (id, image) = line.split_once('\t').ok_or_else(|| {
                EngineError::InvalidResponse(format!("unexpected listing line: {}", line))
            })?;
            Ok(ContainerSummary {
                id: id.trim().to_string(),
                image: image.trim().to_string(),
            })
        })
        .collect()
}
