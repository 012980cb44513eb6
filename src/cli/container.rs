//! `regtool stop|list|run|exec` implementation

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::containers::{ensure_engine_ready, ContainerEngine};
use crate::service::{self, RunRequest, DEFAULT_STOP_TIMEOUT_SECS};

#[derive(Args, Debug)]
pub struct StopArgs {
    /// Registered container name
    pub name: String,

    /// Remove the containers and their anonymous volumes after stopping
    #[arg(long)]
    pub rm: bool,

    /// Seconds to wait for a graceful stop before the engine kills the container
    #[arg(short, long, default_value_t = DEFAULT_STOP_TIMEOUT_SECS)]
    pub timeout: u32,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image to run
    pub image: String,

    /// Registered container name
    pub name: String,

    /// Command string
    #[arg(short, long)]
    pub command: Option<String>,

    /// Volume mount (host:guest[:ro]), can be repeated
    #[arg(short = 'v', long = "volume", value_name = "HOST:GUEST[:ro]")]
    pub volumes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Interactive TTY
    #[arg(short, long)]
    pub interactive: bool,

    /// Registered container name
    pub name: String,

    /// Command and its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// `binary` names the engine CLI in the error when it cannot be used.
fn ready(engine: &impl ContainerEngine, binary: &str) -> Result<()> {
    ensure_engine_ready(engine)
        .with_context(|| format!("Cannot use container engine `{}`", binary))
}

pub(super) fn stop(engine: &impl ContainerEngine, binary: &str, args: StopArgs) -> Result<i32> {
    ready(engine, binary)?;
    let stopped = service::stop(engine, &args.name, args.rm, args.timeout)?;
    tracing::info!("Stopped {} container(s) for {}", stopped, args.name);
    Ok(0)
}

pub(super) fn list(
    engine: &impl ContainerEngine,
    binary: &str,
    out: &mut impl Write,
) -> Result<i32> {
    ready(engine, binary)?;
    service::list(engine, out)?;
    Ok(0)
}

pub(super) fn run(engine: &impl ContainerEngine, binary: &str, args: RunArgs) -> Result<i32> {
    let request = RunRequest {
        image: args.image,
        registered_name: args.name,
        command: args.command,
        volumes: args.volumes,
    };
    // Bad volumes and commands are reported even when the engine is down
    request.to_create_request()?;
    ready(engine, binary)?;
    let id = service::run(engine, &request)?;
    tracing::info!("Started container {} as {}", id, request.registered_name);
    Ok(0)
}

pub(super) fn exec(
    engine: &impl ContainerEngine,
    binary: &str,
    args: ExecArgs,
    out: &mut impl Write,
) -> Result<i32> {
    ready(engine, binary)?;
    let code = service::exec(engine, &args.name, &args.command, args.interactive, out)?;
    // Exit statuses outside the i32 range cannot be reported faithfully
    Ok(i32::try_from(code).unwrap_or(1))
}
