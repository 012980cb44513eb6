//! The stop, list, run and exec operations

use std::io::Write;

use tracing::{info, warn};

use crate::containers::{ContainerEngine, CreateContainerRequest};

use super::error::{Result, ServiceError};
use super::index::NameIndex;
use super::resolve::{registered_name, SERVICE_NAME_ENV};
use super::volume::{bind_table, parse_volumes};

pub const DEFAULT_STOP_TIMEOUT_SECS: u32 = 10;

/// `(registered name, image)` for every running container, sorted by name.
pub fn list_registered(engine: &impl ContainerEngine) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for container in engine.list_containers()? {
        let name = registered_name(engine, &container)?;
        pairs.push((name, container.image));
    }
    pairs.sort();
    Ok(pairs)
}

pub fn list(engine: &impl ContainerEngine, out: &mut impl Write) -> Result<()> {
    for (name, image) in list_registered(engine)? {
        writeln!(out, "{}\t{}", name, image)?;
    }
    out.flush()?;
    Ok(())
}

/// Stop every container registered as `name`, in listing order, optionally
/// removing each one (with its anonymous volumes) after it stops.
///
/// The first engine failure aborts the remaining containers.
/// Returns the number of containers stopped.
pub fn stop(
    engine: &impl ContainerEngine,
    name: &str,
    remove: bool,
    timeout_secs: u32,
) -> Result<usize> {
    let index = NameIndex::build(engine)?;
    let containers = index
        .get(name)
        .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;

    for container in containers {
        info!("Stopping container: {} {}", name, container.id);
        engine.stop_container(&container.id, timeout_secs)?;
        if remove {
            info!("Removing container: {} {}", name, container.id);
            engine.remove_container(&container.id, true)?;
        }
    }

    Ok(containers.len())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub image: String,
    pub registered_name: String,
    /// Split into arguments with shell quoting rules.
    pub command: Option<String>,
    /// `HOST:GUEST[:ro]` strings.
    pub volumes: Vec<String>,
}

impl RunRequest {
    /// Validate the request and turn it into what the engine is asked to create.
    /// Nothing is sent to the engine here.
    pub fn to_create_request(&self) -> Result<CreateContainerRequest> {
        let specs = parse_volumes(&self.volumes)?;
        let (binds, volumes) = bind_table(&specs);

        let command = self
            .command
            .as_deref()
            .map(|c| {
                shell_words::split(c)
                    .map_err(|e| ServiceError::InvalidCommand(format!("{}: {}", c, e)))
            })
            .transpose()?;

        Ok(CreateContainerRequest {
            image: self.image.clone(),
            environment: vec![(
                SERVICE_NAME_ENV.to_string(),
                self.registered_name.clone(),
            )],
            command,
            volumes,
            binds,
        })
    }
}

/// Create and start a container registered as `request.registered_name`.
///
/// A container that was created but failed to start is left in place.
pub fn run(engine: &impl ContainerEngine, request: &RunRequest) -> Result<String> {
    let create = request.to_create_request()?;
    let id = engine.create_container(&create)?;

    info!("Starting container: {} {}", request.registered_name, id);
    if let Err(e) = engine.start_container(&id) {
        warn!(
            "Container {} was created but did not start; remove it with `rm {}`",
            id, id
        );
        return Err(e.into());
    }

    Ok(id)
}

/// Run `command` in the single container registered as `name`, copying its
/// output to `out` as it arrives. Returns the command's exit code.
///
/// An interactive exec is attached to the terminal, so nothing reaches `out`.
pub fn exec(
    engine: &impl ContainerEngine,
    name: &str,
    command: &[String],
    interactive: bool,
    out: &mut impl Write,
) -> Result<i64> {
    let index = NameIndex::build(engine)?;
    let container = match index.get(name) {
        None => return Err(ServiceError::NotFound(name.to_string())),
        Some([single]) => single,
        Some(many) => {
            return Err(ServiceError::AmbiguousName {
                name: name.to_string(),
                count: many.len(),
            })
        }
    };

    info!("Exec container: {} {}", name, container.id);
    let exec = engine.create_exec(&container.id, command, interactive)?;
    let mut session = engine.start_exec(&exec)?;
    while let Some(chunk) = session.next_chunk()? {
        out.write_all(&chunk)?;
        out.flush()?;
    }

    Ok(session.exit_code()?)
}
