//! Registered-name addressing of containers
//!
//! Resolves the registrar's service names to running containers and runs
//! the stop, list, run and exec operations against a [`ContainerEngine`].
//!
//! [`ContainerEngine`]: crate::containers::ContainerEngine

pub mod dispatch;
pub mod error;
pub mod index;
pub mod resolve;
#[cfg(test)]
pub(crate) mod testing;
pub mod volume;

pub use dispatch::{exec, list, list_registered, run, stop, RunRequest, DEFAULT_STOP_TIMEOUT_SECS};
pub use error::{Result, ServiceError};
pub use index::NameIndex;
pub use resolve::{registered_name, resolve_registered_name, SERVICE_NAME_ENV};
pub use volume::{bind_table, parse_volumes, VolumeSpec};
