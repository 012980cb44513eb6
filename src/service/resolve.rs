//! Registered name resolution
//!
//! A container's registered name is the `SERVICE_NAME` the registrar reads
//! from its environment. Containers started without one are addressed by the
//! base name of their image instead.

use std::sync::OnceLock;

use regex::Regex;

use crate::containers::{ContainerDetails, ContainerEngine, ContainerSummary};

use super::error::{Result, ServiceError};

pub const SERVICE_NAME_ENV: &str = "SERVICE_NAME";

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([\w./-]*/)?([\w.-]+)(:[\w.-]+)?$").expect("image pattern is valid")
    })
}

/// `SERVICE_NAME` from a `KEY=VALUE` environment.
///
/// An entry without `=` makes the whole environment unusable.
/// Later duplicates override earlier ones.
pub fn service_name_from_env(env: &[String]) -> Option<&str> {
    let mut found = None;
    for entry in env {
        let (key, value) = entry.split_once('=')?;
        if key == SERVICE_NAME_ENV {
            found = Some(value);
        }
    }
    found.filter(|v| !v.is_empty())
}

/// Base name of an image reference: `registry.example.com/team/app:1.2` -> `app`.
pub fn name_from_image(image: &str) -> Option<&str> {
    image_pattern()
        .captures(image)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

pub fn resolve_registered_name(
    summary: &ContainerSummary,
    details: &ContainerDetails,
) -> Result<String> {
    if let Some(name) = details.env().and_then(service_name_from_env) {
        return Ok(name.to_string());
    }

    name_from_image(&summary.image)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::NameResolution {
            id: summary.id.clone(),
            image: summary.image.clone(),
        })
}

/// Inspect a listed container and resolve its registered name.
pub fn registered_name(engine: &impl ContainerEngine, summary: &ContainerSummary) -> Result<String> {
    let details = engine.inspect_container(&summary.id)?;
    resolve_registered_name(summary, &details)
}
