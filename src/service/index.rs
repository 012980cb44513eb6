use std::collections::HashMap;

use crate::containers::{ContainerEngine, ContainerSummary};

use super::error::Result;
use super::resolve::registered_name;

/// Registered name -> running containers, each group in engine listing order.
#[derive(Debug, Default)]
pub struct NameIndex {
    groups: HashMap<String, Vec<ContainerSummary>>,
}

impl NameIndex {
    /// Snapshot the engine's running containers. Built fresh on every call.
    pub fn build(engine: &impl ContainerEngine) -> Result<Self> {
        let mut index = Self::default();
        for container in engine.list_containers()? {
            let name = registered_name(engine, &container)?;
            index.insert(name, container);
        }
        Ok(index)
    }

    pub fn insert(&mut self, name: String, container: ContainerSummary) {
        self.groups.entry(name).or_default().push(container);
    }

    pub fn get(&self, name: &str) -> Option<&[ContainerSummary]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}
