//! Registry of the recorders a controller drives.

use crate::error::{RecorderError, Result};
use crate::graph::{DataGraph, NodeId};

/// Recorder names mapped to their graph nodes, in registration order.
///
/// The name is what ties a recorded stream back to a node on playback, so it
/// must be unique and stable across runs.
#[derive(Debug, Clone, Default)]
pub struct RecorderTable {
    entries: Vec<(String, NodeId)>,
}

impl RecorderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every recordable node of `graph`, keyed by node name.
    pub fn discover(graph: &mut DataGraph) -> Result<Self> {
        let mut table = Self::new();
        for id in graph.node_ids() {
            let name = match graph.node(id) {
                Some(node) => node.name().to_string(),
                None => continue,
            };
            if graph.recordable_mut(id).is_some() {
                table.add(name, id)?;
            }
        }
        Ok(table)
    }

    /// Register a recorder under `name`.
    pub fn add(&mut self, name: impl Into<String>, id: NodeId) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(RecorderError::Config(format!(
                "recorder name '{}' is already registered",
                name
            )));
        }
        self.entries.push((name, id));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<NodeId> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
