//! Port descriptors and the graph-wide port registry.
//!
//! Each node declares its ports (inputs/outputs) via static `PortDescriptor` arrays.
//! Names are interned once into `PortHandle`s by the `PortRegistry`; after that
//! every lookup on the step path is an integer comparison.

use crate::error::{RecorderError, Result};
use crate::graph::id::PortHandle;
use std::collections::HashMap;

/// Well-known port names of pointer/keyboard data.
pub mod names {
    /// Pointer position in pixels.
    pub const PIXEL_XY: &str = "pixel_xy";
    /// Window size in pixels.
    pub const PIXEL_SIZE: &str = "pixel_size";
    /// Pointer position in normalized device coordinates (-1..1).
    pub const XY: &str = "xy";
    /// Button transitions of the frame.
    pub const BUTTON_EVENTS: &str = "button_events";
}

/// The kind of value flowing through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// A 2D vector (pointer position, window size).
    Vec2,
    /// A list of button events.
    ButtonEvents,
}

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Static descriptor for a node's port.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    pub kind: PortKind,
    /// Required inputs must be provided by the parent the node is attached under.
    pub required: bool,
}

impl PortDescriptor {
    pub const fn input(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            required: true,
        }
    }

    /// An input that may stay unconnected (e.g. no pointing device).
    pub const fn optional_input(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            required: false,
        }
    }

    pub const fn output(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            kind,
            required: false,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}

/// Interns port names to handles, graph-wide.
///
/// A name always maps to the same handle and the same kind. Registering a
/// name twice with different kinds is a resolution failure: two nodes
/// disagree about what flows through that port.
#[derive(Debug, Default)]
pub struct PortRegistry {
    names: Vec<(String, PortKind)>,
    by_name: HashMap<String, PortHandle>,
}

impl PortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name` with `kind`, returning its handle.
    pub fn define(&mut self, name: &str, kind: PortKind) -> Result<PortHandle> {
        if let Some(&handle) = self.by_name.get(name) {
            let existing = self.names[handle.index()].1;
            if existing != kind {
                return Err(RecorderError::PortResolution {
                    port: name.to_string(),
                    reason: format!("registered as {:?}, requested as {:?}", existing, kind),
                });
            }
            return Ok(handle);
        }

        let index = u16::try_from(self.names.len()).map_err(|_| RecorderError::PortResolution {
            port: name.to_string(),
            reason: "port registry is full".to_string(),
        })?;
        let handle = PortHandle(index);
        self.names.push((name.to_string(), kind));
        self.by_name.insert(name.to_string(), handle);
        Ok(handle)
    }

    /// Look up an already registered name.
    pub fn lookup(&self, name: &str) -> Result<PortHandle> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RecorderError::PortResolution {
                port: name.to_string(),
                reason: "no node in the graph declares this port".to_string(),
            })
    }

    /// Look up a name and check its kind.
    pub fn lookup_kind(&self, name: &str, kind: PortKind) -> Result<PortHandle> {
        let handle = self.lookup(name)?;
        let existing = self.names[handle.index()].1;
        if existing != kind {
            return Err(RecorderError::PortResolution {
                port: name.to_string(),
                reason: format!("registered as {:?}, requested as {:?}", existing, kind),
            });
        }
        Ok(handle)
    }

    pub fn name(&self, handle: PortHandle) -> Option<&str> {
        self.names.get(handle.index()).map(|(n, _)| n.as_str())
    }

    pub fn kind(&self, handle: PortHandle) -> Option<PortKind> {
        self.names.get(handle.index()).map(|(_, k)| *k)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
