//! Graph executor: node storage, wiring and the per-frame traversal step.
//!
//! Each `traverse()`:
//! 1. Recompute the execution order if the topology changed.
//! 2. For each node in topological order, merge its parents' outputs into its input.
//! 3. Clear the node's output buffer and step it.
//! 4. Advance the frame counter.
//!
//! Unlike a free-running pipeline, values reach children in the same step they
//! are produced: a parent always steps before its children.

use crate::error::{RecorderError, Result};
use crate::graph::id::NodeId;
use crate::graph::node::{GraphNode, StepContext};
use crate::graph::port::{PortDescriptor, PortRegistry};
use crate::graph::value::PortValues;
use crate::session::Recordable;

/// A slot holding a node and its per-step I/O buffers.
pub struct NodeSlot {
    pub node: Box<dyn GraphNode>,
    pub parents: Vec<NodeId>,
    pub input_buf: PortValues,
    pub output_buf: PortValues,
    /// Whether this node has been removed (slot is empty).
    pub removed: bool,
}

impl NodeSlot {
    pub fn new(node: Box<dyn GraphNode>, parents: Vec<NodeId>) -> Self {
        Self {
            node,
            parents,
            input_buf: PortValues::new(),
            output_buf: PortValues::new(),
            removed: false,
        }
    }
}

/// A step-driven data graph.
pub struct DataGraph {
    nodes: Vec<NodeSlot>,
    ports: PortRegistry,
    /// Topological execution order (indices into `nodes`). Recomputed on graph change.
    execution_order: Vec<usize>,
    /// True when execution_order needs recomputing (deferred topo sort).
    execution_order_dirty: bool,
    frame: u64,
}

impl Default for DataGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ports: PortRegistry::new(),
            execution_order: Vec::new(),
            execution_order_dirty: false,
            frame: 0,
        }
    }

    /// The graph-wide port registry. Nodes resolve their handles against it
    /// when they are constructed.
    pub fn ports(&self) -> &PortRegistry {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut PortRegistry {
        &mut self.ports
    }

    /// Number of frames traversed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ── Graph building ──

    /// Add a node with no parent (a data source).
    pub fn add_root(&mut self, node: Box<dyn GraphNode>) -> Result<NodeId> {
        self.register_ports(node.ports())?;
        if let Some(missing) = node.ports().iter().find(|p| p.is_input() && p.required) {
            return Err(RecorderError::PortResolution {
                port: missing.name.to_string(),
                reason: format!("root node '{}' has no parent to provide it", node.name()),
            });
        }
        Ok(self.push_slot(node, Vec::new()))
    }

    /// Add `node` as a child of `parent`.
    ///
    /// Every required input of the child must be declared as an output of the
    /// parent with the same kind.
    pub fn add_child(&mut self, parent: NodeId, node: Box<dyn GraphNode>) -> Result<NodeId> {
        self.check_live(parent)?;
        self.register_ports(node.ports())?;
        self.check_required_inputs(&[parent], node.as_ref())?;
        Ok(self.push_slot(node, vec![parent]))
    }

    /// Add an extra parent to an existing node.
    pub fn connect(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_live(parent)?;
        self.check_live(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(RecorderError::Graph(format!(
                "connecting {} -> {} would create a cycle",
                parent, child
            )));
        }
        let slot = &mut self.nodes[child.index()];
        if !slot.parents.contains(&parent) {
            slot.parents.push(parent);
            self.execution_order_dirty = true;
        }
        Ok(())
    }

    /// Remove a node and everything below it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        self.check_live(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.nodes[current.index()];
            if slot.removed {
                continue;
            }
            slot.removed = true;
            slot.input_buf.clear();
            slot.output_buf.clear();
            tracing::debug!("Removed node '{}' ({})", slot.node.name(), current);
            stack.extend(self.children(current));
        }
        self.execution_order_dirty = true;
        Ok(())
    }

    fn push_slot(&mut self, node: Box<dyn GraphNode>, parents: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        tracing::debug!("Added node '{}' as {}", node.name(), id);
        self.nodes.push(NodeSlot::new(node, parents));
        self.execution_order_dirty = true;
        id
    }

    fn register_ports(&mut self, ports: &[PortDescriptor]) -> Result<()> {
        for port in ports {
            self.ports.define(port.name, port.kind)?;
        }
        Ok(())
    }

    fn check_required_inputs(&self, parents: &[NodeId], node: &dyn GraphNode) -> Result<()> {
        for input in node.ports().iter().filter(|p| p.is_input() && p.required) {
            let provided = parents.iter().any(|parent| {
                self.nodes[parent.index()]
                    .node
                    .ports()
                    .iter()
                    .any(|out| out.is_output() && out.name == input.name && out.kind == input.kind)
            });
            if !provided {
                return Err(RecorderError::PortResolution {
                    port: input.name.to_string(),
                    reason: format!("no parent of '{}' outputs a {:?}", node.name(), input.kind),
                });
            }
        }
        Ok(())
    }

    fn check_live(&self, id: NodeId) -> Result<()> {
        match self.nodes.get(id.index()) {
            Some(slot) if !slot.removed => Ok(()),
            _ => Err(RecorderError::Graph(format!("no such node {}", id))),
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut stack = vec![of];
        let mut visited = vec![false; self.nodes.len()];
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if std::mem::replace(&mut visited[current.index()], true) {
                continue;
            }
            stack.extend(self.nodes[current.index()].parents.iter().copied());
        }
        false
    }

    // ── Queries ──

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|s| !s.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.check_live(id).is_ok()
    }

    /// Ids of all live nodes, in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.removed)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Live children of `id`.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.removed && slot.parents.contains(&id))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Find a live node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|slot| !slot.removed && slot.node.name() == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn GraphNode> {
        self.nodes
            .get(id.index())
            .filter(|slot| !slot.removed)
            .map(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut (dyn GraphNode + 'static)> {
        self.nodes
            .get_mut(id.index())
            .filter(|slot| !slot.removed)
            .map(|slot| slot.node.as_mut())
    }

    /// The session capability of node `id`, if it is a recorder.
    pub fn recordable_mut(&mut self, id: NodeId) -> Option<&mut dyn Recordable> {
        self.node_mut(id).and_then(|node| node.as_recordable_mut())
    }

    /// Values node `id` produced on the last step.
    pub fn outputs(&self, id: NodeId) -> Option<&PortValues> {
        self.nodes
            .get(id.index())
            .filter(|slot| !slot.removed)
            .map(|slot| &slot.output_buf)
    }

    // ── Topological sort (Kahn's algorithm) ──

    fn recompute_execution_order(&mut self) {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (to, slot) in self.nodes.iter().enumerate() {
            if slot.removed {
                continue;
            }
            for parent in &slot.parents {
                let from = parent.index();
                if from < n && !self.nodes[from].removed {
                    adj[from].push(to);
                    in_degree[to] += 1;
                }
            }
        }

        // Lowest index first keeps sibling order stable across recomputes.
        let mut queue: std::collections::BinaryHeap<std::cmp::Reverse<usize>> = (0..n)
            .filter(|&i| !self.nodes[i].removed && in_degree[i] == 0)
            .map(std::cmp::Reverse)
            .collect();
        let mut order = Vec::with_capacity(n);

        while let Some(std::cmp::Reverse(node)) = queue.pop() {
            order.push(node);
            for &next in &adj[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push(std::cmp::Reverse(next));
                }
            }
        }

        let live = self.nodes.iter().filter(|s| !s.removed).count();
        if order.len() != live {
            tracing::warn!(
                "Data graph has a cycle! Only {} of {} nodes scheduled.",
                order.len(),
                live
            );
        }

        self.execution_order = order;
    }

    // ── Traversal ──

    /// Run one traversal step over every live node.
    pub fn traverse(&mut self) {
        if self.execution_order_dirty {
            self.recompute_execution_order();
            self.execution_order_dirty = false;
        }

        for i in 0..self.execution_order.len() {
            let idx = self.execution_order[i];

            let mut input = std::mem::take(&mut self.nodes[idx].input_buf);
            input.clear();
            for p in 0..self.nodes[idx].parents.len() {
                let parent = self.nodes[idx].parents[p].index();
                input.merge_from(&self.nodes[parent].output_buf);
            }

            let slot = &mut self.nodes[idx];
            slot.input_buf = input;
            slot.output_buf.clear();

            let mut ctx = StepContext {
                input: &slot.input_buf,
                output: &mut slot.output_buf,
                frame: self.frame,
            };
            slot.node.step(&mut ctx);
        }

        self.frame += 1;
    }
}
