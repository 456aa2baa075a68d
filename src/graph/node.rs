//! Node abstraction for the data graph.
//!
//! Every node implements `GraphNode`. A node that can also be captured into a
//! session exposes its second capability through `as_recordable_mut`, so the
//! graph and the session controller each see only the interface they need.

use crate::graph::port::PortDescriptor;
use crate::graph::value::PortValues;
use crate::session::Recordable;

/// Context passed to a node each traversal step.
pub struct StepContext<'a> {
    /// Values produced upstream this step.
    pub input: &'a PortValues,
    /// Output buffer, cleared before the step. The node writes its results here.
    pub output: &'a mut PortValues,
    /// Monotonic frame counter of the graph.
    pub frame: u64,
}

/// A participant in graph traversal.
pub trait GraphNode {
    /// Human-readable name of this node.
    fn name(&self) -> &str;

    /// Port descriptors for this node.
    fn ports(&self) -> &[PortDescriptor];

    /// Called once per traversal step, after every parent has stepped.
    fn step(&mut self, ctx: &mut StepContext);

    /// The node's session capability, if it has one.
    fn as_recordable_mut(&mut self) -> Option<&mut dyn Recordable> {
        None
    }
}
