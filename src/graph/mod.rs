//! Step-driven data graph.
//!
//! Data flows from sources (input devices) through intermediate nodes (recorders,
//! filters) to sinks. Each traversal step is one frame: every node runs once,
//! parents before children, and sees exactly the values its parents produced
//! that frame.
//!
//! # Architecture
//!
//! ```text
//! [PointerSource] ──► [MouseRecorder] ──► [EventLog]
//!                                    └──► (any node expecting pointer data)
//! ```
//!
//! # Design
//!
//! - **Port handles**: port names are interned once into `PortHandle`s; nodes
//!   resolve them at construction and never look names up while stepping.
//! - **Same-step propagation**: a child's input is the merge of its parents'
//!   outputs from the current step.
//! - **Capabilities**: `GraphNode` for traversal, `Recordable` (see `session`)
//!   for nodes whose data can be captured into a session.

pub mod executor;
pub mod id;
pub mod node;
pub mod nodes;
pub mod port;
pub mod value;

pub use executor::{DataGraph, NodeSlot};
pub use id::{NodeId, PortHandle};
pub use node::{GraphNode, StepContext};
pub use nodes::{DeviceInput, EventLog, LoggedFrame, PointerSource};
pub use port::{names, PortDescriptor, PortDirection, PortKind, PortRegistry};
pub use value::{EventValue, PortValues};
