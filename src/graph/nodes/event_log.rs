//! EventLog node: forwards everything it receives to an observer over a channel.

use crate::graph::node::{GraphNode, StepContext};
use crate::graph::port::{names, PortDescriptor, PortKind};
use crate::graph::value::PortValues;
use crossbeam_channel::{unbounded, Receiver, Sender};

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::optional_input(names::PIXEL_XY, PortKind::Vec2),
    PortDescriptor::optional_input(names::PIXEL_SIZE, PortKind::Vec2),
    PortDescriptor::optional_input(names::XY, PortKind::Vec2),
    PortDescriptor::optional_input(names::BUTTON_EVENTS, PortKind::ButtonEvents),
];

/// The input a sink saw on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedFrame {
    pub frame: u64,
    pub values: PortValues,
}

/// Sink node: sends a copy of its input each step.
pub struct EventLog {
    name: String,
    tx: Sender<LoggedFrame>,
    dropped: u64,
}

impl EventLog {
    pub fn new(name: impl Into<String>) -> (Self, Receiver<LoggedFrame>) {
        let (tx, rx) = unbounded();
        let node = Self {
            name: name.into(),
            tx,
            dropped: 0,
        };
        (node, rx)
    }

    /// Frames that could not be delivered because the receiver was gone.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl GraphNode for EventLog {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn step(&mut self, ctx: &mut StepContext) {
        let logged = LoggedFrame {
            frame: ctx.frame,
            values: ctx.input.clone(),
        };
        if self.tx.send(logged).is_err() {
            self.dropped += 1;
            if self.dropped == 1 {
                tracing::warn!("EventLog '{}' has no receiver, dropping frames", self.name);
            }
        }
    }
}
