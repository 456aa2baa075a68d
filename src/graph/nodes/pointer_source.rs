//! PointerSource node: turns raw device input into per-frame port values.
//!
//! Device input arrives over a crossbeam channel from whatever thread owns the
//! window or input device. Each step drains the channel and emits the current
//! pointer state plus the button events received since the previous step.

use crate::error::Result;
use crate::events::{ButtonEvent, ButtonEventList, Point2, PointSample};
use crate::graph::id::PortHandle;
use crate::graph::node::{GraphNode, StepContext};
use crate::graph::port::{names, PortDescriptor, PortKind, PortRegistry};
use crossbeam_channel::{unbounded, Receiver, Sender};

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::output(names::PIXEL_XY, PortKind::Vec2),
    PortDescriptor::output(names::PIXEL_SIZE, PortKind::Vec2),
    PortDescriptor::output(names::XY, PortKind::Vec2),
    PortDescriptor::output(names::BUTTON_EVENTS, PortKind::ButtonEvents),
];

/// Raw input delivered to a `PointerSource`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceInput {
    /// The pointer moved to a new position.
    Moved { xy: Point2, pixel_xy: Point2 },
    /// The pointer left the window or the device went away.
    Left,
    /// The window was resized.
    Resized { width: f32, height: f32 },
    /// A button transition.
    Button(ButtonEvent),
}

/// Source node emitting pointer position, window size and button events.
pub struct PointerSource {
    name: String,
    rx: Receiver<DeviceInput>,
    pointer: PointSample,
    pixel_size: Option<Point2>,
    pixel_xy_output: PortHandle,
    pixel_size_output: PortHandle,
    xy_output: PortHandle,
    button_events_output: PortHandle,
}

impl PointerSource {
    /// Create the node and the sender device input is fed through.
    pub fn new(
        registry: &mut PortRegistry,
        name: impl Into<String>,
    ) -> Result<(Self, Sender<DeviceInput>)> {
        let (tx, rx) = unbounded();
        let node = Self {
            name: name.into(),
            rx,
            pointer: PointSample::ABSENT,
            pixel_size: None,
            pixel_xy_output: registry.define(names::PIXEL_XY, PortKind::Vec2)?,
            pixel_size_output: registry.define(names::PIXEL_SIZE, PortKind::Vec2)?,
            xy_output: registry.define(names::XY, PortKind::Vec2)?,
            button_events_output: registry.define(names::BUTTON_EVENTS, PortKind::ButtonEvents)?,
        };
        Ok((node, tx))
    }

    /// Current pointer state.
    pub fn pointer(&self) -> PointSample {
        self.pointer
    }
}

impl GraphNode for PointerSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn step(&mut self, ctx: &mut StepContext) {
        let mut buttons = ButtonEventList::new();
        for input in self.rx.try_iter() {
            match input {
                DeviceInput::Moved { xy, pixel_xy } => {
                    self.pointer = PointSample::at(xy, pixel_xy);
                }
                DeviceInput::Left => self.pointer.clear(),
                DeviceInput::Resized { width, height } => {
                    self.pixel_size = Some(Point2::new(width, height));
                }
                DeviceInput::Button(event) => buttons.push(event),
            }
        }

        if let Some((xy, pixel_xy)) = self.pointer.position() {
            ctx.output.set(self.xy_output, xy);
            ctx.output.set(self.pixel_xy_output, pixel_xy);
        }
        if let Some(size) = self.pixel_size {
            ctx.output.set(self.pixel_size_output, size);
        }
        ctx.output.set(self.button_events_output, buttons);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::value::PortValues;

    fn step(node: &mut PointerSource, frame: u64) -> PortValues {
        let input = PortValues::new();
        let mut output = PortValues::new();
        let mut ctx = StepContext {
            input: &input,
            output: &mut output,
            frame,
        };
        node.step(&mut ctx);
        output
    }

    #[test]
    fn test_emits_position_and_buttons() {
        let mut registry = PortRegistry::new();
        let (mut node, tx) = PointerSource::new(&mut registry, "mouse").unwrap();

        tx.send(DeviceInput::Moved {
            xy: Point2::new(0.1, 0.2),
            pixel_xy: Point2::new(12.0, 34.0),
        })
        .unwrap();
        tx.send(DeviceInput::Button(ButtonEvent::press(5, 0.01))).unwrap();

        let out = step(&mut node, 0);
        let xy = registry.lookup(names::XY).unwrap();
        let buttons = registry.lookup(names::BUTTON_EVENTS).unwrap();
        assert_eq!(out.vec2(xy), Some(Point2::new(0.1, 0.2)));
        assert_eq!(out.button_events(buttons).unwrap().len(), 1);

        // Buttons are per-frame, position persists.
        let out = step(&mut node, 1);
        assert_eq!(out.vec2(xy), Some(Point2::new(0.1, 0.2)));
        assert!(out.button_events(buttons).unwrap().is_empty());
    }

    #[test]
    fn test_pointer_left_suppresses_position() {
        let mut registry = PortRegistry::new();
        let (mut node, tx) = PointerSource::new(&mut registry, "mouse").unwrap();
        tx.send(DeviceInput::Moved {
            xy: Point2::new(0.0, 0.0),
            pixel_xy: Point2::new(50.0, 50.0),
        })
        .unwrap();
        tx.send(DeviceInput::Left).unwrap();
        tx.send(DeviceInput::Resized {
            width: 640.0,
            height: 480.0,
        })
        .unwrap();

        let out = step(&mut node, 0);
        assert!(!out.has(registry.lookup(names::XY).unwrap()));
        assert!(!out.has(registry.lookup(names::PIXEL_XY).unwrap()));
        assert_eq!(
            out.vec2(registry.lookup(names::PIXEL_SIZE).unwrap()),
            Some(Point2::new(640.0, 480.0))
        );
        assert!(!node.pointer().is_present());
    }
}
