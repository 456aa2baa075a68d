//! Per-step port values.
//!
//! `PortValues` is the transmit unit of the graph: the set of values available
//! on a node's inputs, or produced on its outputs, for one traversal step.
//! A port with no entry produced nothing this step.

use crate::events::{ButtonEventList, Point2};
use crate::graph::id::PortHandle;
use crate::graph::port::PortKind;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A value carried by a port for one step.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Vec2(Point2),
    ButtonEvents(Arc<ButtonEventList>),
}

impl EventValue {
    pub fn kind(&self) -> PortKind {
        match self {
            EventValue::Vec2(_) => PortKind::Vec2,
            EventValue::ButtonEvents(_) => PortKind::ButtonEvents,
        }
    }

    pub fn as_vec2(&self) -> Option<Point2> {
        match self {
            EventValue::Vec2(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_button_events(&self) -> Option<&Arc<ButtonEventList>> {
        match self {
            EventValue::ButtonEvents(list) => Some(list),
            _ => None,
        }
    }
}

impl From<Point2> for EventValue {
    fn from(p: Point2) -> Self {
        EventValue::Vec2(p)
    }
}

impl From<ButtonEventList> for EventValue {
    fn from(list: ButtonEventList) -> Self {
        EventValue::ButtonEvents(Arc::new(list))
    }
}

impl From<Arc<ButtonEventList>> for EventValue {
    fn from(list: Arc<ButtonEventList>) -> Self {
        EventValue::ButtonEvents(list)
    }
}

/// Values present on a set of ports for one step, ordered by handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortValues {
    values: BTreeMap<PortHandle, EventValue>,
}

impl PortValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear for reuse on the next step.
    #[inline]
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn set(&mut self, port: PortHandle, value: impl Into<EventValue>) {
        self.values.insert(port, value.into());
    }

    pub fn get(&self, port: PortHandle) -> Option<&EventValue> {
        self.values.get(&port)
    }

    pub fn has(&self, port: PortHandle) -> bool {
        self.values.contains_key(&port)
    }

    pub fn remove(&mut self, port: PortHandle) -> Option<EventValue> {
        self.values.remove(&port)
    }

    pub fn vec2(&self, port: PortHandle) -> Option<Point2> {
        self.get(port).and_then(EventValue::as_vec2)
    }

    pub fn button_events(&self, port: PortHandle) -> Option<&Arc<ButtonEventList>> {
        self.get(port).and_then(EventValue::as_button_events)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PortHandle, &EventValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Copy every value of `src` into `self`. Values already present are overwritten.
    pub fn merge_from(&mut self, src: &PortValues) {
        for (port, value) in src.iter() {
            self.values.insert(port, value.clone());
        }
    }
}
