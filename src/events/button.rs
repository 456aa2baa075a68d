//! Button event types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a physical or logical button (mouse button, key, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonHandle(pub u16);

impl fmt::Display for ButtonHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "button#{}", self.0)
    }
}

/// Kind of button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonEventKind {
    Press,
    Release,
    Repeat,
}

impl ButtonEventKind {
    /// Wire tag for this kind
    pub fn as_u8(self) -> u8 {
        match self {
            ButtonEventKind::Press => 0,
            ButtonEventKind::Release => 1,
            ButtonEventKind::Repeat => 2,
        }
    }

    /// Parse a wire tag; `None` for unknown tags
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ButtonEventKind::Press),
            1 => Some(ButtonEventKind::Release),
            2 => Some(ButtonEventKind::Repeat),
            _ => None,
        }
    }

    /// Display name for the kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ButtonEventKind::Press => "press",
            ButtonEventKind::Release => "release",
            ButtonEventKind::Repeat => "repeat",
        }
    }
}

/// A single button transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub button: ButtonHandle,
    pub kind: ButtonEventKind,
    /// Time of the event relative to the start of its frame, in seconds
    pub time: f64,
}

impl ButtonEvent {
    pub fn new(button: u16, kind: ButtonEventKind, time: f64) -> Self {
        Self {
            button: ButtonHandle(button),
            kind,
            time,
        }
    }

    pub fn press(button: u16, time: f64) -> Self {
        Self::new(button, ButtonEventKind::Press, time)
    }

    pub fn release(button: u16, time: f64) -> Self {
        Self::new(button, ButtonEventKind::Release, time)
    }

    pub fn repeat(button: u16, time: f64) -> Self {
        Self::new(button, ButtonEventKind::Repeat, time)
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @{:.4}", self.button, self.kind.display_name(), self.time)
    }
}

/// Ordered list of button events. Order is input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonEventList {
    events: Vec<ButtonEvent>,
}

impl ButtonEventList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: ButtonEvent) {
        self.events.push(event);
    }

    /// Append all events of `other`, keeping their order
    pub fn extend_from(&mut self, other: &ButtonEventList) {
        self.events.extend_from_slice(&other.events);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[ButtonEvent] {
        &self.events
    }
}

impl FromIterator<ButtonEvent> for ButtonEventList {
    fn from_iter<I: IntoIterator<Item = ButtonEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<ButtonEvent>> for ButtonEventList {
    fn from(events: Vec<ButtonEvent>) -> Self {
        Self { events }
    }
}

impl<'a> IntoIterator for &'a ButtonEventList {
    type Item = &'a ButtonEvent;
    type IntoIter = std::slice::Iter<'a, ButtonEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
