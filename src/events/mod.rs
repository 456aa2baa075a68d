//! Event value containers passed between graph ports.
//!
//! Values are immutable per frame: a node produces them during its step and
//! downstream nodes only ever read them. Button lists travel as
//! `Arc<ButtonEventList>` snapshots so fan-out never copies the events and no
//! node can mutate another node's current-frame buffer.

pub mod button;
pub mod point;

pub use button::{ButtonEvent, ButtonEventKind, ButtonEventList, ButtonHandle};
pub use point::{Point2, PointSample};
