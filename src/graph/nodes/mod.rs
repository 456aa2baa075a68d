//! Built-in graph nodes surrounding a recorder.

pub mod event_log;
pub mod pointer_source;

pub use event_log::{EventLog, LoggedFrame};
pub use pointer_source::{DeviceInput, PointerSource};
