//! Recorder nodes
//!
//! A recorder sits in the data graph like any other node and also implements
//! `Recordable`, so a `PlaybackController` can capture or replay what flows
//! through it.

pub mod mouse;

pub use mouse::{MouseRecorder, MOUSE_RECORDER_TAG};
