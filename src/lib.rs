//! # inputrec-rs: pointer input recorder for a per-frame data graph
//!
//! A `MouseRecorder` node sits between a pointer source and the nodes that
//! consume pointer data. In every frame it either forwards live data
//! (idle), forwards and captures it (recording), or replaces it with a
//! previously captured frame (playing). Downstream nodes cannot tell the
//! difference, which makes input sessions reproducible.
//!
//! ## Architecture
//!
//! - **Graph**: step-driven `DataGraph` of `GraphNode`s exchanging typed port values
//! - **Recorder**: `MouseRecorder`, a graph node that is also `Recordable`
//! - **Session**: binary session format, `PlaybackController` and `SessionFile`
//! - **Ambient**: `config` (TOML), `logging` (tracing), `error` (thiserror)
//!
//! ## Example
//!
//! ```ignore
//! use inputrec_rs::{
//!     config::Config,
//!     graph::{DataGraph, DeviceInput, PointerSource},
//!     recorder::MouseRecorder,
//!     session::{PlaybackController, SessionFile, SessionMetadata},
//! };
//!
//! let config = Config::load_or_default();
//! let mut graph = DataGraph::new();
//! let (source, input) = PointerSource::new(graph.ports_mut(), "pointer")?;
//! let source = graph.add_root(Box::new(source))?;
//! let mouse = MouseRecorder::new(graph.ports_mut(), "mouse", &config.recorder)?;
//! graph.add_child(source, Box::new(mouse))?;
//!
//! let mut controller = PlaybackController::discover(&mut graph, config.session.clone())?;
//! controller.begin_recording(&mut graph, SessionMetadata::new("demo"))?;
//! input.send(DeviceInput::Moved { xy: (0.1, 0.2).into(), pixel_xy: (12.0, 34.0).into() })?;
//! controller.step(&mut graph)?;
//! controller.stop(&mut graph);
//!
//! if let Some(session) = controller.take_session()? {
//!     SessionFile::new("demo.irec").save(&session)?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod logging;
pub mod recorder;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{RecorderError, Result, ResultExt};
pub use events::{ButtonEvent, ButtonEventKind, ButtonEventList, ButtonHandle, Point2, PointSample};
pub use graph::{DataGraph, GraphNode, NodeId, PortRegistry, PortValues};
pub use recorder::MouseRecorder;
pub use session::{PlaybackController, Recordable, Session, SessionFile, SessionMetadata, SessionMode};
