//! Session capability of a graph node.

use crate::error::Result;

use super::codec::{FrameReader, FrameWriter};
use super::types::SessionMode;

/// A node whose per-frame data can be captured into, and replayed from, a session.
///
/// The controller drives the binding: `attach` before the first frame, then one
/// `write_frame` after every traversal step while recording, or one
/// `read_frame` before every step while playing, then `detach`.
pub trait Recordable {
    /// Stable identifier of the recorder's payload format, stored in the session header.
    fn type_tag(&self) -> &'static str;

    /// Current mode.
    fn mode(&self) -> SessionMode;

    /// Bind to a session in `mode`.
    ///
    /// Attaching while already bound implicitly detaches first, discarding any
    /// pending data of the previous binding. `attach(SessionMode::Idle)` is `detach()`.
    fn attach(&mut self, mode: SessionMode);

    /// Unbind. Pending, not yet written data is discarded.
    fn detach(&mut self);

    /// Encode the data gathered since the previous write. Only valid while recording.
    fn write_frame(&mut self, w: &mut FrameWriter) -> Result<()>;

    /// Decode one frame to emit on the next step. Only valid while playing.
    fn read_frame(&mut self, r: &mut FrameReader) -> Result<()>;
}
