//! Session recording and playback module
//!
//! A session is the header written when recording starts (which recorders
//! take part, under which name and type) followed by one frame record per
//! traversal step. Recorders implement `Recordable` and encode their own
//! payloads through `FrameWriter` / `FrameReader`; the `PlaybackController`
//! owns the session and drives every recorder in lockstep with the graph.
//!
//! # Binary Layout
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! "IREC" | version: u16 | metadata_len: u32 | metadata (JSON)
//!        | recorder_count: u16 | { name: str16, type_tag: str16 }*
//!        | frame_count: u32
//!        | { payload_count: u16 | { slot: u16, len: u32, bytes }* }*
//! ```

pub mod codec;
pub mod controller;
pub mod file;
pub mod recordable;
pub mod table;
pub mod types;

pub use codec::{FrameReader, FrameWriter};
pub use controller::PlaybackController;
pub use file::{session_file_name, SessionFile};
pub use recordable::Recordable;
pub use table::RecorderTable;
pub use types::{
    FrameRecord, RecordPayload, RecorderEntry, Session, SessionHeader, SessionMetadata, SessionMode,
    SESSION_MAGIC, SESSION_VERSION,
};
