//! Session data types

use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};

use super::codec::{FrameReader, FrameWriter};

/// Magic bytes at the start of an encoded session
pub const SESSION_MAGIC: [u8; 4] = *b"IREC";

/// Current session format version
pub const SESSION_VERSION: u16 = 1;

/// Record/playback mode of a recorder or controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Not bound to a session; live data passes through
    #[default]
    Idle,
    /// Live data passes through and is captured each frame
    Recording,
    /// Live data is ignored; recorded frames are emitted instead
    Playing,
}

impl SessionMode {
    /// Check if recording
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionMode::Recording)
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionMode::Playing)
    }

    /// Check if bound to a session
    pub fn is_bound(&self) -> bool {
        !matches!(self, SessionMode::Idle)
    }

    /// Display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionMode::Idle => "Idle",
            SessionMode::Recording => "Recording",
            SessionMode::Playing => "Playing",
        }
    }
}

/// Metadata for a recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Name/title of the session
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// When recording started
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    /// Number of frames recorded, filled in when recording stops
    pub frame_count: u64,
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self {
            name: String::from("Untitled Session"),
            description: None,
            recorded_at: chrono::Utc::now(),
            frame_count: 0,
        }
    }
}

impl SessionMetadata {
    /// Create new metadata with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Identity of one recorder in a session. Its position in the header is its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderEntry {
    pub name: String,
    pub type_tag: String,
}

/// Static part of a session, written once at session start
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHeader {
    pub metadata: SessionMetadata,
    pub recorders: Vec<RecorderEntry>,
}

impl SessionHeader {
    pub fn new(metadata: SessionMetadata) -> Self {
        Self {
            metadata,
            recorders: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut FrameWriter) -> Result<()> {
        let json = serde_json::to_vec(&self.metadata)?;
        w.write_u32(json.len() as u32);
        w.write_bytes(&json);

        let count = u16::try_from(self.recorders.len()).map_err(|_| {
            RecorderError::Serialization(format!("{} recorders in one session", self.recorders.len()))
        })?;
        w.write_u16(count);
        for entry in &self.recorders {
            w.write_str(&entry.name)?;
            w.write_str(&entry.type_tag)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut FrameReader) -> Result<Self> {
        let json_len = r.read_u32()? as usize;
        let json = r.read_bytes(json_len)?;
        let metadata: SessionMetadata = serde_json::from_slice(json)
            .map_err(|e| RecorderError::malformed(format!("invalid session metadata: {}", e)))?;

        let count = r.read_u16()?;
        let mut recorders = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = r.read_str()?;
            let type_tag = r.read_str()?;
            recorders.push(RecorderEntry { name, type_tag });
        }
        Ok(Self {
            metadata,
            recorders,
        })
    }
}

/// One recorder's encoded data for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPayload {
    pub slot: u16,
    pub data: Vec<u8>,
}

/// Everything captured on one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameRecord {
    pub payloads: Vec<RecordPayload>,
}

impl FrameRecord {
    pub fn payload(&self, slot: u16) -> Option<&[u8]> {
        self.payloads
            .iter()
            .find(|p| p.slot == slot)
            .map(|p| p.data.as_slice())
    }

    pub fn encode(&self, w: &mut FrameWriter) -> Result<()> {
        let count = u16::try_from(self.payloads.len()).map_err(|_| {
            RecorderError::Serialization(format!("{} payloads in one frame", self.payloads.len()))
        })?;
        w.write_u16(count);
        for payload in &self.payloads {
            w.write_u16(payload.slot);
            w.write_u32(payload.data.len() as u32);
            w.write_bytes(&payload.data);
        }
        Ok(())
    }

    pub fn decode(r: &mut FrameReader) -> Result<Self> {
        let count = r.read_u16()?;
        let mut payloads = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let slot = r.read_u16()?;
            let len = r.read_u32()? as usize;
            let data = r.read_bytes(len)?.to_vec();
            payloads.push(RecordPayload { slot, data });
        }
        Ok(Self { payloads })
    }
}

/// A complete recorded session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub header: SessionHeader,
    /// One record per traversal step, in step order
    pub frames: Vec<FrameRecord>,
}

impl Session {
    /// Create an empty session
    pub fn new(metadata: SessionMetadata) -> Self {
        Self {
            header: SessionHeader::new(metadata),
            frames: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.header.metadata
    }

    /// Get the number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check if the session is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Finalize the session by updating metadata
    pub fn finalize(&mut self) {
        self.header.metadata.frame_count = self.frames.len() as u64;
    }

    /// Encode to the binary session format
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut w = FrameWriter::new();
        w.write_bytes(&SESSION_MAGIC);
        w.write_u16(SESSION_VERSION);
        self.header.encode(&mut w)?;
        let count = u32::try_from(self.frames.len()).map_err(|_| {
            RecorderError::Serialization(format!("{} frames in one session", self.frames.len()))
        })?;
        w.write_u32(count);
        for frame in &self.frames {
            frame.encode(&mut w)?;
        }
        Ok(w.into_bytes())
    }

    /// Decode from the binary session format
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = FrameReader::new(bytes);
        if r.read_bytes(SESSION_MAGIC.len())? != SESSION_MAGIC {
            return Err(RecorderError::malformed("not a session: bad magic bytes"));
        }
        let version = r.read_u16()?;
        if version == 0 || version > SESSION_VERSION {
            return Err(RecorderError::malformed(format!(
                "unsupported session version {}",
                version
            )));
        }

        let header = SessionHeader::decode(&mut r)?;
        let count = r.read_u32()? as usize;
        // Every frame takes at least its u16 payload count.
        if count.saturating_mul(2) > r.remaining() {
            return Err(RecorderError::malformed(format!(
                "{} frames declared, {} bytes left",
                count,
                r.remaining()
            )));
        }
        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            frames.push(FrameRecord::decode(&mut r)?);
        }
        if !r.is_at_end() {
            return Err(RecorderError::malformed(format!(
                "{} trailing bytes after last frame",
                r.remaining()
            )));
        }
        Ok(Self { header, frames })
    }
}
