//! Session manager driving every recorder of a graph in lockstep.
//!
//! Per traversal step the order is fixed: `play_frame` feeds recorded payloads
//! to the recorders, the graph is traversed, then `record_frame` captures what
//! the recorders saw. `step` does all three.

use crate::config::SessionConfig;
use crate::error::{RecorderError, Result, ResultExt};
use crate::graph::{DataGraph, NodeId};

use super::codec::{FrameReader, FrameWriter};
use super::recordable::Recordable;
use super::table::RecorderTable;
use super::types::{FrameRecord, RecordPayload, RecorderEntry, Session, SessionMetadata, SessionMode};

/// Owns the session being recorded or played and the cursor into it.
#[derive(Debug)]
pub struct PlaybackController {
    mode: SessionMode,
    table: RecorderTable,
    config: SessionConfig,
    session: Option<Session>,
    /// Next frame to play, or number of frames recorded.
    cursor: usize,
    /// Recorders bound to the current session with their header slot.
    bindings: Vec<(NodeId, u16)>,
}

impl PlaybackController {
    pub fn new(table: RecorderTable, config: SessionConfig) -> Self {
        Self {
            mode: SessionMode::Idle,
            table,
            config,
            session: None,
            cursor: 0,
            bindings: Vec::new(),
        }
    }

    /// Controller over every recordable node currently in `graph`.
    pub fn discover(graph: &mut DataGraph, config: SessionConfig) -> Result<Self> {
        Ok(Self::new(RecorderTable::discover(graph)?, config))
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Frames played or recorded so far in the current (or last) session.
    pub fn frame_index(&self) -> usize {
        self.cursor
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn table(&self) -> &RecorderTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RecorderTable {
        &mut self.table
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Take the last session out of the controller. Only valid while idle.
    pub fn take_session(&mut self) -> Result<Option<Session>> {
        if self.mode.is_bound() {
            return Err(RecorderError::ModeMisuse {
                expected: SessionMode::Idle,
                actual: self.mode,
            });
        }
        Ok(self.session.take())
    }

    /// Start capturing every recorder in the table.
    ///
    /// A session still bound is stopped first.
    pub fn begin_recording(&mut self, graph: &mut DataGraph, metadata: SessionMetadata) -> Result<()> {
        self.stop_if_bound(graph, SessionMode::Recording);

        let mut session = Session::new(metadata);
        let mut bindings = Vec::with_capacity(self.table.len());
        for (index, (name, id)) in self.table.iter().enumerate() {
            let slot = u16::try_from(index).map_err(|_| {
                RecorderError::Serialization(format!("{} recorders in one session", self.table.len()))
            })?;
            let recorder = resolve(graph, id).with_context(|| format!("recorder '{}'", name))?;
            session.header.recorders.push(RecorderEntry {
                name: name.to_string(),
                type_tag: recorder.type_tag().to_string(),
            });
            bindings.push((id, slot));
        }

        self.attach_all(graph, &bindings, SessionMode::Recording);
        tracing::info!(
            "Recording session '{}' with {} recorder(s)",
            session.metadata().name,
            bindings.len()
        );
        self.bindings = bindings;
        self.session = Some(session);
        self.cursor = 0;
        self.mode = SessionMode::Recording;
        Ok(())
    }

    /// Start replaying `session`.
    ///
    /// Header entries are matched to table entries by name. Entries with no
    /// recorder in the table are skipped; a recorder whose type tag differs
    /// from the header's is `RecorderMismatch`. A session still bound is
    /// stopped first.
    pub fn begin_playback(&mut self, graph: &mut DataGraph, session: Session) -> Result<()> {
        self.stop_if_bound(graph, SessionMode::Playing);

        let mut bindings = Vec::with_capacity(session.header.recorders.len());
        for (index, entry) in session.header.recorders.iter().enumerate() {
            let Some(id) = self.table.get(&entry.name) else {
                tracing::warn!(
                    "Session recorder '{}' ({}) has no counterpart in the graph, skipping its payloads",
                    entry.name,
                    entry.type_tag
                );
                continue;
            };
            let recorder = resolve(graph, id).with_context(|| format!("recorder '{}'", entry.name))?;
            if recorder.type_tag() != entry.type_tag {
                return Err(RecorderError::RecorderMismatch {
                    name: entry.name.clone(),
                    expected: recorder.type_tag().to_string(),
                    found: entry.type_tag.clone(),
                });
            }
            // Header slots fit in u16 by construction of the decoder.
            bindings.push((id, index as u16));
        }

        self.attach_all(graph, &bindings, SessionMode::Playing);
        tracing::info!(
            "Playing session '{}': {} frame(s), {} recorder(s) bound",
            session.metadata().name,
            session.frame_count(),
            bindings.len()
        );
        self.bindings = bindings;
        self.session = Some(session);
        self.cursor = 0;
        self.mode = SessionMode::Playing;
        Ok(())
    }

    /// Detach every bound recorder. A recorded session is finalized and kept
    /// for `take_session`.
    pub fn stop(&mut self, graph: &mut DataGraph) {
        if !self.mode.is_bound() {
            return;
        }

        for &(id, _) in &self.bindings {
            if let Some(recorder) = graph.recordable_mut(id) {
                recorder.detach();
            }
        }
        self.bindings.clear();

        if self.mode.is_recording() {
            if let Some(session) = self.session.as_mut() {
                session.finalize();
            }
        }
        tracing::info!(
            "{} stopped after {} frame(s)",
            self.mode.display_name(),
            self.cursor
        );
        self.mode = SessionMode::Idle;
    }

    /// Feed the next recorded frame to the bound recorders. Call before traversal.
    ///
    /// Returns `false` once the session is exhausted, after stopping playback.
    /// Any decode failure stops playback and is returned.
    pub fn play_frame(&mut self, graph: &mut DataGraph) -> Result<bool> {
        self.require(SessionMode::Playing)?;

        let exhausted = self
            .session
            .as_ref()
            .map_or(true, |s| self.cursor >= s.frames.len());
        if exhausted {
            self.stop(graph);
            return Ok(false);
        }

        let result = match self.session.as_ref() {
            Some(session) => replay(&session.frames[self.cursor], &self.bindings, graph),
            None => Ok(()),
        };

        match result {
            Ok(()) => {
                self.cursor += 1;
                Ok(true)
            }
            Err(e) => {
                let frame = self.cursor;
                self.stop(graph);
                tracing::warn!("Playback aborted at frame {}: {}", frame, e);
                Err(e.with_context(format!("playing frame {}", frame)))
            }
        }
    }

    /// Capture one frame from the bound recorders. Call after traversal.
    ///
    /// Reaching `SessionConfig::max_frames` stops recording.
    pub fn record_frame(&mut self, graph: &mut DataGraph) -> Result<()> {
        self.require(SessionMode::Recording)?;

        let frame = match capture(&self.bindings, graph) {
            Ok(frame) => frame,
            Err(e) => {
                let frame = self.cursor;
                self.stop(graph);
                return Err(e.with_context(format!("recording frame {}", frame)));
            }
        };

        let recorded = match self.session.as_mut() {
            Some(session) => {
                session.frames.push(frame);
                session.frames.len()
            }
            None => 0,
        };
        self.cursor += 1;

        if self.config.limit_reached(recorded) {
            tracing::info!("Frame limit of {} reached", self.config.max_frames);
            self.stop(graph);
        }
        Ok(())
    }

    /// One full frame: play, traverse, record.
    pub fn step(&mut self, graph: &mut DataGraph) -> Result<()> {
        if self.mode.is_playing() {
            self.play_frame(graph)?;
        }
        graph.traverse();
        if self.mode.is_recording() {
            self.record_frame(graph)?;
        }
        Ok(())
    }

    fn require(&self, expected: SessionMode) -> Result<()> {
        if self.mode != expected {
            return Err(RecorderError::ModeMisuse {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    fn stop_if_bound(&mut self, graph: &mut DataGraph, next: SessionMode) {
        if self.mode.is_bound() {
            tracing::warn!(
                "Starting {} while {}; stopping the current session",
                next.display_name(),
                self.mode.display_name()
            );
            self.stop(graph);
        }
    }

    fn attach_all(&self, graph: &mut DataGraph, bindings: &[(NodeId, u16)], mode: SessionMode) {
        for &(id, _) in bindings {
            if let Some(recorder) = graph.recordable_mut(id) {
                recorder.attach(mode);
            }
        }
    }
}

fn resolve(graph: &mut DataGraph, id: NodeId) -> Result<&mut dyn Recordable> {
    graph
        .recordable_mut(id)
        .ok_or_else(|| RecorderError::Graph(format!("{} is not a recordable node of the graph", id)))
}

fn capture(bindings: &[(NodeId, u16)], graph: &mut DataGraph) -> Result<FrameRecord> {
    let mut frame = FrameRecord {
        payloads: Vec::with_capacity(bindings.len()),
    };
    for &(id, slot) in bindings {
        let recorder = resolve(graph, id)?;
        let mut w = FrameWriter::new();
        recorder.write_frame(&mut w)?;
        frame.payloads.push(RecordPayload {
            slot,
            data: w.into_bytes(),
        });
    }
    Ok(frame)
}

fn replay(frame: &FrameRecord, bindings: &[(NodeId, u16)], graph: &mut DataGraph) -> Result<()> {
    for &(id, slot) in bindings {
        let payload = frame
            .payload(slot)
            .ok_or_else(|| RecorderError::malformed(format!("no payload for recorder slot {}", slot)))?;
        let recorder = resolve(graph, id)?;
        let mut r = FrameReader::new(payload);
        recorder.read_frame(&mut r)?;
        if !r.is_at_end() {
            return Err(RecorderError::malformed(format!(
                "recorder slot {} left {} unread bytes",
                slot,
                r.remaining()
            )));
        }
    }
    Ok(())
}
