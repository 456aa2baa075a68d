//! MouseRecorder node: records and replays pointer position and button events.
//!
//! Parent it under the node producing pointer data. It is transparent in every
//! mode: while idle or recording it forwards live data unchanged, while playing
//! it emits the recorded data in place of the live data, and any port it does
//! not own (window size, unrelated signals) is copied through untouched. Other
//! nodes can therefore be parented below it without noticing it is there.

use std::fmt;
use std::sync::Arc;

use crate::config::{ForwardPolicy, RecorderConfig};
use crate::error::{RecorderError, Result};
use crate::events::{ButtonEventList, Point2, PointSample};
use crate::graph::id::PortHandle;
use crate::graph::node::{GraphNode, StepContext};
use crate::graph::port::{names, PortDescriptor, PortKind, PortRegistry};
use crate::session::codec::{FrameReader, FrameWriter};
use crate::session::{Recordable, SessionMode};

/// Type tag stored in session headers for this recorder's payloads.
pub const MOUSE_RECORDER_TAG: &str = "MouseRecorder";

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::optional_input(names::PIXEL_XY, PortKind::Vec2),
    PortDescriptor::optional_input(names::PIXEL_SIZE, PortKind::Vec2),
    PortDescriptor::optional_input(names::XY, PortKind::Vec2),
    PortDescriptor::optional_input(names::BUTTON_EVENTS, PortKind::ButtonEvents),
    PortDescriptor::output(names::PIXEL_XY, PortKind::Vec2),
    PortDescriptor::output(names::PIXEL_SIZE, PortKind::Vec2),
    PortDescriptor::output(names::XY, PortKind::Vec2),
    PortDescriptor::output(names::BUTTON_EVENTS, PortKind::ButtonEvents),
];

/// Recorder for pointer position and button events.
pub struct MouseRecorder {
    name: String,
    mode: SessionMode,
    forward_policy: ForwardPolicy,

    // Handles are graph-wide, so each serves as both input and output.
    pixel_xy: PortHandle,
    xy: PortHandle,
    button_events: PortHandle,

    sample: PointSample,
    live_button_events: Arc<ButtonEventList>,
    /// Events seen since the last `write_frame`. Only exists while recording.
    pending: Option<ButtonEventList>,
    /// Events loaded by `read_frame`, emitted on the next step.
    replayed: Option<ButtonEventList>,
    last_forwarded: Option<(Point2, Point2)>,
}

impl MouseRecorder {
    /// Create a recorder, resolving its ports against `registry`.
    ///
    /// Fails with `PortResolution` if one of its port names is already
    /// registered with a different kind.
    pub fn new(
        registry: &mut PortRegistry,
        name: impl Into<String>,
        config: &RecorderConfig,
    ) -> Result<Self> {
        let name = name.into();
        let resolve = |registry: &mut PortRegistry, port: &str, kind| {
            registry.define(port, kind).map_err(|e| {
                e.with_context(format!("MouseRecorder '{}'", name))
            })
        };
        let pixel_xy = resolve(registry, names::PIXEL_XY, PortKind::Vec2)?;
        resolve(registry, names::PIXEL_SIZE, PortKind::Vec2)?;
        let xy = resolve(registry, names::XY, PortKind::Vec2)?;
        let button_events = resolve(registry, names::BUTTON_EVENTS, PortKind::ButtonEvents)?;

        Ok(Self {
            name,
            mode: SessionMode::Idle,
            forward_policy: config.forward_policy,
            pixel_xy,
            xy,
            button_events,
            sample: PointSample::ABSENT,
            live_button_events: Arc::new(ButtonEventList::new()),
            pending: None,
            replayed: None,
            last_forwarded: None,
        })
    }

    /// Pointer state of the last step.
    pub fn sample(&self) -> PointSample {
        self.sample
    }

    /// Button events emitted on the last step.
    pub fn live_button_events(&self) -> &Arc<ButtonEventList> {
        &self.live_button_events
    }

    /// Number of events waiting for the next frame write.
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, ButtonEventList::len)
    }

    fn owns(&self, port: PortHandle) -> bool {
        port == self.xy || port == self.pixel_xy || port == self.button_events
    }

    fn read_live(&mut self, ctx: &StepContext) {
        self.sample = match (ctx.input.vec2(self.xy), ctx.input.vec2(self.pixel_xy)) {
            (Some(xy), Some(pixel_xy)) => PointSample::at(xy, pixel_xy),
            (None, None) => PointSample::ABSENT,
            _ => {
                tracing::debug!(
                    "MouseRecorder '{}': only one pointer coordinate on frame {}, treating pointer as absent",
                    self.name,
                    ctx.frame
                );
                PointSample::ABSENT
            }
        };

        self.live_button_events = ctx
            .input
            .button_events(self.button_events)
            .cloned()
            .unwrap_or_default();

        if let Some(pending) = self.pending.as_mut() {
            pending.extend_from(&self.live_button_events);
        }
    }

    fn emit(&mut self, ctx: &mut StepContext) {
        match self.sample.position() {
            Some(position) => {
                let forward = match self.forward_policy {
                    ForwardPolicy::Always => true,
                    ForwardPolicy::OnChange => self.last_forwarded != Some(position),
                };
                if forward {
                    ctx.output.set(self.xy, position.0);
                    ctx.output.set(self.pixel_xy, position.1);
                }
                self.last_forwarded = Some(position);
            }
            None => self.last_forwarded = None,
        }

        ctx.output
            .set(self.button_events, self.live_button_events.clone());

        for (port, value) in ctx.input.iter() {
            if !self.owns(port) {
                ctx.output.set(port, value.clone());
            }
        }
    }

    fn expect_mode(&self, expected: SessionMode) -> Result<()> {
        if self.mode != expected {
            return Err(RecorderError::ModeMisuse {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }
}

impl fmt::Display for MouseRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseRecorder '{}' [{}] ", self.name, self.mode.display_name())?;
        match self.sample.position() {
            Some((xy, pixel_xy)) => write!(f, "pointer {} px {}", xy, pixel_xy)?,
            None => write!(f, "no pointer")?,
        }
        write!(
            f,
            ", {} button event(s), forward {}",
            self.live_button_events.len(),
            self.forward_policy
        )
    }
}

impl GraphNode for MouseRecorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn step(&mut self, ctx: &mut StepContext) {
        match self.mode {
            SessionMode::Idle | SessionMode::Recording => self.read_live(ctx),
            SessionMode::Playing => {
                // Replayed events go out once; a step with no new frame emits none.
                let events = self.replayed.take().unwrap_or_default();
                self.live_button_events = Arc::new(events);
            }
        }
        self.emit(ctx);
    }

    fn as_recordable_mut(&mut self) -> Option<&mut dyn Recordable> {
        Some(self)
    }
}

impl Recordable for MouseRecorder {
    fn type_tag(&self) -> &'static str {
        MOUSE_RECORDER_TAG
    }

    fn mode(&self) -> SessionMode {
        self.mode
    }

    fn attach(&mut self, mode: SessionMode) {
        tracing::trace!("{}: attach {}", self, mode.display_name());
        if self.mode.is_bound() {
            tracing::warn!(
                "MouseRecorder '{}' attached as {} while still {}; stopping the previous session",
                self.name,
                mode.display_name(),
                self.mode.display_name()
            );
            self.detach();
        }

        match mode {
            SessionMode::Idle => return,
            SessionMode::Recording => self.pending = Some(ButtonEventList::new()),
            SessionMode::Playing => self.replayed = None,
        }
        // A session starts from a clean forward state, whatever was forwarded while idle.
        self.last_forwarded = None;
        self.mode = mode;
        tracing::debug!("MouseRecorder '{}' now {}", self.name, mode.display_name());
    }

    fn detach(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_empty() {
                tracing::debug!(
                    "MouseRecorder '{}' discarding {} unwritten button events",
                    self.name,
                    pending.len()
                );
            }
        }
        self.replayed = None;
        self.last_forwarded = None;
        self.mode = SessionMode::Idle;
    }

    fn write_frame(&mut self, w: &mut FrameWriter) -> Result<()> {
        self.expect_mode(SessionMode::Recording)?;

        match self.sample.position() {
            Some((xy, pixel_xy)) => {
                w.write_bool(true);
                w.write_point2(xy);
                w.write_point2(pixel_xy);
            }
            None => w.write_bool(false),
        }

        let pending = self.pending.get_or_insert_with(ButtonEventList::new);
        w.write_button_events(pending);
        pending.clear();
        Ok(())
    }

    fn read_frame(&mut self, r: &mut FrameReader) -> Result<()> {
        self.expect_mode(SessionMode::Playing)?;

        self.sample = if r.read_bool()? {
            let xy = r.read_point2()?;
            let pixel_xy = r.read_point2()?;
            PointSample::at(xy, pixel_xy)
        } else {
            PointSample::ABSENT
        };

        let events = r.read_button_events()?;
        self.replayed = Some(events);
        Ok(())
    }
}
