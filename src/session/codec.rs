//! Typed little-endian channel for session payloads.
//!
//! `FrameWriter` appends values to a byte buffer; `FrameReader` reads them back
//! in the same order. There is no self-description in the stream: reader and
//! writer must agree on the field sequence, and any read past the end of the
//! data (or of an impossible value) is a `MalformedStream` error.

use crate::error::{RecorderError, Result};
use crate::events::{ButtonEvent, ButtonEventKind, ButtonEventList, ButtonHandle, Point2};

/// Encoded size of one button event: id (u16) + kind (u8) + time (f64).
pub const BUTTON_EVENT_SIZE: usize = 2 + 1 + 8;

/// Append-only encoder.
#[derive(Debug, Default, Clone)]
pub struct FrameWriter {
    buf: Vec<u8>,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// String with a u16 length prefix. Longer strings are an error.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| {
            RecorderError::Serialization(format!("string of {} bytes is too long", value.len()))
        })?;
        self.write_u16(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_point2(&mut self, point: Point2) {
        self.write_f32(point.x);
        self.write_f32(point.y);
    }

    /// Count (u32) followed by each event.
    pub fn write_button_events(&mut self, events: &ButtonEventList) {
        self.write_u32(events.len() as u32);
        for event in events {
            self.write_u16(event.button.0);
            self.write_u8(event.kind.as_u8());
            self.write_f64(event.time);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded byte slice.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(RecorderError::malformed(format!(
                "truncated {}: need {} bytes at offset {}, {} left",
                what,
                n,
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let bytes = self.take(N, what)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(RecorderError::malformed(format!(
                "invalid bool byte {} at offset {}",
                other,
                self.pos - 1
            ))),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>("u8")?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array("u16")?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array("u32")?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array("u64")?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array("f32")?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take_array("f64")?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n, "byte block")
    }

    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len, "string")?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| RecorderError::malformed(format!("invalid UTF-8 string: {}", e)))
    }

    pub fn read_point2(&mut self) -> Result<Point2> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        Ok(Point2::new(x, y))
    }

    pub fn read_button_events(&mut self) -> Result<ButtonEventList> {
        let count = self.read_u32()? as usize;
        // Reject the count before allocating for it.
        if count.saturating_mul(BUTTON_EVENT_SIZE) > self.remaining() {
            return Err(RecorderError::malformed(format!(
                "truncated button-event list: {} events declared, {} bytes left",
                count,
                self.remaining()
            )));
        }

        let mut events = ButtonEventList::with_capacity(count);
        for _ in 0..count {
            let button = ButtonHandle(self.read_u16()?);
            let tag = self.read_u8()?;
            let kind = ButtonEventKind::from_u8(tag).ok_or_else(|| {
                RecorderError::malformed(format!("unknown button event kind {}", tag))
            })?;
            let time = self.read_f64()?;
            events.push(ButtonEvent { button, kind, time });
        }
        Ok(events)
    }
}
