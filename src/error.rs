//! Error handling for inputrec-rs
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the recorder, graph and session layers.

use crate::session::SessionMode;
use thiserror::Error;

/// Main error type for recorder operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A recorded stream could not be decoded. Fatal to the playback session.
    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    /// A declared port could not be resolved against the graph
    #[error("Cannot resolve port '{port}': {reason}")]
    PortResolution { port: String, reason: String },

    /// A frame read/write was issued while the recorder was in the wrong mode
    #[error("Mode misuse: expected {expected:?}, recorder is {actual:?}")]
    ModeMisuse {
        expected: SessionMode,
        actual: SessionMode,
    },

    /// A session header names a recorder whose type differs from the one in the graph
    #[error("Recorder '{name}' type mismatch: graph has '{expected}', session has '{found}'")]
    RecorderMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Errors related to graph structure
    #[error("Graph error: {0}")]
    Graph(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<RecorderError>,
    },
}

impl RecorderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        RecorderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a `MalformedStream` error
    pub fn malformed(message: impl Into<String>) -> Self {
        RecorderError::MalformedStream(message.into())
    }

    /// Whether this error (or the error it wraps) is a `MalformedStream`
    pub fn is_malformed(&self) -> bool {
        match self {
            RecorderError::MalformedStream(_) => true,
            RecorderError::WithContext { source, .. } => source.is_malformed(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for RecorderError {
    fn from(err: serde_json::Error) -> Self {
        RecorderError::Serialization(err.to_string())
    }
}

/// Result type alias for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
