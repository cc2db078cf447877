//! Bounded in-memory pipeline telemetry.
//!
//! Every match workflow stage appends a [`TelemetryEvent`] to a fixed-capacity
//! ring buffer. Recording is synchronous, lock-based, and infallible; telemetry
//! never influences control flow or response content.


use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of retained events when none is configured.
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 200;

/// Pipeline stage that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Embed,
    Retrieve,
    Rerank,
    Pipeline,
}

impl PipelineStep {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::Embed => "embed",
            PipelineStep::Retrieve => "retrieve",
            PipelineStep::Rerank => "rerank",
            PipelineStep::Pipeline => "pipeline",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single timed pipeline event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub step: PipelineStep,
    pub ok: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Builds a success event.
    pub fn success(step: PipelineStep, duration: Duration, meta: Option<serde_json::Value>) -> Self {
        Self {
            step,
            ok: true,
            duration_ms: duration.as_millis() as u64,
            meta,
            error: None,
            at: Utc::now(),
        }
    }

    /// Builds a failure event with an error description.
    pub fn failure(step: PipelineStep, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            step,
            ok: false,
            duration_ms: duration.as_millis() as u64,
            meta: None,
            error: Some(error.into()),
            at: Utc::now(),
        }
    }

    /// Attaches metadata to an event.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Fixed-capacity ring buffer of pipeline events.
///
/// Insertion beyond capacity silently drops the oldest entries. Safe to share
/// across concurrently in-flight requests.
pub struct TelemetrySink {
    capacity: usize,
    events: Mutex<VecDeque<TelemetryEvent>>,
}

impl TelemetrySink {
    /// Creates a sink with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TELEMETRY_CAPACITY)
    }

    /// Creates a sink retaining at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Appends an event, evicting the oldest entry when full.
    pub fn record(&self, event: TelemetryEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Returns up to `limit` events, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<TelemetryEvent> {
        let events = self.events.lock();
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Returns the number of retained events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` when no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}
