//! Structured conversion events
//!
//! Extractors and generators report non-fatal findings (skipped
//! relationships, duplicate declarations, written files) to an [`EventSink`]
//! supplied by the caller instead of a process-wide logger. Sinks are
//! `Send + Sync` so generators can share one across worker threads.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Pipeline stage that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Archive,
    Xml,
    Extract,
    ModelSpec,
    Dax,
    PowerQuery,
    Script,
    Layout,
    Manifest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Archive member chosen as the workbook definition
    MemberSelected,
    /// The XML loader skipped or repaired a malformed fragment
    MarkupRecovered,
    DuplicateDatasource,
    /// Script tables whose names sanitize to the same handle were merged
    DuplicateTable,
    /// Relationship dropped or skipped for a missing endpoint or table
    InvalidRelationship,
    /// Measure skipped for lack of a usable name
    InvalidMeasure,
    /// Two measures mapped onto the same output file
    MeasureFileCollision,
    ArtifactWritten,
    Summary,
}

/// One structured event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub stage: Stage,
    pub level: EventLevel,
    pub kind: EventKind,
    pub message: String,
}

impl ConversionEvent {
    pub fn info(stage: Stage, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Info,
            kind,
            message: message.into(),
        }
    }

    pub fn warn(stage: Stage, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Warn,
            kind,
            message: message.into(),
        }
    }

    pub fn debug(stage: Stage, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Debug,
            kind,
            message: message.into(),
        }
    }
}

/// Receiver for conversion events.
pub trait EventSink: Send + Sync {
    fn record(&self, event: ConversionEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: ConversionEvent) {
        let stage = event.stage;
        let kind = event.kind;
        match event.level {
            EventLevel::Debug => debug!(?stage, ?kind, "{}", event.message),
            EventLevel::Info => info!(?stage, ?kind, "{}", event.message),
            EventLevel::Warn => warn!(?stage, ?kind, "{}", event.message),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: ConversionEvent) {}
}

/// Keeps events in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ConversionEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ConversionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|e| e.kind == kind).count()
    }

    pub fn warnings(&self) -> Vec<ConversionEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == EventLevel::Warn)
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn record(&self, event: ConversionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
