//! Monitoring observations and sinks.
//!
//! Observations are purely informational: a sink that drops or fails to
//! write them never changes what the switcher does.

use crate::core::{Phase, RequestId, Timestamp};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Notable things that happen inside a phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwitchEvent {
    /// The requested module loaded and was instantiated.
    ModuleInstantiated { module: String },
    /// The deadline passed before the requested module was ready to show.
    PreparationTimeout { module: String },
    /// The new module joined the active set.
    ModuleRevealed { module: String },
    /// The old module left the active set.
    ModuleRetired { module: String },
    /// A newer request replaced this one before it reached the screen.
    RequestSuperseded { request: RequestId },
}

/// One monitoring record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: Timestamp,
    pub state: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<SwitchEvent>,
}

/// Receives monitoring observations.
pub trait MonitoringSink {
    fn observe(&mut self, observation: Observation);
}

/// Keeps every observation in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    observations: Rc<RefCell<Vec<Observation>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.observations.borrow().clone()
    }

    /// Only the observations that carry an event.
    pub fn events(&self) -> Vec<SwitchEvent> {
        self.observations
            .borrow()
            .iter()
            .filter_map(|o| o.event.clone())
            .collect()
    }

    /// Phases entered, in order.
    pub fn phases(&self) -> Vec<Phase> {
        self.observations
            .borrow()
            .iter()
            .filter(|o| o.event.is_none())
            .map(|o| o.state)
            .collect()
    }
}

impl MonitoringSink for RecordingSink {
    fn observe(&mut self, observation: Observation) {
        self.observations.borrow_mut().push(observation);
    }
}

/// Writes each observation as one JSON line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MonitoringSink for JsonLinesSink<W> {
    fn observe(&mut self, observation: Observation) {
        let written = serde_json::to_writer(&mut self.writer, &observation)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to write monitoring observation");
        }
    }
}
