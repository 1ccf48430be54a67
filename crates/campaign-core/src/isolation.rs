//! Fault-isolated per-entity processing.
//!
//! [`for_each`] applies an operation to every entity of a collection. A
//! failing entity is recorded as exactly one diagnostic entry in the
//! technical report channel, logged at `warn`, and skipped; the remaining
//! entities are still processed. Nothing is re-raised.
//!
//! Entities are visited sequentially in the order given, which is what
//! keeps a tick deterministic.

use std::fmt;

use campaign_types::ReportCategory;
use tracing::warn;

use crate::report::{ReportChannels, ReportSink};

/// Failure of a single entity's daily operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// The entity references another entity that does not exist.
    #[error("missing linked {kind} {id}")]
    MissingLink {
        /// Kind of the linked entity.
        kind: &'static str,
        /// Identifier that could not be resolved.
        id: String,
    },

    /// Data the operation needs is absent from the entity.
    #[error("missing {0}")]
    MissingData(&'static str),

    /// The entity disappeared from the roster during the pass.
    #[error("entity no longer on the roster")]
    Vanished,
}

/// An entity queued for isolated processing, with a label for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isolated<T> {
    /// The entity, usually its identifier.
    pub subject: T,
    /// Human-readable name used in the diagnostic entry.
    pub label: String,
}

impl<T> Isolated<T> {
    /// Queue `subject` under `label`.
    pub fn new(subject: T, label: impl Into<String>) -> Self {
        Self {
            subject,
            label: label.into(),
        }
    }
}

/// Result of one isolated pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsolationOutcome {
    /// Entities whose operation succeeded.
    pub processed: usize,
    /// Labels of entities whose operation failed, in visiting order.
    pub failed: Vec<String>,
}

/// Receives the diagnostics of contained entity failures.
pub trait FailureSink: ReportSink {
    /// Record that the operation for `label` failed with `error`.
    fn record_contained_failure(&mut self, label: &str, error: &dyn fmt::Display) {
        self.reports_mut().write(
            ReportCategory::Technical,
            format!("Could not process {label}: {error}"),
        );
    }
}

impl FailureSink for ReportChannels {}

/// Apply `operation` to every entity, containing individual failures.
pub fn for_each<C, T, E, F>(
    ctx: &mut C,
    entities: impl IntoIterator<Item = Isolated<T>>,
    mut operation: F,
) -> IsolationOutcome
where
    C: FailureSink,
    E: fmt::Display,
    F: FnMut(&mut C, &T) -> Result<(), E>,
{
    let mut outcome = IsolationOutcome::default();
    for entity in entities {
        match operation(ctx, &entity.subject) {
            Ok(()) => outcome.processed = outcome.processed.saturating_add(1),
            Err(error) => {
                warn!(entity = %entity.label, %error, "Entity operation failed, continuing");
                ctx.record_contained_failure(&entity.label, &error);
                outcome.failed.push(entity.label);
            }
        }
    }
    outcome
}
