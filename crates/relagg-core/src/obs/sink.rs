//! Compile sink boundary.
//!
//! This module is the only bridge between the compiler and the global
//! metrics state.

use crate::{error::CompileError, obs::metrics};
use relagg_schema::types::{AggregateKind, FieldType};

///
/// CompileEvent
///

#[derive(Clone, Copy, Debug)]
pub enum CompileEvent<'a> {
    Start {
        resource: &'a str,
        name: &'a str,
    },
    Finish {
        resource: &'a str,
        kind: AggregateKind,
        result_type: &'a FieldType,
    },
    Failed {
        resource: &'a str,
        error: &'a CompileError,
    },
}

///
/// CompileSink
///

pub trait CompileSink {
    fn record(&self, event: CompileEvent<'_>);
}

///
/// GlobalMetricsSink
/// Default sink; folds events into the thread-local metrics state.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalMetricsSink;

impl CompileSink for GlobalMetricsSink {
    fn record(&self, event: CompileEvent<'_>) {
        match event {
            CompileEvent::Start { resource, .. } => {
                metrics::with_state_mut(|m| {
                    m.totals.started = m.totals.started.saturating_add(1);
                    let entry = m.resources.entry(resource.to_string()).or_default();
                    entry.started = entry.started.saturating_add(1);
                });
            }

            CompileEvent::Finish { resource, kind, .. } => {
                metrics::with_state_mut(|m| {
                    m.totals.finished = m.totals.finished.saturating_add(1);
                    let entry = m.resources.entry(resource.to_string()).or_default();
                    entry.finished = entry.finished.saturating_add(1);
                    let count = m.kinds.entry(kind.to_string()).or_default();
                    *count = count.saturating_add(1);
                });
            }

            CompileEvent::Failed { resource, error } => {
                metrics::with_state_mut(|m| {
                    m.totals.failed = m.totals.failed.saturating_add(1);
                    let entry = m.resources.entry(resource.to_string()).or_default();
                    entry.failed = entry.failed.saturating_add(1);
                    let count = m.errors.entry(error.label().to_string()).or_default();
                    *count = count.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Snapshot the current compile counters.
#[must_use]
pub fn metrics_report() -> metrics::CompileReport {
    metrics::report()
}

/// Reset all compile counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}
