//! Observability: compile telemetry and the sink it flows through.
//!
//! The compiler never touches metrics state directly; everything goes
//! through `CompileEvent` and `CompileSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

#[cfg(test)]
mod tests;

// re-exports
pub use metrics::{CompileReport, CompileTotals, ResourceCounters};
pub use sink::{CompileEvent, CompileSink, GlobalMetricsSink, metrics_report, metrics_reset_all};
