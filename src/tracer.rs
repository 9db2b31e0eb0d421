//! Request and field tracing hooks
//!
//! A [`Tracer`] is handed every query before it executes and every field
//! before its resolver runs. Both calls return a handle whose
//! [`Trace::finish`] receives the errors produced by that query or field.

use std::time::Instant;

use tracing::{debug, debug_span, trace, Span};

use crate::executor::ExecutionError;

/// Handle of an ongoing query or field trace.
pub trait Trace: Send {
    /// Ends the trace with the errors produced under it.
    fn finish(self: Box<Self>, errors: &[ExecutionError]);
}

/// Trace of a whole request.
pub type QueryTrace = Box<dyn Trace>;

/// Trace of a single field resolution.
pub type FieldTrace = Box<dyn Trace>;

/// Hooks observing query execution.
pub trait Tracer: Send + Sync {
    /// Called once per request, before validation.
    fn trace_query(&self, query: &str, operation_name: Option<&str>) -> QueryTrace;

    /// Called before the resolver of `type_name.field_name` runs.
    fn trace_field(&self, field_name: &str, type_name: &str) -> FieldTrace;
}

struct Noop;

impl Trace for Noop {
    fn finish(self: Box<Self>, _: &[ExecutionError]) {}
}

/// Tracer doing nothing; the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace_query(&self, _: &str, _: Option<&str>) -> QueryTrace {
        Box::new(Noop)
    }

    fn trace_field(&self, _: &str, _: &str) -> FieldTrace {
        Box::new(Noop)
    }
}

/// Tracer reporting through [`tracing`] spans and events.
///
/// Queries are logged at `DEBUG`, fields at `TRACE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

struct SpanTrace {
    span: Span,
    started: Instant,
}

impl Trace for SpanTrace {
    fn finish(self: Box<Self>, errors: &[ExecutionError]) {
        let _entered = self.span.enter();
        let elapsed_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        if errors.is_empty() {
            trace!(elapsed_us, "finished");
        } else {
            debug!(elapsed_us, errors = errors.len(), "finished with errors");
        }
    }
}

impl Tracer for LogTracer {
    fn trace_query(&self, query: &str, operation_name: Option<&str>) -> QueryTrace {
        let span = debug_span!("graphql.query", operation = operation_name.unwrap_or_default());
        span.in_scope(|| debug!(query, "executing query"));
        Box::new(SpanTrace {
            span,
            started: Instant::now(),
        })
    }

    fn trace_field(&self, field_name: &str, type_name: &str) -> FieldTrace {
        Box::new(SpanTrace {
            span: debug_span!("graphql.field", field = field_name, parent = type_name),
            started: Instant::now(),
        })
    }
}
