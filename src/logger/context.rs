//! Call-site context carried alongside emissions.

/// Opaque per-call context for cancellation or tracing propagation.
///
/// The facade accepts it on every emission but does not read it; passing
/// `None` behaves exactly like passing a context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    trace_id: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
        }
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}
