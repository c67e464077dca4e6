//! Structured error reporting. Components receive a `DiagnosticsSink` at
//! construction instead of reaching for a process-wide interceptor, so tests
//! can substitute a recording sink.

use std::rc::Rc;

/// Context attached to every report. Fields the caller does not know are
/// left `None`; the sink must cope with either.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportContext {
    /// Last known interactive surface size, if the reporter tracks one.
    pub surface_size: Option<(u32, u32)>,
    /// Human-readable loop status at the time of the report.
    pub loop_status: Option<String>,
    /// Free-form detail, e.g. the offending input event and payload.
    pub extra: Option<String>,
}

/// Fire-and-forget report target. Implementations must not propagate
/// failures back into the caller.
pub trait DiagnosticsSink {
    fn report(&self, message: &str, context: &ReportContext);
}

pub type SharedSink = Rc<dyn DiagnosticsSink>;

/// Default sink: forwards reports to the browser console through the `log`
/// facade at error severity.
#[derive(Default)]
pub struct ConsoleDiagnostics;

impl DiagnosticsSink for ConsoleDiagnostics {
    fn report(&self, message: &str, context: &ReportContext) {
        log::error!("{message} ({context:?})");
    }
}
