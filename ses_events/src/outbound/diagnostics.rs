//! A [DiagnosticSink] which writes every diagnostic as a single structured tracing event.
//! With the json subscriber installed by the entrypoint each one becomes one log line, which is
//! what operators alert on.

use crate::domain::{
    models::{Diagnostic, Severity},
    ports::DiagnosticSink,
};

/// Emits diagnostics through [tracing]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        let Diagnostic {
            severity,
            kind,
            message,
            context,
        } = diagnostic;

        match severity {
            Severity::Critical | Severity::Error => tracing::error!(
                severity = %severity,
                error_type = %kind,
                context = %context,
                "{message}"
            ),
            Severity::Warning => tracing::warn!(
                severity = %severity,
                error_type = %kind,
                context = %context,
                "{message}"
            ),
        }
    }
}
