//! This module defines the services that are exposed by this crate

mod appender;
mod normalizer;

#[cfg(test)]
mod fixtures;

pub use appender::*;
pub use normalizer::*;

use crate::domain::models::{Diagnostic, Notification};
use crate::domain::ports::DiagnosticSink;
use crate::inbound::sns::{self, Rejection};

/// Decode the raw invocation payload, applying the drop policy.
///
/// Transport noise is dropped silently, contract violations emit exactly one diagnostic.
fn admit<D: DiagnosticSink>(payload: serde_json::Value, diagnostics: &D) -> Option<Notification> {
    match sns::decode(payload) {
        Ok(notification) => Some(notification),
        Err(rejection) => {
            report_rejection(&rejection, diagnostics);
            None
        }
    }
}

fn report_rejection<D: DiagnosticSink>(rejection: &Rejection, diagnostics: &D) {
    match rejection.severity() {
        Some(severity) => diagnostics.emit(
            Diagnostic::new(severity, rejection.kind(), rejection.to_string())
                .with_context(rejection.context()),
        ),
        None => tracing::debug!(reason = %rejection, "dropping notification"),
    }
}
