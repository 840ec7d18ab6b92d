/// How bad a [Diagnostic] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// The inbound data violated its contract, e.g. an unknown event kind
    Critical,
    /// A sink failed and the record was not written
    Error,
    /// A recoverable lookup failure, e.g. the log group is not provisioned yet
    Warning,
}

/// A structured record of a non fatal failure.
/// Operators consume these out of band, nothing is raised to the invoking runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    #[allow(missing_docs)]
    pub severity: Severity,
    /// A short machine readable name of the failure
    pub kind: String,
    /// Human readable description
    pub message: String,
    /// Any structured context which helps to reproduce the failure
    pub context: serde_json::Value,
}

impl Diagnostic {
    #[allow(missing_docs)]
    pub fn new(severity: Severity, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            kind: kind.into(),
            message: message.into(),
            context: serde_json::Value::Null,
        }
    }

    #[allow(missing_docs)]
    pub fn critical(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, kind, message)
    }

    #[allow(missing_docs)]
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    #[allow(missing_docs)]
    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    /// Attach structured context
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}
