//! This module defines all of the ports that the delivery event domain requires

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::models::{Diagnostic, LogEvent, StoreRecord};

/// Errors that can occur while writing a [StoreRecord]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table does not exist (yet)
    #[error("table not found: {0}")]
    NotFound(String),
    /// We are not permitted to write to the table
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[allow(missing_docs)]
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for the durable key-value store which receives one [StoreRecord] per notification
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait RecordStore: Send + Sync + 'static {
    /// Perform a single unconditional write of the record
    fn put_record(
        &self,
        record: StoreRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Errors that can occur while talking to a log stream sink
#[derive(Debug, Error)]
pub enum LogSinkError {
    /// The stream we tried to create is already there
    #[error("log stream already exists")]
    AlreadyExists,
    /// The log group or stream does not exist
    #[error("log resource not found: {0}")]
    NotFound(String),
    /// Another writer advanced the stream first. Carries the token the sink expects next.
    #[error("invalid sequence token, expected {expected:?}")]
    InvalidSequenceToken {
        /// the corrected token returned with the rejection
        expected: Option<String>,
    },
    /// The sink already accepted this exact batch
    #[error("log event batch was already accepted")]
    DataAlreadyAccepted,
    #[allow(missing_docs)]
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for an append only, named log stream sink
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait LogStreamSink: Send + Sync + 'static {
    /// Create the stream. Returns [LogSinkError::AlreadyExists] when it is already there
    fn create_stream(&self, stream: &str) -> impl Future<Output = Result<(), LogSinkError>> + Send;

    /// Fetch the current ordering token of an existing stream
    fn sequence_token(
        &self,
        stream: &str,
    ) -> impl Future<Output = Result<Option<String>, LogSinkError>> + Send;

    /// Append a single event, attaching the ordering token if one is known
    fn put_event(
        &self,
        stream: &str,
        event: LogEvent,
        sequence_token: Option<String>,
    ) -> impl Future<Output = Result<(), LogSinkError>> + Send;
}

/// Trait for the process wide diagnostic channel
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Record a non fatal failure
    fn emit(&self, diagnostic: Diagnostic);
}

/// Trait for getting the current time
pub trait TimeGetter: Send + Sync + 'static {
    /// get the current time
    fn now(&self) -> DateTime<Utc>;
}
