use chrono::{DateTime, Utc};

use crate::{
    domain::{
        extract::extract,
        models::{Diagnostic, LogEvent, LogRecord, Notification},
        ports::{DiagnosticSink, LogSinkError, LogStreamSink, TimeGetter},
    },
    outbound::time::DefaultTime,
};


/// The number of append attempts before a write is abandoned
pub const MAX_PUT_ATTEMPTS: u8 = 3;

/// What happened to one notification on its way to the log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The line was appended to `stream`
    Appended {
        #[allow(missing_docs)]
        stream: String,
        /// how many put attempts it took
        attempts: u8,
    },
    /// The write was given up, the reason is in the diagnostic channel
    Abandoned {
        #[allow(missing_docs)]
        stream: String,
        /// how many put attempts were made before giving up, 0 if we never got to put
        attempts: u8,
    },
    /// The payload was not a notification we handle, nothing was written
    Dropped,
}

/// The name of the shared stream for the day of `now`
pub fn daily_stream_name(now: DateTime<Utc>) -> String {
    now.format("%Y/%m/%d").to_string()
}

/// Appends one json line per notification to a shared per-day log stream.
///
/// Concurrent invocations race for the stream's ordering token, a stale token is recovered by
/// retrying with the token returned in the rejection, at most [MAX_PUT_ATTEMPTS] times.
#[derive(Clone)]
pub struct DeliveryLogAppender<L, D, T> {
    sink: L,
    diagnostics: D,
    time: T,
}

impl<L, D, T> DeliveryLogAppender<L, D, T>
where
    L: LogStreamSink,
    D: DiagnosticSink,
    T: TimeGetter,
{
    /// create a new instance of this service
    pub fn new(sink: L, diagnostics: D, time: T) -> Self {
        DeliveryLogAppender {
            sink,
            diagnostics,
            time,
        }
    }

    /// Decode the raw invocation payload and append it.
    /// Never fails, every failure ends up in the diagnostic channel.
    #[tracing::instrument(skip_all)]
    pub async fn append(&self, payload: serde_json::Value) -> AppendOutcome {
        match super::admit(payload, &self.diagnostics) {
            Some(notification) => self.append_notification(&notification).await,
            None => AppendOutcome::Dropped,
        }
    }

    /// Serialize the [LogRecord] of a decoded notification and append it to today's stream
    #[tracing::instrument(skip_all, fields(message_id = %notification.mail.message_id, kind = %notification.kind()))]
    pub async fn append_notification(&self, notification: &Notification) -> AppendOutcome {
        let record = LogRecord::from_fields(&extract(notification));
        let now = self.time.now();
        let stream = daily_stream_name(now);
        tracing::debug!(stream = %stream, "stream resolved");

        let message = match record.to_line() {
            Ok(message) => message,
            Err(e) => {
                self.diagnostics.emit(
                    Diagnostic::error("SerializeFailed", e.to_string())
                        .with_context(serde_json::json!({ "stream": stream })),
                );
                return AppendOutcome::Abandoned {
                    stream,
                    attempts: 0,
                };
            }
        };
        let event = LogEvent {
            timestamp_millis: now.timestamp_millis(),
            message,
        };

        let fresh = match self.sink.create_stream(&stream).await {
            Ok(()) => true,
            Err(LogSinkError::AlreadyExists) => false,
            Err(err) => {
                self.report("CreateLogStream", &stream, &event, err);
                return AppendOutcome::Abandoned {
                    stream,
                    attempts: 0,
                };
            }
        };
        tracing::debug!(stream = %stream, fresh, "stream ensured");

        // a stream we just created has no token yet
        let mut token = if fresh {
            None
        } else {
            match self.sink.sequence_token(&stream).await {
                Ok(token) => token,
                Err(err) => {
                    self.report("DescribeLogStreams", &stream, &event, err);
                    return AppendOutcome::Abandoned {
                        stream,
                        attempts: 0,
                    };
                }
            }
        };

        let mut attempts = 0;
        while attempts < MAX_PUT_ATTEMPTS {
            attempts += 1;
            match self.sink.put_event(&stream, event.clone(), token.clone()).await {
                Ok(()) | Err(LogSinkError::DataAlreadyAccepted) => {
                    tracing::info!(stream = %stream, attempts, "appended notification");
                    return AppendOutcome::Appended { stream, attempts };
                }
                Err(LogSinkError::InvalidSequenceToken { expected }) => {
                    tracing::debug!(stream = %stream, attempts, "sequence token was stale");
                    token = expected;
                }
                Err(err) => {
                    self.report("PutLogEvents", &stream, &event, err);
                    return AppendOutcome::Abandoned { stream, attempts };
                }
            }
        }

        self.diagnostics.emit(
            Diagnostic::error(
                "SequenceTokenExhausted",
                format!("log stream {stream} kept rejecting the sequence token after {attempts} attempts"),
            )
            .with_context(serde_json::json!({ "stream": stream, "message": event.message })),
        );
        AppendOutcome::Abandoned { stream, attempts }
    }

    fn report(&self, operation: &str, stream: &str, event: &LogEvent, err: LogSinkError) {
        let context = serde_json::json!({
            "operation": operation,
            "stream": stream,
            "message": event.message,
        });
        let diagnostic = match &err {
            LogSinkError::NotFound(_) => Diagnostic::warning("LogResourceNotFound", err.to_string()),
            LogSinkError::Other(e) => Diagnostic::error(format!("{operation}Failed"), format!("{e:#}")),
            _ => Diagnostic::error(format!("{operation}Failed"), err.to_string()),
        };
        self.diagnostics.emit(diagnostic.with_context(context));
    }
}

impl<L, D> DeliveryLogAppender<L, D, DefaultTime>
where
    L: LogStreamSink,
    D: DiagnosticSink,
{
    /// create an instance of self passing the default impl for [TimeGetter]
    pub fn new_with_default_time(sink: L, diagnostics: D) -> Self {
        Self::new(sink, diagnostics, DefaultTime)
    }
}
