//! [LogStreamSink] backed by a CloudWatch Logs log group

use anyhow::Context;
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::operation::create_log_stream::CreateLogStreamError;
use aws_sdk_cloudwatchlogs::operation::describe_log_streams::DescribeLogStreamsError;
use aws_sdk_cloudwatchlogs::operation::put_log_events::PutLogEventsError;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;

use crate::domain::{
    models::LogEvent,
    ports::{LogSinkError, LogStreamSink},
};

#[cfg(test)]
mod tests;

/// Appends to streams of a single log group
#[derive(Debug, Clone)]
pub struct CloudWatchLogSink {
    client: Client,
    log_group: String,
}

impl CloudWatchLogSink {
    #[allow(missing_docs)]
    pub fn new(client: Client, log_group: &str) -> Self {
        Self {
            client,
            log_group: log_group.to_string(),
        }
    }
}

fn map_create_error(err: CreateLogStreamError) -> LogSinkError {
    match err {
        CreateLogStreamError::ResourceAlreadyExistsException(_) => LogSinkError::AlreadyExists,
        CreateLogStreamError::ResourceNotFoundException(e) => LogSinkError::NotFound(e.to_string()),
        e => LogSinkError::Other(anyhow::Error::from(e).context("could not create log stream")),
    }
}

fn map_describe_error(err: DescribeLogStreamsError) -> LogSinkError {
    match err {
        DescribeLogStreamsError::ResourceNotFoundException(e) => {
            LogSinkError::NotFound(e.to_string())
        }
        e => LogSinkError::Other(anyhow::Error::from(e).context("could not describe log streams")),
    }
}

fn map_put_error(err: PutLogEventsError) -> LogSinkError {
    match err {
        PutLogEventsError::InvalidSequenceTokenException(e) => LogSinkError::InvalidSequenceToken {
            expected: e.expected_sequence_token().map(str::to_owned),
        },
        PutLogEventsError::DataAlreadyAcceptedException(_) => LogSinkError::DataAlreadyAccepted,
        PutLogEventsError::ResourceNotFoundException(e) => LogSinkError::NotFound(e.to_string()),
        e => LogSinkError::Other(anyhow::Error::from(e).context("could not put log events")),
    }
}

impl LogStreamSink for CloudWatchLogSink {
    #[tracing::instrument(err, skip(self), fields(log_group = %self.log_group))]
    async fn create_stream(&self, stream: &str) -> Result<(), LogSinkError> {
        self.client
            .create_log_stream()
            .log_group_name(&self.log_group)
            .log_stream_name(stream)
            .send()
            .await
            .map_err(|err| map_create_error(err.into_service_error()))?;

        Ok(())
    }

    #[allow(deprecated)]
    #[tracing::instrument(err, skip(self), fields(log_group = %self.log_group))]
    async fn sequence_token(&self, stream: &str) -> Result<Option<String>, LogSinkError> {
        let output = self
            .client
            .describe_log_streams()
            .log_group_name(&self.log_group)
            .log_stream_name_prefix(stream)
            .send()
            .await
            .map_err(|err| map_describe_error(err.into_service_error()))?;

        // the prefix query can also return longer names, only the exact stream counts
        Ok(output
            .log_streams()
            .iter()
            .find(|s| s.log_stream_name() == Some(stream))
            .and_then(|s| s.upload_sequence_token())
            .map(str::to_owned))
    }

    #[allow(deprecated)]
    #[tracing::instrument(err, skip(self, event), fields(log_group = %self.log_group))]
    async fn put_event(
        &self,
        stream: &str,
        event: LogEvent,
        sequence_token: Option<String>,
    ) -> Result<(), LogSinkError> {
        let event = InputLogEvent::builder()
            .timestamp(event.timestamp_millis)
            .message(event.message)
            .build()
            .context("could not build log event")?;

        let output = self
            .client
            .put_log_events()
            .log_group_name(&self.log_group)
            .log_stream_name(stream)
            .log_events(event)
            .set_sequence_token(sequence_token)
            .send()
            .await
            .map_err(|err| map_put_error(err.into_service_error()))?;

        if let Some(rejected) = output.rejected_log_events_info() {
            return Err(LogSinkError::Other(anyhow::anyhow!(
                "log event was rejected: {rejected:?}"
            )));
        }

        Ok(())
    }
}
