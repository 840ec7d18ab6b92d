use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use ses_events::domain::{
    ports::{DiagnosticSink, LogStreamSink, TimeGetter},
    services::DeliveryLogAppender,
};


/// Appends the notification carried by one SNS invocation to the delivery log.
#[tracing::instrument(skip(appender, event), fields(request_id = %event.context.request_id))]
pub async fn handler<L, D, T>(
    appender: Arc<DeliveryLogAppender<L, D, T>>,
    event: LambdaEvent<serde_json::Value>,
) -> Result<(), Error>
where
    L: LogStreamSink,
    D: DiagnosticSink,
    T: TimeGetter,
{
    let outcome = appender.append(event.payload).await;
    tracing::debug!(outcome = ?outcome, "processed notification");

    Ok(())
}
