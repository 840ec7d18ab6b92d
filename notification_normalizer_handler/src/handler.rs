use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use ses_events::domain::{
    ports::{DiagnosticSink, RecordStore, TimeGetter},
    services::NotificationNormalizer,
};


/// Stores the notification carried by one SNS invocation.
/// The payload is taken as raw json so a malformed envelope never fails the invocation.
#[tracing::instrument(skip(normalizer, event), fields(request_id = %event.context.request_id))]
pub async fn handler<S, D, T>(
    normalizer: Arc<NotificationNormalizer<S, D, T>>,
    event: LambdaEvent<serde_json::Value>,
) -> Result<(), Error>
where
    S: RecordStore,
    D: DiagnosticSink,
    T: TimeGetter,
{
    let outcome = normalizer.normalize(event.payload).await;
    tracing::debug!(outcome = ?outcome, "processed notification");

    Ok(())
}
