use crate::{
    domain::{
        extract::extract,
        models::{Diagnostic, Notification, Retention, StoreRecord},
        ports::{DiagnosticSink, RecordStore, StoreError, TimeGetter},
    },
    outbound::time::DefaultTime,
};


/// What happened to one notification on its way to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// The record was written
    Stored,
    /// The payload was not a notification we handle, nothing was written
    Dropped,
    /// The write failed and was reported to the diagnostic channel
    Failed,
}

/// Writes one typed, expiring [StoreRecord] per notification
#[derive(Clone)]
pub struct NotificationNormalizer<S, D, T> {
    store: S,
    diagnostics: D,
    time: T,
    retention: Retention,
}

impl<S, D, T> NotificationNormalizer<S, D, T>
where
    S: RecordStore,
    D: DiagnosticSink,
    T: TimeGetter,
{
    /// create a new instance of this service
    pub fn new(store: S, diagnostics: D, time: T, retention: Retention) -> Self {
        NotificationNormalizer {
            store,
            diagnostics,
            time,
            retention,
        }
    }

    /// Decode the raw invocation payload and store it.
    /// Never fails, every failure ends up in the diagnostic channel.
    #[tracing::instrument(skip_all)]
    pub async fn normalize(&self, payload: serde_json::Value) -> NormalizeOutcome {
        match super::admit(payload, &self.diagnostics) {
            Some(notification) => self.store_notification(&notification).await,
            None => NormalizeOutcome::Dropped,
        }
    }

    /// Build the [StoreRecord] of a decoded notification and write it once
    #[tracing::instrument(skip_all, fields(message_id = %notification.mail.message_id, kind = %notification.kind()))]
    pub async fn store_notification(&self, notification: &Notification) -> NormalizeOutcome {
        let fields = extract(notification);
        let record = StoreRecord::from_fields(&fields, self.time.now(), self.retention);

        match self.store.put_record(record).await {
            Ok(()) => {
                tracing::info!("stored notification");
                NormalizeOutcome::Stored
            }
            Err(err) => {
                let diagnostic = match &err {
                    StoreError::NotFound(_) => Diagnostic::warning("TableNotFound", err.to_string()),
                    StoreError::AccessDenied(_) => Diagnostic::error("AccessDenied", err.to_string()),
                    StoreError::Other(e) => Diagnostic::error("PutRecordFailed", format!("{e:#}")),
                };
                self.diagnostics.emit(diagnostic.with_context(serde_json::json!({
                    "message_id": notification.mail.message_id,
                    "event_type": notification.kind().to_string(),
                })));
                NormalizeOutcome::Failed
            }
        }
    }
}

impl<S, D> NotificationNormalizer<S, D, DefaultTime>
where
    S: RecordStore,
    D: DiagnosticSink,
{
    /// create an instance of self passing the default impl for [TimeGetter]
    pub fn new_with_default_time(store: S, diagnostics: D, retention: Retention) -> Self {
        Self::new(store, diagnostics, DefaultTime, retention)
    }
}
