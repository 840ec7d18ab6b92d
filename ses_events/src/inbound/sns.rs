//! Decoding of the SNS event which wraps every SES notification.

use std::str::FromStr;

use aws_lambda_events::event::sns::SnsEvent;
use chrono::SecondsFormat;
use thiserror::Error;

use crate::domain::models::{EventKind, Mail, MailEvent, Notification, Severity};


/// The body of the wrapped message, before the kind is known
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationBody {
    event_type: Option<String>,
    notification_type: Option<String>,
    mail: Option<serde_json::Value>,
    #[serde(flatten)]
    details: serde_json::Map<String, serde_json::Value>,
}

/// Why a payload did not turn into a [Notification]
#[derive(Debug, Error)]
pub enum Rejection {
    /// The payload is not an SNS envelope
    #[error("payload is not an sns envelope: {0}")]
    UndecodableEnvelope(serde_json::Error),
    /// The envelope carried no record
    #[error("sns envelope contains no records")]
    NoRecord,
    /// The wrapped message is not a json object
    #[error("sns message is not a json object: {0}")]
    UndecodableBody(serde_json::Error),
    /// The message has no (or an empty) `mail` object
    #[error("notification has no mail object")]
    MissingMail,
    /// The discriminator is missing or not one of the known kinds
    #[error("Unhandled Message Type: {}", .0.as_deref().unwrap_or("None"))]
    UnknownKind(Option<String>),
    /// The `mail` object is present but does not have the expected shape
    #[error("malformed mail object: {0}")]
    MalformedMail(serde_json::Error),
    /// The detail object of a known kind is missing
    #[error("{kind} notification has no {} object", kind.detail_key())]
    MissingDetail {
        #[allow(missing_docs)]
        kind: EventKind,
    },
    /// The detail object of a known kind does not have the expected shape
    #[error("malformed {kind} detail: {source}")]
    MalformedDetail {
        #[allow(missing_docs)]
        kind: EventKind,
        #[allow(missing_docs)]
        source: serde_json::Error,
    },
}

impl Rejection {
    /// [None] means the payload is transport noise and is dropped without a diagnostic
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Rejection::UndecodableEnvelope(_)
            | Rejection::NoRecord
            | Rejection::UndecodableBody(_)
            | Rejection::MissingMail => None,
            Rejection::UnknownKind(_)
            | Rejection::MalformedMail(_)
            | Rejection::MissingDetail { .. }
            | Rejection::MalformedDetail { .. } => Some(Severity::Critical),
        }
    }

    /// Machine readable name of the rejection
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::UndecodableEnvelope(_) => "UndecodableEnvelope",
            Rejection::NoRecord => "NoRecord",
            Rejection::UndecodableBody(_) => "UndecodableBody",
            Rejection::MissingMail => "MissingMail",
            Rejection::UnknownKind(_) => "UnhandledMessageType",
            Rejection::MalformedMail(_) => "MalformedMail",
            Rejection::MissingDetail { .. } => "MissingDetail",
            Rejection::MalformedDetail { .. } => "MalformedDetail",
        }
    }

    /// Structured context for the diagnostic channel
    pub fn context(&self) -> serde_json::Value {
        match self {
            Rejection::UnknownKind(kind) => serde_json::json!({ "event_type": kind }),
            Rejection::MissingDetail { kind } | Rejection::MalformedDetail { kind, .. } => {
                serde_json::json!({ "event_type": kind.to_string() })
            }
            _ => serde_json::Value::Null,
        }
    }
}

/// Decode one invocation payload into a [Notification].
/// Only the first record is read, SNS delivers exactly one per invocation.
#[tracing::instrument(skip(payload))]
pub fn decode(payload: serde_json::Value) -> Result<Notification, Rejection> {
    let event: SnsEvent =
        serde_json::from_value(payload).map_err(Rejection::UndecodableEnvelope)?;
    let record = event
        .records
        .into_iter()
        .next()
        .ok_or(Rejection::NoRecord)?;

    let mut body: NotificationBody =
        serde_json::from_str(&record.sns.message).map_err(Rejection::UndecodableBody)?;

    let mail = match body.mail.take() {
        None | Some(serde_json::Value::Null) => return Err(Rejection::MissingMail),
        Some(serde_json::Value::Object(map)) if map.is_empty() => {
            return Err(Rejection::MissingMail);
        }
        Some(mail) => mail,
    };

    let raw_kind = body.event_type.take().or(body.notification_type.take());
    let kind = raw_kind
        .as_deref()
        .and_then(|k| EventKind::from_str(k).ok())
        .ok_or_else(|| Rejection::UnknownKind(raw_kind.clone()))?;

    let mail: Mail = serde_json::from_value(mail).map_err(Rejection::MalformedMail)?;

    let detail = body
        .details
        .remove(kind.detail_key())
        .filter(|detail| !detail.is_null())
        .ok_or(Rejection::MissingDetail { kind })?;
    let event = MailEvent::from_detail(kind, detail)
        .map_err(|source| Rejection::MalformedDetail { kind, source })?;

    Ok(Notification {
        mail,
        event,
        received_at: record
            .sns
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
