use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer};

/// The closed set of SES event kinds we know how to extract.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum EventKind {
    /// The recipient's mail server permanently rejected the email.
    #[strum(serialize = "Bounce")]
    Bounce,
    /// The recipient marked the email as spam.
    #[strum(serialize = "Complaint")]
    Complaint,
    /// SES successfully delivered the email to the recipient's mail server.
    #[strum(serialize = "Delivery")]
    Delivery,
    /// The email couldn't be delivered yet because of a temporary issue.
    #[strum(serialize = "DeliveryDelay")]
    DeliveryDelay,
    /// SES accepted the email but determined that it contained a virus and didn't send it.
    #[strum(serialize = "Reject")]
    Reject,
    /// The recipient clicked one or more links in the email.
    #[strum(serialize = "Click")]
    Click,
    /// The recipient received the message and opened it in their email client.
    #[strum(serialize = "Open")]
    Open,
    /// The email wasn't sent because of a template rendering issue.
    #[strum(to_string = "Rendering Failure", serialize = "RenderingFailure")]
    RenderingFailure,
}

impl EventKind {
    /// The key of the kind specific detail object inside the notification body
    pub fn detail_key(&self) -> &'static str {
        match self {
            EventKind::Bounce => "bounce",
            EventKind::Complaint => "complaint",
            EventKind::Delivery => "delivery",
            EventKind::DeliveryDelay => "deliveryDelay",
            EventKind::Reject => "reject",
            EventKind::Click => "click",
            EventKind::Open => "open",
            EventKind::RenderingFailure => "failure",
        }
    }
}

/// A fully decoded notification. One of these is handled per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Envelope metadata of the original email
    pub mail: Mail,
    /// The kind specific payload
    pub event: MailEvent,
    /// The SNS publish timestamp, kept exactly as received
    pub received_at: String,
}

impl Notification {
    /// The kind of this notification
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

/// The `mail` object that is present on every SES notification
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mail {
    /// A unique ID that SES assigned to the message.
    pub message_id: String,
    /// The email address that the message was sent from (the envelope MAIL FROM address).
    pub source: Option<String>,
    /// A list of email addresses that were recipients of the original mail.
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: Vec<String>,
    /// The parsed headers of the original mail, only present when headers are included.
    pub common_headers: Option<CommonHeaders>,
    /// Tags attached to the message, every value is a list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: HashMap<String, Vec<String>>,
    /// The originating public IP address of the client that performed the send request.
    pub source_ip: Option<String>,
    /// The IAM identity that was used to send the email.
    pub caller_identity: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Mail {
    /// The first value of the tag `name`, [None] when the tag is missing or empty
    pub fn first_tag(&self, name: &str) -> Option<&str> {
        self.tags
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// The subject line, if the common headers carried one
    pub fn subject(&self) -> Option<&str> {
        self.common_headers
            .as_ref()
            .and_then(|headers| headers.subject.as_deref())
    }
}

/// Subset of the common headers we care about
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonHeaders {
    /// The subject line of the original mail
    pub subject: Option<String>,
}

/// The kind specific part of a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum MailEvent {
    #[allow(missing_docs)]
    Bounce(BounceDetail),
    #[allow(missing_docs)]
    Complaint(ComplaintDetail),
    #[allow(missing_docs)]
    Delivery(DeliveryDetail),
    #[allow(missing_docs)]
    DeliveryDelay(DeliveryDelayDetail),
    #[allow(missing_docs)]
    Reject(RejectDetail),
    #[allow(missing_docs)]
    Click(ClickDetail),
    #[allow(missing_docs)]
    Open(OpenDetail),
    #[allow(missing_docs)]
    RenderingFailure(RenderingFailureDetail),
}

impl MailEvent {
    /// Decode the detail object of a notification of the given kind
    pub fn from_detail(kind: EventKind, detail: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            EventKind::Bounce => MailEvent::Bounce(serde_json::from_value(detail)?),
            EventKind::Complaint => MailEvent::Complaint(serde_json::from_value(detail)?),
            EventKind::Delivery => MailEvent::Delivery(serde_json::from_value(detail)?),
            EventKind::DeliveryDelay => MailEvent::DeliveryDelay(serde_json::from_value(detail)?),
            EventKind::Reject => MailEvent::Reject(serde_json::from_value(detail)?),
            EventKind::Click => MailEvent::Click(serde_json::from_value(detail)?),
            EventKind::Open => MailEvent::Open(serde_json::from_value(detail)?),
            EventKind::RenderingFailure => {
                MailEvent::RenderingFailure(serde_json::from_value(detail)?)
            }
        })
    }

    /// The [EventKind] this detail belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            MailEvent::Bounce(_) => EventKind::Bounce,
            MailEvent::Complaint(_) => EventKind::Complaint,
            MailEvent::Delivery(_) => EventKind::Delivery,
            MailEvent::DeliveryDelay(_) => EventKind::DeliveryDelay,
            MailEvent::Reject(_) => EventKind::Reject,
            MailEvent::Click(_) => EventKind::Click,
            MailEvent::Open(_) => EventKind::Open,
            MailEvent::RenderingFailure(_) => EventKind::RenderingFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BounceDetail {
    /// The type of bounce, as determined by SES.
    pub bounce_type: Option<String>,
    /// The subtype of the bounce, as determined by SES.
    pub bounce_sub_type: Option<String>,
    /// Information about the recipients of the original mail that bounced.
    #[serde(default)]
    pub bounced_recipients: Vec<BouncedRecipient>,
    /// The date and time at which the bounce was sent, in ISO 8601 format.
    pub timestamp: Option<String>,
    pub feedback_id: Option<String>,
    /// The value of the Reporting-MTA field from the DSN.
    #[serde(rename = "reportingMTA")]
    pub reporting_mta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BouncedRecipient {
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ComplaintDetail {
    #[serde(default)]
    pub complained_recipients: Vec<ComplainedRecipient>,
    /// When the ISP sent the complaint notification.
    pub timestamp: Option<String>,
    pub feedback_id: Option<String>,
    pub complaint_sub_type: Option<String>,
    pub user_agent: Option<String>,
    /// Only present when a feedback report is attached to the complaint.
    pub complaint_feedback_type: Option<String>,
    /// The Arrival-Date or Received-Date of the feedback report.
    pub arrival_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ComplainedRecipient {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct DeliveryDetail {
    pub timestamp: Option<String>,
    pub processing_time_millis: Option<u64>,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub smtp_response: Option<String>,
    #[serde(rename = "reportingMTA")]
    pub reporting_mta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct DeliveryDelayDetail {
    pub delay_type: Option<String>,
    /// When SES will stop trying to deliver the message.
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub delayed_recipients: Vec<DelayedRecipient>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct DelayedRecipient {
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct RejectDetail {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ClickDetail {
    pub ip_address: Option<String>,
    pub timestamp: Option<String>,
    pub user_agent: Option<String>,
    pub link: Option<String>,
    pub link_tags: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct OpenDetail {
    pub ip_address: Option<String>,
    pub timestamp: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct RenderingFailureDetail {
    pub error_message: Option<String>,
    pub template_name: Option<String>,
}
