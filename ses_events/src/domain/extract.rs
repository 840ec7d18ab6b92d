//! Pure mapping of a [Notification] onto a flat [EventFields].
//!
//! Common envelope fields are written first, then the kind specific fields on top of them.
//! Optional kind fields default to an empty string so every listed field is always present.

use crate::domain::models::{
    BounceDetail, ClickDetail, ComplaintDetail, DeliveryDelayDetail, DeliveryDetail, EventFields,
    FieldValue, Mail, MailEvent, Notification, OpenDetail, RejectDetail, RenderingFailureDetail,
    field,
};

const SOURCE_IP_TAG: &str = "ses:source-ip";
const CONFIG_SET_TAG: &str = "ses:configuration-set";
const CALLER_IDENTITY_TAG: &str = "ses:caller-identity";

#[cfg(test)]
mod tests;

/// Extract the flat field mapping of a notification
#[tracing::instrument(skip(notification), fields(message_id = %notification.mail.message_id, kind = %notification.kind()))]
pub fn extract(notification: &Notification) -> EventFields {
    let mut fields = envelope_fields(notification);

    let kind_fields = match &notification.event {
        MailEvent::Bounce(detail) => bounce_fields(detail),
        MailEvent::Complaint(detail) => complaint_fields(detail),
        MailEvent::Delivery(detail) => delivery_fields(detail),
        MailEvent::DeliveryDelay(detail) => delivery_delay_fields(detail),
        MailEvent::Reject(detail) => reject_fields(detail),
        MailEvent::Click(detail) => click_fields(detail),
        MailEvent::Open(detail) => open_fields(detail),
        MailEvent::RenderingFailure(detail) => rendering_failure_fields(detail),
    };

    for (name, value) in kind_fields.iter() {
        fields.set(name, value.clone());
    }

    tracing::trace!(fields = ?fields.names(), "extracted fields");
    fields
}

fn envelope_fields(notification: &Notification) -> EventFields {
    let mail = &notification.mail;
    let mut fields = EventFields::new();

    fields.set(field::MESSAGE_ID, mail.message_id.as_str());
    fields.set(field::MESSAGE_TIME, notification.received_at.as_str());
    fields.set(field::EVENT_TYPE, notification.kind().to_string());
    fields.set(field::PUBLISH_TIME, notification.received_at.as_str());
    fields.set(field::FROM_ADDRESS, text(&mail.source));
    fields.set_opt(field::SUBJECT, mail.subject());
    fields.set(
        field::DESTINATION_ADDRESS,
        FieldValue::set(mail.destination.iter().map(String::as_str)),
    );
    fields.set_opt(
        field::SOURCE_IP,
        tag_or_fallback(mail, SOURCE_IP_TAG, &mail.source_ip),
    );
    fields.set_opt(field::CONFIG_SET, mail.first_tag(CONFIG_SET_TAG));
    fields.set_opt(
        field::IAM_USER,
        tag_or_fallback(mail, CALLER_IDENTITY_TAG, &mail.caller_identity),
    );

    fields
}

/// The first tag value wins over the top level field of the same meaning
fn tag_or_fallback<'a>(mail: &'a Mail, tag: &str, fallback: &'a Option<String>) -> Option<&'a str> {
    mail.first_tag(tag)
        .filter(|v| !v.is_empty())
        .or(fallback.as_deref().filter(|v| !v.is_empty()))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn bounce_fields(detail: &BounceDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set("BounceSummary", FieldValue::json(&detail.bounced_recipients));
    fields.set("ReportingMTA", text(&detail.reporting_mta));
    fields.set("BounceType", text(&detail.bounce_type));
    fields.set("BounceSubType", text(&detail.bounce_sub_type));
    fields.set_opt(field::MESSAGE_TIME, detail.timestamp.as_deref());
    fields
}

fn complaint_fields(detail: &ComplaintDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set(
        "ComplaintSummary",
        FieldValue::json(&detail.complained_recipients),
    );
    fields.set("FeedbackId", text(&detail.feedback_id));
    fields.set("FeedbackType", text(&detail.complaint_feedback_type));
    fields.set_opt(
        field::MESSAGE_TIME,
        detail.arrival_date.as_deref().or(detail.timestamp.as_deref()),
    );
    fields
}

fn delivery_fields(detail: &DeliveryDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set(
        field::DESTINATION_ADDRESS,
        FieldValue::set(detail.recipients.iter().map(String::as_str)),
    );
    fields.set("ReportingMTA", text(&detail.reporting_mta));
    fields.set("SMTPResponse", text(&detail.smtp_response));
    fields.set_opt(field::MESSAGE_TIME, detail.timestamp.as_deref());
    fields
}

fn delivery_delay_fields(detail: &DeliveryDelayDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set(
        "DelayedRecipients",
        FieldValue::json(&detail.delayed_recipients),
    );
    fields.set("ExpirationTime", text(&detail.expiration_time));
    fields.set("DelayType", text(&detail.delay_type));
    fields.set_opt(field::MESSAGE_TIME, detail.timestamp.as_deref());
    fields
}

fn reject_fields(detail: &RejectDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set("Reason", text(&detail.reason));
    fields
}

fn click_fields(detail: &ClickDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set("IPAddress", text(&detail.ip_address));
    fields.set("Link", text(&detail.link));
    fields.set(
        "LinkTags",
        FieldValue::json(&detail.link_tags.clone().unwrap_or_default()),
    );
    fields.set("UserAgent", text(&detail.user_agent));
    fields.set_opt(field::MESSAGE_TIME, detail.timestamp.as_deref());
    fields
}

fn open_fields(detail: &OpenDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set("IPAddress", text(&detail.ip_address));
    fields.set("UserAgent", text(&detail.user_agent));
    fields.set_opt(field::MESSAGE_TIME, detail.timestamp.as_deref());
    fields
}

fn rendering_failure_fields(detail: &RenderingFailureDetail) -> EventFields {
    let mut fields = EventFields::new();
    fields.set("ErrorMessage", text(&detail.error_message));
    fields.set("TemplateName", text(&detail.template_name));
    fields
}
