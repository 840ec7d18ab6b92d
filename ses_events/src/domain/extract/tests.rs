use cool_asserts::assert_matches;
use serde_json::json;

use super::*;
use crate::domain::models::EventKind;

const PUBLISH_TIME: &str = "2024-03-01T12:00:05.000Z";

fn mail() -> serde_json::Value {
    json!({
        "messageId": "0100018e-message",
        "source": "sender@example.com",
        "destination": ["a@x", "a@x", "b@x"],
        "commonHeaders": { "subject": "Hello" }
    })
}

fn notification(kind: EventKind, mail: serde_json::Value, detail: serde_json::Value) -> Notification {
    Notification {
        mail: serde_json::from_value(mail).unwrap(),
        event: MailEvent::from_detail(kind, detail).unwrap(),
        received_at: PUBLISH_TIME.to_string(),
    }
}

fn kind_field_names(fields: &EventFields) -> Vec<&'static str> {
    const COMMON: [&str; 10] = [
        field::MESSAGE_ID,
        field::MESSAGE_TIME,
        field::EVENT_TYPE,
        field::PUBLISH_TIME,
        field::FROM_ADDRESS,
        field::SUBJECT,
        field::DESTINATION_ADDRESS,
        field::SOURCE_IP,
        field::CONFIG_SET,
        field::IAM_USER,
    ];
    fields
        .names()
        .into_iter()
        .filter(|name| !COMMON.contains(name))
        .collect()
}

#[test]
fn it_should_extract_bounce_fields() {
    let fields = extract(&notification(
        EventKind::Bounce,
        mail(),
        json!({
            "bounceType": "Permanent",
            "bounceSubType": "General",
            "bouncedRecipients": [
                { "emailAddress": "a@x", "action": "failed", "status": "5.1.1" }
            ],
            "timestamp": "2024-03-01T12:00:00.000Z",
            "feedbackId": "feedback",
            "reportingMTA": "dsn; mta.example.com"
        }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["BounceSummary", "ReportingMTA", "BounceType", "BounceSubType"]
    );
    assert_eq!(
        fields.get("BounceSummary"),
        Some(&FieldValue::Json(
            r#"[{"emailAddress":"a@x","action":"failed","status":"5.1.1"}]"#.to_string()
        ))
    );
    assert_eq!(fields.text("ReportingMTA"), Some("dsn; mta.example.com"));
    assert_eq!(fields.text("BounceType"), Some("Permanent"));
    assert_eq!(fields.text("BounceSubType"), Some("General"));
    assert_eq!(
        fields.text(field::MESSAGE_TIME),
        Some("2024-03-01T12:00:00.000Z")
    );
    assert_eq!(fields.text(field::PUBLISH_TIME), Some(PUBLISH_TIME));
}

#[test]
fn missing_reporting_mta_should_default_to_empty() {
    let fields = extract(&notification(
        EventKind::Bounce,
        mail(),
        json!({ "bounceType": "Transient", "bounceSubType": "MailboxFull", "bouncedRecipients": [] }),
    ));

    assert_eq!(
        fields.get("ReportingMTA"),
        Some(&FieldValue::Text(String::new()))
    );
    // no detail timestamp keeps the publish time
    assert_eq!(fields.text(field::MESSAGE_TIME), Some(PUBLISH_TIME));
}

#[test]
fn it_should_extract_complaint_fields() {
    let fields = extract(&notification(
        EventKind::Complaint,
        mail(),
        json!({
            "complainedRecipients": [{ "emailAddress": "a@x" }],
            "timestamp": "2024-03-01T12:00:01.000Z",
            "feedbackId": "feedback",
            "complaintFeedbackType": "abuse",
            "arrivalDate": "2024-03-01T11:59:00.000Z"
        }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["ComplaintSummary", "FeedbackId", "FeedbackType"]
    );
    assert_eq!(
        fields.text("ComplaintSummary"),
        Some(r#"[{"emailAddress":"a@x"}]"#)
    );
    assert_eq!(fields.text("FeedbackType"), Some("abuse"));
    assert_eq!(
        fields.text(field::MESSAGE_TIME),
        Some("2024-03-01T11:59:00.000Z")
    );
}

#[test]
fn complaint_without_feedback_report_should_default() {
    let fields = extract(&notification(
        EventKind::Complaint,
        mail(),
        json!({
            "complainedRecipients": [{ "emailAddress": "a@x" }],
            "timestamp": "2024-03-01T12:00:01.000Z",
            "feedbackId": "feedback"
        }),
    ));

    assert_eq!(fields.text("FeedbackType"), Some(""));
    assert_eq!(
        fields.text(field::MESSAGE_TIME),
        Some("2024-03-01T12:00:01.000Z")
    );
}

#[test]
fn delivery_recipients_should_replace_destination() {
    let fields = extract(&notification(
        EventKind::Delivery,
        mail(),
        json!({
            "timestamp": "2024-03-01T12:00:02.000Z",
            "processingTimeMillis": 546,
            "recipients": ["b@x", "b@x"],
            "smtpResponse": "250 ok"
        }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["ReportingMTA", "SMTPResponse"]
    );
    assert_eq!(fields.get(field::DESTINATION_ADDRESS), Some(&FieldValue::set(["b@x"])));
    assert_eq!(fields.text("ReportingMTA"), Some(""));
    assert_eq!(fields.text("SMTPResponse"), Some("250 ok"));
    // replaced in place, not appended
    assert_eq!(fields.names()[6], field::DESTINATION_ADDRESS);
}

#[test]
fn it_should_extract_delivery_delay_fields() {
    let fields = extract(&notification(
        EventKind::DeliveryDelay,
        mail(),
        json!({
            "delayType": "TransientCommunicationFailure",
            "expirationTime": "2024-03-02T12:00:00.000Z",
            "delayedRecipients": [{ "emailAddress": "a@x", "status": "4.4.1" }],
            "timestamp": "2024-03-01T12:00:03.000Z"
        }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["DelayedRecipients", "ExpirationTime", "DelayType"]
    );
    assert_eq!(
        fields.text("DelayedRecipients"),
        Some(r#"[{"emailAddress":"a@x","status":"4.4.1"}]"#)
    );
    assert_eq!(fields.text("DelayType"), Some("TransientCommunicationFailure"));
}

#[test]
fn it_should_extract_reject_fields() {
    let fields = extract(&notification(
        EventKind::Reject,
        mail(),
        json!({ "reason": "Bad content" }),
    ));

    assert_eq!(kind_field_names(&fields), vec!["Reason"]);
    assert_eq!(fields.text("Reason"), Some("Bad content"));
    assert_eq!(fields.text(field::MESSAGE_TIME), Some(PUBLISH_TIME));
}

#[test]
fn it_should_extract_click_fields() {
    let fields = extract(&notification(
        EventKind::Click,
        mail(),
        json!({
            "ipAddress": "192.0.2.1",
            "timestamp": "2024-03-01T12:01:00.000Z",
            "userAgent": "Mozilla/5.0",
            "link": "https://example.com/offer",
            "linkTags": { "campaign": ["spring"] }
        }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["IPAddress", "Link", "LinkTags", "UserAgent"]
    );
    assert_eq!(fields.text("LinkTags"), Some(r#"{"campaign":["spring"]}"#));
    assert_eq!(fields.text("Link"), Some("https://example.com/offer"));
}

#[test]
fn click_without_link_tags_should_encode_an_empty_map() {
    let fields = extract(&notification(
        EventKind::Click,
        mail(),
        json!({ "ipAddress": "192.0.2.1", "link": "https://example.com" }),
    ));

    assert_eq!(fields.text("LinkTags"), Some("{}"));
    assert_eq!(fields.text("UserAgent"), Some(""));
}

#[test]
fn it_should_extract_open_fields() {
    let fields = extract(&notification(
        EventKind::Open,
        mail(),
        json!({
            "ipAddress": "192.0.2.1",
            "timestamp": "2024-03-01T12:02:00.000Z",
            "userAgent": "Mozilla/5.0"
        }),
    ));

    assert_eq!(kind_field_names(&fields), vec!["IPAddress", "UserAgent"]);
    assert_eq!(
        fields.text(field::MESSAGE_TIME),
        Some("2024-03-01T12:02:00.000Z")
    );
}

#[test]
fn it_should_extract_rendering_failure_fields() {
    let fields = extract(&notification(
        EventKind::RenderingFailure,
        mail(),
        json!({ "errorMessage": "Attribute 'name' is not present", "templateName": "welcome" }),
    ));

    assert_eq!(
        kind_field_names(&fields),
        vec!["ErrorMessage", "TemplateName"]
    );
    assert_eq!(fields.text(field::EVENT_TYPE), Some("Rendering Failure"));
    assert_eq!(fields.text("TemplateName"), Some("welcome"));
}

#[test]
fn destinations_should_be_deduplicated() {
    let fields = extract(&notification(
        EventKind::Open,
        mail(),
        json!({}),
    ));

    assert_matches!(fields.get(field::DESTINATION_ADDRESS), Some(FieldValue::TextSet(set)) => {
        assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), vec!["a@x", "b@x"]);
    });
}

#[test]
fn tags_should_win_over_top_level_fields() {
    let fields = extract(&notification(
        EventKind::Open,
        json!({
            "messageId": "id",
            "sourceIp": "198.51.100.1",
            "callerIdentity": "top-level-user",
            "tags": {
                "ses:source-ip": ["203.0.113.9"],
                "ses:caller-identity": ["tagged-user"],
                "ses:configuration-set": ["marketing"]
            }
        }),
        json!({}),
    ));

    assert_eq!(fields.text(field::SOURCE_IP), Some("203.0.113.9"));
    assert_eq!(fields.text(field::IAM_USER), Some("tagged-user"));
    assert_eq!(fields.text(field::CONFIG_SET), Some("marketing"));
}

#[test]
fn missing_tags_should_fall_back_or_be_omitted() {
    let fields = extract(&notification(
        EventKind::Open,
        json!({
            "messageId": "id",
            "sourceIp": "198.51.100.1",
            "tags": { "ses:caller-identity": [] }
        }),
        json!({}),
    ));

    assert_eq!(fields.text(field::SOURCE_IP), Some("198.51.100.1"));
    assert_eq!(fields.get(field::IAM_USER), None);
    assert_eq!(fields.get(field::CONFIG_SET), None);
    assert_eq!(fields.get(field::SUBJECT), None);
    assert_eq!(fields.text(field::FROM_ADDRESS), Some(""));
}

#[test]
fn blank_tag_values_should_fall_back() {
    let fields = extract(&notification(
        EventKind::Open,
        json!({
            "messageId": "id",
            "sourceIp": "198.51.100.1",
            "callerIdentity": "ses-sender",
            "tags": { "ses:source-ip": [""], "ses:caller-identity": [""] }
        }),
        json!({}),
    ));

    assert_eq!(fields.text(field::SOURCE_IP), Some("198.51.100.1"));
    assert_eq!(fields.text(field::IAM_USER), Some("ses-sender"));
}
