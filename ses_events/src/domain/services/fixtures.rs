use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::domain::ports::TimeGetter;

pub(crate) struct FixedTime(pub DateTime<Utc>);

impl TimeGetter for FixedTime {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn written_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 10).unwrap()
}

pub(crate) fn sns_payload(message: serde_json::Value) -> serde_json::Value {
    json!({
        "Records": [{
            "EventSource": "aws:sns",
            "EventVersion": "1.0",
            "EventSubscriptionArn": "arn:aws:sns:us-east-1:123456789012:ses-events:2bcfbf39",
            "Sns": {
                "Type": "Notification",
                "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                "TopicArn": "arn:aws:sns:us-east-1:123456789012:ses-events",
                "Subject": null,
                "Message": message.to_string(),
                "Timestamp": "2024-03-01T12:00:05.000Z",
                "SignatureVersion": "1",
                "Signature": "EXAMPLE",
                "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService-0000000000.pem",
                "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
                "MessageAttributes": {}
            }
        }]
    })
}

/// A bounce of two recipients without a reporting MTA, sent through the `marketing` set
pub(crate) fn marketing_bounce() -> serde_json::Value {
    sns_payload(json!({
        "eventType": "Bounce",
        "mail": {
            "messageId": "0100018e-bounce",
            "source": "news@example.com",
            "destination": ["a@x", "a@x", "b@x"],
            "commonHeaders": { "subject": "Spring sale" },
            "tags": { "ses:configuration-set": ["marketing"] }
        },
        "bounce": {
            "bounceType": "Permanent",
            "bounceSubType": "General",
            "bouncedRecipients": [
                { "emailAddress": "a@x" },
                { "emailAddress": "b@x" }
            ],
            "timestamp": "2024-03-01T12:00:00.000Z",
            "feedbackId": "feedback"
        }
    }))
}

pub(crate) fn unknown_kind() -> serde_json::Value {
    sns_payload(json!({
        "eventType": "Subscription",
        "mail": { "messageId": "0100018e-unknown" }
    }))
}

pub(crate) fn without_mail() -> serde_json::Value {
    sns_payload(json!({
        "notificationType": "Bounce",
        "bounce": { "bounceType": "Permanent" }
    }))
}
