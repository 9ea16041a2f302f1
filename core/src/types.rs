//! Response models returned by the messaging API.
//!
//! # Design
//! These types mirror the service's JSON documents but are defined
//! independently of the mock-server crate; integration tests catch any
//! schema drift. Only identifiers are mandatory. Everything else defaults
//! when absent so older or newer servers with extra or missing fields still
//! decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transport security used by an SMTP provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    None,
    Ssl,
    Tls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub delivered_at: Option<String>,
    #[serde(default)]
    pub delivery_errors: Vec<String>,
    #[serde(default)]
    pub delivered_total: u64,
    /// Channel-specific content (subject, body, title...), kept opaque.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// One of `draft`, `scheduled`, `processing`, `sent`, `failed`.
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    pub total: u64,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    #[serde(default)]
    pub name: String,
    /// Vendor name, e.g. `sendgrid` or `twilio`.
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub enabled: bool,
    /// Channel: `email`, `sms` or `push`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub credentials: Map<String, Value>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderList {
    pub total: u64,
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    pub name: String,
    #[serde(default)]
    pub email_total: u64,
    #[serde(default)]
    pub sms_total: u64,
    #[serde(default)]
    pub push_total: u64,
    /// Roles allowed to subscribe.
    #[serde(default)]
    pub subscribe: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicList {
    pub total: u64,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetList {
    pub total: u64,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    pub target_id: String,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub topic_id: String,
    #[serde(default)]
    pub provider_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberList {
    pub total: u64,
    pub subscribers: Vec<Subscriber>,
}

/// One audit-log entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Log {
    pub event: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub mode: String,
    pub ip: String,
    pub time: String,
    pub os_code: String,
    pub os_name: String,
    pub os_version: String,
    pub client_type: String,
    pub client_code: String,
    pub client_name: String,
    pub client_version: String,
    pub client_engine: String,
    pub client_engine_version: String,
    pub device_name: String,
    pub device_brand: String,
    pub device_model: String,
    pub country_code: String,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogList {
    pub total: u64,
    pub logs: Vec<Log>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_decodes_service_document() {
        let raw = r#"{
            "$id": "t1",
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "$updatedAt": "2024-01-01T00:00:00.000+00:00",
            "name": "News",
            "emailTotal": 2,
            "smsTotal": 0,
            "pushTotal": 1,
            "subscribe": ["users"]
        }"#;
        let topic: Topic = serde_json::from_str(raw).unwrap();
        assert_eq!(topic.id, "t1");
        assert_eq!(topic.email_total, 2);
        assert_eq!(topic.subscribe, vec!["users"]);
    }

    #[test]
    fn provider_type_maps_to_kind() {
        let raw = r#"{"$id":"p1","name":"Mail","provider":"smtp","enabled":true,"type":"email"}"#;
        let provider: Provider = serde_json::from_str(raw).unwrap();
        assert_eq!(provider.kind, "email");
        assert_eq!(provider.provider, "smtp");
        assert!(provider.credentials.is_empty());
    }

    #[test]
    fn message_without_schedule_decodes() {
        let raw = r#"{"$id":"m1","providerType":"sms","status":"draft","data":{"content":"hi"}}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.scheduled_at, None);
        assert_eq!(message.data["content"], "hi");
        assert!(message.delivery_errors.is_empty());
    }

    #[test]
    fn log_list_tolerates_sparse_entries() {
        let raw = r#"{"total":1,"logs":[{"event":"topics.create","ip":"127.0.0.1"}]}"#;
        let logs: LogList = serde_json::from_str(raw).unwrap();
        assert_eq!(logs.logs[0].event, "topics.create");
        assert_eq!(logs.logs[0].user_id, "");
    }

    #[test]
    fn smtp_encryption_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_value(SmtpEncryption::Tls).unwrap(), "tls");
        let parsed: SmtpEncryption = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(parsed, SmtpEncryption::None);
    }
}
