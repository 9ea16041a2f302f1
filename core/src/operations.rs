//! Declarative table of every messaging endpoint.
//!
//! # Design
//! Each endpoint is a static [`Operation`]: method, path template, and the
//! ordered list of parameters it accepts. The generic builder in
//! `client.rs` interprets these definitions, so adding an endpoint means
//! adding a table entry rather than another hand-written request method.
//!
//! Parameter order matters twice: required parameters are validated in
//! declaration order (the first missing one is reported), and payload fields
//! are inserted in declaration order. A parameter's payload key is its name.

use crate::http::HttpMethod;
use crate::http::HttpMethod::{Delete, Get, Patch, Post};

/// Where a parameter ends up in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Required, substituted into the path template only.
    Path,
    /// Required, sent in the payload.
    Required,
    /// Sent in the payload when set.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl Param {
    pub const fn path(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Path }
    }

    pub const fn required(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Required }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Optional }
    }

    pub fn is_required(&self) -> bool {
        self.kind != ParamKind::Optional
    }

    pub fn in_payload(&self) -> bool {
        self.kind != ParamKind::Path
    }
}

/// Static description of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub params: &'static [Param],
    pub headers: &'static [(&'static str, &'static str)],
}

impl Operation {
    pub fn required(&self) -> impl Iterator<Item = &Param> + '_ {
        self.params.iter().filter(|p| p.is_required())
    }

    pub fn payload_fields(&self) -> impl Iterator<Item = &Param> + '_ {
        self.params.iter().filter(|p| p.in_payload())
    }

    /// Placeholder names in the path template, in order of appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        names
    }
}

/// Look up an operation by its snake_case name.
pub fn find(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}

const JSON: &[(&str, &str)] = &[("content-type", "application/json")];

const fn op(
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    params: &'static [Param],
) -> Operation {
    Operation {
        name,
        method,
        path,
        params,
        headers: JSON,
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const LIST_MESSAGES: Operation = op(
    "list_messages",
    Get,
    "/messaging/messages",
    &[Param::optional("queries"), Param::optional("search")],
);

pub const CREATE_EMAIL: Operation = op(
    "create_email",
    Post,
    "/messaging/messages/email",
    &[
        Param::required("messageId"),
        Param::required("subject"),
        Param::required("content"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("cc"),
        Param::optional("bcc"),
        Param::optional("attachments"),
        Param::optional("draft"),
        Param::optional("html"),
        Param::optional("scheduledAt"),
    ],
);

pub const UPDATE_EMAIL: Operation = op(
    "update_email",
    Patch,
    "/messaging/messages/email/{messageId}",
    &[
        Param::path("messageId"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("subject"),
        Param::optional("content"),
        Param::optional("draft"),
        Param::optional("html"),
        Param::optional("cc"),
        Param::optional("bcc"),
        Param::optional("scheduledAt"),
        Param::optional("attachments"),
    ],
);

pub const CREATE_PUSH: Operation = op(
    "create_push",
    Post,
    "/messaging/messages/push",
    &[
        Param::required("messageId"),
        Param::required("title"),
        Param::required("body"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("data"),
        Param::optional("action"),
        Param::optional("image"),
        Param::optional("icon"),
        Param::optional("sound"),
        Param::optional("color"),
        Param::optional("tag"),
        Param::optional("badge"),
        Param::optional("draft"),
        Param::optional("scheduledAt"),
    ],
);

pub const UPDATE_PUSH: Operation = op(
    "update_push",
    Patch,
    "/messaging/messages/push/{messageId}",
    &[
        Param::path("messageId"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("title"),
        Param::optional("body"),
        Param::optional("data"),
        Param::optional("action"),
        Param::optional("image"),
        Param::optional("icon"),
        Param::optional("sound"),
        Param::optional("color"),
        Param::optional("tag"),
        Param::optional("badge"),
        Param::optional("draft"),
        Param::optional("scheduledAt"),
    ],
);

pub const CREATE_SMS: Operation = op(
    "create_sms",
    Post,
    "/messaging/messages/sms",
    &[
        Param::required("messageId"),
        Param::required("content"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("draft"),
        Param::optional("scheduledAt"),
    ],
);

pub const UPDATE_SMS: Operation = op(
    "update_sms",
    Patch,
    "/messaging/messages/sms/{messageId}",
    &[
        Param::path("messageId"),
        Param::optional("topics"),
        Param::optional("users"),
        Param::optional("targets"),
        Param::optional("content"),
        Param::optional("draft"),
        Param::optional("scheduledAt"),
    ],
);

pub const GET_MESSAGE: Operation = op(
    "get_message",
    Get,
    "/messaging/messages/{messageId}",
    &[Param::path("messageId")],
);

pub const DELETE_MESSAGE: Operation = op(
    "delete_message",
    Delete,
    "/messaging/messages/{messageId}",
    &[Param::path("messageId")],
);

pub const LIST_MESSAGE_LOGS: Operation = op(
    "list_message_logs",
    Get,
    "/messaging/messages/{messageId}/logs",
    &[Param::path("messageId"), Param::optional("queries")],
);

pub const LIST_TARGETS: Operation = op(
    "list_targets",
    Get,
    "/messaging/messages/{messageId}/targets",
    &[Param::path("messageId"), Param::optional("queries")],
);

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

pub const LIST_PROVIDERS: Operation = op(
    "list_providers",
    Get,
    "/messaging/providers",
    &[Param::optional("queries"), Param::optional("search")],
);

pub const CREATE_APNS_PROVIDER: Operation = op(
    "create_apns_provider",
    Post,
    "/messaging/providers/apns",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("authKey"),
        Param::optional("authKeyId"),
        Param::optional("teamId"),
        Param::optional("bundleId"),
        Param::optional("sandbox"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_APNS_PROVIDER: Operation = op(
    "update_apns_provider",
    Patch,
    "/messaging/providers/apns/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("authKey"),
        Param::optional("authKeyId"),
        Param::optional("teamId"),
        Param::optional("bundleId"),
        Param::optional("sandbox"),
    ],
);

pub const CREATE_FCM_PROVIDER: Operation = op(
    "create_fcm_provider",
    Post,
    "/messaging/providers/fcm",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("serviceAccountJSON"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_FCM_PROVIDER: Operation = op(
    "update_fcm_provider",
    Patch,
    "/messaging/providers/fcm/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("serviceAccountJSON"),
    ],
);

pub const CREATE_MAILGUN_PROVIDER: Operation = op(
    "create_mailgun_provider",
    Post,
    "/messaging/providers/mailgun",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("apiKey"),
        Param::optional("domain"),
        Param::optional("isEuRegion"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_MAILGUN_PROVIDER: Operation = op(
    "update_mailgun_provider",
    Patch,
    "/messaging/providers/mailgun/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("apiKey"),
        Param::optional("domain"),
        Param::optional("isEuRegion"),
        Param::optional("enabled"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
    ],
);

pub const CREATE_MSG91_PROVIDER: Operation = op(
    "create_msg91_provider",
    Post,
    "/messaging/providers/msg91",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("templateId"),
        Param::optional("senderId"),
        Param::optional("authKey"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_MSG91_PROVIDER: Operation = op(
    "update_msg91_provider",
    Patch,
    "/messaging/providers/msg91/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("templateId"),
        Param::optional("senderId"),
        Param::optional("authKey"),
    ],
);

pub const CREATE_SENDGRID_PROVIDER: Operation = op(
    "create_sendgrid_provider",
    Post,
    "/messaging/providers/sendgrid",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("apiKey"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_SENDGRID_PROVIDER: Operation = op(
    "update_sendgrid_provider",
    Patch,
    "/messaging/providers/sendgrid/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("apiKey"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
    ],
);

pub const CREATE_SMTP_PROVIDER: Operation = op(
    "create_smtp_provider",
    Post,
    "/messaging/providers/smtp",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::required("host"),
        Param::optional("port"),
        Param::optional("username"),
        Param::optional("password"),
        Param::optional("encryption"),
        Param::optional("autoTLS"),
        Param::optional("mailer"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_SMTP_PROVIDER: Operation = op(
    "update_smtp_provider",
    Patch,
    "/messaging/providers/smtp/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("host"),
        Param::optional("port"),
        Param::optional("username"),
        Param::optional("password"),
        Param::optional("encryption"),
        Param::optional("autoTLS"),
        Param::optional("mailer"),
        Param::optional("fromName"),
        Param::optional("fromEmail"),
        Param::optional("replyToName"),
        Param::optional("replyToEmail"),
        Param::optional("enabled"),
    ],
);

pub const CREATE_TELESIGN_PROVIDER: Operation = op(
    "create_telesign_provider",
    Post,
    "/messaging/providers/telesign",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("from"),
        Param::optional("customerId"),
        Param::optional("apiKey"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_TELESIGN_PROVIDER: Operation = op(
    "update_telesign_provider",
    Patch,
    "/messaging/providers/telesign/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("customerId"),
        Param::optional("apiKey"),
        Param::optional("from"),
    ],
);

pub const CREATE_TEXTMAGIC_PROVIDER: Operation = op(
    "create_textmagic_provider",
    Post,
    "/messaging/providers/textmagic",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("from"),
        Param::optional("username"),
        Param::optional("apiKey"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_TEXTMAGIC_PROVIDER: Operation = op(
    "update_textmagic_provider",
    Patch,
    "/messaging/providers/textmagic/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("username"),
        Param::optional("apiKey"),
        Param::optional("from"),
    ],
);

pub const CREATE_TWILIO_PROVIDER: Operation = op(
    "create_twilio_provider",
    Post,
    "/messaging/providers/twilio",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("from"),
        Param::optional("accountSid"),
        Param::optional("authToken"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_TWILIO_PROVIDER: Operation = op(
    "update_twilio_provider",
    Patch,
    "/messaging/providers/twilio/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("accountSid"),
        Param::optional("authToken"),
        Param::optional("from"),
    ],
);

pub const CREATE_VONAGE_PROVIDER: Operation = op(
    "create_vonage_provider",
    Post,
    "/messaging/providers/vonage",
    &[
        Param::required("providerId"),
        Param::required("name"),
        Param::optional("from"),
        Param::optional("apiKey"),
        Param::optional("apiSecret"),
        Param::optional("enabled"),
    ],
);

pub const UPDATE_VONAGE_PROVIDER: Operation = op(
    "update_vonage_provider",
    Patch,
    "/messaging/providers/vonage/{providerId}",
    &[
        Param::path("providerId"),
        Param::optional("name"),
        Param::optional("enabled"),
        Param::optional("apiKey"),
        Param::optional("apiSecret"),
        Param::optional("from"),
    ],
);

pub const GET_PROVIDER: Operation = op(
    "get_provider",
    Get,
    "/messaging/providers/{providerId}",
    &[Param::path("providerId")],
);

pub const DELETE_PROVIDER: Operation = op(
    "delete_provider",
    Delete,
    "/messaging/providers/{providerId}",
    &[Param::path("providerId")],
);

pub const LIST_PROVIDER_LOGS: Operation = op(
    "list_provider_logs",
    Get,
    "/messaging/providers/{providerId}/logs",
    &[Param::path("providerId"), Param::optional("queries")],
);

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

pub const LIST_TOPICS: Operation = op(
    "list_topics",
    Get,
    "/messaging/topics",
    &[Param::optional("queries"), Param::optional("search")],
);

pub const CREATE_TOPIC: Operation = op(
    "create_topic",
    Post,
    "/messaging/topics",
    &[
        Param::required("topicId"),
        Param::required("name"),
        Param::optional("subscribe"),
    ],
);

pub const GET_TOPIC: Operation = op(
    "get_topic",
    Get,
    "/messaging/topics/{topicId}",
    &[Param::path("topicId")],
);

pub const UPDATE_TOPIC: Operation = op(
    "update_topic",
    Patch,
    "/messaging/topics/{topicId}",
    &[
        Param::path("topicId"),
        Param::optional("name"),
        Param::optional("subscribe"),
    ],
);

pub const DELETE_TOPIC: Operation = op(
    "delete_topic",
    Delete,
    "/messaging/topics/{topicId}",
    &[Param::path("topicId")],
);

pub const LIST_TOPIC_LOGS: Operation = op(
    "list_topic_logs",
    Get,
    "/messaging/topics/{topicId}/logs",
    &[Param::path("topicId"), Param::optional("queries")],
);

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

pub const LIST_SUBSCRIBERS: Operation = op(
    "list_subscribers",
    Get,
    "/messaging/topics/{topicId}/subscribers",
    &[
        Param::path("topicId"),
        Param::optional("queries"),
        Param::optional("search"),
    ],
);

pub const CREATE_SUBSCRIBER: Operation = op(
    "create_subscriber",
    Post,
    "/messaging/topics/{topicId}/subscribers",
    &[
        Param::path("topicId"),
        Param::required("subscriberId"),
        Param::required("targetId"),
    ],
);

pub const GET_SUBSCRIBER: Operation = op(
    "get_subscriber",
    Get,
    "/messaging/topics/{topicId}/subscribers/{subscriberId}",
    &[Param::path("topicId"), Param::path("subscriberId")],
);

pub const DELETE_SUBSCRIBER: Operation = op(
    "delete_subscriber",
    Delete,
    "/messaging/topics/{topicId}/subscribers/{subscriberId}",
    &[Param::path("topicId"), Param::path("subscriberId")],
);

pub const LIST_SUBSCRIBER_LOGS: Operation = op(
    "list_subscriber_logs",
    Get,
    "/messaging/subscribers/{subscriberId}/logs",
    &[Param::path("subscriberId"), Param::optional("queries")],
);

/// Every operation, grouped by resource.
pub static OPERATIONS: &[Operation] = &[
    LIST_MESSAGES,
    CREATE_EMAIL,
    UPDATE_EMAIL,
    CREATE_PUSH,
    UPDATE_PUSH,
    CREATE_SMS,
    UPDATE_SMS,
    GET_MESSAGE,
    DELETE_MESSAGE,
    LIST_MESSAGE_LOGS,
    LIST_TARGETS,
    LIST_PROVIDERS,
    CREATE_APNS_PROVIDER,
    UPDATE_APNS_PROVIDER,
    CREATE_FCM_PROVIDER,
    UPDATE_FCM_PROVIDER,
    CREATE_MAILGUN_PROVIDER,
    UPDATE_MAILGUN_PROVIDER,
    CREATE_MSG91_PROVIDER,
    UPDATE_MSG91_PROVIDER,
    CREATE_SENDGRID_PROVIDER,
    UPDATE_SENDGRID_PROVIDER,
    CREATE_SMTP_PROVIDER,
    UPDATE_SMTP_PROVIDER,
    CREATE_TELESIGN_PROVIDER,
    UPDATE_TELESIGN_PROVIDER,
    CREATE_TEXTMAGIC_PROVIDER,
    UPDATE_TEXTMAGIC_PROVIDER,
    CREATE_TWILIO_PROVIDER,
    UPDATE_TWILIO_PROVIDER,
    CREATE_VONAGE_PROVIDER,
    UPDATE_VONAGE_PROVIDER,
    GET_PROVIDER,
    DELETE_PROVIDER,
    LIST_PROVIDER_LOGS,
    LIST_TOPICS,
    CREATE_TOPIC,
    GET_TOPIC,
    UPDATE_TOPIC,
    DELETE_TOPIC,
    LIST_TOPIC_LOGS,
    LIST_SUBSCRIBERS,
    CREATE_SUBSCRIBER,
    GET_SUBSCRIBER,
    DELETE_SUBSCRIBER,
    LIST_SUBSCRIBER_LOGS,
];
