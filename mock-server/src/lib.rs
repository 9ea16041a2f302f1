//! In-memory stand-in for the messaging HTTP API.
//!
//! Serves the same routes as the real service under `/v1`, keeps every
//! resource as a JSON document in process memory, and returns the service's
//! document shapes and status codes (201 on create, 204 on delete, 404 and
//! 409 with a JSON error body). Nothing is delivered; logs are always empty.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Resource collections, each keyed by `$id` in insertion order.
#[derive(Debug, Default)]
pub struct Store {
    pub messages: Map<String, Value>,
    pub providers: Map<String, Value>,
    pub topics: Map<String, Value>,
    pub subscribers: Map<String, Value>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, Failure>;
type Document = Map<String, Value>;

const MESSAGE_KINDS: &[&str] = &["email", "push", "sms"];

/// Fields a message document keeps at the top level; the rest go to `data`.
const MESSAGE_ENVELOPE: &[&str] = &["messageId", "topics", "users", "targets", "scheduledAt", "draft"];

/// Provider fields reported under `options`; everything else is a credential.
const PROVIDER_OPTIONS: &[&str] = &[
    "from",
    "fromName",
    "fromEmail",
    "replyToName",
    "replyToEmail",
    "sandbox",
    "encryption",
    "autoTLS",
    "mailer",
    "isEuRegion",
    "senderId",
    "templateId",
];

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with_store(db: Db) -> Router {
    let api = Router::new()
        .route("/messaging/messages", get(list_messages))
        .route(
            "/messaging/messages/{id}",
            get(get_message).post(create_message).delete(delete_message),
        )
        .route("/messaging/messages/{id}/logs", get(list_logs))
        .route("/messaging/messages/{id}/targets", get(list_targets))
        .route("/messaging/messages/{id}/{message_id}", patch(update_message))
        .route("/messaging/providers", get(list_providers))
        .route(
            "/messaging/providers/{id}",
            get(get_provider).post(create_provider).delete(delete_provider),
        )
        .route("/messaging/providers/{id}/logs", get(list_logs))
        .route("/messaging/providers/{id}/{provider_id}", patch(update_provider))
        .route("/messaging/topics", get(list_topics).post(create_topic))
        .route(
            "/messaging/topics/{topic_id}",
            get(get_topic).patch(update_topic).delete(delete_topic),
        )
        .route("/messaging/topics/{topic_id}/logs", get(list_logs))
        .route(
            "/messaging/topics/{topic_id}/subscribers",
            get(list_subscribers).post(create_subscriber),
        )
        .route(
            "/messaging/topics/{topic_id}/subscribers/{subscriber_id}",
            get(get_subscriber).delete(delete_subscriber),
        )
        .route("/messaging/subscribers/{subscriber_id}/logs", get(list_logs))
        .with_state(db);
    Router::new().nest("/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, kind: &str, message: String) -> Failure {
    (
        status,
        Json(json!({
            "message": message,
            "code": status.as_u16(),
            "type": kind,
        })),
    )
}

fn not_found(resource: &str) -> Failure {
    failure(
        StatusCode::NOT_FOUND,
        &format!("{resource}_not_found"),
        format!("{resource} with the requested ID could not be found."),
    )
}

fn bad_request(message: String) -> Failure {
    failure(StatusCode::BAD_REQUEST, "general_argument_invalid", message)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Resolve a client-supplied ID; `unique()` asks the server to generate one.
fn resolve_id(input: &mut Document, key: &str) -> ApiResult<String> {
    match input.remove(key) {
        Some(Value::String(id)) if id == "unique()" => Ok(Uuid::new_v4().simple().to_string()),
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        _ => Err(bad_request(format!("Param \"{key}\" is not optional."))),
    }
}

fn insert_new(collection: &mut Document, resource: &str, id: String, doc: Document) -> ApiResult<Value> {
    if collection.contains_key(&id) {
        return Err(failure(
            StatusCode::CONFLICT,
            &format!("{resource}_already_exists"),
            format!("A {resource} with the requested ID already exists."),
        ));
    }
    let doc = Value::Object(doc);
    collection.insert(id, doc.clone());
    Ok(doc)
}

fn base_document(id: &str) -> Document {
    let stamp = now();
    let mut doc = Document::new();
    doc.insert("$id".to_string(), json!(id));
    doc.insert("$createdAt".to_string(), json!(stamp));
    doc.insert("$updatedAt".to_string(), json!(stamp));
    doc
}

fn touch(doc: &mut Value) {
    doc["$updatedAt"] = json!(now());
}

fn matches_search(doc: &Value, params: &HashMap<String, String>) -> bool {
    let Some(term) = params.get("search") else {
        return true;
    };
    let term = term.to_lowercase();
    ["$id", "name"].iter().any(|field| {
        doc[field]
            .as_str()
            .is_some_and(|value| value.to_lowercase().contains(&term))
    })
}

fn list(key: &str, items: Vec<Value>) -> Json<Value> {
    Json(json!({ "total": items.len(), key: items }))
}

// --- messages ---

async fn list_messages(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    let items = store
        .messages
        .values()
        .filter(|doc| matches_search(doc, &params))
        .cloned()
        .collect();
    list("messages", items)
}

fn message_status(input: &Document) -> &'static str {
    if input.get("draft").and_then(Value::as_bool) == Some(true) {
        "draft"
    } else if input.get("scheduledAt").is_some_and(|v| !v.is_null()) {
        "scheduled"
    } else {
        "processing"
    }
}

async fn create_message(
    State(db): State<Db>,
    Path(kind): Path<String>,
    Json(mut input): Json<Document>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if !MESSAGE_KINDS.contains(&kind.as_str()) {
        return Err(not_found("route"));
    }
    let id = resolve_id(&mut input, "messageId")?;
    let mut doc = base_document(&id);
    doc.insert("providerType".to_string(), json!(kind));
    for field in ["topics", "users", "targets"] {
        doc.insert(field.to_string(), input.get(field).cloned().unwrap_or(json!([])));
    }
    doc.insert(
        "scheduledAt".to_string(),
        input.get("scheduledAt").cloned().unwrap_or(Value::Null),
    );
    doc.insert("deliveredAt".to_string(), Value::Null);
    doc.insert("deliveryErrors".to_string(), json!([]));
    doc.insert("deliveredTotal".to_string(), json!(0));
    let data: Document = input
        .iter()
        .filter(|(key, _)| !MESSAGE_ENVELOPE.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    doc.insert("data".to_string(), Value::Object(data));
    doc.insert("status".to_string(), json!(message_status(&input)));

    let mut store = db.write().await;
    let created = insert_new(&mut store.messages, "message", id, doc)?;
    tracing::debug!(kind = %kind, id = %created["$id"], "message created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_message(
    State(db): State<Db>,
    Path((kind, id)): Path<(String, String)>,
    Json(input): Json<Document>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let doc = store.messages.get_mut(&id).ok_or_else(|| not_found("message"))?;
    if doc["providerType"] != json!(kind) {
        return Err(bad_request(format!("Message type is not {kind}.")));
    }
    for (key, value) in &input {
        if MESSAGE_ENVELOPE.contains(&key.as_str()) {
            doc[key.as_str()] = value.clone();
        } else {
            doc["data"][key.as_str()] = value.clone();
        }
    }
    if input.contains_key("draft") || input.contains_key("scheduledAt") {
        let mut state = Document::new();
        state.insert("draft".to_string(), input.get("draft").cloned().unwrap_or(json!(false)));
        state.insert("scheduledAt".to_string(), doc["scheduledAt"].clone());
        doc["status"] = json!(message_status(&state));
    }
    if let Some(envelope) = doc.as_object_mut() {
        envelope.remove("draft");
    }
    touch(doc);
    Ok(Json(doc.clone()))
}

async fn get_message(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.messages.get(&id).cloned().map(Json).ok_or_else(|| not_found("message"))
}

async fn delete_message(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .messages
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("message"))
}

async fn list_targets(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let message = store.messages.get(&id).ok_or_else(|| not_found("message"))?;
    let provider_type = message["providerType"].clone();
    let targets = message["targets"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(|target_id| target_document(target_id, &provider_type))
                .collect()
        })
        .unwrap_or_default();
    Ok(list("targets", targets))
}

fn target_document(id: &str, provider_type: &Value) -> Value {
    let mut doc = base_document(id);
    doc.insert("name".to_string(), json!(""));
    doc.insert("userId".to_string(), json!(""));
    doc.insert("providerId".to_string(), Value::Null);
    doc.insert("providerType".to_string(), provider_type.clone());
    doc.insert("identifier".to_string(), json!(id));
    doc.insert("expired".to_string(), json!(false));
    Value::Object(doc)
}

async fn list_logs() -> Json<Value> {
    list("logs", Vec::new())
}

// --- providers ---

fn channel_of(vendor: &str) -> Option<&'static str> {
    match vendor {
        "mailgun" | "sendgrid" | "smtp" => Some("email"),
        "msg91" | "telesign" | "textmagic" | "twilio" | "vonage" => Some("sms"),
        "apns" | "fcm" => Some("push"),
        _ => None,
    }
}

fn apply_provider_fields(doc: &mut Value, input: &Document) {
    for (key, value) in input {
        match key.as_str() {
            "name" | "enabled" => doc[key.as_str()] = value.clone(),
            field if PROVIDER_OPTIONS.contains(&field) => doc["options"][field] = value.clone(),
            field => doc["credentials"][field] = value.clone(),
        }
    }
}

async fn list_providers(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    let items = store
        .providers
        .values()
        .filter(|doc| matches_search(doc, &params))
        .cloned()
        .collect();
    list("providers", items)
}

async fn create_provider(
    State(db): State<Db>,
    Path(vendor): Path<String>,
    Json(mut input): Json<Document>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let channel = channel_of(&vendor).ok_or_else(|| not_found("route"))?;
    let id = resolve_id(&mut input, "providerId")?;
    if !input.get("name").is_some_and(Value::is_string) {
        return Err(bad_request("Param \"name\" is not optional.".to_string()));
    }
    let mut doc = Value::Object(base_document(&id));
    doc["provider"] = json!(vendor);
    doc["type"] = json!(channel);
    doc["enabled"] = json!(true);
    doc["credentials"] = json!({});
    doc["options"] = json!({});
    apply_provider_fields(&mut doc, &input);

    let doc = doc.as_object().cloned().unwrap_or_default();
    let mut store = db.write().await;
    let created = insert_new(&mut store.providers, "provider", id, doc)?;
    tracing::debug!(vendor = %vendor, id = %created["$id"], "provider created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_provider(
    State(db): State<Db>,
    Path((vendor, id)): Path<(String, String)>,
    Json(input): Json<Document>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let doc = store.providers.get_mut(&id).ok_or_else(|| not_found("provider"))?;
    if doc["provider"] != json!(vendor) {
        return Err(bad_request(format!("Provider is not {vendor}.")));
    }
    apply_provider_fields(doc, &input);
    touch(doc);
    Ok(Json(doc.clone()))
}

async fn get_provider(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.providers.get(&id).cloned().map(Json).ok_or_else(|| not_found("provider"))
}

async fn delete_provider(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .providers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("provider"))
}

// --- topics ---

async fn list_topics(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    let items = store
        .topics
        .values()
        .filter(|doc| matches_search(doc, &params))
        .cloned()
        .collect();
    list("topics", items)
}

async fn create_topic(
    State(db): State<Db>,
    Json(mut input): Json<Document>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = resolve_id(&mut input, "topicId")?;
    let Some(name) = input.get("name").filter(|v| v.is_string()).cloned() else {
        return Err(bad_request("Param \"name\" is not optional.".to_string()));
    };
    let mut doc = base_document(&id);
    doc.insert("name".to_string(), name);
    doc.insert("emailTotal".to_string(), json!(0));
    doc.insert("smsTotal".to_string(), json!(0));
    doc.insert("pushTotal".to_string(), json!(0));
    doc.insert(
        "subscribe".to_string(),
        input.get("subscribe").cloned().unwrap_or(json!([])),
    );

    let mut store = db.write().await;
    let created = insert_new(&mut store.topics, "topic", id, doc)?;
    tracing::debug!(id = %created["$id"], "topic created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_topic(State(db): State<Db>, Path(topic_id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.topics.get(&topic_id).cloned().map(Json).ok_or_else(|| not_found("topic"))
}

async fn update_topic(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(input): Json<Document>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let doc = store.topics.get_mut(&topic_id).ok_or_else(|| not_found("topic"))?;
    for field in ["name", "subscribe"] {
        if let Some(value) = input.get(field) {
            doc[field] = value.clone();
        }
    }
    touch(doc);
    Ok(Json(doc.clone()))
}

async fn delete_topic(State(db): State<Db>, Path(topic_id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.topics.remove(&topic_id).ok_or_else(|| not_found("topic"))?;
    store
        .subscribers
        .retain(|_, subscriber| subscriber["topicId"] != json!(topic_id));
    Ok(StatusCode::NO_CONTENT)
}

// --- subscribers ---

async fn list_subscribers(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    if !store.topics.contains_key(&topic_id) {
        return Err(not_found("topic"));
    }
    let items = store
        .subscribers
        .values()
        .filter(|doc| doc["topicId"] == json!(topic_id) && matches_search(doc, &params))
        .cloned()
        .collect();
    Ok(list("subscribers", items))
}

async fn create_subscriber(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(mut input): Json<Document>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = resolve_id(&mut input, "subscriberId")?;
    let target_id = resolve_id(&mut input, "targetId")?;
    let provider_type = json!("email");

    let mut store = db.write().await;
    let total = store
        .topics
        .get(&topic_id)
        .ok_or_else(|| not_found("topic"))?["emailTotal"]
        .as_u64()
        .unwrap_or(0);
    let mut doc = base_document(&id);
    doc.insert("targetId".to_string(), json!(target_id));
    doc.insert("target".to_string(), target_document(&target_id, &provider_type));
    doc.insert("userId".to_string(), json!(""));
    doc.insert("userName".to_string(), json!(""));
    doc.insert("topicId".to_string(), json!(topic_id));
    doc.insert("providerType".to_string(), provider_type);

    let created = insert_new(&mut store.subscribers, "subscriber", id, doc)?;
    if let Some(topic) = store.topics.get_mut(&topic_id) {
        topic["emailTotal"] = json!(total + 1);
    }
    tracing::debug!(topic = %topic_id, id = %created["$id"], "subscriber created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_subscriber(
    State(db): State<Db>,
    Path((topic_id, subscriber_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store
        .subscribers
        .get(&subscriber_id)
        .filter(|doc| doc["topicId"] == json!(topic_id))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("subscriber"))
}

async fn delete_subscriber(
    State(db): State<Db>,
    Path((topic_id, subscriber_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let belongs = store
        .subscribers
        .get(&subscriber_id)
        .is_some_and(|doc| doc["topicId"] == json!(topic_id));
    if !belongs {
        return Err(not_found("subscriber"));
    }
    store.subscribers.remove(&subscriber_id);
    if let Some(topic) = store.topics.get_mut(&topic_id) {
        let total = topic["emailTotal"].as_u64().unwrap_or(0);
        topic["emailTotal"] = json!(total.saturating_sub(1));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn unique_id_is_generated() {
        let mut doc = input(json!({"topicId": "unique()"}));
        let id = resolve_id(&mut doc, "topicId").unwrap();
        assert_eq!(id.len(), 32);
        assert!(!doc.contains_key("topicId"));
    }

    #[test]
    fn explicit_id_is_kept() {
        let mut doc = input(json!({"topicId": "news"}));
        assert_eq!(resolve_id(&mut doc, "topicId").unwrap(), "news");
    }

    #[test]
    fn missing_id_is_bad_request() {
        let mut doc = input(json!({"name": "News"}));
        let (status, Json(body)) = resolve_id(&mut doc, "topicId").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Param \"topicId\" is not optional.");
    }

    #[test]
    fn duplicate_insert_conflicts() {
        let mut collection = Document::new();
        insert_new(&mut collection, "topic", "t1".to_string(), base_document("t1")).unwrap();
        let (status, Json(body)) =
            insert_new(&mut collection, "topic", "t1".to_string(), base_document("t1")).unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["type"], "topic_already_exists");
    }

    #[test]
    fn message_status_follows_draft_then_schedule() {
        assert_eq!(message_status(&input(json!({"draft": true}))), "draft");
        assert_eq!(
            message_status(&input(json!({"scheduledAt": "2030-01-01T00:00:00Z"}))),
            "scheduled"
        );
        assert_eq!(message_status(&input(json!({}))), "processing");
    }

    #[test]
    fn provider_fields_split_into_options_and_credentials() {
        let mut doc = json!({"credentials": {}, "options": {}});
        apply_provider_fields(
            &mut doc,
            &input(json!({"name": "Mail", "apiKey": "k", "fromEmail": "a@b.c", "enabled": false})),
        );
        assert_eq!(doc["name"], "Mail");
        assert_eq!(doc["enabled"], false);
        assert_eq!(doc["credentials"], json!({"apiKey": "k"}));
        assert_eq!(doc["options"], json!({"fromEmail": "a@b.c"}));
    }

    #[test]
    fn vendors_map_to_channels() {
        assert_eq!(channel_of("smtp"), Some("email"));
        assert_eq!(channel_of("vonage"), Some("sms"));
        assert_eq!(channel_of("fcm"), Some("push"));
        assert_eq!(channel_of("pigeon"), None);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let doc = json!({"$id": "t1", "name": "Weekly News"});
        let mut params = HashMap::new();
        assert!(matches_search(&doc, &params));
        params.insert("search".to_string(), "news".to_string());
        assert!(matches_search(&doc, &params));
        params.insert("search".to_string(), "sports".to_string());
        assert!(!matches_search(&doc, &params));
    }
}
