//! Stateless request builder and response parser for the messaging API.
//!
//! # Design
//! `MessagingClient` holds only the configured endpoint and carries no
//! mutable state between calls. `build` turns an [`Operation`] plus its
//! [`Args`] into an `HttpRequest`; `parse` consumes the matching
//! `HttpResponse`. Nothing here touches the network, so the same pair can be
//! driven by `Messaging` over an injected transport or by a caller doing its
//! own I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Payload};
use crate::operations::Operation;

/// Named arguments for one invocation.
///
/// A name mapped to JSON `null` is treated the same as an absent name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Map<String, Value>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the set fields of an options struct.
    pub fn from_options<S: Serialize>(options: &S) -> Result<Self, ApiError> {
        match serde_json::to_value(options) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(Value::Null) => Ok(Self::new()),
            Ok(other) => Err(ApiError::SerializationError(format!(
                "options must serialize to an object, got {other}"
            ))),
            Err(e) => Err(ApiError::SerializationError(e.to_string())),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }
}

impl From<Map<String, Value>> for Args {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Synchronous, stateless request builder for the messaging API.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    endpoint: String,
}

impl MessagingClient {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate `args` against `op` and produce the request to send.
    ///
    /// Required parameters are checked in declaration order before anything
    /// else; the first absent one is reported as `MissingParameter`.
    pub fn build(&self, op: &Operation, args: &Args) -> Result<HttpRequest, ApiError> {
        if let Some(missing) = op.required().find(|param| args.get(param.name).is_none()) {
            tracing::debug!(
                operation = op.name,
                parameter = missing.name,
                "missing required parameter"
            );
            return Err(ApiError::MissingParameter(missing.name));
        }

        let path = resolve_path(op.path, args)?;

        let mut payload = Payload::new();
        for field in op.payload_fields() {
            if let Some(value) = args.get(field.name) {
                payload.insert(field.name.to_string(), value.clone());
            }
        }

        Ok(HttpRequest {
            method: op.method,
            url: format!("{}{path}", self.endpoint),
            headers: op
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            payload,
        })
    }

    /// Decode a successful response into `R`. An empty body decodes as JSON
    /// `null`.
    pub fn parse<R: DeserializeOwned>(
        &self,
        op: &Operation,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        check_status(op, &response)?;
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Accept any successful response and discard its body.
    pub fn parse_empty(&self, op: &Operation, response: HttpResponse) -> Result<(), ApiError> {
        check_status(op, &response)
    }
}

/// Substitute every `{name}` placeholder exactly once. Substituted values are
/// never rescanned, so an argument containing braces is inserted verbatim.
fn resolve_path(template: &'static str, args: &Args) -> Result<String, ApiError> {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        let value = args.get(name).ok_or(ApiError::MissingParameter(name))?;
        resolved.push_str(&rest[..start]);
        match value {
            Value::String(s) => resolved.push_str(s),
            other => resolved.push_str(&other.to_string()),
        }
        rest = &rest[start + len + 1..];
    }
    resolved.push_str(rest);
    Ok(resolved)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(op: &Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    tracing::warn!(operation = op.name, status = response.status, "request failed");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
