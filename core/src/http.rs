//! HTTP transport types and the transport seam.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and decodes `HttpResponse` values; the
//! actual network round-trip is performed by whatever implements
//! [`Transport`]. Keeping the seam this narrow lets the same builder run over
//! ureq, reqwest, a recording stub in tests, or a host language's HTTP stack.
//!
//! Reads (`GET`/`DELETE`) carry their payload as query parameters and writes
//! (`POST`/`PATCH`) as a JSON body. Deciding which applies is the transport's
//! job; `query_string` and `json_body` do the encoding for it.

use std::fmt;

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Ordered name to value mapping sent with a request.
pub type Payload = Map<String, Value>;

/// Error type any transport may return. Carried verbatim by
/// `ApiError::Transport`.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the payload travels in the request body rather than the query.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `MessagingClient::build`. `url` is the configured endpoint joined
/// with the operation's resolved path, without a query string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub payload: Payload,
}

impl HttpRequest {
    /// Flatten the payload into a form-urlencoded query string.
    ///
    /// Arrays become `key[0]=a&key[1]=b` and objects `key[field]=v`, nested
    /// as deep as the value goes. Returns an empty string for an empty
    /// payload.
    pub fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.payload {
            flatten(key.clone(), value, &mut pairs);
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// The URL with the payload appended as a query string, if any.
    pub fn url_with_query(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{query}", self.url)
        }
    }

    /// The payload serialized as a JSON object.
    pub fn json_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.payload)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn flatten(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(format!("{prefix}[{field}]"), item, out);
            }
        }
        other => out.push((prefix, other.to_string())),
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a [`Transport`] after executing an `HttpRequest`, then handed
/// to `MessagingClient::parse` for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes requests against the network.
///
/// Implementations own connection handling, TLS, timeouts and retries. A
/// failure to obtain any response at all is reported as `Err`; non-2xx
/// statuses should be returned as an `HttpResponse` so the client can map
/// them.
pub trait Transport {
    fn call(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).call(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn call(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).call(request)
    }
}
