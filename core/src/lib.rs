//! Client binding for the messaging service's HTTP API.
//!
//! # Overview
//! Covers messages (email, push, SMS), delivery providers, topics and
//! topic subscribers. Every operation maps typed parameters onto exactly one
//! HTTP request; the network round-trip is delegated to a caller-supplied
//! [`Transport`].
//!
//! # Design
//! - [`operations`] is a static table describing each endpoint: method,
//!   path template, and ordered parameters.
//! - [`MessagingClient`] is the generic, stateless builder. It validates
//!   required parameters, substitutes path placeholders, assembles the
//!   payload, and decodes responses. It never performs I/O.
//! - [`Messaging`] pairs the builder with a transport and exposes one typed
//!   method per operation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use messaging_core::{Config, HttpRequest, HttpResponse, Messaging, Transport, TransportError};
//!
//! struct MyTransport;
//!
//! impl Transport for MyTransport {
//!     fn call(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
//!         unimplemented!("send {} {}", request.method, request.url)
//!     }
//! }
//!
//! # fn main() -> Result<(), messaging_core::ApiError> {
//! let api = Messaging::new(&Config::new("https://cloud.example.com/v1")?, MyTransport);
//! let topic = api.create_topic("news", "News", None)?;
//! println!("created {}", topic.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod messaging;
pub mod operations;
pub mod options;
pub mod types;

pub use client::{Args, MessagingClient};
pub use config::Config;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Payload, Transport, TransportError};
pub use messaging::Messaging;
pub use operations::{Operation, Param, ParamKind, OPERATIONS};
pub use types::{
    Log, LogList, Message, MessageList, Provider, ProviderList, SmtpEncryption, Subscriber,
    SubscriberList, Target, TargetList, Topic, TopicList,
};
