//! Typed operations over an injected transport.
//!
//! # Design
//! Every method is a thin adapter: required parameters arrive positionally,
//! optional ones in an options struct, and both are folded into [`Args`]
//! for the generic builder. Required parameters are `&str`, so the typed
//! surface cannot omit one; `invoke_named` is the untyped door where a
//! missing parameter is reported at runtime instead.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{Args, MessagingClient};
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::operations::{self, Operation};
use crate::options::{
    ApnsProviderOptions, CreateEmail, CreatePush, FcmProviderOptions, ListOptions,
    MailgunProviderOptions, Msg91ProviderOptions, ProviderUpdate, QueryOptions, Recipients,
    SendgridProviderOptions, SmtpProviderOptions, SmtpProviderUpdate, TelesignProviderOptions,
    TextmagicProviderOptions, TwilioProviderOptions, UpdateEmail, UpdatePush, UpdateSms,
    UpdateTopic, VonageProviderOptions,
};
use crate::types::{
    LogList, Message, MessageList, Provider, ProviderList, Subscriber, SubscriberList, TargetList,
    Topic, TopicList,
};

/// Messaging API bound to a transport.
///
/// Holds no mutable state; it is `Send + Sync` whenever `T` is, and calls may
/// run concurrently from any number of threads.
#[derive(Debug, Clone)]
pub struct Messaging<T> {
    client: MessagingClient,
    transport: T,
}

impl<T: Transport> Messaging<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            client: MessagingClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &MessagingClient {
        &self.client
    }

    /// Build, send and decode one operation.
    pub fn invoke<R: DeserializeOwned>(&self, op: &Operation, args: Args) -> Result<R, ApiError> {
        let request = self.client.build(op, &args)?;
        let response = self.dispatch(op, request)?;
        self.client.parse(op, response)
    }

    /// Invoke an operation by its table name, returning the raw JSON result.
    pub fn invoke_named(&self, name: &str, args: Args) -> Result<Value, ApiError> {
        let op = operations::find(name).ok_or_else(|| ApiError::UnknownOperation(name.to_string()))?;
        self.invoke(op, args)
    }

    fn invoke_empty(&self, op: &Operation, args: Args) -> Result<(), ApiError> {
        let request = self.client.build(op, &args)?;
        let response = self.dispatch(op, request)?;
        self.client.parse_empty(op, response)
    }

    fn dispatch(&self, op: &Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(
            operation = op.name,
            method = %request.method,
            url = %request.url,
            "dispatching request"
        );
        self.transport.call(request).map_err(ApiError::Transport)
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    pub fn list_messages(&self, options: &ListOptions) -> Result<MessageList, ApiError> {
        self.invoke(&operations::LIST_MESSAGES, Args::from_options(options)?)
    }

    pub fn create_email(
        &self,
        message_id: &str,
        subject: &str,
        content: &str,
        options: &CreateEmail,
    ) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?
            .with("messageId", message_id)
            .with("subject", subject)
            .with("content", content);
        self.invoke(&operations::CREATE_EMAIL, args)
    }

    pub fn update_email(&self, message_id: &str, options: &UpdateEmail) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?.with("messageId", message_id);
        self.invoke(&operations::UPDATE_EMAIL, args)
    }

    pub fn create_push(
        &self,
        message_id: &str,
        title: &str,
        body: &str,
        options: &CreatePush,
    ) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?
            .with("messageId", message_id)
            .with("title", title)
            .with("body", body);
        self.invoke(&operations::CREATE_PUSH, args)
    }

    pub fn update_push(&self, message_id: &str, options: &UpdatePush) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?.with("messageId", message_id);
        self.invoke(&operations::UPDATE_PUSH, args)
    }

    pub fn create_sms(
        &self,
        message_id: &str,
        content: &str,
        options: &Recipients,
    ) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?
            .with("messageId", message_id)
            .with("content", content);
        self.invoke(&operations::CREATE_SMS, args)
    }

    pub fn update_sms(&self, message_id: &str, options: &UpdateSms) -> Result<Message, ApiError> {
        let args = Args::from_options(options)?.with("messageId", message_id);
        self.invoke(&operations::UPDATE_SMS, args)
    }

    pub fn get_message(&self, message_id: &str) -> Result<Message, ApiError> {
        self.invoke(&operations::GET_MESSAGE, Args::new().with("messageId", message_id))
    }

    pub fn delete_message(&self, message_id: &str) -> Result<(), ApiError> {
        self.invoke_empty(&operations::DELETE_MESSAGE, Args::new().with("messageId", message_id))
    }

    pub fn list_message_logs(
        &self,
        message_id: &str,
        options: &QueryOptions,
    ) -> Result<LogList, ApiError> {
        let args = Args::from_options(options)?.with("messageId", message_id);
        self.invoke(&operations::LIST_MESSAGE_LOGS, args)
    }

    /// Targets a message was, or will be, delivered to.
    pub fn list_targets(&self, message_id: &str, options: &QueryOptions) -> Result<TargetList, ApiError> {
        let args = Args::from_options(options)?.with("messageId", message_id);
        self.invoke(&operations::LIST_TARGETS, args)
    }

    // -----------------------------------------------------------------------
    // Providers
    // -----------------------------------------------------------------------

    pub fn list_providers(&self, options: &ListOptions) -> Result<ProviderList, ApiError> {
        self.invoke(&operations::LIST_PROVIDERS, Args::from_options(options)?)
    }

    fn create_provider<O: Serialize>(
        &self,
        op: &Operation,
        provider_id: &str,
        name: &str,
        options: &O,
    ) -> Result<Provider, ApiError> {
        let args = Args::from_options(options)?
            .with("providerId", provider_id)
            .with("name", name);
        self.invoke(op, args)
    }

    fn update_provider<O: Serialize>(
        &self,
        op: &Operation,
        provider_id: &str,
        update: &O,
    ) -> Result<Provider, ApiError> {
        let args = Args::from_options(update)?.with("providerId", provider_id);
        self.invoke(op, args)
    }

    pub fn create_apns_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &ApnsProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_APNS_PROVIDER, provider_id, name, options)
    }

    pub fn update_apns_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<ApnsProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_APNS_PROVIDER, provider_id, update)
    }

    pub fn create_fcm_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &FcmProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_FCM_PROVIDER, provider_id, name, options)
    }

    pub fn update_fcm_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<FcmProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_FCM_PROVIDER, provider_id, update)
    }

    pub fn create_mailgun_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &MailgunProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_MAILGUN_PROVIDER, provider_id, name, options)
    }

    pub fn update_mailgun_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<MailgunProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_MAILGUN_PROVIDER, provider_id, update)
    }

    pub fn create_msg91_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &Msg91ProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_MSG91_PROVIDER, provider_id, name, options)
    }

    pub fn update_msg91_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<Msg91ProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_MSG91_PROVIDER, provider_id, update)
    }

    pub fn create_sendgrid_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &SendgridProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_SENDGRID_PROVIDER, provider_id, name, options)
    }

    pub fn update_sendgrid_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<SendgridProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_SENDGRID_PROVIDER, provider_id, update)
    }

    pub fn create_smtp_provider(
        &self,
        provider_id: &str,
        name: &str,
        host: &str,
        options: &SmtpProviderOptions,
    ) -> Result<Provider, ApiError> {
        let args = Args::from_options(options)?
            .with("providerId", provider_id)
            .with("name", name)
            .with("host", host);
        self.invoke(&operations::CREATE_SMTP_PROVIDER, args)
    }

    pub fn update_smtp_provider(
        &self,
        provider_id: &str,
        update: &SmtpProviderUpdate,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_SMTP_PROVIDER, provider_id, update)
    }

    pub fn create_telesign_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &TelesignProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_TELESIGN_PROVIDER, provider_id, name, options)
    }

    pub fn update_telesign_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<TelesignProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_TELESIGN_PROVIDER, provider_id, update)
    }

    pub fn create_textmagic_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &TextmagicProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_TEXTMAGIC_PROVIDER, provider_id, name, options)
    }

    pub fn update_textmagic_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<TextmagicProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_TEXTMAGIC_PROVIDER, provider_id, update)
    }

    pub fn create_twilio_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &TwilioProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_TWILIO_PROVIDER, provider_id, name, options)
    }

    pub fn update_twilio_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<TwilioProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_TWILIO_PROVIDER, provider_id, update)
    }

    pub fn create_vonage_provider(
        &self,
        provider_id: &str,
        name: &str,
        options: &VonageProviderOptions,
    ) -> Result<Provider, ApiError> {
        self.create_provider(&operations::CREATE_VONAGE_PROVIDER, provider_id, name, options)
    }

    pub fn update_vonage_provider(
        &self,
        provider_id: &str,
        update: &ProviderUpdate<VonageProviderOptions>,
    ) -> Result<Provider, ApiError> {
        self.update_provider(&operations::UPDATE_VONAGE_PROVIDER, provider_id, update)
    }

    pub fn get_provider(&self, provider_id: &str) -> Result<Provider, ApiError> {
        self.invoke(&operations::GET_PROVIDER, Args::new().with("providerId", provider_id))
    }

    pub fn delete_provider(&self, provider_id: &str) -> Result<(), ApiError> {
        self.invoke_empty(&operations::DELETE_PROVIDER, Args::new().with("providerId", provider_id))
    }

    pub fn list_provider_logs(
        &self,
        provider_id: &str,
        options: &QueryOptions,
    ) -> Result<LogList, ApiError> {
        let args = Args::from_options(options)?.with("providerId", provider_id);
        self.invoke(&operations::LIST_PROVIDER_LOGS, args)
    }

    // -----------------------------------------------------------------------
    // Topics
    // -----------------------------------------------------------------------

    pub fn list_topics(&self, options: &ListOptions) -> Result<TopicList, ApiError> {
        self.invoke(&operations::LIST_TOPICS, Args::from_options(options)?)
    }

    /// `subscribe` lists the roles allowed to subscribe to the topic.
    pub fn create_topic(
        &self,
        topic_id: &str,
        name: &str,
        subscribe: Option<Vec<String>>,
    ) -> Result<Topic, ApiError> {
        let mut args = Args::new().with("topicId", topic_id).with("name", name);
        if let Some(roles) = subscribe {
            args.set("subscribe", roles);
        }
        self.invoke(&operations::CREATE_TOPIC, args)
    }

    pub fn get_topic(&self, topic_id: &str) -> Result<Topic, ApiError> {
        self.invoke(&operations::GET_TOPIC, Args::new().with("topicId", topic_id))
    }

    pub fn update_topic(&self, topic_id: &str, update: &UpdateTopic) -> Result<Topic, ApiError> {
        let args = Args::from_options(update)?.with("topicId", topic_id);
        self.invoke(&operations::UPDATE_TOPIC, args)
    }

    pub fn delete_topic(&self, topic_id: &str) -> Result<(), ApiError> {
        self.invoke_empty(&operations::DELETE_TOPIC, Args::new().with("topicId", topic_id))
    }

    pub fn list_topic_logs(&self, topic_id: &str, options: &QueryOptions) -> Result<LogList, ApiError> {
        let args = Args::from_options(options)?.with("topicId", topic_id);
        self.invoke(&operations::LIST_TOPIC_LOGS, args)
    }

    // -----------------------------------------------------------------------
    // Subscribers
    // -----------------------------------------------------------------------

    pub fn list_subscribers(
        &self,
        topic_id: &str,
        options: &ListOptions,
    ) -> Result<SubscriberList, ApiError> {
        let args = Args::from_options(options)?.with("topicId", topic_id);
        self.invoke(&operations::LIST_SUBSCRIBERS, args)
    }

    pub fn create_subscriber(
        &self,
        topic_id: &str,
        subscriber_id: &str,
        target_id: &str,
    ) -> Result<Subscriber, ApiError> {
        let args = Args::new()
            .with("topicId", topic_id)
            .with("subscriberId", subscriber_id)
            .with("targetId", target_id);
        self.invoke(&operations::CREATE_SUBSCRIBER, args)
    }

    pub fn get_subscriber(&self, topic_id: &str, subscriber_id: &str) -> Result<Subscriber, ApiError> {
        let args = Args::new()
            .with("topicId", topic_id)
            .with("subscriberId", subscriber_id);
        self.invoke(&operations::GET_SUBSCRIBER, args)
    }

    pub fn delete_subscriber(&self, topic_id: &str, subscriber_id: &str) -> Result<(), ApiError> {
        let args = Args::new()
            .with("topicId", topic_id)
            .with("subscriberId", subscriber_id);
        self.invoke_empty(&operations::DELETE_SUBSCRIBER, args)
    }

    pub fn list_subscriber_logs(
        &self,
        subscriber_id: &str,
        options: &QueryOptions,
    ) -> Result<LogList, ApiError> {
        let args = Args::from_options(options)?.with("subscriberId", subscriber_id);
        self.invoke(&operations::LIST_SUBSCRIBER_LOGS, args)
    }
}
