//! Lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the typed client
//! over real HTTP through a ureq-backed `Transport`. Validates that request
//! building and response parsing agree with the server end-to-end.

use messaging_core::options::{
    CreateEmail, ListOptions, QueryOptions, Recipients, SendgridProviderOptions, Sender,
    SmtpProviderOptions, SmtpProviderUpdate, UpdateEmail, UpdateTopic,
};
use messaging_core::{
    operations, ApiError, Args, Config, HttpMethod, HttpRequest, HttpResponse, Messaging,
    Operation, Param, SmtpEncryption, Transport, TransportError,
};

/// Executes requests with ureq.
///
/// ureq's status-as-error behavior is disabled so 4xx/5xx responses come
/// back as data and the client does the status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn call(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = req.url_with_query();
        let mut response = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &req.headers).call()?,
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &req.headers).call()?,
            HttpMethod::Post => with_headers(self.agent.post(&req.url), &req.headers)
                .send(req.json_body()?.as_bytes())?,
            HttpMethod::Patch => with_headers(self.agent.patch(&req.url), &req.headers)
                .send(req.json_body()?.as_bytes())?,
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Attach the operation's headers; the transport adds none of its own.
fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Start the mock server on a random port and return its `/v1` endpoint.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
    });

    format!("http://{addr}/v1")
}

fn connect() -> Messaging<UreqTransport> {
    let config = Config::new(&start_server()).unwrap();
    Messaging::new(&config, UreqTransport::new())
}

#[test]
fn topic_and_subscriber_lifecycle() {
    let api = connect();

    // Step 1: empty to start.
    assert_eq!(api.list_topics(&ListOptions::default()).unwrap().total, 0);

    // Step 2: create, with the server generating the ID.
    let topic = api
        .create_topic("unique()", "Weekly News", Some(vec!["users".to_string()]))
        .unwrap();
    assert_ne!(topic.id, "unique()");
    assert_eq!(topic.name, "Weekly News");
    assert_eq!(topic.subscribe, vec!["users"]);
    assert_eq!(topic.email_total, 0);

    // Step 3: search finds it by name.
    let found = api.list_topics(&ListOptions::search("weekly")).unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.topics[0].id, topic.id);
    assert_eq!(api.list_topics(&ListOptions::search("sports")).unwrap().total, 0);

    // Step 4: subscribe a target.
    let subscriber = api.create_subscriber(&topic.id, "sub-1", "target-1").unwrap();
    assert_eq!(subscriber.id, "sub-1");
    assert_eq!(subscriber.topic_id, topic.id);
    assert_eq!(subscriber.target.as_ref().map(|t| t.id.as_str()), Some("target-1"));
    assert_eq!(api.get_topic(&topic.id).unwrap().email_total, 1);

    let listed = api.list_subscribers(&topic.id, &ListOptions::default()).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(
        api.get_subscriber(&topic.id, "sub-1").unwrap().target_id,
        "target-1"
    );

    // Step 5: rename.
    let renamed = api
        .update_topic(
            &topic.id,
            &UpdateTopic {
                name: Some("Headlines".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Headlines");
    assert_eq!(renamed.subscribe, vec!["users"]);

    // Step 6: logs decode even when empty.
    let logs = api
        .list_subscriber_logs(
            "sub-1",
            &QueryOptions {
                queries: Some(vec!["limit(5)".to_string()]),
            },
        )
        .unwrap();
    assert_eq!(logs.total, 0);
    assert!(api.list_topic_logs(&topic.id, &QueryOptions::default()).unwrap().logs.is_empty());

    // Step 7: tear down.
    api.delete_subscriber(&topic.id, "sub-1").unwrap();
    assert!(matches!(
        api.get_subscriber(&topic.id, "sub-1"),
        Err(ApiError::NotFound)
    ));
    api.delete_topic(&topic.id).unwrap();
    assert!(matches!(api.get_topic(&topic.id), Err(ApiError::NotFound)));
    assert!(matches!(api.delete_topic(&topic.id), Err(ApiError::NotFound)));
}

#[test]
fn duplicate_topic_is_http_error() {
    let api = connect();
    api.create_topic("news", "News", None).unwrap();

    match api.create_topic("news", "News again", None) {
        Err(ApiError::HttpError { status, body }) => {
            assert_eq!(status, 409);
            assert!(body.contains("topic_already_exists"), "{body}");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn provider_lifecycle() {
    let api = connect();

    let sendgrid = api
        .create_sendgrid_provider(
            "sg",
            "SendGrid",
            &SendgridProviderOptions {
                api_key: Some("secret".to_string()),
                sender: Sender {
                    from_email: Some("news@example.com".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(sendgrid.provider, "sendgrid");
    assert_eq!(sendgrid.kind, "email");
    assert!(sendgrid.enabled);
    assert_eq!(sendgrid.credentials["apiKey"], "secret");
    assert_eq!(sendgrid.options["fromEmail"], "news@example.com");

    let smtp = api
        .create_smtp_provider(
            "mail",
            "Mail relay",
            "smtp.example.com",
            &SmtpProviderOptions {
                port: Some(587),
                encryption: Some(SmtpEncryption::Tls),
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!smtp.enabled);
    assert_eq!(smtp.credentials["host"], "smtp.example.com");
    assert_eq!(smtp.credentials["port"], 587);
    assert_eq!(smtp.options["encryption"], "tls");

    let updated = api
        .update_smtp_provider(
            "mail",
            &SmtpProviderUpdate {
                name: Some("Relay".to_string()),
                settings: SmtpProviderOptions {
                    enabled: Some(true),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Relay");
    assert!(updated.enabled);
    assert_eq!(updated.credentials["host"], "smtp.example.com");

    assert_eq!(api.list_providers(&ListOptions::default()).unwrap().total, 2);
    assert_eq!(api.list_providers(&ListOptions::search("relay")).unwrap().total, 1);

    api.delete_provider("sg").unwrap();
    assert!(matches!(api.get_provider("sg"), Err(ApiError::NotFound)));
    assert_eq!(api.get_provider("mail").unwrap().id, "mail");
}

#[test]
fn message_lifecycle() {
    let api = connect();

    let draft = api
        .create_email(
            "welcome",
            "Welcome",
            "<p>Hello</p>",
            &CreateEmail {
                recipients: Recipients {
                    targets: Some(vec!["t1".to_string(), "t2".to_string()]),
                    draft: Some(true),
                    ..Default::default()
                },
                html: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(draft.id, "welcome");
    assert_eq!(draft.provider_type, "email");
    assert_eq!(draft.status, "draft");
    assert_eq!(draft.data["subject"], "Welcome");
    assert_eq!(draft.data["html"], true);

    let sent = api
        .update_email(
            "welcome",
            &UpdateEmail {
                recipients: Recipients {
                    draft: Some(false),
                    ..Default::default()
                },
                subject: Some("Welcome aboard".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(sent.status, "processing");
    assert_eq!(sent.data["subject"], "Welcome aboard");
    assert_eq!(sent.data["content"], "<p>Hello</p>");

    let targets = api.list_targets("welcome", &QueryOptions::default()).unwrap();
    assert_eq!(targets.total, 2);
    assert_eq!(targets.targets[0].id, "t1");

    let sms = api
        .create_sms(
            "ping",
            "Ping",
            &Recipients {
                users: Some(vec!["u1".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(sms.provider_type, "sms");
    assert_eq!(sms.users, vec!["u1"]);

    assert_eq!(api.list_messages(&ListOptions::default()).unwrap().total, 2);
    assert_eq!(api.list_message_logs("ping", &QueryOptions::default()).unwrap().total, 0);

    api.delete_message("welcome").unwrap();
    assert!(matches!(api.get_message("welcome"), Err(ApiError::NotFound)));
    assert_eq!(api.get_message("ping").unwrap().data["content"], "Ping");
}

#[test]
fn operation_headers_reach_the_server() {
    let api = connect();

    // Same endpoint as create_topic, minus the JSON content type.
    const BARE_CREATE_TOPIC: Operation = Operation {
        name: "create_topic",
        method: HttpMethod::Post,
        path: "/messaging/topics",
        params: &[Param::required("topicId"), Param::required("name")],
        headers: &[],
    };
    let args = Args::new().with("topicId", "bare").with("name", "Bare");

    match api.invoke::<serde_json::Value>(&BARE_CREATE_TOPIC, args.clone()) {
        Err(ApiError::HttpError { status, .. }) => assert_eq!(status, 415),
        other => panic!("expected unsupported media type, got {other:?}"),
    }

    let created: serde_json::Value = api.invoke(&operations::CREATE_TOPIC, args).unwrap();
    assert_eq!(created["$id"], "bare");
}

#[test]
fn named_invocation_over_http() {
    let api = connect();

    let created = api
        .invoke_named(
            "create_topic",
            Args::new().with("topicId", "alerts").with("name", "Alerts"),
        )
        .unwrap();
    assert_eq!(created["$id"], "alerts");

    let fetched = api
        .invoke_named("get_topic", Args::new().with("topicId", "alerts"))
        .unwrap();
    assert_eq!(fetched["name"], "Alerts");

    let deleted = api
        .invoke_named("delete_topic", Args::new().with("topicId", "alerts"))
        .unwrap();
    assert!(deleted.is_null());
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = Config::new(&format!("http://127.0.0.1:{port}/v1")).unwrap();
    let api = Messaging::new(&config, UreqTransport::new());

    let err = api.get_topic("news").unwrap_err();
    assert!(err.is_transport_failure(), "{err:?}");
}
