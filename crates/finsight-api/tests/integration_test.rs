use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use finsight_api::{build_router, config::Config, state::AppState};
use finsight_auth::{MailError, Mailer, OutgoingEmail};
use finsight_llm::{ChatClient, ChatRequest, ChatResponse};
use chrono::{DateTime, Utc};
use finsight_persist::{PersistError, SessionStore, Stores};
use finsight_types::Session;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

struct ScriptedClient;

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content().as_text())
            .unwrap_or_default();

        if prompt.contains("extract any mentioned financial information") {
            return Ok(ChatResponse::text(
                r#"Here you go: {"assets": {"rrsp": 15000, "tfsa": 2500, "investments": 0, "realEstate": 0, "totalAssets": 17500},
                    "liabilities": {"mortgage": 0, "carLoan": 0, "creditCards": 0, "totalLiabilities": 0},
                    "netWorth": 17500, "goals": {"shortTerm": [], "mediumTerm": [], "longTerm": []}}"#,
            ));
        }
        if prompt.starts_with("Create a comprehensive financial report") {
            return Ok(ChatResponse::text("## 1. EXECUTIVE SUMMARY\nLooking good."));
        }
        Ok(ChatResponse::text("Consider maxing out your TFSA."))
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }

    async fn last_passcode(&self) -> String {
        let sent = self.sent.lock().await;
        let html = &sent.last().expect("an email was sent").html;
        let start = html.find("monospace;\">").expect("code block") + "monospace;\">".len();
        html[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// Session storage whose backend is unreachable
struct UnreachableSessions;

#[async_trait]
impl SessionStore for UnreachableSessions {
    async fn insert_session(&self, _session: Session) -> finsight_persist::Result<()> {
        Err(PersistError::Connection("connection refused".into()))
    }

    async fn touch_session(
        &self,
        _session_token: &str,
        _now: DateTime<Utc>,
    ) -> finsight_persist::Result<Option<Session>> {
        Err(PersistError::Connection("connection refused".into()))
    }

    async fn delete_session(&self, _session_token: &str) -> finsight_persist::Result<bool> {
        Err(PersistError::Connection("connection refused".into()))
    }
}

struct TestApp {
    router: Router,
    mailer: Arc<RecordingMailer>,
}

impl TestApp {
    fn new(llm: Option<Arc<dyn ChatClient>>) -> Self {
        Self::with_stores(llm, Stores::in_memory())
    }

    fn with_stores(llm: Option<Arc<dyn ChatClient>>, stores: Stores) -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::from_file(path).expect("bundled config parses");
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(config, llm, stores, mailer.clone(), "memory");

        Self {
            router: build_router(Arc::new(state)),
            mailer,
        }
    }

    fn configured() -> Self {
        Self::new(Some(Arc::new(ScriptedClient)))
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Bytes) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, body, None).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

#[tokio::test]
async fn test_service_info_reports_unconfigured_model() {
    let app = TestApp::new(None);

    let (status, body) = app.json(Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Financial Assistant API Ready");
    assert_eq!(body["openai_status"], "not_configured");
    assert_eq!(body["persistence"], "memory");

    let (status, body) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["llm"], "not_configured");
}

#[tokio::test]
async fn test_chat_round_trip_feeds_memory() {
    let app = TestApp::configured();

    let (status, body) = app
        .json(
            Method::POST,
            "/api/chat",
            Some(json!({"message": "How should I save?", "conversation_id": "c1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "message");
    assert_eq!(body["message"]["content"], "Consider maxing out your TFSA.");
    assert_eq!(body["message"]["citations"], json!([]));
    assert_eq!(body["conversation_id"], "c1");

    let (_, summary) = app
        .json(Method::GET, "/api/conversation-summary/c1", None)
        .await;
    assert_eq!(summary["message_count"], 2);
    assert!(summary["summary"]
        .as_str()
        .unwrap()
        .starts_with("Human: How should I save?..."));

    let (status, found) = app
        .json(
            Method::POST,
            "/api/search-conversations",
            Some(json!({"query": "TFSA", "conversation_id": "c1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["total_found"], 1);
    assert_eq!(found["results"][0]["metadata"]["conversation_id"], "c1");
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = TestApp::configured();

    let (status, body) = app
        .json(Method::POST, "/api/chat", Some(json!({"message": "   "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No message provided");

    let (status, body) = app
        .json(Method::POST, "/api/search-conversations", Some(json!({"query": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query cannot be empty");
}

#[tokio::test]
async fn test_unconfigured_chat_apologizes() {
    let app = TestApp::new(None);

    let (status, body) = app
        .json(Method::POST, "/api/chat", Some(json!({"message": "hello"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["content"], finsight_agent::replies::NOT_CONFIGURED);
    assert!(!body["conversation_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_stream_emits_ndjson_events() {
    let app = TestApp::configured();

    let (status, bytes) = app
        .request(
            Method::POST,
            "/api/chat/stream",
            Some(json!({"message": "hello", "conversation_id": "s1"})),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let events: Vec<Value> = std::str::from_utf8(&bytes)
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], json!({"type": "loading"}));
    assert_eq!(
        events[1],
        json!({"type": "message", "content": "Consider maxing out your TFSA."})
    );
    assert_eq!(events[2], json!({"type": "done"}));
}

#[tokio::test]
async fn test_report_generation_and_views() {
    let app = TestApp::configured();

    app.json(
        Method::POST,
        "/api/chat",
        Some(json!({"message": "I have 15000 in my RRSP", "conversation_id": "r1"})),
    )
    .await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/generate-report",
            Some(json!({"client_name": "Jane Doe", "conversation_id": "r1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Financial report generated successfully for Jane Doe");
    let report_id = body["report_id"].as_str().unwrap().to_string();
    assert_eq!(
        body["report_url"],
        format!("http://localhost:8000/reports/{}", report_id)
    );

    let (status, stored) = app
        .json(Method::GET, &format!("/api/reports/{}", report_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["report"]["client_name"], "Jane Doe");
    assert_eq!(stored["report"]["financial_data"]["assets"]["rrsp"], 15000);

    let (status, html) = app
        .request(Method::GET, &format!("/reports/{}", report_id), None, None)
        .await;
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("Looking good."));
    assert!(html.contains("15,000"));

    let (_, listed) = app.json(Method::GET, "/api/reports", None).await;
    assert_eq!(listed["reports"].as_array().unwrap().len(), 1);
    assert_eq!(listed["reports"][0]["id"], report_id.as_str());
}

#[tokio::test]
async fn test_unknown_report_is_not_found() {
    let app = TestApp::configured();

    let (status, body) = app.json(Method::GET, "/api/reports/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Report not found");

    let (status, html) = app.request(Method::GET, "/reports/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8(html.to_vec())
        .unwrap()
        .contains("Report Not Found"));
}

#[tokio::test]
async fn test_report_generation_requires_model() {
    let app = TestApp::new(None);

    let (status, _) = app
        .json(
            Method::POST,
            "/api/generate-report",
            Some(json!({"client_name": "Jane"})),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, listed) = app.json(Method::GET, "/api/reports", None).await;
    assert!(listed["reports"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_financial_data_defaults_without_model() {
    let app = TestApp::new(None);

    let (status, body) = app
        .json(Method::GET, "/api/financial-data/none", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client_name"], "Unknown Client");
    assert_eq!(body["financial_data"]["netWorth"], 0.0);
    assert_eq!(body["financial_data"]["goals"]["shortTerm"], json!([]));
}

#[tokio::test]
async fn test_client_registry_and_message_log() {
    let app = TestApp::configured();

    let (status, body) = app
        .json(Method::POST, "/api/clients", Some(json!({"name": "Jane"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: email");

    let (status, created) = app
        .json(
            Method::POST,
            "/api/clients",
            Some(json!({"name": "Jane Doe", "email": "Jane@Example.com", "age": 41})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["client"]["email"], "jane@example.com");
    assert_eq!(created["client"]["is_active"], true);
    let client_id = created["client"]["id"].as_str().unwrap().to_string();

    let (_, listed) = app.json(Method::GET, "/api/clients", None).await;
    assert_eq!(listed["clients"].as_array().unwrap().len(), 1);

    app.json(
        Method::POST,
        "/api/chat",
        Some(json!({"message": "hello", "client_id": client_id})),
    )
    .await;

    let (status, messages) = app
        .json(
            Method::GET,
            &format!("/api/clients/{}/messages", client_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");

    let (status, _) = app
        .json(Method::GET, "/api/clients/nobody/messages", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_passcode_login_flow() {
    let app = TestApp::configured();
    app.json(
        Method::POST,
        "/api/clients",
        Some(json!({"name": "Jane Doe", "email": "jane@example.com"})),
    )
    .await;

    // Unknown e-mail: 403 and no mail
    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/request-access",
            Some(json!({"email": "stranger@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Email not authorized. Please contact your financial advisor."
    );
    assert_eq!(app.mailer.count().await, 0);

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/request-access",
            Some(json!({"email": " JANE@example.com "})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@example.com");
    let passcode = app.mailer.last_passcode().await;
    assert_eq!(passcode.len(), 6);

    let verify = json!({"email": "jane@example.com", "token": passcode});
    let (status, granted) = app
        .json(Method::POST, "/api/auth/verify-token", Some(verify.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let session_token = granted["session_token"].as_str().unwrap().to_string();

    // Single use
    let (status, _) = app
        .json(Method::POST, "/api/auth/verify-token", Some(verify))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, bytes) = app
        .request(
            Method::GET,
            "/api/auth/validate-session",
            None,
            Some(&session_token),
        )
        .await;
    let session: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["email"], "jane@example.com");

    let (status, _) = app
        .request(Method::POST, "/api/auth/logout", None, Some(&session_token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = app
        .request(
            Method::GET,
            "/api/auth/validate-session",
            None,
            Some(&session_token),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        serde_json::from_slice::<Value>(&bytes).unwrap(),
        json!({"authenticated": false})
    );
}

#[tokio::test]
async fn test_auth_validation_errors() {
    let app = TestApp::configured();

    let (status, body) = app
        .json(Method::POST, "/api/auth/request-access", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/verify-token",
            Some(json!({"email": "jane@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and token are required");
}

#[tokio::test]
async fn test_session_storage_failure_is_not_unauthorized() {
    let mut stores = Stores::in_memory();
    stores.sessions = Arc::new(UnreachableSessions);
    let app = TestApp::with_stores(Some(Arc::new(ScriptedClient)), stores);

    let (status, bytes) = app
        .request(
            Method::GET,
            "/api/auth/validate-session",
            None,
            Some("some-session-token"),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_slice::<Value>(&bytes).unwrap(),
        json!({"error": "Storage error"})
    );

    // An empty token never reaches storage
    let (status, _) = app
        .request(Method::GET, "/api/auth/validate-session", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
