use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use chrono::Utc;
use finsight_agent::replies;
use finsight_persist::{PreferenceStore, TranscriptStore};
use finsight_types::{ClientEvent, ServerEvent, TranscriptEntry};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::state::AppState;

const ANONYMOUS: &str = "Anonymous";

/// Upgrade to the real-time conversation protocol
///
/// Frames are JSON `{"event": ..., "data": {...}}` in both directions.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching to WebSocket")
    ),
    tag = "realtime"
)]
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let connection_id = Uuid::new_v4();

    // Forward queued frames to the socket
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if ws_tx.send(message).await.is_err() {
                break;
            }
        }
    });

    state.rooms.register(connection_id, tx).await;
    tracing::info!(connection_id = %connection_id, "WebSocket client connected");
    state
        .rooms
        .send_to(
            connection_id,
            &ServerEvent::Connected {
                message: "Connected to Financial Assistant".to_string(),
            },
        )
        .await;

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => handle_event(&state, connection_id, event).await,
                Err(e) => {
                    state
                        .rooms
                        .send_to(
                            connection_id,
                            &ServerEvent::error(format!("Invalid message format: {}", e)),
                        )
                        .await;
                }
            },
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    state.rooms.remove(connection_id).await;
    tracing::info!(connection_id = %connection_id, "WebSocket client disconnected");
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Apply one client event. Replies go to the sender or the conversation room.
pub(crate) async fn handle_event(state: &AppState, connection_id: Uuid, event: ClientEvent) {
    match event {
        ClientEvent::JoinConversation {
            conversation_id,
            client_name,
        } => {
            let Some(conversation_id) = non_empty(conversation_id) else {
                state
                    .rooms
                    .send_to(connection_id, &ServerEvent::error("Missing conversation_id"))
                    .await;
                return;
            };
            join_conversation(state, connection_id, &conversation_id, client_name).await;
        }
        ClientEvent::SendMessage {
            message,
            conversation_id,
            client_name,
        } => {
            let (Some(message), Some(conversation_id)) = (non_empty(message), non_empty(conversation_id))
            else {
                state
                    .rooms
                    .send_to(
                        connection_id,
                        &ServerEvent::error("Missing message or conversation_id"),
                    )
                    .await;
                return;
            };
            send_message(state, connection_id, &conversation_id, &message, client_name).await;
        }
        ClientEvent::GenerateReport {
            conversation_id,
            client_name,
        } => {
            let Some(conversation_id) = non_empty(conversation_id) else {
                state
                    .rooms
                    .send_to(connection_id, &ServerEvent::error("Missing conversation_id"))
                    .await;
                return;
            };
            generate_report(state, connection_id, &conversation_id, client_name).await;
        }
    }
}

async fn join_conversation(
    state: &AppState,
    connection_id: Uuid,
    conversation_id: &str,
    client_name: Option<String>,
) {
    let client_name = non_empty(client_name).unwrap_or_else(|| ANONYMOUS.to_string());
    tracing::info!(
        conversation_id = %conversation_id,
        client_name = %client_name,
        "Client joined conversation"
    );
    state
        .rooms
        .join(connection_id, conversation_id, Some(client_name))
        .await;

    let event = match state.stores.transcripts.get_transcript(conversation_id).await {
        Ok(Some(history)) => ServerEvent::ConversationHistory {
            history,
            preferences: preferences(state, conversation_id).await,
        },
        Ok(None) => {
            if let Err(e) = state.stores.transcripts.open_transcript(conversation_id).await {
                tracing::warn!(conversation_id = %conversation_id, "Failed to open transcript: {}", e);
            }
            ServerEvent::ConversationInitialized {
                conversation_id: conversation_id.to_string(),
            }
        }
        Err(e) => {
            tracing::error!(conversation_id = %conversation_id, "Failed to load transcript: {}", e);
            ServerEvent::error("Error loading conversation")
        }
    };
    state.rooms.send_to(connection_id, &event).await;
}

async fn send_message(
    state: &AppState,
    connection_id: Uuid,
    conversation_id: &str,
    message: &str,
    client_name: Option<String>,
) {
    let client_name = non_empty(client_name);
    // Senders always receive the room's replies
    state
        .rooms
        .join(connection_id, conversation_id, client_name.clone())
        .await;

    // 1. Transcript gets the user line first
    let entry = TranscriptEntry::user(message, client_name.as_deref().unwrap_or(ANONYMOUS));
    append(state, conversation_id, entry).await;

    // 2. One advisor turn
    let turn = state.advisor.chat(conversation_id, message, None).await;

    // 3. Assistant line, then fan out
    let history = append(state, conversation_id, TranscriptEntry::assistant(&turn.reply)).await;

    state
        .rooms
        .broadcast(
            conversation_id,
            &ServerEvent::MessageResponse {
                message: turn.reply,
                conversation_id: conversation_id.to_string(),
                timestamp: Utc::now(),
            },
        )
        .await;
    state
        .rooms
        .broadcast(
            conversation_id,
            &ServerEvent::ConversationUpdated {
                history,
                preferences: preferences(state, conversation_id).await,
            },
        )
        .await;
}

async fn generate_report(
    state: &AppState,
    connection_id: Uuid,
    conversation_id: &str,
    client_name: Option<String>,
) {
    state
        .rooms
        .join(connection_id, conversation_id, None)
        .await;
    state
        .rooms
        .broadcast(
            conversation_id,
            &ServerEvent::ReportGenerationStarted {
                message: replies::REPORT_STARTED.to_string(),
                conversation_id: conversation_id.to_string(),
            },
        )
        .await;

    let outcome = match state
        .advisor
        .generate_report(client_name.as_deref(), conversation_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(conversation_id = %conversation_id, "Report generation failed: {}", e);
            state
                .rooms
                .broadcast(
                    conversation_id,
                    &ServerEvent::error(format!("Error generating report: {}", e)),
                )
                .await;
            return;
        }
    };

    let notice = replies::report_notice(
        &outcome.client_name,
        &outcome.report_id,
        &outcome.report_url,
    );

    state
        .rooms
        .broadcast(
            conversation_id,
            &ServerEvent::ReportGenerated {
                success: true,
                report_id: outcome.report_id,
                report_url: outcome.report_url,
                message: outcome.message,
                conversation_id: conversation_id.to_string(),
            },
        )
        .await;

    let history = append(state, conversation_id, TranscriptEntry::report_notice(notice)).await;
    state
        .rooms
        .broadcast(
            conversation_id,
            &ServerEvent::ConversationUpdated {
                history,
                preferences: preferences(state, conversation_id).await,
            },
        )
        .await;
}

/// Append to the transcript and return it; storage failures are logged
async fn append(state: &AppState, conversation_id: &str, entry: TranscriptEntry) -> Vec<TranscriptEntry> {
    match state
        .stores
        .transcripts
        .append_transcript(conversation_id, entry)
        .await
    {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(conversation_id = %conversation_id, "Failed to append transcript: {}", e);
            Vec::new()
        }
    }
}

async fn preferences(state: &AppState, conversation_id: &str) -> String {
    match state.stores.preferences.get_preference(conversation_id).await {
        Ok(preference) => preference.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(conversation_id = %conversation_id, "Failed to load preference: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finsight_auth::LogMailer;
    use finsight_llm::{ChatClient, ChatRequest, ChatResponse};
    use finsight_persist::{ReportStore, Stores};
    use serde_json::Value;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use crate::config::Config;

    struct EchoClient;

    #[async_trait]
    impl ChatClient for EchoClient {
        async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
            Ok(ChatResponse::text("## 1. EXECUTIVE SUMMARY\nAll set."))
        }
    }

    struct DownClient;

    #[async_trait]
    impl ChatClient for DownClient {
        async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
            anyhow::bail!("provider unavailable")
        }
    }

    fn test_state(llm: Option<Arc<dyn ChatClient>>) -> AppState {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::from_file(path).unwrap();
        AppState::new(config, llm, Stores::in_memory(), Arc::new(LogMailer), "memory")
    }

    async fn connect(state: &AppState) -> (Uuid, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        state.rooms.register(id, tx).await;
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Message>) -> Vec<Value> {
        let mut events = Vec::new();
        while let Ok(Message::Text(text)) = rx.try_recv() {
            events.push(serde_json::from_str(&text).unwrap());
        }
        events
    }

    fn names(events: &[Value]) -> Vec<&str> {
        events.iter().map(|e| e["event"].as_str().unwrap()).collect()
    }

    fn join(conversation_id: &str) -> ClientEvent {
        ClientEvent::JoinConversation {
            conversation_id: Some(conversation_id.to_string()),
            client_name: Some("Jane".to_string()),
        }
    }

    #[tokio::test]
    async fn test_join_initializes_then_replays_history() {
        let state = test_state(Some(Arc::new(EchoClient)));
        let (first, mut first_rx) = connect(&state).await;

        handle_event(&state, first, join("c1")).await;
        let events = drain(&mut first_rx);
        assert_eq!(names(&events), ["conversation_initialized"]);

        handle_event(
            &state,
            first,
            ClientEvent::SendMessage {
                message: Some("hello".into()),
                conversation_id: Some("c1".into()),
                client_name: None,
            },
        )
        .await;
        drain(&mut first_rx);

        let (second, mut second_rx) = connect(&state).await;
        handle_event(&state, second, join("c1")).await;
        let events = drain(&mut second_rx);
        assert_eq!(names(&events), ["conversation_history"]);
        let history = events[0]["data"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["client_name"], "Anonymous");
    }

    #[tokio::test]
    async fn test_send_message_broadcasts_to_room() {
        let state = test_state(Some(Arc::new(EchoClient)));
        let (sender, mut sender_rx) = connect(&state).await;
        let (watcher, mut watcher_rx) = connect(&state).await;
        let (outsider, mut outsider_rx) = connect(&state).await;

        handle_event(&state, watcher, join("c1")).await;
        handle_event(&state, outsider, join("c2")).await;
        drain(&mut watcher_rx);
        drain(&mut outsider_rx);

        handle_event(
            &state,
            sender,
            ClientEvent::SendMessage {
                message: Some("How do I budget?".into()),
                conversation_id: Some("c1".into()),
                client_name: Some("Jane".into()),
            },
        )
        .await;

        for rx in [&mut sender_rx, &mut watcher_rx] {
            let events = drain(rx);
            assert_eq!(names(&events), ["message_response", "conversation_updated"]);
            assert_eq!(events[0]["data"]["conversation_id"], "c1");
        }
        assert!(drain(&mut outsider_rx).is_empty());
        assert_eq!(state.advisor.memory().message_count("c1").await, 2);
    }

    #[tokio::test]
    async fn test_missing_fields_error_to_sender_only() {
        let state = test_state(None);
        let (id, mut rx) = connect(&state).await;

        handle_event(
            &state,
            id,
            ClientEvent::SendMessage {
                message: Some("hi".into()),
                conversation_id: None,
                client_name: None,
            },
        )
        .await;
        handle_event(
            &state,
            id,
            ClientEvent::GenerateReport {
                conversation_id: Some("  ".into()),
                client_name: None,
            },
        )
        .await;

        let events = drain(&mut rx);
        assert_eq!(names(&events), ["error", "error"]);
        assert_eq!(events[0]["data"]["message"], "Missing message or conversation_id");
        assert_eq!(events[1]["data"]["message"], "Missing conversation_id");
    }

    #[tokio::test]
    async fn test_generate_report_announces_and_records_notice() {
        let state = test_state(Some(Arc::new(EchoClient)));
        let (id, mut rx) = connect(&state).await;

        handle_event(
            &state,
            id,
            ClientEvent::GenerateReport {
                conversation_id: Some("c1".into()),
                client_name: Some("Jane Doe".into()),
            },
        )
        .await;

        let events = drain(&mut rx);
        assert_eq!(
            names(&events),
            ["report_generation_started", "report_generated", "conversation_updated"]
        );
        let report_id = events[1]["data"]["report_id"].as_str().unwrap();
        assert!(state.stores.reports.get_report(report_id).await.unwrap().is_some());

        let history = events[2]["data"]["history"].as_array().unwrap();
        assert_eq!(history.last().unwrap()["type"], "report_generation");
        assert!(history.last().unwrap()["content"]
            .as_str()
            .unwrap()
            .contains(report_id));
    }

    #[tokio::test]
    async fn test_generate_report_failure_errors_to_room() {
        let state = test_state(Some(Arc::new(DownClient)));
        let (id, mut rx) = connect(&state).await;

        handle_event(
            &state,
            id,
            ClientEvent::GenerateReport {
                conversation_id: Some("c1".into()),
                client_name: None,
            },
        )
        .await;

        let events = drain(&mut rx);
        assert_eq!(names(&events), ["report_generation_started", "error"]);
        assert!(events[1]["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error generating report: "));
        assert!(state.stores.reports.list_reports().await.unwrap().is_empty());
    }
}
