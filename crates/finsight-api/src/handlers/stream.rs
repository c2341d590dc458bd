use axum::{extract::State, response::IntoResponse, Json};
use axum_streams::StreamBodyAs;
use finsight_types::ChatStreamEvent;
use std::sync::Arc;

use crate::{error::ApiResult, routes::chat::ChatRequest, state::AppState};

/// Answer one chat message as newline-delimited JSON events
///
/// Emits `loading`, then either `message` followed by `done`, or `error`.
#[utoipa::path(
    post,
    path = "/api/chat/stream",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Event stream", content_type = "application/x-ndjson"),
        (status = 400, description = "Empty message")
    ),
    tag = "chat"
)]
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<impl IntoResponse> {
    // 1. Validate before the stream starts so bad input is still a 400
    let (conversation_id, message, client_id) = req.into_parts()?;

    // 2. Run the turn on its own task; a panic there becomes an error event
    let events = async_stream::stream! {
        yield ChatStreamEvent::Loading;

        let advisor = state.advisor.clone();
        let turn = tokio::spawn(async move {
            advisor
                .chat(&conversation_id, &message, client_id.as_deref())
                .await
        })
        .await;

        match turn {
            Ok(turn) => {
                yield ChatStreamEvent::Message { content: turn.reply };
                yield ChatStreamEvent::Done;
            }
            Err(e) => {
                tracing::error!("Streamed chat turn failed: {}", e);
                yield ChatStreamEvent::Error {
                    message: "Error processing message".to_string(),
                };
            }
        }
    };

    Ok(StreamBodyAs::json_nl(events))
}
