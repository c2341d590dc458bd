use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Client record the exchange is logged against
    pub client_id: Option<String>,
    /// Generated when absent
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Validated `(conversation_id, message, client_id)`
    pub(crate) fn into_parts(self) -> ApiResult<(String, String, Option<String>)> {
        if self.message.trim().is_empty() {
            return Err(ApiError::BadRequest("No message provided".to_string()));
        }
        let conversation_id = self
            .conversation_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok((conversation_id, self.message, self.client_id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    pub citations: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: ChatReply,
    pub conversation_id: String,
}

/// Answer one chat message
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Empty message")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let (conversation_id, message, client_id) = req.into_parts()?;

    let turn = state
        .advisor
        .chat(&conversation_id, &message, client_id.as_deref())
        .await;

    Ok(Json(ChatResponse {
        kind: "message".to_string(),
        message: ChatReply {
            content: turn.reply,
            citations: Vec::new(),
        },
        conversation_id: turn.conversation_id,
    }))
}
