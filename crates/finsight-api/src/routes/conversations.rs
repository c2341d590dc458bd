use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use finsight_memory::SearchHit;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub summary: String,
    pub message_count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    pub conversation_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub query: String,
    pub total_found: usize,
}

/// Textual digest of a conversation's latest turns
#[utoipa::path(
    get,
    path = "/api/conversation-summary/{conversation_id}",
    params(("conversation_id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation summary", body = ConversationSummary)
    ),
    tag = "conversations"
)]
pub async fn conversation_summary(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Json<ConversationSummary> {
    let memory = state.advisor.memory();
    let summary = memory.summary(&conversation_id).await;
    let message_count = memory.message_count(&conversation_id).await;

    Json(ConversationSummary {
        conversation_id,
        summary,
        message_count,
        last_updated: Utc::now(),
    })
}

/// Search indexed exchanges, optionally within one conversation
#[utoipa::path(
    post,
    path = "/api/search-conversations",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching exchange chunks", body = SearchResponse),
        (status = 400, description = "Empty query")
    ),
    tag = "conversations"
)]
pub async fn search_conversations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query cannot be empty".to_string()));
    }

    let results = state
        .advisor
        .memory()
        .search(
            &query,
            req.conversation_id.as_deref(),
            req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        )
        .await;

    Ok(Json(SearchResponse {
        total_found: results.len(),
        results,
        query,
    }))
}
