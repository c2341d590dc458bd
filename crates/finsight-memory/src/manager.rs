use std::collections::HashMap;
use std::sync::Arc;

use finsight_types::{ChatMessage, Role};
use tokio::sync::RwLock;

use crate::index::{ChunkMetadata, ExchangeIndex, SearchHit};
use crate::splitter::TextSplitter;

/// Returned by `summary` for conversations with no committed exchange
pub const NO_HISTORY_SUMMARY: &str = "No conversation history yet.";

/// Window used by report prompts, extraction and summaries
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const SUMMARY_MESSAGES: usize = 6;
const SUMMARY_PREFIX_CHARS: usize = 100;

/// What `record` did with a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// User turn buffered until the assistant replies
    Pending,
    /// User turn replaced an earlier unanswered one
    PendingReplaced,
    /// Assistant turn committed together with the pending user turn
    Committed,
    /// Assistant turn with nothing to pair against
    Dropped,
}

#[derive(Debug, Default)]
struct Conversation {
    messages: Vec<ChatMessage>,
    pending_user: Option<String>,
    /// Bumped on every committed exchange
    version: u64,
    summary: Option<CachedSummary>,
}

#[derive(Debug)]
struct CachedSummary {
    version: u64,
    text: String,
}

/// Per-conversation memory: exchange pairing, bounded history views and a
/// cached textual summary. An optional [`ExchangeIndex`] receives every
/// committed exchange for later search.
pub struct ConversationMemory {
    conversations: RwLock<HashMap<String, Conversation>>,
    index: Option<Arc<dyn ExchangeIndex>>,
    splitter: TextSplitter,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            index: None,
            splitter: TextSplitter::default(),
        }
    }

    pub fn with_index(mut self, index: Arc<dyn ExchangeIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Record one turn.
    ///
    /// User turns are buffered (a second unanswered one replaces the first);
    /// an assistant turn commits the buffered user turn and itself as one
    /// exchange.
    pub async fn record(&self, conversation_id: &str, role: Role, content: &str) -> RecordOutcome {
        let committed = {
            let mut conversations = self.conversations.write().await;
            let conversation = conversations.entry(conversation_id.to_string()).or_default();

            match role {
                Role::User => {
                    let replaced = conversation.pending_user.replace(content.to_string()).is_some();
                    if replaced {
                        tracing::debug!(
                            conversation_id = %conversation_id,
                            "Unanswered user message replaced"
                        );
                        return RecordOutcome::PendingReplaced;
                    }
                    return RecordOutcome::Pending;
                }
                Role::Assistant => match conversation.pending_user.take() {
                    Some(user_content) => {
                        conversation.messages.push(ChatMessage::user(user_content.clone()));
                        conversation.messages.push(ChatMessage::assistant(content));
                        conversation.version += 1;
                        user_content
                    }
                    None => {
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            "No pending user message, assistant message not committed"
                        );
                        return RecordOutcome::Dropped;
                    }
                },
            }
        };

        // Index outside the lock; failures never undo the commit
        self.index_exchange(conversation_id, &committed, content).await;
        RecordOutcome::Committed
    }

    async fn index_exchange(&self, conversation_id: &str, user: &str, assistant: &str) {
        let Some(index) = &self.index else {
            return;
        };

        let text = format!(
            "{}: {}\n{}: {}",
            Role::User.tag(),
            user,
            Role::Assistant.tag(),
            assistant
        );
        let chunks = self.splitter.split(&text);
        if let Err(e) = index
            .add_texts(chunks, ChunkMetadata::conversation(conversation_id))
            .await
        {
            tracing::warn!(conversation_id = %conversation_id, "Failed to index exchange: {}", e);
        }
    }

    /// Most recent `limit` committed messages in arrival order
    pub async fn history(&self, conversation_id: &str, limit: usize) -> Vec<ChatMessage> {
        let conversations = self.conversations.read().await;
        match conversations.get(conversation_id) {
            Some(conversation) => {
                let start = conversation.messages.len().saturating_sub(limit);
                conversation.messages[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Total committed messages (two per exchange)
    pub async fn message_count(&self, conversation_id: &str) -> usize {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .map_or(0, |c| c.messages.len())
    }

    /// Short textual digest of the latest turns.
    ///
    /// Cached per conversation and recomputed only after new exchanges.
    pub async fn summary(&self, conversation_id: &str) -> String {
        {
            let conversations = self.conversations.read().await;
            match conversations.get(conversation_id) {
                None => return NO_HISTORY_SUMMARY.to_string(),
                Some(c) if c.messages.is_empty() => return NO_HISTORY_SUMMARY.to_string(),
                Some(c) => {
                    if let Some(cached) = c.summary.as_ref().filter(|s| s.version == c.version) {
                        return cached.text.clone();
                    }
                }
            }
        }

        let mut conversations = self.conversations.write().await;
        let Some(conversation) = conversations.get_mut(conversation_id) else {
            return NO_HISTORY_SUMMARY.to_string();
        };

        let text = summarize(&conversation.messages);
        conversation.summary = Some(CachedSummary {
            version: conversation.version,
            text: text.clone(),
        });
        text
    }

    /// Search indexed exchanges. Empty when no index is configured or the
    /// index fails.
    pub async fn search(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        limit: usize,
    ) -> Vec<SearchHit> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        match index.search(query, conversation_id, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Exchange search failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn summarize(messages: &[ChatMessage]) -> String {
    let window_start = messages.len().saturating_sub(DEFAULT_HISTORY_LIMIT);
    let window = &messages[window_start..];
    let recent = &window[window.len().saturating_sub(SUMMARY_MESSAGES)..];

    recent
        .iter()
        .map(|m| {
            let prefix: String = m.content.chars().take(SUMMARY_PREFIX_CHARS).collect();
            format!("{}: {}...", m.role.tag(), prefix)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_truncates_by_chars() {
        let long = "é".repeat(150);
        let summary = summarize(&[ChatMessage::user(long), ChatMessage::assistant("ok")]);
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Human: {}...", "é".repeat(100)));
        assert_eq!(lines[1], "AI: ok...");
    }

    #[test]
    fn test_summarize_keeps_last_six() {
        let messages: Vec<_> = (0..8)
            .map(|i| ChatMessage::user(format!("m{}", i)))
            .collect();
        let summary = summarize(&messages);

        assert_eq!(summary.lines().count(), 6);
        assert!(summary.starts_with("Human: m2..."));
    }
}
