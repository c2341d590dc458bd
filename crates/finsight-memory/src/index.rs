use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Metadata attached to every indexed chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ChunkMetadata {
    pub fn conversation(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp: Utc::now(),
            kind: "conversation".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub score: Option<f64>,
}

/// Searchable store of committed exchanges.
///
/// Implementations may call out to an embedding service; failures are
/// reported to the caller, which decides whether to swallow them.
#[async_trait]
pub trait ExchangeIndex: Send + Sync {
    async fn add_texts(&self, texts: Vec<String>, metadata: ChunkMetadata) -> Result<()>;

    async fn search(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>>;
}

/// In-process index ranking chunks by the share of query terms they contain
#[derive(Default)]
pub struct KeywordIndex {
    chunks: RwLock<Vec<(String, ChunkMetadata)>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl ExchangeIndex for KeywordIndex {
    async fn add_texts(&self, texts: Vec<String>, metadata: ChunkMetadata) -> Result<()> {
        let mut chunks = self.chunks.write().await;
        chunks.extend(texts.into_iter().map(|t| (t, metadata.clone())));
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = self.chunks.read().await;
        let mut hits: Vec<SearchHit> = chunks
            .iter()
            .filter(|(_, meta)| conversation_id.map_or(true, |id| meta.conversation_id == id))
            .filter_map(|(content, meta)| {
                let chunk_terms = terms(content);
                let matched = query_terms.iter().filter(|t| chunk_terms.contains(*t)).count();
                (matched > 0).then(|| SearchHit {
                    content: content.clone(),
                    metadata: meta.clone(),
                    score: Some(matched as f64 / query_terms.len() as f64),
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }
}
