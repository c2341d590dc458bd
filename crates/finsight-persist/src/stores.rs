use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finsight_types::{AuthToken, Client, ClientMessage, Report, Session, TranscriptEntry};

use crate::error::Result;
use crate::memory::MemoryStore;

/// Generated reports, keyed by report id
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn put_report(&self, report: Report) -> Result<()>;

    async fn get_report(&self, id: &str) -> Result<Option<Report>>;

    /// All reports, oldest first
    async fn list_reports(&self) -> Result<Vec<Report>>;

    async fn delete_report(&self, id: &str) -> Result<bool>;
}

/// One overwrite-only customization string per conversation
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_preference(&self, conversation_id: &str) -> Result<Option<String>>;

    async fn put_preference(&self, conversation_id: &str, preference: String) -> Result<()>;

    async fn delete_preference(&self, conversation_id: &str) -> Result<bool>;
}

/// Real-time transcript per conversation room
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// `None` when the conversation was never opened
    async fn get_transcript(&self, conversation_id: &str) -> Result<Option<Vec<TranscriptEntry>>>;

    /// Create an empty transcript; keeps an existing one untouched
    async fn open_transcript(&self, conversation_id: &str) -> Result<()>;

    /// Append, creating the transcript if needed. Returns the full transcript.
    async fn append_transcript(
        &self,
        conversation_id: &str,
        entry: TranscriptEntry,
    ) -> Result<Vec<TranscriptEntry>>;

    async fn delete_transcript(&self, conversation_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, client: Client) -> Result<Client>;

    async fn list_clients(&self) -> Result<Vec<Client>>;

    async fn get_client(&self, id: &str) -> Result<Option<Client>>;

    /// Active client registered under `email` (already normalized)
    async fn find_active_client(&self, email: &str) -> Result<Option<Client>>;
}

#[async_trait]
pub trait AuthTokenStore: Send + Sync {
    async fn insert_token(&self, token: AuthToken) -> Result<()>;

    /// Atomically mark the matching unused, unexpired token as used.
    ///
    /// Returns the token as it was before consumption, or `None` when no
    /// redeemable token matches.
    async fn consume_token(
        &self,
        email: &str,
        passcode: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: Session) -> Result<()>;

    /// Look up an unexpired session and record `now` as its last access
    async fn touch_session(&self, session_token: &str, now: DateTime<Utc>) -> Result<Option<Session>>;

    async fn delete_session(&self, session_token: &str) -> Result<bool>;
}

/// Chat log attached to client records
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn save_message(&self, message: ClientMessage) -> Result<()>;

    /// Messages for a client in creation order
    async fn list_messages(&self, client_id: &str) -> Result<Vec<ClientMessage>>;
}

/// Store handles injected into the advisor, auth service and handlers
#[derive(Clone)]
pub struct Stores {
    pub reports: Arc<dyn ReportStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub transcripts: Arc<dyn TranscriptStore>,
    pub clients: Arc<dyn ClientStore>,
    pub auth_tokens: Arc<dyn AuthTokenStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl Stores {
    /// Every store backed by one guarded in-memory instance
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            reports: store.clone(),
            preferences: store.clone(),
            transcripts: store.clone(),
            clients: store.clone(),
            auth_tokens: store.clone(),
            sessions: store.clone(),
            messages: store,
        }
    }

    /// MongoDB for durable entities; preferences and transcripts stay process-local
    #[cfg(feature = "mongodb")]
    pub fn from_mongo(mongo: Arc<crate::dbs::mongo::MongoStore>) -> Self {
        let local = Arc::new(MemoryStore::new());
        Self {
            reports: mongo.clone(),
            preferences: local.clone(),
            transcripts: local,
            clients: mongo.clone(),
            auth_tokens: mongo.clone(),
            sessions: mongo.clone(),
            messages: mongo,
        }
    }
}
