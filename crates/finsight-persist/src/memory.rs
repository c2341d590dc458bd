use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finsight_types::{AuthToken, Client, ClientMessage, Report, Session, TranscriptEntry};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::stores::{
    AuthTokenStore, ClientStore, MessageStore, PreferenceStore, ReportStore, SessionStore,
    TranscriptStore,
};

/// Process-local backend. Each map sits behind its own lock, so
/// read-modify-write on one conversation never interleaves with another
/// writer of the same map.
#[derive(Default)]
pub struct MemoryStore {
    reports: RwLock<HashMap<String, Report>>,
    preferences: RwLock<HashMap<String, String>>,
    transcripts: RwLock<HashMap<String, Vec<TranscriptEntry>>>,
    clients: RwLock<Vec<Client>>,
    auth_tokens: RwLock<Vec<AuthToken>>,
    sessions: RwLock<HashMap<String, Session>>,
    messages: RwLock<Vec<ClientMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn put_report(&self, report: Report) -> Result<()> {
        self.reports.write().await.insert(report.id.clone(), report);
        Ok(())
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self.reports.read().await.values().cloned().collect();
        reports.sort_by_key(|r| r.created_at);
        Ok(reports)
    }

    async fn delete_report(&self, id: &str) -> Result<bool> {
        Ok(self.reports.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_preference(&self, conversation_id: &str) -> Result<Option<String>> {
        Ok(self.preferences.read().await.get(conversation_id).cloned())
    }

    async fn put_preference(&self, conversation_id: &str, preference: String) -> Result<()> {
        self.preferences
            .write()
            .await
            .insert(conversation_id.to_string(), preference);
        Ok(())
    }

    async fn delete_preference(&self, conversation_id: &str) -> Result<bool> {
        Ok(self.preferences.write().await.remove(conversation_id).is_some())
    }
}

#[async_trait]
impl TranscriptStore for MemoryStore {
    async fn get_transcript(&self, conversation_id: &str) -> Result<Option<Vec<TranscriptEntry>>> {
        Ok(self.transcripts.read().await.get(conversation_id).cloned())
    }

    async fn open_transcript(&self, conversation_id: &str) -> Result<()> {
        self.transcripts
            .write()
            .await
            .entry(conversation_id.to_string())
            .or_default();
        Ok(())
    }

    async fn append_transcript(
        &self,
        conversation_id: &str,
        entry: TranscriptEntry,
    ) -> Result<Vec<TranscriptEntry>> {
        let mut transcripts = self.transcripts.write().await;
        let transcript = transcripts.entry(conversation_id.to_string()).or_default();
        transcript.push(entry);
        Ok(transcript.clone())
    }

    async fn delete_transcript(&self, conversation_id: &str) -> Result<bool> {
        Ok(self.transcripts.write().await.remove(conversation_id).is_some())
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn insert_client(&self, client: Client) -> Result<Client> {
        self.clients.write().await.push(client.clone());
        Ok(client)
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.clients.read().await.clone())
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        Ok(self.clients.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_active_client(&self, email: &str) -> Result<Option<Client>> {
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .find(|c| c.is_active && c.email == email)
            .cloned())
    }
}

#[async_trait]
impl AuthTokenStore for MemoryStore {
    async fn insert_token(&self, token: AuthToken) -> Result<()> {
        self.auth_tokens.write().await.push(token);
        Ok(())
    }

    async fn consume_token(
        &self,
        email: &str,
        passcode: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>> {
        let mut tokens = self.auth_tokens.write().await;
        let found = tokens
            .iter_mut()
            .find(|t| t.email == email && t.passcode == passcode && t.is_redeemable_at(now));

        Ok(found.map(|token| {
            let before = token.clone();
            token.used = true;
            before
        }))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_token.clone(), session);
        Ok(())
    }

    async fn touch_session(&self, session_token: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_token) {
            Some(session) if session.is_active_at(now) => {
                session.last_accessed = Some(now);
                Ok(Some(session.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_session(&self, session_token: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(session_token).is_some())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn save_message(&self, message: ClientMessage) -> Result<()> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn list_messages(&self, client_id: &str) -> Result<Vec<ClientMessage>> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect())
    }
}
