use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client as MongoDriver, Collection};

use finsight_types::{AuthToken, Client, ClientMessage, Report, Session};

use super::models::{MongoAuthToken, MongoClient, MongoMessage, MongoReport, MongoSession};
use crate::error::{PersistError, Result};
use crate::stores::{AuthTokenStore, ClientStore, MessageStore, ReportStore, SessionStore};

/// MongoDB backend for the durable entities
pub struct MongoStore {
    clients: Collection<MongoClient>,
    auth_tokens: Collection<MongoAuthToken>,
    sessions: Collection<MongoSession>,
    messages: Collection<MongoMessage>,
    reports: Collection<MongoReport>,
}

impl MongoStore {
    /// Connect to MongoDB and bind the collections
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = MongoDriver::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let db = client.database(database);
        Ok(Self {
            clients: db.collection("clients"),
            auth_tokens: db.collection("authorization_tokens"),
            sessions: db.collection("client_sessions"),
            messages: db.collection("messages"),
            reports: db.collection("financial_reports"),
        })
    }
}

#[async_trait]
impl ReportStore for MongoStore {
    async fn put_report(&self, report: Report) -> Result<()> {
        self.reports.insert_one(MongoReport::from(report)).await?;
        Ok(())
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>> {
        let report = self.reports.find_one(doc! { "_id": id }).await?;
        Ok(report.map(Into::into))
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let reports: Vec<MongoReport> = self
            .reports
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    async fn delete_report(&self, id: &str) -> Result<bool> {
        let result = self.reports.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl ClientStore for MongoStore {
    async fn insert_client(&self, client: Client) -> Result<Client> {
        self.clients.insert_one(MongoClient::from(client.clone())).await?;
        Ok(client)
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        let clients: Vec<MongoClient> = self
            .clients
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(clients.into_iter().map(Into::into).collect())
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let client = self.clients.find_one(doc! { "_id": id }).await?;
        Ok(client.map(Into::into))
    }

    async fn find_active_client(&self, email: &str) -> Result<Option<Client>> {
        let client = self
            .clients
            .find_one(doc! { "email": email, "is_active": true })
            .await?;
        Ok(client.map(Into::into))
    }
}

#[async_trait]
impl AuthTokenStore for MongoStore {
    async fn insert_token(&self, token: AuthToken) -> Result<()> {
        self.auth_tokens.insert_one(MongoAuthToken::from(token)).await?;
        Ok(())
    }

    async fn consume_token(
        &self,
        email: &str,
        passcode: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>> {
        let filter = doc! {
            "email": email,
            "passcode": passcode,
            "used": false,
            "expires_at": { "$gt": bson::DateTime::from_chrono(now) },
        };

        // Returns the pre-update document; the filter makes the flip single-use
        let token = self
            .auth_tokens
            .find_one_and_update(filter, doc! { "$set": { "used": true } })
            .await?;
        Ok(token.map(Into::into))
    }
}

#[async_trait]
impl SessionStore for MongoStore {
    async fn insert_session(&self, session: Session) -> Result<()> {
        self.sessions.insert_one(MongoSession::from(session)).await?;
        Ok(())
    }

    async fn touch_session(&self, session_token: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
        let now_bson = bson::DateTime::from_chrono(now);
        let filter = doc! {
            "session_token": session_token,
            "expires_at": { "$gt": now_bson },
        };

        let session = self
            .sessions
            .find_one_and_update(filter, doc! { "$set": { "last_accessed": now_bson } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(session.map(Into::into))
    }

    async fn delete_session(&self, session_token: &str) -> Result<bool> {
        let result = self
            .sessions
            .delete_one(doc! { "session_token": session_token })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn save_message(&self, message: ClientMessage) -> Result<()> {
        self.messages.insert_one(MongoMessage::from(message)).await?;
        Ok(())
    }

    async fn list_messages(&self, client_id: &str) -> Result<Vec<ClientMessage>> {
        let messages: Vec<MongoMessage> = self
            .messages
            .find(doc! { "client_id": client_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }
}
