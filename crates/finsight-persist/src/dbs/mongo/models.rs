use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use finsight_types::{AuthToken, Client, ClientMessage, Report, Role, Session};

// Timestamps are stored as native BSON dates so range filters compare correctly.

/// `clients` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoClient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub notes: String,
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// `authorization_tokens` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAuthToken {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub passcode: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// `client_sessions` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub session_token: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub last_accessed: Option<bson::DateTime>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// `messages` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub client_id: String,
    pub role: Role,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// `financial_reports` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoReport {
    #[serde(rename = "_id")]
    pub id: String,
    pub client_name: String,
    pub content: String,
    pub financial_data: serde_json::Value,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub conversation_id: String,
    pub user_preference: String,
}

// Conversions between domain and MongoDB-specific models

impl From<Client> for MongoClient {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            age: c.age,
            income: c.income,
            occupation: c.occupation,
            goals: c.goals,
            notes: c.notes,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<MongoClient> for Client {
    fn from(c: MongoClient) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            age: c.age,
            income: c.income,
            occupation: c.occupation,
            goals: c.goals,
            notes: c.notes,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<AuthToken> for MongoAuthToken {
    fn from(t: AuthToken) -> Self {
        Self {
            id: t.id,
            email: t.email,
            passcode: t.passcode,
            expires_at: t.expires_at,
            used: t.used,
            ip_address: t.ip_address,
            user_agent: t.user_agent,
            created_at: t.created_at,
        }
    }
}

impl From<MongoAuthToken> for AuthToken {
    fn from(t: MongoAuthToken) -> Self {
        Self {
            id: t.id,
            email: t.email,
            passcode: t.passcode,
            expires_at: t.expires_at,
            used: t.used,
            ip_address: t.ip_address,
            user_agent: t.user_agent,
            created_at: t.created_at,
        }
    }
}

impl From<Session> for MongoSession {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            email: s.email,
            session_token: s.session_token,
            expires_at: s.expires_at,
            last_accessed: s.last_accessed.map(bson::DateTime::from_chrono),
            created_at: s.created_at,
        }
    }
}

impl From<MongoSession> for Session {
    fn from(s: MongoSession) -> Self {
        Self {
            id: s.id,
            email: s.email,
            session_token: s.session_token,
            expires_at: s.expires_at,
            last_accessed: s.last_accessed.map(|d| d.to_chrono()),
            created_at: s.created_at,
        }
    }
}

impl From<ClientMessage> for MongoMessage {
    fn from(m: ClientMessage) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

impl From<MongoMessage> for ClientMessage {
    fn from(m: MongoMessage) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

impl From<Report> for MongoReport {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            client_name: r.client_name,
            content: r.content,
            financial_data: r.financial_data,
            created_at: r.created_at,
            conversation_id: r.conversation_id,
            user_preference: r.user_preference,
        }
    }
}

impl From<MongoReport> for Report {
    fn from(r: MongoReport) -> Self {
        Self {
            id: r.id,
            client_name: r.client_name,
            content: r.content,
            financial_data: r.financial_data,
            created_at: r.created_at,
            conversation_id: r.conversation_id,
            user_preference: r.user_preference,
        }
    }
}
