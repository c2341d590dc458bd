use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Role;

/// Advisory client. Access is gated on `email` plus `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// New active client. The e-mail is normalized to trimmed lower case.
    pub fn new(name: impl Into<String>, email: impl AsRef<str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.as_ref().trim().to_lowercase(),
            phone: String::new(),
            age: None,
            income: None,
            occupation: String::new(),
            goals: String::new(),
            notes: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Chat turn logged against a client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub id: String,
    pub client_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ClientMessage {
    pub fn new(client_id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
