use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Tag used when a turn is quoted in summaries and indexed exchange text
    pub fn tag(&self) -> &'static str {
        match self {
            Self::User => "Human",
            Self::Assistant => "AI",
        }
    }
}

/// A committed conversation turn. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    ReportGeneration,
}

/// Line of the real-time transcript replayed to clients joining a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            client_name: Some(client_name.into()),
            kind: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            client_name: None,
            kind: None,
        }
    }

    pub fn report_notice(content: impl Into<String>) -> Self {
        Self {
            kind: Some(EntryKind::ReportGeneration),
            ..Self::assistant(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.tag(), "Human");
        assert_eq!(Role::Assistant.tag(), "AI");
    }

    #[test]
    fn test_report_notice_serializes_type() {
        let entry = TranscriptEntry::report_notice("done");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["type"], "report_generation");
        assert!(json.get("client_name").is_none());
    }
}
