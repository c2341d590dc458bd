use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::TranscriptEntry;

/// Newline-delimited events emitted by the streamed chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// Request accepted, model call in flight
    Loading,

    /// Complete assistant reply
    Message { content: String },

    Done,

    Error { message: String },
}

/// Frames sent by real-time clients: `{"event": ..., "data": {...}}`
///
/// Fields are optional on the wire so a missing value can be reported back
/// as an `error` event instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinConversation {
        conversation_id: Option<String>,
        client_name: Option<String>,
    },
    SendMessage {
        message: Option<String>,
        conversation_id: Option<String>,
        client_name: Option<String>,
    },
    GenerateReport {
        conversation_id: Option<String>,
        client_name: Option<String>,
    },
}

/// Frames pushed to real-time clients, either to the sender or to a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        message: String,
    },
    ConversationHistory {
        history: Vec<TranscriptEntry>,
        preferences: String,
    },
    ConversationInitialized {
        conversation_id: String,
    },
    MessageResponse {
        message: String,
        conversation_id: String,
        timestamp: DateTime<Utc>,
    },
    ConversationUpdated {
        history: Vec<TranscriptEntry>,
        preferences: String,
    },
    ReportGenerationStarted {
        message: String,
        conversation_id: String,
    },
    ReportGenerated {
        success: bool,
        report_id: String,
        report_url: String,
        message: String,
        conversation_id: String,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
