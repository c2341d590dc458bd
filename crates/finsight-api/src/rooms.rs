use std::collections::HashMap;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use finsight_types::ServerEvent;
use tokio::sync::{mpsc::UnboundedSender, RwLock};
use uuid::Uuid;

#[derive(Debug)]
struct Connection {
    tx: UnboundedSender<Message>,
    conversation_id: Option<String>,
    client_name: Option<String>,
    connected_at: DateTime<Utc>,
}

/// What the hub knows about one live socket
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
    pub conversation_id: Option<String>,
    pub client_name: Option<String>,
    pub connected_at: DateTime<Utc>,
}

/// Live WebSocket connections grouped into rooms keyed by conversation id.
///
/// Delivery is fire-and-forget: a closed receiver is logged and skipped.
#[derive(Debug, Default)]
pub struct RoomHub {
    connections: RwLock<HashMap<Uuid, Connection>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, connection_id: Uuid, tx: UnboundedSender<Message>) {
        self.connections.write().await.insert(
            connection_id,
            Connection {
                tx,
                conversation_id: None,
                client_name: None,
                connected_at: Utc::now(),
            },
        );
    }

    /// Move a connection into `conversation_id`'s room. A connection is in at
    /// most one room.
    pub async fn join(&self, connection_id: Uuid, conversation_id: &str, client_name: Option<String>) {
        if let Some(connection) = self.connections.write().await.get_mut(&connection_id) {
            connection.conversation_id = Some(conversation_id.to_string());
            if client_name.is_some() {
                connection.client_name = client_name;
            }
        }
    }

    pub async fn remove(&self, connection_id: Uuid) {
        self.connections.write().await.remove(&connection_id);
    }

    pub async fn info(&self, connection_id: Uuid) -> Option<ConnectionInfo> {
        self.connections
            .read()
            .await
            .get(&connection_id)
            .map(|c| ConnectionInfo {
                conversation_id: c.conversation_id.clone(),
                client_name: c.client_name.clone(),
                connected_at: c.connected_at,
            })
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn room_size(&self, conversation_id: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.conversation_id.as_deref() == Some(conversation_id))
            .count()
    }

    /// Send an event to a single connection
    pub async fn send_to(&self, connection_id: Uuid, event: &ServerEvent) {
        let Ok(text) = serde_json::to_string(event) else {
            return;
        };
        if let Some(connection) = self.connections.read().await.get(&connection_id) {
            if let Err(e) = connection.tx.send(Message::Text(text)) {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = ?e,
                    "Failed to send event over WebSocket"
                );
            }
        }
    }

    /// Send an event to every connection in the room
    pub async fn broadcast(&self, conversation_id: &str, event: &ServerEvent) {
        let Ok(text) = serde_json::to_string(event) else {
            return;
        };
        let connections = self.connections.read().await;
        for (connection_id, connection) in connections.iter() {
            if connection.conversation_id.as_deref() != Some(conversation_id) {
                continue;
            }
            if let Err(e) = connection.tx.send(Message::Text(text.clone())) {
                tracing::warn!(
                    connection_id = %connection_id,
                    conversation_id = %conversation_id,
                    error = ?e,
                    "Failed to broadcast event over WebSocket"
                );
            }
        }
    }
}
