use axum::{
    extract::{Path, State},
    Json,
};
use finsight_persist::{ClientStore, MessageStore};
use finsight_types::{Client, ClientMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub age: Option<u32>,
    pub income: Option<f64>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub notes: String,
    pub is_active: Option<bool>,
}

impl CreateClientRequest {
    fn into_client(self) -> ApiResult<Client> {
        for (field, value) in [("name", &self.name), ("email", &self.email)] {
            if value.trim().is_empty() {
                return Err(ApiError::BadRequest(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }

        let mut client = Client::new(self.name.trim(), &self.email);
        client.phone = self.phone;
        client.age = self.age;
        client.income = self.income;
        client.occupation = self.occupation;
        client.goals = self.goals;
        client.notes = self.notes;
        client.is_active = self.is_active.unwrap_or(true);
        Ok(client)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub success: bool,
    pub clients: Vec<Client>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientResponse {
    pub success: bool,
    pub client: Client,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientMessagesResponse {
    pub success: bool,
    pub messages: Vec<ClientMessage>,
}

/// List registered clients
#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "Registered clients", body = ClientListResponse)
    ),
    tag = "clients"
)]
pub async fn list_clients(State(state): State<Arc<AppState>>) -> ApiResult<Json<ClientListResponse>> {
    let clients = state.stores.clients.list_clients().await?;
    Ok(Json(ClientListResponse {
        success: true,
        clients,
    }))
}

/// Register a client; its e-mail becomes eligible for passcode access
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 200, description = "Client created", body = ClientResponse),
        (status = 400, description = "Missing name or email")
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClientRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let client = req.into_client()?;
    let client = state.stores.clients.insert_client(client).await?;

    tracing::info!(client_id = %client.id, "Client created");
    Ok(Json(ClientResponse {
        success: true,
        client,
    }))
}

/// Chat turns logged against a client, in creation order
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/messages",
    params(("client_id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Logged messages", body = ClientMessagesResponse),
        (status = 404, description = "Client not found")
    ),
    tag = "clients"
)]
pub async fn list_client_messages(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<ClientMessagesResponse>> {
    if state.stores.clients.get_client(&client_id).await?.is_none() {
        return Err(ApiError::ClientNotFound(client_id));
    }

    let messages = state.stores.messages.list_messages(&client_id).await?;
    Ok(Json(ClientMessagesResponse {
        success: true,
        messages,
    }))
}
