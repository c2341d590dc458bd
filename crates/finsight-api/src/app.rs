use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    handlers::{stream, ws},
    middleware::logging,
    routes::{auth, chat, clients, conversations, health, reports},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::service_info,
        health::health_check,
        chat::chat,
        stream::chat_stream,
        reports::generate_report,
        reports::list_reports,
        reports::get_report,
        reports::view_report,
        reports::financial_data,
        conversations::conversation_summary,
        conversations::search_conversations,
        clients::list_clients,
        clients::create_client,
        clients::list_client_messages,
        auth::request_access,
        auth::verify_token,
        auth::validate_session,
        auth::logout,
        ws::ws_handler,
    ),
    tags(
        (name = "chat", description = "Advisor chat"),
        (name = "reports", description = "Report generation and viewing"),
        (name = "conversations", description = "Conversation memory"),
        (name = "clients", description = "Client registry"),
        (name = "auth", description = "Passcode access and sessions"),
        (name = "realtime", description = "WebSocket conversation rooms")
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Service info
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        // Chat
        .route("/api/chat", post(chat::chat))
        .route("/api/chat/stream", post(stream::chat_stream))
        // Reports
        .route("/api/generate-report", post(reports::generate_report))
        .route("/api/reports", get(reports::list_reports))
        .route("/api/reports/:report_id", get(reports::get_report))
        .route("/reports/:report_id", get(reports::view_report))
        .route(
            "/api/financial-data/:conversation_id",
            get(reports::financial_data),
        )
        // Conversations
        .route(
            "/api/conversation-summary/:conversation_id",
            get(conversations::conversation_summary),
        )
        .route(
            "/api/search-conversations",
            post(conversations::search_conversations),
        )
        // Clients
        .route(
            "/api/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/clients/:client_id/messages",
            get(clients::list_client_messages),
        )
        // Auth
        .route("/api/auth/request-access", post(auth::request_access))
        .route("/api/auth/verify-token", post(auth::verify_token))
        .route("/api/auth/validate-session", get(auth::validate_session))
        .route("/api/auth/logout", post(auth::logout))
        // Real-time rooms
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300))) // report generation is slow
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
