use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use finsight_auth::{AuthError, RequestOrigin};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub success: bool,
    pub message: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: String,
    /// The e-mailed passcode
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub session_token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

fn bearer_token(headers: &HeaderMap) -> &str {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    value.strip_prefix("Bearer ").unwrap_or(value).trim()
}

fn request_origin(headers: &HeaderMap, peer: Option<SocketAddr>) -> RequestOrigin {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());

    RequestOrigin {
        ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

/// E-mail a one-time passcode to an authorized client
#[utoipa::path(
    post,
    path = "/api/auth/request-access",
    request_body = AccessRequest,
    responses(
        (status = 200, description = "Passcode sent", body = AccessResponse),
        (status = 400, description = "Missing email"),
        (status = 403, description = "Email not authorized")
    ),
    tag = "auth"
)]
pub async fn request_access(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<AccessRequest>,
) -> ApiResult<Json<AccessResponse>> {
    let origin = request_origin(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let email = state.auth.request_access(&req.email, origin).await?;

    Ok(Json(AccessResponse {
        success: true,
        message: "Passcode sent to your email".to_string(),
        email,
    }))
}

/// Redeem a passcode for a session token
#[utoipa::path(
    post,
    path = "/api/auth/verify-token",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Access granted", body = VerifyResponse),
        (status = 400, description = "Missing email or token"),
        (status = 401, description = "Invalid, expired or reused passcode")
    ),
    tag = "auth"
)]
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let grant = state.auth.verify_passcode(&req.email, &req.token).await?;

    Ok(Json(VerifyResponse {
        success: true,
        message: "Access granted".to_string(),
        session_token: grant.session_token,
        email: grant.email,
        expires_at: grant.expires_at,
    }))
}

/// Check the bearer session token
#[utoipa::path(
    get,
    path = "/api/auth/validate-session",
    responses(
        (status = 200, description = "Session is live", body = SessionStatus),
        (status = 401, description = "Missing, unknown or expired session", body = SessionStatus),
        (status = 500, description = "Session storage unavailable")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn validate_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<SessionStatus>)> {
    match state.auth.validate_session(bearer_token(&headers)).await {
        Ok(email) => Ok((
            StatusCode::OK,
            Json(SessionStatus {
                authenticated: true,
                email: Some(email),
            }),
        )),
        Err(AuthError::InvalidSession) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(SessionStatus {
                authenticated: false,
                email: None,
            }),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Drop the bearer session; succeeds even when no session matches
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<LogoutResponse>> {
    state.auth.logout(bearer_token(&headers)).await?;

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_strips_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), "");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), "abc123");
    }

    #[test]
    fn test_request_origin_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 10.0.0.1"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let peer: SocketAddr = "127.0.0.1:9000".parse().unwrap();

        let origin = request_origin(&headers, Some(peer));
        assert_eq!(origin.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(origin.user_agent.as_deref(), Some("curl/8.0"));

        let origin = request_origin(&HeaderMap::new(), Some(peer));
        assert_eq!(origin.ip_address.as_deref(), Some("127.0.0.1"));
    }
}
