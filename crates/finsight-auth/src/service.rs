use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use finsight_persist::{AuthTokenStore, ClientStore, SessionStore};
use finsight_types::{AuthToken, Session};

use crate::error::{AuthError, Result};
use crate::mailer::{passcode_email, Mailer};
use crate::secret::{generate_passcode, generate_session_token};

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub passcode_length: usize,
    pub passcode_ttl: Duration,
    pub session_ttl: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            passcode_length: 6,
            passcode_ttl: Duration::minutes(15),
            session_ttl: Duration::hours(24),
        }
    }
}

/// Where an access request came from, stored alongside the passcode
#[derive(Debug, Clone, Default)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionGrant {
    pub email: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthService {
    clients: Arc<dyn ClientStore>,
    tokens: Arc<dyn AuthTokenStore>,
    sessions: Arc<dyn SessionStore>,
    mailer: Arc<dyn Mailer>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        clients: Arc<dyn ClientStore>,
        tokens: Arc<dyn AuthTokenStore>,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            clients,
            tokens,
            sessions,
            mailer,
            settings: AuthSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: AuthSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Issue and mail a passcode to an active client.
    ///
    /// Returns the normalized e-mail. Unknown or inactive e-mails are
    /// rejected before anything is stored or sent.
    pub async fn request_access(&self, email: &str, origin: RequestOrigin) -> Result<String> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required"));
        }

        if self.clients.find_active_client(&email).await?.is_none() {
            tracing::info!(email = %email, "Access requested for unauthorized email");
            return Err(AuthError::NotAuthorized);
        }

        let passcode = generate_passcode(self.settings.passcode_length);
        let expires_at = Utc::now() + self.settings.passcode_ttl;
        let token = AuthToken::new(email.clone(), passcode.clone(), expires_at)
            .with_origin(origin.ip_address, origin.user_agent);
        self.tokens.insert_token(token).await?;

        let message = passcode_email(&email, &passcode, self.settings.passcode_ttl.num_minutes());
        self.mailer.send(&message).await?;

        tracing::info!(email = %email, "Passcode issued");
        Ok(email)
    }

    /// Redeem a passcode for a new session. Each passcode works once.
    pub async fn verify_passcode(&self, email: &str, passcode: &str) -> Result<SessionGrant> {
        let email = normalize_email(email);
        let passcode = passcode.trim();
        if email.is_empty() || passcode.is_empty() {
            return Err(AuthError::Validation("Email and token are required"));
        }

        let now = Utc::now();
        if self
            .tokens
            .consume_token(&email, passcode, now)
            .await?
            .is_none()
        {
            tracing::info!(email = %email, "Passcode rejected");
            return Err(AuthError::InvalidPasscode);
        }

        let session_token = generate_session_token();
        let expires_at = now + self.settings.session_ttl;
        self.sessions
            .insert_session(Session::new(email.clone(), session_token.clone(), expires_at))
            .await?;

        tracing::info!(email = %email, "Session created");
        Ok(SessionGrant {
            email,
            session_token,
            expires_at,
        })
    }

    /// E-mail owning a live session; refreshes its last-access time
    pub async fn validate_session(&self, session_token: &str) -> Result<String> {
        let session_token = session_token.trim();
        if session_token.is_empty() {
            return Err(AuthError::InvalidSession);
        }

        match self.sessions.touch_session(session_token, Utc::now()).await? {
            Some(session) => Ok(session.email),
            None => Err(AuthError::InvalidSession),
        }
    }

    /// Drop a session. Unknown or empty tokens are not an error.
    pub async fn logout(&self, session_token: &str) -> Result<bool> {
        let session_token = session_token.trim();
        if session_token.is_empty() {
            return Ok(false);
        }
        Ok(self.sessions.delete_session(session_token).await?)
    }
}
