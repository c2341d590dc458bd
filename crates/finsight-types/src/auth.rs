use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-time passcode issued to an authorized e-mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: String,
    pub email: String,
    pub passcode: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(
        email: impl Into<String>,
        passcode: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            passcode: passcode.into(),
            expires_at,
            used: false,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_origin(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    /// Unused and strictly before expiry
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }
}

/// Bearer session created after a successful passcode verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        email: impl Into<String>,
        session_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            session_token: session_token.into(),
            expires_at,
            last_accessed: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_redeemable_window() {
        let now = Utc::now();
        let token = AuthToken::new("a@b.com", "123456", now + Duration::minutes(15));

        assert!(token.is_redeemable_at(now));
        assert!(!token.is_redeemable_at(now + Duration::minutes(15)));

        let used = AuthToken { used: true, ..token };
        assert!(!used.is_redeemable_at(now));
    }
}
