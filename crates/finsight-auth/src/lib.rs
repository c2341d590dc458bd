//! Passcode-based access for report viewers.
//!
//! An active client requests access with their e-mail, receives a short
//! numeric passcode, and trades it once for a bearer session token.

mod error;
mod mailer;
mod secret;
mod service;

pub use error::{AuthError, Result};
pub use mailer::{passcode_email, LogMailer, MailError, Mailer, OutgoingEmail, PASSCODE_SUBJECT};
pub use secret::{generate_passcode, generate_session_token};
pub use service::{AuthService, AuthSettings, RequestOrigin, SessionGrant};
