use finsight_persist::PersistError;
use thiserror::Error;

use crate::mailer::MailError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Email not authorized. Please contact your financial advisor.")]
    NotAuthorized,

    #[error("Invalid or expired passcode")]
    InvalidPasscode,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Storage error: {0}")]
    Store(#[from] PersistError),

    #[error("Failed to send passcode email: {0}")]
    Mail(#[from] MailError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
