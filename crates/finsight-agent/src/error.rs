use finsight_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("language model is not configured")]
    NotConfigured,

    #[error("language model call failed: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("storage error: {0}")]
    Store(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
