//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use finsight::prelude::*;
//! ```

pub use crate::{
    Advisor, AdvisorBuilder, AdvisorError, ChatTurn, Intent, ReportOutcome,
    ChatClient, ChatRequest, ChatResponse, ClientFactory, Message, ModelSettings, OpenAIClient,
    ProviderConfig,
    ConversationMemory, KeywordIndex,
    Stores, StoresBuilder,
    AuthService, AuthSettings, LogMailer, Mailer,
    FinancialData, Report, ReportTemplate, Role,
};
