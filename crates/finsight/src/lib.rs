//! # Finsight
//!
//! Backend building blocks for a financial-advisory chatbot: conversation
//! memory, keyword intent routing, templated report generation with
//! best-effort figure extraction, HTML report rendering and passcode-based
//! client access.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use finsight::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = ClientFactory::create_chat_client(ProviderConfig::openai(
//!         std::env::var("OPENAI_API_KEY")?,
//!     ))?;
//!
//!     let advisor = AdvisorBuilder::new()
//!         .llm_client(llm)
//!         .stores(Stores::in_memory())
//!         .build();
//!
//!     let turn = advisor
//!         .chat("conversation-123", "I have 20000 in my TFSA", None)
//!         .await;
//!     println!("{}", turn.reply);
//!
//!     let report = advisor
//!         .generate_report(Some("Jane Doe"), "conversation-123")
//!         .await?;
//!     println!("View at {}", report.report_url);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`finsight-types`**: shared domain model and wire events
//! - **`finsight-llm`**: provider-agnostic chat client with an OpenAI implementation
//! - **`finsight-persist`**: store traits with in-memory and MongoDB backends
//! - **`finsight-memory`**: exchange-pair conversation memory, summaries and search
//! - **`finsight-report`**: template selection, prompt building, extraction and rendering
//! - **`finsight-auth`**: passcodes, sessions and the mailer seam
//! - **`finsight-agent`**: intent router and the `Advisor` orchestrator
//!
//! The HTTP and WebSocket server lives in the `finsight-api` binary crate.

pub mod prelude;

pub use finsight_types::{
    AuthToken, ChatMessage, ChatStreamEvent, Client, ClientEvent, ClientMessage, FinancialData,
    Report, ReportSection, ReportSummary, ReportTemplate, Role, ServerEvent, Session,
    TranscriptEntry,
};

pub use finsight_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ClientFactory, Content, Message,
    ModelSettings, OpenAIClient, ProviderConfig,
};

pub use finsight_persist::{
    AuthTokenStore, ClientStore, MemoryStore, MessageStore, PersistError, PreferenceStore,
    ReportStore, SessionStore, Stores, StoresBuilder, TranscriptStore,
};

#[cfg(feature = "mongodb")]
pub use finsight_persist::MongoStore;

pub use finsight_memory::{
    ConversationMemory, ExchangeIndex, KeywordIndex, SearchHit, TextSplitter,
};

pub use finsight_report::{
    render_financial_section, render_report_page, select_template, FinancialDataExtractor,
    ReportPrompt,
};

pub use finsight_auth::{AuthError, AuthService, AuthSettings, LogMailer, Mailer};

pub use finsight_agent::{
    Advisor, AdvisorBuilder, AdvisorError, ChatTurn, Intent, KeywordRouter, ReportOutcome,
    Router,
};
