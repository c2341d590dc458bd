pub mod advisor;
pub mod builder;
pub mod error;
pub mod replies;
pub mod router;

pub use advisor::{Advisor, ChatTurn, ReportOutcome, CHAT_CONTEXT_MESSAGES, DEFAULT_CLIENT_NAME};
pub use builder::{AdvisorBuilder, DEFAULT_PUBLIC_URL};
pub use error::{AdvisorError, Result};
pub use router::{route_intent, Intent, IntentRule, KeywordRouter, Router};
