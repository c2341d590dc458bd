pub mod auth;
pub mod client;
pub mod events;
pub mod financial;
pub mod message;
pub mod report;

pub use auth::{AuthToken, Session};
pub use client::{Client, ClientMessage};
pub use events::{ChatStreamEvent, ClientEvent, ServerEvent};
pub use financial::{Assets, FinancialData, Goal, Goals, Horizon, Liabilities};
pub use message::{ChatMessage, EntryKind, Role, TranscriptEntry};
pub use report::{Report, ReportSection, ReportSummary, ReportTemplate};
