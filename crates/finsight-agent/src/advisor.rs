use std::sync::Arc;

use chrono::Utc;
use finsight_llm::{ChatClient, Message, ModelSettings};
use finsight_memory::{ConversationMemory, DEFAULT_HISTORY_LIMIT};
use finsight_persist::{MessageStore, PreferenceStore, ReportStore, Stores};
use finsight_report::{select_template, FinancialDataExtractor, ReportPrompt};
use finsight_types::{ChatMessage, ClientMessage, FinancialData, Report, Role};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AdvisorError, Result};
use crate::replies;
use crate::router::{Intent, Router};

/// Messages of committed history sent along with a general-chat turn
pub const CHAT_CONTEXT_MESSAGES: usize = 6;

pub const DEFAULT_CLIENT_NAME: &str = "Unknown Client";

/// Result of one chat turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub conversation_id: String,
    pub intent: Intent,
    pub reply: String,
}

/// A stored report and where to view it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutcome {
    pub report_id: String,
    pub report_url: String,
    pub client_name: String,
    pub message: String,
}

/// Orchestrates chat turns and report generation over the memory manager,
/// stores and an optional language model.
///
/// Built with [`crate::AdvisorBuilder`].
pub struct Advisor {
    pub(crate) llm: Option<Arc<dyn ChatClient>>,
    pub(crate) settings: ModelSettings,
    pub(crate) memory: Arc<ConversationMemory>,
    pub(crate) stores: Stores,
    pub(crate) router: Arc<dyn Router>,
    pub(crate) public_url: String,
}

impl Advisor {
    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn memory(&self) -> &Arc<ConversationMemory> {
        &self.memory
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn report_url(&self, report_id: &str) -> String {
        format!("{}/reports/{}", self.public_url.trim_end_matches('/'), report_id)
    }

    /// Handle one user message and return the assistant reply.
    ///
    /// Never fails: model errors become apology text and persistence
    /// failures are logged. Both turns are recorded in memory and, when
    /// `client_id` is given, in the client message log.
    pub async fn chat(
        &self,
        conversation_id: &str,
        message: &str,
        client_id: Option<&str>,
    ) -> ChatTurn {
        // 1. Buffer the user turn
        self.memory.record(conversation_id, Role::User, message).await;
        self.log_client_message(client_id, Role::User, message).await;

        // 2. Route and answer
        let intent = self.router.route(message);
        tracing::info!(conversation_id = %conversation_id, intent = ?intent, "Routing chat message");

        let reply = match intent {
            Intent::RestructureReport => {
                if let Err(e) = self
                    .stores
                    .preferences
                    .put_preference(conversation_id, message.to_string())
                    .await
                {
                    tracing::error!(conversation_id = %conversation_id, "Failed to save preference: {}", e);
                }
                replies::restructure_ack(message)
            }
            Intent::GenerateReport => replies::REPORT_GUIDANCE.to_string(),
            Intent::GeneralChat => self.general_reply(conversation_id, message).await,
        };

        // 3. Commit the exchange
        self.memory
            .record(conversation_id, Role::Assistant, &reply)
            .await;
        self.log_client_message(client_id, Role::Assistant, &reply).await;

        ChatTurn {
            conversation_id: conversation_id.to_string(),
            intent,
            reply,
        }
    }

    async fn general_reply(&self, conversation_id: &str, message: &str) -> String {
        let Some(llm) = &self.llm else {
            tracing::warn!("Chat requested without a configured language model");
            return replies::NOT_CONFIGURED.to_string();
        };

        let history = self
            .memory
            .history(conversation_id, CHAT_CONTEXT_MESSAGES)
            .await;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(replies::SYSTEM_PROMPT));
        messages.extend(history.iter().map(to_llm_message));
        messages.push(Message::human(message));

        match llm.chat(self.settings.request(messages)).await {
            Ok(response) => response.content_or_empty().to_string(),
            Err(e) => {
                tracing::error!(conversation_id = %conversation_id, "Chat completion failed: {}", e);
                replies::llm_error(&e)
            }
        }
    }

    async fn log_client_message(&self, client_id: Option<&str>, role: Role, content: &str) {
        let Some(client_id) = client_id.filter(|id| !id.is_empty()) else {
            return;
        };
        let message = ClientMessage::new(client_id, role, content);
        if let Err(e) = self.stores.messages.save_message(message).await {
            tracing::warn!(client_id = %client_id, "Failed to save client message: {}", e);
        }
    }

    fn extractor(&self) -> Option<FinancialDataExtractor> {
        self.llm
            .as_ref()
            .map(|llm| FinancialDataExtractor::new(llm.clone(), self.settings.clone()))
    }

    /// Financial figures mentioned in the conversation, or the all-zero
    /// default when nothing can be extracted
    pub async fn financial_data(&self, conversation_id: &str, client_name: &str) -> Value {
        let Some(extractor) = self.extractor() else {
            return FinancialData::default().to_value();
        };
        let history = self
            .memory
            .history(conversation_id, DEFAULT_HISTORY_LIMIT)
            .await;
        extractor.extract(client_name, &history).await
    }

    /// Generate, store and link a report for the conversation.
    ///
    /// Extraction failures degrade to default figures; a failed report
    /// completion is returned as an error and nothing is stored.
    pub async fn generate_report(
        &self,
        client_name: Option<&str>,
        conversation_id: &str,
    ) -> Result<ReportOutcome> {
        let llm = self.llm.as_ref().ok_or(AdvisorError::NotConfigured)?;
        let client_name = client_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CLIENT_NAME);

        // 1. Inputs
        let history = self
            .memory
            .history(conversation_id, DEFAULT_HISTORY_LIMIT)
            .await;
        let preference = self
            .stores
            .preferences
            .get_preference(conversation_id)
            .await?
            .unwrap_or_default();
        let template = select_template(&preference);
        tracing::info!(
            conversation_id = %conversation_id,
            template = template.name(),
            "Generating report"
        );

        // 2. Figures for tables and charts
        let financial_data = match self.extractor() {
            Some(extractor) => extractor.extract(client_name, &history).await,
            None => FinancialData::default().to_value(),
        };

        // 3. Report body
        let prompt = ReportPrompt::new(client_name, template, Utc::now().date_naive())
            .preference(&preference)
            .history(&history)
            .build();
        let response = llm
            .chat(self.settings.request(vec![Message::human(prompt)]))
            .await
            .map_err(AdvisorError::Llm)?;

        // 4. Store
        let report = Report::new(
            client_name,
            response.content_or_empty(),
            financial_data,
            conversation_id,
            preference,
        );
        let report_id = report.id.clone();
        self.stores.reports.put_report(report).await?;

        tracing::info!(conversation_id = %conversation_id, report_id = %report_id, "Report stored");
        Ok(ReportOutcome {
            report_url: self.report_url(&report_id),
            report_id,
            client_name: client_name.to_string(),
            message: replies::report_generated(client_name),
        })
    }
}

fn to_llm_message(message: &ChatMessage) -> Message {
    match message.role {
        Role::User => Message::human(message.content.as_str()),
        Role::Assistant => Message::ai(message.content.as_str()),
    }
}
