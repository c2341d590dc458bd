use std::sync::{Arc, OnceLock};

use finsight_llm::{ChatClient, Message, ModelSettings};
use finsight_types::{ChatMessage, FinancialData};
use regex::Regex;
use serde_json::Value;

use crate::prompt::conversation_text;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("model call failed: {0}")]
    Llm(#[from] anyhow::Error),

    #[error("no JSON object in model output")]
    NoJson,

    #[error("invalid JSON in model output: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output is not a JSON object")]
    NotAnObject,
}

fn json_object_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)\{.*\}").ok())
        .as_ref()
}

/// Pull the outermost `{...}` span out of free-form model output.
///
/// The result is passed through as-is; it is only required to be a JSON
/// object, not to match the [`FinancialData`] shape.
pub fn parse_financial_json(output: &str) -> Result<Value, ExtractError> {
    let span = json_object_pattern()
        .and_then(|re| re.find(output))
        .ok_or(ExtractError::NoJson)?;
    let value: Value = serde_json::from_str(span.as_str())?;
    if !value.is_object() {
        return Err(ExtractError::NotAnObject);
    }
    Ok(value)
}

fn extraction_prompt(client_name: &str, conversation: &str) -> String {
    format!(
        r#"Analyze the following conversation between a financial advisor and {client_name} and extract any mentioned financial information.

Conversation: {conversation}

Please extract and return ONLY the financial data mentioned in the conversation in this JSON format:
{{
    "assets": {{
        "rrsp": 0,
        "tfsa": 0,
        "investments": 0,
        "realEstate": 0,
        "totalAssets": 0
    }},
    "liabilities": {{
        "mortgage": 0,
        "carLoan": 0,
        "creditCards": 0,
        "totalLiabilities": 0
    }},
    "netWorth": 0,
    "goals": {{
        "shortTerm": [],
        "mediumTerm": [],
        "longTerm": []
    }}
}}

Rules:
- Only include financial data that was explicitly mentioned in the conversation
- If no specific amounts were mentioned, use 0
- For goals, only include goals that were specifically discussed
- Return ONLY the JSON, no other text"#
    )
}

/// Best-effort extraction of structured financial figures from a
/// conversation via one model call
#[derive(Clone)]
pub struct FinancialDataExtractor {
    client: Arc<dyn ChatClient>,
    settings: ModelSettings,
}

impl FinancialDataExtractor {
    pub fn new(client: Arc<dyn ChatClient>, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    /// Fallible variant used by callers that want to see why extraction
    /// failed
    pub async fn try_extract(
        &self,
        client_name: &str,
        history: &[ChatMessage],
    ) -> Result<Value, ExtractError> {
        let prompt = extraction_prompt(client_name, &conversation_text(history));
        let response = self
            .client
            .chat(self.settings.request(vec![Message::human(prompt)]))
            .await?;

        parse_financial_json(response.content_or_empty())
    }

    /// Extract financial data, falling back to the all-zero default.
    ///
    /// Empty history short-circuits without calling the model. Never fails.
    pub async fn extract(&self, client_name: &str, history: &[ChatMessage]) -> Value {
        if history.is_empty() {
            tracing::debug!(client_name = %client_name, "No history, using empty financial data");
            return FinancialData::default().to_value();
        }

        match self.try_extract(client_name, history).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(client_name = %client_name, "Financial data extraction failed: {}", e);
                FinancialData::default().to_value()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_wrapped_in_prose() {
        let output = "Here you go:\n{\"netWorth\": 5000, \"assets\": {\"rrsp\": 1}}\nThanks!";
        let value = parse_financial_json(output).unwrap();
        assert_eq!(value["netWorth"], json!(5000));
        assert_eq!(value["assets"]["rrsp"], json!(1));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_financial_json("no data here"),
            Err(ExtractError::NoJson)
        ));
        assert!(matches!(
            parse_financial_json("{not json}"),
            Err(ExtractError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_prompt_embeds_conversation() {
        let prompt = extraction_prompt("Jane", "I have 5000 in my RRSP");
        assert!(prompt.contains("financial advisor and Jane"));
        assert!(prompt.contains("Conversation: I have 5000 in my RRSP"));
        assert!(prompt.contains("\"realEstate\": 0"));
    }
}
