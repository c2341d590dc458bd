use serde::{Deserialize, Serialize};

/// What an incoming chat message is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Save the message as the report customization preference
    RestructureReport,
    /// Point the user at the report generation action
    GenerateReport,
    GeneralChat,
}

/// One routing rule: any phrase contained in the lower-cased message
/// selects `intent`
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub phrases: Vec<String>,
    pub intent: Intent,
}

impl IntentRule {
    pub fn new(intent: Intent, phrases: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
            intent,
        }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }
}

/// Decides which path handles a chat message
pub trait Router: Send + Sync {
    fn route(&self, message: &str) -> Intent;
}

/// Ordered rule list; the first matching rule wins and no match is
/// general chat
#[derive(Debug, Clone)]
pub struct KeywordRouter {
    rules: Vec<IntentRule>,
}

impl KeywordRouter {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

impl Default for KeywordRouter {
    /// Restructuring phrases are checked before generation phrases
    fn default() -> Self {
        Self::new(vec![
            IntentRule::new(
                Intent::RestructureReport,
                &[
                    "restructure report",
                    "reorganize report",
                    "change report",
                    "modify report",
                    "customize report",
                    "focus on",
                    "prioritize",
                    "emphasize",
                ],
            ),
            IntentRule::new(
                Intent::GenerateReport,
                &[
                    "generate report",
                    "create report",
                    "financial report",
                    "make a report",
                    "report generation",
                ],
            ),
        ])
    }
}

impl Router for KeywordRouter {
    fn route(&self, message: &str) -> Intent {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(Intent::GeneralChat, |rule| rule.intent)
    }
}

/// Route with the default rule set
pub fn route_intent(message: &str) -> Intent {
    KeywordRouter::default().route(message)
}
