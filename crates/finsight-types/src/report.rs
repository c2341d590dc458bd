use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated report. Created once per generation request and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub client_name: String,
    /// Raw markdown returned by the model
    pub content: String,
    /// Extractor output, kept untyped so incomplete objects surface at render time
    pub financial_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub conversation_id: String,
    /// Customization preference in effect when the report was generated
    pub user_preference: String,
}

impl Report {
    pub fn new(
        client_name: impl Into<String>,
        content: impl Into<String>,
        financial_data: serde_json::Value,
        conversation_id: impl Into<String>,
        user_preference: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            content: content.into(),
            financial_data,
            created_at: Utc::now(),
            conversation_id: conversation_id.into(),
            user_preference: user_preference.into(),
        }
    }

    pub fn summary(&self, url: impl Into<String>) -> ReportSummary {
        ReportSummary {
            id: self.id.clone(),
            client_name: self.client_name.clone(),
            created_at: self.created_at,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportSection {
    ExecutiveSummary,
    FinancialHealthAssessment,
    RecommendedInvestmentStrategy,
    RiskAnalysis,
    RetirementPlanning,
    TaxOptimizationOpportunities,
    ActionItemsAndNextSteps,
}

impl ReportSection {
    pub fn title(&self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "EXECUTIVE SUMMARY",
            Self::FinancialHealthAssessment => "FINANCIAL HEALTH ASSESSMENT",
            Self::RecommendedInvestmentStrategy => "RECOMMENDED INVESTMENT STRATEGY",
            Self::RiskAnalysis => "RISK ANALYSIS",
            Self::RetirementPlanning => "RETIREMENT PLANNING",
            Self::TaxOptimizationOpportunities => "TAX OPTIMIZATION OPPORTUNITIES",
            Self::ActionItemsAndNextSteps => "ACTION ITEMS AND NEXT STEPS",
        }
    }
}

/// Fixed section orderings compiled into the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTemplate {
    #[default]
    Default,
    RetirementFocused,
    TaxFocused,
}

impl ReportTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::RetirementFocused => "retirement_focused",
            Self::TaxFocused => "tax_focused",
        }
    }

    pub fn sections(&self) -> &'static [ReportSection] {
        use ReportSection::*;

        match self {
            Self::Default => &[
                ExecutiveSummary,
                FinancialHealthAssessment,
                RecommendedInvestmentStrategy,
                RiskAnalysis,
                RetirementPlanning,
                TaxOptimizationOpportunities,
                ActionItemsAndNextSteps,
            ],
            Self::RetirementFocused => &[
                RetirementPlanning,
                ExecutiveSummary,
                FinancialHealthAssessment,
                RecommendedInvestmentStrategy,
                TaxOptimizationOpportunities,
                RiskAnalysis,
                ActionItemsAndNextSteps,
            ],
            Self::TaxFocused => &[
                TaxOptimizationOpportunities,
                ExecutiveSummary,
                FinancialHealthAssessment,
                RecommendedInvestmentStrategy,
                RetirementPlanning,
                RiskAnalysis,
                ActionItemsAndNextSteps,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_lists_all_sections_once() {
        for template in [
            ReportTemplate::Default,
            ReportTemplate::RetirementFocused,
            ReportTemplate::TaxFocused,
        ] {
            let sections = template.sections();
            assert_eq!(sections.len(), 7, "{}", template.name());
            for section in ReportTemplate::Default.sections() {
                assert!(sections.contains(section));
            }
        }
    }

    #[test]
    fn test_focused_templates_lead_with_focus() {
        assert_eq!(
            ReportTemplate::RetirementFocused.sections()[0],
            ReportSection::RetirementPlanning
        );
        assert_eq!(
            ReportTemplate::TaxFocused.sections()[0],
            ReportSection::TaxOptimizationOpportunities
        );
    }

    #[test]
    fn test_template_wire_name() {
        let json = serde_json::to_string(&ReportTemplate::RetirementFocused).unwrap();
        assert_eq!(json, "\"retirement_focused\"");
    }
}
