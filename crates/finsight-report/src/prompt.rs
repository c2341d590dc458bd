use chrono::NaiveDate;
use finsight_types::{ChatMessage, ReportSection, ReportTemplate};

/// Conversation context embedded in the report prompt is cut to this many
/// characters
pub const CONTEXT_CHAR_LIMIT: usize = 2000;

const GUARDRAILS: &str = "IMPORTANT INSTRUCTIONS:
- ONLY use financial information that was explicitly mentioned in the conversation above
- Do NOT include any hardcoded or example financial data
- If no specific financial information was discussed, indicate that in the report
- Base all recommendations on the actual conversation content
- Do not make up or assume any financial details not mentioned";

const DISCLAIMER: &str = "This report is for informational purposes only and does not constitute financial, investment, or tax advice. Please consult with qualified professionals before making financial decisions.";

const CLOSING: &str = "Make this report specific, actionable, and professional. Use clear formatting with bullet points and specific recommendations based ONLY on the conversation content.";

/// Guidance text written under each numbered section heading
pub fn section_guidance(section: ReportSection) -> &'static str {
    match section {
        ReportSection::ExecutiveSummary => {
            "Provide a high-level overview of the client's financial situation, key recommendations, and priority actions."
        }
        ReportSection::FinancialHealthAssessment => {
            "- **Assets:** Comprehensive breakdown of all assets
- **Liabilities:** Detailed analysis of debts and obligations
- **Net Worth:** Current net worth calculation and analysis
- **Income:** Income analysis and stability assessment
- **Expenses:** Expense breakdown and optimization opportunities
- **Debt-to-Income Ratio:** Current DTI and recommendations
- **Emergency Fund:** Assessment and recommendations
- **Savings Rate:** Current savings rate and improvement strategies"
        }
        ReportSection::RecommendedInvestmentStrategy => {
            "- **Asset Allocation:** Recommended portfolio allocation
- **Investment Vehicles:** Specific investment recommendations
- **Diversification:** Diversification strategy and benefits
- **Rebalancing:** Rebalancing schedule and approach
- **Tax-Advantaged Accounts:** Optimization of retirement accounts"
        }
        ReportSection::RiskAnalysis => {
            "- **Market Risk:** Assessment and mitigation strategies
- **Inflation Risk:** Protection strategies
- **Interest Rate Risk:** Impact analysis and recommendations
- **Credit Risk:** Credit health assessment
- **Liquidity Risk:** Liquidity needs and management"
        }
        ReportSection::RetirementPlanning => {
            "- **Retirement Goals:** Target retirement age and income needs
- **Retirement Accounts:** RRSP and TFSA contribution strategies
- **Pension Integration:** CPP and OAS optimization
- **Withdrawal Strategy:** Tax-efficient retirement income planning"
        }
        ReportSection::TaxOptimizationOpportunities => {
            "- **Tax-Advantaged Accounts:** RRSP, TFSA, RESP optimization strategies
- **Tax-Loss Harvesting:** Opportunities and strategies
- **Income Splitting:** Family tax optimization techniques
- **Estate Planning:** Tax-efficient wealth transfer strategies"
        }
        ReportSection::ActionItemsAndNextSteps => {
            "- **Immediate Actions:** Steps to take in the next 30 days
- **Short-term Actions:** 3-6 month implementation plan
- **Long-term Actions:** 1-3 year strategic initiatives
- **Monitoring:** Regular review schedule and key metrics"
        }
    }
}

/// Message contents joined with single spaces
pub fn conversation_text(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builder for the report-generation prompt.
///
/// The output is a pure function of its inputs; callers pass the date so
/// prompts are reproducible in tests.
#[derive(Debug, Clone)]
pub struct ReportPrompt<'a> {
    client_name: &'a str,
    template: ReportTemplate,
    preference: &'a str,
    history: &'a [ChatMessage],
    date: NaiveDate,
}

impl<'a> ReportPrompt<'a> {
    pub fn new(client_name: &'a str, template: ReportTemplate, date: NaiveDate) -> Self {
        Self {
            client_name,
            template,
            preference: "",
            history: &[],
            date,
        }
    }

    pub fn preference(mut self, preference: &'a str) -> Self {
        self.preference = preference;
        self
    }

    pub fn history(mut self, history: &'a [ChatMessage]) -> Self {
        self.history = history;
        self
    }

    pub fn build(&self) -> String {
        let name = self.client_name;
        let mut structure = format!(
            "## Comprehensive Financial Report for {name}\n\n\
             **Prepared for:** {name}\n\
             **Prepared by:** Financial Assistant AI\n\
             **Date:** {}",
            self.date.format("%B %d, %Y")
        );

        if !self.history.is_empty() {
            let text = conversation_text(self.history);
            let context: String = text.chars().take(CONTEXT_CHAR_LIMIT).collect();
            structure.push_str(&format!(
                "\n\n**Conversation Context:**\nBased on the following conversation with {name}:\n{context}..."
            ));
        }

        for (i, section) in self.template.sections().iter().enumerate() {
            structure.push_str(&format!(
                "\n\n## {}. {}\n{}",
                i + 1,
                section.title(),
                section_guidance(*section)
            ));
        }

        if !self.preference.trim().is_empty() {
            structure.push_str(&format!(
                "\n\nIMPORTANT: The user has requested the following customization for this report:\n\
                 \"{}\"\n\n\
                 Please restructure and customize the report based on this preference. This may include:\n\
                 - Reordering sections to prioritize the user's areas of interest\n\
                 - Emphasizing specific topics mentioned in their preference\n\
                 - Adjusting the content focus to match their needs\n\
                 - Making the report more relevant to their specific request",
                self.preference
            ));
        }

        format!(
            "Create a comprehensive financial report for {name}. This should be a professional, detailed financial analysis report.\n\n\
             Format the report with the following structure:\n\n\
             {structure}\n\n\
             {GUARDRAILS}\n\n\
             {DISCLAIMER}\n\n\
             {CLOSING}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?}", needle))
    }

    #[test]
    fn test_header_and_sections_in_template_order() {
        let prompt = ReportPrompt::new("Jane Doe", ReportTemplate::RetirementFocused, date()).build();

        assert!(prompt.contains("## Comprehensive Financial Report for Jane Doe"));
        assert!(prompt.contains("**Prepared by:** Financial Assistant AI"));
        assert!(prompt.contains("**Date:** March 05, 2024"));

        let retirement = position(&prompt, "## 2. RETIREMENT PLANNING");
        let health = position(&prompt, "## 3. FINANCIAL HEALTH ASSESSMENT");
        assert!(retirement < health);
        assert!(prompt.contains("CPP and OAS optimization"));
    }

    #[test]
    fn test_no_history_means_no_context_block() {
        let prompt = ReportPrompt::new("Jane", ReportTemplate::Default, date()).build();
        assert!(!prompt.contains("Conversation Context"));
        assert!(!prompt.contains("IMPORTANT: The user has requested"));
        assert!(prompt.contains(DISCLAIMER));
        assert!(prompt.contains("Do NOT include any hardcoded or example financial data"));
    }

    #[test]
    fn test_context_is_truncated() {
        let history = vec![
            ChatMessage::user("x".repeat(1500)),
            ChatMessage::assistant("y".repeat(1500)),
        ];
        let prompt = ReportPrompt::new("Jane", ReportTemplate::Default, date())
            .history(&history)
            .build();

        let expected = format!("{} {}...", "x".repeat(1500), "y".repeat(499));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"y".repeat(500)));
    }

    #[test]
    fn test_preference_is_quoted() {
        let prompt = ReportPrompt::new("Jane", ReportTemplate::TaxFocused, date())
            .preference("focus on tax credits")
            .build();

        assert!(prompt.contains("\"focus on tax credits\""));
        assert!(prompt.contains("## 1. TAX OPTIMIZATION OPPORTUNITIES"));
    }

    #[test]
    fn test_conversation_text_joins_with_spaces() {
        let history = vec![ChatMessage::user("a"), ChatMessage::assistant("b")];
        assert_eq!(conversation_text(&history), "a b");
    }
}
