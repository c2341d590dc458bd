//! Fixed texts the advisor sends without asking the model.

pub const SYSTEM_PROMPT: &str = "You are a professional financial advisor assistant. Help users with:
- Financial planning and budgeting
- Investment advice and portfolio management
- Retirement planning
- Tax optimization strategies
- Risk assessment and management
- Debt management and elimination
- Insurance planning
- Estate planning basics

Provide clear, actionable advice while maintaining a professional tone. Always recommend consulting with qualified professionals for complex financial decisions.";

pub const NOT_CONFIGURED: &str =
    "I apologize, but I'm not properly configured. Please check the API key setup.";

pub const REPORT_GUIDANCE: &str = "I'd be happy to help you generate a comprehensive financial report!

To create your personalized financial report, please click the **\"📊 Generate Report\"** button in the header above. This will:

✅ Generate a detailed financial analysis
✅ Create a professional report with actionable recommendations
✅ Provide you with a direct link to view and download the report
✅ Include sections on financial health, investment strategy, risk analysis, and more

The report will be tailored to your specific financial situation and goals. Once generated, you'll receive a link that you can bookmark or share with your financial advisor.

Is there anything specific you'd like me to help you with regarding your financial planning while we prepare your report?";

pub const REPORT_STARTED: &str = "Generating your personalized financial report...";

pub fn llm_error(error: &anyhow::Error) -> String {
    format!("I encountered an error processing your request: {}", error)
}

/// Acknowledgement quoting the saved customization preference
pub fn restructure_ack(preference: &str) -> String {
    format!(
        "I understand you'd like to customize the report structure!

Your preference: **\"{preference}\"**

I've noted your request to restructure the report. When you click the **\"📊 Generate Report\"** button, the report will be customized based on your preferences:

✅ **Customized section order** based on your priorities
✅ **Focused content** emphasizing your areas of interest
✅ **Tailored recommendations** for your specific needs
✅ **Professional formatting** with your preferred structure

Your restructuring preference has been saved for this conversation. Click the Generate Report button when you're ready to create your customized report!"
    )
}

pub fn report_generated(client_name: &str) -> String {
    format!("Financial report generated successfully for {}", client_name)
}

/// Transcript entry announcing a finished report
pub fn report_notice(client_name: &str, report_id: &str, report_url: &str) -> String {
    format!(
        "📊 **Financial Report Generated Successfully!**\n\n\
         **Client:** {client_name}\n\
         **Report ID:** {report_id}\n\n\
         **Report URL:** {report_url}\n\n\
         *Copy the URL above and paste it in a new tab to view your professional financial report.*"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restructure_ack_quotes_preference() {
        let ack = restructure_ack("focus on my TFSA");
        assert!(ack.contains("**\"focus on my TFSA\"**"));
    }

    #[test]
    fn test_report_notice_fields() {
        let notice = report_notice("Jane", "r-1", "http://localhost:8000/reports/r-1");
        assert!(notice.contains("**Client:** Jane"));
        assert!(notice.contains("**Report ID:** r-1"));
        assert!(notice.contains("**Report URL:** http://localhost:8000/reports/r-1"));
    }
}
