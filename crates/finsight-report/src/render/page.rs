use finsight_types::Report;
use html_escape::encode_text;

use super::financial::render_financial_section;
use super::sections::render_sections;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f3f4f6; color: #1f2937; margin: 0; }
.container { max-width: 960px; margin: 0 auto; padding: 32px 16px; }
.report-header { background: linear-gradient(135deg, #1e3a8a, #3b82f6); color: #fff; border-radius: 12px; padding: 32px; margin-bottom: 24px; }
.report-header h1 { margin: 0 0 8px; }
.report-section, .financial-overview { background: #fff; border-radius: 12px; border-left: 6px solid #3b82f6; padding: 24px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { padding: 8px 12px; border-bottom: 1px solid #e5e7eb; text-align: left; }
td.amount { text-align: right; font-variant-numeric: tabular-nums; }
tr.total td, tr.net-worth td { font-weight: 700; }
.badge { color: #fff; border-radius: 9999px; padding: 2px 10px; font-size: 12px; }
.charts { display: flex; gap: 20px; flex-wrap: wrap; }
.chart-container { flex: 1 1 300px; height: 300px; position: relative; }
.error { background: #fef2f2; color: #b91c1c; border: 1px solid #fecaca; border-radius: 8px; padding: 12px; }
.actions { text-align: right; margin-bottom: 16px; }
.footer { color: #6b7280; font-size: 12px; text-align: center; margin-top: 32px; }
@media print { .actions { display: none; } body { background: #fff; } }
"#;

const CHART_INIT: &str = r#"
document.addEventListener('DOMContentLoaded', function () {
  if (!window.financialCharts || typeof Chart === 'undefined') { return; }
  var accounts = window.financialCharts.accounts;
  accounts.options.scales.y.ticks = { callback: function (v) { return '$' + (v / 1000) + 'K'; } };
  new Chart(document.getElementById('accountsChart'), accounts);
  new Chart(document.getElementById('overviewChart'), window.financialCharts.overview);
});
"#;

/// Full standalone HTML page for a stored report
pub fn render_report_page(report: &Report) -> String {
    let client_name = encode_text(&report.client_name);
    let generated = report.created_at.format("%B %d, %Y at %I:%M %p");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Financial Report - {client_name}</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
<div class="actions"><button onclick="window.print()">Print / Save as PDF</button></div>
<header class="report-header">
<h1>Financial Report</h1>
<p>Prepared for <strong>{client_name}</strong></p>
<p>Generated on {generated}</p>
</header>
{sections}
{financial}
<div class="footer">
<p>Report ID: {id}</p>
<p>This report is for informational purposes only and does not constitute financial, investment, or tax advice.</p>
</div>
</div>
<script>{CHART_INIT}</script>
</body>
</html>"#,
        sections = render_sections(&report.content),
        financial = render_financial_section(&report.financial_data),
        id = encode_text(&report.id),
    )
}

/// Page served for unknown report ids
pub fn render_not_found_page(report_id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Report Not Found</title>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
<div class="error">
<h1>Report Not Found</h1>
<p>No report exists with ID {id}.</p>
</div>
</div>
</body>
</html>"#,
        id = encode_text(report_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_types::FinancialData;

    #[test]
    fn test_page_contains_sections_and_charts() {
        let report = Report::new(
            "Jane <Doe>",
            "## 1. EXECUTIVE SUMMARY\nAll **good**.",
            FinancialData::default().to_value(),
            "conv-1",
            "",
        );
        let html = render_report_page(&report);

        assert!(html.contains("Jane &lt;Doe&gt;"));
        assert!(html.contains("1. EXECUTIVE SUMMARY"));
        assert!(html.contains("<strong>good</strong>"));
        assert!(html.contains("accountsChart"));
        assert!(html.contains(&report.id));
    }

    #[test]
    fn test_page_survives_bad_financial_data() {
        let report = Report::new("Jane", "## A\nbody", serde_json::json!("not json"), "c", "");
        let html = render_report_page(&report);
        assert!(html.contains("<div class='error'>"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_not_found_page() {
        let html = render_not_found_page("<abc>");
        assert!(html.contains("Report Not Found"));
        assert!(html.contains("&lt;abc&gt;"));
    }
}
