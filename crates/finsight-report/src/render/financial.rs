use finsight_types::{FinancialData, Goal, Horizon};
use html_escape::encode_text;
use serde_json::{json, Value};

use super::{format_amount, format_whole};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("financial data is not a JSON object")]
    NotAnObject,

    #[error("invalid financial data: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Rendered financial overview: two tables plus Chart.js configurations
#[derive(Debug, Clone)]
pub struct FinancialView {
    pub tables_html: String,
    pub bar_chart: Value,
    pub doughnut_chart: Value,
}

fn parse(data: &Value) -> Result<FinancialData, RenderError> {
    match data {
        Value::Object(_) => Ok(serde_json::from_value(data.clone())?),
        Value::String(raw) => Ok(serde_json::from_str(raw)?),
        _ => Err(RenderError::NotAnObject),
    }
}

fn money(value: f64) -> String {
    format!("${}", format_amount(value))
}

fn table_row(label: &str, value: f64, class: &str) -> String {
    format!(
        "<tr class=\"{class}\"><td>{label}</td><td class=\"amount\">{}</td></tr>",
        money(value)
    )
}

fn goal_row(horizon: Horizon, goal: &Goal) -> String {
    format!(
        "<tr>\
         <td><span class=\"badge\" style=\"background-color: {color}\">{label}</span></td>\
         <td>{name}</td>\
         <td class=\"amount\">{target}</td>\
         <td>{progress}%</td>\
         <td class=\"amount\">${current}</td>\
         <td class=\"amount\">${remaining}</td>\
         </tr>",
        color = horizon.color(),
        label = horizon.label(),
        name = encode_text(&goal.goal),
        target = money(goal.amount),
        progress = format_amount(goal.progress),
        current = format_whole(goal.current_value()),
        remaining = format_whole(goal.remaining()),
    )
}

fn bar_chart(data: &FinancialData) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": ["RRSP", "TFSA", "Investment Account"],
            "datasets": [{
                "label": "Account Balance",
                "data": [data.assets.rrsp, data.assets.tfsa, data.assets.investments],
                "backgroundColor": ["#3b82f6", "#10b981", "#f59e0b"],
                "borderColor": ["#2563eb", "#059669", "#d97706"],
                "borderWidth": 1
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "display": false },
                "title": { "display": true, "text": "Investment Accounts" }
            },
            "scales": { "y": { "beginAtZero": true } }
        }
    })
}

fn doughnut_chart(data: &FinancialData) -> Value {
    json!({
        "type": "doughnut",
        "data": {
            "labels": ["Assets", "Liabilities", "Net Worth"],
            "datasets": [{
                "data": [
                    data.assets.total_assets,
                    data.liabilities.total_liabilities,
                    data.net_worth
                ],
                "backgroundColor": ["#10b981", "#ef4444", "#3b82f6"],
                "borderWidth": 2
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "position": "bottom" },
                "title": { "display": true, "text": "Financial Overview" }
            }
        }
    })
}

/// Build the tables and chart configurations for `data`.
///
/// Fails when `data` is not an object carrying every required key with
/// numeric values.
pub fn render_financial(data: &Value) -> Result<FinancialView, RenderError> {
    let data = parse(data)?;

    let mut tables = String::from(
        "<table class=\"financial-table\"><thead><tr><th>Category</th><th>Amount</th></tr></thead><tbody>",
    );
    let rows = [
        ("RRSP", data.assets.rrsp, "asset"),
        ("TFSA", data.assets.tfsa, "asset"),
        ("Investment Account", data.assets.investments, "asset"),
        ("Real Estate", data.assets.real_estate, "asset"),
        ("Total Assets", data.assets.total_assets, "total"),
        ("Mortgage", data.liabilities.mortgage, "liability"),
        ("Car Loan", data.liabilities.car_loan, "liability"),
        ("Credit Cards", data.liabilities.credit_cards, "liability"),
        ("Total Liabilities", data.liabilities.total_liabilities, "total"),
        ("Net Worth", data.net_worth, "net-worth"),
    ];
    for (label, value, class) in rows {
        tables.push_str(&table_row(label, value, class));
    }
    tables.push_str("</tbody></table>");

    if !data.goals.is_empty() {
        tables.push_str(
            "<table class=\"goals-table\"><thead><tr>\
             <th>Horizon</th><th>Goal</th><th>Target</th><th>Progress</th><th>Current</th><th>Remaining</th>\
             </tr></thead><tbody>",
        );
        for (horizon, goal) in data.goals.iter() {
            tables.push_str(&goal_row(horizon, goal));
        }
        tables.push_str("</tbody></table>");
    }

    Ok(FinancialView {
        tables_html: tables,
        bar_chart: bar_chart(&data),
        doughnut_chart: doughnut_chart(&data),
    })
}

/// JSON safe to inline inside a `<script>` element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Financial overview block for the report page.
///
/// Invalid data renders an inline error box instead of failing the page.
pub fn render_financial_section(data: &Value) -> String {
    match render_financial(data) {
        Ok(view) => format!(
            "<section class=\"financial-overview\">\
             <h2>Financial Overview</h2>\
             {tables}\
             <div class=\"charts\">\
             <div class=\"chart-container\"><canvas id=\"accountsChart\"></canvas></div>\
             <div class=\"chart-container\"><canvas id=\"overviewChart\"></canvas></div>\
             </div>\
             <script>\
             window.financialCharts = {{ accounts: {bar}, overview: {doughnut} }};\
             </script>\
             </section>",
            tables = view.tables_html,
            bar = script_json(&view.bar_chart),
            doughnut = script_json(&view.doughnut_chart),
        ),
        Err(e) => {
            tracing::warn!("Could not render financial data: {}", e);
            format!(
                "<div class='error'>Error rendering financial data: {}</div>",
                encode_text(&e.to_string())
            )
        }
    }
}
