use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use finsight_agent::DEFAULT_CLIENT_NAME;
use finsight_persist::ReportStore;
use finsight_report::{render_not_found_page, render_report_page};
use finsight_types::{Report, ReportSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub client_name: Option<String>,
    /// Generated when absent, which yields a report from an empty conversation
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub report_id: String,
    pub report_url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListResponse {
    pub success: bool,
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    pub report: Report,
}

#[derive(Debug, Deserialize)]
pub struct FinancialDataQuery {
    pub client_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialDataResponse {
    pub success: bool,
    pub financial_data: Value,
    pub conversation_id: String,
    pub client_name: String,
}

/// Generate and store a report for a conversation
#[utoipa::path(
    post,
    path = "/api/generate-report",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report generated", body = GenerateReportResponse),
        (status = 500, description = "Language model call failed"),
        (status = 503, description = "Language model not configured")
    ),
    tag = "reports"
)]
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateReportRequest>,
) -> ApiResult<Json<GenerateReportResponse>> {
    let conversation_id = req
        .conversation_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state
        .advisor
        .generate_report(req.client_name.as_deref(), &conversation_id)
        .await?;

    Ok(Json(GenerateReportResponse {
        success: true,
        report_id: outcome.report_id,
        report_url: outcome.report_url,
        message: outcome.message,
    }))
}

/// List stored reports, oldest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Stored reports", body = ReportListResponse)
    ),
    tag = "reports"
)]
pub async fn list_reports(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReportListResponse>> {
    let reports = state
        .stores
        .reports
        .list_reports()
        .await?
        .iter()
        .map(|r| r.summary(state.advisor.report_url(&r.id)))
        .collect();

    Ok(Json(ReportListResponse {
        success: true,
        reports,
    }))
}

/// Fetch a stored report as JSON
#[utoipa::path(
    get,
    path = "/api/reports/{report_id}",
    params(("report_id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Stored report", body = ReportResponse),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> ApiResult<Json<ReportResponse>> {
    let report = state
        .stores
        .reports
        .get_report(&report_id)
        .await?
        .ok_or(ApiError::ReportNotFound(report_id))?;

    Ok(Json(ReportResponse {
        success: true,
        report,
    }))
}

/// Render a stored report as a standalone HTML page
///
/// Rendered from the stored markdown on every request.
#[utoipa::path(
    get,
    path = "/reports/{report_id}",
    params(("report_id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report page", content_type = "text/html"),
        (status = 404, description = "Report not found", content_type = "text/html")
    ),
    tag = "reports"
)]
pub async fn view_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> ApiResult<(StatusCode, Html<String>)> {
    match state.stores.reports.get_report(&report_id).await? {
        Some(report) => Ok((StatusCode::OK, Html(render_report_page(&report)))),
        None => Ok((StatusCode::NOT_FOUND, Html(render_not_found_page(&report_id)))),
    }
}

/// Figures extracted from a conversation for tables and charts
#[utoipa::path(
    get,
    path = "/api/financial-data/{conversation_id}",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("client_name" = Option<String>, Query, description = "Client name used in the extraction prompt")
    ),
    responses(
        (status = 200, description = "Extracted figures", body = FinancialDataResponse)
    ),
    tag = "reports"
)]
pub async fn financial_data(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<FinancialDataQuery>,
) -> Json<FinancialDataResponse> {
    let client_name = query
        .client_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());

    let financial_data = state
        .advisor
        .financial_data(&conversation_id, &client_name)
        .await;

    Json(FinancialDataResponse {
        success: true,
        financial_data,
        conversation_id,
        client_name,
    })
}
