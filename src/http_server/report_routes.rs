//! Moderation report routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::errors::require_actor;
use crate::errors::DataError;
use crate::model::{NewReport, Report, ReportStatus};
use crate::service::ContentService;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub article_ref: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub total: usize,
}

/// Create report routes
pub fn report_routes(service: Arc<ContentService>) -> Router {
    Router::new()
        .route("/reports", get(list_reports_handler).post(create_report_handler))
        .route(
            "/reports/:id",
            patch(update_report_handler).delete(delete_report_handler),
        )
        .with_state(service)
}

async fn list_reports_handler(
    State(service): State<Arc<ContentService>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportListResponse>, DataError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ReportStatus>)
        .transpose()?;
    let reports = service.list_reports(status).await;
    Ok(Json(ReportListResponse {
        total: reports.len(),
        reports,
    }))
}

async fn create_report_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Json(request): Json<ReportRequest>,
) -> Result<(StatusCode, Json<Report>), DataError> {
    let reporter_id = require_actor(&headers)?;
    let report = service
        .create_report(NewReport {
            article_ref: request.article_ref,
            reporter_id,
            reason: request.reason,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn update_report_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Report>, DataError> {
    require_actor(&headers)?;
    let status: ReportStatus = request.status.parse()?;
    Ok(Json(service.update_report_status(&id, status).await?))
}

async fn delete_report_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, DataError> {
    require_actor(&headers)?;
    service.delete_report(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
