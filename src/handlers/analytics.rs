use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::analytics::{
    AnalyticsOverview, DashboardMetrics, FunnelStage, RevenueTrendPoint,
};
use crate::services::reports::{CreateReportRequest, ReportResponse};
use crate::{ApiResponse, AppState};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard_metrics))
        .route("/overview", get(get_analytics_overview))
        .route("/revenue-trend", get(get_revenue_trend))
        .route("/conversion-funnel", get(get_conversion_funnel))
        .route("/reports", get(list_reports).post(create_report))
        .route("/reports/{id}", get(get_report).delete(delete_report))
}

/// Query parameters for windowed analytics
#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    /// Number of trailing days to analyze (default: 30, max: 365)
    pub days: Option<i64>,
}

fn window_days(params: &WindowQuery) -> Result<i64, ServiceError> {
    let days = params.days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return Err(ServiceError::ValidationError(
            "Days must be between 1 and 365".to_string(),
        ));
    }
    Ok(days)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// Offset into the result set (default: 0)
    #[serde(default)]
    pub skip: u64,
    /// Page size (default: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by report type (exact match)
    pub report_type: Option<String>,
}

fn default_limit() -> u64 {
    100
}

/// Dashboard metrics over the caller-visible quotations
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard metrics retrieved", body = ApiResponse<DashboardMetrics>)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<DashboardMetrics>>, ServiceError> {
    let metrics = state
        .services
        .analytics
        .dashboard_metrics(&auth_user)
        .await?;
    Ok(Json(ApiResponse::success(metrics)))
}

/// Windowed overview: totals, revenue, average value, status distribution
#[utoipa::path(
    get,
    path = "/api/v1/analytics/overview",
    params(WindowQuery),
    responses(
        (status = 200, description = "Overview retrieved", body = ApiResponse<AnalyticsOverview>),
        (status = 422, description = "Invalid window", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_analytics_overview(
    State(state): State<AppState>,
    Query(params): Query<WindowQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<AnalyticsOverview>>, ServiceError> {
    let days = window_days(&params)?;
    let overview = state.services.analytics.overview(&auth_user, days).await?;
    Ok(Json(ApiResponse::success(overview)))
}

/// Approved revenue per calendar day over the window
#[utoipa::path(
    get,
    path = "/api/v1/analytics/revenue-trend",
    params(WindowQuery),
    responses(
        (status = 200, description = "Trend retrieved", body = ApiResponse<Vec<RevenueTrendPoint>>),
        (status = 422, description = "Invalid window", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_revenue_trend(
    State(state): State<AppState>,
    Query(params): Query<WindowQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<RevenueTrendPoint>>>, ServiceError> {
    let days = window_days(&params)?;
    let trend = state
        .services
        .analytics
        .revenue_trend(&auth_user, days)
        .await?;
    Ok(Json(ApiResponse::success(trend)))
}

/// Five-stage conversion funnel over the window
#[utoipa::path(
    get,
    path = "/api/v1/analytics/conversion-funnel",
    params(WindowQuery),
    responses(
        (status = 200, description = "Funnel retrieved", body = ApiResponse<Vec<FunnelStage>>),
        (status = 422, description = "Invalid window", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_conversion_funnel(
    State(state): State<AppState>,
    Query(params): Query<WindowQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<FunnelStage>>>, ServiceError> {
    let days = window_days(&params)?;
    let funnel = state
        .services
        .analytics
        .conversion_funnel(&auth_user, days)
        .await?;
    Ok(Json(ApiResponse::success(funnel)))
}

/// List report requests visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/analytics/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports listed", body = ApiResponse<Vec<ReportResponse>>)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ReportResponse>>>, ServiceError> {
    let reports = state
        .services
        .reports
        .list(
            &auth_user,
            query.report_type.as_deref(),
            query.skip,
            query.limit,
        )
        .await?;
    Ok(Json(ApiResponse::success(reports)))
}

/// Create a report request (generation happens out of band)
#[utoipa::path(
    post,
    path = "/api/v1/analytics/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report requested", body = ApiResponse<ReportResponse>),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn create_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponse>>), ServiceError> {
    let created = state.services.reports.create(&auth_user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a report by id
#[utoipa::path(
    get,
    path = "/api/v1/analytics/reports/{id}",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report retrieved", body = ApiResponse<ReportResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<ReportResponse>>, ServiceError> {
    let report = state.services.reports.get(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Delete a report request
#[utoipa::path(
    delete,
    path = "/api/v1/analytics/reports/{id}",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reports.delete(&auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
