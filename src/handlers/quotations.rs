use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::analytics::StatsOverview;
use crate::services::quotations::{
    CreateQuotationRequest, QuotationFilter, QuotationResponse, UpdateQuotationRequest,
};
use crate::{ApiResponse, AppState, PaginatedResponse};

pub fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotations).post(create_quotation))
        .route("/stats/overview", get(get_quotation_stats))
        .route(
            "/{id}",
            get(get_quotation)
                .put(update_quotation)
                .delete(delete_quotation),
        )
        .route("/{id}/duplicate", post(duplicate_quotation))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuotationListQuery {
    /// Offset into the result set (default: 0)
    #[serde(default)]
    pub skip: u64,
    /// Page size (default: 100); clients should keep this reasonable
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by status (legacy aliases accepted)
    pub status: Option<String>,
    /// Case-insensitive substring match on the customer name
    pub customer_name: Option<String>,
    /// Only rows created at or after this instant (RFC 3339)
    pub date_from: Option<DateTime<Utc>>,
    /// Only rows created at or before this instant (RFC 3339)
    pub date_to: Option<DateTime<Utc>>,
}

fn default_limit() -> u64 {
    100
}

impl QuotationListQuery {
    fn filter(&self) -> QuotationFilter {
        QuotationFilter {
            status: self.status.clone(),
            customer_name: self.customer_name.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

/// List quotations visible to the caller, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/v1/quotations",
    params(QuotationListQuery),
    responses(
        (status = 200, description = "Quotations listed", body = ApiResponse<PaginatedResponse<QuotationResponse>>),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Invalid filter", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn list_quotations(
    State(state): State<AppState>,
    Query(query): Query<QuotationListQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<PaginatedResponse<QuotationResponse>>>, ServiceError> {
    let result = state
        .services
        .quotations
        .list(&auth_user, &query.filter(), query.skip, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: result.quotations,
        total: result.total,
        skip: result.skip,
        limit: result.limit,
    })))
}

/// Unauthenticated, unscoped listing used by the public map view
#[utoipa::path(
    get,
    path = "/api/v1/quotations/public",
    params(QuotationListQuery),
    responses(
        (status = 200, description = "Quotations listed", body = ApiResponse<PaginatedResponse<QuotationResponse>>)
    ),
    tag = "Quotations"
)]
pub async fn list_quotations_public(
    State(state): State<AppState>,
    Query(query): Query<QuotationListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<QuotationResponse>>>, ServiceError> {
    let result = state
        .services
        .quotations
        .list_public(&query.filter(), query.skip, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: result.quotations,
        total: result.total,
        skip: result.skip,
        limit: result.limit,
    })))
}

/// Create a quotation; the caller becomes the owner
#[utoipa::path(
    post,
    path = "/api/v1/quotations",
    request_body = CreateQuotationRequest,
    responses(
        (status = 201, description = "Quotation created", body = ApiResponse<QuotationResponse>),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn create_quotation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuotationResponse>>), ServiceError> {
    let created = state
        .services
        .quotations
        .create(&auth_user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a quotation by id
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}",
    params(("id" = i32, Path, description = "Quotation id")),
    responses(
        (status = 200, description = "Quotation retrieved", body = ApiResponse<QuotationResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<QuotationResponse>>, ServiceError> {
    let quotation = state.services.quotations.get(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(quotation)))
}

/// Update a quotation; a present item list replaces the existing one
#[utoipa::path(
    put,
    path = "/api/v1/quotations/{id}",
    params(("id" = i32, Path, description = "Quotation id")),
    request_body = UpdateQuotationRequest,
    responses(
        (status = 200, description = "Quotation updated", body = ApiResponse<QuotationResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
    Json(request): Json<UpdateQuotationRequest>,
) -> Result<Json<ApiResponse<QuotationResponse>>, ServiceError> {
    let updated = state
        .services
        .quotations
        .update(&auth_user, id, request)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a quotation and its items
#[utoipa::path(
    delete,
    path = "/api/v1/quotations/{id}",
    params(("id" = i32, Path, description = "Quotation id")),
    responses(
        (status = 204, description = "Quotation deleted"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.quotations.delete(&auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy a quotation into a fresh draft owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/quotations/{id}/duplicate",
    params(("id" = i32, Path, description = "Quotation id")),
    responses(
        (status = 201, description = "Quotation duplicated", body = ApiResponse<QuotationResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn duplicate_quotation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<QuotationResponse>>), ServiceError> {
    let copy = state
        .services
        .quotations
        .duplicate(&auth_user, id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(copy))))
}

/// Per-status rollup over the caller-visible rows
#[utoipa::path(
    get,
    path = "/api/v1/quotations/stats/overview",
    responses(
        (status = 200, description = "Stats retrieved", body = ApiResponse<StatsOverview>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("Bearer" = [])),
    tag = "Quotations"
)]
pub async fn get_quotation_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<StatsOverview>>, ServiceError> {
    let stats = state.services.analytics.stats_overview(&auth_user).await?;
    Ok(Json(ApiResponse::success(stats)))
}
