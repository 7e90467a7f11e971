use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::templates::{
    CreateTemplateRequest, TemplateFilter, TemplateResponse, UpdateTemplateRequest,
};
use crate::{ApiResponse, AppState, PaginatedResponse};

pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/categories/list", get(get_template_categories))
        .route("/types/list", get(get_template_types))
        .route(
            "/{id}",
            get(get_template)
                .put(update_template)
                .delete(delete_template),
        )
        .route("/{id}/duplicate", post(duplicate_template))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TemplateListQuery {
    /// Offset into the result set (default: 0)
    #[serde(default)]
    pub skip: u64,
    /// Page size (default: 100); clients should keep this reasonable
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by category (exact match)
    pub category: Option<String>,
    /// Filter by template type (`default` or `custom`)
    pub template_type: Option<String>,
}

fn default_limit() -> u64 {
    100
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TypeListResponse {
    pub types: Vec<String>,
}

/// List templates visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/templates",
    params(TemplateListQuery),
    responses(
        (status = 200, description = "Templates listed", body = ApiResponse<PaginatedResponse<TemplateResponse>>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateListQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<PaginatedResponse<TemplateResponse>>>, ServiceError> {
    let filter = TemplateFilter {
        category: query.category.clone(),
        template_type: query.template_type.clone(),
    };
    let result = state
        .services
        .templates
        .list(&auth_user, &filter, query.skip, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: result.templates,
        total: result.total,
        skip: result.skip,
        limit: result.limit,
    })))
}

/// Create a template with validated field definitions
#[utoipa::path(
    post,
    path = "/api/v1/templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = ApiResponse<TemplateResponse>),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn create_template(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TemplateResponse>>), ServiceError> {
    let created = state.services.templates.create(&auth_user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a template by id
#[utoipa::path(
    get,
    path = "/api/v1/templates/{id}",
    params(("id" = i32, Path, description = "Template id")),
    responses(
        (status = 200, description = "Template retrieved", body = ApiResponse<TemplateResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<TemplateResponse>>, ServiceError> {
    let template = state.services.templates.get(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(template)))
}

/// Update a template; a present field list replaces the existing one
#[utoipa::path(
    put,
    path = "/api/v1/templates/{id}",
    params(("id" = i32, Path, description = "Template id")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = ApiResponse<TemplateResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<ApiResponse<TemplateResponse>>, ServiceError> {
    let updated = state
        .services
        .templates
        .update(&auth_user, id, request)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a template unless quotations still reference it
#[utoipa::path(
    delete,
    path = "/api/v1/templates/{id}",
    params(("id" = i32, Path, description = "Template id")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Template still referenced", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.templates.delete(&auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy a template into a fresh row owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/templates/{id}/duplicate",
    params(("id" = i32, Path, description = "Template id")),
    responses(
        (status = 201, description = "Template duplicated", body = ApiResponse<TemplateResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn duplicate_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<TemplateResponse>>), ServiceError> {
    let copy = state.services.templates.duplicate(&auth_user, id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(copy))))
}

/// Distinct template categories visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/templates/categories/list",
    responses(
        (status = 200, description = "Categories listed", body = ApiResponse<CategoryListResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn get_template_categories(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<CategoryListResponse>>, ServiceError> {
    let categories = state.services.templates.categories(&auth_user).await?;
    Ok(Json(ApiResponse::success(CategoryListResponse {
        categories,
    })))
}

/// Distinct template types visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/templates/types/list",
    responses(
        (status = 200, description = "Types listed", body = ApiResponse<TypeListResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Templates"
)]
pub async fn get_template_types(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<TypeListResponse>>, ServiceError> {
    let types = state.services.templates.types(&auth_user).await?;
    Ok(Json(ApiResponse::success(TypeListResponse { types })))
}
