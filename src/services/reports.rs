use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::report::{
    self, ActiveModel as ReportActiveModel, Entity as ReportEntity, Model as ReportModel,
};
use crate::errors::ServiceError;
use crate::services::access;

const STATUS_PROCESSING: &str = "processing";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, message = "Report name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Report type is required"))]
    pub report_type: String,
    pub format: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub filters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub id: i32,
    pub name: String,
    pub report_type: String,
    pub format: String,
    pub status: String,
    pub file_path: Option<String>,
    pub generated_by: i32,
    #[schema(value_type = Option<Object>)]
    pub filters: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Report export requests. Generation itself happens outside this service;
/// rows are created in `processing` state and an external generator fills in
/// status and file pointer.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        caller: &AuthUser,
        report_type: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ReportResponse>, ServiceError> {
        let mut select =
            access::scope_to_owner(ReportEntity::find(), report::Column::GeneratedBy, caller);

        if let Some(report_type) = report_type {
            select = select.filter(report::Column::ReportType.eq(report_type));
        }

        let rows = select
            .order_by_desc(report::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateReportRequest,
    ) -> Result<ReportResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let created = ReportActiveModel {
            name: Set(request.name),
            report_type: Set(request.report_type),
            format: Set(request.format.unwrap_or_else(|| "PDF".to_string())),
            status: Set(STATUS_PROCESSING.to_string()),
            file_path: Set(None),
            generated_by: Set(caller.id),
            filters: Set(request.filters),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(report_id = created.id, "Report requested");
        Ok(model_to_response(created))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<ReportResponse, ServiceError> {
        let found = ReportEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Report with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.generated_by, "report")?;
        Ok(model_to_response(found))
    }

    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let found = ReportEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Report with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.generated_by, "report")?;

        ReportEntity::delete_by_id(id).exec(&*self.db).await?;
        info!(report_id = id, "Report deleted");
        Ok(())
    }
}

fn model_to_response(model: ReportModel) -> ReportResponse {
    ReportResponse {
        id: model.id,
        name: model.name,
        report_type: model.report_type,
        format: model.format,
        status: model.status,
        file_path: model.file_path,
        generated_by: model.generated_by,
        filters: model.filters,
        created_at: model.created_at,
    }
}
