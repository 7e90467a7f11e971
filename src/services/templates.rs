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
use crate::entities::quotation::{self, Entity as QuotationEntity};
use crate::entities::template::{
    self, ActiveModel as TemplateActiveModel, Entity as TemplateEntity, Model as TemplateModel,
};
use crate::errors::ServiceError;
use crate::models::{validate_field_defs, FieldDef, TemplateType};
use crate::services::access;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, message = "Template name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub template_type: Option<TemplateType>,
    pub category: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template_type: Option<TemplateType>,
    pub category: Option<String>,
    /// When present, fully replaces the existing field-definition list.
    pub fields: Option<Vec<FieldDef>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub template_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub template_type: TemplateType,
    pub category: String,
    pub usage_count: i32,
    pub fields: Vec<FieldDef>,
    pub created_by: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateResponse>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Service for managing quotation templates.
#[derive(Clone)]
pub struct TemplateService {
    db: Arc<DatabaseConnection>,
}

impl TemplateService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        caller: &AuthUser,
        filter: &TemplateFilter,
        skip: u64,
        limit: u64,
    ) -> Result<TemplateListResponse, ServiceError> {
        let mut select = access::scope_to_owner(
            TemplateEntity::find(),
            template::Column::CreatedBy,
            caller,
        );

        if let Some(category) = &filter.category {
            select = select.filter(template::Column::Category.eq(category.clone()));
        }
        if let Some(template_type) = &filter.template_type {
            let template_type: TemplateType = template_type.parse().map_err(|_| {
                ServiceError::ValidationError(format!("Unknown template type: {template_type}"))
            })?;
            select = select.filter(template::Column::TemplateType.eq(template_type.to_string()));
        }

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .order_by_desc(template::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        let templates = rows
            .into_iter()
            .map(model_to_response)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TemplateListResponse {
            templates,
            total,
            skip,
            limit,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<TemplateResponse, ServiceError> {
        let found = TemplateEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "template")?;
        model_to_response(found)
    }

    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateTemplateRequest,
    ) -> Result<TemplateResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        validate_field_defs(&request.fields)?;

        let now = Utc::now();
        let created = TemplateActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            template_type: Set(request
                .template_type
                .unwrap_or(TemplateType::Custom)
                .to_string()),
            category: Set(request.category.unwrap_or_else(|| "standard".to_string())),
            usage_count: Set(0),
            fields: Set(fields_to_json(&request.fields)),
            created_by: Set(caller.id),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(template_id = created.id, "Template created");
        model_to_response(created)
    }

    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i32,
        request: UpdateTemplateRequest,
    ) -> Result<TemplateResponse, ServiceError> {
        if let Some(fields) = &request.fields {
            validate_field_defs(fields)?;
        }

        let found = TemplateEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "template")?;

        let mut active: TemplateActiveModel = found.into();
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Template name must not be empty".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(template_type) = request.template_type {
            active.template_type = Set(template_type.to_string());
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(fields) = &request.fields {
            active.fields = Set(fields_to_json(fields));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&*self.db).await?;
        info!(template_id = id, "Template updated");
        model_to_response(updated)
    }

    /// Deletes a template unless a quotation still references it.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let found = TemplateEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "template")?;

        let referencing = QuotationEntity::find()
            .filter(quotation::Column::TemplateId.eq(id))
            .count(&*self.db)
            .await?;
        if referencing > 0 {
            return Err(ServiceError::Conflict(format!(
                "Cannot delete template {id}: referenced by {referencing} quotation(s)"
            )));
        }

        TemplateEntity::delete_by_id(id).exec(&*self.db).await?;
        info!(template_id = id, "Template deleted");
        Ok(())
    }

    /// Copies a template into a fresh row owned by the caller, with the
    /// usage counter reset.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn duplicate(
        &self,
        caller: &AuthUser,
        id: i32,
    ) -> Result<TemplateResponse, ServiceError> {
        let original = TemplateEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, original.created_by, "template")?;

        let now = Utc::now();
        let copy = TemplateActiveModel {
            name: Set(format!("{} (Copy)", original.name)),
            description: Set(original.description.clone()),
            template_type: Set(original.template_type.clone()),
            category: Set(original.category.clone()),
            usage_count: Set(0),
            fields: Set(original.fields.clone()),
            created_by: Set(caller.id),
            is_active: Set(original.is_active),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(source_id = id, new_id = copy.id, "Template duplicated");
        model_to_response(copy)
    }

    /// Distinct category values over the caller-visible rows.
    pub async fn categories(&self, caller: &AuthUser) -> Result<Vec<String>, ServiceError> {
        let categories: Vec<String> = access::scope_to_owner(
            TemplateEntity::find(),
            template::Column::CreatedBy,
            caller,
        )
        .select_only()
        .column(template::Column::Category)
        .distinct()
        .into_tuple()
        .all(&*self.db)
        .await?;
        Ok(categories)
    }

    /// Distinct type values over the caller-visible rows.
    pub async fn types(&self, caller: &AuthUser) -> Result<Vec<String>, ServiceError> {
        let types: Vec<String> = access::scope_to_owner(
            TemplateEntity::find(),
            template::Column::CreatedBy,
            caller,
        )
        .select_only()
        .column(template::Column::TemplateType)
        .distinct()
        .into_tuple()
        .all(&*self.db)
        .await?;
        Ok(types)
    }
}

fn fields_to_json(fields: &[FieldDef]) -> Option<serde_json::Value> {
    if fields.is_empty() {
        None
    } else {
        serde_json::to_value(fields).ok()
    }
}

fn model_to_response(model: TemplateModel) -> Result<TemplateResponse, ServiceError> {
    let template_type: TemplateType = model.template_type.parse().map_err(|_| {
        ServiceError::InternalError(format!("Corrupt template type: {}", model.template_type))
    })?;
    let fields = model
        .fields
        .as_ref()
        .and_then(|value| serde_json::from_value::<Vec<FieldDef>>(value.clone()).ok())
        .unwrap_or_default();

    Ok(TemplateResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        template_type,
        category: model.category,
        usage_count: model.usage_count,
        fields,
        created_by: model.created_by,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
