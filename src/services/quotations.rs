use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::quotation::{
    self, ActiveModel as QuotationActiveModel, Entity as QuotationEntity, Model as QuotationModel,
};
use crate::entities::quotation_item::{
    self, Entity as QuotationItemEntity, Model as QuotationItemModel,
};
use crate::entities::template::{self, Entity as TemplateEntity};
use crate::errors::ServiceError;
use crate::models::{GeoPoint, QuoteStatus};
use crate::services::access;
use crate::services::activity::ActivityLogService;

/// Request/response types for the quotation service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuotationItemInput {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Line total; must equal quantity x unit_price when provided,
    /// computed server-side otherwise.
    pub total: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuotationRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Customer email must be a valid email address"))]
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub sold_to_party: Option<String>,
    pub site_address: Option<String>,
    pub external_reference: Option<String>,
    pub status: Option<QuoteStatus>,
    pub template_id: Option<i32>,
    pub total_amount: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub items: Vec<QuotationItemInput>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuotationRequest {
    pub description: Option<String>,
    pub customer_name: Option<String>,
    #[validate(email(message = "Customer email must be a valid email address"))]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub sold_to_party: Option<String>,
    pub site_address: Option<String>,
    pub external_reference: Option<String>,
    pub status: Option<QuoteStatus>,
    pub template_id: Option<i32>,
    pub total_amount: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
    /// When present, fully replaces the existing item list.
    pub items: Option<Vec<QuotationItemInput>>,
}

/// Caller-supplied list filters, applied on top of the visibility scope.
#[derive(Debug, Default, Clone)]
pub struct QuotationFilter {
    pub status: Option<String>,
    pub customer_name: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuotationItemResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuotationResponse {
    pub id: i32,
    pub quote_number: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub sold_to_party: Option<String>,
    pub site_address: Option<String>,
    pub external_reference: Option<String>,
    pub status: QuoteStatus,
    pub template_id: Option<i32>,
    pub created_by: i32,
    pub total_amount: Decimal,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
    pub items: Vec<QuotationItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct QuotationListResponse {
    pub quotations: Vec<QuotationResponse>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Service for managing quotations.
#[derive(Clone)]
pub struct QuotationService {
    db: Arc<DatabaseConnection>,
    activity: ActivityLogService,
}

impl QuotationService {
    pub fn new(db: Arc<DatabaseConnection>, activity: ActivityLogService) -> Self {
        Self { db, activity }
    }

    /// Lists quotations visible to the caller, with optional filters.
    ///
    /// Pagination is offset+limit with no enforced maximum; clients are
    /// expected to keep limits reasonable.
    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        caller: &AuthUser,
        filter: &QuotationFilter,
        skip: u64,
        limit: u64,
    ) -> Result<QuotationListResponse, ServiceError> {
        let select = self.filtered_select(Some(caller), filter)?;

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .order_by_desc(quotation::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        let quotations = self.attach_items(rows).await?;

        Ok(QuotationListResponse {
            quotations,
            total,
            skip,
            limit,
        })
    }

    /// Unscoped listing for the unauthenticated map view.
    #[instrument(skip(self, filter))]
    pub async fn list_public(
        &self,
        filter: &QuotationFilter,
        skip: u64,
        limit: u64,
    ) -> Result<QuotationListResponse, ServiceError> {
        let select = self.filtered_select(None, filter)?;

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .order_by_desc(quotation::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        let quotations = self.attach_items(rows).await?;

        Ok(QuotationListResponse {
            quotations,
            total,
            skip,
            limit,
        })
    }

    /// Fetches a single quotation, enforcing admin-or-owner visibility.
    #[instrument(skip(self))]
    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<QuotationResponse, ServiceError> {
        let found = QuotationEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "quotation")?;

        let items = QuotationItemEntity::find()
            .filter(quotation_item::Column::QuotationId.eq(id))
            .order_by_asc(quotation_item::Column::Id)
            .all(&*self.db)
            .await?;

        model_to_response(found, items)
    }

    /// Creates a quotation together with its item list in one transaction.
    /// The owner is always the caller, regardless of the payload.
    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateQuotationRequest,
    ) -> Result<QuotationResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        let item_sum = validate_items(&request.items)?;
        if let Some(location) = &request.location {
            location.validate()?;
        }

        let now = Utc::now();
        let status = request.status.unwrap_or(QuoteStatus::Draft);
        let total_amount = request.total_amount.unwrap_or(item_sum);
        let quote_number = generate_quote_number();

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for quotation creation");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(template_id) = request.template_id {
            bump_template_usage(&txn, template_id).await?;
        }

        let quotation_model = QuotationActiveModel {
            quote_number: Set(quote_number.clone()),
            description: Set(request.description),
            customer_name: Set(request.customer_name),
            customer_email: Set(request.customer_email),
            customer_phone: Set(request.customer_phone),
            sold_to_party: Set(request.sold_to_party),
            site_address: Set(request.site_address),
            external_reference: Set(request.external_reference),
            status: Set(status.to_string()),
            template_id: Set(request.template_id),
            created_by: Set(caller.id),
            total_amount: Set(total_amount),
            valid_from: Set(request.valid_from),
            valid_to: Set(request.valid_to),
            location: Set(request
                .location
                .as_ref()
                .map(|g| serde_json::to_value(g).unwrap_or_default())),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_items(&txn, quotation_model.id, &request.items, now).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quote_number = %quote_number, "Failed to commit quotation creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(quotation_id = quotation_model.id, quote_number = %quote_number, "Quotation created");

        self.activity
            .record_best_effort(
                caller.id,
                Some(quotation_model.id),
                "quotation_created",
                Some(format!("Created quotation {quote_number}")),
                Some(json!({ "quote_number": quote_number, "total_amount": total_amount })),
            )
            .await;

        self.get(caller, quotation_model.id).await
    }

    /// Applies a partial update; a present item list replaces the previous
    /// one wholesale (delete-all-then-insert) inside the same transaction.
    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i32,
        request: UpdateQuotationRequest,
    ) -> Result<QuotationResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if let Some(items) = &request.items {
            validate_items(items)?;
        }
        if let Some(location) = &request.location {
            location.validate()?;
        }

        let found = QuotationEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "quotation")?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to start transaction for quotation update");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(template_id) = request.template_id {
            if found.template_id != Some(template_id) {
                bump_template_usage(&txn, template_id).await?;
            }
        }

        let mut active: QuotationActiveModel = found.into();
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(customer_name) = request.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(customer_email) = request.customer_email {
            active.customer_email = Set(customer_email);
        }
        if let Some(customer_phone) = request.customer_phone {
            active.customer_phone = Set(Some(customer_phone));
        }
        if let Some(sold_to_party) = request.sold_to_party {
            active.sold_to_party = Set(Some(sold_to_party));
        }
        if let Some(site_address) = request.site_address {
            active.site_address = Set(Some(site_address));
        }
        if let Some(external_reference) = request.external_reference {
            active.external_reference = Set(Some(external_reference));
        }
        if let Some(status) = request.status {
            active.status = Set(status.to_string());
        }
        if let Some(template_id) = request.template_id {
            active.template_id = Set(Some(template_id));
        }
        if let Some(total_amount) = request.total_amount {
            active.total_amount = Set(total_amount);
        }
        if let Some(valid_from) = request.valid_from {
            active.valid_from = Set(Some(valid_from));
        }
        if let Some(valid_to) = request.valid_to {
            active.valid_to = Set(Some(valid_to));
        }
        if let Some(location) = &request.location {
            active.location = Set(Some(serde_json::to_value(location).unwrap_or_default()));
        }
        active.updated_at = Set(Some(now));

        let updated = active.update(&txn).await?;

        if let Some(items) = &request.items {
            QuotationItemEntity::delete_many()
                .filter(quotation_item::Column::QuotationId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, items, now).await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to commit quotation update");
            ServiceError::DatabaseError(e)
        })?;

        info!(quotation_id = id, "Quotation updated");

        self.activity
            .record_best_effort(
                caller.id,
                Some(id),
                "quotation_updated",
                Some(format!("Updated quotation {}", updated.quote_number)),
                None,
            )
            .await;

        self.get(caller, id).await
    }

    /// Deletes a quotation and its items.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let found = QuotationEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, found.created_by, "quotation")?;

        let quote_number = found.quote_number.clone();
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to start transaction for quotation delete");
            ServiceError::DatabaseError(e)
        })?;

        QuotationItemEntity::delete_many()
            .filter(quotation_item::Column::QuotationId.eq(id))
            .exec(&txn)
            .await?;
        QuotationEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to commit quotation delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(quotation_id = id, quote_number = %quote_number, "Quotation deleted");

        self.activity
            .record_best_effort(
                caller.id,
                None,
                "quotation_deleted",
                Some(format!("Deleted quotation {quote_number}")),
                Some(json!({ "quote_number": quote_number })),
            )
            .await;

        Ok(())
    }

    /// Copies a quotation (and its items) into a fresh draft owned by the
    /// caller, with a new quote number.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn duplicate(
        &self,
        caller: &AuthUser,
        id: i32,
    ) -> Result<QuotationResponse, ServiceError> {
        let original = QuotationEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation with id {id} not found")))?;

        access::ensure_owner_or_admin(caller, original.created_by, "quotation")?;

        let items = QuotationItemEntity::find()
            .filter(quotation_item::Column::QuotationId.eq(id))
            .order_by_asc(quotation_item::Column::Id)
            .all(&*self.db)
            .await?;

        let now = Utc::now();
        let quote_number = generate_quote_number();

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to start transaction for quotation duplicate");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(template_id) = original.template_id {
            bump_template_usage(&txn, template_id).await?;
        }

        let copy = QuotationActiveModel {
            quote_number: Set(quote_number.clone()),
            description: Set(original.description.clone()),
            customer_name: Set(original.customer_name.clone()),
            customer_email: Set(original.customer_email.clone()),
            customer_phone: Set(original.customer_phone.clone()),
            sold_to_party: Set(original.sold_to_party.clone()),
            site_address: Set(original.site_address.clone()),
            external_reference: Set(original.external_reference.clone()),
            status: Set(QuoteStatus::Draft.to_string()),
            template_id: Set(original.template_id),
            created_by: Set(caller.id),
            total_amount: Set(original.total_amount),
            valid_from: Set(original.valid_from),
            valid_to: Set(original.valid_to),
            location: Set(original.location.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for item in &items {
            quotation_item::ActiveModel {
                quotation_id: Set(copy.id),
                name: Set(item.name.clone()),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                total: Set(item.total),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = id, "Failed to commit quotation duplicate");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            source_id = id,
            new_id = copy.id,
            quote_number = %quote_number,
            "Quotation duplicated"
        );

        self.activity
            .record_best_effort(
                caller.id,
                Some(copy.id),
                "quotation_duplicated",
                Some(format!(
                    "Duplicated quotation {} as {}",
                    original.quote_number, quote_number
                )),
                None,
            )
            .await;

        self.get(caller, copy.id).await
    }

    fn filtered_select(
        &self,
        caller: Option<&AuthUser>,
        filter: &QuotationFilter,
    ) -> Result<sea_orm::Select<QuotationEntity>, ServiceError> {
        let mut select = QuotationEntity::find();
        if let Some(caller) = caller {
            select = access::scope_to_owner(select, quotation::Column::CreatedBy, caller);
        }

        if let Some(status) = &filter.status {
            let status = QuoteStatus::parse(status)?;
            select = select.filter(quotation::Column::Status.eq(status.to_string()));
        }
        if let Some(term) = &filter.customer_name {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((
                    quotation::Entity,
                    quotation::Column::CustomerName,
                ))))
                .like(format!("%{}%", term.to_lowercase())),
            );
        }
        if let Some(date_from) = filter.date_from {
            select = select.filter(quotation::Column::CreatedAt.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            select = select.filter(quotation::Column::CreatedAt.lte(date_to));
        }

        Ok(select)
    }

    async fn attach_items(
        &self,
        rows: Vec<QuotationModel>,
    ) -> Result<Vec<QuotationResponse>, ServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|q| q.id).collect();
        let mut grouped: HashMap<i32, Vec<QuotationItemModel>> = HashMap::new();
        let items = QuotationItemEntity::find()
            .filter(quotation_item::Column::QuotationId.is_in(ids))
            .order_by_asc(quotation_item::Column::Id)
            .all(&*self.db)
            .await?;
        for item in items {
            grouped.entry(item.quotation_id).or_default().push(item);
        }

        rows.into_iter()
            .map(|row| {
                let items = grouped.remove(&row.id).unwrap_or_default();
                model_to_response(row, items)
            })
            .collect()
    }
}

fn generate_quote_number() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("SOQ-{}", suffix.to_uppercase())
}

/// Checks item payloads and returns the sum of line totals.
fn validate_items(items: &[QuotationItemInput]) -> Result<Decimal, ServiceError> {
    let mut sum = Decimal::ZERO;
    for (index, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "items[{index}].name must not be empty"
            )));
        }
        if item.quantity < 0 {
            return Err(ServiceError::ValidationError(format!(
                "items[{index}].quantity must not be negative"
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "items[{index}].unit_price must not be negative"
            )));
        }
        let expected = item.unit_price * Decimal::from(item.quantity);
        if let Some(total) = item.total {
            if total != expected {
                return Err(ServiceError::ValidationError(format!(
                    "items[{index}].total ({total}) does not equal quantity x unit_price ({expected})"
                )));
            }
        }
        sum += expected;
    }
    Ok(sum)
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    quotation_id: i32,
    items: &[QuotationItemInput],
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for item in items {
        let expected = item.unit_price * Decimal::from(item.quantity);
        quotation_item::ActiveModel {
            quotation_id: Set(quotation_id),
            name: Set(item.name.clone()),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            total: Set(item.total.unwrap_or(expected)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn bump_template_usage<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
) -> Result<(), ServiceError> {
    let found = TemplateEntity::find_by_id(template_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Referenced template {template_id} does not exist"
            ))
        })?;

    let usage = found.usage_count + 1;
    let mut active: template::ActiveModel = found.into();
    active.usage_count = Set(usage);
    active.update(conn).await?;
    Ok(())
}

fn model_to_response(
    model: QuotationModel,
    items: Vec<QuotationItemModel>,
) -> Result<QuotationResponse, ServiceError> {
    let status = QuoteStatus::parse(&model.status)
        .map_err(|_| ServiceError::InternalError(format!("Corrupt status: {}", model.status)))?;
    let location = model
        .location
        .as_ref()
        .and_then(|value| serde_json::from_value::<GeoPoint>(value.clone()).ok());

    Ok(QuotationResponse {
        id: model.id,
        quote_number: model.quote_number,
        description: model.description,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        sold_to_party: model.sold_to_party,
        site_address: model.site_address,
        external_reference: model.external_reference,
        status,
        template_id: model.template_id,
        created_by: model.created_by,
        total_amount: model.total_amount,
        valid_from: model.valid_from,
        valid_to: model.valid_to,
        location,
        items: items
            .into_iter()
            .map(|item| QuotationItemResponse {
                id: item.id,
                name: item.name,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total,
                created_at: item.created_at,
            })
            .collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, unit_price: Decimal, total: Option<Decimal>) -> QuotationItemInput {
        QuotationItemInput {
            name: "Cable run".into(),
            description: None,
            quantity,
            unit_price,
            total,
        }
    }

    #[test]
    fn item_totals_must_match() {
        assert!(validate_items(&[item(2, dec!(10.00), Some(dec!(20.00)))]).is_ok());
        assert!(validate_items(&[item(2, dec!(10.00), Some(dec!(25.00)))]).is_err());
    }

    #[test]
    fn item_totals_are_summed() {
        let sum = validate_items(&[
            item(2, dec!(100.00), None),
            item(1, dec!(300.00), Some(dec!(300.00))),
        ])
        .unwrap();
        assert_eq!(sum, dec!(500.00));
    }

    #[test]
    fn negative_quantities_are_rejected() {
        assert!(validate_items(&[item(-1, dec!(10.00), None)]).is_err());
        assert!(validate_items(&[item(1, dec!(-10.00), None)]).is_err());
    }

    #[test]
    fn zero_quantity_is_allowed() {
        assert_eq!(
            validate_items(&[item(0, dec!(10.00), Some(dec!(0.00)))]).unwrap(),
            dec!(0.00)
        );
    }

    #[test]
    fn quote_numbers_have_expected_shape() {
        let number = generate_quote_number();
        assert!(number.starts_with("SOQ-"));
        assert_eq!(number.len(), 14);
        assert!(number[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
