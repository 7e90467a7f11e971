use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::auth::AuthUser;
use crate::entities::activity_log::{self, Entity as ActivityLogEntity};
use crate::errors::ServiceError;
use crate::services::access;

/// Append-only activity trail. Recording is best-effort: a failed insert is
/// logged and never fails the operation that produced it.
#[derive(Clone)]
pub struct ActivityLogService {
    db: Arc<DatabaseConnection>,
}

impl ActivityLogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn record(
        &self,
        user_id: i32,
        quotation_id: Option<i32>,
        action: &str,
        description: Option<String>,
        metadata: Option<Value>,
    ) -> Result<(), ServiceError> {
        let entry = activity_log::ActiveModel {
            user_id: Set(user_id),
            quotation_id: Set(quotation_id),
            action: Set(action.to_string()),
            description: Set(description),
            metadata: Set(metadata),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        entry.insert(&*self.db).await?;
        Ok(())
    }

    /// Fire-and-forget variant used after a committed mutation.
    pub async fn record_best_effort(
        &self,
        user_id: i32,
        quotation_id: Option<i32>,
        action: &str,
        description: Option<String>,
        metadata: Option<Value>,
    ) {
        if let Err(e) = self
            .record(user_id, quotation_id, action, description, metadata)
            .await
        {
            warn!(error = %e, action = action, "Failed to record activity log entry");
        }
    }

    /// Most recent entries visible to the caller.
    pub async fn recent(
        &self,
        caller: &AuthUser,
        limit: u64,
    ) -> Result<Vec<activity_log::Model>, ServiceError> {
        let entries = access::scope_to_owner(
            ActivityLogEntity::find(),
            activity_log::Column::UserId,
            caller,
        )
        .order_by_desc(activity_log::Column::CreatedAt)
        .limit(limit)
        .all(&*self.db)
        .await?;
        Ok(entries)
    }
}
