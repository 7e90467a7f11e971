use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::entities::activity_log;
use crate::entities::quotation::{self, Entity as QuotationEntity, Model as QuotationModel};
use crate::errors::ServiceError;
use crate::models::QuoteStatus;
use crate::services::access;
use crate::services::activity::ActivityLogService;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecentQuotation {
    pub id: i32,
    pub quote_number: String,
    pub customer_name: String,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetrics {
    pub total_quotations: i64,
    pub draft_quotations: i64,
    pub pending_quotations: i64,
    pub approved_quotations: i64,
    pub rejected_quotations: i64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
    /// Percentage, rounded to 2 decimal places. 0 when there are no rows.
    pub conversion_rate: f64,
    pub recent_quotations: Vec<RecentQuotation>,
    #[schema(value_type = Vec<Object>)]
    pub recent_activity: Vec<activity_log::Model>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsOverview {
    pub total_quotations: i64,
    pub pending_quotations: i64,
    pub approved_quotations: i64,
    pub rejected_quotations: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsOverview {
    pub period_days: i64,
    pub total_quotations: i64,
    pub total_revenue: Decimal,
    pub average_quotation_value: Decimal,
    pub status_distribution: BTreeMap<String, i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevenueTrendPoint {
    /// Calendar day in `YYYY-MM-DD` form. Days without approved revenue
    /// are absent from the series.
    pub date: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FunnelStage {
    pub stage: String,
    pub count: i64,
    /// Percentage of the Created total, rounded to 2 decimal places.
    pub percentage: f64,
}

/// Aggregation engine: derived metrics over the caller-visible row set.
///
/// Every query runs through the same visibility scope as the repository
/// reads, so analytics never leak rows the caller could not list.
#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DatabaseConnection>,
    activity: ActivityLogService,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>, activity: ActivityLogService) -> Self {
        Self { db, activity }
    }

    fn scoped(&self, caller: &AuthUser) -> Select<QuotationEntity> {
        access::scope_to_owner(
            QuotationEntity::find(),
            quotation::Column::CreatedBy,
            caller,
        )
    }

    async fn count_with_status(
        &self,
        caller: &AuthUser,
        status: QuoteStatus,
    ) -> Result<u64, ServiceError> {
        let count = self
            .scoped(caller)
            .filter(quotation::Column::Status.eq(status.to_string()))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    /// Dashboard metrics: totals, per-status counts, revenue rollups,
    /// conversion rate and a recent-activity feed.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn dashboard_metrics(
        &self,
        caller: &AuthUser,
    ) -> Result<DashboardMetrics, ServiceError> {
        info!("Generating dashboard metrics");

        let total = self.scoped(caller).count(&*self.db).await?;
        let draft = self.count_with_status(caller, QuoteStatus::Draft).await?;
        let pending = self.count_with_status(caller, QuoteStatus::Pending).await?;
        let approved = self
            .count_with_status(caller, QuoteStatus::Approved)
            .await?;
        let rejected = self
            .count_with_status(caller, QuoteStatus::Rejected)
            .await?;

        let approved_rows = self
            .scoped(caller)
            .filter(quotation::Column::Status.eq(QuoteStatus::Approved.to_string()))
            .all(&*self.db)
            .await?;
        let total_revenue: Decimal = approved_rows.iter().map(|q| q.total_amount).sum();

        let now = Utc::now();
        let month_start = now
            .date_naive()
            .with_day(1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let monthly_revenue: Decimal = approved_rows
            .iter()
            .filter(|q| q.created_at >= month_start)
            .map(|q| q.total_amount)
            .sum();

        let conversion_rate = if total > 0 {
            round2(approved as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        let recent = self
            .scoped(caller)
            .order_by_desc(quotation::Column::CreatedAt)
            .limit(10)
            .all(&*self.db)
            .await?;

        let recent_activity = self.activity.recent(caller, 10).await?;

        Ok(DashboardMetrics {
            total_quotations: total as i64,
            draft_quotations: draft as i64,
            pending_quotations: pending as i64,
            approved_quotations: approved as i64,
            rejected_quotations: rejected as i64,
            total_revenue: total_revenue.round_dp(2),
            monthly_revenue: monthly_revenue.round_dp(2),
            conversion_rate,
            recent_quotations: recent.iter().map(to_recent).collect(),
            recent_activity,
            generated_at: now,
        })
    }

    /// Compact per-status rollup for the quotations stats endpoint.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn stats_overview(&self, caller: &AuthUser) -> Result<StatsOverview, ServiceError> {
        let total = self.scoped(caller).count(&*self.db).await?;
        let pending = self.count_with_status(caller, QuoteStatus::Pending).await?;
        let approved = self
            .count_with_status(caller, QuoteStatus::Approved)
            .await?;
        let rejected = self
            .count_with_status(caller, QuoteStatus::Rejected)
            .await?;

        let approved_rows = self
            .scoped(caller)
            .filter(quotation::Column::Status.eq(QuoteStatus::Approved.to_string()))
            .all(&*self.db)
            .await?;
        let total_revenue: Decimal = approved_rows.iter().map(|q| q.total_amount).sum();

        Ok(StatsOverview {
            total_quotations: total as i64,
            pending_quotations: pending as i64,
            approved_quotations: approved as i64,
            rejected_quotations: rejected as i64,
            total_revenue: total_revenue.round_dp(2),
        })
    }

    /// Metrics over a trailing window of `days` days.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn overview(
        &self,
        caller: &AuthUser,
        days: i64,
    ) -> Result<AnalyticsOverview, ServiceError> {
        let end_date = Utc::now();
        let start_date = end_date - Duration::days(days);

        let rows = self.window_rows(caller, start_date, end_date).await?;

        let total = rows.len() as i64;
        let total_revenue: Decimal = rows
            .iter()
            .filter(|q| q.status == QuoteStatus::Approved.to_string())
            .map(|q| q.total_amount)
            .sum();

        let average_quotation_value = if total > 0 {
            let sum: Decimal = rows.iter().map(|q| q.total_amount).sum();
            (sum / Decimal::from(total)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let status_distribution = distribution(&rows);

        Ok(AnalyticsOverview {
            period_days: days,
            total_quotations: total,
            total_revenue: total_revenue.round_dp(2),
            average_quotation_value,
            status_distribution,
            start_date,
            end_date,
        })
    }

    /// Approved revenue grouped by calendar day over the window,
    /// chronologically ordered.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn revenue_trend(
        &self,
        caller: &AuthUser,
        days: i64,
    ) -> Result<Vec<RevenueTrendPoint>, ServiceError> {
        let end_date = Utc::now();
        let start_date = end_date - Duration::days(days);

        let rows = self
            .scoped(caller)
            .filter(quotation::Column::Status.eq(QuoteStatus::Approved.to_string()))
            .filter(quotation::Column::CreatedAt.gte(start_date))
            .filter(quotation::Column::CreatedAt.lte(end_date))
            .order_by_asc(quotation::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut daily: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let key = row.created_at.format("%Y-%m-%d").to_string();
            *daily.entry(key).or_insert(Decimal::ZERO) += row.total_amount;
        }

        Ok(daily
            .into_iter()
            .map(|(date, revenue)| RevenueTrendPoint {
                date,
                revenue: revenue.round_dp(2),
            })
            .collect())
    }

    /// Fixed five-stage conversion funnel over the window.
    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn conversion_funnel(
        &self,
        caller: &AuthUser,
        days: i64,
    ) -> Result<Vec<FunnelStage>, ServiceError> {
        let end_date = Utc::now();
        let start_date = end_date - Duration::days(days);

        let rows = self.window_rows(caller, start_date, end_date).await?;
        let counts = distribution(&rows);
        let total = rows.len() as i64;

        let count_of = |status: QuoteStatus| -> i64 {
            counts.get(&status.to_string()).copied().unwrap_or(0)
        };

        let stage = |name: &str, count: i64| FunnelStage {
            stage: name.to_string(),
            count,
            percentage: if total > 0 {
                round2(count as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        };

        Ok(vec![
            stage("Created", total),
            stage("Draft", count_of(QuoteStatus::Draft)),
            stage("Pending", count_of(QuoteStatus::Pending)),
            stage("Approved", count_of(QuoteStatus::Approved)),
            stage("Rejected", count_of(QuoteStatus::Rejected)),
        ])
    }

    async fn window_rows(
        &self,
        caller: &AuthUser,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<QuotationModel>, ServiceError> {
        let rows = self
            .scoped(caller)
            .filter(quotation::Column::CreatedAt.gte(start_date))
            .filter(quotation::Column::CreatedAt.lte(end_date))
            .all(&*self.db)
            .await?;
        Ok(rows)
    }
}

fn distribution(rows: &[QuotationModel]) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.status.clone()).or_insert(0) += 1;
    }
    counts
}

fn to_recent(model: &QuotationModel) -> RecentQuotation {
    RecentQuotation {
        id: model.id,
        quote_number: model.quote_number.clone(),
        customer_name: model.customer_name.clone(),
        status: model.status.clone(),
        total_amount: model.total_amount,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_behaves_at_boundaries() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn distribution_counts_statuses() {
        let mut base = QuotationModel {
            id: 1,
            quote_number: "SOQ-1".into(),
            description: "d".into(),
            customer_name: "c".into(),
            customer_email: "c@example.com".into(),
            customer_phone: None,
            sold_to_party: None,
            site_address: None,
            external_reference: None,
            status: "draft".into(),
            template_id: None,
            created_by: 1,
            total_amount: Decimal::ZERO,
            valid_from: None,
            valid_to: None,
            location: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let mut rows = vec![base.clone()];
        base.status = "approved".into();
        rows.push(base.clone());
        rows.push(base);

        let counts = distribution(&rows);
        assert_eq!(counts.get("draft"), Some(&1));
        assert_eq!(counts.get("approved"), Some(&2));
        assert_eq!(counts.get("rejected"), None);
    }
}
