pub mod analytics;
pub mod auth;
pub mod quotations;
pub mod templates;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::services::activity::ActivityLogService;
use crate::services::analytics::AnalyticsService;
use crate::services::quotations::QuotationService;
use crate::services::reports::ReportService;
use crate::services::templates::TemplateService;
use crate::services::users::UserService;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub quotations: Arc<QuotationService>,
    pub templates: Arc<TemplateService>,
    pub analytics: Arc<AnalyticsService>,
    pub reports: Arc<ReportService>,
    pub users: Arc<UserService>,
    pub activity: ActivityLogService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        let activity = ActivityLogService::new(db.clone());

        let quotations = Arc::new(QuotationService::new(db.clone(), activity.clone()));
        let templates = Arc::new(TemplateService::new(db.clone()));
        let analytics = Arc::new(AnalyticsService::new(db.clone(), activity.clone()));
        let reports = Arc::new(ReportService::new(db.clone()));
        let users = Arc::new(UserService::new(db, auth));

        Self {
            quotations,
            templates,
            analytics,
            reports,
            users,
            activity,
        }
    }
}
