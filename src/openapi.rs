use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Click & Quote API",
        version = "1.0.0",
        description = r#"
Backend API for quotation management.

- **Quotations**: create, browse, update, duplicate and delete priced offers
- **Templates**: reusable documents with dynamic field definitions
- **Analytics**: dashboards, windowed overviews, revenue trends and conversion funnels
- **Reports**: named analytics export requests

All endpoints except `/auth/*` and `/quotations/public` require a bearer token:

```
Authorization: Bearer <your-jwt-token>
```

Listing endpoints paginate with `skip` + `limit`; there is no enforced
maximum, so keep limits reasonable.
        "#
    ),
    servers(
        (url = "http://localhost:9000", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Login and registration"),
        (name = "Users", description = "User management"),
        (name = "Quotations", description = "Quotation management"),
        (name = "Templates", description = "Template management"),
        (name = "Analytics", description = "Dashboards, trends, funnels and reports")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Auth
        crate::handlers::auth::login,
        crate::handlers::auth::register,

        // Users
        crate::handlers::users::me,
        crate::handlers::users::update_me,
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,

        // Quotations
        crate::handlers::quotations::list_quotations,
        crate::handlers::quotations::list_quotations_public,
        crate::handlers::quotations::create_quotation,
        crate::handlers::quotations::get_quotation,
        crate::handlers::quotations::update_quotation,
        crate::handlers::quotations::delete_quotation,
        crate::handlers::quotations::duplicate_quotation,
        crate::handlers::quotations::get_quotation_stats,

        // Templates
        crate::handlers::templates::list_templates,
        crate::handlers::templates::create_template,
        crate::handlers::templates::get_template,
        crate::handlers::templates::update_template,
        crate::handlers::templates::delete_template,
        crate::handlers::templates::duplicate_template,
        crate::handlers::templates::get_template_categories,
        crate::handlers::templates::get_template_types,

        // Analytics
        crate::handlers::analytics::get_dashboard_metrics,
        crate::handlers::analytics::get_analytics_overview,
        crate::handlers::analytics::get_revenue_trend,
        crate::handlers::analytics::get_conversion_funnel,
        crate::handlers::analytics::list_reports,
        crate::handlers::analytics::create_report,
        crate::handlers::analytics::get_report,
        crate::handlers::analytics::delete_report,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            // Domain types
            crate::models::QuoteStatus,
            crate::models::TemplateType,
            crate::models::FieldKind,
            crate::models::FieldDef,
            crate::models::FieldValidation,
            crate::models::GeoPoint,

            // Auth types
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::TokenResponse,

            // User types
            crate::services::users::RegisterRequest,
            crate::services::users::CreateUserRequest,
            crate::services::users::UpdateUserRequest,
            crate::services::users::UserResponse,

            // Quotation types
            crate::services::quotations::QuotationItemInput,
            crate::services::quotations::CreateQuotationRequest,
            crate::services::quotations::UpdateQuotationRequest,
            crate::services::quotations::QuotationItemResponse,
            crate::services::quotations::QuotationResponse,

            // Template types
            crate::services::templates::CreateTemplateRequest,
            crate::services::templates::UpdateTemplateRequest,
            crate::services::templates::TemplateResponse,
            crate::handlers::templates::CategoryListResponse,
            crate::handlers::templates::TypeListResponse,

            // Analytics types
            crate::services::analytics::DashboardMetrics,
            crate::services::analytics::StatsOverview,
            crate::services::analytics::AnalyticsOverview,
            crate::services::analytics::RevenueTrendPoint,
            crate::services::analytics::FunnelStage,
            crate::services::analytics::RecentQuotation,
            crate::services::reports::CreateReportRequest,
            crate::services::reports::ReportResponse,
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_generation() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Click & Quote API"));
        assert!(json.contains("/api/v1/quotations"));
        assert!(json.contains("/api/v1/analytics/conversion-funnel"));
    }
}
