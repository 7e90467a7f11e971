mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::{as_decimal, body_json, TestApp};

async fn seed_quotation(app: &TestApp, token: &str, status: &str, amount: &str) {
    let response = app
        .request(
            Method::POST,
            "/api/v1/quotations",
            Some(token),
            Some(json!({
                "description": format!("{status} quotation"),
                "customer_name": "Thames Power Ltd",
                "customer_email": "contact@thamespower.co.uk",
                "status": status,
                "total_amount": amount,
                "items": []
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// draft 100 + pending 200 + approved 300, all owned by alice.
async fn seed_mixed_statuses(app: &TestApp) {
    seed_quotation(app, &app.alice.token, "draft", "100.00").await;
    seed_quotation(app, &app.alice.token, "pending", "200.00").await;
    seed_quotation(app, &app.alice.token, "approved", "300.00").await;
}

fn assert_close(value: f64, expected: f64) {
    assert!(
        (value - expected).abs() < 1e-9,
        "expected {expected}, got {value}"
    );
}

#[tokio::test]
async fn windowed_overview_matches_seeded_rows() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/overview?days=30",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["period_days"].as_i64(), Some(30));
    assert_eq!(data["total_quotations"].as_i64(), Some(3));
    assert_eq!(as_decimal(&data["total_revenue"]), dec!(300.00));
    assert_eq!(as_decimal(&data["average_quotation_value"]), dec!(200.00));
    assert_eq!(
        data["status_distribution"],
        json!({ "draft": 1, "pending": 1, "approved": 1 })
    );
}

#[tokio::test]
async fn conversion_funnel_matches_seeded_rows() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/conversion-funnel?days=30",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let stages = data.as_array().expect("funnel stages");
    assert_eq!(stages.len(), 5);

    let stage = |name: &str| -> &Value {
        stages
            .iter()
            .find(|s| s["stage"] == name)
            .unwrap_or_else(|| panic!("missing stage {name}"))
    };

    assert_eq!(stage("Created")["count"].as_i64(), Some(3));
    assert_close(stage("Created")["percentage"].as_f64().unwrap(), 100.0);
    assert_eq!(stage("Draft")["count"].as_i64(), Some(1));
    assert_close(stage("Draft")["percentage"].as_f64().unwrap(), 33.33);
    assert_close(stage("Pending")["percentage"].as_f64().unwrap(), 33.33);
    assert_close(stage("Approved")["percentage"].as_f64().unwrap(), 33.33);
    assert_eq!(stage("Rejected")["count"].as_i64(), Some(0));
    assert_close(stage("Rejected")["percentage"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn funnel_is_all_zero_for_empty_window() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/conversion-funnel?days=30",
            Some(&app.bob.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    for stage in data.as_array().expect("funnel stages") {
        assert_eq!(stage["count"].as_i64(), Some(0));
        assert_close(stage["percentage"].as_f64().unwrap(), 0.0);
    }
}

#[tokio::test]
async fn dashboard_metrics_cover_revenue_and_conversion() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/dashboard",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["total_quotations"].as_i64(), Some(3));
    assert_eq!(data["draft_quotations"].as_i64(), Some(1));
    assert_eq!(data["pending_quotations"].as_i64(), Some(1));
    assert_eq!(data["approved_quotations"].as_i64(), Some(1));
    assert_eq!(data["rejected_quotations"].as_i64(), Some(0));
    assert_eq!(as_decimal(&data["total_revenue"]), dec!(300.00));
    // Rows were created moments ago, so they land in the current month
    assert_eq!(as_decimal(&data["monthly_revenue"]), dec!(300.00));
    assert_close(data["conversion_rate"].as_f64().unwrap(), 33.33);
    assert_eq!(
        data["recent_quotations"].as_array().map(|a| a.len()),
        Some(3)
    );
    // Activity trail recorded the three creations
    assert_eq!(data["recent_activity"].as_array().map(|a| a.len()), Some(3));
}

#[tokio::test]
async fn analytics_respect_the_visibility_scope() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;
    seed_quotation(&app, &app.bob.token, "approved", "1000.00").await;

    // Bob only sees his own row
    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/overview?days=30",
            Some(&app.bob.token),
            None,
        )
        .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total_quotations"].as_i64(), Some(1));
    assert_eq!(as_decimal(&data["total_revenue"]), dec!(1000.00));

    // The admin aggregates everything
    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/overview?days=30",
            Some(&app.admin.token),
            None,
        )
        .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total_quotations"].as_i64(), Some(4));
    assert_eq!(as_decimal(&data["total_revenue"]), dec!(1300.00));
}

#[tokio::test]
async fn revenue_trend_groups_by_day_and_skips_empty_days() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/revenue-trend?days=30",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let points = data.as_array().expect("trend points");

    // Only today carries approved revenue; no gap filling
    assert_eq!(points.len(), 1);
    assert_eq!(as_decimal(&points[0]["revenue"]), dec!(300.00));

    // An empty scope produces an empty series, not an error
    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/revenue-trend?days=30",
            Some(&app.bob.token),
            None,
        )
        .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data.as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn window_bounds_are_validated() {
    let app = TestApp::new().await;

    for query in ["days=0", "days=-5", "days=400"] {
        let response = app
            .request(
                Method::GET,
                &format!("/api/v1/analytics/overview?{query}"),
                Some(&app.alice.token),
                None,
            )
            .await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "query {query}"
        );
    }
}

#[tokio::test]
async fn quotation_stats_overview_is_scoped() {
    let app = TestApp::new().await;
    seed_mixed_statuses(&app).await;
    seed_quotation(&app, &app.bob.token, "rejected", "50.00").await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations/stats/overview",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total_quotations"].as_i64(), Some(3));
    assert_eq!(data["pending_quotations"].as_i64(), Some(1));
    assert_eq!(data["approved_quotations"].as_i64(), Some(1));
    assert_eq!(data["rejected_quotations"].as_i64(), Some(0));
    assert_eq!(as_decimal(&data["total_revenue"]), dec!(300.00));
}

#[tokio::test]
async fn reports_are_scoped_and_start_processing() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/analytics/reports",
            Some(&app.alice.token),
            Some(json!({
                "name": "Monthly summary",
                "report_type": "summary",
                "filters": { "date_range": "30days" }
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await["data"].clone();
    assert_eq!(report["status"], "processing");
    assert_eq!(report["format"], "PDF");
    let report_id = report["id"].as_i64().unwrap();

    // Another user cannot read or delete it
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/analytics/reports/{report_id}"),
            Some(&app.bob.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/reports",
            Some(&app.bob.token),
            None,
        )
        .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data.as_array().map(|a| a.len()), Some(0));

    // The owner and the admin can
    for token in [&app.alice.token, &app.admin.token] {
        let response = app
            .request(
                Method::GET,
                &format!("/api/v1/analytics/reports/{report_id}"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/analytics/reports/{report_id}"),
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
