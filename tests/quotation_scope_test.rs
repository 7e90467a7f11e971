mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::{as_decimal, body_json, TestApp};

async fn create_quotation(app: &TestApp, token: &str, payload: Value) -> Value {
    let response = app
        .request(Method::POST, "/api/v1/quotations", Some(token), Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn two_item_payload() -> Value {
    json!({
        "description": "Substation connection works",
        "customer_name": "Thames Power Ltd",
        "customer_email": "contact@thamespower.co.uk",
        "site_address": "12 High Street, Camden, London NW1",
        "status": "draft",
        "items": [
            { "name": "Cable run", "quantity": 2, "unit_price": "500.00", "total": "1000.00" },
            { "name": "Metering", "quantity": 1, "unit_price": "500.00" }
        ]
    })
}

#[tokio::test]
async fn foreign_read_is_forbidden_but_admin_sees_everything() {
    let app = TestApp::new().await;

    let created = create_quotation(&app, &app.alice.token, two_item_payload()).await;
    let id = created["id"].as_i64().expect("quotation id");
    assert_eq!(as_decimal(&created["total_amount"]), dec!(1500.00));
    assert_eq!(created["status"], "draft");
    assert_eq!(created["created_by"].as_i64(), Some(app.alice.id as i64));

    // A different non-admin caller gets 403, not 404
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.bob.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin sees the full row including items
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.admin.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn listing_is_scoped_to_owner() {
    let app = TestApp::new().await;

    create_quotation(&app, &app.alice.token, two_item_payload()).await;
    create_quotation(
        &app,
        &app.bob.token,
        json!({
            "description": "Street lighting",
            "customer_name": "Borough Council",
            "customer_email": "lighting@borough.gov.uk",
            "items": []
        }),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations",
            Some(&app.alice.token),
            None,
        )
        .await;
    let body = body_json(response).await;
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert!(items
        .iter()
        .all(|q| q["created_by"].as_i64() == Some(app.alice.id as i64)));

    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations",
            Some(&app.admin.token),
            None,
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"].as_u64(), Some(2));
}

#[tokio::test]
async fn list_filters_apply_on_top_of_scope() {
    let app = TestApp::new().await;

    create_quotation(&app, &app.alice.token, two_item_payload()).await;
    create_quotation(
        &app,
        &app.alice.token,
        json!({
            "description": "EV chargers",
            "customer_name": "Northern Grid Services",
            "customer_email": "ops@northgrid.co.uk",
            "status": "approved",
            "total_amount": "900.00",
            "items": []
        }),
    )
    .await;

    // Status filter, including a legacy alias spelling
    for status in ["approved", "accepted"] {
        let response = app
            .request(
                Method::GET,
                &format!("/api/v1/quotations?status={status}"),
                Some(&app.alice.token),
                None,
            )
            .await;
        let body = body_json(response).await;
        assert_eq!(body["data"]["total"].as_u64(), Some(1), "status={status}");
        assert_eq!(body["data"]["items"][0]["status"], "approved");
    }

    // Case-insensitive substring match on customer name
    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations?customer_name=northern%20grid",
            Some(&app.alice.token),
            None,
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"].as_u64(), Some(1));
    assert_eq!(
        body["data"]["items"][0]["customer_name"],
        "Northern Grid Services"
    );

    // Unknown status is a validation error
    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations?status=shipped",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn foreign_mutations_are_forbidden_and_change_nothing() {
    let app = TestApp::new().await;

    let created = create_quotation(&app, &app.alice.token, two_item_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.bob.token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.bob.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Still intact and unchanged for the owner
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["items"].as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/quotations/9999",
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::DELETE,
            "/api/v1/quotations/9999",
            Some(&app.admin.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_item_list_wholesale() {
    let app = TestApp::new().await;

    let created = create_quotation(&app, &app.alice.token, two_item_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.alice.token),
            Some(json!({
                "status": "submitted",
                "total_amount": "250.00",
                "items": [
                    { "name": "Survey visit", "quantity": 1, "unit_price": "250.00" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // Legacy alias folded onto the canonical vocabulary
    assert_eq!(body["data"]["status"], "pending");
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Survey visit");
    assert_eq!(as_decimal(&items[0]["total"]), dec!(250.00));
}

#[tokio::test]
async fn item_totals_are_validated_on_write() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/quotations",
            Some(&app.alice.token),
            Some(json!({
                "description": "Bad math",
                "customer_name": "Somebody",
                "customer_email": "somebody@example.com",
                "items": [
                    { "name": "Cable", "quantity": 2, "unit_price": "10.00", "total": "25.00" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request(
            Method::POST,
            "/api/v1/quotations",
            Some(&app.alice.token),
            Some(json!({
                "description": "Negative quantity",
                "customer_name": "Somebody",
                "customer_email": "somebody@example.com",
                "items": [
                    { "name": "Cable", "quantity": -1, "unit_price": "10.00" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_resets_identity_and_copies_items() {
    let app = TestApp::new().await;

    let created = create_quotation(
        &app,
        &app.alice.token,
        json!({
            "description": "Original",
            "customer_name": "Thames Power Ltd",
            "customer_email": "contact@thamespower.co.uk",
            "status": "approved",
            "items": [
                { "name": "Cable run", "quantity": 2, "unit_price": "500.00" },
                { "name": "Metering", "quantity": 1, "unit_price": "500.00" }
            ]
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Admin may duplicate another user's quotation; the copy belongs to the admin
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/quotations/{id}/duplicate"),
            Some(&app.admin.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = body_json(response).await["data"].clone();

    assert_ne!(copy["id"], created["id"]);
    assert_ne!(copy["quote_number"], created["quote_number"]);
    assert_eq!(copy["status"], "draft");
    assert_eq!(copy["created_by"].as_i64(), Some(app.admin.id as i64));

    let original_items = created["items"].as_array().unwrap();
    let copied_items = copy["items"].as_array().unwrap();
    assert_eq!(original_items.len(), copied_items.len());
    for (original, copied) in original_items.iter().zip(copied_items) {
        assert_ne!(original["id"], copied["id"]);
        assert_eq!(original["name"], copied["name"]);
        assert_eq!(original["quantity"], copied["quantity"]);
        assert_eq!(
            as_decimal(&original["unit_price"]),
            as_decimal(&copied["unit_price"])
        );
        assert_eq!(as_decimal(&original["total"]), as_decimal(&copied["total"]));
    }

    // A third non-admin user may not duplicate it
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/quotations/{id}/duplicate"),
            Some(&app.bob.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_listing_requires_no_token() {
    let app = TestApp::new().await;

    create_quotation(&app, &app.alice.token, two_item_payload()).await;

    let response = app
        .request(Method::GET, "/api/v1/quotations/public", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"].as_u64(), Some(1));
}

#[tokio::test]
async fn delete_cascades_to_items() {
    let app = TestApp::new().await;

    let created = create_quotation(&app, &app.alice.token, two_item_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/quotations/{id}"),
            Some(&app.alice.token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    use clickquote_api::entities::quotation_item;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    let leftovers = quotation_item::Entity::find()
        .filter(quotation_item::Column::QuotationId.eq(id as i32))
        .all(&*app.state.db)
        .await
        .expect("query items");
    assert!(leftovers.is_empty());
}
