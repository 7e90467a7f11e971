#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use clickquote_api::auth::{AuthConfig, AuthService};
use clickquote_api::config::AppConfig;
use clickquote_api::entities::user;
use clickquote_api::handlers::AppServices;
use clickquote_api::models::Role;
use clickquote_api::{app_router, AppState};

pub const TEST_PASSWORD: &str = "password-123";

pub struct TestUser {
    pub id: i32,
    pub email: String,
    pub token: String,
}

/// In-process application over in-memory SQLite with three seeded users:
/// an admin and two ordinary users.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin: TestUser,
    pub alice: TestUser,
    pub bob: TestUser,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("connect sqlite");
        clickquote_api::db::run_migrations(&db)
            .await
            .expect("run migrations");
        let db = Arc::new(db);

        let config = test_config();
        let auth = Arc::new(AuthService::new(
            AuthConfig::new(config.jwt_secret.clone(), Duration::from_secs(1800)),
            db.clone(),
        ));
        let services = AppServices::new(db.clone(), auth.clone());
        let state = AppState {
            db: db.clone(),
            config,
            auth: auth.clone(),
            services,
        };
        let router = app_router(state.clone());

        let admin = seed_user(&state, "Admin", "admin@example.com", Role::Admin).await;
        let alice = seed_user(&state, "Alice", "alice@example.com", Role::User).await;
        let bob = seed_user(&state, "Bob", "bob@example.com", Role::User).await;

        Self {
            router,
            state,
            admin,
            alice,
            bob,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router call")
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "integration_test_secret_that_is_long_enough_123".into(),
        jwt_expiration: 1800,
        host: "127.0.0.1".into(),
        port: 0,
        environment: "development".into(),
        log_level: "info".into(),
        log_json: false,
        auto_migrate: false,
        cors_allowed_origins: None,
        cors_allow_any_origin: false,
        cors_allow_credentials: false,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 30,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 8,
    }
}

async fn seed_user(state: &AppState, name: &str, email: &str, role: Role) -> TestUser {
    let now = Utc::now();
    let model = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        company: Set(None),
        department: Set(None),
        job_title: Set(None),
        address: Set(None),
        city: Set(None),
        county: Set(None),
        postcode: Set(None),
        role: Set(role.to_string()),
        avatar: Set(None),
        hashed_password: Set(state.auth.hash_password(TEST_PASSWORD).expect("hash password")),
        is_active: Set(true),
        join_date: Set(now),
        created_at: Set(now),
        updated_at: Set(Some(now)),
        ..Default::default()
    }
    .insert(&*state.db)
    .await
    .expect("seed user");

    let token = state.auth.generate_token(&model).expect("issue token");
    TestUser {
        id: model.id,
        email: model.email,
        token,
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body json")
}

/// Decimal fields may serialize as JSON strings or numbers depending on the
/// serde representation; accept both.
pub fn as_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {other:?}"),
    }
}
