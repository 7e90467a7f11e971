//! Request id propagation.
//!
//! A middleware assigns every request an id (honoring an incoming
//! `x-request-id` header), scopes it into a task-local so response wrappers
//! and error bodies can stamp it, and echoes it back on the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("req-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static REQUEST_ID: RequestId;
}

/// Runs `fut` with the given request id installed in the task-local.
pub async fn scope_request_id<F: Future>(id: RequestId, fut: F) -> F::Output {
    REQUEST_ID.scope(id, fut).await
}

/// Current request id, if the caller runs inside a scoped request.
pub fn current_request_id() -> Option<RequestId> {
    REQUEST_ID.try_with(|rid| rid.clone()).ok()
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let rid = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate);

    let header_value = HeaderValue::from_str(rid.as_str()).ok();

    let mut response = scope_request_id(rid, next.run(request)).await;
    if let Some(value) = header_value {
        response.headers_mut().insert(&REQUEST_ID_HEADER, value);
    }
    response
}
