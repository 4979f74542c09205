//! services/api/src/web/middleware.rs
//!
//! Tenant resolution for protected routes.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use page_builder_core::domain::TenantContext;
use tracing::warn;
use uuid::Uuid;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Uuid, (StatusCode, String)> {
    let raw = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("{} header is required", name)))?;

    Uuid::parse_str(raw.trim())
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid {} format", name)))
}

/// Middleware that reads the tenant and user ids from the request headers.
///
/// On success a `TenantContext` is inserted into the request extensions for
/// handlers to use. Missing or malformed headers return 400 Bad Request.
pub async fn require_tenant(
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let headers = req.headers();
    let context = uuid_header(headers, TENANT_HEADER)
        .and_then(|tenant_id| {
            uuid_header(headers, USER_HEADER).map(|user_id| TenantContext { tenant_id, user_id })
        })
        .map_err(|rejection| {
            warn!(path = %req.uri().path(), "Rejected request: {}", rejection.1);
            rejection
        })?;

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
