//! services/api/src/web/seo.rs
//!
//! Handlers for SEO scoring and the stored recommendation workflow.

use crate::web::rest::port_error;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use page_builder_core::domain::TenantContext;
use std::sync::Arc;
use uuid::Uuid;

/// Recompute and persist the page's SEO performance.
#[utoipa::path(
    post,
    path = "/pages/{id}/seo/score",
    responses(
        (status = 200, description = "`{score, suggestions, keywordDensity, readabilityScore, mobileOptimized}`"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn score_page_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let performance = app_state
        .service
        .refresh_performance(&ctx, page_id)
        .await
        .map_err(|e| port_error("score page", e))?;
    Ok(Json(performance))
}

/// Generate recommendations for the page, replacing any stored set.
#[utoipa::path(
    post,
    path = "/pages/{id}/recommendations",
    responses(
        (status = 200, description = "The new recommendations"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn generate_recommendations_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recommendations = app_state
        .service
        .generate_recommendations(&ctx, page_id)
        .await
        .map_err(|e| port_error("generate recommendations", e))?;
    Ok(Json(recommendations))
}

/// Stored recommendations that have not been dismissed.
#[utoipa::path(
    get,
    path = "/pages/{id}/recommendations",
    responses(
        (status = 200, description = "Array of stored recommendations"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn list_recommendations_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recommendations = app_state
        .service
        .list_recommendations(&ctx, page_id)
        .await
        .map_err(|e| port_error("list recommendations", e))?;
    Ok(Json(recommendations))
}

#[utoipa::path(
    post,
    path = "/recommendations/{id}/dismiss",
    responses(
        (status = 200, description = "The dismissed recommendation"),
        (status = 404, description = "Recommendation not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The recommendation ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn dismiss_recommendation_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(recommendation_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recommendation = app_state
        .service
        .dismiss_recommendation(&ctx, recommendation_id)
        .await
        .map_err(|e| port_error("dismiss recommendation", e))?;
    Ok(Json(recommendation))
}

/// Apply a recommendation's automatic fix to the page.
#[utoipa::path(
    post,
    path = "/recommendations/{id}/apply",
    responses(
        (status = 200, description = "The updated page"),
        (status = 400, description = "The recommendation has no automatic fix"),
        (status = 404, description = "Recommendation not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The recommendation ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn apply_recommendation_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(recommendation_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = app_state
        .service
        .apply_recommendation(&ctx, recommendation_id)
        .await
        .map_err(|e| port_error("apply recommendation", e))?;
    Ok(Json(page))
}
