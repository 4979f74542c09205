//! services/api/src/web/sections.rs
//!
//! Handlers for sections within a page.

use crate::web::rest::{port_error, ReorderRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use page_builder_core::domain::{SectionSettings, TenantContext};
use page_builder_core::service::{NewSection, OrderChange, SectionChanges};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    #[serde(default)]
    pub name: String,
    /// Padding, `fullWidth`, background and `minHeight`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub settings: SectionSettings,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSectionRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub settings: Option<SectionSettings>,
}

/// Append a section to the end of a page.
#[utoipa::path(
    post,
    path = "/pages/{id}/sections",
    request_body = CreateSectionRequest,
    responses(
        (status = 201, description = "The created section"),
        (status = 400, description = "Missing section name"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn create_section_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let input = NewSection {
        name: payload.name,
        settings: payload.settings,
    };
    let section = app_state
        .service
        .add_section(&ctx, page_id, input)
        .await
        .map_err(|e| port_error("add section", e))?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[utoipa::path(
    put,
    path = "/sections/{id}",
    request_body = UpdateSectionRequest,
    responses(
        (status = 200, description = "The updated section"),
        (status = 404, description = "Section not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The section ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn update_section_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(section_id): Path<Uuid>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let changes = SectionChanges {
        name: payload.name,
        settings: payload.settings,
    };
    let section = app_state
        .service
        .update_section(&ctx, section_id, changes)
        .await
        .map_err(|e| port_error("update section", e))?;
    Ok(Json(section))
}

/// Delete a section and its components; the remaining sections are renumbered.
#[utoipa::path(
    delete,
    path = "/sections/{id}",
    responses(
        (status = 204, description = "Section deleted"),
        (status = 404, description = "Section not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The section ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn delete_section_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(section_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .service
        .delete_section(&ctx, section_id)
        .await
        .map_err(|e| port_error("delete section", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/pages/{id}/sections/order",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "The page's sections in their new order"),
        (status = 400, description = "The ordering does not match the page's sections"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn reorder_sections_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<ReorderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let change = OrderChange::try_from(payload)?;
    let sections = app_state
        .service
        .reorder_sections(&ctx, page_id, change)
        .await
        .map_err(|e| port_error("reorder sections", e))?;
    Ok(Json(sections))
}
