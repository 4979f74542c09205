//! services/api/src/web/components.rs
//!
//! Handlers for components within a section.

use crate::web::rest::{port_error, ReorderRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use page_builder_core::domain::{ComponentMetadata, ComponentSettings, TenantContext};
use page_builder_core::service::{ComponentChanges, NewComponent, OrderChange};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponentRequest {
    /// The component type, e.g. `heading`, `paragraph`, `image`, `cta`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Type-dependent payload. Unknown types are stored verbatim.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub content: Value,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub settings: ComponentSettings,
    /// Includes `alt`, which the SEO score and recommendations read for images.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: ComponentMetadata,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateComponentRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub settings: Option<ComponentSettings>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<ComponentMetadata>,
}

/// Append a component to the end of a section.
#[utoipa::path(
    post,
    path = "/sections/{id}/components",
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "The created component"),
        (status = 400, description = "Missing component type"),
        (status = 404, description = "Section not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The section ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn create_component_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(section_id): Path<Uuid>,
    Json(payload): Json<CreateComponentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let input = NewComponent {
        kind: payload.kind,
        content: payload.content,
        settings: payload.settings,
        metadata: payload.metadata,
    };
    let component = app_state
        .service
        .add_component(&ctx, section_id, input)
        .await
        .map_err(|e| port_error("add component", e))?;
    Ok((StatusCode::CREATED, Json(component)))
}

#[utoipa::path(
    put,
    path = "/components/{id}",
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "The updated component"),
        (status = 404, description = "Component not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The component ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn update_component_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(component_id): Path<Uuid>,
    Json(payload): Json<UpdateComponentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let changes = ComponentChanges {
        kind: payload.kind,
        content: payload.content,
        settings: payload.settings,
        metadata: payload.metadata,
    };
    let component = app_state
        .service
        .update_component(&ctx, component_id, changes)
        .await
        .map_err(|e| port_error("update component", e))?;
    Ok(Json(component))
}

#[utoipa::path(
    delete,
    path = "/components/{id}",
    responses(
        (status = 204, description = "Component deleted"),
        (status = 404, description = "Component not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The component ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn delete_component_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(component_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .service
        .delete_component(&ctx, component_id)
        .await
        .map_err(|e| port_error("delete component", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/sections/{id}/components/order",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "The section's components in their new order"),
        (status = 400, description = "The ordering does not match the section's components"),
        (status = 404, description = "Section not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The section ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn reorder_components_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(section_id): Path<Uuid>,
    Json(payload): Json<ReorderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let change = OrderChange::try_from(payload)?;
    let components = app_state
        .service
        .reorder_components(&ctx, section_id, change)
        .await
        .map_err(|e| port_error("reorder components", e))?;
    Ok(Json(components))
}
