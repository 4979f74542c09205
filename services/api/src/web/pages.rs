//! services/api/src/web/pages.rs
//!
//! Handlers for the page resource: listing, the nested page tree, create,
//! update, delete and the publish toggle.

use crate::web::rest::port_error;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use page_builder_core::domain::{PageMetadata, SeoGoal, TenantContext};
use page_builder_core::service::{NewPage, PageChanges, SeoSettingsInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payload Structs
//=========================================================================================

/// Client-editable SEO fields. Performance is computed by the server.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettingsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub primary_keyword: Option<String>,
    /// One of `local`, `industry`, `conversion`, `technical`.
    #[schema(value_type = Option<String>)]
    pub seo_goal: Option<SeoGoal>,
    pub canonical: Option<String>,
    pub og_image: Option<String>,
}

impl From<SeoSettingsRequest> for SeoSettingsInput {
    fn from(req: SeoSettingsRequest) -> Self {
        SeoSettingsInput {
            title: req.title,
            description: req.description,
            keywords: req.keywords,
            primary_keyword: req.primary_keyword,
            seo_goal: req.seo_goal,
            canonical: req.canonical,
            og_image: req.og_image,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub page_type: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: PageMetadata,
    #[serde(default)]
    pub seo: SeoSettingsRequest,
}

impl From<CreatePageRequest> for NewPage {
    fn from(req: CreatePageRequest) -> Self {
        NewPage {
            path: req.path,
            title: req.title,
            description: req.description,
            page_type: req.page_type,
            metadata: req.metadata,
            seo: req.seo.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePageRequest {
    pub path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub page_type: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<PageMetadata>,
    pub seo: Option<SeoSettingsRequest>,
}

impl From<UpdatePageRequest> for PageChanges {
    fn from(req: UpdatePageRequest) -> Self {
        PageChanges {
            path: req.path,
            title: req.title,
            description: req.description,
            page_type: req.page_type,
            metadata: req.metadata,
            seo: req.seo.map(Into::into),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List the tenant's pages, most recently updated first.
#[utoipa::path(
    get,
    path = "/pages",
    responses(
        (status = 200, description = "Array of pages with their SEO settings and performance"),
        (status = 400, description = "Missing or malformed tenant headers")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the pages."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn list_pages_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let pages = app_state
        .service
        .list_pages(&ctx)
        .await
        .map_err(|e| port_error("list pages", e))?;
    Ok(Json(pages))
}

/// Create a page. Title and path are required; the path must be unused by the tenant.
#[utoipa::path(
    post,
    path = "/pages",
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "The created page, with its initial SEO performance"),
        (status = 400, description = "Missing title or path, or missing tenant headers"),
        (status = 409, description = "A page with this path already exists")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user creating the page.")
    )
)]
pub async fn create_page_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<CreatePageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = app_state
        .service
        .create_page(&ctx, payload.into())
        .await
        .map_err(|e| port_error("create page", e))?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// Fetch a page with its sections and their components, in order.
#[utoipa::path(
    get,
    path = "/pages/{id}",
    responses(
        (status = 200, description = "The page with nested `sections[].components[]`"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn get_page_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tree = app_state
        .service
        .get_page(&ctx, page_id)
        .await
        .map_err(|e| port_error("load page", e))?;
    Ok(Json(tree))
}

/// Update page fields and SEO settings; SEO performance is recomputed.
#[utoipa::path(
    put,
    path = "/pages/{id}",
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "The updated page"),
        (status = 404, description = "Page not found for this tenant"),
        (status = 409, description = "A page with this path already exists")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn update_page_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<UpdatePageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = app_state
        .service
        .update_page(&ctx, page_id, payload.into())
        .await
        .map_err(|e| port_error("update page", e))?;
    Ok(Json(page))
}

/// Delete a page with all of its sections, components and recommendations.
#[utoipa::path(
    delete,
    path = "/pages/{id}",
    responses(
        (status = 204, description = "Page deleted"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn delete_page_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .service
        .delete_page(&ctx, page_id)
        .await
        .map_err(|e| port_error("delete page", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the page between published and draft.
#[utoipa::path(
    post,
    path = "/pages/{id}/publish",
    responses(
        (status = 200, description = "The page with its new publish status"),
        (status = 404, description = "Page not found for this tenant")
    ),
    params(
        ("id" = Uuid, Path, description = "The page ID."),
        ("x-tenant-id" = Uuid, Header, description = "The tenant that owns the page."),
        ("x-user-id" = Uuid, Header, description = "The user acting for the tenant.")
    )
)]
pub async fn toggle_publish_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = app_state
        .service
        .toggle_publish(&ctx, page_id)
        .await
        .map_err(|e| port_error("toggle publish status", e))?;
    Ok(Json(page))
}
