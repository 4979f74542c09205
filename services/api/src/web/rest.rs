//! services/api/src/web/rest.rs
//!
//! Shared pieces of the REST API: the master definition for the OpenAPI
//! specification, payloads used by more than one resource, the mapping from
//! service errors to HTTP responses and the health endpoint.

use crate::web::{components, pages, sections, seo};
use axum::{http::StatusCode, response::IntoResponse, Json};
use page_builder_core::ports::PortError;
use page_builder_core::service::OrderChange;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        pages::list_pages_handler,
        pages::create_page_handler,
        pages::get_page_handler,
        pages::update_page_handler,
        pages::delete_page_handler,
        pages::toggle_publish_handler,
        sections::create_section_handler,
        sections::update_section_handler,
        sections::delete_section_handler,
        sections::reorder_sections_handler,
        components::create_component_handler,
        components::update_component_handler,
        components::delete_component_handler,
        components::reorder_components_handler,
        seo::score_page_handler,
        seo::generate_recommendations_handler,
        seo::list_recommendations_handler,
        seo::dismiss_recommendation_handler,
        seo::apply_recommendation_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReorderRequest,
            pages::SeoSettingsRequest,
            pages::CreatePageRequest,
            pages::UpdatePageRequest,
            sections::CreateSectionRequest,
            sections::UpdateSectionRequest,
            components::CreateComponentRequest,
            components::UpdateComponentRequest,
        )
    ),
    tags(
        (name = "Page Builder API", description = "Multi-tenant pages, their content tree and SEO analysis.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// A new sibling ordering. Either `ids` (every sibling exactly once, in the
/// new order) or a single move `from` one index `to` another.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(
        default,
        alias = "sectionIds",
        alias = "componentIds",
        alias = "sectionOrder",
        alias = "componentOrder"
    )]
    pub ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub from: Option<usize>,
    #[serde(default)]
    pub to: Option<usize>,
}

impl TryFrom<ReorderRequest> for OrderChange {
    type Error = (StatusCode, String);

    fn try_from(req: ReorderRequest) -> Result<Self, Self::Error> {
        match (req.ids, req.from, req.to) {
            (Some(ids), None, None) => Ok(OrderChange::Ids(ids)),
            (None, Some(from), Some(to)) => Ok(OrderChange::Move { from, to }),
            _ => Err((
                StatusCode::BAD_REQUEST,
                "Provide either an ordered list of ids or both from and to".to_string(),
            )),
        }
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Logs a service error and converts it into the handler error response.
pub fn port_error(action: &str, e: PortError) -> (StatusCode, String) {
    let status = match &e {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Conflict(_) => StatusCode::CONFLICT,
        PortError::Invalid(_) => StatusCode::BAD_REQUEST,
        PortError::Unauthorized => StatusCode::FORBIDDEN,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!("Failed to {}: {:?}", action, e);

    let message = match e {
        PortError::NotFound(msg) | PortError::Conflict(msg) | PortError::Invalid(msg) => msg,
        PortError::Unauthorized => "Access denied".to_string(),
        PortError::Unexpected(_) => format!("Failed to {}", action),
    };
    (status, message)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check. Does not require tenant headers.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The service is running", body = HealthResponse)
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_status_codes() {
        let cases = [
            (PortError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PortError::Conflict("x".into()), StatusCode::CONFLICT),
            (PortError::Invalid("x".into()), StatusCode::BAD_REQUEST),
            (PortError::Unauthorized, StatusCode::FORBIDDEN),
            (PortError::Unexpected("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(port_error("test", err).0, expected);
        }
    }

    #[test]
    fn unexpected_errors_hide_details() {
        let (_, message) = port_error("load page", PortError::Unexpected("db down".into()));
        assert_eq!(message, "Failed to load page");
    }

    #[test]
    fn reorder_request_needs_exactly_one_shape() {
        let moved: OrderChange = ReorderRequest {
            from: Some(1),
            to: Some(0),
            ..Default::default()
        }
        .try_into()
        .unwrap();
        assert_eq!(moved, OrderChange::Move { from: 1, to: 0 });

        let parsed: ReorderRequest =
            serde_json::from_str(r#"{"sectionIds": ["00000000-0000-0000-0000-000000000000"]}"#)
                .unwrap();
        assert!(matches!(OrderChange::try_from(parsed), Ok(OrderChange::Ids(ids)) if ids.len() == 1));

        let empty = OrderChange::try_from(ReorderRequest::default());
        assert!(empty.is_err());
    }
}
