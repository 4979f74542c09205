pub mod components;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod sections;
pub mod seo;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use middleware::require_tenant;
pub use rest::ApiDoc;
pub use state::AppState;

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(middleware::TENANT_HEADER),
            HeaderName::from_static(middleware::USER_HEADER),
        ]);
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!("Ignoring invalid CORS origin '{}'", allowed_origin);
            layer
        }
    }
}

/// Builds the complete application: tenant-scoped API routes, the health
/// check and the Swagger UI.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let config = app_state.config.clone();

    // Tenant-scoped routes (x-tenant-id and x-user-id required)
    let tenant_routes = Router::new()
        .route(
            "/pages",
            get(pages::list_pages_handler).post(pages::create_page_handler),
        )
        .route(
            "/pages/{id}",
            get(pages::get_page_handler)
                .put(pages::update_page_handler)
                .delete(pages::delete_page_handler),
        )
        .route("/pages/{id}/publish", post(pages::toggle_publish_handler))
        .route("/pages/{id}/sections", post(sections::create_section_handler))
        .route(
            "/pages/{id}/sections/order",
            put(sections::reorder_sections_handler),
        )
        .route(
            "/sections/{id}",
            put(sections::update_section_handler).delete(sections::delete_section_handler),
        )
        .route(
            "/sections/{id}/components",
            post(components::create_component_handler),
        )
        .route(
            "/sections/{id}/components/order",
            put(components::reorder_components_handler),
        )
        .route(
            "/components/{id}",
            put(components::update_component_handler)
                .delete(components::delete_component_handler),
        )
        .route("/pages/{id}/seo/score", post(seo::score_page_handler))
        .route(
            "/pages/{id}/recommendations",
            get(seo::list_recommendations_handler).post(seo::generate_recommendations_handler),
        )
        .route(
            "/recommendations/{id}/dismiss",
            post(seo::dismiss_recommendation_handler),
        )
        .route(
            "/recommendations/{id}/apply",
            post(seo::apply_recommendation_handler),
        )
        .layer(axum_middleware::from_fn(require_tenant));

    let api_router = Router::new()
        .route("/health", get(rest::health_handler))
        .merge(tenant_routes)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_allowed_origin))
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
