//! Integration tests for the page builder HTTP API.
//!
//! Drives the full router over the in-memory store: tenant header enforcement,
//! tenant isolation, content editing, and the create → add content → score →
//! recommend flow.

use api_lib::config::Config;
use api_lib::web::{create_router, state::AppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use page_builder_core::memory::InMemoryRepository;
use page_builder_core::service::PageBuilderService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn setup_test_app() -> axum::Router {
    let app_state = Arc::new(AppState {
        service: PageBuilderService::new(Arc::new(InMemoryRepository::new())),
        config: Arc::new(Config::default()),
    });
    create_router(app_state)
}

#[derive(Clone, Copy)]
struct Tenant {
    tenant_id: Uuid,
    user_id: Uuid,
}

impl Tenant {
    fn new() -> Self {
        Self {
            tenant_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }
}

async fn make_request(
    app: &axum::Router,
    method: Method,
    path: &str,
    tenant: Option<Tenant>,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let mut request = Request::builder().method(method).uri(path);
    if let Some(tenant) = tenant {
        request = request
            .header("x-tenant-id", tenant.tenant_id.to_string())
            .header("x-user-id", tenant.user_id.to_string());
    }

    let request = match body {
        Some(json_body) => request
            .header("content-type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json_body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };
    (status, json_body)
}

async fn create_page(app: &axum::Router, tenant: Tenant, path: &str, title: &str) -> Value {
    let (status, body) = make_request(
        app,
        Method::POST,
        "/pages",
        Some(tenant),
        Some(json!({ "path": path, "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body.expect("Expected created page")
}

#[tokio::test]
async fn test_health_endpoint_needs_no_tenant() {
    let app = setup_test_app();

    let (status, body) = make_request(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["status"], "ok");
}

#[tokio::test]
async fn test_tenant_headers_are_required() {
    let app = setup_test_app();

    let (status, _) = make_request(&app, Method::GET, "/pages", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/pages")
        .header("x-tenant-id", "not-a-uuid")
        .header("x-user-id", Uuid::new_v4().to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_page_validation() {
    let app = setup_test_app();
    let tenant = Tenant::new();

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/pages",
        Some(tenant),
        Some(json!({ "path": "/about" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let page = create_page(&app, tenant, "/about", "About").await;
    assert_eq!(page["seo"]["title"], "About");
    assert_eq!(page["seo"]["performance"]["readabilityScore"], 50);
    assert_eq!(page["isPublished"], false);

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/pages",
        Some(tenant),
        Some(json!({ "path": "/about", "title": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_pages_are_isolated_per_tenant() {
    let app = setup_test_app();
    let owner = Tenant::new();
    let page = create_page(&app, owner, "/", "Home").await;
    let page_path = format!("/pages/{}", page["id"].as_str().unwrap());

    let (status, _) = make_request(&app, Method::GET, &page_path, Some(Tenant::new()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = make_request(&app, Method::GET, "/pages", Some(Tenant::new()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!([]));

    let (status, body) = make_request(&app, Method::GET, "/pages", Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_content_score_and_recommendation_flow() {
    let app = setup_test_app();
    let tenant = Tenant::new();
    let page = create_page(&app, tenant, "/seo", "SEO").await;
    let page_id = page["id"].as_str().unwrap().to_string();

    // Add a section with a heading and a paragraph.
    let (status, section) = make_request(
        &app,
        Method::POST,
        &format!("/pages/{}/sections", page_id),
        Some(tenant),
        Some(json!({ "name": "Intro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let section_id = section.unwrap()["id"].as_str().unwrap().to_string();

    for component in [
        json!({ "type": "heading", "content": { "text": "Hello", "level": "h1" } }),
        json!({ "type": "paragraph", "content": { "text": "World" } }),
    ] {
        let (status, _) = make_request(
            &app,
            Method::POST,
            &format!("/sections/{}/components", section_id),
            Some(tenant),
            Some(component),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Score the page.
    let (status, performance) = make_request(
        &app,
        Method::POST,
        &format!("/pages/{}/seo/score", page_id),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let performance = performance.unwrap();
    assert_eq!(performance["score"], 52);
    assert_eq!(performance["mobileOptimized"], true);
    let suggestions = performance["suggestions"].as_array().unwrap();
    assert!(suggestions
        .iter()
        .any(|s| s.as_str().unwrap().starts_with("Make your title longer")));

    // The nested tree comes back in order.
    let (status, tree) = make_request(
        &app,
        Method::GET,
        &format!("/pages/{}", page_id),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tree = tree.unwrap();
    let components = tree["sections"][0]["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["type"], "heading");
    assert_eq!(components[1]["order"], 1);

    // Generate, list and dismiss recommendations.
    let (status, recommendations) = make_request(
        &app,
        Method::POST,
        &format!("/pages/{}/recommendations", page_id),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recommendations = recommendations.unwrap();
    let recommendations = recommendations.as_array().unwrap();
    assert!(recommendations
        .iter()
        .any(|r| r["message"] == "Your SEO title is too short"));
    assert!(recommendations.iter().all(|r| r["dismissed"] == false));

    let first_id = recommendations[0]["id"].as_str().unwrap();
    let (status, dismissed) = make_request(
        &app,
        Method::POST,
        &format!("/recommendations/{}/dismiss", first_id),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dismissed.unwrap()["dismissed"], true);

    let (status, listed) = make_request(
        &app,
        Method::GET,
        &format!("/pages/{}/recommendations", page_id),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed.unwrap().as_array().unwrap().len(),
        recommendations.len() - 1
    );
}

#[tokio::test]
async fn test_reorder_and_delete_sections() {
    let app = setup_test_app();
    let tenant = Tenant::new();
    let page = create_page(&app, tenant, "/", "Home").await;
    let page_id = page["id"].as_str().unwrap().to_string();

    let mut section_ids = Vec::new();
    for name in ["Hero", "Features", "Footer"] {
        let (_, section) = make_request(
            &app,
            Method::POST,
            &format!("/pages/{}/sections", page_id),
            Some(tenant),
            Some(json!({ "name": name })),
        )
        .await;
        section_ids.push(section.unwrap()["id"].as_str().unwrap().to_string());
    }

    let (status, reordered) = make_request(
        &app,
        Method::PUT,
        &format!("/pages/{}/sections/order", page_id),
        Some(tenant),
        Some(json!({ "from": 2, "to": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reordered = reordered.unwrap();
    assert_eq!(reordered[0]["name"], "Footer");
    assert_eq!(reordered[0]["order"], 0);

    let (status, _) = make_request(
        &app,
        Method::PUT,
        &format!("/pages/{}/sections/order", page_id),
        Some(tenant),
        Some(json!({ "sectionIds": [section_ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = make_request(
        &app,
        Method::DELETE,
        &format!("/sections/{}", section_ids[2]),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tree) = make_request(
        &app,
        Method::GET,
        &format!("/pages/{}", page_id),
        Some(tenant),
        None,
    )
    .await;
    let orders: Vec<(String, i64)> = tree.unwrap()["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["name"].as_str().unwrap().to_string(), s["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        orders,
        vec![("Hero".to_string(), 0), ("Features".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_component_add_update_reorder_and_delete() {
    let app = setup_test_app();
    let tenant = Tenant::new();
    let page = create_page(&app, tenant, "/", "Home").await;
    let page_id = page["id"].as_str().unwrap().to_string();
    let (_, section) = make_request(
        &app,
        Method::POST,
        &format!("/pages/{}/sections", page_id),
        Some(tenant),
        Some(json!({ "name": "Hero" })),
    )
    .await;
    let section_id = section.unwrap()["id"].as_str().unwrap().to_string();

    let mut component_ids = Vec::new();
    for (kind, content) in [
        ("heading", json!({ "text": "Welcome", "level": "h1" })),
        ("paragraph", json!({ "text": "Intro" })),
        ("image", json!({ "src": "hero.png" })),
    ] {
        let (status, component) = make_request(
            &app,
            Method::POST,
            &format!("/sections/{}/components", section_id),
            Some(tenant),
            Some(json!({ "type": kind, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let component = component.unwrap();
        assert_eq!(component["type"], kind);
        assert_eq!(component["order"], component_ids.len() as i64);
        component_ids.push(component["id"].as_str().unwrap().to_string());
    }

    let (status, updated) = make_request(
        &app,
        Method::PUT,
        &format!("/components/{}", component_ids[0]),
        Some(tenant),
        Some(json!({ "content": { "text": "Hello again", "level": "h2" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = updated.unwrap();
    assert_eq!(updated["content"]["text"], "Hello again");
    assert_eq!(updated["order"], 0);

    let (status, reordered) = make_request(
        &app,
        Method::PUT,
        &format!("/sections/{}/components/order", section_id),
        Some(tenant),
        Some(json!({
            "componentIds": [component_ids[2], component_ids[0], component_ids[1]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = reordered
        .as_ref()
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            component_ids[2].as_str(),
            component_ids[0].as_str(),
            component_ids[1].as_str()
        ]
    );

    let (status, _) = make_request(
        &app,
        Method::PUT,
        &format!("/sections/{}/components/order", section_id),
        Some(tenant),
        Some(json!({ "componentOrder": [component_ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = make_request(
        &app,
        Method::DELETE,
        &format!("/components/{}", component_ids[2]),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = make_request(
        &app,
        Method::DELETE,
        &format!("/components/{}", component_ids[0]),
        Some(Tenant::new()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tree) = make_request(
        &app,
        Method::GET,
        &format!("/pages/{}", page_id),
        Some(tenant),
        None,
    )
    .await;
    let tree = tree.unwrap();
    let components: Vec<(String, i64)> = tree["sections"][0]["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["id"].as_str().unwrap().to_string(), c["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        components,
        vec![(component_ids[0].clone(), 0), (component_ids[1].clone(), 1)]
    );
}

#[tokio::test]
async fn test_apply_recommendation_fix() {
    let app = setup_test_app();
    let tenant = Tenant::new();
    let page = create_page(&app, tenant, "/", "Tax Planning Services").await;
    let page_id = page["id"].as_str().unwrap().to_string();

    // Blank the SEO title so the page title can be offered as a fix.
    let (status, _) = make_request(
        &app,
        Method::PUT,
        &format!("/pages/{}", page_id),
        Some(tenant),
        Some(json!({ "seo": { "title": "" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, recommendations) = make_request(
        &app,
        Method::POST,
        &format!("/pages/{}/recommendations", page_id),
        Some(tenant),
        None,
    )
    .await;
    let recommendations = recommendations.unwrap();
    let fixable = recommendations
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["autoFixAvailable"] == true)
        .expect("Expected a fixable recommendation");
    let manual = recommendations
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["autoFixAvailable"] == false)
        .expect("Expected a manual recommendation");

    let (status, _) = make_request(
        &app,
        Method::POST,
        &format!("/recommendations/{}/apply", manual["id"].as_str().unwrap()),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = make_request(
        &app,
        Method::POST,
        &format!("/recommendations/{}/apply", fixable["id"].as_str().unwrap()),
        Some(tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.unwrap()["seo"]["title"], "Tax Planning Services");
}
