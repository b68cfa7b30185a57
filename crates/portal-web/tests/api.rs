//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use identity_provider::StaticProvider;
use keyword_classifier::KeywordClassifier;
use lifecycle::LifecycleEngine;
use portal_web::{app, AppState};
use serde_json::{json, Value};
use ticket_core::DomainRoleResolver;
use ticket_store::{MemoryAttachmentStore, MemoryTicketStore};
use tower::ServiceExt;

const MAX_UPLOAD: usize = 64;

fn test_app() -> Router {
    let engine = LifecycleEngine::new(
        Arc::new(MemoryTicketStore::new()),
        Arc::new(MemoryAttachmentStore::with_max_bytes(MAX_UPLOAD)),
        Arc::new(KeywordClassifier::new()),
    )
    .with_default_landlord("boss@landlord.com");

    let identity = StaticProvider::new()
        .with_token("tenant", "a@t.com")
        .with_token("other-tenant", "b@t.com")
        .with_token("landlord", "boss@landlord.com")
        .with_token("contractor", "fix@contractor.com");

    app(AppState::new(
        engine,
        Arc::new(identity),
        Arc::new(DomainRoleResolver::default()),
        MAX_UPLOAD,
    ))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn submit(app: &Router, description: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tickets",
        Some("tenant"),
        Some(json!({ "description": description })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn act(app: &Router, id: &str, token: &str, action: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/tickets/{}/actions", id),
        Some(token),
        Some(action),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "unauthenticated");

    let (status, _) = send(&app, Method::GET, "/api/me", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_reports_role() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/me", Some("landlord"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "boss@landlord.com");
    assert_eq!(body["role"], "landlord");
}

#[tokio::test]
async fn test_submit_and_list() {
    let app = test_app();
    let id = submit(&app, "URGENT leak again").await;

    let (status, body) = send(&app, Method::GET, "/api/tickets", Some("tenant"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id.as_str());
    assert_eq!(body[0]["issue_type"], "Plumbing");
    assert_eq!(body[0]["urgency"], "High");
    assert_eq!(body[0]["tone"], "Frustrated");
    assert_eq!(body[0]["highlight"], true);

    let (_, body) = send(&app, Method::GET, "/api/tickets", Some("other-tenant"), None).await;
    assert_eq!(body, json!([]));
    let (_, body) = send(&app, Method::GET, "/api/tickets", Some("contractor"), None).await;
    assert_eq!(body, json!([]));
    let (_, body) = send(&app, Method::GET, "/api/tickets", Some("landlord"), None).await;
    assert_eq!(body[0]["permitted_actions"][0]["action"], "assign_contractor");
}

#[tokio::test]
async fn test_submit_rejects_staff_and_blank_text() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some("landlord"),
        Some(json!({ "description": "leak" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "unauthorized");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some("tenant"),
        Some(json!({ "description": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "invalid");
}

#[tokio::test]
async fn test_show_enforces_visibility() {
    let app = test_app();
    let id = submit(&app, "Heater is broken").await;
    let uri = format!("/api/tickets/{}", id);

    let (status, body) = send(&app, Method::GET, &uri, Some("tenant"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issue_type"], "Heating/Cooling");

    let (status, _) = send(&app, Method::GET, &uri, Some("other-tenant"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/api/tickets/nope", Some("tenant"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let app = test_app();
    let id = submit(&app, "Sink is leaking").await;

    let (status, body) = act(
        &app,
        &id,
        "landlord",
        json!({ "type": "assign_contractor", "contractor_email": "fix@contractor.com", "task_id": "T-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "In Progress");

    let (status, body) = act(&app, &id, "contractor", json!({ "type": "mark_resolved" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Resolved");
    assert_eq!(body["resolved"], true);

    let (status, body) = act(&app, &id, "tenant", json!({ "type": "confirm" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Closed");
    assert_eq!(body["closed"], true);
    assert_eq!(body["updates"].as_array().unwrap().len(), 4);

    let (status, body) = act(&app, &id, "tenant", json!({ "type": "reject" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "invalid_transition");
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let app = test_app();
    let id = submit(&app, "Sink is leaking").await;

    let (status, _) = act(&app, &id, "tenant", json!({ "type": "assign_contractor", "contractor_email": "x@contractor.com" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = act(
        &app,
        &id,
        "landlord",
        json!({ "type": "assign_contractor", "contractor_email": "not-an-email" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_attachment_upload_and_download() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/attachments?filename=leak.jpg")
        .header(header::AUTHORIZATION, "Bearer tenant")
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(Body::from(vec![1u8, 2, 3, 4]))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let media: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(media["kind"], "image");
    assert_eq!(media["size"], 4);
    let media_id = media["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some("tenant"),
        Some(json!({ "description": "Leak, photo attached", "media": [media_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["media"][0]["filename"], "leak.jpg");

    let request = Request::builder()
        .uri(format!("/api/attachments/{}", media_id))
        .header(header::AUTHORIZATION, "Bearer tenant")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], &[1u8, 2, 3, 4]);

    let (status, _) = send(&app, Method::GET, "/api/attachments/missing", Some("tenant"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/attachments?filename=big.mp4")
        .header(header::AUTHORIZATION, "Bearer tenant")
        .header(header::CONTENT_TYPE, "video/mp4")
        .body(Body::from(vec![0u8; MAX_UPLOAD + 1]))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_without_hosted_page_goes_home() {
    let app = test_app();
    let request = Request::builder().uri("/login").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_portal_page_renders() {
    let app = test_app();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    assert!(html.contains("LandTena SmartTickets"));
    assert!(html.contains("token-form"));
}

#[tokio::test]
async fn test_session_from_login_fragment() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "fragment": "#id_token=landlord&token_type=Bearer&expires_in=3600" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id_token"], "landlord");
    assert_eq!(body["me"]["email"], "boss@landlord.com");
    assert_eq!(body["me"]["role"], "landlord");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "fragment": "#access_token=landlord" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "unauthenticated");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "fragment": "id_token=forged" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
