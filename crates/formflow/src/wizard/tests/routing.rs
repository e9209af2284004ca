use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use super::common::*;
use crate::forms::WizardDefinition;
use crate::wizard::router::{abandon_handler, start_handler};
use crate::wizard::service::WizardService;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn start_route_creates_a_session() {
    let (service, store) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/wizard/sessions", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["current_step"], json!("input-1"));
    assert!(payload["session_id"].as_str().is_some());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn start_handler_accepts_missing_body() {
    let (service, _) = build_service();

    let response = start_handler::<MemoryStore>(State(Arc::new(service)), None).await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn submit_route_merges_and_confirm_route_shows_result() {
    let (service, _) = build_service();
    let id = start(&service);
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/wizard/sessions/{id}/steps/input-2"),
            json!({ "name": "A", "language": "EN", "memo": "x" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["current_step"], json!("input-3"));

    let response = router
        .oneshot(get(&format!("/api/v1/wizard/sessions/{id}/confirm")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["confirm"]["person"]["language"], json!(["EN"]));
    assert_eq!(payload["confirm"]["person"]["memo"], json!("x"));
    assert_eq!(payload["confirm"]["person"]["name"], json!(null));
    assert_eq!(payload["missing_steps"], json!(["input-1", "input-3"]));
}

#[tokio::test]
async fn submit_route_returns_violations() {
    let (service, _) = build_service();
    let id = start(&service);
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/wizard/sessions/{id}/steps/input-1"),
            json!({ "age": 200 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let fields: Vec<_> = payload["violations"]
        .as_array()
        .expect("violations listed")
        .iter()
        .map(|violation| violation["field"].clone())
        .collect();
    assert_eq!(fields, vec![json!("name"), json!("age")]);
}

#[tokio::test]
async fn step_route_renders_owned_fields() {
    let (service, _) = build_service();
    let id = start(&service);
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!("/api/v1/wizard/sessions/{id}/steps/input-2")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["fields"], json!(["language", "memo"]));
    assert_eq!(
        payload["policy"],
        json!({ "mode": "include", "fields": ["language", "memo"] })
    );
}

#[tokio::test]
async fn unknown_step_and_session_return_not_found() {
    let (service, _) = build_service();
    let id = start(&service);
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/v1/wizard/sessions/{id}/steps/input-9")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(get("/api/v1/wizard/sessions/wiz-unknown/confirm"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_route_conflicts_until_every_step_is_submitted() {
    let (service, _) = build_service();
    let id = start(&service);
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/wizard/sessions/{id}/complete"),
            json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["missing_steps"],
        json!(["input-1", "input-2", "input-3"])
    );

    for (step, input) in [
        ("input-1", step1_input()),
        ("input-2", step2_input()),
        ("input-3", step3_input()),
    ] {
        let response = router
            .clone()
            .oneshot(post_json(
                &format!("/api/v1/wizard/sessions/{id}/steps/{step}"),
                serde_json::Value::Object(input),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK, "step {step} accepted");
    }

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/wizard/sessions/{id}/complete"),
            json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["step"], json!("complete"));
    assert_eq!(payload["confirm"]["person"]["name"], json!("A"));
}

#[tokio::test]
async fn abandon_handler_returns_no_content_then_not_found() {
    let (service, _) = build_service();
    let id = start(&service);
    let service = Arc::new(service);

    let response =
        abandon_handler::<MemoryStore>(State(service.clone()), Path(id.0.clone())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = abandon_handler::<MemoryStore>(State(service), Path(id.0)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unavailable_store_maps_to_service_unavailable() {
    let service = Arc::new(WizardService::new(
        Arc::new(UnavailableStore),
        WizardDefinition::splitted_input(),
    ));

    let response = start_handler::<UnavailableStore>(State(service), None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
