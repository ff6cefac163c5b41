use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use super::*;
use crate::backend::{Method, UpstreamBody, UpstreamReply};
use crate::state::test_helpers::{StubBackend, bearer_headers, multipart_from, test_state};

// =============================================================================
// profileImage aliasing
// =============================================================================

#[test]
fn alias_fills_profile_image_from_image() {
    let out = normalize_member(json!({ "id": "m1", "image": "a.png" }));
    assert_eq!(out["profileImage"], "a.png");
    assert_eq!(out["image"], "a.png");
}

#[test]
fn alias_prefers_existing_profile_image() {
    let out = normalize_member(json!({ "image": "a.png", "profileImage": "b.png" }));
    assert_eq!(out["profileImage"], "b.png");
}

#[test]
fn alias_treats_nulls_as_absent() {
    let out = normalize_member(json!({ "image": null }));
    assert!(out.get("profileImage").is_none());

    let out = normalize_member(json!({ "profileImage": null, "image": "a.png" }));
    assert_eq!(out["profileImage"], "a.png");
}

#[test]
fn alias_leaves_non_objects_alone() {
    assert_eq!(normalize_member(json!("just a string")), json!("just a string"));
}

#[test]
fn alias_maps_arrays_and_wrapped_lists() {
    let out = normalize_members(json!([{ "image": "a.png" }, { "image": "b.png" }]));
    assert_eq!(out[0]["profileImage"], "a.png");
    assert_eq!(out[1]["profileImage"], "b.png");

    let out = normalize_members(json!({ "members": [{ "image": "c.png" }], "total": 1 }));
    assert_eq!(out["members"][0]["profileImage"], "c.png");
    assert_eq!(out["total"], 1);
}

// =============================================================================
// list / get
// =============================================================================

#[tokio::test]
async fn list_is_cache_busted_on_both_legs_and_reshaped() {
    let stub = Arc::new(StubBackend::new(vec![Ok(UpstreamReply::json(
        200,
        json!({ "success": true, "data": [{ "id": "m1", "image": "x.png" }] }),
    ))]));
    let state = test_state(stub.clone());

    let envelope =
        list_members(State(state), HeaderMap::new(), Query(ListQuery::default())).await;

    assert!(envelope.succeeded());
    assert_eq!(envelope.body_json()["data"][0]["profileImage"], "x.png");

    let req = stub.request(0);
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/api/members");
    assert!(req.no_cache);
    assert_eq!(req.query, None);

    let response = envelope.into_response();
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store, no-cache, must-revalidate"
    );
}

#[tokio::test]
async fn list_uppercases_and_forwards_valid_status() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    let query = Query(ListQuery { status: Some(" pending ".to_string()) });
    list_members(State(state), HeaderMap::new(), query).await;

    assert_eq!(stub.request(0).query.as_deref(), Some("status=PENDING"));
}

#[tokio::test]
async fn list_rejects_unknown_status_without_backend_call() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    let query = Query(ListQuery { status: Some("weird".to_string()) });
    let envelope = list_members(State(state), HeaderMap::new(), query).await;

    assert_eq!(envelope.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn get_member_reshapes_single_record() {
    let stub = Arc::new(StubBackend::new(vec![Ok(UpstreamReply::json(
        200,
        json!({ "success": true, "data": { "id": "m1", "image": "pic.jpg" } }),
    ))]));
    let state = test_state(stub.clone());

    let envelope = get_member(State(state), HeaderMap::new(), Path("m1".to_string())).await;

    assert_eq!(envelope.body_json()["data"]["profileImage"], "pic.jpg");
    let req = stub.request(0);
    assert_eq!(req.path, "/api/members/m1");
    assert!(!req.no_cache);
}

// =============================================================================
// mutations — bearer guard and forwarding
// =============================================================================

#[tokio::test]
async fn mutations_without_bearer_are_401_and_never_call_backend() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());
    let body = json!({ "name": "Kim" });

    let envelope = create_member(
        State(state.clone()),
        HeaderMap::new(),
        Some(Json(body.clone())),
    )
    .await;
    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);

    let envelope = update_member(
        State(state.clone()),
        HeaderMap::new(),
        Path("m1".to_string()),
        Some(Json(body)),
    )
    .await;
    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);

    let envelope =
        delete_member(State(state.clone()), HeaderMap::new(), Path("m1".to_string())).await;
    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);

    let envelope =
        approve_member(State(state.clone()), HeaderMap::new(), Path("m1".to_string())).await;
    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);

    let envelope = reject_member(State(state), HeaderMap::new(), Path("m1".to_string())).await;
    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);

    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn create_requires_a_name() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    let body = json!({ "name": "   ", "email": "kim@bitamin.club" });
    let envelope = create_member(State(state), bearer_headers("tok"), Some(Json(body))).await;

    assert_eq!(envelope.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(envelope.body_json()["message"], "name is required");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn create_forwards_body_with_bearer() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    let body = json!({ "name": "Kim", "cohort": 14 });
    create_member(State(state), bearer_headers("tok"), Some(Json(body))).await;

    let req = stub.request(0);
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.path, "/api/members");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    match &req.body {
        UpstreamBody::Json(v) => assert_eq!(v["name"], "Kim"),
        other => panic!("expected json body, got {other:?}"),
    }
}

#[tokio::test]
async fn update_without_body_is_400() {
    let state = test_state(Arc::new(StubBackend::new(Vec::new())));
    let envelope =
        update_member(State(state), bearer_headers("tok"), Path("m1".to_string()), None).await;
    assert_eq!(envelope.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_forwards_with_bearer() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    delete_member(State(state), bearer_headers("tok"), Path("m1".to_string())).await;

    let req = stub.request(0);
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.path, "/api/members/m1");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
}

#[tokio::test]
async fn approve_and_reject_hit_decision_paths() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());

    approve_member(State(state.clone()), bearer_headers("tok"), Path("m1".to_string())).await;
    reject_member(State(state), bearer_headers("tok"), Path("m2".to_string())).await;

    assert_eq!(stub.request(0).path, "/api/members/m1/approve");
    assert_eq!(stub.request(0).method, Method::Post);
    assert_eq!(stub.request(1).path, "/api/members/m2/reject");
}

// =============================================================================
// profile image upload
// =============================================================================

#[tokio::test]
async fn photo_upload_requires_bearer() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());
    let multipart = multipart_from(&[("file", Some("a.png"), Some("image/png"), "png")]).await;

    let envelope =
        upload_member_photo(State(state), HeaderMap::new(), Path("m1".to_string()), multipart)
            .await;

    assert_eq!(envelope.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn photo_upload_forwards_buffered_parts() {
    let stub = Arc::new(StubBackend::new(Vec::new()));
    let state = test_state(stub.clone());
    let multipart = multipart_from(&[("file", Some("a.png"), Some("image/png"), "png")]).await;

    let envelope = upload_member_photo(
        State(state),
        bearer_headers("tok"),
        Path("m1".to_string()),
        multipart,
    )
    .await;

    assert!(envelope.succeeded());
    let req = stub.request(0);
    assert_eq!(req.path, "/api/members/m1/profile-image");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    match &req.body {
        UpstreamBody::Multipart(parts) => {
            assert_eq!(parts.len(), 1);
            assert_eq!(parts[0].name, "file");
            assert_eq!(parts[0].file_name.as_deref(), Some("a.png"));
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}
