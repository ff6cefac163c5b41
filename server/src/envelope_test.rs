use super::*;
use crate::backend::UpstreamReply;
use serde_json::json;

// ===== CONSTRUCTORS =====

#[test]
fn ok_wraps_data_with_success_flag() {
    let envelope = Envelope::ok(json!([1, 2]));
    assert_eq!(envelope.status_code(), StatusCode::OK);
    assert!(envelope.succeeded());
    assert_eq!(envelope.data(), Some(&json!([1, 2])));
}

#[test]
fn fail_carries_error_and_message() {
    let envelope = Envelope::fail(StatusCode::NOT_FOUND, "unknown user", "no such account");
    assert_eq!(envelope.status_code(), StatusCode::NOT_FOUND);
    assert!(!envelope.succeeded());
    assert_eq!(envelope.body_json()["error"], "unknown user");
    assert_eq!(envelope.body_json()["message"], "no such account");
}

#[test]
fn unauthorized_is_401() {
    assert_eq!(Envelope::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
}

// ===== UPSTREAM NORMALIZATION =====

#[test]
fn pre_enveloped_upstream_body_passes_through() {
    let reply = UpstreamReply::json(200, json!({ "success": true, "data": { "id": "m1" } }));
    let envelope = Envelope::from_upstream(reply);
    assert!(envelope.succeeded());
    assert_eq!(envelope.data(), Some(&json!({ "id": "m1" })));
}

#[test]
fn plain_json_success_gets_wrapped() {
    let reply = UpstreamReply::json(201, json!({ "id": "p9" }));
    let envelope = Envelope::from_upstream(reply);
    assert_eq!(envelope.status_code(), StatusCode::CREATED);
    assert!(envelope.succeeded());
    assert_eq!(envelope.data(), Some(&json!({ "id": "p9" })));
}

#[test]
fn json_failure_preserves_status_and_fields() {
    let reply = UpstreamReply::json(403, json!({ "message": "pending approval" }));
    let envelope = Envelope::from_upstream(reply);
    assert_eq!(envelope.status_code(), StatusCode::FORBIDDEN);
    assert!(!envelope.succeeded());
    assert_eq!(envelope.body_json()["message"], "pending approval");
}

#[test]
fn json_failure_without_fields_echoes_compact_body() {
    let reply = UpstreamReply::json(500, json!({ "trace": "boom" }));
    let envelope = Envelope::from_upstream(reply);
    assert!(!envelope.succeeded());
    assert_eq!(envelope.body_json()["error"], "upstream error");
    assert!(envelope.body_json()["message"].as_str().unwrap().contains("boom"));
}

#[test]
fn text_error_becomes_json_envelope_with_status_kept() {
    let reply = UpstreamReply::text(500, "Internal Server Error");
    let envelope = Envelope::from_upstream(reply);
    assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!envelope.succeeded());
    assert_eq!(envelope.body_json()["success"], json!(false));
    assert_eq!(envelope.body_json()["message"], "Internal Server Error");
}

#[test]
fn text_success_becomes_message_only_envelope() {
    let envelope = Envelope::from_upstream(UpstreamReply::text(200, "ok"));
    assert!(envelope.succeeded());
    assert_eq!(envelope.body_json()["message"], "ok");
}

#[test]
fn out_of_range_status_maps_to_500() {
    let envelope = Envelope::from_upstream(UpstreamReply::text(73, "weird"));
    assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ===== RESHAPING =====

#[test]
fn map_data_rewrites_only_the_data_field() {
    let envelope = Envelope::ok(json!({ "image": "x.png" }))
        .map_data(|data| json!({ "got": data }));
    assert_eq!(envelope.data(), Some(&json!({ "got": { "image": "x.png" } })));
}

#[test]
fn map_data_is_noop_on_failures() {
    let envelope = Envelope::unauthorized().map_data(|_| json!("clobbered"));
    assert!(envelope.body_json().get("data").is_none());
}

#[test]
fn message_sets_the_field() {
    let envelope = Envelope::ok(json!(1)).message("files attached");
    assert_eq!(envelope.body_json()["message"], "files attached");
}

// ===== RESPONSE HEADERS =====

#[test]
fn no_store_adds_cache_busting_headers() {
    let response = Envelope::ok(json!([])).no_store().into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let cache = response.headers().get(header::CACHE_CONTROL).unwrap();
    assert_eq!(cache, "no-store, no-cache, must-revalidate");
    assert_eq!(response.headers().get(header::PRAGMA).unwrap(), "no-cache");
}

#[test]
fn plain_envelope_has_no_cache_headers() {
    let response = Envelope::ok(json!([])).into_response();
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
}
