use super::*;
use serde_json::json;

#[test]
fn builder_defaults_are_bare_get() {
    let req = UpstreamRequest::get("/api/members");
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/api/members");
    assert!(req.query.is_none());
    assert!(req.bearer.is_none());
    assert!(matches!(req.body, UpstreamBody::None));
    assert!(!req.no_cache);
}

#[test]
fn builder_sets_every_field() {
    let req = UpstreamRequest::post("/api/projects")
        .query("status=APPROVED")
        .bearer(Some("tok".into()))
        .json(json!({ "title": "demo" }))
        .no_cache();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.query.as_deref(), Some("status=APPROVED"));
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    assert!(matches!(req.body, UpstreamBody::Json(_)));
    assert!(req.no_cache);
}

#[test]
fn empty_query_stays_none() {
    let req = UpstreamRequest::get("/api/members").query("");
    assert!(req.query.is_none());
}

#[test]
fn method_names_match_http() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Put.as_str(), "PUT");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}
