// ==========================================
// /api/Depots JSON endpoints
// ==========================================


use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use depot_management::api::depots::{DEPOTS_PATH, USER_NAME_HEADER};
use depot_management::api::router;
use depot_management::app::{AppState, RepositoryMode};
use depot_management::logging;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (tempfile::NamedTempFile, Router) {
    let (db, path) = test_helpers::create_test_db().unwrap();
    let mode = RepositoryMode::Mapped;
    let state = AppState::new(path.as_str(), mode, test_helpers::repository(&path, mode));
    (db, router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

fn post_form(body: Value, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(DEPOTS_PATH)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_NAME_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_create_then_fetch() {
    logging::init_test();
    let (_db, app) = app();

    let (status, body) = send(&app, post_form(json!({ "name": "Central" }), Some("dana"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = json_body(&body);
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["createdBy"], "dana");
    assert_eq!(created["active"], true);

    let (status, body) = send(&app, get(&format!("{}/{}", DEPOTS_PATH, id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["name"], "Central");
}

#[tokio::test]
async fn test_invalid_name_is_400() {
    let (_db, app) = app();

    let (status, body) = send(&app, post_form(json!({ "name": "  " }), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"], "name is required");
}

#[tokio::test]
async fn test_edit_and_delete() {
    let (_db, app) = app();

    let (_, body) = send(&app, post_form(json!({ "name": "Old" }), None)).await;
    let id = json_body(&body)["id"].as_i64().unwrap();

    let (status, body) = send(&app, post_form(json!({ "id": id, "name": "New" }), Some("eve"))).await;
    assert_eq!(status, StatusCode::OK);
    let edited = json_body(&body);
    assert_eq!(edited["name"], "New");
    assert_eq!(edited["createdBy"], "Anonymous");

    let (_, body) = send(&app, get(&format!("{}/{}", DEPOTS_PATH, id))).await;
    assert_eq!(json_body(&body), edited);

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri(format!("{}/{}", DEPOTS_PATH, id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("{}/{}", DEPOTS_PATH, id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post_form(json!({ "id": id, "name": "Again" }), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_with_query() {
    let (_db, app) = app();

    for name in ["Alpha", "Beta", "Alphabet"] {
        send(&app, post_form(json!({ "name": name }), None)).await;
    }

    let (status, body) = send(
        &app,
        get(&format!(
            "{}?pageIndex=0&pageSize=1&searchField=Name&searchQuery=Alpha&sortOrder=Name",
            DEPOTS_PATH
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let page = json_body(&body);
    assert_eq!(page["totalCount"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["name"], "Alpha");

    let (_, body) = send(&app, get(DEPOTS_PATH)).await;
    assert_eq!(json_body(&body)["totalCount"], 3);
}
