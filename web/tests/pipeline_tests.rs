//! End-to-end decoding through an axum router.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use magic_decoder_web::{
    run_all, Bind, DecodeRejection, JsonBody, PathFields, PathParams, QueryParams, RequestData,
    WebResult,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

#[derive(Bind, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Item {
    #[bind(path = "id")]
    id: i64,
    #[bind(form = "name")]
    name: String,
    #[bind(form = "pet")]
    pet: String,
    #[bind(json = "money")]
    money: f64,
}

#[derive(Bind, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Team {
    #[bind(path = "id")]
    id: i64,
    #[bind(path = "team_id")]
    team_id: i64,
}

#[derive(Bind, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Named {
    #[bind(json = "name")]
    name: String,
}

async fn path_then_body(request: RequestData) -> WebResult<Json<Item>> {
    let mut item = Item::default();
    run_all(
        Some(&mut item),
        &request,
        &[Some(&PathParams::new()), Some(&JsonBody::new())],
    )?;
    Ok(Json(item))
}

async fn body_then_path(request: RequestData) -> WebResult<Json<Item>> {
    let mut item = Item::default();
    run_all(
        Some(&mut item),
        &request,
        &[Some(&JsonBody::new()), Some(&PathParams::new())],
    )?;
    Ok(Json(item))
}

async fn query_path_body(request: RequestData) -> WebResult<Json<Item>> {
    let mut item = Item::default();
    run_all(
        Some(&mut item),
        &request,
        &[
            Some(&QueryParams::new()),
            Some(&PathParams::new()),
            Some(&JsonBody::new()),
        ],
    )?;
    Ok(Json(item))
}

async fn query_path(request: RequestData) -> WebResult<Json<Item>> {
    let mut item = Item::default();
    run_all(
        Some(&mut item),
        &request,
        &[Some(&QueryParams::new()), Some(&PathParams::new())],
    )?;
    Ok(Json(item))
}

async fn without_target(request: RequestData) -> Result<&'static str, DecodeRejection> {
    run_all(None, &request, &[Some(&QueryParams::new()), Some(&PathParams::new())])?;
    Ok("unreachable")
}

async fn team_path(request: RequestData) -> WebResult<Json<Team>> {
    let mut team = Team::default();
    run_all(Some(&mut team), &request, &[Some(&PathParams::new())])?;
    Ok(Json(team))
}

async fn team_id_only(request: RequestData) -> WebResult<Json<Team>> {
    let mut team = Team::default();
    run_all(
        Some(&mut team),
        &request,
        &[Some(&PathFields::new(["team_id"]))],
    )?;
    Ok(Json(team))
}

async fn named_body(request: RequestData) -> WebResult<Json<Named>> {
    let mut named = Named::default();
    run_all(Some(&mut named), &request, &[Some(&JsonBody::new())])?;
    Ok(Json(named))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    init_tracing();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_path_and_body_in_either_order() {
    let expected = Item {
        id: 2,
        money: 12.34,
        ..Item::default()
    };

    let app = Router::new().route("/foo/:id", post(path_then_body));
    let (status, body) = send(app, post_json("/foo/2", r#"{"money": 12.34}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_value::<Item>(body).unwrap(), expected);

    let app = Router::new().route("/foo/:id", post(body_then_path));
    let (status, body) = send(app, post_json("/foo/2", r#"{"money": 12.34}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_value::<Item>(body).unwrap(), expected);
}

#[tokio::test]
async fn test_query_path_and_quoted_body() {
    let app = Router::new().route("/foo/:id", post(query_path_body));
    let (status, body) = send(
        app,
        post_json("/foo/2?pet=cat&name=bob", r#"{"money": "12.34"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_value::<Item>(body).unwrap(),
        Item {
            id: 2,
            name: "bob".to_string(),
            pet: "cat".to_string(),
            money: 12.34,
        }
    );
}

#[tokio::test]
async fn test_without_body_extractor_money_stays_zero() {
    let app = Router::new().route("/foo/:id", post(query_path));
    let (status, body) = send(
        app,
        post_json("/foo/2?pet=cat&name=bob", r#"{"money": "12.34"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_value::<Item>(body).unwrap(),
        Item {
            id: 2,
            name: "bob".to_string(),
            pet: "cat".to_string(),
            money: 0.0,
        }
    );
}

#[tokio::test]
async fn test_missing_target_is_server_error() {
    let app = Router::new().route("/foo/:id", get(without_target));
    let (status, body) = send(app, get_request("/foo/2?pet=cat")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INVALID_TARGET");
}

#[tokio::test]
async fn test_bad_path_value_is_bad_request() {
    let app = Router::new().route("/foo/:id", get(query_path));
    let (status, body) = send(app, get_request("/foo/two")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_numeric_path() {
    let app = Router::new().route("/teams/:id", get(team_path));
    let (status, body) = send(app, get_request("/teams/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "team_id": 0}));
}

#[tokio::test]
async fn test_nested_path_fields() {
    let app = Router::new().route("/teams/:team_id/members/:id", get(team_id_only));
    let (status, body) = send(app, get_request("/teams/7/members/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 0, "team_id": 7}));
}

#[tokio::test]
async fn test_json_body_required() {
    let app = Router::new().route("/foo", post(named_body));
    let (status, body) = send(app.clone(), post_json("/foo", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_BODY");

    let request = Request::builder()
        .method("POST")
        .uri("/foo")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_BODY");

    let (status, body) = send(app, post_json("/foo", r#"{"name": "foo"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "foo"}));
}

#[tokio::test]
async fn test_malformed_body() {
    let app = Router::new().route("/foo", post(named_body));
    let (status, body) = send(app, post_json("/foo", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_BODY");
}
