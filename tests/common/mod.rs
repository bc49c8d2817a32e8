#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "secret-token";

#[derive(Clone)]
struct Backend {
    entries: Arc<Mutex<Vec<Value>>>,
    exits: Arc<Mutex<Vec<Value>>>,
}

pub struct FakeBackend {
    /// Base URL including the `/api/` prefix.
    pub api_url: String,
}

/// Starts a fake warehouse backend on its own thread and runtime so it
/// outlives the runtime of any single test.
pub fn spawn_backend() -> FakeBackend {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind backend");
    listener.set_nonblocking(true).expect("nonblocking backend");
    let addr = listener.local_addr().unwrap();

    let app = backend_router();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("backend runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("backend listener");
            axum::serve(listener, app).await.expect("backend serve");
        });
    });

    FakeBackend {
        api_url: format!("http://{addr}/api/"),
    }
}

fn backend_router() -> Router {
    let state = Backend {
        entries: Arc::new(Mutex::new(vec![
            json!({ "id": 1, "article": 1, "quantity": 5, "date": "2024-01-05" }),
            json!({ "id": 2, "article": 2, "quantity": 3, "date": "2024-02-10" }),
        ])),
        exits: Arc::new(Mutex::new(vec![
            json!({
                "id": 1, "article": 1, "client": 1, "quantity": 2,
                "date": "2024-01-20", "is_authorized": true
            }),
            json!({
                "id": 2, "article": 2, "client": 2, "quantity": 4,
                "date": "2024-02-11", "is_authorized": false
            }),
        ])),
    };

    Router::new()
        .route("/api/articles/", get(articles))
        .route("/api/clients/", get(clients))
        .route("/api/entries/", get(list_entries).post(create_entry))
        .route("/api/exits/", get(list_exits))
        .route("/api/exits/create_multiple/", post(create_exits))
        .route("/api/auth/registration/", post(register))
        .route("/api/auth/login/", post(login))
        .with_state(state)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Token {TOKEN}"))
}

fn denied() -> Response {
    (StatusCode::UNAUTHORIZED, "Invalid token.").into_response()
}

const ARTICLE_IDS: [u64; 3] = [1, 2, 3];

fn known_article(value: &Value) -> bool {
    value.as_u64().is_some_and(|id| ARTICLE_IDS.contains(&id))
}

fn invalid_pk(id: &Value) -> Response {
    let body = json!({ "article": [format!("Invalid pk \"{id}\" - object does not exist.")] });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

async fn articles(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    Json(json!([
        { "id": 1, "name": "Tornillo", "description": "M6" },
        { "id": 2, "name": "Arandela", "description": null },
        { "id": 3, "name": "Clavo" }
    ]))
    .into_response()
}

async fn clients(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    Json(json!([
        { "id": 1, "name": "Norte" },
        { "id": 2, "name": "Sur" }
    ]))
    .into_response()
}

async fn list_entries(State(state): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    Json(state.entries.lock().unwrap().clone()).into_response()
}

async fn create_entry(
    State(state): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    if !known_article(&body["article"]) {
        return invalid_pk(&body["article"]);
    }
    let mut entries = state.entries.lock().unwrap();
    let created = json!({
        "id": entries.len() + 1,
        "article": body["article"],
        "quantity": body["quantity"],
        "date": body["date"],
    });
    entries.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn list_exits(State(state): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    Json(state.exits.lock().unwrap().clone()).into_response()
}

async fn create_exits(
    State(state): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    let lines = body["articles"].as_array().cloned().unwrap_or_default();
    if body["client"].is_null() || lines.is_empty() {
        return (StatusCode::BAD_REQUEST, "Datos inválidos").into_response();
    }
    if let Some(line) = lines.iter().find(|line| !known_article(&line["article"])) {
        return invalid_pk(&line["article"]);
    }

    let mut exits = state.exits.lock().unwrap();
    for line in &lines {
        let id = exits.len() + 1;
        exits.push(json!({
            "id": id,
            "article": line["article"],
            "client": body["client"],
            "quantity": line["quantity"],
            "date": body["date"],
            "is_authorized": false,
        }));
    }
    let summary: Vec<Value> = lines
        .iter()
        .map(|line| json!({ "article": line["article"].to_string(), "quantity": line["quantity"] }))
        .collect();
    (
        StatusCode::CREATED,
        Json(json!({ "status": "created", "exits": summary })),
    )
        .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (StatusCode::BAD_REQUEST, r#"{"username":["already exists"]}"#).into_response();
    }
    (StatusCode::CREATED, Json(json!({ "key": TOKEN }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != "pw" {
        let body = r#"{"non_field_errors":["bad credentials"]}"#;
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    Json(json!({ "key": TOKEN })).into_response()
}
