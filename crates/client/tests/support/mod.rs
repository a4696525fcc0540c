//! In-process stand-in for the settlement API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const GOOD_SESSION: &str = "good-session";

#[derive(Default)]
pub struct StubState {
    pub survivors: Vec<Value>,
    pub received: Vec<Value>,
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct StubServer {
    pub base_url: String,
    pub state: Shared,
}

pub async fn spawn(survivors: Vec<Value>) -> StubServer {
    let state: Shared = Arc::new(Mutex::new(StubState {
        survivors,
        received: Vec::new(),
    }));

    let app = Router::new()
        .route(
            "/api/settlements/:settlement_id/survivors",
            get(list_survivors).post(create_survivor),
        )
        .route(
            "/api/settlements/:settlement_id/survivors/:survivor_id",
            patch(update_survivor),
        )
        .route("/api/glossary", get(glossary))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookie| cookie.contains(&format!("dm_session={GOOD_SESSION}")))
        .unwrap_or(false)
}

async fn list_survivors(
    State(state): State<Shared>,
    Path(settlement_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !signed_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let state = state.lock().unwrap();
    let survivors: Vec<Value> = state
        .survivors
        .iter()
        .filter(|s| s["settlementId"] == settlement_id.as_str())
        .cloned()
        .collect();
    Json(survivors).into_response()
}

async fn create_survivor(
    State(state): State<Shared>,
    Path(settlement_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !signed_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    state.received.push(body.clone());

    let mut created = body;
    created["id"] = json!(format!("s-{}", state.survivors.len() + 1));
    created["settlementId"] = json!(settlement_id);
    created["status"] = json!("Alive");
    created["systemicPressure"] = created["systemicpressure"].take();
    if created.get("disorders").is_none() {
        created["disorders"] = json!([]);
    }
    state.survivors.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_survivor(
    State(state): State<Shared>,
    Path((_settlement_id, survivor_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !signed_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    state.received.push(body.clone());

    let Some(survivor) = state
        .survivors
        .iter_mut()
        .find(|s| s["id"] == survivor_id.as_str())
    else {
        return (StatusCode::NOT_FOUND, Json(json!("survivor not found"))).into_response();
    };

    if let Some(updates) = body.get("statUpdates").and_then(Value::as_object) {
        for (key, value) in updates {
            survivor[key] = value.clone();
        }
    }
    if let Some(status) = body.get("statusUpdate") {
        survivor["status"] = status.clone();
    }
    if let Some(disorders) = body.get("disorders") {
        survivor["disorders"] = disorders.clone();
    }
    StatusCode::OK.into_response()
}

async fn glossary() -> Response {
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}

/// A survivor record as the API returns it.
pub fn survivor_record(id: &str, settlement_id: &str, name: &str, survival: i64) -> Value {
    json!({
        "id": id,
        "settlementId": settlement_id,
        "name": name,
        "gender": "F",
        "status": "Alive",
        "birth": 1,
        "huntxp": 0,
        "survival": survival,
        "systemicPressure": 0,
        "movement": 5,
        "accuracy": 0,
        "strength": 0,
        "evasion": 0,
        "luck": 0,
        "speed": 0,
        "lumi": 0,
        "insanity": 0,
        "torment": 0,
        "courage": 0,
        "understanding": 0,
        "disorders": []
    })
}
