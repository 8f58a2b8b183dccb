#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use content_sync_service::clients::{AlgoliaClient, WebflowClient};
use content_sync_service::config::{CmsSettings, HttpSettings, IndexSettings};
use content_sync_service::handlers::{app, AppState};
use content_sync_service::mapping::CollectionRouter;
use content_sync_service::models::CollectionTable;

pub const TOKEN: &str = "test-token";
pub const APP_ID: &str = "TESTAPP";
pub const ADMIN_KEY: &str = "admin-key";
pub const INDEX: &str = "content2";
pub const SITE: &str = "https://www.iads.org";

pub const NEWS: &str = "6810f8ac48ac573ed368cc26";
pub const ARTICLES: &str = "6810f93700e7c73c9f48f52f";

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub body: Option<Value>,
}

/// In-process stand-in for both the Webflow API and the Algolia index.
#[derive(Clone, Default)]
pub struct MockState {
    pub items: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    pub failing_collections: Arc<Mutex<HashSet<String>>>,
    pub fail_writes: Arc<Mutex<bool>>,
    pub index: Arc<Mutex<BTreeMap<String, Value>>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockState {
    pub fn add_item(&self, collection_id: &str, item: Value) {
        self.items.lock().unwrap().entry(collection_id.to_string()).or_default().push(item);
    }

    pub fn seed_record(&self, record: Value) {
        let id = record["objectID"].as_str().unwrap().to_string();
        self.index.lock().unwrap().insert(id, record);
    }

    pub fn record(&self, object_id: &str) -> Option<Value> {
        self.index.lock().unwrap().get(object_id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Requests that change the index (everything except browse).
    pub fn index_writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.path.starts_with("/1/indexes/") && !c.path.ends_with("/browse"))
            .collect()
    }

    pub fn page_requests(&self, collection_id: &str) -> Vec<Call> {
        let path = format!("/v2/collections/{}/items", collection_id);
        self.calls().into_iter().filter(|c| c.method == "GET" && c.path == path).collect()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn item(id: &str, draft: bool, archived: bool, field_data: Value) -> Value {
    json!({ "id": id, "isDraft": draft, "isArchived": archived, "fieldData": field_data })
}

pub fn published(id: &str, date: &str, slug: &str, name: &str) -> Value {
    item(id, false, false, json!({ "date": date, "slug": slug, "name": name }))
}

fn webflow_authorized(headers: &HeaderMap) -> bool {
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer test-token");
    let version = headers.get("accept-version").and_then(|v| v.to_str().ok()) == Some("2.0.0");
    bearer && version
}

fn algolia_authorized(headers: &HeaderMap) -> bool {
    headers.get("x-algolia-application-id").and_then(|v| v.to_str().ok()) == Some(APP_ID)
        && headers.get("x-algolia-api-key").and_then(|v| v.to_str().ok()) == Some(ADMIN_KEY)
}

async fn get_item(
    State(state): State<MockState>,
    Path((collection_id, item_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "GET",
        path: format!("/v2/collections/{}/items/{}", collection_id, item_id),
        offset: None,
        limit: None,
        body: None,
    });
    if !webflow_authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    let items = state.items.lock().unwrap();
    let found = items
        .get(&collection_id)
        .and_then(|list| list.iter().find(|i| i["id"] == item_id.as_str()).cloned());
    match found {
        Some(item) => (StatusCode::OK, Json(item)),
        None => (StatusCode::NOT_FOUND, Json(json!({"code": "resource_not_found", "message": "Requested resource not found"}))),
    }
}

#[derive(Deserialize)]
struct PageQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

async fn list_items(
    State(state): State<MockState>,
    Path(collection_id): Path<String>,
    Query(q): Query<PageQuery>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "GET",
        path: format!("/v2/collections/{}/items", collection_id),
        offset: q.offset,
        limit: q.limit,
        body: None,
    });
    if !webflow_authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    if state.failing_collections.lock().unwrap().contains(&collection_id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})));
    }
    let limit = q.limit.unwrap_or(100) as usize;
    let offset = q.offset.unwrap_or(0) as usize;
    let items = state.items.lock().unwrap();
    let page: Vec<Value> = items
        .get(&collection_id)
        .map(|list| list.iter().skip(offset).take(limit).cloned().collect())
        .unwrap_or_default();
    let total = items.get(&collection_id).map(|l| l.len()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(json!({ "items": page, "pagination": { "limit": limit, "offset": offset, "total": total } })),
    )
}

fn write_guard(state: &MockState, headers: &HeaderMap) -> Option<(StatusCode, Json<Value>)> {
    if !algolia_authorized(headers) {
        return Some((StatusCode::FORBIDDEN, Json(json!({"message": "Invalid Application-ID or API key", "status": 403}))));
    }
    if *state.fail_writes.lock().unwrap() {
        return Some((StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "unavailable", "status": 503}))));
    }
    None
}

async fn save_object(
    State(state): State<MockState>,
    Path((index, object_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "PUT",
        path: format!("/1/indexes/{}/{}", index, object_id),
        offset: None,
        limit: None,
        body: Some(body.clone()),
    });
    if let Some(err) = write_guard(&state, &headers) {
        return err;
    }
    state.index.lock().unwrap().insert(object_id.clone(), body);
    (StatusCode::OK, Json(json!({"objectID": object_id, "taskID": 1, "updatedAt": "2024-01-01T00:00:00Z"})))
}

async fn delete_object(
    State(state): State<MockState>,
    Path((index, object_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "DELETE",
        path: format!("/1/indexes/{}/{}", index, object_id),
        offset: None,
        limit: None,
        body: None,
    });
    if let Some(err) = write_guard(&state, &headers) {
        return err;
    }
    state.index.lock().unwrap().remove(&object_id);
    (StatusCode::OK, Json(json!({"taskID": 2, "deletedAt": "2024-01-01T00:00:00Z"})))
}

async fn batch(
    State(state): State<MockState>,
    Path(index): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "POST",
        path: format!("/1/indexes/{}/batch", index),
        offset: None,
        limit: None,
        body: Some(body.clone()),
    });
    if let Some(err) = write_guard(&state, &headers) {
        return err;
    }
    let mut stored = state.index.lock().unwrap();
    let mut ids = Vec::new();
    for op in body["requests"].as_array().cloned().unwrap_or_default() {
        let object = op["body"].clone();
        let id = object["objectID"].as_str().unwrap_or_default().to_string();
        match op["action"].as_str() {
            Some("updateObject") => {
                stored.insert(id.clone(), object);
            }
            Some("partialUpdateObjectNoCreate") => {
                if let Some(existing) = stored.get_mut(&id) {
                    for (k, v) in object.as_object().cloned().unwrap_or_default() {
                        existing[k] = v;
                    }
                }
            }
            other => {
                return (StatusCode::BAD_REQUEST, Json(json!({"message": format!("unsupported action {:?}", other)})));
            }
        }
        ids.push(id);
    }
    (StatusCode::OK, Json(json!({"taskID": 3, "objectIDs": ids})))
}

const BROWSE_PAGE: usize = 2;

async fn browse(
    State(state): State<MockState>,
    Path(index): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.push(Call {
        method: "POST",
        path: format!("/1/indexes/{}/browse", index),
        offset: None,
        limit: None,
        body: Some(body.clone()),
    });
    if !algolia_authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"message": "forbidden"})));
    }
    let start: usize = body["cursor"].as_str().and_then(|c| c.parse().ok()).unwrap_or(0);
    let stored = state.index.lock().unwrap();
    let hits: Vec<Value> = stored.values().skip(start).take(BROWSE_PAGE).cloned().collect();
    let next = start + hits.len();
    let mut response = json!({ "hits": hits, "nbHits": stored.len() });
    if next < stored.len() {
        response["cursor"] = Value::String(next.to_string());
    }
    (StatusCode::OK, Json(response))
}

// Records requests no route matches, such as an index-level path.
async fn unmatched(State(state): State<MockState>, method: Method, uri: Uri) -> StatusCode {
    let method = match method.as_str() {
        "GET" => "GET",
        "PUT" => "PUT",
        "POST" => "POST",
        "DELETE" => "DELETE",
        _ => "OTHER",
    };
    state.push(Call { method, path: uri.path().to_string(), offset: None, limit: None, body: None });
    StatusCode::NOT_FOUND
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}", addr)
}

/// Starts the mock upstream and returns its base URL.
pub async fn spawn_upstream(state: MockState) -> String {
    let router = Router::new()
        .route("/v2/collections/{collection_id}/items", get(list_items))
        .route("/v2/collections/{collection_id}/items/{item_id}", get(get_item))
        .route("/1/indexes/{index}/batch", post(batch))
        .route("/1/indexes/{index}/browse", post(browse))
        .route("/1/indexes/{index}/{object_id}", put(save_object).delete(delete_object))
        .fallback(unmatched)
        .with_state(state);
    serve(router).await
}

pub fn webflow_client(base: &str, page_size: u32) -> WebflowClient {
    let cms = CmsSettings { api_token: TOKEN.into(), api_base: base.into(), page_size };
    WebflowClient::new(&cms, &HttpSettings::default()).unwrap()
}

pub fn algolia_client(base: &str) -> AlgoliaClient {
    let index = IndexSettings {
        app_id: APP_ID.into(),
        admin_key: ADMIN_KEY.into(),
        index_name: INDEX.into(),
        host: base.into(),
    };
    AlgoliaClient::new(&index, &HttpSettings::default()).unwrap()
}

pub fn collection_router() -> CollectionRouter {
    CollectionRouter::new(CollectionTable::builtin(), SITE).unwrap()
}

/// Starts the mock upstream plus the webhook app wired to it; returns the app's base URL.
pub async fn spawn_app(state: MockState) -> String {
    let upstream = spawn_upstream(state).await;
    let app_state = AppState {
        router: Arc::new(collection_router()),
        cms: webflow_client(&upstream, 100),
        index: algolia_client(&upstream),
    };
    serve(app(app_state)).await
}
