use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use data_loader::store::{ItemRepository, SoldierRepository, StoreHealth};
use data_loader::{
    app, AppState, Database, DbConfig, Item, ItemCreate, MySqlStore, PoolConfig, ServerConfig, Soldier, SoldierUpdate,
    StoreError,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::in_memory(), &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn soldier(id: i64) -> Value {
    json!({
        "ID": id,
        "first_name": "Ivan",
        "last_name": "Petrov",
        "phone_number": 5550101,
        "rank": "Private"
    })
}

#[tokio::test]
async fn item_lifecycle() {
    let app = test_app();

    let (status, created) = send(&app, "POST", "/items/", Some(json!({"first_name": "Jane", "last_name": "Doe"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"ID": 1, "first_name": "Jane", "last_name": "Doe"}));

    let (status, fetched) = send(&app, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn update_item_replaces_fields() {
    let app = test_app();
    send(&app, "POST", "/items", Some(json!({"first_name": "Jane", "last_name": "Doe"}))).await;

    let (status, updated) = send(&app, "PUT", "/items/1", Some(json!({"first_name": "Janet", "last_name": "Roe"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"ID": 1, "first_name": "Janet", "last_name": "Roe"}));

    let (status, _) = send(&app, "PUT", "/items/99", Some(json!({"first_name": "A", "last_name": "B"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_missing_ids_is_404_not_500() {
    let app = test_app();
    let (status, _) = send(&app, "DELETE", "/items/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "DELETE", "/soldiersdb/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Soldier with ID 42 not found");
}

#[tokio::test]
async fn legacy_listing_matches_items() {
    let app = test_app();
    for (first, last) in [("Jane", "Doe"), ("John", "Roe"), ("Ann", "Lee")] {
        send(&app, "POST", "/items/", Some(json!({"first_name": first, "last_name": last}))).await;
    }
    send(&app, "DELETE", "/items/2", None).await;

    let (_, items) = send(&app, "GET", "/items/", None).await;
    let (_, data) = send(&app, "GET", "/data", None).await;
    let (_, get_data) = send(&app, "GET", "/get_data", None).await;
    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(items, data);
    assert_eq!(items, get_data);
}

#[tokio::test]
async fn duplicate_soldier_is_conflict_and_keeps_existing() {
    let app = test_app();
    let (status, created) = send(&app, "POST", "/soldiersdb/", Some(soldier(7))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, soldier(7));

    let mut other = soldier(7);
    other["first_name"] = json!("Someone");
    let (status, body) = send(&app, "POST", "/soldiersdb/", Some(other)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Soldier with ID 7 already exists");

    let (_, stored) = send(&app, "GET", "/soldiersdb/7", None).await;
    assert_eq!(stored, soldier(7));
}

#[tokio::test]
async fn partial_update_changes_only_rank() {
    let app = test_app();
    send(&app, "POST", "/soldiersdb/", Some(soldier(3))).await;

    let (status, updated) = send(&app, "PUT", "/soldiersdb/3", Some(json!({"rank": "Captain"}))).await;
    assert_eq!(status, StatusCode::OK);
    let mut expected = soldier(3);
    expected["rank"] = json!("Captain");
    assert_eq!(updated, expected);

    let (_, listed) = send(&app, "GET", "/soldiersdb/", None).await;
    assert_eq!(listed, json!([expected]));

    let (status, _) = send(&app, "PUT", "/soldiersdb/4", Some(json!({"rank": "Captain"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/items/", Some(json!({"first_name": "Jane"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("last_name"));

    let (status, body) = send(&app, "POST", "/items/", Some(json!({"first_name": " ", "last_name": "Doe"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let mut no_id = soldier(1);
    no_id.as_object_mut().unwrap().remove("ID");
    let (status, body) = send(&app, "POST", "/soldiersdb/", Some(no_id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send(&app, "PUT", "/soldiersdb/1", Some(json!({"phone_number": "not a number"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/items/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "bad request: invalid id 'abc'");

    let (status, body) = send(&app, "DELETE", "/soldiersdb/1.5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = send(&app, "PUT", "/items/x", Some(json!({"first_name": "A", "last_name": "B"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn health_endpoints() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (status, body) = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/soldiersdb/{soldier_id}"].is_object());
}

/// Store whose backend is unreachable.
struct DownStore;

fn down() -> StoreError {
    StoreError::Connection("pool timed out while waiting for an open connection (after 5 attempts)".into())
}

#[async_trait]
impl ItemRepository for DownStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        Err(down())
    }
    async fn get_item(&self, _id: i64) -> Result<Item, StoreError> {
        Err(down())
    }
    async fn create_item(&self, _item: ItemCreate) -> Result<Item, StoreError> {
        Err(StoreError::Storage("Table 'app.data' doesn't exist".into()))
    }
    async fn update_item(&self, _id: i64, _item: ItemCreate) -> Result<Item, StoreError> {
        Err(down())
    }
    async fn delete_item(&self, _id: i64) -> Result<(), StoreError> {
        Err(down())
    }
}

#[async_trait]
impl SoldierRepository for DownStore {
    async fn list_soldiers(&self) -> Result<Vec<Soldier>, StoreError> {
        Err(down())
    }
    async fn get_soldier(&self, _id: i64) -> Result<Soldier, StoreError> {
        Err(down())
    }
    async fn create_soldier(&self, _soldier: Soldier) -> Result<Soldier, StoreError> {
        Err(down())
    }
    async fn update_soldier(&self, _id: i64, _update: SoldierUpdate) -> Result<Soldier, StoreError> {
        Err(down())
    }
    async fn delete_soldier(&self, _id: i64) -> Result<(), StoreError> {
        Err(down())
    }
}

#[async_trait]
impl StoreHealth for DownStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

#[tokio::test]
async fn storage_failures_are_500_with_message() {
    let app = app(AppState::new(DownStore), &ServerConfig::default());

    let (status, body) = send(&app, "GET", "/soldiersdb/", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "connection_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("after 5 attempts"));

    let (status, body) = send(&app, "POST", "/items/", Some(json!({"first_name": "Jane", "last_name": "Doe"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Table 'app.data' doesn't exist");

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");

    let (status, _) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unreachable_mysql_is_500_before_the_request_timeout() {
    let db = DbConfig {
        host: Some("127.0.0.1".into()),
        port: Some(1),
        user: Some("root".into()),
        password: None,
        database: Some("nowhere".into()),
    };
    let store = MySqlStore::new(Database::new(&db, &PoolConfig::default()));
    let app = app(AppState::new(store), &ServerConfig::default());

    let (status, body) = send(&app, "GET", "/items/", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "connection_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("after 5 attempts"));
}
