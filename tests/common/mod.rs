//! Shared fixtures: a wiremock fullnode and an in-process router.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine as _;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use suirss::config::Config;
use suirss::rpc::SuiClient;
use suirss::schema::{self, Address, Entry, ObjectId, Rss, TableVec};
use suirss::server::{self, AppState};
use suirss::tx::TransactionKind;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DIGEST: &str = "11111111111111111111111111111111";

pub fn table_id() -> ObjectId {
    Address::new([0xa1; 32])
}

pub fn feed_id() -> ObjectId {
    Address::new([0xf0; 32])
}

pub fn ok(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

pub fn app_state(server: &MockServer) -> Arc<AppState> {
    let mut settings = Config::default().resolve().unwrap();
    settings.rpc_url = server.uri().parse().unwrap();
    Arc::new(AppState {
        client: SuiClient::new(settings.rpc_url.clone()),
        settings,
        table_id: table_id(),
    })
}

/// Mounts a canned `result` for one JSON-RPC method, expected `times` times.
pub async fn expect_rpc(server: &MockServer, rpc_method: &str, result: Value, times: u64) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(result)))
        .expect(times)
        .mount(server)
        .await;
}

pub fn lookup_found(name: &str) -> Value {
    let field_id = Address::new([0xee; 32]).to_string();
    json!({
        "data": {
            "objectId": field_id,
            "version": "3",
            "digest": DIGEST,
            "content": {
                "dataType": "moveObject",
                "type": "0x2::dynamic_field::Field<0x1::string::String, 0x2::object::ID>",
                "fields": {"id": {"id": field_id}, "name": name, "value": feed_id().to_string()},
            },
        }
    })
}

pub fn lookup_missing() -> Value {
    json!({"error": {"code": "dynamicFieldNotFound", "parent_object_id": table_id().to_string()}})
}

pub fn shared_feed() -> Value {
    let rss = Rss {
        id: feed_id(),
        name: "myfeed.sui".into(),
        cap_id: Address::new([2; 32]),
        is_public: true,
        publishers: vec![],
        suins_id: Address::new([3; 32]),
        last_updated_ms: 1_700_000_000_000,
        metadata: vec![Entry {
            key: "title".into(),
            value: "My Feed".into(),
        }],
        items: TableVec {
            id: Address::new([4; 32]),
            size: 2,
        },
    };
    let bcs = base64::engine::general_purpose::STANDARD.encode(schema::encode(&rss).unwrap());
    json!({
        "data": {
            "objectId": feed_id().to_string(),
            "version": "12",
            "digest": DIGEST,
            "owner": {"Shared": {"initial_shared_version": 8}},
            "bcs": {"dataType": "moveObject", "type": "0x3::rss::RSS", "bcsBytes": bcs},
        }
    })
}

pub fn dev_inspect_returning(body: &str) -> Value {
    let bytes = schema::encode(&body.to_string()).unwrap();
    json!({
        "effects": {"status": {"status": "success"}},
        "results": [{"returnValues": [[bytes, "0x1::string::String"]]}],
    })
}

/// Issues `GET uri` against the router and returns status, content type and body.
pub async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = server::router(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Decodes the `TransactionKind` of every dev-inspect request the server saw.
pub async fn inspected_transactions(server: &MockServer) -> Vec<TransactionKind> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.body_json::<Value>().unwrap())
        .filter(|b| b["method"] == "sui_devInspectTransactionBlock")
        .map(|b| schema::decode_base64(b["params"][1].as_str().unwrap()).unwrap())
        .collect()
}
