use super::types::{DevInspectResults, DynamicFieldInfo, DynamicFieldName, ObjectResponse, Page};
use crate::schema::{Address, ObjectId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

/// Errors talking to the fullnode. None of these are retried.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The node answered with something that does not match the method's result shape
    #[error("Unexpected response to {method}: {reason}")]
    InvalidResponse { method: &'static str, reason: String },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Handle to a Sui fullnode's JSON-RPC endpoint.
///
/// Construct once per process and pass it around; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct SuiClient {
    http: reqwest::Client,
    url: Url,
}

impl SuiClient {
    pub fn new(url: Url) -> Self {
        Self::with_http_client(reqwest::Client::new(), url)
    }

    /// Uses a caller-configured HTTP client (proxies, timeouts, TLS roots).
    pub fn with_http_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn call_raw(&self, method: &'static str, params: Value) -> Result<Value, RpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, "Sui RPC request");

        let response = self.http.post(self.url.clone()).json(&body).send().await?;
        if !response.status().is_success() {
            tracing::warn!(method, status = %response.status(), "Sui RPC HTTP error");
            return Err(RpcError::HttpStatus(response.status().as_u16()));
        }

        let envelope: Envelope = response.json().await?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        envelope.result.ok_or(RpcError::InvalidResponse {
            method,
            reason: "missing result".to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, RpcError> {
        let raw = self.call_raw(method, params).await?;
        parse(method, raw)
    }

    /// `suix_getDynamicFieldObject`: the field object stored under `name`
    /// in the table or bag `parent`.
    pub async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> Result<ObjectResponse, RpcError> {
        const METHOD: &str = "suix_getDynamicFieldObject";
        let raw = self.call_raw(METHOD, json!([parent, name])).await?;
        let mut response: ObjectResponse = parse(METHOD, raw.clone())?;
        response.raw = raw;
        Ok(response)
    }

    /// `sui_getObject` with BCS and owner included.
    pub async fn get_object(&self, id: &ObjectId) -> Result<ObjectResponse, RpcError> {
        const METHOD: &str = "sui_getObject";
        let raw = self
            .call_raw(METHOD, json!([id, {"showBcs": true, "showOwner": true}]))
            .await?;
        let mut response: ObjectResponse = parse(METHOD, raw.clone())?;
        response.raw = raw;
        Ok(response)
    }

    /// `suix_getOwnedObjects` filtered to one struct type, with BCS included.
    pub async fn get_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<ObjectResponse>, RpcError> {
        self.call(
            "suix_getOwnedObjects",
            json!([
                owner,
                {
                    "filter": {"StructType": struct_type},
                    "options": {"showBcs": true},
                },
                cursor,
                limit,
            ]),
        )
        .await
    }

    /// `suix_getDynamicFields`: one page of the keys stored under `parent`.
    pub async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<DynamicFieldInfo>, RpcError> {
        self.call("suix_getDynamicFields", json!([parent, cursor, limit]))
            .await
    }

    /// `sui_devInspectTransactionBlock`: executes a base64 `TransactionKind`
    /// against current state without committing anything.
    pub async fn dev_inspect(
        &self,
        sender: &Address,
        tx_kind_base64: &str,
        gas_budget: u64,
    ) -> Result<DevInspectResults, RpcError> {
        const METHOD: &str = "sui_devInspectTransactionBlock";
        let raw = self
            .call_raw(
                METHOD,
                json!([
                    sender,
                    tx_kind_base64,
                    null,
                    null,
                    {"gasBudget": gas_budget.to_string()},
                ]),
            )
            .await?;
        let mut results: DevInspectResults = parse(METHOD, raw.clone())?;
        results.raw = raw;
        Ok(results)
    }
}

fn parse<T: DeserializeOwned>(method: &'static str, raw: Value) -> Result<T, RpcError> {
    serde_json::from_value(raw).map_err(|e| RpcError::InvalidResponse {
        method,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> SuiClient {
        SuiClient::new(server.uri().parse().unwrap())
    }

    #[tokio::test]
    async fn test_rpc_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "error": {"code": -32602, "message": "Invalid params"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_object(&Address::CLOCK).await.unwrap_err();
        match err {
            RpcError::Rpc { code, message } => {
                assert_eq!(code, -32602);
                assert_eq!(message, "Invalid params");
            }
            e => panic!("Expected Rpc error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_http_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_object(&Address::CLOCK).await.unwrap_err();
        assert!(matches!(err, RpcError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn test_missing_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_object(&Address::CLOCK).await.unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_dynamic_field_lookup_sends_string_key() {
        let server = MockServer::start().await;
        let table: ObjectId = "0xa1".parse().unwrap();
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "suix_getDynamicFieldObject",
                "params": [table.to_string(), {"type": "0x1::string::String", "value": "blog.sui"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "result": {"error": {"code": "dynamicFieldNotFound"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client
            .get_dynamic_field_object(&table, &DynamicFieldName::string("blog.sui"))
            .await
            .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.raw["error"]["code"], "dynamicFieldNotFound");
    }

    #[tokio::test]
    async fn test_dev_inspect_passes_gas_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "sui_devInspectTransactionBlock",
                "params": [Address::ZERO.to_string(), "AAEC", null, null, {"gasBudget": "100000000"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "result": {"effects": {"status": {"status": "failure"}}, "error": "boom"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let results = client
            .dev_inspect(&Address::ZERO, "AAEC", 100_000_000)
            .await
            .unwrap();
        assert!(results.results.is_none());
        assert_eq!(results.error.as_deref(), Some("boom"));
        assert_eq!(results.raw["effects"]["status"]["status"], "failure");
    }
}
