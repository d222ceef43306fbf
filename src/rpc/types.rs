//! Response shapes of the Sui JSON-RPC methods this client calls.
//!
//! Only the fields the client reads are modeled; everything else is ignored
//! by serde. Interpretation (is there data? is it shared?) happens in the
//! adapters in `object.rs`, not here.

use crate::schema::{Address, ObjectId};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Sui encodes u64s as JSON strings in some places and numbers in others.
pub(crate) mod flex_u64 {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(n),
            Repr::Str(s) => s.parse().map_err(de::Error::custom),
        }
    }

    pub fn from_value(value: &Value) -> Option<u64> {
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    }
}

/// `SuiObjectResponse`: either `data` or an `error` describing why there is none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
    /// The response exactly as the node sent it, kept for diagnostics.
    #[serde(skip)]
    pub raw: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    #[serde(deserialize_with = "flex_u64::deserialize")]
    pub version: u64,
    /// Base58 object digest.
    pub digest: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub bcs: Option<RawData>,
    #[serde(default)]
    pub content: Option<ParsedData>,
}

/// Ownership of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum Owner {
    Address(Address),
    Object(Address),
    Shared { initial_shared_version: u64 },
    Immutable,
    /// Ownership kinds this client does not interpret.
    Other(Value),
}

impl<'de> Deserialize<'de> for Owner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Owner::from_value(value))
    }
}

impl Owner {
    fn from_value(value: Value) -> Self {
        if value.as_str() == Some("Immutable") {
            return Owner::Immutable;
        }
        let address = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<Address>().ok())
        };
        if let Some(a) = address("AddressOwner") {
            return Owner::Address(a);
        }
        if let Some(a) = address("ObjectOwner") {
            return Owner::Object(a);
        }
        if let Some(version) = value
            .get("Shared")
            .and_then(|s| s.get("initial_shared_version"))
            .and_then(flex_u64::from_value)
        {
            return Owner::Shared {
                initial_shared_version: version,
            };
        }
        Owner::Other(value)
    }
}

/// `showBcs` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dataType", rename_all = "camelCase")]
pub enum RawData {
    MoveObject(RawMoveObject),
    Package {},
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoveObject {
    #[serde(rename = "type")]
    pub object_type: String,
    /// Base64 BCS of the struct contents (no type tag).
    pub bcs_bytes: String,
}

/// `showContent` payload; dynamic-field lookups always include it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dataType", rename_all = "camelCase")]
pub enum ParsedData {
    MoveObject(ParsedMoveObject),
    Package {},
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedMoveObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub fields: Value,
}

/// A cursor-paginated result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Typed key of a dynamic field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct DynamicFieldName {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: Value,
}

impl DynamicFieldName {
    /// A `0x1::string::String` key, the key type of the feed name table.
    pub fn string(value: impl Into<String>) -> Self {
        DynamicFieldName {
            type_: "0x1::string::String".to_string(),
            value: Value::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: DynamicFieldName,
    pub object_id: ObjectId,
}

/// `DevInspectResults`, with the untouched response kept for error reporting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevInspectResults {
    #[serde(default)]
    pub results: Option<Vec<ExecutionResult>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// `(bcs bytes, type tag)` per return slot.
    #[serde(default)]
    pub return_values: Vec<(Vec<u8>, String)>,
}

impl DevInspectResults {
    /// Bytes of the first return slot of the first command.
    pub fn first_return_value(&self) -> Option<&[u8]> {
        self.results
            .as_ref()?
            .first()?
            .return_values
            .first()
            .map(|(bytes, _)| bytes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_variants() {
        let shared: Owner =
            serde_json::from_value(json!({"Shared": {"initial_shared_version": 17}})).unwrap();
        assert_eq!(
            shared,
            Owner::Shared {
                initial_shared_version: 17
            }
        );

        let shared_str: Owner =
            serde_json::from_value(json!({"Shared": {"initial_shared_version": "18"}})).unwrap();
        assert_eq!(
            shared_str,
            Owner::Shared {
                initial_shared_version: 18
            }
        );

        let owned: Owner = serde_json::from_value(json!({"AddressOwner": "0x5"})).unwrap();
        assert_eq!(owned, Owner::Address("0x5".parse().unwrap()));

        let immutable: Owner = serde_json::from_value(json!("Immutable")).unwrap();
        assert_eq!(immutable, Owner::Immutable);

        let other: Owner = serde_json::from_value(json!({"Unknown": 1})).unwrap();
        assert!(matches!(other, Owner::Other(_)));
    }

    #[test]
    fn test_object_response_with_bcs() {
        let response: ObjectResponse = serde_json::from_value(json!({
            "data": {
                "objectId": "0x1",
                "version": "42",
                "digest": "11111111111111111111111111111111",
                "owner": {"Shared": {"initial_shared_version": 7}},
                "bcs": {
                    "dataType": "moveObject",
                    "type": "0x2::rss::RSS",
                    "hasPublicTransfer": false,
                    "version": 42,
                    "bcsBytes": "AAAA"
                }
            }
        }))
        .unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.version, 42);
        match data.bcs {
            Some(RawData::MoveObject(obj)) => assert_eq!(obj.bcs_bytes, "AAAA"),
            other => panic!("expected moveObject, got {:?}", other),
        }
    }

    #[test]
    fn test_object_response_error_only() {
        let response: ObjectResponse = serde_json::from_value(json!({
            "error": {"code": "dynamicFieldNotFound", "parent_object_id": "0x1"}
        }))
        .unwrap();
        assert!(response.data.is_none());
        assert!(response.error.is_some());
    }

    #[test]
    fn test_first_return_value() {
        let results: DevInspectResults = serde_json::from_value(json!({
            "effects": {},
            "results": [{"returnValues": [[[2, 104, 105], "0x1::string::String"]]}]
        }))
        .unwrap();
        assert_eq!(results.first_return_value(), Some(&[2u8, 104, 105][..]));

        let failed: DevInspectResults =
            serde_json::from_value(json!({"effects": {}, "error": "MoveAbort"})).unwrap();
        assert!(failed.results.is_none());
        assert_eq!(failed.first_return_value(), None);
    }
}
