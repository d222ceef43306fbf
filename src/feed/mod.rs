//! Feed reads against the on-chain registry.
//!
//! Serving `/<name>.xml` is a two-phase pipeline:
//!
//! - **Resolve**: look the name up in the registry's name table
//!   ([`resolve_feed_id`]).
//! - **Simulate**: dev-inspect `rss::print_rss` on the feed and decode the
//!   returned string ([`render_feed`]).
//!
//! [`feed_by_name`] runs both and re-indents the result. The remaining
//! reads (registry, owned caps, SuiNS names, discovery) back the CLI.

mod pipeline;
mod registry;

use crate::rpc::{ObjectReadError, RpcError};
use crate::schema::DecodeError;
use crate::tx::TxError;
use crate::xml::XmlError;
use serde_json::Value;
use thiserror::Error;

pub use pipeline::{feed_by_name, render_feed, resolve_feed_id};
pub use registry::{
    discover, feeds_table_id, fetch_feed, fetch_registry, my_feeds, suins_names, FeedPage, MyFeed,
};

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_OFFSET: u64 = 0;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum FeedError {
    /// The name table has no entry for `name` (the bare name, without
    /// `.sui`). `response` is the lookup response as the node returned it.
    #[error("feed not found: {name}")]
    NotFound { name: String, response: Value },

    /// Dev-inspect returned no results. `dev_inspect` is the raw response.
    #[error("simulation failed: {}", .error.as_deref().unwrap_or("no results"))]
    SimulationFailed {
        error: Option<String>,
        dev_inspect: Value,
    },

    #[error("print_rss returned no value")]
    MissingReturnValue,

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Read(#[from] ObjectReadError),

    #[error("failed to decode feed body: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to format feed body: {0}")]
    Format(#[from] XmlError),

    #[error(transparent)]
    Tx(#[from] TxError),
}

/// Which items of a feed to render: `limit` items starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemWindow {
    pub limit: u64,
    pub offset: u64,
}

impl Default for ItemWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! JSON fixtures shaped like fullnode responses.

    use crate::schema::{self, Address, Entry, ObjectId, Rss, TableVec};
    use base64::Engine as _;
    use serde::Serialize;
    use serde_json::{json, Value};

    pub const DIGEST: &str = "11111111111111111111111111111111";

    pub fn ok(result: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": 1, "result": result})
    }

    pub fn bcs_b64<T: Serialize>(value: &T) -> String {
        base64::engine::general_purpose::STANDARD.encode(schema::encode(value).unwrap())
    }

    pub fn sample_rss(id: ObjectId, name: &str) -> Rss {
        Rss {
            id,
            name: name.to_string(),
            cap_id: Address::new([2; 32]),
            is_public: true,
            publishers: vec![],
            suins_id: Address::new([3; 32]),
            last_updated_ms: 1_700_000_000_000,
            metadata: vec![Entry {
                key: "title".into(),
                value: "Blog".into(),
            }],
            items: TableVec {
                id: Address::new([4; 32]),
                size: 2,
            },
        }
    }

    /// `sui_getObject` result for a shared object.
    pub fn shared_object<T: Serialize>(id: ObjectId, version: u64, value: &T) -> Value {
        json!({
            "data": {
                "objectId": id.to_string(),
                "version": "20",
                "digest": DIGEST,
                "owner": {"Shared": {"initial_shared_version": version}},
                "bcs": {"dataType": "moveObject", "type": "0x2::x::Y", "bcsBytes": bcs_b64(value)},
            }
        })
    }

    /// `sui_getObject`-shaped entry of an owned object.
    pub fn owned_object<T: Serialize>(id: ObjectId, value: &T) -> Value {
        json!({
            "data": {
                "objectId": id.to_string(),
                "version": "7",
                "digest": DIGEST,
                "bcs": {"dataType": "moveObject", "type": "0x2::x::Y", "bcsBytes": bcs_b64(value)},
            }
        })
    }

    /// `suix_getDynamicFieldObject` result for a `Table<String, ID>` entry.
    pub fn table_entry(key: &str, value: ObjectId) -> Value {
        json!({
            "data": {
                "objectId": Address::new([0xee; 32]).to_string(),
                "version": "3",
                "digest": DIGEST,
                "content": {
                    "dataType": "moveObject",
                    "type": "0x2::dynamic_field::Field<0x1::string::String, 0x2::object::ID>",
                    "fields": {"id": {"id": Address::new([0xee; 32]).to_string()}, "name": key, "value": value.to_string()},
                },
            }
        })
    }

    /// Dev-inspect result whose first return value is `body` as a Move `String`.
    pub fn dev_inspect_string(body: &str) -> Value {
        let bytes = schema::encode(&body.to_string()).unwrap();
        json!({
            "effects": {"status": {"status": "success"}},
            "results": [{"returnValues": [[bytes, "0x1::string::String"]]}],
        })
    }
}
