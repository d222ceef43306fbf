//! Sui fullnode JSON-RPC client.
//!
//! - [`client`] - the [`SuiClient`] handle and the methods this crate calls
//! - [`types`] - response shapes, modeled only as far as they are read
//! - [`object`] - adapters turning object responses into decoded records

mod client;
mod object;
mod types;

pub use client::{RpcError, SuiClient};
pub use object::{ObjectReadError, OwnedObject, SharedObject};
pub use types::{
    DevInspectResults, DynamicFieldInfo, DynamicFieldName, ExecutionResult, ObjectData,
    ObjectResponse, Owner, Page, ParsedData, ParsedMoveObject, RawData, RawMoveObject,
};
