//! Binary layouts of the on-chain objects this client reads.
//!
//! Every record mirrors a Move struct field-for-field and is decoded from BCS
//! (little-endian integers, ULEB128-prefixed strings and vectors, raw 32-byte
//! addresses). [`decode`] is the single trusted boundary between ledger bytes
//! and typed values: it either consumes the input exactly or fails.

mod address;
mod records;

use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use address::{Address, AddressParseError, ObjectId, ADDRESS_LENGTH};
pub use records::{
    feed_key, short_name, ChannelFields, Entry, MoveRecord, Rss, RssAdminCap, RssRegistry,
    SuinsRegistration, TableVec, FEED_NAME_SUFFIX,
};

/// Errors produced while decoding a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the layout was complete.
    #[error("input truncated before end of record")]
    Truncated,
    /// Input continued past the end of the layout.
    #[error("trailing bytes after end of record")]
    TrailingBytes,
    /// A value violated its encoding (bad bool, UTF-8, ULEB128 or discriminant).
    #[error("malformed record: {0}")]
    Malformed(String),
    /// The RPC payload was not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

impl From<bcs::Error> for DecodeError {
    fn from(err: bcs::Error) -> Self {
        match err {
            bcs::Error::Eof => DecodeError::Truncated,
            bcs::Error::RemainingInput => DecodeError::TrailingBytes,
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

/// Encoding can only fail on length or depth limits the records never reach.
#[derive(Debug, Error)]
#[error("BCS encoding failed: {0}")]
pub struct EncodeError(#[from] bcs::Error);

/// Decodes `bytes` as `T`, requiring the input to match the layout exactly.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    bcs::from_bytes(bytes).map_err(DecodeError::from)
}

/// Decodes a base64 `bcsBytes` payload as returned by the JSON-RPC API.
pub fn decode_base64<T: DeserializeOwned>(encoded: &str) -> Result<T, DecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    decode(&bytes)
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(bcs::to_bytes(value)?)
}
