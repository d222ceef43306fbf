//! Typed adapters over [`ObjectResponse`].
//!
//! Each adapter checks the response shape once and names the first thing
//! that is missing, so callers past this point work with decoded records.

use super::types::{ObjectData, ObjectResponse, Owner, ParsedData, RawData};
use crate::schema::{self, DecodeError, MoveRecord, ObjectId};
use crate::tx::{ObjectArg, ObjectDigest, ObjectRef, TxError};
use serde_json::Value;
use thiserror::Error;

/// Why an object response could not be turned into a typed record.
#[derive(Debug, Error)]
pub enum ObjectReadError {
    #[error("no object data in response")]
    NoData,
    #[error("object response has no BCS payload")]
    NoBcs,
    #[error("not a Move object")]
    NotMoveObject,
    #[error("object response has no owner")]
    NoOwner,
    #[error("object is not shared")]
    NotShared,
    #[error("object response has no content")]
    NoContent,
    #[error("dynamic field has no usable `{0}` field")]
    MissingField(&'static str),
    #[error("invalid object digest: {0}")]
    Digest(#[from] TxError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A decoded shared object plus what a transaction needs to reference it.
#[derive(Debug, Clone)]
pub struct SharedObject<T> {
    pub object_id: ObjectId,
    pub initial_shared_version: u64,
    pub value: T,
}

impl<T> SharedObject<T> {
    /// Transaction input referencing this object.
    pub fn arg(&self, mutable: bool) -> ObjectArg {
        ObjectArg::SharedObject {
            id: self.object_id,
            initial_shared_version: self.initial_shared_version,
            mutable,
        }
    }
}

/// A decoded address-owned object with its current reference.
#[derive(Debug, Clone)]
pub struct OwnedObject<T> {
    pub object_ref: ObjectRef,
    pub value: T,
}

impl ObjectResponse {
    pub fn into_data(self) -> Result<ObjectData, ObjectReadError> {
        self.data.ok_or(ObjectReadError::NoData)
    }

    /// Decodes a shared object (`showBcs` + `showOwner` required).
    pub fn into_shared<T: MoveRecord>(self) -> Result<SharedObject<T>, ObjectReadError> {
        let data = self.into_data()?;
        let value = data.decode::<T>()?;
        Ok(SharedObject {
            object_id: data.object_id,
            initial_shared_version: data.shared_version()?,
            value,
        })
    }

    /// Decodes an owned object (`showBcs` required).
    pub fn into_owned<T: MoveRecord>(self) -> Result<OwnedObject<T>, ObjectReadError> {
        let data = self.into_data()?;
        let value = data.decode::<T>()?;
        Ok(OwnedObject {
            object_ref: data.object_ref()?,
            value,
        })
    }
}

impl ObjectData {
    /// Decodes the BCS payload as `T`.
    pub fn decode<T: MoveRecord>(&self) -> Result<T, ObjectReadError> {
        match &self.bcs {
            None => Err(ObjectReadError::NoBcs),
            Some(RawData::Package {}) => Err(ObjectReadError::NotMoveObject),
            Some(RawData::MoveObject(obj)) => Ok(schema::decode_base64(&obj.bcs_bytes)?),
        }
    }

    pub fn shared_version(&self) -> Result<u64, ObjectReadError> {
        match &self.owner {
            None => Err(ObjectReadError::NoOwner),
            Some(Owner::Shared {
                initial_shared_version,
            }) => Ok(*initial_shared_version),
            Some(_) => Err(ObjectReadError::NotShared),
        }
    }

    pub fn object_ref(&self) -> Result<ObjectRef, ObjectReadError> {
        Ok(ObjectRef {
            object_id: self.object_id,
            version: self.version,
            digest: self.digest.parse::<ObjectDigest>()?,
        })
    }

    /// Reads the `value` of a `Table<String, ID>` entry returned by a
    /// dynamic-field lookup.
    pub fn dynamic_field_id(&self) -> Result<ObjectId, ObjectReadError> {
        let fields = match &self.content {
            None => return Err(ObjectReadError::NoContent),
            Some(ParsedData::Package {}) => return Err(ObjectReadError::NotMoveObject),
            Some(ParsedData::MoveObject(obj)) => &obj.fields,
        };
        fields
            .get("value")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .ok_or(ObjectReadError::MissingField("value"))
    }
}
