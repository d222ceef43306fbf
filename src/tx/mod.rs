//! Encoding of programmable transactions against the feed package.
//!
//! This crate never signs or submits. It produces `TransactionKind` bytes
//! that are either dev-inspected (reads) or handed to a wallet (writes).

mod builder;
mod calls;
mod kind;

use crate::schema::{EncodeError, ObjectId};
use thiserror::Error;

pub use builder::{nested, ProgrammableTransactionBuilder};
pub use calls::{
    create_feed_tx, edit_feed_tx, post_item_tx, print_rss_tx, RssPackage, FIELD_KEYS, RSS_MODULE,
};
pub use kind::{
    Argument, CallArg, Command, ObjectArg, ObjectDigest, ObjectRef, ProgrammableMoveCall,
    ProgrammableTransaction, SequenceNumber, TransactionKind, TypeTag,
};

#[derive(Debug, Error)]
pub enum TxError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("invalid object digest: {0}")]
    InvalidDigest(String),
    #[error("object {0} passed both as shared and as owned")]
    ConflictingObjectArg(ObjectId),
    #[error("too many inputs or commands in one transaction")]
    TooManyArguments,
}
