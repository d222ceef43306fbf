//! Client for RSS feeds stored as objects on the Sui ledger.
//!
//! Reads go through a two-phase pipeline ([`feed`]): resolve a name in the
//! on-chain registry, then dev-inspect `print_rss` and re-indent the XML it
//! returns. Writes are encoded as unsigned transactions ([`tx`]) for a
//! wallet to sign.

pub mod config;
pub mod feed;
pub mod network;
pub mod rpc;
pub mod schema;
pub mod server;
pub mod tx;
pub mod xml;
