//! Registry-level reads: the registry itself, individual feeds, the feeds
//! and SuiNS names an address owns, and paging through registered names.

use super::FeedError;
use crate::config::Settings;
use crate::rpc::{OwnedObject, SharedObject, SuiClient};
use crate::schema::{
    short_name, Address, MoveRecord, ObjectId, Rss, RssAdminCap, RssRegistry, SuinsRegistration,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;

/// Max concurrent feed fetches in [`my_feeds`].
const MAX_CONCURRENT_FETCHES: usize = 8;

/// A feed together with the admin cap that controls it.
#[derive(Debug, Clone)]
pub struct MyFeed {
    pub cap: OwnedObject<RssAdminCap>,
    pub feed: SharedObject<Rss>,
}

/// One page of registered feed names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    /// Bare names, without the `.sui` suffix.
    pub names: Vec<String>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

pub async fn fetch_registry(
    client: &SuiClient,
    registry_id: &ObjectId,
) -> Result<SharedObject<RssRegistry>, FeedError> {
    Ok(client.get_object(registry_id).await?.into_shared()?)
}

/// The name table id: configured, or read from the registry.
pub async fn feeds_table_id(client: &SuiClient, settings: &Settings) -> Result<ObjectId, FeedError> {
    if let Some(id) = settings.feeds_table_id {
        return Ok(id);
    }
    let registry = fetch_registry(client, &settings.registry_id).await?;
    tracing::info!(
        registry = %settings.registry_id,
        table = %registry.value.feeds_id,
        feeds = registry.value.num_feeds,
        "Resolved feed name table from registry"
    );
    Ok(registry.value.feeds_id)
}

pub async fn fetch_feed(client: &SuiClient, id: &ObjectId) -> Result<SharedObject<Rss>, FeedError> {
    Ok(client.get_object(id).await?.into_shared()?)
}

/// Feeds `owner` administers, in the order their caps are listed.
pub async fn my_feeds(
    client: &SuiClient,
    package: &ObjectId,
    owner: &Address,
) -> Result<Vec<MyFeed>, FeedError> {
    let caps = owned::<RssAdminCap>(client, owner, &RssAdminCap::struct_type(package)).await?;
    tracing::debug!(owner = %owner, caps = caps.len(), "Fetched admin caps");

    stream::iter(caps)
        .map(|cap| async move {
            let feed = fetch_feed(client, &cap.value.rss_id).await?;
            Ok::<_, FeedError>(MyFeed { cap, feed })
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .try_collect()
        .await
}

/// SuiNS registrations owned by `owner`. Each one can back a new feed.
pub async fn suins_names(
    client: &SuiClient,
    suins_package: &ObjectId,
    owner: &Address,
) -> Result<Vec<OwnedObject<SuinsRegistration>>, FeedError> {
    owned(client, owner, &SuinsRegistration::struct_type(suins_package)).await
}

/// One page of names from the registry's name table.
pub async fn discover(
    client: &SuiClient,
    table_id: &ObjectId,
    cursor: Option<&str>,
    limit: Option<usize>,
) -> Result<FeedPage, FeedError> {
    let page = client.get_dynamic_fields(table_id, cursor, limit).await?;
    let names = page
        .data
        .iter()
        .filter_map(|field| match &field.name.value {
            Value::String(name) => Some(short_name(name).to_string()),
            other => {
                tracing::warn!(key = %other, "Skipping non-string name table key");
                None
            }
        })
        .collect();
    Ok(FeedPage {
        names,
        next_cursor: page.next_cursor,
        has_next_page: page.has_next_page,
    })
}

/// Every object of `struct_type` owned by `owner`, following cursors.
async fn owned<T: MoveRecord>(
    client: &SuiClient,
    owner: &Address,
    struct_type: &str,
) -> Result<Vec<OwnedObject<T>>, FeedError> {
    let mut out = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = client
            .get_owned_objects(owner, struct_type, cursor.as_deref(), None)
            .await?;
        for response in page.data {
            out.push(response.into_owned::<T>()?);
        }
        match page.next_cursor {
            Some(next) if page.has_next_page => cursor = Some(next),
            _ => break,
        }
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
