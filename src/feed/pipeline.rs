use super::{FeedError, ItemWindow};
use crate::config::Settings;
use crate::rpc::{DynamicFieldName, SuiClient};
use crate::schema::{self, feed_key, ObjectId};
use crate::tx::{print_rss_tx, ObjectArg, RssPackage, TxError};
use crate::xml;

/// Phase 1: maps a bare feed name to the feed's object id.
///
/// A lookup response without data or without content means the name is not
/// registered; the response is kept in [`FeedError::NotFound`].
pub async fn resolve_feed_id(
    client: &SuiClient,
    table_id: &ObjectId,
    name: &str,
) -> Result<ObjectId, FeedError> {
    let key = feed_key(name);
    let response = client
        .get_dynamic_field_object(table_id, &DynamicFieldName::string(key.as_str()))
        .await?;

    let found = response
        .data
        .as_ref()
        .is_some_and(|data| data.content.is_some());
    if !found {
        tracing::debug!(name = %key, "Feed name not in registry");
        return Err(FeedError::NotFound {
            name: name.to_string(),
            response: response.raw,
        });
    }

    Ok(response.into_data()?.dynamic_field_id()?)
}

/// Phase 2: dev-inspects `print_rss` on `feed_id` and returns the raw body.
///
/// The feed's shared version is read first; transactions must name it.
pub async fn render_feed(
    client: &SuiClient,
    settings: &Settings,
    feed_id: &ObjectId,
    window: ItemWindow,
) -> Result<String, FeedError> {
    let initial_shared_version = client.get_object(feed_id).await?.into_data()?.shared_version()?;
    let feed = ObjectArg::SharedObject {
        id: *feed_id,
        initial_shared_version,
        mutable: false,
    };

    let kind = print_rss_tx(
        RssPackage::new(settings.package_id),
        feed,
        window.limit,
        window.offset,
    )?;
    let tx_b64 = kind.to_base64().map_err(TxError::from)?;

    let results = client
        .dev_inspect(&settings.sender, &tx_b64, settings.gas_budget)
        .await?;
    if results.results.is_none() {
        tracing::warn!(
            feed = %feed_id,
            error = results.error.as_deref().unwrap_or("none"),
            "print_rss simulation returned no results"
        );
        return Err(FeedError::SimulationFailed {
            error: results.error,
            dev_inspect: results.raw,
        });
    }

    let bytes = results
        .first_return_value()
        .ok_or(FeedError::MissingReturnValue)?;
    let body: String = schema::decode(bytes)?;
    tracing::debug!(
        feed = %feed_id,
        limit = window.limit,
        offset = window.offset,
        bytes = body.len(),
        "Rendered feed"
    );
    Ok(body)
}

/// Resolves `name`, renders the window, and re-indents the document.
pub async fn feed_by_name(
    client: &SuiClient,
    settings: &Settings,
    table_id: &ObjectId,
    name: &str,
    window: ItemWindow,
) -> Result<String, FeedError> {
    let feed_id = resolve_feed_id(client, table_id, name).await?;
    let body = render_feed(client, settings, &feed_id, window).await?;
    Ok(xml::format(&body)?)
}

// ============================================================================
// Tests
// ============================================================================
