use super::address::{Address, ObjectId};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Suffix every feed name carries (feeds are keyed by SuiNS `.sui` names).
pub const FEED_NAME_SUFFIX: &str = ".sui";

/// Builds the registry table key for a bare feed name (`"blog"` → `"blog.sui"`).
pub fn feed_key(name: &str) -> String {
    format!("{name}{FEED_NAME_SUFFIX}")
}

/// Strips [`FEED_NAME_SUFFIX`] from a full feed name, if present.
pub fn short_name(name: &str) -> &str {
    name.strip_suffix(FEED_NAME_SUFFIX).unwrap_or(name)
}

/// A Move struct whose on-chain layout is declared by a Rust record.
///
/// The field order of the implementing struct *is* the binary layout; the
/// constants only name the Move type so queries can filter on it.
pub trait MoveRecord: Serialize + DeserializeOwned {
    /// Module that defines the struct, e.g. `rss`.
    const MODULE: &'static str;
    /// Struct name as declared in Move, e.g. `RSSAdminCap`.
    const NAME: &'static str;

    /// Fully qualified struct type under `package`.
    fn struct_type(package: &Address) -> String {
        format!("{}::{}::{}", package, Self::MODULE, Self::NAME)
    }
}

// ============================================================================
// sui_rss::rss
// ============================================================================

/// Layout of `sui_rss::rss::RSSRegistry`, the shared singleton indexing feeds by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssRegistry {
    pub id: ObjectId,
    /// Id of the `Table<String, ID>` mapping `"<name>.sui"` to feed ids.
    pub feeds_id: ObjectId,
    pub num_feeds: u64,
}

impl MoveRecord for RssRegistry {
    const MODULE: &'static str = "rss";
    const NAME: &'static str = "RSSRegistry";
}

/// A metadata key/value pair (`title`, `link`, `description`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Header of the `TableVec` holding feed items. Only the size is readable
/// without walking dynamic fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableVec {
    pub id: ObjectId,
    pub size: u64,
}

/// Layout of `sui_rss::rss::RSS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rss {
    pub id: ObjectId,
    /// Full SuiNS name, always ending in [`FEED_NAME_SUFFIX`].
    pub name: String,
    pub cap_id: ObjectId,
    pub is_public: bool,
    pub publishers: Vec<Address>,
    pub suins_id: ObjectId,
    pub last_updated_ms: u64,
    pub metadata: Vec<Entry>,
    pub items: TableVec,
}

impl MoveRecord for Rss {
    const MODULE: &'static str = "rss";
    const NAME: &'static str = "RSS";
}

/// Channel-level fields a publisher edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFields {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Rss {
    /// Feed name without the `.sui` suffix, as used in feed URLs.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    /// First metadata value stored under `key`.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Current channel fields; later duplicates of a key win.
    pub fn channel_fields(&self) -> ChannelFields {
        self.metadata
            .iter()
            .fold(ChannelFields::default(), |mut acc, e| {
                match e.key.as_str() {
                    "title" => acc.title = e.value.clone(),
                    "link" => acc.link = e.value.clone(),
                    "description" => acc.description = e.value.clone(),
                    _ => {}
                }
                acc
            })
    }

    pub fn item_count(&self) -> u64 {
        self.items.size
    }

    /// `last_updated_ms` as a UTC timestamp (`None` if out of range).
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.last_updated_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// Layout of `sui_rss::rss::RSSAdminCap`. Owning it authorizes edits to `rss_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssAdminCap {
    pub id: ObjectId,
    pub rss_id: ObjectId,
}

impl MoveRecord for RssAdminCap {
    const MODULE: &'static str = "rss";
    const NAME: &'static str = "RSSAdminCap";
}

// ============================================================================
// suins::suins_registration
// ============================================================================

/// Layout of `suins::suins_registration::SuinsRegistration`, the NFT proving
/// ownership of a SuiNS name. Required by `new_rss`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuinsRegistration {
    pub id: ObjectId,
    /// Labels, TLD first (`["sui", "blog"]`).
    pub domain: Vec<String>,
    pub domain_name: String,
    pub expiration_timestamp_ms: u64,
    pub image_url: String,
}

impl MoveRecord for SuinsRegistration {
    const MODULE: &'static str = "suins_registration";
    const NAME: &'static str = "SuinsRegistration";
}

impl SuinsRegistration {
    pub fn short_name(&self) -> &str {
        short_name(&self.domain_name)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.expiration_timestamp_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}
