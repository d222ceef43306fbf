//! Known Sui networks and the object ids deployed on each.

use crate::schema::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown network `{0}` (expected `testnet` or `mainnet`)")]
pub struct UnknownNetwork(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

const TESTNET_RSS_PACKAGE: &str =
    "0x3cc2d054fecce0d85193dd114e1936430b060f66726a19aeb803fe2b655ee3f5";
const TESTNET_RSS_REGISTRY: &str =
    "0xe1c487546ab6a055707bb99bb98b283479df632093d2a3f4676bb04e7763ea27";
const TESTNET_SUINS_PACKAGE: &str =
    "0x22fa05f21b1ad71442491220bb9338f7b7095fe35000ef88d5400d28523bdd93";
const MAINNET_SUINS_PACKAGE: &str =
    "0x71af035413ed499710980ed8adb010bbf2cc5cacf4ab37c7710a4bb87eb58ba5";

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    /// Public fullnode JSON-RPC endpoint.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
        }
    }

    /// Feed package, when one is deployed on this network.
    pub fn rss_package(&self) -> Option<ObjectId> {
        match self {
            Network::Testnet => Some(preset(TESTNET_RSS_PACKAGE)),
            Network::Mainnet => None,
        }
    }

    pub fn rss_registry(&self) -> Option<ObjectId> {
        match self {
            Network::Testnet => Some(preset(TESTNET_RSS_REGISTRY)),
            Network::Mainnet => None,
        }
    }

    /// Package defining `SuinsRegistration` on this network.
    pub fn suins_package(&self) -> ObjectId {
        match self {
            Network::Testnet => preset(TESTNET_SUINS_PACKAGE),
            Network::Mainnet => preset(MAINNET_SUINS_PACKAGE),
        }
    }
}

// Presets are compile-time literals covered by `test_presets_parse`.
fn preset(id: &str) -> ObjectId {
    id.parse().unwrap_or(ObjectId::ZERO)
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}
