use std::fmt;

use lkit_units::Amount;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Network identifier a harness accepts: any network, or one numeric id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NetworkId {
    /// Matches any network (`"*"`).
    #[default]
    Any,
    Id(u64),
}

impl NetworkId {
    /// Returns `true` if a node reporting `id` is acceptable.
    pub fn accepts(&self, id: u64) -> bool {
        match self {
            Self::Any => true,
            Self::Id(expected) => *expected == id,
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for NetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Id(id) => serializer.serialize_u64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NetworkIdVisitor)
    }
}

struct NetworkIdVisitor;

impl<'de> Visitor<'de> for NetworkIdVisitor {
    type Value = NetworkId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"*\" or a non-negative network id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NetworkId, E> {
        Ok(NetworkId::Id(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NetworkId, E> {
        u64::try_from(v)
            .map(NetworkId::Id)
            .map_err(|_| E::custom(format!("negative network id: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NetworkId, E> {
        match v.trim() {
            "*" => Ok(NetworkId::Any),
            id => id
                .parse()
                .map(NetworkId::Id)
                .map_err(|_| E::custom(format!("invalid network id: {v:?}"))),
        }
    }
}

/// One network entry. Consumed verbatim: no provider or wallet is built
/// from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Remote RPC endpoint, used instead of `host`/`port` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    pub network_id: NetworkId,
    /// Gas limit per transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price in base units; falls back to the harness-wide price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Amount>,
}

impl NetworkConfig {
    /// A local node at `host:port` accepting any network id.
    pub fn local(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            ..Default::default()
        }
    }

    /// The RPC endpoint this entry points at, if it names one.
    pub fn endpoint(&self) -> Option<String> {
        if let Some(url) = &self.provider_url {
            return Some(url.clone());
        }
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(format!("http://{host}:{port}")),
            (Some(host), None) => Some(format!("http://{host}")),
            _ => None,
        }
    }
}
