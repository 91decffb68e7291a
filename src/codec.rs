//! JSON snapshot format.
//!
//! A counter is written as a tagged object whose `c` field maps each actor to
//! a flat object: the compacted `total` sits next to the recent transactions.
//!
//! ```json
//! {"type":"TGCounter","c":{"A1":{"total":50,"t6":10,"t7":10}}}
//! ```
//!
//! Actors and transaction ids are emitted in sorted order, so equal counters
//! always serialize to identical bytes.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::transaction::{ActorLedger, TOTAL_KEY};
use crate::{Error, Result, TGCounter};

impl Serialize for ActorLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.recent.len() + 1))?;
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        for (id, amount) in &self.recent {
            map.serialize_entry(id, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ActorLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ActorLedgerVisitor)
    }
}

struct ActorLedgerVisitor;

impl<'de> Visitor<'de> for ActorLedgerVisitor {
    type Value = ActorLedger;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of transaction ids to amounts with an optional `total`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ActorLedger, A::Error> {
        let mut total = None;
        let mut recent = BTreeMap::new();
        while let Some(key) = access.next_key::<String>()? {
            let amount: u64 = access.next_value()?;
            if key == TOTAL_KEY {
                if total.replace(amount).is_some() {
                    return Err(de::Error::duplicate_field(TOTAL_KEY));
                }
            } else if recent.insert(key, amount).is_some() {
                return Err(de::Error::custom("duplicate transaction id"));
            }
        }
        Ok(ActorLedger {
            total: total.unwrap_or(0),
            recent,
        })
    }
}

impl Serialize for TGCounter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(Self::TYPE_NAME, 2)?;
        state.serialize_field("type", Self::TYPE_NAME)?;
        state.serialize_field("c", &self.ledgers)?;
        state.end()
    }
}

/// Wire shape of a counter before its discriminator has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCounter {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    c: BTreeMap<String, ActorLedger>,
}

impl TryFrom<RawCounter> for TGCounter {
    type Error = Error;

    fn try_from(raw: RawCounter) -> Result<Self> {
        match raw.kind.as_deref() {
            Some(Self::TYPE_NAME) => Ok(Self { ledgers: raw.c }),
            other => {
                let found = other.unwrap_or("<missing>").to_owned();
                warn!(%found, "rejected snapshot with unexpected type");
                Err(Error::TypeMismatch {
                    expected: Self::TYPE_NAME,
                    found,
                })
            }
        }
    }
}

impl<'de> Deserialize<'de> for TGCounter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCounter::deserialize(deserializer)?;
        Self::try_from(raw).map_err(de::Error::custom)
    }
}

impl TGCounter {
    /// Serialize to the JSON snapshot format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON snapshot.
    ///
    /// Fails with [`Error::TypeMismatch`] if the snapshot is not tagged as a
    /// `TGCounter`, and with [`Error::Json`] if it is not well formed.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCounter = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Decode a JSON snapshot from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawCounter = serde_json::from_slice(bytes)?;
        Self::try_from(raw)
    }
}
