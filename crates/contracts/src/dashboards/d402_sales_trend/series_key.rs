use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::dto::{SalesRecord, SeriesMode};

const TOTAL_SUFFIX: &str = "Total";
const PACK_PREFIX: &str = "pk";

/// Identifier of one plotted line/bar.
///
/// Kept structured inside the engine; the `_`-joined string form only exists
/// at the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesKey {
    PerMarket {
        market: String,
    },
    Combined {
        product_line: String,
        strain: String,
        pack_size: u32,
    },
    CombinedWithMarket {
        product_line: String,
        strain: String,
        pack_size: u32,
        market: String,
    },
}

impl SeriesKey {
    /// The single key-construction rule shared by row grouping and key derivation
    pub fn for_record(record: &SalesRecord, mode: SeriesMode) -> Self {
        match mode {
            SeriesMode::PerMarket => SeriesKey::PerMarket {
                market: record.market.clone(),
            },
            SeriesMode::Combined => SeriesKey::Combined {
                product_line: record.product_line.clone(),
                strain: record.strain.clone(),
                pack_size: record.pack_size,
            },
            SeriesMode::CombinedWithMarket => SeriesKey::CombinedWithMarket {
                product_line: record.product_line.clone(),
                strain: record.strain.clone(),
                pack_size: record.pack_size,
                market: record.market.clone(),
            },
        }
    }

    pub fn market(&self) -> Option<&str> {
        match self {
            SeriesKey::PerMarket { market } | SeriesKey::CombinedWithMarket { market, .. } => {
                Some(market.as_str())
            }
            SeriesKey::Combined { .. } => None,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKey::PerMarket { market } => write!(f, "{}_{}", market, TOTAL_SUFFIX),
            SeriesKey::Combined {
                product_line,
                strain,
                pack_size,
            } => write!(f, "{}_{}_{}{}", product_line, strain, PACK_PREFIX, pack_size),
            SeriesKey::CombinedWithMarket {
                product_line,
                strain,
                pack_size,
                market,
            } => write!(
                f,
                "{}_{}_{}{}_{}",
                product_line, strain, PACK_PREFIX, pack_size, market
            ),
        }
    }
}

fn parse_pack(segment: &str) -> Option<u32> {
    segment.strip_prefix(PACK_PREFIX)?.parse().ok()
}

/// Best-effort inverse of `Display`; dimension values containing `_` do not round-trip
impl FromStr for SeriesKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        match parts.as_slice() {
            [market, suffix] if *suffix == TOTAL_SUFFIX && !market.is_empty() => {
                Ok(SeriesKey::PerMarket {
                    market: market.to_string(),
                })
            }
            [product_line, strain, pack] => match parse_pack(pack) {
                Some(pack_size) => Ok(SeriesKey::Combined {
                    product_line: product_line.to_string(),
                    strain: strain.to_string(),
                    pack_size,
                }),
                None => Err(anyhow::anyhow!("Invalid pack segment in series key: {}", s)),
            },
            [product_line, strain, pack, market] => match parse_pack(pack) {
                Some(pack_size) => Ok(SeriesKey::CombinedWithMarket {
                    product_line: product_line.to_string(),
                    strain: strain.to_string(),
                    pack_size,
                    market: market.to_string(),
                }),
                None => Err(anyhow::anyhow!("Invalid pack segment in series key: {}", s)),
            },
            _ => Err(anyhow::anyhow!("Unrecognized series key: {}", s)),
        }
    }
}

impl Serialize for SeriesKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeriesKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
