use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metal::Metal;

/// Current price per troy ounce in EUR, keyed by metal.
/// Ordered so that iteration follows `Metal::ALL`.
pub type MetalPrices = BTreeMap<Metal, f64>;

/// A complete set of metal prices together with the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub prices: MetalPrices,
    pub fetched_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn new(prices: MetalPrices) -> Self {
        Self {
            prices,
            fetched_at: Utc::now(),
        }
    }

    /// Snapshot of prices that were fetched at an earlier instant.
    pub fn at(prices: MetalPrices, fetched_at: DateTime<Utc>) -> Self {
        Self { prices, fetched_at }
    }

    /// Price of a single metal, if present in the snapshot.
    pub fn get(&self, metal: Metal) -> Option<f64> {
        self.prices.get(&metal).copied()
    }

    /// True when every supported metal has a price.
    pub fn is_complete(&self) -> bool {
        Metal::ALL.iter().all(|m| self.prices.contains_key(m))
    }
}
