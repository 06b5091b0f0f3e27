pub mod db;
pub mod models;
pub mod portfolio_repository;
pub mod price_repository;
pub mod schema;

use crate::errors::CoreError;
use crate::models::price::{MetalPrices, PriceSnapshot};

/// Durable record of fetched prices, used as the last line of fallback when
/// the upstream APIs are unreachable and nothing is cached in memory yet.
///
/// Implementations are synchronous; async callers move them onto the
/// blocking pool.
pub trait PriceStore: Send + Sync {
    /// Persist one fetch (one row per metal) atomically.
    fn save_prices(&self, prices: &MetalPrices) -> Result<(), CoreError>;

    /// Most recent stored price per metal, stamped with the oldest of their
    /// fetch times. Metals never fetched are absent; `None` when the store
    /// holds no prices at all.
    fn latest_prices(&self) -> Result<Option<PriceSnapshot>, CoreError>;
}
