use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetType;

/// Default timeout for a single upstream request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Trait abstraction for all price data providers.
///
/// Each upstream API (Gold API, metals.dev, Frankfurter) implements this
/// trait. If an API stops working or changes, we replace only that one
/// implementation and the price service keeps working through the registry.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which asset types this provider can handle.
    fn supported_asset_types(&self) -> Vec<AssetType>;

    /// Get the current (latest) price of `symbol` expressed in `currency`.
    ///
    /// For metals `symbol` is the ticker (`XAU`) and the quote is per troy
    /// ounce; for fiat it is the base currency (`USD`) and the quote is the
    /// exchange rate to `currency`.
    async fn get_current_price(&self, symbol: &str, currency: &str) -> Result<f64, CoreError>;
}
