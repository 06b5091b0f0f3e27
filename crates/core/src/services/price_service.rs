use log::debug;

use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::metal::Metal;
use crate::models::price::MetalPrices;
use crate::providers::registry::PriceProviderRegistry;

/// Currency every metal provider quotes in.
pub const QUOTE_CURRENCY: &str = "USD";
/// Currency all portfolio values are shown in.
pub const TARGET_CURRENCY: &str = "EUR";

/// Fetches spot prices and the FX rate from API providers and composes
/// EUR prices per metal.
///
/// Stateless apart from the registry: caching is the job of `PriceCache`.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Fetch current prices for all supported metals in EUR per troy ounce.
    ///
    /// 1. Fetch the USD → EUR rate once.
    /// 2. Fetch each metal's USD spot price.
    /// 3. Multiply.
    ///
    /// Fails as a whole if any single quote cannot be obtained, so callers
    /// never see a partial map.
    pub async fn fetch_metal_prices_in_eur(&self) -> Result<MetalPrices, CoreError> {
        let usd_to_eur = self
            .fetch_quote(QUOTE_CURRENCY, TARGET_CURRENCY, &AssetType::Fiat)
            .await?;

        let mut prices = MetalPrices::new();
        for metal in Metal::ALL {
            let usd_price = self
                .fetch_quote(metal.symbol(), QUOTE_CURRENCY, &AssetType::Metal)
                .await?;
            prices.insert(metal, usd_price * usd_to_eur);
        }

        debug!("Composed EUR prices at rate {usd_to_eur}: {prices:?}");
        Ok(prices)
    }

    /// Fetch a single quote from API providers with automatic fallback.
    ///
    /// Tries providers in registration order. If the primary fails (API down,
    /// rate limited, etc.), automatically falls back to the next provider.
    /// Validates that returned prices are finite and non-negative.
    pub async fn fetch_quote(
        &self,
        symbol: &str,
        currency: &str,
        asset_type: &AssetType,
    ) -> Result<f64, CoreError> {
        let providers = self.registry.get_providers_for(asset_type);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(asset_type.to_string()));
        }

        let mut last_error = None;

        for provider in &providers {
            match provider.get_current_price(symbol, currency).await {
                Ok(price) => {
                    if !price.is_finite() || price < 0.0 {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {price} (must be finite and non-negative)"
                            ),
                        });
                        continue;
                    }
                    return Ok(price);
                }
                Err(e) => {
                    debug!("{} failed for {symbol}/{currency}: {e}", provider.name());
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(asset_type.to_string())))
    }
}
