use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::{PriceProvider, REQUEST_TIMEOUT_SECS};
use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::metal::Metal;

const BASE_URL: &str = "https://api.gold-api.com";

/// gold-api.com provider for live precious metal spot prices.
///
/// - **Free**: No API key, generous rate limits.
/// - **Endpoint**: `/price/{symbol}` with `XAU` / `XAG`.
/// - **Currency**: always USD per troy ounce; conversion to EUR is done by
///   the price service with the Frankfurter rate.
pub struct GoldApiProvider {
    client: Client,
    base_url: String,
}

impl GoldApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different host (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Map a ticker to the symbol gold-api.com expects, rejecting anything
    /// that is not a supported metal before a request is made.
    pub fn resolve_symbol(&self, symbol: &str) -> Result<&'static str, CoreError> {
        Metal::from_symbol(symbol)
            .map(|m| m.symbol())
            .ok_or_else(|| CoreError::Api {
                provider: "Gold API".into(),
                message: format!("Unknown metal symbol: {symbol}. Supported: XAU, XAG"),
            })
    }
}

impl Default for GoldApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── gold-api.com response types ─────────────────────────────────────

#[derive(Deserialize)]
struct PriceResponse {
    price: f64,
}

#[async_trait]
impl PriceProvider for GoldApiProvider {
    fn name(&self) -> &str {
        "Gold API"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Metal]
    }

    async fn get_current_price(&self, symbol: &str, currency: &str) -> Result<f64, CoreError> {
        if !currency.eq_ignore_ascii_case("USD") {
            return Err(CoreError::Api {
                provider: "Gold API".into(),
                message: format!("Only USD quotes are available, requested {currency}"),
            });
        }

        let ticker = self.resolve_symbol(symbol)?;
        let url = format!("{}/price/{ticker}", self.base_url);

        let resp: PriceResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Gold API".into(),
                message: format!("Failed to parse price for {ticker}: {e}"),
            })?;

        Ok(resp.price)
    }
}
