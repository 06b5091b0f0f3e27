use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::{PriceProvider, REQUEST_TIMEOUT_SECS};
use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::metal::Metal;

const BASE_URL: &str = "https://api.metals.dev/v1";

/// metals.dev API provider for precious metals prices.
///
/// - **Free tier**: 100 requests/month (no credit card required).
/// - **Requires**: API key (`METALS_DEV_API_KEY`).
/// - Registered after Gold API, so it is only hit when the primary fails.
///
/// Note: metals.dev returns prices in USD. Conversion to EUR is handled by
/// the price service using Frankfurter.
pub struct MetalsDevProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MetalsDevProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Map from our symbol (XAU) to the metals.dev metal name (gold).
    pub fn resolve_metal_name(&self, symbol: &str) -> Result<&'static str, CoreError> {
        match Metal::from_symbol(symbol) {
            Some(Metal::Gold) => Ok("gold"),
            Some(Metal::Silver) => Ok("silver"),
            None => Err(CoreError::Api {
                provider: "metals.dev".into(),
                message: format!("Unknown metal symbol: {symbol}. Supported: XAU, XAG"),
            }),
        }
    }
}

// ── metals.dev API response types ───────────────────────────────────

#[derive(Deserialize)]
struct LatestResponse {
    metals: HashMap<String, f64>,
}

#[async_trait]
impl PriceProvider for MetalsDevProvider {
    fn name(&self) -> &str {
        "metals.dev"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Metal]
    }

    async fn get_current_price(&self, symbol: &str, currency: &str) -> Result<f64, CoreError> {
        let metal_name = self.resolve_metal_name(symbol)?;
        let currency = currency.to_uppercase();
        let url = format!("{}/latest", self.base_url);

        let resp: LatestResponse = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", currency.as_str()),
                ("unit", "toz"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "metals.dev".into(),
                message: format!("Failed to parse latest prices: {e}"),
            })?;

        resp.metals
            .get(metal_name)
            .copied()
            .ok_or_else(|| CoreError::Api {
                provider: "metals.dev".into(),
                message: format!("No {metal_name} price in response"),
            })
    }
}
