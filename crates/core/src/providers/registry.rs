use std::collections::HashMap;

use crate::models::asset::AssetType;

use super::frankfurter::FrankfurterProvider;
use super::gold_api::GoldApiProvider;
use super::metals_dev::MetalsDevProvider;
use super::traits::PriceProvider;

/// Key under which the metals.dev API key is looked up.
pub const METALS_DEV_KEY: &str = "metals_dev";

/// Registry of all available price providers.
///
/// Routes requests to the correct provider based on `AssetType`.
/// Registration order is fallback order.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Gold API: metal spot prices, no API key needed (primary)
        registry.register(Box::new(GoldApiProvider::new()));

        // metals.dev: metal spot prices, requires API key (fallback)
        if let Some(key) = api_keys.get(METALS_DEV_KEY).filter(|k| !k.is_empty()) {
            registry.register(Box::new(MetalsDevProvider::new(key.clone())));
        }

        // Frankfurter: USD → EUR, no API key needed
        registry.register(Box::new(FrankfurterProvider::new()));

        registry
    }

    /// Register a new price provider.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// Builder-style variant of `register`.
    pub fn with(mut self, provider: Box<dyn PriceProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Return ALL providers that support the given asset type, ordered by registration priority.
    /// Used for fallback: if the first provider fails, try the next one.
    pub fn get_providers_for(&self, asset_type: &AssetType) -> Vec<&dyn PriceProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_asset_types().contains(asset_type))
            .map(|p| p.as_ref())
            .collect()
    }

    /// Names of all registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
