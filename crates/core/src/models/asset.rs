use serde::{Deserialize, Serialize};

/// The kind of quote a provider serves.
/// Determines which price provider to use for fetching market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Precious metal spot prices (XAU, XAG): Gold API, metals.dev
    Metal,
    /// Fiat exchange rates (USD → EUR): Frankfurter API
    Fiat,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Metal => write!(f, "Metal"),
            AssetType::Fiat => write!(f, "Fiat"),
        }
    }
}
