use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metal::Metal;

/// Performance of a single holding at current prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingOverview {
    pub id: Uuid,
    pub description: String,
    pub metal: Metal,
    pub quantity: f64,
    pub purchase_price: f64,
    /// quantity × purchase price
    pub purchase_cost: f64,
    /// quantity × current spot price
    pub current_value: f64,
    /// Gain relative to purchase cost, in percent (0 when cost is 0)
    pub gain_percent: f64,
    pub absolute_gain: f64,
}

/// Performance of a whole portfolio: per-holding rows plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub holdings: Vec<HoldingOverview>,
    pub total_purchase_cost: f64,
    pub total_current_value: f64,
    pub total_gain_percent: f64,
    pub total_absolute_gain: f64,
}

impl PortfolioOverview {
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
