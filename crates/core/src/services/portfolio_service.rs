use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::overview::{HoldingOverview, PortfolioOverview};
use crate::models::portfolio::Portfolio;
use crate::models::price::MetalPrices;

/// Calculates portfolio performance from stored holdings and current prices.
///
/// Pure business logic: no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Calculate per-holding metrics and portfolio totals.
    ///
    /// Every holding's metal must have a price in `current_prices`.
    pub fn calculate_overview(
        &self,
        portfolio: &Portfolio,
        current_prices: &MetalPrices,
    ) -> Result<PortfolioOverview, CoreError> {
        let holdings = portfolio
            .holdings
            .iter()
            .map(|holding| {
                let price = current_prices
                    .get(&holding.metal)
                    .copied()
                    .ok_or(CoreError::PriceNotAvailable(holding.metal))?;
                Ok(self.calculate_holding_overview(holding, price))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let total_purchase_cost: f64 = holdings.iter().map(|h| h.purchase_cost).sum();
        let total_current_value: f64 = holdings.iter().map(|h| h.current_value).sum();
        let total_absolute_gain = total_current_value - total_purchase_cost;

        Ok(PortfolioOverview {
            holdings,
            total_purchase_cost,
            total_current_value,
            total_gain_percent: gain_percent(total_absolute_gain, total_purchase_cost),
            total_absolute_gain,
        })
    }

    /// Calculate performance metrics for a single holding at `current_price`
    /// (EUR per troy ounce).
    pub fn calculate_holding_overview(&self, holding: &Holding, current_price: f64) -> HoldingOverview {
        let purchase_cost = holding.quantity * holding.purchase_price;
        let current_value = holding.quantity * current_price;
        let absolute_gain = current_value - purchase_cost;

        HoldingOverview {
            id: holding.id,
            description: holding.description.clone(),
            metal: holding.metal,
            quantity: holding.quantity,
            purchase_price: holding.purchase_price,
            purchase_cost,
            current_value,
            gain_percent: gain_percent(absolute_gain, purchase_cost),
            absolute_gain,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

/// Gain relative to cost in percent; 0 for a zero cost basis.
fn gain_percent(absolute_gain: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        absolute_gain / cost * 100.0
    } else {
        0.0
    }
}
