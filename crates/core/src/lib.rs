pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use errors::CoreError;
use models::{
    holding::{Holding, NewHolding},
    overview::PortfolioOverview,
    portfolio::Portfolio,
    price::MetalPrices,
};
use providers::registry::PriceProviderRegistry;
use services::{
    portfolio_service::PortfolioService, price_cache::PriceCache, price_service::PriceService,
};
use storage::{
    db::{self, DbPool},
    portfolio_repository::PortfolioRepository,
    price_repository::PriceRepository,
};

/// Main entry point for the metals tracker core library.
///
/// Owns the portfolio store and the process-wide price cache. Storage
/// methods are synchronous (SQLite through a connection pool); async callers
/// should run them on the blocking pool.
pub struct MetalsTracker {
    portfolios: PortfolioRepository,
    portfolio_service: PortfolioService,
    price_cache: Arc<PriceCache>,
}

impl std::fmt::Debug for MetalsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalsTracker")
            .field("refresh_interval", &self.price_cache.refresh_interval())
            .finish()
    }
}

impl MetalsTracker {
    /// Open (and migrate) the database at `database_url` and wire up the
    /// price cache with the given providers.
    pub fn open(
        database_url: &str,
        registry: PriceProviderRegistry,
        refresh_interval: Duration,
    ) -> Result<Self, CoreError> {
        let pool = db::open(database_url)?;
        Ok(Self::from_pool(pool, registry, refresh_interval))
    }

    /// Build on an already migrated pool.
    pub fn from_pool(
        pool: Arc<DbPool>,
        registry: PriceProviderRegistry,
        refresh_interval: Duration,
    ) -> Self {
        let price_service = Arc::new(PriceService::new(registry));
        let price_store = Arc::new(PriceRepository::new(pool.clone()));
        let price_cache =
            Arc::new(PriceCache::new(price_service, refresh_interval).with_store(price_store));

        Self {
            portfolios: PortfolioRepository::new(pool),
            portfolio_service: PortfolioService::new(),
            price_cache,
        }
    }

    /// The shared price cache (start/stop its background refresh here).
    #[must_use]
    pub fn price_cache(&self) -> &Arc<PriceCache> {
        &self.price_cache
    }

    // ── Portfolios & holdings ───────────────────────────────────────

    pub fn create_portfolio(&self) -> Result<Portfolio, CoreError> {
        self.portfolios.insert_portfolio()
    }

    pub fn get_portfolio(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>, CoreError> {
        self.portfolios.get_portfolio(portfolio_id)
    }

    pub fn get_holding(
        &self,
        portfolio_id: Uuid,
        holding_id: Uuid,
    ) -> Result<Option<Holding>, CoreError> {
        self.portfolios.get_holding(portfolio_id, holding_id)
    }

    pub fn add_holding(
        &self,
        portfolio_id: Uuid,
        holding: &NewHolding,
    ) -> Result<Holding, CoreError> {
        self.portfolios.insert_holding(portfolio_id, holding)
    }

    pub fn update_holding(
        &self,
        portfolio_id: Uuid,
        holding_id: Uuid,
        holding: &NewHolding,
    ) -> Result<Holding, CoreError> {
        self.portfolios
            .update_holding(portfolio_id, holding_id, holding)
    }

    pub fn remove_holding(&self, portfolio_id: Uuid, holding_id: Uuid) -> Result<(), CoreError> {
        self.portfolios.delete_holding(portfolio_id, holding_id)
    }

    // ── Prices & valuation ──────────────────────────────────────────

    /// Current EUR prices from the cache (see `PriceCache::get_prices`).
    pub async fn current_prices(&self) -> Result<MetalPrices, CoreError> {
        self.price_cache.get_prices().await
    }

    /// Value a portfolio at the given prices.
    pub fn calculate_overview(
        &self,
        portfolio: &Portfolio,
        prices: &MetalPrices,
    ) -> Result<PortfolioOverview, CoreError> {
        self.portfolio_service.calculate_overview(portfolio, prices)
    }
}
