pub mod portfolio_service;
pub mod price_cache;
pub mod price_service;
