pub mod registry;
pub mod traits;

// API provider implementations
pub mod frankfurter;
pub mod gold_api;
pub mod metals_dev;
