use thiserror::Error;

use crate::models::metal::Metal;

/// Unified error type for the entire metals-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Database ────────────────────────────────────────────────────
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored value is corrupt: {0}")]
    CorruptRecord(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("No provider available for asset type: {0}")]
    NoProvider(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Holding validation failed: {0}")]
    ValidationError(String),

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Price not available for {0}")]
    PriceNotAvailable(Metal),

    #[error("Prices unavailable: {0}")]
    PricesUnavailable(String),
}

impl CoreError {
    /// True for the two "row does not exist" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::PortfolioNotFound(_) | CoreError::HoldingNotFound(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors often contain full URLs; metals.dev passes its API key
        // as a query parameter, so everything after '?' is dropped.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<diesel::result::Error> for CoreError {
    fn from(e: diesel::result::Error) -> Self {
        CoreError::Database(e.to_string())
    }
}

impl From<diesel::ConnectionError> for CoreError {
    fn from(e: diesel::ConnectionError) -> Self {
        CoreError::Connection(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for CoreError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        CoreError::Connection(e.to_string())
    }
}
