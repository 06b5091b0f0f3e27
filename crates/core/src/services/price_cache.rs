//! In-memory cache of the latest metal prices with a background refresher.
//!
//! The cache holds a single snapshot. Reads are served from it without
//! waiting for network I/O; fetches (background or on-demand) are serialized
//! by a separate refresh lock so an empty cache is filled by at most one
//! request at a time. A failed fetch never clears the snapshot.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::price_service::PriceService;
use crate::errors::CoreError;
use crate::models::price::{MetalPrices, PriceSnapshot};
use crate::storage::PriceStore;

/// Default time between background refreshes (5 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

struct RefreshTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct PriceCache {
    price_service: Arc<PriceService>,
    store: Option<Arc<dyn PriceStore>>,
    snapshot: RwLock<Option<PriceSnapshot>>,
    refresh_lock: Mutex<()>,
    refresh_interval: Duration,
    task: StdMutex<Option<RefreshTask>>,
}

impl PriceCache {
    pub fn new(price_service: Arc<PriceService>, refresh_interval: Duration) -> Self {
        Self {
            price_service,
            store: None,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refresh_interval,
            task: StdMutex::new(None),
        }
    }

    /// Persist every successful fetch to `store` and fall back to it when
    /// the cache is empty and the upstream APIs fail.
    pub fn with_store(mut self, store: Arc<dyn PriceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Current prices.
    ///
    /// Returns the cached snapshot immediately when there is one. On a cold
    /// cache, fetches on demand; if that fails, serves the latest persisted
    /// prices; if there are none, returns `PricesUnavailable`.
    pub async fn get_prices(&self) -> Result<MetalPrices, CoreError> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.prices.clone());
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller (or the refresher) may have filled the slot while we waited.
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.prices.clone());
        }

        info!("Price cache miss - fetching prices immediately");
        match self.refresh_locked().await {
            Ok(snapshot) => Ok(snapshot.prices),
            Err(fetch_error) => self.fallback_to_store(fetch_error).await,
        }
    }

    /// The cached snapshot, without triggering a fetch.
    pub async fn snapshot(&self) -> Option<PriceSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// When the cached prices were fetched, if anything is cached.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.fetched_at)
    }

    /// Fetch fresh prices and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and the error is returned.
    pub async fn refresh(&self) -> Result<PriceSnapshot, CoreError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Result<PriceSnapshot, CoreError> {
        match self.price_service.fetch_metal_prices_in_eur().await {
            Ok(prices) => {
                let snapshot = PriceSnapshot::new(prices);
                *self.snapshot.write().await = Some(snapshot.clone());
                info!("Prices updated successfully at {}", snapshot.fetched_at);
                self.persist(&snapshot.prices).await;
                Ok(snapshot)
            }
            Err(e) => {
                error!("Failed to fetch prices: {e}");
                Err(e)
            }
        }
    }

    async fn persist(&self, prices: &MetalPrices) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let prices = prices.clone();

        match tokio::task::spawn_blocking(move || store.save_prices(&prices)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist fetched prices: {e}"),
            Err(e) => warn!("Price persistence task failed: {e}"),
        }
    }

    /// Caller must hold `refresh_lock`.
    async fn fallback_to_store(&self, fetch_error: CoreError) -> Result<MetalPrices, CoreError> {
        let unavailable = || {
            CoreError::PricesUnavailable(format!(
                "Unable to fetch prices from external APIs: {fetch_error}"
            ))
        };

        let Some(store) = self.store.clone() else {
            return Err(unavailable());
        };

        let stored = match tokio::task::spawn_blocking(move || store.latest_prices()).await {
            Ok(Ok(Some(snapshot))) if !snapshot.prices.is_empty() => snapshot,
            Ok(Ok(_)) => return Err(unavailable()),
            Ok(Err(e)) => {
                warn!("Failed to read stored prices: {e}");
                return Err(unavailable());
            }
            Err(e) => {
                warn!("Stored price lookup task failed: {e}");
                return Err(unavailable());
            }
        };

        warn!(
            "Serving prices stored at {} until the next successful refresh",
            stored.fetched_at
        );
        let prices = stored.prices.clone();
        *self.snapshot.write().await = Some(stored);
        Ok(prices)
    }

    /// Start the background refresh task: one fetch immediately, then one
    /// every `refresh_interval`. Returns `false` if it was already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_background_refresh(self: &Arc<Self>) -> bool {
        let mut slot = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return false;
        }

        let (shutdown, mut stop) = oneshot::channel::<()>();
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.refresh_interval;

        let handle = tokio::spawn(async move {
            info!("Starting price refresh loop (interval: {period:?})");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        // The cache owns the shutdown sender, so dropping it ends the loop too.
                        let Some(cache) = cache.upgrade() else { break };
                        tokio::select! {
                            _ = &mut stop => break,
                            _ = cache.refresh() => {}
                        }
                    }
                }
            }
        });

        *slot = Some(RefreshTask { shutdown, handle });
        info!("Background price refresh task started");
        true
    }

    /// Stop the background refresh task and wait for it to exit.
    /// An in-flight fetch is abandoned; the cached snapshot is untouched.
    pub async fn stop_background_refresh(&self) {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(task) = task else {
            return;
        };

        let _ = task.shutdown.send(());
        if let Err(e) = task.handle.await {
            if !e.is_cancelled() {
                error!("Price refresh task ended abnormally: {e}");
            }
        }
        info!("Background price refresh task stopped");
    }

    /// True while the background task is alive.
    pub fn is_refreshing_in_background(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }
}
