use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::db::{get_connection, DbPool};
use super::models::MetalPriceDB;
use super::schema::metal_prices;
use super::PriceStore;
use crate::errors::CoreError;
use crate::models::metal::Metal;
use crate::models::price::{MetalPrices, PriceSnapshot};

/// Append-only history of fetched metal prices.
pub struct PriceRepository {
    pool: Arc<DbPool>,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Number of stored price rows (all metals, all fetches).
    pub fn count(&self) -> Result<i64, CoreError> {
        let mut conn = get_connection(&self.pool)?;
        Ok(metal_prices::table.count().get_result(&mut conn)?)
    }
}

impl PriceStore for PriceRepository {
    fn save_prices(&self, prices: &MetalPrices) -> Result<(), CoreError> {
        if prices.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let rows: Vec<MetalPriceDB> = prices
            .iter()
            .map(|(metal, price)| MetalPriceDB {
                id: Uuid::new_v4().to_string(),
                metal: metal.name().to_string(),
                price: *price,
                created_at: now,
            })
            .collect();

        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, CoreError, _>(|conn| {
            diesel::insert_into(metal_prices::table)
                .values(&rows)
                .execute(conn)?;
            Ok(())
        })
    }

    fn latest_prices(&self) -> Result<Option<PriceSnapshot>, CoreError> {
        let mut conn = get_connection(&self.pool)?;
        let mut prices = MetalPrices::new();
        let mut oldest: Option<DateTime<Utc>> = None;

        for metal in Metal::ALL {
            let latest = metal_prices::table
                .filter(metal_prices::metal.eq(metal.name()))
                .order(metal_prices::created_at.desc())
                .select((metal_prices::price, metal_prices::created_at))
                .first::<(f64, NaiveDateTime)>(&mut conn)
                .optional()?;

            if let Some((price, created_at)) = latest {
                let created_at = created_at.and_utc();
                oldest = Some(oldest.map_or(created_at, |t| t.min(created_at)));
                prices.insert(metal, price);
            }
        }

        Ok(oldest.map(|fetched_at| PriceSnapshot::at(prices, fetched_at)))
    }
}
