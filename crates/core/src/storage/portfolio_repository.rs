use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::db::{get_connection, DbPool};
use super::models::{parse_uuid, HoldingDB, PortfolioDB};
use super::schema::{holdings, portfolios};
use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding};
use crate::models::portfolio::Portfolio;

/// Persistence for portfolios and their holdings.
///
/// Holdings are always addressed through their portfolio: a holding id
/// that belongs to another portfolio is treated as missing.
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Create an empty portfolio with a fresh id.
    pub fn insert_portfolio(&self) -> Result<Portfolio, CoreError> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();
        let row = PortfolioDB {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(portfolios::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(Portfolio {
            id: parse_uuid(&row.id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            holdings: Vec::new(),
        })
    }

    /// Load a portfolio with all of its holdings, oldest holding first.
    pub fn get_portfolio(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>, CoreError> {
        let mut conn = get_connection(&self.pool)?;

        let Some(row) = portfolios::table
            .find(portfolio_id.to_string())
            .select(PortfolioDB::as_select())
            .first(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let holding_rows = HoldingDB::belonging_to(&row)
            .select(HoldingDB::as_select())
            .order((holdings::created_at.asc(), holdings::id.asc()))
            .load(&mut conn)?;

        let holdings = holding_rows
            .into_iter()
            .map(Holding::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Portfolio {
            id: parse_uuid(&row.id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            holdings,
        }))
    }

    /// Load a single holding, scoped to its portfolio.
    pub fn get_holding(
        &self,
        portfolio_id: Uuid,
        holding_id: Uuid,
    ) -> Result<Option<Holding>, CoreError> {
        let mut conn = get_connection(&self.pool)?;
        holdings::table
            .filter(holdings::id.eq(holding_id.to_string()))
            .filter(holdings::portfolio_id.eq(portfolio_id.to_string()))
            .select(HoldingDB::as_select())
            .first(&mut conn)
            .optional()?
            .map(Holding::try_from)
            .transpose()
    }

    /// Validate and add a holding to an existing portfolio.
    pub fn insert_holding(
        &self,
        portfolio_id: Uuid,
        new_holding: &NewHolding,
    ) -> Result<Holding, CoreError> {
        let data = new_holding.validate()?;
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, CoreError, _>(|conn| {
            let now = Utc::now().naive_utc();
            touch_portfolio(conn, portfolio_id, now)?;

            let row = HoldingDB {
                id: Uuid::new_v4().to_string(),
                portfolio_id: portfolio_id.to_string(),
                description: data.description,
                metal: data.metal.name().to_string(),
                quantity: data.quantity,
                purchase_price: data.purchase_price,
                created_at: now,
                updated_at: now,
            };

            diesel::insert_into(holdings::table)
                .values(&row)
                .execute(conn)?;

            Holding::try_from(row)
        })
    }

    /// Validate and overwrite the user-editable fields of a holding.
    pub fn update_holding(
        &self,
        portfolio_id: Uuid,
        holding_id: Uuid,
        new_holding: &NewHolding,
    ) -> Result<Holding, CoreError> {
        let data = new_holding.validate()?;
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, CoreError, _>(|conn| {
            let now = Utc::now().naive_utc();
            let target = holdings::table
                .filter(holdings::id.eq(holding_id.to_string()))
                .filter(holdings::portfolio_id.eq(portfolio_id.to_string()));

            let updated = diesel::update(target)
                .set((
                    holdings::description.eq(&data.description),
                    holdings::metal.eq(data.metal.name()),
                    holdings::quantity.eq(data.quantity),
                    holdings::purchase_price.eq(data.purchase_price),
                    holdings::updated_at.eq(now),
                ))
                .execute(conn)?;

            if updated == 0 {
                return Err(CoreError::HoldingNotFound(holding_id.to_string()));
            }
            touch_portfolio(conn, portfolio_id, now)?;

            let row = holdings::table
                .find(holding_id.to_string())
                .select(HoldingDB::as_select())
                .first(conn)?;
            Holding::try_from(row)
        })
    }

    /// Remove a holding from its portfolio.
    pub fn delete_holding(&self, portfolio_id: Uuid, holding_id: Uuid) -> Result<(), CoreError> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, CoreError, _>(|conn| {
            let deleted = diesel::delete(
                holdings::table
                    .filter(holdings::id.eq(holding_id.to_string()))
                    .filter(holdings::portfolio_id.eq(portfolio_id.to_string())),
            )
            .execute(conn)?;

            if deleted == 0 {
                return Err(CoreError::HoldingNotFound(holding_id.to_string()));
            }
            touch_portfolio(conn, portfolio_id, Utc::now().naive_utc())
        })
    }
}

/// Bump `updated_at` of a portfolio, failing if it does not exist.
fn touch_portfolio(
    conn: &mut SqliteConnection,
    portfolio_id: Uuid,
    now: chrono::NaiveDateTime,
) -> Result<(), CoreError> {
    let updated = diesel::update(portfolios::table.find(portfolio_id.to_string()))
        .set(portfolios::updated_at.eq(now))
        .execute(conn)?;

    if updated == 0 {
        return Err(CoreError::PortfolioNotFound(portfolio_id.to_string()));
    }
    Ok(())
}
