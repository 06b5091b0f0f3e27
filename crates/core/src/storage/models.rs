//! Database row types and their conversion to domain models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{holdings, metal_prices, portfolios};
use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::metal::Metal;

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(
    Queryable, Selectable, Identifiable, Insertable, Associations, Debug, Clone, PartialEq,
)]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
#[diesel(table_name = holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub portfolio_id: String,
    pub description: String,
    pub metal: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = metal_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetalPriceDB {
    pub id: String,
    pub metal: String,
    pub price: f64,
    pub created_at: NaiveDateTime,
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(value).map_err(|e| CoreError::CorruptRecord(format!("bad id {value}: {e}")))
}

pub(crate) fn parse_metal(value: &str) -> Result<Metal, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::CorruptRecord(format!("unknown metal {value}")))
}

impl TryFrom<HoldingDB> for Holding {
    type Error = CoreError;

    fn try_from(row: HoldingDB) -> Result<Self, Self::Error> {
        Ok(Holding {
            id: parse_uuid(&row.id)?,
            portfolio_id: parse_uuid(&row.portfolio_id)?,
            metal: parse_metal(&row.metal)?,
            description: row.description,
            quantity: row.quantity,
            purchase_price: row.purchase_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
