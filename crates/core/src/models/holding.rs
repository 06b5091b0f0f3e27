use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metal::Metal;
use crate::errors::CoreError;

/// Longest accepted holding description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A recorded purchase of a quantity of a metal at a price.
///
/// `quantity` is in troy ounces and `purchase_price` is EUR per ounce, the
/// same unit the spot price APIs quote in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub description: String,
    pub metal: Metal,
    pub quantity: f64,
    pub purchase_price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// User-supplied fields of a holding, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHolding {
    pub description: String,
    pub metal: Metal,
    pub quantity: f64,
    pub purchase_price: f64,
}

impl NewHolding {
    pub fn new(
        description: impl Into<String>,
        metal: Metal,
        quantity: f64,
        purchase_price: f64,
    ) -> Self {
        Self {
            description: description.into(),
            metal,
            quantity,
            purchase_price,
        }
    }

    /// Check the fields and return a copy with the description trimmed.
    ///
    /// Rules:
    /// - Description must not be blank and at most `MAX_DESCRIPTION_LEN` chars
    /// - Quantity must be finite and positive
    /// - Purchase price must be finite and non-negative (gifts are allowed)
    pub fn validate(&self) -> Result<NewHolding, CoreError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(CoreError::ValidationError(
                "Description must not be empty".into(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::ValidationError(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(CoreError::ValidationError(
                "Quantity must be a positive number".into(),
            ));
        }
        if !self.purchase_price.is_finite() || self.purchase_price < 0.0 {
            return Err(CoreError::ValidationError(
                "Purchase price must not be negative".into(),
            ));
        }

        Ok(NewHolding {
            description: description.to_string(),
            ..self.clone()
        })
    }
}

impl From<&Holding> for NewHolding {
    fn from(h: &Holding) -> Self {
        Self {
            description: h.description.clone(),
            metal: h.metal,
            quantity: h.quantity,
            purchase_price: h.purchase_price,
        }
    }
}
