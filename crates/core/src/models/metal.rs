use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A precious metal that can be held in a portfolio.
///
/// Serialized by its display name (`"Gold"`, `"Silver"`), which is also the
/// value stored in the database and submitted by HTML forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    /// Every supported metal, in display order.
    pub const ALL: [Metal; 2] = [Metal::Gold, Metal::Silver];

    /// Display name, e.g. `"Gold"`.
    pub fn name(&self) -> &'static str {
        match self {
            Metal::Gold => "Gold",
            Metal::Silver => "Silver",
        }
    }

    /// ISO 4217 style ticker used by spot price APIs.
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Gold => "XAU",
            Metal::Silver => "XAG",
        }
    }

    /// Look up a metal by ticker symbol (case-insensitive).
    pub fn from_symbol(symbol: &str) -> Option<Metal> {
        Metal::ALL
            .into_iter()
            .find(|m| m.symbol().eq_ignore_ascii_case(symbol))
    }
}

impl std::fmt::Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Metal::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Unknown metal: {trimmed}. Supported: Gold, Silver"
                ))
            })
    }
}
