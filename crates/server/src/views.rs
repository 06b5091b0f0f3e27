//! Page templates and the display formatting they share.

use askama::Template;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use metals_tracker_core::models::{
    holding::Holding,
    metal::Metal,
    overview::{HoldingOverview, PortfolioOverview},
    price::MetalPrices,
};

// ── Formatting ──────────────────────────────────────────────────────

/// Values this close to zero print as zero, never as "-0.00".
fn settle(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

pub fn format_eur(value: f64) -> String {
    format!("{:.2} €", settle(value))
}

pub fn format_signed_eur(value: f64) -> String {
    format!("{:+.2} €", settle(value))
}

pub fn format_signed_percent(value: f64) -> String {
    format!("{:+.2}%", settle(value))
}

pub fn format_quantity(value: f64) -> String {
    format!("{:.2}", settle(value))
}

pub fn gain_class(value: f64) -> &'static str {
    let value = settle(value);
    if value > 0.0 {
        "gain"
    } else if value < 0.0 {
        "loss"
    } else {
        "flat"
    }
}

// ── Layout ──────────────────────────────────────────────────────────

pub struct PriceTag {
    pub metal: &'static str,
    pub price: String,
}

/// Data every page's header needs.
pub struct Layout {
    pub dev_mode: bool,
    pub prices: Vec<PriceTag>,
    pub prices_updated: Option<String>,
}

impl Layout {
    pub fn new(
        dev_mode: bool,
        prices: Option<&MetalPrices>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let prices: Vec<PriceTag> = prices
            .map(|prices| {
                prices
                    .iter()
                    .map(|(metal, price)| PriceTag {
                        metal: metal.name(),
                        price: format_eur(*price),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            dev_mode,
            prices,
            prices_updated: updated_at.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        }
    }

    /// Layout without prices, for pages rendered outside a handler.
    pub fn bare() -> Self {
        Self {
            dev_mode: false,
            prices: Vec::new(),
            prices_updated: None,
        }
    }
}

// ── Pages ───────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "home/index.html")]
pub struct HomePage {
    pub layout: Layout,
}

pub struct HoldingRow {
    pub id: String,
    pub description: String,
    pub metal: &'static str,
    pub quantity: String,
    pub purchase_price: String,
    pub current_value: String,
    pub gain_percent: String,
    pub absolute_gain: String,
    pub gain_class: &'static str,
}

impl From<&HoldingOverview> for HoldingRow {
    fn from(h: &HoldingOverview) -> Self {
        Self {
            id: h.id.to_string(),
            description: h.description.clone(),
            metal: h.metal.name(),
            quantity: format_quantity(h.quantity),
            purchase_price: format_eur(h.purchase_price),
            current_value: format_eur(h.current_value),
            gain_percent: format_signed_percent(h.gain_percent),
            absolute_gain: format_signed_eur(h.absolute_gain),
            gain_class: gain_class(h.absolute_gain),
        }
    }
}

pub struct TotalsRow {
    pub current_value: String,
    pub gain_percent: String,
    pub absolute_gain: String,
    pub gain_class: &'static str,
}

#[derive(Template)]
#[template(path = "portfolios/show.html")]
pub struct PortfolioPage {
    pub layout: Layout,
    pub portfolio_id: String,
    pub rows: Vec<HoldingRow>,
    pub totals: TotalsRow,
}

impl PortfolioPage {
    pub fn new(layout: Layout, portfolio_id: Uuid, overview: &PortfolioOverview) -> Self {
        Self {
            layout,
            portfolio_id: portfolio_id.to_string(),
            rows: overview.holdings.iter().map(HoldingRow::from).collect(),
            totals: TotalsRow {
                current_value: format_eur(overview.total_current_value),
                gain_percent: format_signed_percent(overview.total_gain_percent),
                absolute_gain: format_signed_eur(overview.total_absolute_gain),
                gain_class: gain_class(overview.total_absolute_gain),
            },
        }
    }
}

/// Raw form field values, echoed back when a submission is rejected.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub description: String,
    pub metal: String,
    pub quantity: String,
    pub purchase_price: String,
}

impl From<&Holding> for FormValues {
    fn from(h: &Holding) -> Self {
        Self {
            description: h.description.clone(),
            metal: h.metal.name().to_string(),
            quantity: h.quantity.to_string(),
            purchase_price: h.purchase_price.to_string(),
        }
    }
}

pub struct MetalOption {
    pub name: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "holdings/form.html")]
pub struct HoldingFormPage {
    pub layout: Layout,
    pub title: &'static str,
    pub portfolio_id: String,
    pub holding_id: Option<String>,
    pub values: FormValues,
    pub metals: Vec<MetalOption>,
    pub error: Option<String>,
}

impl HoldingFormPage {
    pub fn add(
        layout: Layout,
        portfolio_id: Uuid,
        values: FormValues,
        error: Option<String>,
    ) -> Self {
        Self::build(layout, "Add Holding", portfolio_id, None, values, error)
    }

    pub fn edit(
        layout: Layout,
        portfolio_id: Uuid,
        holding_id: Uuid,
        values: FormValues,
        error: Option<String>,
    ) -> Self {
        Self::build(
            layout,
            "Edit Holding",
            portfolio_id,
            Some(holding_id),
            values,
            error,
        )
    }

    fn build(
        layout: Layout,
        title: &'static str,
        portfolio_id: Uuid,
        holding_id: Option<Uuid>,
        values: FormValues,
        error: Option<String>,
    ) -> Self {
        // First metal is preselected on an empty form.
        let chosen = values.metal.parse::<Metal>().unwrap_or(Metal::ALL[0]);
        let metals = Metal::ALL
            .into_iter()
            .map(|metal| MetalOption {
                name: metal.name(),
                selected: metal == chosen,
            })
            .collect();

        Self {
            layout,
            title,
            portfolio_id: portfolio_id.to_string(),
            holding_id: holding_id.map(|id| id.to_string()),
            values,
            metals,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}
