//! # Surface Cost Calculator
//!
//! Turns one surface into its priced line items.
//!
//! ## Line Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Surface 3000 × 600 mm, medium, standard edge, 1 sink                   │
//! │                                                                         │
//! │  area      = 3000 × 600 / 1 000 000        = 1.8 m²                    │
//! │  perimeter = 2 × (3000 + 600) / 1000       = 7.2 lm                    │
//! │                                                                         │
//! │  1. material      area × (1 + waste)  sqm   × sell price               │
//! │  2. fabrication   perimeter           lm    × complexity rate          │
//! │  3. edge profile  perimeter           lm    (only when not Standard)   │
//! │  4. cutouts       1 each              ea    × cutout rate              │
//! │  5. installation  area (no waste)     sqm   × class rate               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Disabled surfaces and surfaces with no material produce nothing. Cutout
//! size and position never affect price.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::CoreResult;
use crate::rates::PricingConfig;
use crate::types::{
    CustomerClassification, EdgeProfile, ItemCategory, QuoteItem, Surface, Unit,
};

// =============================================================================
// Item Ids
// =============================================================================

/// Hands out `item-1`, `item-2`, ... across every surface of one quote.
#[derive(Debug, Clone, Default)]
pub struct ItemIds {
    issued: u32,
}

impl ItemIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("item-{}", self.issued)
    }

    /// How many ids have been handed out.
    pub fn issued(&self) -> u32 {
        self.issued
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices one surface.
///
/// Returns an empty list for a non-billable surface. Fails only when the
/// rate table is missing an entry this surface needs.
pub fn price_surface(
    surface: &Surface,
    class: CustomerClassification,
    config: &PricingConfig,
    ids: &mut ItemIds,
) -> CoreResult<Vec<QuoteItem>> {
    let material = match (&surface.selected_material, surface.enabled) {
        (Some(material), true) => material,
        (None, true) => {
            warn!(surface_id = %surface.id, "Skipping enabled surface with no material selected");
            return Ok(Vec::new());
        }
        (_, false) => {
            debug!(surface_id = %surface.id, "Skipping disabled surface");
            return Ok(Vec::new());
        }
    };

    let rates = &config.rates;
    let area = surface.area_m2();
    let perimeter = surface.perimeter_m();

    // Look every rate up before issuing ids, so a miss leaves the counter
    // untouched.
    let fabrication_rate = rates.fabrication_rate(surface.complexity)?;
    let edge_rate = match surface.edge_profile {
        EdgeProfile::Standard => None,
        profile => Some(rates.edge_profile_rate(profile)?),
    };
    let cutout_rates = surface
        .cutouts
        .iter()
        .map(|cutout| Ok((cutout.cutout_type, rates.cutout_rate(cutout.cutout_type)?)))
        .collect::<CoreResult<Vec<_>>>()?;
    let installation_rate = rates.installation_rate(class)?;

    let mut items = Vec::with_capacity(3 + cutout_rates.len());

    items.push(
        QuoteItem::new(
            ids.next_id(),
            format!("{} - {}", material.name, surface.name),
            ItemCategory::Material,
            area * (Decimal::ONE + config.waste_factor),
            Unit::SquareMetre,
            material.sell_price,
        )
        .with_material(material.id.clone()),
    );

    items.push(QuoteItem::new(
        ids.next_id(),
        format!("Fabrication - {} ({})", surface.name, surface.complexity),
        ItemCategory::Fabrication,
        perimeter,
        Unit::LinearMetre,
        fabrication_rate,
    ));

    if let Some(rate) = edge_rate {
        items.push(QuoteItem::new(
            ids.next_id(),
            format!("Edge Profile - {}", surface.edge_profile),
            ItemCategory::Fabrication,
            perimeter,
            Unit::LinearMetre,
            rate,
        ));
    }

    for (cutout_type, rate) in cutout_rates {
        items.push(QuoteItem::new(
            ids.next_id(),
            format!("{} cutout", cutout_type),
            ItemCategory::Fabrication,
            Decimal::ONE,
            Unit::Each,
            rate,
        ));
    }

    items.push(QuoteItem::new(
        ids.next_id(),
        format!("Installation - {}", surface.name),
        ItemCategory::Installation,
        area,
        Unit::SquareMetre,
        installation_rate,
    ));

    for item in &items {
        debug!(
            surface_id = %surface.id,
            item_id = %item.id,
            quantity = %item.quantity,
            unit_price = %item.unit_price,
            "{}",
            item.description
        );
    }

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
