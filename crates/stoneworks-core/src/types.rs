//! # Domain Types
//!
//! Core domain types used throughout Stoneworks.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Project      │   │    Surface      │   │     Quote       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_id    │──►│  width × height │   │  quote_number   │       │
//! │  │  surfaces[]     │   │  material?      │   │  items[]        │       │
//! │  │  delivery_zone? │   │  cutouts[]      │   │  subtotal, gst  │       │
//! │  └─────────────────┘   │  edge, tier     │   │  total          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ BusinessProfile │   │ StoneMaterial   │   │   Customer      │       │
//! │  │  gst_rate       │   │  sell_price/m²  │   │  customer_type  │       │
//! │  │  markup, labour │   │  cost_price/m²  │   │  → class        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dimensions are millimetres, areas square metres, lengths linear metres.
//! JSON field names are camelCase to match the web frontend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a closed enum.
///
/// The names must match the enum's serde representation; the tests at the
/// bottom of this file check that they do.
macro_rules! string_enum {
    ($name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire/storage name of the variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::InvalidFormat {
                        field: $field.to_string(),
                        reason: format!(
                            "unknown value '{}', expected one of: {}",
                            other,
                            [$($text),+].join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a decimal fraction (0.10 = 10% GST).
///
/// Serializes as a decimal string (`"0.10"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "string")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a fraction (0.10 = 10%).
    #[inline]
    pub const fn from_fraction(fraction: Decimal) -> Self {
        TaxRate(fraction)
    }

    /// Creates a tax rate from basis points (1000 = 10%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(bps as i64, 4))
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage (10 for 10%).
    #[inline]
    pub fn percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Pricing Keys
// =============================================================================
// Closed sets used to index the rate table. A lookup for any of these can
// only miss when a configured table leaves an entry out.

/// Fabrication complexity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

string_enum!(Complexity, "complexity" {
    Simple => "simple",
    Medium => "medium",
    Complex => "complex",
});

/// Finished treatment applied to a surface's visible edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EdgeProfile {
    Standard,
    Bullnose,
    Ogee,
    Beveled,
    Waterfall,
}

string_enum!(EdgeProfile, "edge_profile" {
    Standard => "standard",
    Bullnose => "bullnose",
    Ogee => "ogee",
    Beveled => "beveled",
    Waterfall => "waterfall",
});

/// Kind of opening cut into a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CutoutType {
    Sink,
    Cooktop,
    Tap,
    Powerpoint,
    Custom,
}

string_enum!(CutoutType, "cutout_type" {
    Sink => "sink",
    Cooktop => "cooktop",
    Tap => "tap",
    Powerpoint => "powerpoint",
    Custom => "custom",
});

/// Pricing class used for installation and templating rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CustomerClassification {
    Residential,
    Commercial,
}

string_enum!(CustomerClassification, "customer_class" {
    Residential => "residential",
    Commercial => "commercial",
});

/// Delivery zone for the flat delivery charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DeliveryZone {
    Metro,
    Regional,
}

string_enum!(DeliveryZone, "delivery_zone" {
    Metro => "metro",
    Regional => "regional",
});

impl Default for DeliveryZone {
    fn default() -> Self {
        DeliveryZone::Metro
    }
}

// =============================================================================
// Business Profile
// =============================================================================

/// Tenant-level settings. Read-only to the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BusinessProfile {
    pub id: String,
    pub company_name: String,
    pub abn: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Markup fraction. Reserved for labour-cost line items; unused by pricing.
    #[ts(type = "string")]
    pub markup: Decimal,
    /// GST applied to the quote subtotal.
    pub gst_rate: TaxRate,
    /// Hourly labour rate. Reserved; unused by pricing.
    pub labor_rate: Money,
}

// =============================================================================
// Stone Material
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MaterialCategory {
    Granite,
    Marble,
    Quartz,
    Quartzite,
    Limestone,
    Travertine,
    Slate,
}

string_enum!(MaterialCategory, "category" {
    Granite => "granite",
    Marble => "marble",
    Quartz => "quartz",
    Quartzite => "quartzite",
    Limestone => "limestone",
    Travertine => "travertine",
    Slate => "slate",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Finish {
    Polished,
    Honed,
    Leathered,
    Flamed,
    Brushed,
}

string_enum!(Finish, "finish" {
    Polished => "polished",
    Honed => "honed",
    Leathered => "leathered",
    Flamed => "flamed",
    Brushed => "brushed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Availability {
    InStock,
    OrderIn,
    Discontinued,
}

string_enum!(Availability, "availability" {
    InStock => "in-stock",
    OrderIn => "order-in",
    Discontinued => "discontinued",
});

/// A catalogue entry. Prices are per square metre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoneMaterial {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub supplier: String,
    pub supplier_code: String,
    pub finish: Finish,
    pub cost_price: Money,
    pub sell_price: Money,
    pub availability: Availability,
    /// Lead time in days.
    pub lead_time_days: u32,
    /// Warranty in years.
    pub warranty_years: u32,
}

impl StoneMaterial {
    /// Gross margin per square metre.
    pub fn margin(&self) -> Money {
        self.sell_price - self.cost_price
    }

    pub fn is_available(&self) -> bool {
        self.availability != Availability::Discontinued
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CustomerType {
    Residential,
    Commercial,
    Builder,
}

string_enum!(CustomerType, "customer_type" {
    Residential => "residential",
    Commercial => "commercial",
    Builder => "builder",
});

/// Builders are billed at trade (commercial) rates.
impl From<CustomerType> for CustomerClassification {
    fn from(customer_type: CustomerType) -> Self {
        match customer_type {
            CustomerType::Residential => CustomerClassification::Residential,
            CustomerType::Commercial | CustomerType::Builder => CustomerClassification::Commercial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub customer_type: CustomerType,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Pricing class for this customer.
    #[inline]
    pub fn classification(&self) -> CustomerClassification {
        self.customer_type.into()
    }
}

// =============================================================================
// Surfaces and Cutouts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SurfaceType {
    Countertop,
    Splashback,
    Floor,
    Vanity,
    Fireplace,
    FeatureWall,
}

string_enum!(SurfaceType, "surface_type" {
    Countertop => "countertop",
    Splashback => "splashback",
    Floor => "floor",
    Vanity => "vanity",
    Fireplace => "fireplace",
    FeatureWall => "feature-wall",
});

/// An opening in a surface. Its size and position are recorded for the
/// workshop but never affect price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cutout {
    pub id: String,
    #[serde(rename = "type")]
    pub cutout_type: CutoutType,
    #[ts(type = "string")]
    pub width_mm: Decimal,
    #[ts(type = "string")]
    pub height_mm: Decimal,
    #[ts(type = "string")]
    pub x_mm: Decimal,
    #[ts(type = "string")]
    pub y_mm: Decimal,
    pub notes: Option<String>,
}

/// A billable physical area within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Surface {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub surface_type: SurfaceType,
    #[ts(type = "string")]
    pub width_mm: Decimal,
    #[ts(type = "string")]
    pub height_mm: Decimal,
    pub enabled: bool,
    pub selected_material: Option<StoneMaterial>,
    #[serde(default)]
    pub cutouts: Vec<Cutout>,
    pub edge_profile: EdgeProfile,
    pub complexity: Complexity,
}

impl Surface {
    /// Whether this surface produces line items (enabled with a material).
    #[inline]
    pub fn is_billable(&self) -> bool {
        self.enabled && self.selected_material.is_some()
    }

    /// Measured area in square metres: `width_mm * height_mm / 1_000_000`.
    pub fn area_m2(&self) -> Decimal {
        self.width_mm * self.height_mm / MM2_PER_M2
    }

    /// Perimeter in linear metres: `2 * (width_mm + height_mm) / 1000`.
    pub fn perimeter_m(&self) -> Decimal {
        Decimal::TWO * (self.width_mm + self.height_mm) / MM_PER_M
    }
}

const MM_PER_M: Decimal = Decimal::ONE_THOUSAND;
const MM2_PER_M2: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

// =============================================================================
// Project
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ProjectType {
    Kitchen,
    Bathroom,
    Fireplace,
    Commercial,
    Outdoor,
    Other,
}

string_enum!(ProjectType, "project_type" {
    Kitchen => "kitchen",
    Bathroom => "bathroom",
    Fireplace => "fireplace",
    Commercial => "commercial",
    Outdoor => "outdoor",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ProjectStatus {
    Quote,
    Approved,
    InProgress,
    Completed,
    Cancelled,
}

string_enum!(ProjectStatus, "project_status" {
    Quote => "quote",
    Approved => "approved",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Quote
    }
}

/// A renovation job made of surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Overrides the configured default delivery zone.
    pub delivery_zone: Option<DeliveryZone>,
    /// Array order is the quote's line order.
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Quote Items
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ItemCategory {
    Material,
    Fabrication,
    Installation,
    Extras,
}

string_enum!(ItemCategory, "category" {
    Material => "material",
    Fabrication => "fabrication",
    Installation => "installation",
    Extras => "extras",
});

/// Billing unit of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Unit {
    /// Square metres.
    #[serde(rename = "sqm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sqm"))]
    SquareMetre,
    /// Linear metres.
    #[serde(rename = "lm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "lm"))]
    LinearMetre,
    #[serde(rename = "ea")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ea"))]
    Each,
}

string_enum!(Unit, "unit" {
    SquareMetre => "sqm",
    LinearMetre => "lm",
    Each => "ea",
});

/// One priced line of a quote.
///
/// `total_price` is always `quantity * unit_price`; build items through
/// [`QuoteItem::new`] so that holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteItem {
    /// `item-N`, increasing in emission order within one quote.
    pub id: String,
    pub description: String,
    pub category: ItemCategory,
    #[ts(type = "string")]
    pub quantity: Decimal,
    pub unit: Unit,
    pub unit_price: Money,
    pub total_price: Money,
    pub material_id: Option<String>,
}

impl QuoteItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: ItemCategory,
        quantity: Decimal,
        unit: Unit,
        unit_price: Money,
    ) -> Self {
        QuoteItem {
            id: id.into(),
            description: description.into(),
            category,
            quantity,
            unit,
            unit_price,
            total_price: unit_price.times(quantity),
            material_id: None,
        }
    }

    /// Attaches the catalogue material this line bills for.
    pub fn with_material(mut self, material_id: impl Into<String>) -> Self {
        self.material_id = Some(material_id.into());
        self
    }

    /// True when `total_price == quantity * unit_price` exactly.
    pub fn is_consistent(&self) -> bool {
        self.total_price == self.unit_price.times(self.quantity)
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Lifecycle of a quote.
///
/// ```text
///   Draft ──► Sent ──► Approved
///     │        │
///     │        ├─────► Rejected
///     │        │
///     └────────┴─────► Expired   (after valid_until passes)
/// ```
/// The engine only produces `Draft`; transitions are applied by the
/// persistence/app layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Expired,
}

string_enum!(QuoteStatus, "status" {
    Draft => "draft",
    Sent => "sent",
    Approved => "approved",
    Rejected => "rejected",
    Expired => "expired",
});

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Draft
    }
}

impl QuoteStatus {
    /// Approved, Rejected and Expired accept no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Approved | QuoteStatus::Rejected | QuoteStatus::Expired
        )
    }

    /// Whether the state machine allows `self → next`.
    pub const fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Draft, QuoteStatus::Expired)
                | (QuoteStatus::Sent, QuoteStatus::Approved)
                | (QuoteStatus::Sent, QuoteStatus::Rejected)
                | (QuoteStatus::Sent, QuoteStatus::Expired)
        )
    }

    /// Whether `self → next` is allowed at `now` for a quote valid until
    /// `valid_until`. Expiry is only possible once the window has passed,
    /// and nothing else is possible after that.
    pub fn can_transition_at(
        &self,
        next: QuoteStatus,
        valid_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        let lapsed = now > valid_until;
        self.can_transition_to(next) && (next == QuoteStatus::Expired) == lapsed
    }
}

/// A priced, itemised quote for one project.
///
/// Invariants: `subtotal == Σ items.total_price` and
/// `total == subtotal + gst`, both exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub id: String,
    pub project_id: String,
    pub quote_number: String,
    pub version: u32,
    pub status: QuoteStatus,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    pub items: Vec<QuoteItem>,
    pub subtotal: Money,
    pub gst: Money,
    pub total: Money,
    pub notes: Option<String>,
    pub terms: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// True when the quote is still open but its validity window has passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && now > self.valid_until
    }

    /// Subtotal per item category, in category order. Categories with no
    /// items are left out.
    pub fn category_totals(&self) -> Vec<(ItemCategory, Money)> {
        ItemCategory::ALL
            .iter()
            .filter_map(|category| {
                let mut lines = self
                    .items
                    .iter()
                    .filter(|item| item.category == *category)
                    .peekable();
                lines.peek()?;
                Some((*category, lines.map(|item| item.total_price).sum::<Money>()))
            })
            .collect()
    }

    /// Checks the item and total invariants.
    pub fn totals_consistent(&self) -> bool {
        let items_total: Money = self.items.iter().map(|item| item.total_price).sum();
        self.items.iter().all(QuoteItem::is_consistent)
            && self.subtotal == items_total
            && self.total == self.subtotal + self.gst
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
