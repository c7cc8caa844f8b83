//! # stoneworks-core: Pricing Engine for Stone Fabrication Quotes
//!
//! This crate turns a project (a set of stone surfaces with materials, edge
//! profiles and cutouts) into an itemised, GST-inclusive quote. It contains
//! the pricing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stoneworks Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stoneworks CLI (apps/quote-cli)                 │   │
//! │  │    config ──► load project ──► generate ──► save ──► print     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stoneworks-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   rates   │  │  surface  │  │ aggregator│  │ totalizer │  │   │
//! │  │   │ RateTable │─►│ per-surf. │─►│ + extras  │─►│ GST, meta │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                        engine (QuoteEngine facade)              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                stoneworks-db (Database Layer)                   │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Project, Surface, StoneMaterial, Quote, ...)
//! - [`money`] - Exact decimal Money type
//! - [`rates`] - Rate table and pricing policy
//! - [`surface`] - Per-surface line items
//! - [`aggregator`] - Project-wide line items
//! - [`totalizer`] - Totals, GST and quote metadata
//! - [`engine`] - The `QuoteEngine` facade
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same project, same clock, same ids = same quote
//! 2. **No I/O**: database, network and file system access is FORBIDDEN here
//! 3. **Decimal Money**: amounts are exact base-10 decimals, never floats
//! 4. **Explicit Errors**: a missing rate is an error, never a $0 line
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use stoneworks_core::engine::QuoteEngine;
//! use stoneworks_core::rates::PricingConfig;
//! use stoneworks_core::totalizer::{FixedClock, SequentialIds};
//! use stoneworks_core::types::*;
//! use stoneworks_core::Money;
//!
//! let now = Utc.with_ymd_and_hms(2025, 5, 20, 8, 0, 0).unwrap();
//! let engine = QuoteEngine::new(PricingConfig::default(), FixedClock(now), SequentialIds::new("q"));
//!
//! let profile = BusinessProfile {
//!     id: "bp-001".into(),
//!     company_name: "Premium Stone Works".into(),
//!     abn: "12 345 678 901".into(),
//!     contact_person: "John Smith".into(),
//!     email: "john@premiumstoneworks.com.au".into(),
//!     phone: "(02) 9876 5432".into(),
//!     address: "123 Industrial Drive, Sydney NSW 2000".into(),
//!     markup: "0.65".parse().unwrap(),
//!     gst_rate: TaxRate::from_bps(1000),
//!     labor_rate: Money::from_dollars(85),
//! };
//! let project = Project {
//!     id: "proj-001".into(),
//!     customer_id: "cust-001".into(),
//!     name: "Kitchen Renovation".into(),
//!     project_type: ProjectType::Kitchen,
//!     status: ProjectStatus::Quote,
//!     address: None,
//!     notes: None,
//!     delivery_zone: None,
//!     surfaces: vec![],
//!     created_at: now,
//! };
//!
//! let request = engine.request(&project, &profile, CustomerClassification::Residential);
//! let quote = engine.generate(&request).unwrap();
//!
//! // Templating + metro delivery, plus 10% GST
//! assert_eq!(quote.items.len(), 2);
//! assert_eq!(quote.total.to_string(), "$258.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod money;
pub mod rates;
pub mod surface;
pub mod totalizer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stoneworks_core::Money` instead of
// `use stoneworks_core::money::Money`

pub use engine::{QuoteEngine, QuoteRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rates::{PricingConfig, RateTable};
pub use totalizer::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency of every amount in this crate. Multi-currency is not supported.
pub const CURRENCY_CODE: &str = "AUD";
