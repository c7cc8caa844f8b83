//! # Quote Engine
//!
//! Facade over validation, the project aggregator and the totalizer.
//!
//! ## Generation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteRequest { project, profile, customer_class, delivery_zone }       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_profile + validate_project   ── ValidationError ──► abort    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aggregate_project (surfaces → templating → delivery)                   │
//! │       │                                 ── Configuration ──► abort     │
//! │       ▼                                                                 │
//! │  totalize (subtotal, gst, total, number, validity)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Quote { status: Draft, version: 1, ... }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds no mutable state and performs no I/O. It never reads a
//! prior quote; every call yields a fresh Draft.

use tracing::info;

use crate::aggregator::aggregate_project;
use crate::error::CoreResult;
use crate::rates::PricingConfig;
use crate::totalizer::{totalize, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::types::{BusinessProfile, CustomerClassification, DeliveryZone, Project, Quote};
use crate::validation::{validate_profile, validate_project};

/// Everything needed to price one project.
#[derive(Debug, Clone, Copy)]
pub struct QuoteRequest<'a> {
    pub project: &'a Project,
    pub profile: &'a BusinessProfile,
    pub customer_class: CustomerClassification,
    pub delivery_zone: DeliveryZone,
}

impl<'a> QuoteRequest<'a> {
    /// Builds a request using the project's delivery zone, or `default_zone`
    /// when the project has none.
    pub fn new(
        project: &'a Project,
        profile: &'a BusinessProfile,
        customer_class: CustomerClassification,
        default_zone: DeliveryZone,
    ) -> Self {
        QuoteRequest {
            project,
            profile,
            customer_class,
            delivery_zone: project.delivery_zone.unwrap_or(default_zone),
        }
    }
}

/// Prices projects into Draft quotes.
pub struct QuoteEngine<C = SystemClock, I = UuidGenerator> {
    config: PricingConfig,
    clock: C,
    ids: I,
}

impl QuoteEngine {
    /// Engine on the wall clock with random quote ids.
    pub fn with_system_defaults(config: PricingConfig) -> Self {
        QuoteEngine::new(config, SystemClock, UuidGenerator)
    }
}

impl<C: Clock, I: IdGenerator> QuoteEngine<C, I> {
    pub fn new(config: PricingConfig, clock: C, ids: I) -> Self {
        QuoteEngine { config, clock, ids }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// The clock quotes are stamped with. Callers applying status changes
    /// use it too, so expiry and sending share one notion of "now".
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Builds a request for `project`, falling back to the configured
    /// default delivery zone.
    pub fn request<'a>(
        &self,
        project: &'a Project,
        profile: &'a BusinessProfile,
        customer_class: CustomerClassification,
    ) -> QuoteRequest<'a> {
        QuoteRequest::new(
            project,
            profile,
            customer_class,
            self.config.default_delivery_zone,
        )
    }

    /// Generates a Draft quote.
    ///
    /// ## Errors
    /// - [`CoreError::Validation`](crate::CoreError::Validation) for bad
    ///   dimensions, a negative sell price or an out-of-range GST rate
    /// - [`CoreError::Configuration`](crate::CoreError::Configuration) when
    ///   the rate table lacks an entry the project needs
    ///
    /// No partial quote is ever returned.
    pub fn generate(&self, request: &QuoteRequest<'_>) -> CoreResult<Quote> {
        validate_profile(request.profile)?;
        validate_project(request.project)?;

        let items = aggregate_project(
            request.project,
            request.customer_class,
            request.delivery_zone,
            &self.config,
        )?;

        let quote = totalize(
            &request.project.id,
            items,
            request.profile.gst_rate,
            &self.config,
            &self.clock,
            &self.ids,
        );

        info!(
            quote_id = %quote.id,
            quote_number = %quote.quote_number,
            project_id = %quote.project_id,
            items = quote.items.len(),
            subtotal = %quote.subtotal,
            total = %quote.total,
            "Generated quote"
        );

        Ok(quote)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
