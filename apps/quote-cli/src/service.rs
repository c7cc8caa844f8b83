//! # Quote Service
//!
//! Wires the pricing engine to the database.
//!
//! ## Generate Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     QuoteService::generate(project_id)                  │
//! │                                                                         │
//! │  1. Claim project_id in the in-flight set ── taken? ─► QUOTE_IN_PROGRESS│
//! │  2. Load project (surfaces + cutouts + materials)                      │
//! │  3. Load customer ─► CustomerClassification::from(customer_type)       │
//! │  4. Load active business profile (GST rate)                            │
//! │  5. QuoteEngine::generate ── error? ─► nothing is written              │
//! │  6. QuoteRepository::save (header + items, one transaction)            │
//! │  7. Release project_id (guard drop, also on error)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The in-flight set sits behind a `std::sync::Mutex`. The lock is only held
//! to insert or remove an id, never across an `.await`.
//!
//! The set is per `QuoteService`, so it only serialises generations that
//! share one service instance (one process). The `stoneworks` binary runs a
//! single command per process, so two CLI invocations are not kept apart by
//! it; each stores its own Draft.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use stoneworks_core::{
    Clock, DeliveryZone, IdGenerator, PricingConfig, Quote, QuoteEngine, QuoteStatus,
    SystemClock, UuidGenerator,
};
use stoneworks_db::Database;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Orchestrates quote generation and the quote lifecycle.
pub struct QuoteService<C = SystemClock, I = UuidGenerator> {
    db: Database,
    engine: QuoteEngine<C, I>,
    in_flight: Mutex<HashSet<String>>,
}

impl QuoteService {
    /// Service on the wall clock with random quote ids.
    pub fn new(db: Database, pricing: PricingConfig) -> Self {
        QuoteService::with_engine(db, QuoteEngine::with_system_defaults(pricing))
    }
}

impl<C: Clock, I: IdGenerator> QuoteService<C, I> {
    pub fn with_engine(db: Database, engine: QuoteEngine<C, I>) -> Self {
        QuoteService {
            db,
            engine,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Prices a project and stores the result as a new Draft quote.
    ///
    /// `zone` overrides the project's delivery zone for this quote only.
    ///
    /// ## Returns
    /// * `Err(AppError::QuoteInProgress)` - another generation for this
    ///   project has not finished
    /// * `Err(AppError::NotFound)` - project, customer or profile missing
    pub async fn generate(&self, project_id: &str, zone: Option<DeliveryZone>) -> AppResult<Quote> {
        let _guard = self.claim(project_id)?;

        let project = self
            .db
            .projects()
            .get_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project", project_id))?;

        let customer = self
            .db
            .customers()
            .get_by_id(&project.customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer", &project.customer_id))?;

        let profile = self.db.profiles().get_active().await?;

        let mut request = self
            .engine
            .request(&project, &profile, customer.classification());
        if let Some(zone) = zone {
            request.delivery_zone = zone;
        }

        let quote = self.engine.generate(&request)?;
        self.db.quotes().save(&quote).await?;

        info!(
            project_id = %project_id,
            quote_id = %quote.id,
            quote_number = %quote.quote_number,
            "Quote stored"
        );
        Ok(quote)
    }

    /// Gets a stored quote.
    pub async fn show(&self, quote_id: &str) -> AppResult<Quote> {
        self.db
            .quotes()
            .get_by_id(quote_id)
            .await?
            .ok_or_else(|| AppError::not_found("Quote", quote_id))
    }

    /// Lists the quotes of a project, oldest first.
    pub async fn list(&self, project_id: &str) -> AppResult<Vec<Quote>> {
        Ok(self.db.quotes().list_by_project(project_id).await?)
    }

    /// Moves a quote to `to` and returns the updated quote.
    pub async fn set_status(&self, quote_id: &str, to: QuoteStatus) -> AppResult<Quote> {
        let now = self.engine.clock().now();
        self.db.quotes().update_status(quote_id, to, now).await?;
        self.show(quote_id).await
    }

    /// Expires every open quote past its validity window.
    pub async fn expire(&self) -> AppResult<Vec<String>> {
        let now = self.engine.clock().now();
        Ok(self.db.quotes().expire_stale(now).await?)
    }

    /// Marks `project_id` as being generated until the guard drops.
    fn claim(&self, project_id: &str) -> AppResult<InFlightGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(project_id.to_string()) {
            return Err(AppError::QuoteInProgress {
                project_id: project_id.to_string(),
            });
        }
        debug!(project_id = %project_id, "Claimed project for generation");

        Ok(InFlightGuard {
            set: &self.in_flight,
            project_id: project_id.to_string(),
        })
    }
}

/// Releases a claimed project id on drop.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    project_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.project_id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use stoneworks_core::{FixedClock, ItemCategory, SequentialIds};
    use stoneworks_db::{sample, DbConfig};

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.profiles().upsert(&sample::business_profile()).await.unwrap();
        let materials = sample::materials();
        for material in &materials {
            db.materials().insert(material).await.unwrap();
        }
        for customer in sample::customers() {
            db.customers().insert(&customer).await.unwrap();
        }
        db.projects().save(&sample::project(&materials)).await.unwrap();
        db
    }

    fn service_at(db: Database, now: chrono::DateTime<Utc>) -> QuoteService<FixedClock, SequentialIds> {
        let engine = QuoteEngine::new(PricingConfig::default(), FixedClock(now), SequentialIds::new("quote"));
        QuoteService::with_engine(db, engine)
    }

    fn may_20() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_generate_prices_and_stores() {
        let service = service_at(seeded_db().await, may_20());

        let quote = service.generate("proj-001", None).await.unwrap();
        assert_eq!(quote.subtotal.amount(), dec!(1725.4));
        assert_eq!(quote.gst.amount(), dec!(172.54));
        assert_eq!(quote.total.amount(), dec!(1897.94));
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.quote_number, "Q20250520-QUOTE1");

        let stored = service.show(&quote.id).await.unwrap();
        assert_eq!(stored, quote);
    }

    #[tokio::test]
    async fn test_builder_gets_commercial_rates() {
        let db = seeded_db().await;
        let mut project = sample::project(&sample::materials());
        project.id = "proj-002".to_string();
        project.customer_id = "cust-002".to_string();
        project.surfaces[0].id = "surf-002".to_string();
        project.surfaces[0].cutouts[0].id = "cut-002".to_string();
        db.projects().save(&project).await.unwrap();

        let service = service_at(db, may_20());
        let quote = service.generate("proj-002", None).await.unwrap();

        let installation: Vec<_> = quote
            .items
            .iter()
            .filter(|i| i.category == ItemCategory::Installation)
            .collect();
        assert_eq!(installation[0].unit_price.amount(), dec!(95));
        let templating = quote.items.iter().find(|i| i.description == "Digital Templating").unwrap();
        assert_eq!(templating.total_price.amount(), dec!(250));
    }

    #[tokio::test]
    async fn test_zone_override() {
        let service = service_at(seeded_db().await, may_20());
        let quote = service
            .generate("proj-001", Some(DeliveryZone::Regional))
            .await
            .unwrap();

        let delivery = quote.items.last().unwrap();
        assert_eq!(delivery.description, "Delivery - Regional");
        assert_eq!(delivery.total_price.amount(), dec!(150));
    }

    #[tokio::test]
    async fn test_second_generation_for_same_project_is_rejected() {
        let service = service_at(seeded_db().await, may_20());

        let guard = service.claim("proj-001").unwrap();
        let err = service.generate("proj-001", None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::QuoteInProgress);
        assert!(service.list("proj-001").await.unwrap().is_empty());

        drop(guard);
        service.generate("proj-001", None).await.unwrap();
        assert_eq!(service.list("proj-001").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_claim_released_after_failure() {
        let service = service_at(seeded_db().await, may_20());

        let err = service.generate("proj-missing", None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(service.claim("proj-missing").is_ok());
    }

    #[tokio::test]
    async fn test_missing_rate_writes_nothing() {
        let db = seeded_db().await;
        let mut pricing = PricingConfig::default();
        pricing.rates.delivery.remove(&DeliveryZone::Metro);
        let engine = QuoteEngine::new(pricing, FixedClock(may_20()), SequentialIds::new("quote"));
        let service = QuoteService::with_engine(db, engine);

        let err = service.generate("proj-001", None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(service.list("proj-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_and_expiry() {
        let db = seeded_db().await;
        let quote = service_at(db.clone(), may_20())
            .generate("proj-001", None)
            .await
            .unwrap();

        let later = service_at(db.clone(), may_20() + Duration::days(1));
        let sent = later.set_status(&quote.id, QuoteStatus::Sent).await.unwrap();
        assert_eq!(sent.sent_at, Some(may_20() + Duration::days(1)));

        let err = later.set_status(&quote.id, QuoteStatus::Draft).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
        let err = later.set_status(&quote.id, QuoteStatus::Expired).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTransition);

        let much_later = service_at(db, may_20() + Duration::days(31));
        assert_eq!(much_later.expire().await.unwrap(), vec![quote.id.clone()]);
        assert_eq!(much_later.show(&quote.id).await.unwrap().status, QuoteStatus::Expired);
    }
}
