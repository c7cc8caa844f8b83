//! # Quote Totalizer
//!
//! Sums line items, applies GST, and stamps quote metadata.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ item.total_price                                          │
//! │  gst      = subtotal × gst_rate          (not rounded)                  │
//! │  total    = subtotal + gst                                              │
//! │                                                                         │
//! │  1725.40 × 0.10 = 172.54  →  total 1897.94                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time and identity come in through [`Clock`] and [`IdGenerator`], so a
//! quote is a pure function of its inputs once both are fixed.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::money::Money;
use crate::rates::PricingConfig;
use crate::types::{Quote, QuoteItem, QuoteStatus, TaxRate};

// =============================================================================
// Clock and Id Sources
// =============================================================================

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of unique quote ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Subtotal, tax and total for a set of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Money,
    pub gst: Money,
    pub total: Money,
}

/// Exact totals. Nothing is rounded.
pub fn compute_totals(items: &[QuoteItem], gst_rate: TaxRate) -> Totals {
    let subtotal: Money = items.iter().map(|item| item.total_price).sum();
    let gst = subtotal.calculate_tax(gst_rate);
    Totals {
        subtotal,
        gst,
        total: subtotal + gst,
    }
}

/// `Q{yyyymmdd}-{first six alphanumerics of the id, upper-cased}`.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use stoneworks_core::totalizer::quote_number;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
/// assert_eq!(quote_number(at, "3f2b9c1e-77aa"), "Q20240309-3F2B9C");
/// ```
pub fn quote_number(created_at: DateTime<Utc>, quote_id: &str) -> String {
    let suffix: String = quote_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(6)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("Q{}-{}", created_at.format("%Y%m%d"), suffix)
}

// =============================================================================
// Totalizer
// =============================================================================

/// Assembles a Draft quote from priced items.
pub fn totalize(
    project_id: &str,
    items: Vec<QuoteItem>,
    gst_rate: TaxRate,
    config: &PricingConfig,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Quote {
    let Totals {
        subtotal,
        gst,
        total,
    } = compute_totals(&items, gst_rate);

    let created_at = clock.now();
    let id = ids.next_id();

    Quote {
        quote_number: quote_number(created_at, &id),
        id,
        project_id: project_id.to_string(),
        version: config.quote_version,
        status: QuoteStatus::Draft,
        valid_until: created_at + Duration::days(i64::from(config.validity_days)),
        items,
        subtotal,
        gst,
        total,
        notes: None,
        terms: Some(config.terms.clone()),
        created_at,
        sent_at: None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemCategory, Unit};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn item(id: &str, total: rust_decimal::Decimal) -> QuoteItem {
        QuoteItem::new(id, id, ItemCategory::Extras, dec!(1), Unit::Each, Money::new(total))
    }

    #[test]
    fn test_compute_totals_exact() {
        let items = vec![
            item("item-1", dec!(869.4)),
            item("item-2", dec!(468)),
            item("item-3", dec!(153)),
            item("item-4", dec!(150)),
            item("item-5", dec!(85)),
        ];
        let totals = compute_totals(&items, TaxRate::from_bps(1000));
        assert_eq!(totals.subtotal.amount(), dec!(1725.4));
        assert_eq!(totals.gst.amount(), dec!(172.54));
        assert_eq!(totals.total.amount(), dec!(1897.94));
    }

    #[test]
    fn test_gst_not_rounded_before_total() {
        let items = vec![item("item-1", dec!(10.05))];
        let totals = compute_totals(&items, TaxRate::from_bps(1000));
        assert_eq!(totals.gst.amount(), dec!(1.005));
        assert_eq!(totals.total.amount(), dec!(11.055));
    }

    #[test]
    fn test_quote_number() {
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 0).unwrap();
        assert_eq!(quote_number(at, "quote-7"), "Q20250131-QUOTE7");
        assert_eq!(quote_number(at, "ab"), "Q20250131-AB");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("q");
        assert_eq!(ids.next_id(), "q-1");
        assert_eq!(ids.next_id(), "q-2");
    }

    #[test]
    fn test_uuid_generator_is_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_totalize_metadata() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let quote = totalize(
            "proj-001",
            vec![item("item-1", dec!(100))],
            TaxRate::from_bps(1000),
            &PricingConfig::default(),
            &FixedClock(at),
            &SequentialIds::new("quote"),
        );

        assert_eq!(quote.id, "quote-1");
        assert_eq!(quote.quote_number, "Q20250601-QUOTE1");
        assert_eq!(quote.project_id, "proj-001");
        assert_eq!(quote.version, 1);
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.created_at, at);
        assert_eq!(quote.valid_until, at + Duration::days(30));
        assert_eq!(quote.sent_at, None);
        assert!(quote.terms.as_deref().unwrap().starts_with("Payment terms"));
        assert!(quote.totals_consistent());
    }
}
