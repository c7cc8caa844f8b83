//! # Quote Repository
//!
//! Database operations for quotes and quote items.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quote Lifecycle                                   │
//! │                                                                         │
//! │  1. SAVE                                                               │
//! │     └── save() → header upserted, items replaced, one transaction      │
//! │                                                                         │
//! │  2. SEND                                                               │
//! │     └── update_status(Sent) → sent_at stamped                          │
//! │                                                                         │
//! │  3. DECIDE                                                             │
//! │     └── update_status(Approved | Rejected)                             │
//! │                                                                         │
//! │  4. (SWEEP) EXPIRE                                                     │
//! │     └── expire_stale(now) → Draft/Sent past valid_until → Expired      │
//! │                                                                         │
//! │  Every status change is checked against QuoteStatus::can_transition_at │
//! │  (state machine plus validity window)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are snapshots: later price changes in the catalogue never touch a
//! saved quote.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{parse_decimal, parse_money};
use stoneworks_core::{CoreError, ItemCategory, Quote, QuoteItem, QuoteStatus, Unit};

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuoteRecord {
    id: String,
    project_id: String,
    quote_number: String,
    version: u32,
    status: QuoteStatus,
    valid_until: DateTime<Utc>,
    subtotal: String,
    gst: String,
    total: String,
    notes: Option<String>,
    terms: Option<String>,
    created_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    fn into_quote(self, items: Vec<QuoteItem>) -> DbResult<Quote> {
        Ok(Quote {
            subtotal: parse_money("quotes", "subtotal", &self.subtotal)?,
            gst: parse_money("quotes", "gst", &self.gst)?,
            total: parse_money("quotes", "total", &self.total)?,
            id: self.id,
            project_id: self.project_id,
            quote_number: self.quote_number,
            version: self.version,
            status: self.status,
            valid_until: self.valid_until,
            items,
            notes: self.notes,
            terms: self.terms,
            created_at: self.created_at,
            sent_at: self.sent_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteItemRecord {
    item_id: String,
    description: String,
    category: ItemCategory,
    quantity: String,
    unit: Unit,
    unit_price: String,
    total_price: String,
    material_id: Option<String>,
}

impl TryFrom<QuoteItemRecord> for QuoteItem {
    type Error = DbError;

    fn try_from(row: QuoteItemRecord) -> DbResult<Self> {
        Ok(QuoteItem {
            quantity: parse_decimal("quote_items", "quantity", &row.quantity)?,
            unit_price: parse_money("quote_items", "unit_price", &row.unit_price)?,
            total_price: parse_money("quote_items", "total_price", &row.total_price)?,
            id: row.item_id,
            description: row.description,
            category: row.category,
            unit: row.unit,
            material_id: row.material_id,
        })
    }
}

const QUOTE_COLUMNS: &str = r#"
    id, project_id, quote_number, version, status, valid_until,
    subtotal, gst, total, notes, terms, created_at, sent_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Writes a quote and its items atomically.
    ///
    /// An existing quote with the same id has its header overwritten and its
    /// items deleted and re-inserted in the quote's order.
    pub async fn save(&self, quote: &Quote) -> DbResult<()> {
        debug!(
            id = %quote.id,
            quote_number = %quote.quote_number,
            items = quote.items.len(),
            "Saving quote"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, project_id, quote_number, version, status, valid_until,
                subtotal, gst, total, notes, terms, created_at, sent_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT (id) DO UPDATE SET
                project_id = excluded.project_id,
                quote_number = excluded.quote_number,
                version = excluded.version,
                status = excluded.status,
                valid_until = excluded.valid_until,
                subtotal = excluded.subtotal,
                gst = excluded.gst,
                total = excluded.total,
                notes = excluded.notes,
                terms = excluded.terms,
                sent_at = excluded.sent_at
            "#,
        )
        .bind(&quote.id)
        .bind(&quote.project_id)
        .bind(&quote.quote_number)
        .bind(quote.version)
        .bind(quote.status)
        .bind(quote.valid_until)
        .bind(quote.subtotal.amount().to_string())
        .bind(quote.gst.amount().to_string())
        .bind(quote.total.amount().to_string())
        .bind(&quote.notes)
        .bind(&quote.terms)
        .bind(quote.created_at)
        .bind(quote.sent_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM quote_items WHERE quote_id = ?1")
            .bind(&quote.id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in quote.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO quote_items (
                    quote_id, item_id, position, description, category,
                    quantity, unit, unit_price, total_price, material_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&quote.id)
            .bind(&item.id)
            .bind(position as i64)
            .bind(&item.description)
            .bind(item.category)
            .bind(item.quantity.to_string())
            .bind(item.unit)
            .bind(item.unit_price.amount().to_string())
            .bind(item.total_price.amount().to_string())
            .bind(&item.material_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a quote with its items in line order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quote>> {
        let row = sqlx::query_as::<_, QuoteRecord>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(&row.id).await?;
                row.into_quote(items).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Lists every quote generated for a project, oldest first.
    pub async fn list_by_project(&self, project_id: &str) -> DbResult<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRecord>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE project_id = ?1 ORDER BY created_at, id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut quotes = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.get_items(&row.id).await?;
            quotes.push(row.into_quote(items)?);
        }
        Ok(quotes)
    }

    /// Gets the items of a quote in line order.
    pub async fn get_items(&self, quote_id: &str) -> DbResult<Vec<QuoteItem>> {
        let rows = sqlx::query_as::<_, QuoteItemRecord>(
            r#"
            SELECT item_id, description, category, quantity, unit,
                   unit_price, total_price, material_id
            FROM quote_items
            WHERE quote_id = ?1
            ORDER BY position
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(QuoteItem::try_from).collect()
    }

    /// Moves a quote to `to`, if the state machine allows it at `now`.
    ///
    /// A quote can only be set to `Expired` once `valid_until` has passed,
    /// and a lapsed quote can only be expired. Moving to `Sent` stamps
    /// `sent_at` with `now`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - quote doesn't exist
    /// * `Err(DbError::Core(InvalidQuoteTransition))` - transition not allowed
    pub async fn update_status(
        &self,
        id: &str,
        to: QuoteStatus,
        now: DateTime<Utc>,
    ) -> DbResult<QuoteStatus> {
        let (from, valid_until) = self.current_state(id).await?;
        if !from.can_transition_at(to, valid_until, now) {
            debug!(
                quote_id = %id,
                from = %from,
                to = %to,
                valid_until = %valid_until,
                "Status change rejected"
            );
            return Err(invalid_transition(id, from, to));
        }

        let sent_at = (to == QuoteStatus::Sent).then_some(now);

        // Conditional on the status we checked, so a concurrent change loses
        let result = sqlx::query(
            r#"
            UPDATE quotes SET
                status = ?3,
                sent_at = COALESCE(?4, sent_at)
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(sent_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let (current, _) = self.current_state(id).await?;
            return Err(invalid_transition(id, current, to));
        }

        info!(quote_id = %id, from = %from, to = %to, "Quote status changed");
        Ok(from)
    }

    /// Expires every Draft or Sent quote whose validity window has passed.
    ///
    /// ## Returns
    /// Ids of the quotes that were expired.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> DbResult<Vec<String>> {
        let candidates: Vec<(String, QuoteStatus, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, status, valid_until FROM quotes WHERE status IN ('draft', 'sent')",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut expired = Vec::new();
        for (id, status, valid_until) in candidates {
            if !status.can_transition_at(QuoteStatus::Expired, valid_until, now) {
                continue;
            }

            let result = sqlx::query(
                "UPDATE quotes SET status = 'expired' WHERE id = ?1 AND status = ?2",
            )
            .bind(&id)
            .bind(status)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                debug!(quote_id = %id, "Quote expired");
                expired.push(id);
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired stale quotes");
        }
        Ok(expired)
    }

    /// Deletes a quote and its items.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quote");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM quote_items WHERE quote_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM quotes WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quote", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    async fn current_state(&self, id: &str) -> DbResult<(QuoteStatus, DateTime<Utc>)> {
        sqlx::query_as::<_, (QuoteStatus, DateTime<Utc>)>(
            "SELECT status, valid_until FROM quotes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Quote", id))
    }
}

fn invalid_transition(id: &str, from: QuoteStatus, to: QuoteStatus) -> DbError {
    DbError::Core(CoreError::InvalidQuoteTransition {
        quote_id: id.to_string(),
        from,
        to,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::sample;
    use crate::{Database, DbConfig, DbError};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use stoneworks_core::{
        CoreError, CustomerClassification, FixedClock, PricingConfig, Quote, QuoteEngine,
        QuoteStatus, SequentialIds,
    };

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for material in sample::materials() {
            db.materials().insert(&material).await.unwrap();
        }
        for customer in sample::customers() {
            db.customers().insert(&customer).await.unwrap();
        }
        db.projects()
            .save(&sample::project(&sample::materials()))
            .await
            .unwrap();
        db
    }

    fn quote(prefix: &str) -> Quote {
        let project = sample::project(&sample::materials());
        let profile = sample::business_profile();
        let engine = QuoteEngine::new(
            PricingConfig::default(),
            FixedClock(Utc.with_ymd_and_hms(2025, 5, 20, 8, 0, 0).unwrap()),
            SequentialIds::new(prefix),
        );
        let request = engine.request(&project, &profile, CustomerClassification::Residential);
        engine.generate(&request).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let db = seeded().await;
        let quote = quote("qa");
        db.quotes().save(&quote).await.unwrap();

        let loaded = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded, quote);
        assert!(loaded.totals_consistent());
        assert_eq!(loaded.items[0].quantity, dec!(2.07));
        assert_eq!(loaded.items.last().unwrap().description, "Delivery - Metro");
    }

    #[tokio::test]
    async fn test_resave_replaces_items() {
        let db = seeded().await;
        let mut quote = quote("qb");
        db.quotes().save(&quote).await.unwrap();

        quote.items.truncate(2);
        quote.notes = Some("Revised".to_string());
        db.quotes().save(&quote).await.unwrap();

        let loaded = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.notes.as_deref(), Some("Revised"));
    }

    #[tokio::test]
    async fn test_list_by_project() {
        let db = seeded().await;
        db.quotes().save(&quote("qc")).await.unwrap();
        db.quotes().save(&quote("qd")).await.unwrap();

        let quotes = db.quotes().list_by_project("proj-001").await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.items.len() == 6));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = seeded().await;
        let quote = quote("qe");
        db.quotes().save(&quote).await.unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 21, 9, 0, 0).unwrap();

        let from = db.quotes().update_status(&quote.id, QuoteStatus::Sent, now).await.unwrap();
        assert_eq!(from, QuoteStatus::Draft);
        let sent = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(sent.status, QuoteStatus::Sent);
        assert_eq!(sent.sent_at, Some(now));

        db.quotes()
            .update_status(&quote.id, QuoteStatus::Approved, now)
            .await
            .unwrap();

        let err = db
            .quotes()
            .update_status(&quote.id, QuoteStatus::Draft, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidQuoteTransition {
                from: QuoteStatus::Approved,
                to: QuoteStatus::Draft,
                ..
            })
        ));

        let approved = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(approved.sent_at, Some(now));

        assert!(matches!(
            db.quotes().update_status("missing", QuoteStatus::Sent, now).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_draft_cannot_be_approved_directly() {
        let db = seeded().await;
        let quote = quote("qf");
        db.quotes().save(&quote).await.unwrap();

        let err = db
            .quotes()
            .update_status(&quote.id, QuoteStatus::Approved, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_open_quote_cannot_be_expired_early() {
        let db = seeded().await;
        let quote = quote("qj");
        db.quotes().save(&quote).await.unwrap();

        let next_day = quote.created_at + Duration::days(1);
        let err = db
            .quotes()
            .update_status(&quote.id, QuoteStatus::Expired, next_day)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidQuoteTransition {
                from: QuoteStatus::Draft,
                to: QuoteStatus::Expired,
                ..
            })
        ));

        let lapsed = quote.valid_until + Duration::seconds(1);
        db.quotes()
            .update_status(&quote.id, QuoteStatus::Expired, lapsed)
            .await
            .unwrap();
        let stored = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Expired);
    }

    #[tokio::test]
    async fn test_lapsed_quote_cannot_be_approved() {
        let db = seeded().await;
        let quote = quote("qk");
        db.quotes().save(&quote).await.unwrap();
        db.quotes()
            .update_status(&quote.id, QuoteStatus::Sent, quote.created_at + Duration::days(1))
            .await
            .unwrap();

        let err = db
            .quotes()
            .update_status(&quote.id, QuoteStatus::Approved, quote.created_at + Duration::days(90))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidQuoteTransition {
                from: QuoteStatus::Sent,
                to: QuoteStatus::Approved,
                ..
            })
        ));
        let stored = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Sent);
    }

    #[tokio::test]
    async fn test_expire_stale() {
        let db = seeded().await;
        let open = quote("qg");
        let decided = quote("qh");
        db.quotes().save(&open).await.unwrap();
        db.quotes().save(&decided).await.unwrap();

        let sent_at = open.created_at + Duration::days(1);
        db.quotes().update_status(&decided.id, QuoteStatus::Sent, sent_at).await.unwrap();
        db.quotes()
            .update_status(&decided.id, QuoteStatus::Rejected, sent_at)
            .await
            .unwrap();

        // Still inside the 30-day window
        let early = open.created_at + Duration::days(29);
        assert!(db.quotes().expire_stale(early).await.unwrap().is_empty());

        let late = open.valid_until + Duration::seconds(1);
        assert_eq!(db.quotes().expire_stale(late).await.unwrap(), vec![open.id.clone()]);

        let expired = db.quotes().get_by_id(&open.id).await.unwrap().unwrap();
        assert_eq!(expired.status, QuoteStatus::Expired);
        let rejected = db.quotes().get_by_id(&decided.id).await.unwrap().unwrap();
        assert_eq!(rejected.status, QuoteStatus::Rejected);

        assert!(db.quotes().expire_stale(late).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = seeded().await;
        let quote = quote("qi");
        db.quotes().save(&quote).await.unwrap();

        db.quotes().delete(&quote.id).await.unwrap();
        assert!(db.quotes().get_by_id(&quote.id).await.unwrap().is_none());
        assert!(db.quotes().get_items(&quote.id).await.unwrap().is_empty());
        assert!(matches!(
            db.quotes().delete(&quote.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
