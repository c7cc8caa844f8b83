//! # Material Repository
//!
//! Database operations for the stone catalogue.
//!
//! Prices are per square metre and stored as TEXT decimals. Discontinued
//! stone stays in the table so old projects can still be hydrated, but it is
//! left out of [`MaterialRepository::list_available`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::parse_money;
use stoneworks_core::{Availability, Finish, MaterialCategory, StoneMaterial};

/// Row shape of the `materials` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MaterialRecord {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub supplier: String,
    pub supplier_code: String,
    pub finish: Finish,
    pub cost_price: String,
    pub sell_price: String,
    pub availability: Availability,
    pub lead_time_days: u32,
    pub warranty_years: u32,
}

impl TryFrom<MaterialRecord> for StoneMaterial {
    type Error = DbError;

    fn try_from(row: MaterialRecord) -> DbResult<Self> {
        Ok(StoneMaterial {
            cost_price: parse_money("materials", "cost_price", &row.cost_price)?,
            sell_price: parse_money("materials", "sell_price", &row.sell_price)?,
            id: row.id,
            name: row.name,
            category: row.category,
            supplier: row.supplier,
            supplier_code: row.supplier_code,
            finish: row.finish,
            availability: row.availability,
            lead_time_days: row.lead_time_days,
            warranty_years: row.warranty_years,
        })
    }
}

pub(crate) const MATERIAL_COLUMNS: &str = r#"
    id, name, category, supplier, supplier_code, finish,
    cost_price, sell_price, availability, lead_time_days, warranty_years
"#;

/// Repository for stone catalogue operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.materials();
/// let quartz = repo.get_by_id("caesarstone-calacatta-nuvo").await?;
/// let catalogue = repo.list_available().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    pool: SqlitePool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaterialRepository { pool }
    }

    /// Gets a material by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StoneMaterial>> {
        let row = sqlx::query_as::<_, MaterialRecord>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoneMaterial::try_from).transpose()
    }

    /// Lists in-stock and order-in materials, by category then name.
    pub async fn list_available(&self) -> DbResult<Vec<StoneMaterial>> {
        let rows = sqlx::query_as::<_, MaterialRecord>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials
             WHERE availability != 'discontinued'
             ORDER BY category, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StoneMaterial::try_from).collect()
    }

    /// Inserts a new material.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert(&self, material: &StoneMaterial) -> DbResult<()> {
        debug!(id = %material.id, "Inserting material");

        sqlx::query(
            r#"
            INSERT INTO materials (
                id, name, category, supplier, supplier_code, finish,
                cost_price, sell_price, availability, lead_time_days, warranty_years
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&material.id)
        .bind(&material.name)
        .bind(material.category)
        .bind(&material.supplier)
        .bind(&material.supplier_code)
        .bind(material.finish)
        .bind(material.cost_price.amount().to_string())
        .bind(material.sell_price.amount().to_string())
        .bind(material.availability)
        .bind(material.lead_time_days)
        .bind(material.warranty_years)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing material.
    ///
    /// Quotes already generated keep the price they were generated with.
    pub async fn update(&self, material: &StoneMaterial) -> DbResult<()> {
        debug!(id = %material.id, "Updating material");

        let result = sqlx::query(
            r#"
            UPDATE materials SET
                name = ?2,
                category = ?3,
                supplier = ?4,
                supplier_code = ?5,
                finish = ?6,
                cost_price = ?7,
                sell_price = ?8,
                availability = ?9,
                lead_time_days = ?10,
                warranty_years = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&material.id)
        .bind(&material.name)
        .bind(material.category)
        .bind(&material.supplier)
        .bind(&material.supplier_code)
        .bind(material.finish)
        .bind(material.cost_price.amount().to_string())
        .bind(material.sell_price.amount().to_string())
        .bind(material.availability)
        .bind(material.lead_time_days)
        .bind(material.warranty_years)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Material", &material.id));
        }

        Ok(())
    }

    /// Counts catalogue entries, discontinued included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
