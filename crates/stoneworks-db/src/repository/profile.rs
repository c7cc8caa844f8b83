//! # Business Profile Repository
//!
//! Tenant-level settings: company details, GST rate, markup and labour rate.
//! Only the GST rate feeds into pricing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{parse_decimal, parse_money};
use stoneworks_core::{BusinessProfile, TaxRate};

#[derive(Debug, sqlx::FromRow)]
struct ProfileRecord {
    id: String,
    company_name: String,
    abn: String,
    contact_person: String,
    email: String,
    phone: String,
    address: String,
    markup: String,
    gst_rate: String,
    labor_rate: String,
}

impl TryFrom<ProfileRecord> for BusinessProfile {
    type Error = DbError;

    fn try_from(row: ProfileRecord) -> DbResult<Self> {
        Ok(BusinessProfile {
            markup: parse_decimal("business_profiles", "markup", &row.markup)?,
            gst_rate: TaxRate::from_fraction(parse_decimal(
                "business_profiles",
                "gst_rate",
                &row.gst_rate,
            )?),
            labor_rate: parse_money("business_profiles", "labor_rate", &row.labor_rate)?,
            id: row.id,
            company_name: row.company_name,
            abn: row.abn,
            contact_person: row.contact_person,
            email: row.email,
            phone: row.phone,
            address: row.address,
        })
    }
}

/// Repository for the business profile.
#[derive(Debug, Clone)]
pub struct BusinessProfileRepository {
    pool: SqlitePool,
}

impl BusinessProfileRepository {
    /// Creates a new BusinessProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BusinessProfileRepository { pool }
    }

    /// Gets a profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<BusinessProfile>> {
        let row = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, company_name, abn, contact_person, email, phone, address,
                   markup, gst_rate, labor_rate
            FROM business_profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BusinessProfile::try_from).transpose()
    }

    /// Returns the active profile: the most recently updated one.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no profile has been set up yet
    pub async fn get_active(&self) -> DbResult<BusinessProfile> {
        let row = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, company_name, abn, contact_person, email, phone, address,
                   markup, gst_rate, labor_rate
            FROM business_profiles
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(BusinessProfile::try_from)
            .transpose()?
            .ok_or_else(|| DbError::not_found("BusinessProfile", "active"))
    }

    /// Inserts the profile, or replaces every field of an existing one.
    pub async fn upsert(&self, profile: &BusinessProfile) -> DbResult<()> {
        debug!(id = %profile.id, "Upserting business profile");

        sqlx::query(
            r#"
            INSERT INTO business_profiles (
                id, company_name, abn, contact_person, email, phone, address,
                markup, gst_rate, labor_rate, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT (id) DO UPDATE SET
                company_name = excluded.company_name,
                abn = excluded.abn,
                contact_person = excluded.contact_person,
                email = excluded.email,
                phone = excluded.phone,
                address = excluded.address,
                markup = excluded.markup,
                gst_rate = excluded.gst_rate,
                labor_rate = excluded.labor_rate,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.company_name)
        .bind(&profile.abn)
        .bind(&profile.contact_person)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(profile.markup.to_string())
        .bind(profile.gst_rate.fraction().to_string())
        .bind(profile.labor_rate.amount().to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sample;
    use crate::{Database, DbConfig, DbError};
    use rust_decimal_macros::dec;
    use stoneworks_core::TaxRate;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        assert!(matches!(
            repo.get_active().await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        let mut profile = sample::business_profile();
        repo.upsert(&profile).await.unwrap();
        assert_eq!(repo.get_active().await.unwrap(), profile);

        profile.gst_rate = TaxRate::from_fraction(dec!(0.15));
        profile.company_name = "Premium Stone Works Pty Ltd".to_string();
        repo.upsert(&profile).await.unwrap();

        let loaded = repo.get_by_id(&profile.id).await.unwrap().unwrap();
        assert_eq!(loaded.gst_rate.fraction(), dec!(0.15));
        assert_eq!(loaded.company_name, "Premium Stone Works Pty Ltd");
    }
}
