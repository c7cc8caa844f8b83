//! # Customer Repository
//!
//! Database operations for customers. The stored `customer_type` is what the
//! CLI turns into a pricing classification.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stoneworks_core::validation::validate_name;
use stoneworks_core::{CoreError, Customer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

const CUSTOMER_COLUMNS: &str = r#"
    id, name, email, phone, address, city, postcode,
    customer_type, notes, created_at
"#;

/// Row shape of the `customers` table. Every column maps one-to-one.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRecord {
    id: String,
    name: String,
    email: String,
    phone: String,
    address: String,
    city: String,
    postcode: String,
    customer_type: stoneworks_core::CustomerType,
    notes: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CustomerRecord> for Customer {
    fn from(row: CustomerRecord) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            city: row.city,
            postcode: row.postcode,
            customer_type: row.customer_type,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRecord>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Lists all customers by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRecord>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Inserts a new customer. The name must be non-blank.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Inserting customer");
        validate_name("name", &customer.name).map_err(CoreError::from)?;

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, email, phone, address, city, postcode,
                customer_type, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.postcode)
        .bind(customer.customer_type)
        .bind(&customer.notes)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sample;
    use crate::{Database, DbConfig, DbError};
    use stoneworks_core::{CoreError, CustomerClassification, CustomerType};

    #[tokio::test]
    async fn test_insert_get_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();
        for customer in sample::customers() {
            repo.insert(&customer).await.unwrap();
        }

        let builder = repo.get_by_id("cust-002").await.unwrap().unwrap();
        assert_eq!(builder.name, "ABC Constructions");
        assert_eq!(builder.customer_type, CustomerType::Builder);
        assert_eq!(builder.classification(), CustomerClassification::Commercial);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ABC Constructions", "Sarah Johnson"]);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut customer = sample::customers().remove(0);
        customer.name = "   ".to_string();

        let err = db.customers().insert(&customer).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert!(db.customers().list().await.unwrap().is_empty());
    }
}
