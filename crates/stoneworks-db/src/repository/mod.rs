//! # Repository Module
//!
//! Database repository implementations for Stoneworks.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.projects().get_by_id("proj-001")                           │
//! │       ▼                                                                 │
//! │  ProjectRepository                                                     │
//! │  ├── *Record rows (sqlx::FromRow, TEXT decimals)                       │
//! │  └── TryFrom<Record> for the stoneworks-core type                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimals are written with `Decimal::to_string` and parsed back with
//! [`parse_decimal`]; a value that fails to parse surfaces as
//! [`DbError::CorruptRecord`] instead of being coerced to zero.
//!
//! ## Available Repositories
//!
//! - [`MaterialRepository`](material::MaterialRepository) - Stone catalogue
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`BusinessProfileRepository`](profile::BusinessProfileRepository) - Tenant settings
//! - [`ProjectRepository`](project::ProjectRepository) - Projects with surfaces and cutouts
//! - [`QuoteRepository`](quote::QuoteRepository) - Quotes with items, status changes

pub mod customer;
pub mod material;
pub mod profile;
pub mod project;
pub mod quote;

use rust_decimal::Decimal;
use std::str::FromStr;
use stoneworks_core::Money;

use crate::error::{DbError, DbResult};

/// Parses a TEXT decimal column.
pub(crate) fn parse_decimal(table: &'static str, column: &'static str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| DbError::corrupt(table, column, format!("'{raw}': {e}")))
}

/// Parses a TEXT money column.
pub(crate) fn parse_money(table: &'static str, column: &'static str, raw: &str) -> DbResult<Money> {
    parse_decimal(table, column, raw).map(Money::new)
}
