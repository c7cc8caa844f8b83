//! # stoneworks-db: Database Layer for Stoneworks
//!
//! This crate provides database access for the Stoneworks quoting system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stoneworks Data Flow                             │
//! │                                                                         │
//! │  CLI command (generate / status / expire)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stoneworks-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ MaterialRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CustomerRepo  │    │ 001_initial  │  │   │
//! │  │   │ Connection    │◄───│ ProfileRepo   │    │  _schema.sql │  │   │
//! │  │   │ Management    │    │ ProjectRepo   │    │              │  │   │
//! │  │   │               │    │ QuoteRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./stoneworks.db (or STONEWORKS__DATABASE_PATH)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (material, project, quote, etc.)
//! - [`sample`] - Fixed sample data for seeding and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stoneworks_db::{Database, DbConfig};
//!
//! // Migrations run on connect
//! let db = Database::new(DbConfig::new("stoneworks.db")).await?;
//!
//! let project = db.projects().get_by_id("proj-001").await?;
//! let quotes = db.quotes().list_by_project("proj-001").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sample;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::material::MaterialRepository;
pub use repository::profile::BusinessProfileRepository;
pub use repository::project::ProjectRepository;
pub use repository::quote::QuoteRepository;
