//! # Seed Data Loader
//!
//! Populates the database with the sample business profile, stone
//! catalogue, customers and kitchen project for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./stoneworks_dev.db (default)
//! cargo run -p stoneworks-db --bin seed
//!
//! # Specify database path
//! cargo run -p stoneworks-db --bin seed -- --db ./data/stoneworks.db
//! ```
//!
//! Then price the sample project:
//! ```bash
//! cargo run -p quote-cli -- generate --project proj-001
//! ```

use std::env;
use stoneworks_db::{sample, Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stoneworks_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stoneworks Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stoneworks_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stoneworks Seed Data Loader");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.materials().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} materials", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Loading sample data...");

    let profile = sample::business_profile();
    db.profiles().upsert(&profile).await?;
    println!("  Business profile: {}", profile.company_name);

    let materials = sample::materials();
    for material in &materials {
        db.materials().insert(material).await?;
        println!(
            "  Material: {} ({}, {}/m²)",
            material.name, material.category, material.sell_price
        );
    }

    for customer in sample::customers() {
        db.customers().insert(&customer).await?;
        println!("  Customer: {} ({})", customer.name, customer.customer_type);
    }

    let project = sample::project(&materials);
    db.projects().save(&project).await?;
    println!(
        "  Project: {} [{}] with {} surface(s)",
        project.name,
        project.id,
        project.surfaces.len()
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");
    println!("  Try: stoneworks generate --project {}", project.id);

    Ok(())
}
