//! # Validation Module
//!
//! Input checks that run before any pricing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization                                              │
//! │  ├── Closed enums reject unknown names                                 │
//! │  └── Decimal fields reject non-numeric text                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Billable surfaces need width and height in (0, 100 m]             │
//! │  ├── Material sell price in 0..=1,000,000 per m²                       │
//! │  └── GST rate must be a fraction in 0..=1                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Disabled surfaces and surfaces without a material are never validated:
//! they produce no line items, so a half-entered surface cannot block a
//! quote.
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use stoneworks_core::validation::validate_dimension;
//!
//! assert!(validate_dimension("width_mm", Decimal::new(3000, 0)).is_ok());
//! assert!(validate_dimension("width_mm", Decimal::new(-1, 0)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{BusinessProfile, Project, Surface, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name for projects, surfaces and customers.
pub const MAX_NAME_LEN: usize = 200;

/// Largest accepted surface side, in millimetres (100 m).
pub const MAX_DIMENSION_MM: i64 = 100_000;

/// Largest accepted material sell price, per square metre.
pub const MAX_SELL_PRICE: i64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a surface dimension in millimetres.
///
/// ## Rules
/// - Strictly positive
/// - At most [`MAX_DIMENSION_MM`], which keeps area and perimeter
///   arithmetic far from decimal overflow
pub fn validate_dimension(field: &str, value_mm: Decimal) -> ValidationResult<()> {
    if value_mm <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
            value: value_mm.to_string(),
        });
    }

    if value_mm > Decimal::from(MAX_DIMENSION_MM) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: MAX_DIMENSION_MM.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate fraction.
///
/// ## Rules
/// - Between 0 and 1 inclusive (0% to 100%)
///
/// ## Example
/// ```rust
/// use stoneworks_core::types::TaxRate;
/// use stoneworks_core::validation::validate_tax_rate;
///
/// assert!(validate_tax_rate(TaxRate::from_bps(1000)).is_ok());
/// assert!(validate_tax_rate(TaxRate::from_bps(10001)).is_err());
/// ```
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    let fraction = rate.fraction();
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: "0".to_string(),
            max: "1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates one surface at position `index` in its project.
///
/// Non-billable surfaces pass unconditionally.
pub fn validate_surface(index: usize, surface: &Surface) -> ValidationResult<()> {
    if !surface.is_billable() {
        return Ok(());
    }
    let Some(material) = surface.selected_material.as_ref() else {
        return Ok(());
    };

    validate_name(&format!("surfaces[{index}].name"), &surface.name)?;

    validate_dimension(&format!("surfaces[{index}].width_mm"), surface.width_mm)?;
    validate_dimension(&format!("surfaces[{index}].height_mm"), surface.height_mm)?;

    if material.sell_price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: format!("surfaces[{index}].selected_material.sell_price"),
            value: material.sell_price.amount().to_string(),
        });
    }

    if material.sell_price.amount() > Decimal::from(MAX_SELL_PRICE) {
        return Err(ValidationError::OutOfRange {
            field: format!("surfaces[{index}].selected_material.sell_price"),
            min: "0".to_string(),
            max: MAX_SELL_PRICE.to_string(),
        });
    }

    Ok(())
}

/// Validates the project name and every billable surface, in order. The
/// first failure is returned.
pub fn validate_project(project: &Project) -> ValidationResult<()> {
    validate_name("name", &project.name)?;
    project
        .surfaces
        .iter()
        .enumerate()
        .try_for_each(|(index, surface)| validate_surface(index, surface))
}

/// Validates the parts of the business profile the engine reads.
pub fn validate_profile(profile: &BusinessProfile) -> ValidationResult<()> {
    validate_tax_rate(profile.gst_rate)
}

// =============================================================================
// Unit Tests
// =============================================================================
