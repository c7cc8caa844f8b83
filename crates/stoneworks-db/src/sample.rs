//! # Sample Data
//!
//! A small, fixed data set: one business profile, five stones, two customers
//! and a kitchen project. Used by the `seed` binary and by repository tests.
//!
//! Every timestamp is fixed so a value read back from the database compares
//! equal to the one written.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use stoneworks_core::{
    Availability, BusinessProfile, Complexity, Customer, CustomerType, Cutout, CutoutType,
    EdgeProfile, Finish, MaterialCategory, Money, Project, ProjectStatus, ProjectType,
    StoneMaterial, Surface, SurfaceType, TaxRate,
};

/// Creation time stamped on sample customers and projects.
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The fabricator's profile. GST at 10%.
pub fn business_profile() -> BusinessProfile {
    BusinessProfile {
        id: "bp-001".to_string(),
        company_name: "Premium Stone Works".to_string(),
        abn: "12 345 678 901".to_string(),
        contact_person: "John Smith".to_string(),
        email: "john@premiumstoneworks.com.au".to_string(),
        phone: "(02) 9876 5432".to_string(),
        address: "123 Industrial Drive, Sydney NSW 2000".to_string(),
        markup: Decimal::new(65, 2),
        gst_rate: TaxRate::from_bps(1000),
        labor_rate: Money::from_dollars(85),
    }
}

#[allow(clippy::too_many_arguments)]
fn stone(
    id: &str,
    name: &str,
    category: MaterialCategory,
    supplier: &str,
    supplier_code: &str,
    finish: Finish,
    cost: i64,
    sell: i64,
    availability: Availability,
    lead_time_days: u32,
    warranty_years: u32,
) -> StoneMaterial {
    StoneMaterial {
        id: id.to_string(),
        name: name.to_string(),
        category,
        supplier: supplier.to_string(),
        supplier_code: supplier_code.to_string(),
        finish,
        cost_price: Money::from_dollars(cost),
        sell_price: Money::from_dollars(sell),
        availability,
        lead_time_days,
        warranty_years,
    }
}

/// The stone catalogue. Prices are per square metre.
pub fn materials() -> Vec<StoneMaterial> {
    vec![
        stone(
            "caesarstone-calacatta-nuvo",
            "Caesarstone Calacatta Nuvo",
            MaterialCategory::Quartz,
            "Caesarstone Australia",
            "5131",
            Finish::Polished,
            280,
            420,
            Availability::InStock,
            3,
            15,
        ),
        stone(
            "quantum-quartz-statuario",
            "Quantum Quartz Statuario",
            MaterialCategory::Quartz,
            "Quantum Quartz",
            "QT-STA",
            Finish::Polished,
            320,
            480,
            Availability::InStock,
            5,
            15,
        ),
        stone(
            "carrara-marble-italian",
            "Italian Carrara Marble",
            MaterialCategory::Marble,
            "Stone Gallery",
            "CAR-IT-01",
            Finish::Polished,
            150,
            280,
            Availability::OrderIn,
            14,
            1,
        ),
        stone(
            "granite-black-galaxy",
            "Black Galaxy Granite",
            MaterialCategory::Granite,
            "Australian Stone Co.",
            "BG-001",
            Finish::Polished,
            85,
            160,
            Availability::InStock,
            2,
            10,
        ),
        stone(
            "limestone-australian-cream",
            "Australian Cream Limestone",
            MaterialCategory::Limestone,
            "Aussie Stone Quarries",
            "ACL-001",
            Finish::Honed,
            65,
            120,
            Availability::InStock,
            1,
            5,
        ),
    ]
}

/// A homeowner and a builder.
pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "cust-001".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah@email.com".to_string(),
            phone: "0412 345 678".to_string(),
            address: "45 Oak Street".to_string(),
            city: "North Sydney".to_string(),
            postcode: "2060".to_string(),
            customer_type: CustomerType::Residential,
            notes: None,
            created_at: created_at(),
        },
        Customer {
            id: "cust-002".to_string(),
            name: "ABC Constructions".to_string(),
            email: "projects@abcconstructions.com.au".to_string(),
            phone: "(02) 9999 8888".to_string(),
            address: "88 Builder Avenue".to_string(),
            city: "Parramatta".to_string(),
            postcode: "2150".to_string(),
            customer_type: CustomerType::Builder,
            notes: Some("Trade account".to_string()),
            created_at: created_at(),
        },
    ]
}

/// Sarah's kitchen: one 3000×600 countertop in the first catalogue stone
/// with a sink cutout.
///
/// `materials` must hold at least one stone; with an empty slice the
/// countertop has no material and prices as nothing.
pub fn project(materials: &[StoneMaterial]) -> Project {
    Project {
        id: "proj-001".to_string(),
        customer_id: "cust-001".to_string(),
        name: "Kitchen Renovation".to_string(),
        project_type: ProjectType::Kitchen,
        status: ProjectStatus::Quote,
        address: Some("45 Oak Street, North Sydney NSW 2060".to_string()),
        notes: None,
        delivery_zone: None,
        surfaces: vec![Surface {
            id: "surf-001".to_string(),
            name: "Main Countertop".to_string(),
            surface_type: SurfaceType::Countertop,
            width_mm: Decimal::from(3000),
            height_mm: Decimal::from(600),
            enabled: true,
            selected_material: materials.first().cloned(),
            cutouts: vec![Cutout {
                id: "cut-001".to_string(),
                cutout_type: CutoutType::Sink,
                width_mm: Decimal::from(600),
                height_mm: Decimal::from(400),
                x_mm: Decimal::from(1200),
                y_mm: Decimal::from(100),
                notes: None,
            }],
            edge_profile: EdgeProfile::Standard,
            complexity: Complexity::Medium,
        }],
        created_at: created_at(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_consistent() {
        let materials = materials();
        assert_eq!(materials.len(), 5);
        assert!(materials.iter().all(|m| !m.margin().is_negative()));

        let project = project(&materials);
        assert_eq!(project.surfaces[0].selected_material.as_ref(), materials.first());
        assert!(customers().iter().any(|c| c.id == project.customer_id));
    }
}
