//! # Project Aggregator
//!
//! Builds the flat, ordered line-item list for a whole project: every
//! surface in array order, then one templating line, then one delivery line.
//! Totals are not computed here.

use rust_decimal::Decimal;

use crate::error::CoreResult;
use crate::rates::PricingConfig;
use crate::surface::{price_surface, ItemIds};
use crate::types::{CustomerClassification, DeliveryZone, ItemCategory, Project, QuoteItem, Unit};

/// Prices every surface of `project` and appends the per-project extras.
///
/// The result is never empty: a project with no billable surfaces still
/// yields templating and delivery.
pub fn aggregate_project(
    project: &Project,
    class: CustomerClassification,
    zone: DeliveryZone,
    config: &PricingConfig,
) -> CoreResult<Vec<QuoteItem>> {
    let rates = &config.rates;
    let templating_rate = rates.templating_rate(class)?;
    let delivery_rate = rates.delivery_rate(zone)?;

    let mut ids = ItemIds::new();
    let mut items = Vec::new();

    for surface in &project.surfaces {
        items.extend(price_surface(surface, class, config, &mut ids)?);
    }

    items.push(QuoteItem::new(
        ids.next_id(),
        "Digital Templating",
        ItemCategory::Extras,
        Decimal::ONE,
        Unit::Each,
        templating_rate,
    ));

    items.push(QuoteItem::new(
        ids.next_id(),
        delivery_description(zone),
        ItemCategory::Extras,
        Decimal::ONE,
        Unit::Each,
        delivery_rate,
    ));

    Ok(items)
}

fn delivery_description(zone: DeliveryZone) -> &'static str {
    match zone {
        DeliveryZone::Metro => "Delivery - Metro",
        DeliveryZone::Regional => "Delivery - Regional",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn surface(id: &str, enabled: bool) -> Surface {
        Surface {
            id: id.to_string(),
            name: format!("Surface {id}"),
            surface_type: SurfaceType::Countertop,
            width_mm: dec!(2000),
            height_mm: dec!(500),
            enabled,
            selected_material: Some(StoneMaterial {
                id: "granite-black-galaxy".to_string(),
                name: "Black Galaxy Granite".to_string(),
                category: MaterialCategory::Granite,
                supplier: "Australian Stone Co.".to_string(),
                supplier_code: "BG-001".to_string(),
                finish: Finish::Polished,
                cost_price: Money::new(dec!(85)),
                sell_price: Money::new(dec!(160)),
                availability: Availability::InStock,
                lead_time_days: 2,
                warranty_years: 10,
            }),
            cutouts: vec![],
            edge_profile: EdgeProfile::Standard,
            complexity: Complexity::Simple,
        }
    }

    fn project(surfaces: Vec<Surface>) -> Project {
        Project {
            id: "proj-001".to_string(),
            customer_id: "cust-001".to_string(),
            name: "Kitchen Renovation".to_string(),
            project_type: ProjectType::Kitchen,
            status: ProjectStatus::Quote,
            address: None,
            notes: None,
            delivery_zone: None,
            surfaces,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_project_still_has_extras() {
        let items = aggregate_project(
            &project(vec![]),
            CustomerClassification::Residential,
            DeliveryZone::Metro,
            &PricingConfig::default(),
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "item-1");
        assert_eq!(items[0].description, "Digital Templating");
        assert_eq!(items[0].total_price.amount(), dec!(150));
        assert_eq!(items[1].id, "item-2");
        assert_eq!(items[1].description, "Delivery - Metro");
        assert_eq!(items[1].total_price.amount(), dec!(85));
    }

    #[test]
    fn test_surfaces_in_array_order_then_extras() {
        let items = aggregate_project(
            &project(vec![surface("a", true), surface("b", true)]),
            CustomerClassification::Commercial,
            DeliveryZone::Regional,
            &PricingConfig::default(),
        )
        .unwrap();

        assert_eq!(items.len(), 8);
        assert_eq!(items[0].description, "Black Galaxy Granite - Surface a");
        assert_eq!(items[3].description, "Black Galaxy Granite - Surface b");
        assert_eq!(items[6].total_price.amount(), dec!(250));
        assert_eq!(items[7].description, "Delivery - Regional");
        assert_eq!(items[7].total_price.amount(), dec!(150));

        let ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
        let expected: Vec<_> = (1..=8).map(|n| format!("item-{n}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_disabling_a_surface_removes_only_its_items() {
        let config = PricingConfig::default();
        let class = CustomerClassification::Residential;

        let all = aggregate_project(
            &project(vec![surface("a", true), surface("b", true)]),
            class,
            DeliveryZone::Metro,
            &config,
        )
        .unwrap();
        let without_a = aggregate_project(
            &project(vec![surface("a", false), surface("b", true)]),
            class,
            DeliveryZone::Metro,
            &config,
        )
        .unwrap();

        assert_eq!(all.len() - without_a.len(), 3);
        let strip = |items: &[QuoteItem]| -> Vec<(String, Money)> {
            items
                .iter()
                .filter(|i| !i.description.contains("Surface a"))
                .map(|i| (i.description.clone(), i.total_price))
                .collect()
        };
        assert_eq!(strip(&all), strip(&without_a));
    }

    #[test]
    fn test_missing_delivery_rate_aborts() {
        let mut config = PricingConfig::default();
        config.rates.delivery.remove(&DeliveryZone::Regional);

        let err = aggregate_project(
            &project(vec![surface("a", true)]),
            CustomerClassification::Residential,
            DeliveryZone::Regional,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }
}
