//! # Rate Table
//!
//! Fabrication, installation, edge-profile, cutout, templating and delivery
//! rates, plus the pricing policy constants (waste allowance, validity
//! window, default delivery zone, quote terms).
//!
//! ## Lookup Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  category      key                      unit     reference rate (AUD)  │
//! │  ───────────   ──────────────────────   ──────   ───────────────────   │
//! │  fabrication   Complexity               per lm   45 / 65 / 95          │
//! │  installation  CustomerClassification   per m²   85 / 95               │
//! │  edge profile  EdgeProfile              per lm   0/15/25/20/150        │
//! │  cutout        CutoutType               each     120/95/35/25/75       │
//! │  templating    CustomerClassification   flat     150 / 250             │
//! │  delivery      DeliveryZone             flat     85 / 150              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups are pure. Keys are closed enums, but the tables are maps so they
//! can be loaded from configuration; a key left out of a configured table is
//! reported as [`CoreError::Configuration`] rather than priced as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Complexity, CustomerClassification, CutoutType, DeliveryZone, EdgeProfile};

// =============================================================================
// Rate Table
// =============================================================================

/// All rates the engine needs, keyed by closed enums.
///
/// Field and key names are snake_case so the table can be read from TOML or
/// `STONEWORKS__PRICING__*` environment variables. A table left out takes
/// its reference default; a table that is given replaces the default whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Per linear metre, by complexity tier.
    pub fabrication: BTreeMap<Complexity, Money>,
    /// Per square metre, by customer class.
    pub installation: BTreeMap<CustomerClassification, Money>,
    /// Per linear metre, by edge profile.
    pub edge_profiles: BTreeMap<EdgeProfile, Money>,
    /// Flat per cutout, by type.
    pub cutouts: BTreeMap<CutoutType, Money>,
    /// Flat per project, by customer class.
    pub templating: BTreeMap<CustomerClassification, Money>,
    /// Flat per project, by zone.
    pub delivery: BTreeMap<DeliveryZone, Money>,
}

impl RateTable {
    pub fn fabrication_rate(&self, complexity: Complexity) -> CoreResult<Money> {
        lookup(&self.fabrication, "fabrication", complexity)
    }

    pub fn installation_rate(&self, class: CustomerClassification) -> CoreResult<Money> {
        lookup(&self.installation, "installation", class)
    }

    /// `Standard` is priced at zero in the reference table.
    pub fn edge_profile_rate(&self, profile: EdgeProfile) -> CoreResult<Money> {
        lookup(&self.edge_profiles, "edge profile", profile)
    }

    pub fn cutout_rate(&self, cutout_type: CutoutType) -> CoreResult<Money> {
        lookup(&self.cutouts, "cutout", cutout_type)
    }

    pub fn templating_rate(&self, class: CustomerClassification) -> CoreResult<Money> {
        lookup(&self.templating, "templating", class)
    }

    pub fn delivery_rate(&self, zone: DeliveryZone) -> CoreResult<Money> {
        lookup(&self.delivery, "delivery", zone)
    }

    /// Every (category, key) pair the engine can ask for that this table
    /// does not define. Empty for a complete table.
    pub fn missing_entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut missing = Vec::new();
        collect_missing(&mut missing, &self.fabrication, "fabrication", Complexity::ALL, Complexity::as_str);
        collect_missing(&mut missing, &self.installation, "installation", CustomerClassification::ALL, CustomerClassification::as_str);
        collect_missing(&mut missing, &self.edge_profiles, "edge profile", EdgeProfile::ALL, EdgeProfile::as_str);
        collect_missing(&mut missing, &self.cutouts, "cutout", CutoutType::ALL, CutoutType::as_str);
        collect_missing(&mut missing, &self.templating, "templating", CustomerClassification::ALL, CustomerClassification::as_str);
        collect_missing(&mut missing, &self.delivery, "delivery", DeliveryZone::ALL, DeliveryZone::as_str);
        missing
    }
}

fn lookup<K: Ord + Display>(
    table: &BTreeMap<K, Money>,
    category: &'static str,
    key: K,
) -> CoreResult<Money> {
    table
        .get(&key)
        .copied()
        .ok_or_else(|| CoreError::missing_rate(category, key.to_string()))
}

fn collect_missing<K: Ord>(
    out: &mut Vec<(&'static str, &'static str)>,
    table: &BTreeMap<K, Money>,
    category: &'static str,
    keys: &[K],
    name: fn(&K) -> &'static str,
) {
    out.extend(
        keys.iter()
            .filter(|key| !table.contains_key(key))
            .map(|key| (category, name(key))),
    );
}

/// The Australian-market reference rates.
impl Default for RateTable {
    fn default() -> Self {
        let d = Money::from_dollars;
        RateTable {
            fabrication: BTreeMap::from([
                (Complexity::Simple, d(45)),
                (Complexity::Medium, d(65)),
                (Complexity::Complex, d(95)),
            ]),
            installation: BTreeMap::from([
                (CustomerClassification::Residential, d(85)),
                (CustomerClassification::Commercial, d(95)),
            ]),
            edge_profiles: BTreeMap::from([
                (EdgeProfile::Standard, d(0)),
                (EdgeProfile::Bullnose, d(15)),
                (EdgeProfile::Ogee, d(25)),
                (EdgeProfile::Beveled, d(20)),
                (EdgeProfile::Waterfall, d(150)),
            ]),
            cutouts: BTreeMap::from([
                (CutoutType::Sink, d(120)),
                (CutoutType::Cooktop, d(95)),
                (CutoutType::Tap, d(35)),
                (CutoutType::Powerpoint, d(25)),
                (CutoutType::Custom, d(75)),
            ]),
            templating: BTreeMap::from([
                (CustomerClassification::Residential, d(150)),
                (CustomerClassification::Commercial, d(250)),
            ]),
            delivery: BTreeMap::from([
                (DeliveryZone::Metro, d(85)),
                (DeliveryZone::Regional, d(150)),
            ]),
        }
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Default quote terms printed on every quote.
pub const DEFAULT_TERMS: &str =
    "Payment terms: 50% deposit, 50% on completion. Quote valid for 30 days.";

/// Rates plus the policy constants the engine would otherwise hardcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub rates: RateTable,
    /// Extra material billed for offcuts, as a fraction of measured area.
    pub waste_factor: Decimal,
    /// Days from creation until a quote lapses.
    pub validity_days: u32,
    /// Zone used when a project does not name one.
    pub default_delivery_zone: DeliveryZone,
    /// Version stamped on newly generated quotes.
    pub quote_version: u32,
    pub terms: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            rates: RateTable::default(),
            waste_factor: Decimal::new(15, 2),
            validity_days: 30,
            default_delivery_zone: DeliveryZone::Metro,
            quote_version: 1,
            terms: DEFAULT_TERMS.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.fabrication_rate(Complexity::Medium).unwrap().amount(), dec!(65));
        assert_eq!(rates.installation_rate(CustomerClassification::Residential).unwrap().amount(), dec!(85));
        assert_eq!(rates.installation_rate(CustomerClassification::Commercial).unwrap().amount(), dec!(95));
        assert_eq!(rates.edge_profile_rate(EdgeProfile::Standard).unwrap().amount(), dec!(0));
        assert_eq!(rates.edge_profile_rate(EdgeProfile::Waterfall).unwrap().amount(), dec!(150));
        assert_eq!(rates.cutout_rate(CutoutType::Sink).unwrap().amount(), dec!(120));
        assert_eq!(rates.templating_rate(CustomerClassification::Commercial).unwrap().amount(), dec!(250));
        assert_eq!(rates.delivery_rate(DeliveryZone::Metro).unwrap().amount(), dec!(85));
        assert!(rates.missing_entries().is_empty());
    }

    #[test]
    fn test_missing_rate_is_configuration_error() {
        let mut rates = RateTable::default();
        rates.cutouts.remove(&CutoutType::Powerpoint);

        let err = rates.cutout_rate(CutoutType::Powerpoint).unwrap_err();
        match err {
            CoreError::Configuration { category, key } => {
                assert_eq!(category, "cutout");
                assert_eq!(key, "powerpoint");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(rates.missing_entries(), vec![("cutout", "powerpoint")]);
    }

    #[test]
    fn test_policy_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.waste_factor, dec!(0.15));
        assert_eq!(config.validity_days, 30);
        assert_eq!(config.default_delivery_zone, DeliveryZone::Metro);
        assert_eq!(config.quote_version, 1);
    }

    #[test]
    fn test_config_from_json_with_partial_override() {
        let json = r#"{
            "waste_factor": "0.2",
            "rates": {
                "fabrication": { "simple": "50", "medium": "70", "complex": "100" },
                "installation": { "residential": "85", "commercial": "95" },
                "edge_profiles": { "standard": "0", "bullnose": "15" },
                "cutouts": { "sink": "120", "cooktop": "95", "tap": "35", "powerpoint": "25", "custom": "75" },
                "templating": { "residential": "150", "commercial": "250" },
                "delivery": { "metro": "85", "regional": "150" }
            }
        }"#;
        let config: PricingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.waste_factor, dec!(0.2));
        assert_eq!(config.validity_days, 30);
        assert_eq!(
            config.rates.fabrication_rate(Complexity::Simple).unwrap().amount(),
            dec!(50)
        );
        assert!(config.rates.edge_profile_rate(EdgeProfile::Ogee).is_err());
        assert_eq!(config.rates.missing_entries().len(), 3);
    }

    #[test]
    fn test_omitted_tables_keep_reference_rates() {
        let json = r#"{ "rates": { "delivery": { "metro": "90" } } }"#;
        let config: PricingConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.rates.delivery_rate(DeliveryZone::Metro).unwrap().amount(), dec!(90));
        assert!(config.rates.delivery_rate(DeliveryZone::Regional).is_err());
        assert_eq!(config.rates.cutouts, RateTable::default().cutouts);
        assert_eq!(config.rates.missing_entries(), vec![("delivery", "regional")]);
    }
}
