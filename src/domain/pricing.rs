//! Dealer cost estimates derived from MSRP.
//!
//! Every function here is total: a missing make or a non-positive MSRP is
//! "not enough data" and yields `0.0` instead of an error, so the UI can show
//! "N/A" rather than fail. Nothing is rounded; display rounding is the
//! caller's job.

use serde::{Deserialize, Serialize};

use super::brand_margins::{brand_margin_profile, BrandMarginProfile};

const TRUCK_OR_SUV_MARKERS: [&str; 4] = ["truck", "pickup", "suv", "sport utility"];

/// Trucks and large SUVs carry the top of a brand's margin range.
pub fn is_truck_or_large_suv(body_type: Option<&str>) -> bool {
    let Some(body_type) = body_type else {
        return false;
    };
    let lower = body_type.to_lowercase();
    TRUCK_OR_SUV_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Returns the profile when the inputs are usable, `None` when the estimate
/// should collapse to zero.
fn usable_profile(msrp: f64, make: &str) -> Option<&'static BrandMarginProfile> {
    if !msrp.is_finite() || msrp <= 0.0 || make.is_empty() {
        return None;
    }
    Some(brand_margin_profile(make))
}

/// Backs the dealer invoice out of MSRP.
///
/// Direct-to-consumer brands have no markup, so the invoice is the MSRP.
pub fn estimate_invoice_price(msrp: f64, make: &str, body_type: Option<&str>) -> f64 {
    let Some(profile) = usable_profile(msrp, make) else {
        return 0.0;
    };

    if profile.is_direct_to_consumer {
        return msrp;
    }

    let margin_percent = if is_truck_or_large_suv(body_type) {
        profile.invoice_margin_max_percent
    } else {
        profile.invoice_margin_min_percent
    };

    msrp * (1.0 - margin_percent / 100.0)
}

/// Manufacturer-to-dealer rebate paid after the sale.
pub fn estimate_dealer_holdback(msrp: f64, make: &str) -> f64 {
    let Some(profile) = usable_profile(msrp, make) else {
        return 0.0;
    };

    if profile.is_direct_to_consumer {
        return 0.0;
    }

    msrp * (profile.dealer_holdback_percent / 100.0)
}

/// Dealer break-even: invoice minus holdback for the same vehicle.
pub fn calculate_net_net_price(msrp: f64, make: &str, body_type: Option<&str>) -> f64 {
    let Some(profile) = usable_profile(msrp, make) else {
        return 0.0;
    };

    if profile.is_direct_to_consumer {
        return msrp;
    }

    estimate_invoice_price(msrp, make, body_type) - estimate_dealer_holdback(msrp, make)
}

/// Vehicle facts the estimators need.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub msrp: f64,
    pub make: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
}

impl PricingInput {
    pub fn new(msrp: f64, make: impl Into<String>, body_type: Option<String>) -> Self {
        Self {
            msrp,
            make: make.into(),
            body_type,
        }
    }

    /// Runs all three estimators over the same inputs.
    pub fn estimate(&self) -> PricingResult {
        let body_type = self.body_type.as_deref();
        PricingResult {
            estimated_invoice: estimate_invoice_price(self.msrp, &self.make, body_type),
            estimated_holdback: estimate_dealer_holdback(self.msrp, &self.make),
            net_net_price: calculate_net_net_price(self.msrp, &self.make, body_type),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub estimated_invoice: f64,
    pub estimated_holdback: f64,
    pub net_net_price: f64,
}

impl PricingResult {
    /// All zeros means the inputs were insufficient.
    pub fn is_empty(&self) -> bool {
        self.estimated_invoice == 0.0 && self.estimated_holdback == 0.0 && self.net_net_price == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand_margins::known_brands;
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_oneof, proptest, Just};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn classifies_body_types() {
        assert!(is_truck_or_large_suv(Some("Pickup Truck")));
        assert!(is_truck_or_large_suv(Some("suv")));
        assert!(is_truck_or_large_suv(Some("Compact SUV")));
        assert!(is_truck_or_large_suv(Some("Sport Utility Vehicle")));
        assert!(is_truck_or_large_suv(Some("TRUCK")));
        assert!(!is_truck_or_large_suv(Some("Sedan")));
        assert!(!is_truck_or_large_suv(Some("")));
        assert!(!is_truck_or_large_suv(None));
    }

    #[test]
    fn invoice_uses_min_margin_for_sedans() {
        assert_approx(estimate_invoice_price(40_000.0, "Toyota", Some("Sedan")), 37_200.0);
    }

    #[test]
    fn invoice_uses_max_margin_for_trucks() {
        assert_approx(
            estimate_invoice_price(40_000.0, "Toyota", Some("Pickup Truck")),
            36_400.0,
        );
        assert_approx(estimate_invoice_price(35_000.0, "Honda", Some("SUV")), 32_025.0);
    }

    #[test]
    fn invoice_without_body_type_uses_min_margin() {
        assert_approx(estimate_invoice_price(40_000.0, "Toyota", None), 37_200.0);
    }

    #[test]
    fn direct_to_consumer_invoice_is_msrp() {
        assert_eq!(estimate_invoice_price(50_000.0, "Tesla", Some("Sedan")), 50_000.0);
        assert_eq!(estimate_invoice_price(70_000.0, "rivian", Some("Pickup Truck")), 70_000.0);
    }

    #[test]
    fn unknown_brand_uses_default_margins() {
        assert_approx(
            estimate_invoice_price(40_000.0, "UnknownBrand", Some("Sedan")),
            38_000.0,
        );
        assert_approx(estimate_dealer_holdback(40_000.0, "UnknownBrand"), 800.0);
    }

    #[test]
    fn degenerate_inputs_yield_zero() {
        assert_eq!(estimate_invoice_price(0.0, "Toyota", Some("Sedan")), 0.0);
        assert_eq!(estimate_invoice_price(-1_000.0, "Toyota", Some("Sedan")), 0.0);
        assert_eq!(estimate_invoice_price(40_000.0, "", Some("Sedan")), 0.0);
        assert_eq!(estimate_invoice_price(f64::NAN, "Toyota", None), 0.0);
        assert_eq!(estimate_dealer_holdback(0.0, "Toyota"), 0.0);
        assert_eq!(estimate_dealer_holdback(40_000.0, ""), 0.0);
        assert_eq!(calculate_net_net_price(0.0, "Toyota", Some("Sedan")), 0.0);
        assert_eq!(calculate_net_net_price(f64::INFINITY, "Toyota", None), 0.0);
    }

    #[test]
    fn whitespace_makes_price_with_default_margins() {
        assert_approx(estimate_invoice_price(40_000.0, "  ", Some("Sedan")), 38_000.0);
        assert_approx(estimate_invoice_price(40_000.0, " honda ", Some("Sedan")), 38_000.0);
        assert_approx(estimate_dealer_holdback(40_000.0, "  "), 800.0);
        assert_approx(calculate_net_net_price(40_000.0, " honda ", Some("Sedan")), 37_200.0);
    }

    #[test]
    fn holdback_follows_brand_percentage() {
        assert_eq!(estimate_dealer_holdback(40_000.0, "Acura"), 800.0);
        assert_eq!(estimate_dealer_holdback(40_000.0, "Chevrolet"), 1_200.0);
        assert_eq!(estimate_dealer_holdback(50_000.0, "Audi"), 0.0);
        assert_eq!(estimate_dealer_holdback(60_000.0, "BMW"), 0.0);
        assert_eq!(estimate_dealer_holdback(100_000.0, "Porsche"), 0.0);
        assert_eq!(estimate_dealer_holdback(50_000.0, "Tesla"), 0.0);
    }

    #[test]
    fn net_net_subtracts_holdback_from_invoice() {
        assert_approx(calculate_net_net_price(40_000.0, "Toyota", Some("Sedan")), 36_400.0);
        assert_approx(
            calculate_net_net_price(50_000.0, "Chevrolet", Some("Pickup Truck")),
            44_500.0,
        );
        assert_eq!(calculate_net_net_price(50_000.0, "Tesla", Some("Sedan")), 50_000.0);
    }

    #[test]
    fn pricing_input_estimates_all_figures() {
        let input = PricingInput::new(40_000.0, "Toyota", Some("Sedan".to_string()));
        let result = input.estimate();
        assert_approx(result.estimated_invoice, 37_200.0);
        assert_approx(result.estimated_holdback, 800.0);
        assert_approx(result.net_net_price, 36_400.0);
        assert!(!result.is_empty());

        assert!(PricingInput::default().estimate().is_empty());
    }

    #[test]
    fn pricing_result_serialises_camel_case() {
        let json = serde_json::to_value(PricingResult {
            estimated_invoice: 1.0,
            estimated_holdback: 2.0,
            net_net_price: 3.0,
        })
        .unwrap();
        assert_eq!(json["estimatedInvoice"], 1.0);
        assert_eq!(json["netNetPrice"], 3.0);
    }

    fn dealer_brand() -> impl proptest::strategy::Strategy<Value = String> {
        let brands: Vec<String> = known_brands()
            .filter(|brand| !brand_margin_profile(brand).is_direct_to_consumer)
            .map(str::to_string)
            .chain(std::iter::once("UnknownBrand".to_string()))
            .collect();
        proptest::sample::select(brands)
    }

    fn body_type() -> impl proptest::strategy::Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Sedan".to_string())),
            Just(Some("Pickup Truck".to_string())),
            Just(Some("Large SUV".to_string())),
            Just(Some("Hatchback".to_string())),
        ]
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_direct_to_consumer_has_no_spread(
            msrp in 1.0f64..500_000.0,
            make in prop_oneof![Just("Tesla"), Just("RIVIAN"), Just("lucid")],
            body in body_type(),
        ) {
            let body = body.as_deref();
            prop_assert_eq!(estimate_invoice_price(msrp, make, body), msrp);
            prop_assert_eq!(estimate_dealer_holdback(msrp, make), 0.0);
            prop_assert_eq!(calculate_net_net_price(msrp, make, body), msrp);
        }

        #[test]
        fn prop_non_positive_msrp_is_zero(
            msrp in -500_000.0f64..=0.0,
            make in "[A-Za-z-]{0,12}",
            body in body_type(),
        ) {
            let body = body.as_deref();
            prop_assert_eq!(estimate_invoice_price(msrp, &make, body), 0.0);
            prop_assert_eq!(estimate_dealer_holdback(msrp, &make), 0.0);
            prop_assert_eq!(calculate_net_net_price(msrp, &make, body), 0.0);
        }

        #[test]
        fn prop_trucks_never_price_above_sedans(
            msrp in 1.0f64..500_000.0,
            make in dealer_brand(),
        ) {
            let truck = estimate_invoice_price(msrp, &make, Some("Pickup Truck"));
            let sedan = estimate_invoice_price(msrp, &make, Some("Sedan"));
            prop_assert!(truck <= sedan, "{make}: truck {truck} > sedan {sedan}");
        }

        #[test]
        fn prop_net_net_is_invoice_minus_holdback(
            msrp in 1.0f64..500_000.0,
            make in dealer_brand(),
            body in body_type(),
        ) {
            let body = body.as_deref();
            let expected = estimate_invoice_price(msrp, &make, body)
                - estimate_dealer_holdback(msrp, &make);
            prop_assert_eq!(calculate_net_net_price(msrp, &make, body), expected);
        }
    }
}
