//! Which price tier a buyer can realistically push a dealer to.
//!
//! This is a demand heuristic keyed on make and model text. It does not
//! consult the margin table in [`super::brand_margins`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pricing::PricingResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPriceType {
    /// High demand: expect to pay sticker.
    #[serde(rename = "MSRP")]
    Msrp,
    #[default]
    #[serde(rename = "Invoice")]
    Invoice,
    /// Low demand or heavy stock: push toward dealer break-even.
    #[serde(rename = "Net-Net")]
    NetNet,
}

impl TargetPriceType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Msrp => "MSRP",
            Self::Invoice => "Invoice",
            Self::NetNet => "Net-Net",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Msrp => "High demand. Dealers rarely discount below sticker.",
            Self::Invoice => "Average demand. Aim for the dealer's invoice price.",
            Self::NetNet => "High inventory. Push toward invoice minus holdback.",
        }
    }

    /// Picks the dollar figure for this tier.
    pub fn price_from(&self, msrp: f64, result: &PricingResult) -> f64 {
        match self {
            Self::Msrp => msrp.max(0.0),
            Self::Invoice => result.estimated_invoice,
            Self::NetNet => result.net_net_price,
        }
    }
}

impl fmt::Display for TargetPriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First matching rule wins; anything unmatched targets invoice.
pub fn target_price_type(make: &str, model: &str) -> TargetPriceType {
    let make = make.to_lowercase();
    let model = model.to_lowercase();

    match make.as_str() {
        "toyota" if model.contains("hybrid") => TargetPriceType::Msrp,
        "porsche" => TargetPriceType::Msrp,
        "honda" | "subaru" | "mazda" => TargetPriceType::Invoice,
        "jeep" | "ram" => TargetPriceType::NetNet,
        "ford" if model.contains("f-150") || model.contains("truck") => TargetPriceType::NetNet,
        _ => TargetPriceType::Invoice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_demand_targets_msrp() {
        assert_eq!(target_price_type("Toyota", "Camry Hybrid"), TargetPriceType::Msrp);
        assert_eq!(target_price_type("TOYOTA", "rav4 HYBRID"), TargetPriceType::Msrp);
        assert_eq!(target_price_type("Porsche", "911"), TargetPriceType::Msrp);
    }

    #[test]
    fn average_demand_targets_invoice() {
        assert_eq!(target_price_type("Honda", "Civic"), TargetPriceType::Invoice);
        assert_eq!(target_price_type("Subaru", "Outback"), TargetPriceType::Invoice);
        assert_eq!(target_price_type("Mazda", "CX-5"), TargetPriceType::Invoice);
        assert_eq!(target_price_type("Toyota", "Camry"), TargetPriceType::Invoice);
    }

    #[test]
    fn heavy_inventory_targets_net_net() {
        assert_eq!(target_price_type("Jeep", "Wrangler"), TargetPriceType::NetNet);
        assert_eq!(target_price_type("Ram", "1500"), TargetPriceType::NetNet);
        assert_eq!(target_price_type("Ford", "F-150"), TargetPriceType::NetNet);
        assert_eq!(target_price_type("ford", "Maverick Truck"), TargetPriceType::NetNet);
        assert_eq!(target_price_type("Ford", "Mustang"), TargetPriceType::Invoice);
    }

    #[test]
    fn unknown_combinations_default_to_invoice() {
        assert_eq!(target_price_type("Unknown", "Model"), TargetPriceType::Invoice);
        assert_eq!(target_price_type("", ""), TargetPriceType::Invoice);
        assert_eq!(target_price_type(" Jeep ", "Wrangler"), TargetPriceType::Invoice);
    }

    #[test]
    fn labels_match_wire_format() {
        assert_eq!(TargetPriceType::NetNet.to_string(), "Net-Net");
        assert_eq!(
            serde_json::to_string(&TargetPriceType::Msrp).unwrap(),
            "\"MSRP\""
        );
        let parsed: TargetPriceType = serde_json::from_str("\"Net-Net\"").unwrap();
        assert_eq!(parsed, TargetPriceType::NetNet);
    }

    #[test]
    fn price_from_selects_matching_figure() {
        let result = PricingResult {
            estimated_invoice: 37_200.0,
            estimated_holdback: 800.0,
            net_net_price: 36_400.0,
        };
        assert_eq!(TargetPriceType::Msrp.price_from(40_000.0, &result), 40_000.0);
        assert_eq!(TargetPriceType::Invoice.price_from(40_000.0, &result), 37_200.0);
        assert_eq!(TargetPriceType::NetNet.price_from(40_000.0, &result), 36_400.0);
        assert_eq!(TargetPriceType::Msrp.price_from(-5.0, &result), 0.0);
    }
}
