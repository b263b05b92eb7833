//! Per-brand dealer margin reference data.
//!
//! Figures are percentages of MSRP. The table is compiled in and never
//! mutated, so lookups need no synchronisation.

use serde::{Deserialize, Serialize};

/// Which MSRP figure a brand's holdback is quoted against.
/// Carried for reference only; the estimators always use the caller's MSRP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldbackBase {
    #[serde(rename = "Base MSRP")]
    BaseMsrp,
    #[serde(rename = "Total MSRP")]
    TotalMsrp,
    #[serde(rename = "MSRP")]
    Msrp,
}

impl HoldbackBase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseMsrp => "Base MSRP",
            Self::TotalMsrp => "Total MSRP",
            Self::Msrp => "MSRP",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrandMarginProfile {
    /// Dealer markup from invoice to MSRP, low end of the range.
    pub invoice_margin_min_percent: f64,
    /// Dealer markup from invoice to MSRP, high end of the range.
    pub invoice_margin_max_percent: f64,
    /// Manufacturer rebate paid to the dealer after the sale.
    pub dealer_holdback_percent: f64,
    pub holdback_base: HoldbackBase,
    /// Sold without a dealer network: no invoice/holdback spread.
    pub is_direct_to_consumer: bool,
}

impl BrandMarginProfile {
    const fn dealer(min: f64, max: f64, holdback: f64, base: HoldbackBase) -> Self {
        Self {
            invoice_margin_min_percent: min,
            invoice_margin_max_percent: max,
            dealer_holdback_percent: holdback,
            holdback_base: base,
            is_direct_to_consumer: false,
        }
    }

    const fn direct() -> Self {
        Self {
            invoice_margin_min_percent: 0.0,
            invoice_margin_max_percent: 0.0,
            dealer_holdback_percent: 0.0,
            holdback_base: HoldbackBase::Msrp,
            is_direct_to_consumer: true,
        }
    }
}

/// Profile used for any make missing from [`BRAND_MARGINS`].
pub const DEFAULT_PROFILE: BrandMarginProfile =
    BrandMarginProfile::dealer(5.0, 7.0, 2.0, HoldbackBase::Msrp);

use self::HoldbackBase::{BaseMsrp, Msrp, TotalMsrp};

pub const BRAND_MARGINS: &[(&str, BrandMarginProfile)] = &[
    ("Acura", BrandMarginProfile::dealer(5.0, 7.0, 2.0, BaseMsrp)),
    ("Audi", BrandMarginProfile::dealer(6.0, 8.0, 0.0, Msrp)),
    ("BMW", BrandMarginProfile::dealer(6.0, 8.0, 0.0, Msrp)),
    ("Buick", BrandMarginProfile::dealer(4.0, 6.0, 3.0, Msrp)),
    ("Cadillac", BrandMarginProfile::dealer(5.0, 7.0, 3.0, Msrp)),
    ("Chevrolet", BrandMarginProfile::dealer(5.0, 8.0, 3.0, Msrp)),
    ("Chrysler", BrandMarginProfile::dealer(3.0, 5.0, 3.0, Msrp)),
    ("Dodge", BrandMarginProfile::dealer(3.0, 5.0, 3.0, Msrp)),
    ("Ford", BrandMarginProfile::dealer(4.5, 6.5, 3.0, Msrp)),
    ("GMC", BrandMarginProfile::dealer(5.0, 8.0, 3.0, Msrp)),
    ("Honda", BrandMarginProfile::dealer(7.0, 8.5, 2.0, BaseMsrp)),
    ("Hyundai", BrandMarginProfile::dealer(2.5, 4.5, 2.0, Msrp)),
    ("Kia", BrandMarginProfile::dealer(2.5, 4.5, 2.0, Msrp)),
    ("Jeep", BrandMarginProfile::dealer(4.0, 6.0, 3.0, Msrp)),
    ("Ram", BrandMarginProfile::dealer(4.0, 6.0, 3.0, Msrp)),
    ("Lexus", BrandMarginProfile::dealer(6.0, 8.5, 2.0, BaseMsrp)),
    ("Mazda", BrandMarginProfile::dealer(2.5, 5.0, 2.0, Msrp)),
    // Holdback varies 1-3% by model; midpoint.
    ("Mercedes-Benz", BrandMarginProfile::dealer(7.0, 8.0, 2.0, Msrp)),
    ("Nissan", BrandMarginProfile::dealer(4.0, 6.0, 2.0, TotalMsrp)),
    ("Porsche", BrandMarginProfile::dealer(8.0, 10.0, 0.0, Msrp)),
    ("Subaru", BrandMarginProfile::dealer(6.0, 7.0, 2.0, TotalMsrp)),
    ("Toyota", BrandMarginProfile::dealer(7.0, 9.0, 2.0, BaseMsrp)),
    ("Volkswagen", BrandMarginProfile::dealer(4.0, 5.5, 2.0, Msrp)),
    ("Volvo", BrandMarginProfile::dealer(4.0, 6.0, 1.0, Msrp)),
    ("Tesla", BrandMarginProfile::direct()),
    ("Rivian", BrandMarginProfile::direct()),
    ("Lucid", BrandMarginProfile::direct()),
];

/// Capitalises the first character and lowercases the rest ("tOYOTA" -> "Toyota").
/// Whitespace is kept, so a padded make never matches a table row.
pub fn normalize_make(make: &str) -> String {
    let mut chars = make.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Resolves a free-form make to its margin profile, falling back to
/// [`DEFAULT_PROFILE`] for anything unknown.
///
/// Both sides are normalised before comparing, so "BMW", "bmw" and "Bmw"
/// all hit the same row.
pub fn brand_margin_profile(make: &str) -> &'static BrandMarginProfile {
    let normalized = normalize_make(make);
    if normalized.is_empty() {
        return &DEFAULT_PROFILE;
    }

    BRAND_MARGINS
        .iter()
        .find(|(brand, _)| normalize_make(brand) == normalized)
        .map(|(_, profile)| profile)
        .unwrap_or(&DEFAULT_PROFILE)
}

pub fn known_brands() -> impl Iterator<Item = &'static str> {
    BRAND_MARGINS.iter().map(|(brand, _)| *brand)
}
