use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::pricing::PricingInput;

/// Makes offered in the vehicle picker.
pub const VEHICLE_MAKES: [&str; 31] = [
    "Acura",
    "Audi",
    "BMW",
    "Buick",
    "Cadillac",
    "Chevrolet",
    "Chrysler",
    "Dodge",
    "Ford",
    "Genesis",
    "GMC",
    "Honda",
    "Hyundai",
    "Infiniti",
    "Jaguar",
    "Jeep",
    "Kia",
    "Land Rover",
    "Lexus",
    "Lincoln",
    "Mazda",
    "Mercedes-Benz",
    "Mini",
    "Nissan",
    "Porsche",
    "Ram",
    "Subaru",
    "Tesla",
    "Toyota",
    "Volkswagen",
    "Volvo",
];

pub const BODY_TYPES: [&str; 8] = [
    "Sedan",
    "Coupe",
    "Hatchback",
    "Wagon",
    "SUV",
    "Pickup Truck",
    "Minivan",
    "Convertible",
];

pub const OLDEST_MODEL_YEAR: u16 = 2000;
pub const NEWEST_MODEL_YEAR: u16 = 2026;

/// Model years, newest first.
pub fn vehicle_years() -> impl Iterator<Item = u16> {
    (OLDEST_MODEL_YEAR..=NEWEST_MODEL_YEAR).rev()
}

/// The user's target vehicle as stored by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePreferences {
    pub year: u16,
    pub make: String,
    pub model: String,
    /// Empty when the user left the trim unspecified.
    #[serde(default)]
    pub trim: Option<String>,
    #[serde(default)]
    pub trim_id: Option<String>,
    /// Base MSRP of the chosen trim; absent or zero when unknown.
    #[serde(default)]
    pub base_msrp: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl VehiclePreferences {
    pub fn msrp(&self) -> f64 {
        self.base_msrp.unwrap_or(0.0)
    }

    pub fn pricing_input(&self, body_type: Option<&str>) -> PricingInput {
        PricingInput::new(
            self.msrp(),
            self.make.clone(),
            body_type.map(str::to_string),
        )
    }

    /// "2024 Toyota Camry XSE"
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {} {}", self.year, self.make, self.model);
        if let Some(trim) = self.trim.as_deref().filter(|trim| !trim.is_empty()) {
            name.push(' ');
            name.push_str(trim);
        }
        name
    }

    pub fn created_at_time(&self) -> Option<OffsetDateTime> {
        self.created_at
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
    }

    /// Calendar date the vehicle was first saved, e.g. "2025-01-02".
    pub fn saved_on(&self) -> Option<String> {
        self.created_at_time().map(|at| at.date().to_string())
    }
}

/// Body for creating or replacing preferences.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub year: u16,
    pub make: String,
    pub model: String,
    /// `None` serialises as `null`, which the backend reads as "unspecified".
    pub trim_id: Option<String>,
    pub zip_code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trim {
    pub id: String,
    pub trim_name: String,
}

/// Make name to the models the backend knows for it.
pub type VehicleModels = BTreeMap<String, Vec<String>>;
