use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::{
    pricing::{PricingInput, PricingResult},
    target_price::{target_price_type, TargetPriceType},
    vehicle::{PreferencesUpdate, VehicleModels, VehiclePreferences, NEWEST_MODEL_YEAR},
};

/// Vehicle form as the user is typing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleDraft {
    pub msrp: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub body_type: String,
    #[serde(default = "default_year")]
    pub year: u16,
    #[serde(default)]
    pub trim_id: Option<String>,
    #[serde(default)]
    pub zip_code: String,
}

fn default_year() -> u16 {
    NEWEST_MODEL_YEAR
}

impl Default for VehicleDraft {
    fn default() -> Self {
        Self {
            msrp: String::new(),
            make: String::new(),
            model: String::new(),
            body_type: String::new(),
            year: default_year(),
            trim_id: None,
            zip_code: String::new(),
        }
    }
}

impl VehicleDraft {
    /// Copies a saved vehicle into the form and reports whether it carried a
    /// base MSRP. Without one, a typed MSRP survives only when the vehicle is
    /// the one already in the form.
    pub fn apply_preferences(&mut self, prefs: &VehiclePreferences) -> bool {
        let same_vehicle = self.year == prefs.year
            && self.make.trim().eq_ignore_ascii_case(prefs.make.trim())
            && self.model.trim().eq_ignore_ascii_case(prefs.model.trim());

        self.year = prefs.year;
        self.make = prefs.make.clone();
        self.model = prefs.model.clone();
        self.trim_id = prefs.trim_id.clone().filter(|id| !id.is_empty());

        match prefs.base_msrp.filter(|msrp| msrp.is_finite() && *msrp > 0.0) {
            Some(msrp) => {
                self.msrp = format!("{msrp:.0}");
                true
            }
            None => {
                if !same_vehicle {
                    self.msrp.clear();
                }
                false
            }
        }
    }

    /// Make, model and year changes invalidate the chosen trim.
    pub fn set_make(&mut self, make: String) {
        if self.make != make {
            self.trim_id = None;
        }
        self.make = make;
    }

    pub fn set_model(&mut self, model: String) {
        if self.model != model {
            self.trim_id = None;
        }
        self.model = model;
    }

    pub fn set_year(&mut self, year: u16) {
        if self.year != year {
            self.trim_id = None;
        }
        self.year = year;
    }

    /// Request body for saving the vehicle; `None` until make and model are filled in.
    pub fn preferences_update(&self) -> Option<PreferencesUpdate> {
        let make = self.make.trim();
        let model = self.model.trim();
        if make.is_empty() || model.is_empty() {
            return None;
        }
        Some(PreferencesUpdate {
            year: self.year,
            make: make.to_string(),
            model: model.to_string(),
            trim_id: self
                .trim_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            zip_code: self.zip_code.trim().to_string(),
        })
    }

    /// Accepts "$42,500" style input. Anything unparsable is an unknown MSRP (0).
    pub fn parse_msrp(&self) -> f64 {
        let cleaned: String = self
            .msrp
            .chars()
            .filter(|ch| !matches!(ch, '$' | ',' | ' ' | '_'))
            .collect();
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    pub fn pricing_input(&self) -> PricingInput {
        let body_type = Some(self.body_type.trim())
            .filter(|body| !body.is_empty())
            .map(str::to_string);
        PricingInput::new(self.parse_msrp(), self.make.trim(), body_type)
    }

    pub fn estimate(&self) -> PricingEstimate {
        let input = self.pricing_input();
        let result = input.estimate();
        let target = target_price_type(&input.make, &self.model);
        PricingEstimate {
            msrp: input.msrp,
            target_price: target.price_from(input.msrp, &result),
            result,
            target,
        }
    }
}

/// Figures shown on the pricing page for one draft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricingEstimate {
    pub msrp: f64,
    pub result: PricingResult,
    pub target: TargetPriceType,
    pub target_price: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub draft: VehicleDraft,
    /// Last preferences pulled from the backend.
    pub preferences: Option<VehiclePreferences>,
    pub models: VehicleModels,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    /// Models for the draft's make, case-insensitively.
    pub fn models_for_make(&self) -> Vec<String> {
        let make = self.draft.make.trim();
        self.models
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(make))
            .map(|(_, models)| models.clone())
            .unwrap_or_default()
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.draft = persisted.draft;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            draft: self.draft.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Preferences,
    Models,
}

impl CacheResource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preferences => "Preferences",
            Self::Models => "Model catalogue",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub draft: VehicleDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(msrp: &str, make: &str, model: &str, body: &str) -> VehicleDraft {
        VehicleDraft {
            msrp: msrp.into(),
            make: make.into(),
            model: model.into(),
            body_type: body.into(),
            ..VehicleDraft::default()
        }
    }

    #[test]
    fn parse_msrp_tolerates_currency_formatting() {
        assert_eq!(draft("$42,500", "", "", "").parse_msrp(), 42_500.0);
        assert_eq!(draft(" 39999.99 ", "", "", "").parse_msrp(), 39_999.99);
        assert_eq!(draft("abc", "", "", "").parse_msrp(), 0.0);
        assert_eq!(draft("", "", "", "").parse_msrp(), 0.0);
        assert_eq!(draft("inf", "", "", "").parse_msrp(), 0.0);
    }

    #[test]
    fn blank_body_type_is_treated_as_absent() {
        let input = draft("40000", " Toyota ", "Camry", "  ").pricing_input();
        assert_eq!(input.body_type, None);
        assert_eq!(input.make, "Toyota");
    }

    #[test]
    fn estimate_combines_figures_and_target() {
        let estimate = draft("40000", "Toyota", "Camry Hybrid", "Sedan").estimate();
        assert_eq!(estimate.target, TargetPriceType::Msrp);
        assert_eq!(estimate.target_price, 40_000.0);
        assert!((estimate.result.estimated_invoice - 37_200.0).abs() < 1e-6);

        let jeep = draft("50000", "Jeep", "Wrangler", "SUV").estimate();
        assert_eq!(jeep.target, TargetPriceType::NetNet);
        assert_eq!(jeep.target_price, jeep.result.net_net_price);
    }

    #[test]
    fn applying_preferences_copies_vehicle_and_msrp() {
        let prefs = VehiclePreferences {
            year: 2024,
            make: "Ford".into(),
            model: "F-150".into(),
            trim_id: Some("trim-xlt".into()),
            base_msrp: Some(52_000.0),
            ..Default::default()
        };
        let mut form = draft("", "", "", "Pickup Truck");
        assert!(form.apply_preferences(&prefs));
        assert_eq!(form.msrp, "52000");
        assert_eq!(form.year, 2024);
        assert_eq!(form.trim_id.as_deref(), Some("trim-xlt"));
        assert_eq!(form.body_type, "Pickup Truck");
    }

    #[test]
    fn missing_base_msrp_keeps_typed_price_for_same_vehicle() {
        let prefs = VehiclePreferences {
            year: 2024,
            make: "Honda".into(),
            model: "Civic".into(),
            base_msrp: Some(0.0),
            ..Default::default()
        };

        let mut same = draft("$27,000", "honda", "civic", "Sedan");
        same.year = 2024;
        assert!(!same.apply_preferences(&prefs));
        assert_eq!(same.msrp, "$27,000");

        let mut other = draft("$45,000", "Jeep", "Wrangler", "SUV");
        assert!(!other.apply_preferences(&prefs));
        assert_eq!(other.msrp, "");
        assert_eq!(other.make, "Honda");
    }

    #[test]
    fn vehicle_changes_clear_trim() {
        let mut form = draft("", "Toyota", "Camry", "");
        form.trim_id = Some("trim-1".into());
        form.set_make("Toyota".into());
        assert_eq!(form.trim_id.as_deref(), Some("trim-1"));
        form.set_year(2022);
        assert!(form.trim_id.is_none());

        form.trim_id = Some("trim-2".into());
        form.set_model("Corolla".into());
        assert!(form.trim_id.is_none());
    }

    #[test]
    fn preferences_update_requires_make_and_model() {
        assert!(draft("", "Toyota", "  ", "").preferences_update().is_none());

        let mut form = draft("", " Toyota ", " Camry ", "");
        form.year = 2025;
        form.trim_id = Some(" ".into());
        form.zip_code = " 94107 ".into();
        let update = form.preferences_update().unwrap();
        assert_eq!(update.make, "Toyota");
        assert_eq!(update.model, "Camry");
        assert_eq!(update.year, 2025);
        assert_eq!(update.trim_id, None);
        assert_eq!(update.zip_code, "94107");
    }

    #[test]
    fn older_drafts_default_new_fields() {
        let raw = r#"{ "msrp": "40000", "make": "Toyota", "model": "Camry" }"#;
        let form: VehicleDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(form.year, NEWEST_MODEL_YEAR);
        assert!(form.trim_id.is_none());
        assert_eq!(form.body_type, "");
    }

    #[test]
    fn models_lookup_ignores_case() {
        let mut state = AppState::default();
        state
            .models
            .insert("Toyota".into(), vec!["Camry".into(), "Tacoma".into()]);
        state.draft.make = "toyota".into();
        assert_eq!(state.models_for_make(), vec!["Camry", "Tacoma"]);
        state.draft.make = "Lada".into();
        assert!(state.models_for_make().is_empty());
    }

    #[test]
    fn cache_staleness_tracks_ttl() {
        let mut cache = CacheTimestamps::default();
        let ttl = Duration::from_secs(60);
        assert!(cache.is_stale(&CacheResource::Models, ttl));
        cache.record_fetch(CacheResource::Models, SystemTime::now());
        assert!(!cache.is_stale(&CacheResource::Models, ttl));
        cache.record_fetch(
            CacheResource::Preferences,
            SystemTime::now() - Duration::from_secs(120),
        );
        assert!(cache.is_stale(&CacheResource::Preferences, ttl));
        cache.clear();
        assert!(cache.fetched_at(&CacheResource::Models).is_none());
    }

    #[test]
    fn persisted_state_round_trips_draft() {
        let mut state = AppState::default();
        state.draft = draft("40000", "Honda", "Civic", "Sedan");
        let snapshot = state.to_persisted();

        let mut restored = AppState::default();
        restored.apply_persisted(snapshot.clone());
        assert_eq!(restored.draft, state.draft);
    }
}
