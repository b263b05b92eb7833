//! Vehicle pricing rules and the session state built on them.

pub mod app_state;
pub mod brand_margins;
pub mod pricing;
pub mod target_price;
pub mod vehicle;

pub use app_state::{AppState, CacheResource, PersistedState, PricingEstimate, VehicleDraft};
pub use brand_margins::{brand_margin_profile, BrandMarginProfile, HoldbackBase, DEFAULT_PROFILE};
pub use pricing::{
    calculate_net_net_price, estimate_dealer_holdback, estimate_invoice_price,
    is_truck_or_large_suv, PricingInput, PricingResult,
};
pub use target_price::{target_price_type, TargetPriceType};
pub use vehicle::{
    vehicle_years, PreferencesUpdate, Trim, VehicleModels, VehiclePreferences, BODY_TYPES,
    VEHICLE_MAKES,
};
