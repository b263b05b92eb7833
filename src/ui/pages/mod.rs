pub mod pricing;
pub mod settings;

pub use pricing::PricingPage;
pub use settings::SettingsPage;
