pub mod kpi_card;
pub mod target_badge;
pub mod toast;
