//! Dealer pricing estimates for car buyers.
//!
//! [`domain`] holds the pure pricing rules, [`infra`] the HTTP
//! collaborators, and [`util`] persistence and display helpers.

pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
