//! Core business logic abstractions

pub mod config;
pub mod controller;
pub mod credentials;
pub mod currency;
pub mod format;
pub mod log;
pub mod message;

// Re-export main types for cleaner imports
pub use controller::{CommandOutcome, Controller, PanelStatus, Phase};
pub use currency::{CurrencyCode, ExchangeApi, Quota, Rate, RateMap, RateTable};
