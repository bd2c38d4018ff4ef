//! Currency conversion abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt::Display;

/// A currency code as typed by the user, trimmed and upper-cased.
///
/// No check against the ISO 4217 list is made; the remote API is the
/// authority on which codes exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalizes raw input. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            None
        } else {
            Some(CurrencyCode(code.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rate or converted amount, kept in the form the API sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Rate(serde_json::Number);

impl Rate {
    /// `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Rate)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

impl From<serde_json::Number> for Rate {
    fn from(number: serde_json::Number) -> Self {
        Rate(number)
    }
}

impl From<u64> for Rate {
    fn from(value: u64) -> Self {
        Rate(value.into())
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Rates keyed by currency code, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateMap {
    entries: Vec<(String, Rate)>,
}

impl RateMap {
    pub fn new(entries: Vec<(String, Rate)>) -> Self {
        RateMap { entries }
    }

    pub fn get(&self, code: &str) -> Option<&Rate> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, rate)| rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rate)> {
        self.entries.iter().map(|(c, r)| (c.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Full rate table for one base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: CurrencyCode,
    pub rates: RateMap,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Error document returned by the API, e.g. `unsupported-code` or `invalid-key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub error_type: String,
    pub request: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error: {} for {}", self.error_type, self.request)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
    pub requests_remaining: u64,
    pub plan_quota: Option<u64>,
    pub refresh_day_of_month: Option<u32>,
}

/// The remote exchange rate service.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Latest rates against `base`.
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable>;

    /// Converts `amount` of `from` into `to`.
    async fn convert_pair(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Rate>;

    /// Requests left for the configured API key.
    async fn quota(&self) -> Result<Quota>;

    async fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Rate> {
        let table = self.latest_rates(from).await?;
        table
            .rates
            .get(to.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("No rate found for {} in {} rates", to, from))
    }
}
