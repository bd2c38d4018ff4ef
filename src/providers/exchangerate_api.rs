use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::core::config::ApiConfig;
use crate::core::currency::{
    ApiError, CurrencyCode, ExchangeApi, Quota, Rate, RateMap, RateTable,
};
use crate::providers::util::{redact, with_retry};

#[derive(Deserialize, Debug)]
struct ApiStatus {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LatestResponse {
    conversion_rates: serde_json::Map<String, serde_json::Value>,
    time_last_update_unix: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PairResponse {
    conversion_result: Rate,
}

#[derive(Deserialize, Debug)]
struct QuotaResponse {
    requests_remaining: u64,
    plan_quota: Option<u64>,
    refresh_day_of_month: Option<u32>,
}

/// Client for the exchangerate-api.com v6 endpoints.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    retries: usize,
    retry_delay_ms: u64,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &ApiConfig, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xrate/1.0")
            .timeout(config.timeout())
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            client,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, request: &str) -> Result<T> {
        let url = format!("{}/v6/{}/{}", self.base_url, self.api_key, endpoint);
        debug!("Requesting {} from {}", request, redact(&url, &self.api_key));

        let response = with_retry(
            || async { self.client.get(&url).send().await.map_err(|e| e.without_url()) },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for {}", e, request))?;

        let status = response.status();
        debug!(%status, "Received response for {}", request);

        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response for {}: {}", request, e.without_url()))?;

        // The API reports bad codes and keys as an error document, with or
        // without an error status.
        if let Ok(ApiStatus {
            result: Some(result),
            error_type,
        }) = serde_json::from_str::<ApiStatus>(&text)
        {
            if result == "error" {
                return Err(ApiError {
                    error_type: error_type.unwrap_or_else(|| "unknown-error".to_string()),
                    request: request.to_string(),
                }
                .into());
            }
        }

        if !status.is_success() {
            return Err(anyhow!("HTTP error: {} for {}", status, request));
        }

        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", request, e))
    }
}

#[async_trait]
impl ExchangeApi for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable> {
        let request = format!("latest rates of {base}");
        let data: LatestResponse = self.fetch(&format!("latest/{base}"), &request).await?;

        let entries = data
            .conversion_rates
            .into_iter()
            .map(|(code, value)| {
                value
                    .as_number()
                    .map(|rate| (code.clone(), Rate::from(rate.clone())))
                    .ok_or_else(|| anyhow!("Invalid rate for {} in {}", code, request))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RateTable {
            base: base.clone(),
            rates: RateMap::new(entries),
            last_updated: data
                .time_last_update_unix
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    #[instrument(name = "PairConversion", skip(self), fields(from = %from, to = %to))]
    async fn convert_pair(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Rate> {
        let request = format!("conversion of {amount} {from} to {to}");
        let data: PairResponse = self
            .fetch(&format!("pair/{from}/{to}/{amount}"), &request)
            .await?;
        Ok(data.conversion_result)
    }

    #[instrument(name = "QuotaFetch", skip(self))]
    async fn quota(&self) -> Result<Quota> {
        let data: QuotaResponse = self.fetch("quota", "quota").await?;
        Ok(Quota {
            requests_remaining: data.requests_remaining,
            plan_quota: data.plan_quota,
            refresh_day_of_month: data.refresh_day_of_month,
        })
    }
}
