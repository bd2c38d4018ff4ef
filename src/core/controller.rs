//! Command handlers behind the three input panels.
//!
//! Each panel owns its input fields and an expiring output message. Handlers
//! read the fields, call the injected [`ExchangeApi`] and write the outcome
//! back to the panel.

use super::config::MessageConfig;
use super::credentials::AdminCredentials;
use super::currency::{ApiError, ExchangeApi, RateTable};
use super::message::{ExpiringMessage, FormField};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const MISSING_PAIR: &str = "Please enter the source and target currencies!";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount!";
pub const MISSING_SOURCE: &str = "Please enter the source currency!";
pub const INVALID_ADMIN: &str = "Invalid admin credentials!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Displaying,
}

/// What a handler did, for front ends that need more than the panel text.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A result was fetched and shown.
    Shown(String),
    /// Full rate table for the presentation layer to render.
    RateTable(RateTable),
    /// Input was rejected before any request was made.
    Rejected(String),
    /// The request failed; the panel shows the reason.
    Failed(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Shown(_) | CommandOutcome::RateTable(_))
    }
}

/// Shared view of a panel's phase, readable while its handler is running.
#[derive(Debug, Clone, Default)]
pub struct PanelStatus {
    pending: Arc<AtomicBool>,
    message: ExpiringMessage,
}

impl PanelStatus {
    fn new(message: &ExpiringMessage) -> Self {
        PanelStatus {
            pending: Arc::new(AtomicBool::new(false)),
            message: message.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.load(Ordering::Acquire) {
            Phase::Pending
        } else if self.message.is_visible() {
            Phase::Displaying
        } else {
            Phase::Idle
        }
    }

    /// Marks the panel pending until the guard drops.
    fn begin(&self) -> PendingGuard {
        self.pending.store(true, Ordering::Release);
        PendingGuard {
            pending: Arc::clone(&self.pending),
        }
    }
}

struct PendingGuard {
    pending: Arc<AtomicBool>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct ConvertPanel {
    pub source: FormField,
    pub target: FormField,
    pub amount: FormField,
    pub result: ExpiringMessage,
    status: PanelStatus,
}

#[derive(Debug)]
pub struct RatePanel {
    pub source: FormField,
    pub target: FormField,
    pub result: ExpiringMessage,
    status: PanelStatus,
}

#[derive(Debug)]
pub struct QuotaPanel {
    pub admin: FormField,
    pub password: FormField,
    pub result: ExpiringMessage,
    status: PanelStatus,
}

impl Default for ConvertPanel {
    fn default() -> Self {
        let result = ExpiringMessage::new();
        ConvertPanel {
            source: FormField::default(),
            target: FormField::default(),
            amount: FormField::default(),
            status: PanelStatus::new(&result),
            result,
        }
    }
}

impl Default for RatePanel {
    fn default() -> Self {
        let result = ExpiringMessage::new();
        RatePanel {
            source: FormField::default(),
            target: FormField::default(),
            status: PanelStatus::new(&result),
            result,
        }
    }
}

impl Default for QuotaPanel {
    fn default() -> Self {
        let result = ExpiringMessage::new();
        QuotaPanel {
            admin: FormField::default(),
            password: FormField::default(),
            status: PanelStatus::new(&result),
            result,
        }
    }
}

impl ConvertPanel {
    pub fn phase(&self) -> Phase {
        self.status.phase()
    }

    pub fn status(&self) -> PanelStatus {
        self.status.clone()
    }
}

impl RatePanel {
    pub fn phase(&self) -> Phase {
        self.status.phase()
    }

    pub fn status(&self) -> PanelStatus {
        self.status.clone()
    }
}

impl QuotaPanel {
    pub fn phase(&self) -> Phase {
        self.status.phase()
    }

    pub fn status(&self) -> PanelStatus {
        self.status.clone()
    }
}

/// Short reason for a failed request, preferring the API's error type.
pub fn failure_reason(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => api_err.error_type.clone(),
        None => err.to_string(),
    }
}

pub struct Controller<A: ExchangeApi> {
    api: A,
    admin: AdminCredentials,
    result_ttl: Duration,
    notice_ttl: Duration,
    pub convert: ConvertPanel,
    pub rate: RatePanel,
    pub quota: QuotaPanel,
}

impl<A: ExchangeApi> Controller<A> {
    pub fn new(api: A, admin: AdminCredentials, messages: &MessageConfig) -> Self {
        Controller {
            api,
            admin,
            result_ttl: messages.result_ttl(),
            notice_ttl: messages.notice_ttl(),
            convert: ConvertPanel::default(),
            rate: RatePanel::default(),
            quota: QuotaPanel::default(),
        }
    }

    fn reject(&self, message: &ExpiringMessage, text: &str) -> CommandOutcome {
        message.show(text, self.notice_ttl);
        CommandOutcome::Rejected(text.to_string())
    }

    fn fail(&self, message: &ExpiringMessage, err: anyhow::Error) -> CommandOutcome {
        warn!(error = %err, "Request failed");
        let reason = failure_reason(&err);
        message.show(format!("Request failed: {reason}"), self.notice_ttl);
        CommandOutcome::Failed(reason)
    }

    /// Converts the amount in the convert panel.
    pub async fn convert(&mut self) -> CommandOutcome {
        let (Some(from), Some(to)) = (self.convert.source.currency(), self.convert.target.currency())
        else {
            return self.reject(&self.convert.result, MISSING_PAIR);
        };
        let Ok(amount) = self.convert.amount.value().trim().parse::<Decimal>() else {
            debug!(amount = self.convert.amount.value(), "Rejected amount");
            return self.reject(&self.convert.result, INVALID_AMOUNT);
        };

        let pending = self.convert.status.begin();
        let result = self.api.convert_pair(&from, &to, amount).await;
        drop(pending);

        match result {
            Ok(converted) => {
                let text = format!("{from} to {to}: {converted}");
                info!("{}", text);
                self.convert.result.show(&text, self.result_ttl);
                self.convert.source.clear();
                self.convert.target.clear();
                self.convert.amount.clear();
                CommandOutcome::Shown(text)
            }
            Err(err) => self.fail(&self.convert.result, err),
        }
    }

    /// Looks up one rate, or the whole table when no target is given.
    pub async fn get_rate(&mut self) -> CommandOutcome {
        let Some(from) = self.rate.source.currency() else {
            return self.reject(&self.rate.result, MISSING_SOURCE);
        };

        let pending = self.rate.status.begin();
        let outcome = match self.rate.target.currency() {
            Some(to) => match self.api.rate(&from, &to).await {
                Ok(rate) => {
                    let text = format!("Exchange rate for {from} to {to}: {rate}");
                    self.rate.result.show(&text, self.result_ttl);
                    self.rate.source.clear();
                    self.rate.target.clear();
                    CommandOutcome::Shown(text)
                }
                Err(err) => self.fail(&self.rate.result, err),
            },
            None => match self.api.latest_rates(&from).await {
                Ok(table) => {
                    debug!(base = %from, count = table.rates.len(), "Fetched rate table");
                    CommandOutcome::RateTable(table)
                }
                Err(err) => self.fail(&self.rate.result, err),
            },
        };
        drop(pending);
        outcome
    }

    /// Checks the API quota, gated on the admin credentials.
    pub async fn check_quota(&mut self) -> CommandOutcome {
        if !self
            .admin
            .verify(self.quota.admin.value(), self.quota.password.value())
        {
            warn!("Rejected quota check with invalid admin credentials");
            return self.reject(&self.quota.result, INVALID_ADMIN);
        }
        self.quota.admin.clear();
        self.quota.password.clear();

        let pending = self.quota.status.begin();
        let result = self.api.quota().await;
        drop(pending);

        match result {
            Ok(quota) => {
                let text = format!("Quota: {} requests remaining", quota.requests_remaining);
                self.quota.result.show(&text, self.notice_ttl);
                CommandOutcome::Shown(text)
            }
            Err(err) => self.fail(&self.quota.result, err),
        }
    }
}
