use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::timeframe::Timeframe;
use crate::errors::CoreError;

pub const DEFAULT_API_BASE: &str = "https://futurefund-api-production.up.railway.app";

/// Client-side settings for talking to the account service and driving
/// the deposit timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the account/trading service
    pub api_base_url: String,

    pub request_timeout_secs: u64,

    /// How often an open deposit is checked with the provider
    pub poll_interval_secs: u64,

    /// Countdown refresh rate
    pub countdown_tick_secs: u64,

    /// Smallest deposit accepted, in USD
    pub min_deposit_usd: f64,

    /// Rows requested per history page
    pub history_page_size: u32,

    /// Timeframe whose trades feed the daily PnL and recent activity views
    pub canonical_timeframe: Timeframe,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 30,
            poll_interval_secs: 8,
            countdown_tick_secs: 1,
            min_deposit_usd: 20.0,
            history_page_size: 20,
            canonical_timeframe: Timeframe::Week,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `FUTUREFUND_API_BASE` and
    /// `FUTUREFUND_REQUEST_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let mut config = Self::default();

        if let Some(base) = lookup("FUTUREFUND_API_BASE") {
            let base = base.trim().trim_end_matches('/').to_string();
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(CoreError::Config(format!(
                    "FUTUREFUND_API_BASE must be an http(s) URL, got '{base}'"
                )));
            }
            config.api_base_url = base;
        }

        if let Some(raw) = lookup("FUTUREFUND_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!(
                    "FUTUREFUND_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_secs(self.countdown_tick_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which account a request targets.
///
/// Supplied by whatever hosts the client: inside the messenger host it
/// carries the signed `init_data`; in a plain browser or tests it carries
/// a `chat_id`. Passed explicitly to every component that talks to the
/// service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountContext {
    pub chat_id: Option<String>,
    pub init_data: Option<String>,
}

impl AccountContext {
    pub fn for_chat(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: Some(chat_id.into()),
            init_data: None,
        }
    }

    pub fn for_host(init_data: impl Into<String>) -> Self {
        Self {
            chat_id: None,
            init_data: Some(init_data.into()),
        }
    }

    /// Query parameters identifying the account.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        self.chat_id
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| ("chatId", id.clone()))
            .collect()
    }

    /// `Authorization` header value, when running inside the host.
    pub fn authorization(&self) -> Option<String> {
        self.init_data
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("tma {d}"))
    }
}
