use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::trade::Direction;
use crate::errors::CoreError;

/// Transaction history filter, serialized with the service's `type` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Trade,
    Deposit,
    Withdrawal,
    Referral,
}

impl HistoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryFilter::All => "all",
            HistoryFilter::Trade => "trade",
            HistoryFilter::Deposit => "deposit",
            HistoryFilter::Withdrawal => "withdrawal",
            HistoryFilter::Referral => "referral",
        }
    }
}

impl std::fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "trade" => Ok(HistoryFilter::Trade),
            "deposit" => Ok(HistoryFilter::Deposit),
            "withdrawal" | "withdraw" => Ok(HistoryFilter::Withdrawal),
            "referral" => Ok(HistoryFilter::Referral),
            other => Err(CoreError::Validation(format!("Unknown history filter '{other}'"))),
        }
    }
}

/// One row of the transaction history. Which optional fields are present
/// depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(rename = "type")]
    pub kind: String,

    /// `"+"` for credits, anything else for debits
    #[serde(default)]
    pub sign: String,

    /// Pre-formatted signed change, e.g. "+$12.40"
    #[serde(default)]
    pub raw_change: String,

    pub date: chrono::DateTime<chrono::Utc>,

    #[serde(default)]
    pub title: Option<String>,

    // trade rows
    #[serde(default)]
    pub pair: Option<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub leverage: Option<u32>,

    // referral rows
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub from_username: Option<String>,
    #[serde(default)]
    pub from_chat_id: Option<serde_json::Value>,
}

impl HistoryItem {
    pub fn is_positive(&self) -> bool {
        self.sign == "+"
    }

    /// Secondary line shown under the row type.
    pub fn subtitle(&self) -> String {
        match self.kind.as_str() {
            "trade" => format!(
                "{} • {} x{}",
                self.pair.as_deref().unwrap_or(""),
                self.direction.map(|d| d.to_string()).unwrap_or_default(),
                self.leverage.unwrap_or(1),
            ),
            "referral" => {
                let username = self
                    .from_username
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .unwrap_or("User");
                let chat_id = match &self.from_chat_id {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                format!("Level {} • {} • {}", self.level.unwrap_or(1), username, chat_id)
            }
            _ => self.title.clone().unwrap_or_default(),
        }
    }
}

/// One page of history as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}
