use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A named trailing window used to scope trade data.
///
/// Serialized using the wire strings the account service expects
/// (`"24h"`, `"3d"`, `"7d"`, `"1m"`, `"3m"`, `"all"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "3d")]
    ThreeDays,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "3m")]
    Quarter,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// Timeframes offered on the dashboard growth chart.
    pub const DASHBOARD: [Timeframe; 3] = [Timeframe::Week, Timeframe::Month, Timeframe::Quarter];

    /// Timeframes offered on the performance (stats) screen.
    pub const STATS: [Timeframe; 6] = [
        Timeframe::Day,
        Timeframe::ThreeDays,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Quarter,
        Timeframe::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day => "24h",
            Timeframe::ThreeDays => "3d",
            Timeframe::Week => "7d",
            Timeframe::Month => "1m",
            Timeframe::Quarter => "3m",
            Timeframe::All => "all",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(Timeframe::Day),
            "3d" => Ok(Timeframe::ThreeDays),
            "7d" => Ok(Timeframe::Week),
            "1m" => Ok(Timeframe::Month),
            "3m" => Ok(Timeframe::Quarter),
            "all" => Ok(Timeframe::All),
            other => Err(CoreError::Validation(format!("Unknown timeframe '{other}'"))),
        }
    }
}
