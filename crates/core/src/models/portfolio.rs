use serde::{Deserialize, Serialize};

/// PnL for the current day as reported by the account service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayPnl {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub percent: f64,
}

/// Balance snapshot for one account. Missing numeric fields default to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub balance: f64,

    #[serde(default)]
    pub today_pnl: TodayPnl,

    /// All-time net profit in USD
    #[serde(default)]
    pub estimated_net_profit: f64,

    #[serde(default)]
    pub estimated_net_profit_pct: f64,

    #[serde(default)]
    pub total_deposits: f64,

    #[serde(default)]
    pub total_withdrawals: f64,

    #[serde(default)]
    pub total_referral_rewards: f64,

    /// `"active"` when auto trading is on
    #[serde(default)]
    pub trading_status: String,
}

impl PortfolioSnapshot {
    pub fn auto_trading_active(&self) -> bool {
        self.trading_status == "active"
    }
}
