use serde::{Deserialize, Serialize};

/// A deposit or withdrawal network, e.g. `{ code: "usdttrc20", label: "USDT TRC20" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOption {
    pub code: String,
    pub label: String,
}

impl CurrencyOption {
    /// Token part of the label ("USDT" for "USDT TRC20").
    pub fn short_label(&self) -> &str {
        self.label.split_whitespace().next().unwrap_or(&self.label)
    }

    pub fn is_popular(&self) -> bool {
        self.code.contains("trc")
    }
}

/// Supported networks and the withdrawal fee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConfig {
    #[serde(default)]
    pub deposit: Vec<CurrencyOption>,

    #[serde(default)]
    pub withdraw: Vec<CurrencyOption>,

    #[serde(default = "default_withdraw_fee")]
    pub withdraw_fee_percent: f64,
}

fn default_withdraw_fee() -> f64 {
    10.0
}

impl CurrencyConfig {
    /// Network preselected on the deposit screen.
    pub fn default_deposit_network(&self) -> Option<&str> {
        self.deposit.first().map(|c| c.code.as_str())
    }

    pub fn default_withdraw_network(&self) -> Option<&str> {
        self.withdraw.first().map(|c| c.code.as_str())
    }
}

/// Referral program info for the current account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralInfo {
    pub code: String,

    pub invite_link: String,

    #[serde(default)]
    pub total_referrals: u64,

    #[serde(default)]
    pub total_earned: f64,
}

impl ReferralInfo {
    pub fn share_text(&self) -> String {
        format!(
            "Join Future Fund using my referral code: {}\n{}",
            self.code, self.invite_link
        )
    }
}

/// A withdrawal as submitted to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: f64,
    pub network: String,
    pub address: String,
}

/// Acknowledgement of a created withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub status: String,
}
