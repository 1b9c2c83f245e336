use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a deposit attempt.
///
/// `AwaitingPayment` is entered as soon as the provider accepts the
/// request; every other variant is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    AwaitingPayment,
    Finished,
    Expired,
    Refunded,
    Failed,
}

impl PaymentStatus {
    /// Map a provider status string. Anything that is not one of the four
    /// terminal statuses (e.g. "waiting", "confirming", "partially_paid")
    /// means the payment is still open.
    pub fn from_provider(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "finished" => PaymentStatus::Finished,
            "expired" => PaymentStatus::Expired,
            "refunded" => PaymentStatus::Refunded,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::AwaitingPayment,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::AwaitingPayment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::AwaitingPayment => "awaiting_payment",
            PaymentStatus::Finished => "finished",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment instructions returned when a deposit is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositQuote {
    /// Provider payment identifier
    pub payment_id: String,

    /// Exact amount to send, as the provider formats it
    pub pay_amount: serde_json::Value,

    pub pay_currency: String,

    /// Destination address
    pub address: String,

    pub expires_at: DateTime<Utc>,
}

impl DepositQuote {
    /// The amount to send as text, regardless of whether the provider
    /// encoded it as a JSON number or string.
    pub fn pay_amount_text(&self) -> String {
        match &self.pay_amount {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Status of a deposit as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositStatusReport {
    pub status: String,
}

/// Notification emitted by a running deposit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Countdown tick: `"{m}m {s}s"` while open, `"Expired"` once past
    Countdown(String),
    /// The provider confirmed the deposit
    Completed,
    /// The provider reported a failed terminal status
    Terminated(PaymentStatus),
}

impl SessionEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::Completed | SessionEvent::Terminated(_))
    }

    /// User-facing message for terminal failures.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            SessionEvent::Terminated(status) => {
                Some(format!("Deposit {status}. Please create a new one."))
            }
            _ => None,
        }
    }
}
