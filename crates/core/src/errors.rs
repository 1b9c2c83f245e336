use thiserror::Error;

/// Error type shared by the account client, the deposit session and the
/// dashboard controller.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local validation ────────────────────────────────────────────
    /// Rejected before any request was sent (e.g. deposit below minimum).
    #[error("{0}")]
    Validation(String),

    // ── API / Network ───────────────────────────────────────────────
    /// The account service answered `ok: false`. The message is the
    /// service's own `error` field, unchanged.
    #[error("{0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Setup ───────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Deposit flow ────────────────────────────────────────────────
    #[error("No active deposit session")]
    NoActiveSession,
}

impl CoreError {
    /// `true` for failures that happened on the wire or at the provider,
    /// as opposed to local validation.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CoreError::Provider(_) | CoreError::Network(_) | CoreError::Deserialization(_)
        )
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // The URL may carry the chatId query parameter; keep it out of messages.
        let stage = if e.is_timeout() {
            "timed out"
        } else if e.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        CoreError::Network(format!("{stage}: {}", e.without_url()))
    }
}
