use tracing::info;

use crate::errors::CoreError;
use crate::models::account::{WithdrawalReceipt, WithdrawalRequest};
use crate::models::settings::AccountContext;
use crate::providers::traits::AccountApi;
use crate::services::format::round2;

/// Smallest withdrawal accepted, in USD.
pub const MIN_WITHDRAWAL_USD: f64 = 1.0;

/// Validates and submits withdrawals.
///
/// Checks run in the same order the form reports them, and a failing
/// check means no request is sent.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalService;

impl WithdrawalService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        amount: f64,
        available_balance: f64,
        network: &str,
        address: &str,
    ) -> Result<(), CoreError> {
        if !amount.is_finite() || amount < MIN_WITHDRAWAL_USD {
            return Err(CoreError::Validation("Enter a valid amount".into()));
        }
        if amount > available_balance {
            return Err(CoreError::Validation("Amount exceeds available balance".into()));
        }
        if address.trim().is_empty() {
            return Err(CoreError::Validation("Enter a wallet address".into()));
        }
        if network.trim().is_empty() {
            return Err(CoreError::Validation("Select a network".into()));
        }
        Ok(())
    }

    /// Estimated amount received after the percentage fee, rounded for display.
    /// Invalid input yields 0.
    pub fn net_receive(&self, amount: f64, fee_percent: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 || !fee_percent.is_finite() {
            return 0.0;
        }
        round2((amount * (1.0 - fee_percent / 100.0)).max(0.0))
    }

    pub async fn submit(
        &self,
        api: &dyn AccountApi,
        ctx: &AccountContext,
        amount: f64,
        available_balance: f64,
        network: &str,
        address: &str,
    ) -> Result<WithdrawalReceipt, CoreError> {
        self.validate(amount, available_balance, network, address)?;

        let request = WithdrawalRequest {
            amount,
            network: network.trim().to_string(),
            address: address.trim().to_string(),
        };
        let receipt = api.create_withdrawal(ctx, &request).await?;
        info!(amount, network = %request.network, status = %receipt.status, "withdrawal created");
        Ok(receipt)
    }
}
