use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::account::{CurrencyConfig, ReferralInfo, WithdrawalReceipt, WithdrawalRequest};
use crate::models::analytics::TradeList;
use crate::models::history::{HistoryFilter, HistoryPage};
use crate::models::payment::{DepositQuote, DepositStatusReport};
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::settings::AccountContext;
use crate::models::timeframe::Timeframe;

/// Trait abstraction over the remote account/trading service.
///
/// The HTTP client implements it for production; tests plug in mocks.
/// Every call takes the [`AccountContext`] that identifies the account.
/// An `ok: false` answer must be returned as [`CoreError::Provider`] with
/// the service's message unchanged.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Human-readable name of this backend (for logs).
    fn name(&self) -> &str;

    /// Current balance snapshot.
    async fn portfolio(&self, ctx: &AccountContext) -> Result<PortfolioSnapshot, CoreError>;

    /// Switch bot auto trading on or off.
    async fn set_trading_active(&self, ctx: &AccountContext, active: bool) -> Result<(), CoreError>;

    /// Raw trades (and the server's summary) for a timeframe.
    async fn trades(&self, ctx: &AccountContext, timeframe: Timeframe) -> Result<TradeList, CoreError>;

    /// Supported deposit/withdraw networks.
    async fn currencies(&self) -> Result<CurrencyConfig, CoreError>;

    /// Open a deposit with the payment provider.
    async fn create_deposit(
        &self,
        ctx: &AccountContext,
        amount_usd: f64,
        currency: &str,
    ) -> Result<DepositQuote, CoreError>;

    /// Current provider status for a deposit.
    async fn deposit_status(
        &self,
        ctx: &AccountContext,
        payment_id: &str,
    ) -> Result<DepositStatusReport, CoreError>;

    async fn create_withdrawal(
        &self,
        ctx: &AccountContext,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalReceipt, CoreError>;

    async fn referral(&self, ctx: &AccountContext) -> Result<ReferralInfo, CoreError>;

    /// One page of transaction history (`offset`/`limit` pagination).
    async fn history(
        &self,
        ctx: &AccountContext,
        filter: HistoryFilter,
        limit: u32,
        offset: u32,
    ) -> Result<HistoryPage, CoreError>;
}
