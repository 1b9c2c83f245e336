pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod telemetry;

use chrono::{DateTime, Local, TimeZone};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use models::{
    account::{CurrencyConfig, ReferralInfo, WithdrawalReceipt},
    analytics::{PerformanceSummary, TradeList},
    chart::{DayBucket, GrowthPoint, RecentTradeView},
    payment::SessionEvent,
    portfolio::PortfolioSnapshot,
    settings::{AccountContext, ClientConfig},
    timeframe::Timeframe,
    trade::TradeEvent,
};
use providers::{http::HttpAccountApi, traits::AccountApi};
use services::{
    aggregator::TradeSeriesAggregator, history_service::HistoryPager,
    payment_session::PaymentSession, timeframe_cache::TimeframeCache,
    withdrawal_service::WithdrawalService,
};

use errors::CoreError;

/// A pending trade fetch for one timeframe, issued by
/// [`DashboardController::begin_timeframe_fetch`].
///
/// Carries the mount epoch it was issued in so a response that outlives an
/// unmount or account switch can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    pub timeframe: Timeframe,
    epoch: u64,
}

/// What happened to a timeframe selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from the timeframe cache; nothing was fetched.
    Cached,
    /// Fetched, aggregated and stored.
    Applied,
    /// The response arrived after the user moved on and was dropped.
    Discarded,
}

/// Main entry point for the dashboard client core.
///
/// Owns the account snapshot, the derived trade series, the per-timeframe
/// growth cache and at most one live deposit session. The account identity
/// is an explicit [`AccountContext`] supplied at construction.
#[must_use]
pub struct DashboardController {
    api: Arc<dyn AccountApi>,
    context: AccountContext,
    config: ClientConfig,
    aggregator: TradeSeriesAggregator,
    withdrawal_service: WithdrawalService,
    cache: TimeframeCache,
    timeframe: Timeframe,
    /// Bumped on unmount and account switch; in-flight fetches from an
    /// older epoch resolve to no-ops.
    epoch: u64,
    mounted: bool,
    snapshot: Option<PortfolioSnapshot>,
    auto_trading: bool,
    canonical_trades: Vec<TradeEvent>,
    daily_pnl: Vec<DayBucket>,
    recent: Vec<TradeEvent>,
    deposit: Option<PaymentSession>,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("api", &self.api.name())
            .field("timeframe", &self.timeframe)
            .field("cached_timeframes", &self.cache.len())
            .field("mounted", &self.mounted)
            .field("auto_trading", &self.auto_trading)
            .field("deposit", &self.deposit)
            .finish()
    }
}

impl DashboardController {
    /// Create a controller on top of any [`AccountApi`] implementation.
    pub fn new(api: Arc<dyn AccountApi>, context: AccountContext, config: ClientConfig) -> Self {
        Self {
            api,
            context,
            timeframe: Timeframe::default(),
            config,
            aggregator: TradeSeriesAggregator::new(),
            withdrawal_service: WithdrawalService::new(),
            cache: TimeframeCache::new(),
            epoch: 0,
            mounted: false,
            snapshot: None,
            auto_trading: false,
            canonical_trades: Vec::new(),
            daily_pnl: Vec::new(),
            recent: Vec::new(),
            deposit: None,
        }
    }

    /// Create a controller talking HTTP to `config.api_base_url`.
    pub fn with_http(context: AccountContext, config: ClientConfig) -> Self {
        let api = Arc::new(HttpAccountApi::new(&config));
        Self::new(api, context, config)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Load the balance snapshot and the canonical trade list, then make
    /// sure the active timeframe's growth series is available.
    ///
    /// The controller counts as mounted only once the snapshot and the
    /// canonical trades have loaded.
    pub async fn mount(&mut self) -> Result<(), CoreError> {
        info!(timeframe = %self.timeframe, "mounting dashboard");

        self.refresh().await?;
        self.load_canonical_trades().await?;
        self.mounted = true;

        let timeframe = self.timeframe;
        self.select_timeframe(timeframe).await?;
        Ok(())
    }

    /// Re-fetch the balance snapshot only. The timeframe cache and derived
    /// series are left as they are.
    pub async fn refresh(&mut self) -> Result<&PortfolioSnapshot, CoreError> {
        let snapshot = self.api.portfolio(&self.context).await?;
        self.auto_trading = snapshot.auto_trading_active();
        Ok(self.snapshot.insert(snapshot))
    }

    /// Tear down: dispose any deposit session, clear the cache and turn
    /// every in-flight fetch into a no-op.
    pub fn unmount(&mut self) {
        self.cancel_deposit();
        self.cache.invalidate_all();
        self.epoch += 1;
        self.mounted = false;
        info!("dashboard unmounted");
    }

    /// Point the controller at a different account. Everything derived from
    /// the previous account is dropped.
    pub fn switch_account(&mut self, context: AccountContext) {
        if context == self.context {
            return;
        }
        self.cancel_deposit();
        self.cache.invalidate_all();
        self.epoch += 1;
        self.snapshot = None;
        self.auto_trading = false;
        self.canonical_trades.clear();
        self.daily_pnl.clear();
        self.recent.clear();
        self.context = context;
        info!("account context switched");
    }

    // ── Trade series ────────────────────────────────────────────────

    /// Fetch the canonical timeframe once and derive daily PnL and recent
    /// activity from it. Its growth series seeds the cache.
    pub async fn load_canonical_trades(&mut self) -> Result<(), CoreError> {
        let timeframe = self.config.canonical_timeframe;
        let list = self.api.trades(&self.context, timeframe).await?;

        let now = Local::now();
        let series = self.aggregator.aggregate(&list.trades, &now);
        self.cache.set(timeframe, series.growth);
        self.daily_pnl = series.daily_pnl;
        self.recent = series.recent;
        self.canonical_trades = list.trades;
        Ok(())
    }

    /// Make `timeframe` current and ensure its growth series is loaded.
    pub async fn select_timeframe(&mut self, timeframe: Timeframe) -> Result<FetchOutcome, CoreError> {
        let Some(ticket) = self.begin_timeframe_fetch(timeframe) else {
            return Ok(FetchOutcome::Cached);
        };
        let result = self.fetch_trades(&ticket).await;
        self.complete_timeframe_fetch(ticket, result)
    }

    /// First half of a timeframe switch: mark `timeframe` current and, on a
    /// cache miss, hand back a ticket for the fetch.
    ///
    /// Splitting the switch lets a UI keep several fetches in flight and
    /// resolve them in any order through
    /// [`DashboardController::complete_timeframe_fetch`].
    pub fn begin_timeframe_fetch(&mut self, timeframe: Timeframe) -> Option<FetchTicket> {
        self.timeframe = timeframe;
        if self.cache.contains(timeframe) {
            debug!(%timeframe, "timeframe cache hit");
            return None;
        }
        debug!(%timeframe, "timeframe cache miss");
        Some(FetchTicket {
            timeframe,
            epoch: self.epoch,
        })
    }

    /// The network half of a timeframe switch. Owns everything it needs,
    /// so it can run while the controller keeps handling input.
    pub fn fetch_trades(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = Result<TradeList, CoreError>> + Send + 'static {
        let api = Arc::clone(&self.api);
        let context = self.context.clone();
        let timeframe = ticket.timeframe;
        async move { api.trades(&context, timeframe).await }
    }

    /// Last half of a timeframe switch. A response for a timeframe that is
    /// no longer selected, or from before an unmount/account switch, is
    /// discarded whether it succeeded or failed.
    pub fn complete_timeframe_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<TradeList, CoreError>,
    ) -> Result<FetchOutcome, CoreError> {
        if !self.mounted || ticket.epoch != self.epoch || ticket.timeframe != self.timeframe {
            debug!(
                timeframe = %ticket.timeframe,
                current = %self.timeframe,
                "discarding stale timeframe response"
            );
            return Ok(FetchOutcome::Discarded);
        }

        let list = result?;
        let growth = self.aggregator.growth_series(&list.trades, &Local);
        self.cache.set(ticket.timeframe, growth);
        Ok(FetchOutcome::Applied)
    }

    /// Performance summary for a timeframe: the server's when it sends one,
    /// otherwise computed from the trades.
    pub async fn load_performance(
        &self,
        timeframe: Timeframe,
    ) -> Result<(PerformanceSummary, Vec<TradeEvent>), CoreError> {
        let list = self.api.trades(&self.context, timeframe).await?;
        let summary = match list.summary {
            Some(summary) => summary,
            None => self.aggregator.summarize(&list.trades),
        };
        Ok((summary, list.trades))
    }

    // ── Auto trading ────────────────────────────────────────────────

    /// Flip auto trading optimistically. On failure the flag goes back to
    /// exactly what it was before the call and the provider error is returned.
    pub async fn toggle_auto_trading(&mut self) -> Result<bool, CoreError> {
        let previous = self.auto_trading;
        let next = !previous;
        self.auto_trading = next;

        match self.api.set_trading_active(&self.context, next).await {
            Ok(()) => {
                info!(active = next, "auto trading updated");
                Ok(next)
            }
            Err(e) => {
                warn!(error = %e, restored = previous, "auto trading toggle rejected, rolling back");
                self.auto_trading = previous;
                Err(e)
            }
        }
    }

    // ── Deposits ────────────────────────────────────────────────────

    /// Start a new deposit. Any previous session is disposed first, so at
    /// most one set of deposit timers is ever live.
    pub async fn start_deposit(&mut self, amount_usd: f64, currency: &str) -> Result<&PaymentSession, CoreError> {
        self.cancel_deposit();

        let session = PaymentSession::create(
            Arc::clone(&self.api),
            self.context.clone(),
            amount_usd,
            currency,
            &self.config,
        )
        .await?;
        Ok(self.deposit.insert(session))
    }

    /// Wait for the live session's next event. A terminal event disposes
    /// and drops the session before it is returned.
    pub async fn next_deposit_event(&mut self) -> Result<SessionEvent, CoreError> {
        let session = self.deposit.as_mut().ok_or(CoreError::NoActiveSession)?;
        match session.next_event().await {
            Some(event) => {
                if event.is_terminal() {
                    self.cancel_deposit();
                }
                Ok(event)
            }
            None => {
                self.cancel_deposit();
                Err(CoreError::NoActiveSession)
            }
        }
    }

    /// Close the deposit screen. Safe to call with no session.
    pub fn cancel_deposit(&mut self) {
        if let Some(mut session) = self.deposit.take() {
            session.dispose();
        }
    }

    #[must_use]
    pub fn deposit(&self) -> Option<&PaymentSession> {
        self.deposit.as_ref()
    }

    // ── Other account screens ───────────────────────────────────────

    pub async fn load_currencies(&self) -> Result<CurrencyConfig, CoreError> {
        self.api.currencies().await
    }

    pub async fn load_referral(&self) -> Result<ReferralInfo, CoreError> {
        self.api.referral(&self.context).await
    }

    /// Request a withdrawal against the last known balance.
    pub async fn withdraw(&self, amount: f64, network: &str, address: &str) -> Result<WithdrawalReceipt, CoreError> {
        let available = self.snapshot.as_ref().map(|s| s.balance).unwrap_or(0.0);
        self.withdrawal_service
            .submit(self.api.as_ref(), &self.context, amount, available, network, address)
            .await
    }

    /// Estimated payout after the withdrawal fee.
    #[must_use]
    pub fn withdrawal_net_receive(&self, amount: f64, fee_percent: f64) -> f64 {
        self.withdrawal_service.net_receive(amount, fee_percent)
    }

    /// A fresh history pager sized from the config.
    #[must_use]
    pub fn history_pager(&self) -> HistoryPager {
        HistoryPager::new(self.config.history_page_size)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn api(&self) -> &dyn AccountApi {
        self.api.as_ref()
    }

    #[must_use]
    pub fn context(&self) -> &AccountContext {
        &self.context
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&PortfolioSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn auto_trading(&self) -> bool {
        self.auto_trading
    }

    /// Growth series for the current timeframe, once loaded.
    #[must_use]
    pub fn growth(&self) -> Option<&[GrowthPoint]> {
        self.cache.get(self.timeframe)
    }

    #[must_use]
    pub fn cache(&self) -> &TimeframeCache {
        &self.cache
    }

    #[must_use]
    pub fn daily_pnl(&self) -> &[DayBucket] {
        &self.daily_pnl
    }

    #[must_use]
    pub fn recent(&self) -> &[TradeEvent] {
        &self.recent
    }

    /// Recent activity rows, with ages relative to `now`.
    #[must_use]
    pub fn recent_views<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<RecentTradeView> {
        self.aggregator.recent_views(&self.canonical_trades, now)
    }

    #[must_use]
    pub fn canonical_trades(&self) -> &[TradeEvent] {
        &self.canonical_trades
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.cancel_deposit();
    }
}
