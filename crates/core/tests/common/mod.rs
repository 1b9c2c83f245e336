// ═══════════════════════════════════════════════════════════════════
// Shared test helpers — scripted AccountApi mock and trade builders
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futurefund_core::errors::CoreError;
use futurefund_core::models::account::{
    CurrencyConfig, CurrencyOption, ReferralInfo, WithdrawalReceipt, WithdrawalRequest,
};
use futurefund_core::models::analytics::{PerformanceSummary, TradeList};
use futurefund_core::models::history::{HistoryFilter, HistoryItem, HistoryPage};
use futurefund_core::models::payment::{DepositQuote, DepositStatusReport};
use futurefund_core::models::portfolio::{PortfolioSnapshot, TodayPnl};
use futurefund_core::models::settings::AccountContext;
use futurefund_core::models::timeframe::Timeframe;
use futurefund_core::models::trade::{Direction, TradeEvent};
use futurefund_core::providers::traits::AccountApi;

/// One scripted answer from the deposit status endpoint.
#[derive(Debug, Clone)]
pub enum StatusStep {
    Status(&'static str),
    NetworkError,
    ProviderError(&'static str),
}

#[derive(Debug, Default)]
pub struct CallCounts {
    pub portfolio: AtomicUsize,
    pub toggle: AtomicUsize,
    pub trades: AtomicUsize,
    pub create_deposit: AtomicUsize,
    pub deposit_status: AtomicUsize,
    pub withdrawal: AtomicUsize,
    pub history: AtomicUsize,
}

impl CallCounts {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Account service mock. Every endpoint counts its calls; answers are
/// configured through the public mutex fields.
pub struct MockAccountApi {
    pub calls: CallCounts,
    pub snapshot: Mutex<PortfolioSnapshot>,
    pub portfolio_error: Mutex<Option<String>>,
    pub trades: Mutex<HashMap<Timeframe, Vec<TradeEvent>>>,
    pub server_summary: Mutex<Option<PerformanceSummary>>,
    pub toggle_error: Mutex<Option<String>>,
    pub deposit_error: Mutex<Option<String>>,
    pub expires_in: Mutex<Duration>,
    pub statuses: Mutex<VecDeque<StatusStep>>,
    pub history: Mutex<Vec<HistoryItem>>,
    pub last_history_request: Mutex<Option<(HistoryFilter, u32, u32)>>,
    pub last_withdrawal: Mutex<Option<WithdrawalRequest>>,
}

impl MockAccountApi {
    pub fn new() -> Self {
        Self {
            calls: CallCounts::default(),
            snapshot: Mutex::new(PortfolioSnapshot {
                balance: 100.0,
                today_pnl: TodayPnl {
                    amount: 1.5,
                    percent: 1.5,
                },
                trading_status: "active".into(),
                ..PortfolioSnapshot::default()
            }),
            portfolio_error: Mutex::new(None),
            trades: Mutex::new(HashMap::new()),
            server_summary: Mutex::new(None),
            toggle_error: Mutex::new(None),
            deposit_error: Mutex::new(None),
            expires_in: Mutex::new(Duration::minutes(30)),
            statuses: Mutex::new(VecDeque::new()),
            history: Mutex::new(Vec::new()),
            last_history_request: Mutex::new(None),
            last_withdrawal: Mutex::new(None),
        }
    }

    pub fn with_trades(self, timeframe: Timeframe, trades: Vec<TradeEvent>) -> Self {
        self.trades.lock().unwrap().insert(timeframe, trades);
        self
    }

    pub fn with_statuses(self, steps: Vec<StatusStep>) -> Self {
        *self.statuses.lock().unwrap() = steps.into();
        self
    }

    pub fn with_expiry(self, expires_in: Duration) -> Self {
        *self.expires_in.lock().unwrap() = expires_in;
        self
    }

    pub fn with_history(self, count: usize) -> Self {
        let base = Utc::now();
        let items = (0..count)
            .map(|i| HistoryItem {
                id: Some(serde_json::json!(i)),
                kind: "deposit".into(),
                sign: "+".into(),
                raw_change: format!("+${i}.00"),
                date: base - Duration::hours(i as i64),
                title: Some(format!("Deposit #{i}")),
                pair: None,
                direction: None,
                leverage: None,
                level: None,
                from_username: None,
                from_chat_id: None,
            })
            .collect();
        *self.history.lock().unwrap() = items;
        self
    }

    pub fn status_calls(&self) -> usize {
        CallCounts::get(&self.calls.deposit_status)
    }

    pub fn trade_calls(&self) -> usize {
        CallCounts::get(&self.calls.trades)
    }

    pub fn create_calls(&self) -> usize {
        CallCounts::get(&self.calls.create_deposit)
    }
}

#[async_trait]
impl AccountApi for MockAccountApi {
    fn name(&self) -> &str {
        "MockAccountApi"
    }

    async fn portfolio(&self, _ctx: &AccountContext) -> Result<PortfolioSnapshot, CoreError> {
        self.calls.portfolio.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.portfolio_error.lock().unwrap().clone() {
            return Err(CoreError::Provider(message));
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn set_trading_active(&self, _ctx: &AccountContext, active: bool) -> Result<(), CoreError> {
        self.calls.toggle.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.toggle_error.lock().unwrap().clone() {
            return Err(CoreError::Provider(message));
        }
        self.snapshot.lock().unwrap().trading_status =
            if active { "active".into() } else { "paused".into() };
        Ok(())
    }

    async fn trades(&self, _ctx: &AccountContext, timeframe: Timeframe) -> Result<TradeList, CoreError> {
        self.calls.trades.fetch_add(1, Ordering::SeqCst);
        Ok(TradeList {
            summary: self.server_summary.lock().unwrap().clone(),
            trades: self
                .trades
                .lock()
                .unwrap()
                .get(&timeframe)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn currencies(&self) -> Result<CurrencyConfig, CoreError> {
        Ok(CurrencyConfig {
            deposit: vec![
                CurrencyOption {
                    code: "usdttrc20".into(),
                    label: "USDT TRC20".into(),
                },
                CurrencyOption {
                    code: "usdterc20".into(),
                    label: "USDT ERC20".into(),
                },
            ],
            withdraw: vec![CurrencyOption {
                code: "usdttrc20".into(),
                label: "USDT TRC20".into(),
            }],
            withdraw_fee_percent: 10.0,
        })
    }

    async fn create_deposit(
        &self,
        _ctx: &AccountContext,
        amount_usd: f64,
        currency: &str,
    ) -> Result<DepositQuote, CoreError> {
        let n = self.calls.create_deposit.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = self.deposit_error.lock().unwrap().clone() {
            return Err(CoreError::Provider(message));
        }
        Ok(DepositQuote {
            payment_id: format!("pay-{n}"),
            pay_amount: serde_json::json!(amount_usd),
            pay_currency: currency.to_string(),
            address: "TXmockAddress".into(),
            expires_at: Utc::now() + *self.expires_in.lock().unwrap(),
        })
    }

    async fn deposit_status(
        &self,
        _ctx: &AccountContext,
        _payment_id: &str,
    ) -> Result<DepositStatusReport, CoreError> {
        self.calls.deposit_status.fetch_add(1, Ordering::SeqCst);
        let step = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StatusStep::Status("waiting"));
        match step {
            StatusStep::Status(status) => Ok(DepositStatusReport {
                status: status.to_string(),
            }),
            StatusStep::NetworkError => Err(CoreError::Network("connection reset".into())),
            StatusStep::ProviderError(message) => Err(CoreError::Provider(message.into())),
        }
    }

    async fn create_withdrawal(
        &self,
        _ctx: &AccountContext,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalReceipt, CoreError> {
        self.calls.withdrawal.fetch_add(1, Ordering::SeqCst);
        *self.last_withdrawal.lock().unwrap() = Some(request.clone());
        Ok(WithdrawalReceipt {
            status: "pending".into(),
        })
    }

    async fn referral(&self, _ctx: &AccountContext) -> Result<ReferralInfo, CoreError> {
        Ok(ReferralInfo {
            code: "FF123".into(),
            invite_link: "https://t.me/futurefund_bot?start=FF123".into(),
            total_referrals: 2,
            total_earned: 4.5,
        })
    }

    async fn history(
        &self,
        _ctx: &AccountContext,
        filter: HistoryFilter,
        limit: u32,
        offset: u32,
    ) -> Result<HistoryPage, CoreError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        *self.last_history_request.lock().unwrap() = Some((filter, limit, offset));
        let items = self.history.lock().unwrap();
        let items = items
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(HistoryPage { items })
    }
}

pub fn ctx() -> AccountContext {
    AccountContext::for_chat("424242")
}

/// Trade with distinct shown and impact percentages (shown = impact * 10).
pub fn trade(id: &str, date: DateTime<Utc>, impact: f64) -> TradeEvent {
    TradeEvent {
        id: id.to_string(),
        date,
        pair: "BTCUSDT".into(),
        direction: Direction::Long,
        leverage: 10,
        shown_return_pct: impact * 10.0,
        portfolio_impact_pct: impact,
    }
}
