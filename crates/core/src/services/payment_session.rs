use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::payment::{DepositQuote, PaymentStatus, SessionEvent};
use crate::models::settings::{AccountContext, ClientConfig};
use crate::providers::traits::AccountApi;
use crate::services::format::format_countdown;

/// Countdown text once the quote has expired.
pub const EXPIRED_LABEL: &str = "Expired";

#[derive(Debug)]
struct SessionState {
    status: PaymentStatus,
    countdown: Option<String>,
    disposed: bool,
}

/// One deposit attempt, from creation to a terminal status.
///
/// While open, the session owns two background timers:
/// - a countdown that ticks every `countdown_tick` until `expires_at`, then
///   reports [`EXPIRED_LABEL`] and stops;
/// - a status poll every `poll_interval` that ends the session on a terminal
///   provider status and shrugs off every other answer, errors included.
///
/// Both timers are aborted by [`PaymentSession::dispose`], which also runs
/// on drop, so no exit path leaves a timer behind. Disposal is idempotent.
/// Progress is observed through [`PaymentSession::next_event`].
pub struct PaymentSession {
    quote: DepositQuote,
    state: Arc<Mutex<SessionState>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    shutdown: Arc<watch::Sender<bool>>,
    countdown_tick: Duration,
    poll_interval: Duration,
    countdown_task: Option<JoinHandle<()>>,
    poll_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PaymentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("PaymentSession")
            .field("payment_id", &self.quote.payment_id)
            .field("status", &state.status)
            .field("countdown", &state.countdown)
            .field("disposed", &state.disposed)
            .finish()
    }
}

/// Local checks run before a deposit request is sent.
pub fn validate_deposit(amount_usd: f64, currency: &str, min_deposit_usd: f64) -> Result<(), CoreError> {
    if !amount_usd.is_finite() || amount_usd < min_deposit_usd {
        return Err(CoreError::Validation(format!(
            "Minimum deposit is ${min_deposit_usd}"
        )));
    }
    if currency.trim().is_empty() {
        return Err(CoreError::Validation("Select a network".to_string()));
    }
    Ok(())
}

impl PaymentSession {
    /// Validate locally, create the deposit with the provider, and start
    /// both timers.
    ///
    /// Validation failures never reach the network. Provider failures are
    /// returned unchanged. Must be called from within a tokio runtime.
    pub async fn create(
        api: Arc<dyn AccountApi>,
        ctx: AccountContext,
        amount_usd: f64,
        currency: &str,
        config: &ClientConfig,
    ) -> Result<Self, CoreError> {
        validate_deposit(amount_usd, currency, config.min_deposit_usd)?;

        let quote = api.create_deposit(&ctx, amount_usd, currency).await?;
        info!(
            payment_id = %quote.payment_id,
            amount_usd,
            currency,
            expires_at = %quote.expires_at,
            "deposit session created"
        );

        Ok(Self::start(api, ctx, quote, config))
    }

    /// Begin tracking an already-created deposit.
    pub fn start(
        api: Arc<dyn AccountApi>,
        ctx: AccountContext,
        quote: DepositQuote,
        config: &ClientConfig,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (shutdown, _) = watch::channel(false);

        let mut session = Self {
            quote,
            state: Arc::new(Mutex::new(SessionState {
                status: PaymentStatus::AwaitingPayment,
                countdown: None,
                disposed: false,
            })),
            events_tx,
            events,
            shutdown: Arc::new(shutdown),
            countdown_tick: config.countdown_tick(),
            poll_interval: config.poll_interval(),
            countdown_task: None,
            poll_task: None,
        };
        session.start_countdown();
        session.start_polling(api, ctx);
        session
    }

    /// (Re)start the countdown toward `expires_at`. Replaces any running
    /// countdown; does nothing once the session is closed.
    pub fn start_countdown(&mut self) {
        if !self.is_active() {
            return;
        }
        if let Some(previous) = self.countdown_task.take() {
            previous.abort();
        }
        self.countdown_task = Some(tokio::spawn(run_countdown(
            self.quote.expires_at,
            self.countdown_tick,
            Arc::clone(&self.state),
            self.events_tx.clone(),
            self.shutdown.subscribe(),
        )));
    }

    /// (Re)start status polling. Replaces any running poll; does nothing
    /// once the session is closed.
    pub fn start_polling(&mut self, api: Arc<dyn AccountApi>, ctx: AccountContext) {
        if !self.is_active() {
            return;
        }
        if let Some(previous) = self.poll_task.take() {
            previous.abort();
        }
        self.poll_task = Some(tokio::spawn(run_poll(
            api,
            ctx,
            self.quote.payment_id.clone(),
            self.poll_interval,
            Arc::clone(&self.state),
            self.events_tx.clone(),
            Arc::clone(&self.shutdown),
        )));
    }

    /// Stop both timers and close the session. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        {
            let mut state = self.lock_state();
            if state.disposed {
                return;
            }
            state.disposed = true;
        }

        self.shutdown.send_replace(true);
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        info!(payment_id = %self.quote.payment_id, status = %self.status(), "deposit session disposed");
    }

    /// Wait for the next countdown tick or status change.
    ///
    /// Returns `None` once the session is closed and every pending event has
    /// been delivered.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        {
            let state = Arc::clone(&self.state);
            let guard = state.lock().unwrap_or_else(|e| e.into_inner());
            if guard.disposed || guard.status.is_terminal() {
                return self.events.try_recv().ok();
            }
        }
        self.events.recv().await
    }

    /// Non-blocking variant of [`PaymentSession::next_event`].
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    pub fn quote(&self) -> &DepositQuote {
        &self.quote
    }

    pub fn payment_id(&self) -> &str {
        &self.quote.payment_id
    }

    pub fn status(&self) -> PaymentStatus {
        self.lock_state().status
    }

    /// Latest countdown text, if the first tick has run.
    pub fn countdown(&self) -> Option<String> {
        self.lock_state().countdown.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.lock_state().disposed
    }

    /// Neither disposed nor in a terminal status.
    pub fn is_active(&self) -> bool {
        let state = self.lock_state();
        !state.disposed && !state.status.is_terminal()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn polling(&self) -> bool {
        self.poll_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for PaymentSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Map a wall-clock expiry onto the runtime clock once, so every tick
/// measures against the same deadline.
fn deadline_for(expires_at: DateTime<Utc>) -> Instant {
    let remaining = (expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    Instant::now() + remaining
}

async fn run_countdown(
    expires_at: DateTime<Utc>,
    tick: Duration,
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let deadline = deadline_for(expires_at);
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        if *shutdown.borrow() {
            break;
        }

        let now = Instant::now();
        let expired = now >= deadline;
        let text = if expired {
            EXPIRED_LABEL.to_string()
        } else {
            format_countdown(deadline - now)
        };

        {
            let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
            // nothing follows the terminal event
            if guard.disposed {
                break;
            }
            guard.countdown = Some(text.clone());
            if events.send(SessionEvent::Countdown(text)).is_err() {
                break;
            }
        }
        if expired {
            debug!("deposit countdown reached expiry");
            break;
        }
    }
}

async fn run_poll(
    api: Arc<dyn AccountApi>,
    ctx: AccountContext,
    payment_id: String,
    period: Duration,
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    shutdown: Arc<watch::Sender<bool>>,
) {
    let mut stop = shutdown.subscribe();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = ticker.tick() => {}
        }
        if *stop.borrow() {
            break;
        }

        let report = match api.deposit_status(&ctx, &payment_id).await {
            Ok(report) => report,
            Err(e) => {
                warn!(%payment_id, error = %e, "deposit status check failed, retrying next tick");
                continue;
            }
        };

        let status = PaymentStatus::from_provider(&report.status);
        if !status.is_terminal() {
            debug!(%payment_id, provider_status = %report.status, "deposit still open");
            continue;
        }

        {
            // Status and event change together so a reader that sees the
            // terminal status also finds the event queued.
            let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
            if guard.disposed {
                break;
            }
            guard.status = status;
            guard.disposed = true;
            let event = match status {
                PaymentStatus::Finished => SessionEvent::Completed,
                other => SessionEvent::Terminated(other),
            };
            let _ = events.send(event);
        }
        info!(%payment_id, %status, "deposit reached terminal status");

        // stops the countdown too; the caller's later dispose() is a no-op
        shutdown.send_replace(true);
        break;
    }
}
