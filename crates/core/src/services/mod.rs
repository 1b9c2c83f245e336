pub mod aggregator;
pub mod format;
pub mod history_service;
pub mod payment_session;
pub mod timeframe_cache;
pub mod withdrawal_service;
