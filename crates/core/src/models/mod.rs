pub mod account;
pub mod analytics;
pub mod chart;
pub mod history;
pub mod payment;
pub mod portfolio;
pub mod settings;
pub mod timeframe;
pub mod trade;
