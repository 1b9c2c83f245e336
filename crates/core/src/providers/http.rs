use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::account::{CurrencyConfig, ReferralInfo, WithdrawalReceipt, WithdrawalRequest};
use crate::models::analytics::TradeList;
use crate::models::history::{HistoryFilter, HistoryPage};
use crate::models::payment::{DepositQuote, DepositStatusReport};
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::settings::{AccountContext, ClientConfig};
use crate::models::timeframe::Timeframe;
use super::traits::AccountApi;

const GENERIC_FAILURE: &str = "Request failed";

/// HTTP client for the FutureFund account service.
///
/// - **Auth**: `Authorization: tma <init_data>` inside the host, or a
///   `chatId` query parameter otherwise (see [`AccountContext`]).
/// - **Envelope**: every response is `{ "ok": bool, "error"?: string, ...body }`.
pub struct HttpAccountApi {
    client: Client,
    base_url: String,
}

impl HttpAccountApi {
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder, ctx: &AccountContext) -> RequestBuilder {
        let request = request.query(&ctx.query_params());
        match ctx.authorization() {
            Some(value) => request.header(reqwest::header::AUTHORIZATION, value),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CoreError> {
        // Non-2xx answers still carry the envelope, so the body is parsed
        // regardless of status.
        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            CoreError::Deserialization(format!("Invalid response body (HTTP {status}): {e}"))
        })?;
        unwrap_envelope(body)
    }
}

/// Check the `ok` flag of a response envelope and decode the body.
///
/// `ok: false` becomes [`CoreError::Provider`] carrying the `error` field
/// verbatim. A missing `ok` flag is treated as a failure.
pub fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> Result<T, CoreError> {
    let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if !ok {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE)
            .to_string();
        return Err(CoreError::Provider(message));
    }
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    fn name(&self) -> &str {
        "FutureFund"
    }

    async fn portfolio(&self, ctx: &AccountContext) -> Result<PortfolioSnapshot, CoreError> {
        let request = self.authorize(self.client.get(self.url("/api/user/portfolio")), ctx);
        self.send(request).await
    }

    async fn set_trading_active(&self, ctx: &AccountContext, active: bool) -> Result<(), CoreError> {
        let request = self
            .client
            .post(self.url("/api/user/trading/toggle"))
            .json(&json!({ "active": active }));
        let _: Value = self.send(self.authorize(request, ctx)).await?;
        Ok(())
    }

    async fn trades(&self, ctx: &AccountContext, timeframe: Timeframe) -> Result<TradeList, CoreError> {
        debug!(%timeframe, "fetching trades");
        let request = self
            .client
            .get(self.url("/api/stats"))
            .query(&[("timeframe", timeframe.as_str())]);
        self.send(self.authorize(request, ctx)).await
    }

    async fn currencies(&self) -> Result<CurrencyConfig, CoreError> {
        self.send(self.client.get(self.url("/api/config/currencies")))
            .await
    }

    async fn create_deposit(
        &self,
        ctx: &AccountContext,
        amount_usd: f64,
        currency: &str,
    ) -> Result<DepositQuote, CoreError> {
        let request = self
            .client
            .post(self.url("/api/deposit/create"))
            .json(&json!({ "amountUsd": amount_usd, "currency": currency }));
        self.send(self.authorize(request, ctx)).await
    }

    async fn deposit_status(
        &self,
        ctx: &AccountContext,
        payment_id: &str,
    ) -> Result<DepositStatusReport, CoreError> {
        let request = self
            .client
            .get(self.url(&format!("/api/deposit/status/{payment_id}")));
        self.send(self.authorize(request, ctx)).await
    }

    async fn create_withdrawal(
        &self,
        ctx: &AccountContext,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalReceipt, CoreError> {
        let http = self.client.post(self.url("/api/withdraw/create")).json(request);
        self.send(self.authorize(http, ctx)).await
    }

    async fn referral(&self, ctx: &AccountContext) -> Result<ReferralInfo, CoreError> {
        let request = self.authorize(self.client.get(self.url("/api/user/referral")), ctx);
        self.send(request).await
    }

    async fn history(
        &self,
        ctx: &AccountContext,
        filter: HistoryFilter,
        limit: u32,
        offset: u32,
    ) -> Result<HistoryPage, CoreError> {
        let request = self.client.get(self.url("/api/user/history")).query(&[
            ("type", filter.as_str().to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);
        self.send(self.authorize(request, ctx)).await
    }
}
