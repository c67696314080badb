//! Betting API client (sportsbook frontend → Oddsline server).
//!
//! Fixture listings are public. Every account route carries the user's
//! bearer token in the `Authorization` header.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::auth::bearer;
use crate::objects::{
    AccountResponse, BetReceipt, FixtureId, FixtureResponse, PlaceBetRequest, TransactionRequest,
    TransactionResponse,
};

/// Typed HTTP client for the Oddsline **Betting API**.
#[derive(Debug, Clone)]
pub struct BettingClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl BettingClient {
    /// Create an anonymous client. Only the fixture routes work until a
    /// token is attached with [`with_token`](Self::with_token).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token: None,
        }
    }

    /// Attach the account token sent on account routes.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, bearer(token)),
            None => request,
        }
    }

    /// `GET /api/v1/fixtures` – list fixtures with their current odds.
    pub async fn list_fixtures(&self) -> Result<Vec<FixtureResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/fixtures")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/fixtures/{fixture_id}` – fetch one fixture.
    pub async fn get_fixture(&self, fixture_id: &FixtureId) -> Result<FixtureResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/fixtures/{}",
            urlencoding::encode(fixture_id.as_str())
        ))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/bets` – place a single bet.
    pub async fn place_bet(&self, request: &PlaceBetRequest) -> Result<BetReceipt, ClientError> {
        let url = self.base_url.join("/api/v1/bets")?;
        let resp = self
            .authorized(self.http.post(url))
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/bets` – bet history of the authenticated account.
    pub async fn list_bets(&self) -> Result<Vec<BetReceipt>, ClientError> {
        let url = self.base_url.join("/api/v1/bets")?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/account` – balance of the authenticated account.
    pub async fn account(&self) -> Result<AccountResponse, ClientError> {
        let url = self.base_url.join("/api/v1/account")?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/wallet/deposits` – request a deposit.
    pub async fn request_deposit(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self.base_url.join("/api/v1/wallet/deposits")?;
        let resp = self
            .authorized(self.http.post(url))
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/wallet/withdrawals` – request a withdrawal. Funds are
    /// held immediately and returned if the withdrawal is rejected.
    pub async fn request_withdrawal(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self.base_url.join("/api/v1/wallet/withdrawals")?;
        let resp = self
            .authorized(self.http.post(url))
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/wallet/transactions` – deposit and withdrawal history.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/wallet/transactions")?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }
}
