//! Admin API client (back office → Oddsline server).
//!
//! All requests carry the plaintext admin secret in the
//! `Oddsline-Admin-Authorization` header.

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, parse_response};
use crate::auth::ADMIN_AUTH_HEADER;
use crate::objects::{FixtureId, FixtureResponse, TransactionResponse, UpdateOddsRequest};

/// Typed HTTP client for the Oddsline **Admin API**.
///
/// Authentication uses a plaintext secret verified server-side against an
/// argon2-hashed value.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    admin_secret: String,
}

impl AdminClient {
    /// Create a new `AdminClient`.
    ///
    /// * `base_url` – root URL of the Oddsline server.
    /// * `admin_secret` – the plaintext admin secret.
    pub fn new(base_url: Url, admin_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            admin_secret: admin_secret.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `PUT /api/v1/admin/fixtures/{fixture_id}/odds` – publish new odds for
    /// one market. Connected live clients are notified.
    pub async fn update_odds(
        &self,
        fixture_id: &FixtureId,
        request: &UpdateOddsRequest,
    ) -> Result<FixtureResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/admin/fixtures/{}/odds",
            urlencoding::encode(fixture_id.as_str())
        ))?;

        let resp = self
            .http
            .put(url)
            .header(ADMIN_AUTH_HEADER, &self.admin_secret)
            .json(request)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/v1/admin/transactions/{transaction_id}/complete`.
    pub async fn complete_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<TransactionResponse, ClientError> {
        self.settle(transaction_id, "complete").await
    }

    /// `POST /api/v1/admin/transactions/{transaction_id}/reject`.
    pub async fn reject_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<TransactionResponse, ClientError> {
        self.settle(transaction_id, "reject").await
    }

    async fn settle(
        &self,
        transaction_id: Uuid,
        action: &str,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/admin/transactions/{transaction_id}/{action}"
        ))?;

        let resp = self
            .http
            .post(url)
            .header(ADMIN_AUTH_HEADER, &self.admin_secret)
            .send()
            .await?;

        parse_response(resp).await
    }
}
