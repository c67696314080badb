//! Bet submission.
//!
//! Submission runs in two phases:
//!
//! 1. [`prepare_submission`] validates the slip against the account
//!    locally. Nothing is sent if it fails.
//! 2. [`BetSubmitter::submit`] sends one bet per staked selection, in slip
//!    order. Accepted selections leave the slip; rejected ones stay so the
//!    user can correct them. A fully accepted slip is cleared.

use kanau::processor::Processor;
use oddsline_sdk::client::{BettingClient, ClientError};
use oddsline_sdk::objects::{AccountResponse, BetReceipt, PlaceBetRequest, SelectionKey};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::store::BetSlip;

/// Validation failures detected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("please sign in to place bets")]
    NotAuthenticated,

    #[error("enter a stake before placing bets")]
    NoStake,

    #[error("total stake {total} exceeds your balance of {balance}")]
    ExceedsBalance { total: Decimal, balance: Decimal },

    #[error("stake on {0} is too large")]
    StakeTooLarge(SelectionKey),
}

/// The part of the signed-in account submission needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub account_id: Uuid,
    pub balance: Decimal,
}

impl From<&AccountResponse> for AccountSnapshot {
    fn from(account: &AccountResponse) -> Self {
        Self {
            account_id: account.account_id,
            balance: account.balance,
        }
    }
}

/// Validate the slip and build one request per selection with a non-zero
/// stake.
pub fn prepare_submission(
    slip: &BetSlip,
    account: Option<&AccountSnapshot>,
) -> Result<Vec<PlaceBetRequest>, SubmissionError> {
    let account = account.ok_or(SubmissionError::NotAuthenticated)?;

    let total = slip.total_stake();
    if total <= Decimal::ZERO {
        return Err(SubmissionError::NoStake);
    }
    if total > account.balance {
        return Err(SubmissionError::ExceedsBalance {
            total,
            balance: account.balance,
        });
    }

    slip.selections()
        .iter()
        .filter(|s| s.effective_stake() > Decimal::ZERO)
        .map(|s| {
            PlaceBetRequest::new(s.fixture_id.clone(), s.market, s.odds, s.effective_stake())
                .ok_or_else(|| SubmissionError::StakeTooLarge(s.key()))
        })
        .collect()
}

/// A selection the server refused, with the reason to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSelection {
    pub key: SelectionKey,
    pub reason: String,
}

/// Outcome of a submission that passed local validation.
#[derive(Debug, Clone, Default)]
pub struct SubmissionReport {
    pub placed: Vec<BetReceipt>,
    pub rejected: Vec<RejectedSelection>,
}

impl SubmissionReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Sends validated bets through a gateway and reconciles the slip.
pub struct BetSubmitter<G> {
    gateway: G,
}

impl<G> BetSubmitter<G>
where
    G: Processor<PlaceBetRequest, Output = BetReceipt>,
    G::Error: std::fmt::Display,
{
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate and submit the slip.
    ///
    /// Returns `Err` only for local validation failures, in which case the
    /// slip is untouched. Server rejections are reported per selection in
    /// the [`SubmissionReport`].
    pub async fn submit(
        &self,
        slip: &mut BetSlip,
        account: Option<&AccountSnapshot>,
    ) -> Result<SubmissionReport, SubmissionError> {
        let requests = prepare_submission(slip, account)?;
        let mut report = SubmissionReport::default();

        for request in requests {
            let key = SelectionKey::new(request.fixture_id.clone(), request.market);
            match self.gateway.process(request).await {
                Ok(receipt) => {
                    info!(
                        bet_id = %receipt.bet_id,
                        selection = %key,
                        stake = %receipt.stake,
                        "Bet placed"
                    );
                    slip.remove(&key.fixture_id, key.market);
                    report.placed.push(receipt);
                }
                Err(e) => {
                    warn!(selection = %key, error = %e, "Bet rejected");
                    report.rejected.push(RejectedSelection {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.is_complete() {
            slip.clear();
        }

        Ok(report)
    }
}

/// Why the server did not accept a bet.
#[derive(Debug, Error)]
pub enum BetRejection {
    /// The server refused the bet; the message is meant for the user.
    #[error("{0}")]
    Refused(String),

    #[error("could not reach the betting service: {0}")]
    Transport(ClientError),
}

impl From<ClientError> for BetRejection {
    fn from(err: ClientError) -> Self {
        match err.rejection_reason() {
            Some(reason) if !reason.is_empty() => BetRejection::Refused(reason.to_owned()),
            _ => BetRejection::Transport(err),
        }
    }
}

/// Places bets through the Oddsline HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBetGateway {
    client: BettingClient,
}

impl HttpBetGateway {
    /// `client` must carry the account token.
    pub fn new(client: BettingClient) -> Self {
        Self { client }
    }
}

impl Processor<PlaceBetRequest> for HttpBetGateway {
    type Output = BetReceipt;
    type Error = BetRejection;
    #[tracing::instrument(skip_all, err, name = "HTTP:PlaceBet")]
    async fn process(&self, request: PlaceBetRequest) -> Result<BetReceipt, BetRejection> {
        Ok(self.client.place_bet(&request).await?)
    }
}
