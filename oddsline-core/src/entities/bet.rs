use kanau::processor::Processor;
use oddsline_sdk::objects::{BetReceipt, BetStatus, FixtureId, Market, PlaceBetRequest, potential_win};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::LedgerError;
use crate::framework::LedgerProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetRecord {
    pub bet_id: Uuid,
    pub account_id: Uuid,
    pub fixture_id: FixtureId,
    pub market: Market,
    pub odds: Decimal,
    pub stake: Decimal,
    pub potential_win: Decimal,
    pub status: BetStatus,
    pub placed_at: OffsetDateTime,
}

impl From<&BetRecord> for BetReceipt {
    fn from(record: &BetRecord) -> Self {
        BetReceipt {
            bet_id: record.bet_id,
            fixture_id: record.fixture_id.clone(),
            market: record.market,
            odds: record.odds,
            stake: record.stake,
            potential_win: record.potential_win,
            status: record.status,
            placed_at: record.placed_at.unix_timestamp(),
        }
    }
}

#[derive(Debug, Clone)]
/// Accept one bet and debit its stake.
///
/// The bet is accepted only if the fixture is open, the market is offered
/// at exactly the submitted odds, the stake is positive, the submitted
/// potential win matches the server's calculation and the account can
/// cover the stake.
pub struct PlaceBet {
    pub account_id: Uuid,
    pub request: PlaceBetRequest,
}

impl Processor<PlaceBet> for LedgerProcessor {
    type Output = BetRecord;
    type Error = LedgerError;
    #[tracing::instrument(skip_all, err, name = "Ledger:PlaceBet")]
    async fn process(&self, place: PlaceBet) -> Result<BetRecord, LedgerError> {
        let PlaceBet {
            account_id,
            request,
        } = place;

        let mut ledger = self.ledger.write().await;

        let fixture = ledger
            .fixtures
            .get(&request.fixture_id)
            .ok_or_else(|| LedgerError::FixtureNotFound(request.fixture_id.clone()))?;
        if !fixture.status.accepts_bets() {
            return Err(LedgerError::FixtureClosed(request.fixture_id));
        }
        let current = fixture
            .odds_for(request.market)
            .ok_or_else(|| LedgerError::MarketNotOffered {
                fixture_id: request.fixture_id.clone(),
                market: request.market,
            })?;
        if current != request.odds {
            return Err(LedgerError::OddsChanged { current });
        }
        if request.stake <= Decimal::ZERO {
            return Err(LedgerError::InvalidStake(request.stake));
        }
        let expected = potential_win(request.odds, request.stake)
            .ok_or(LedgerError::InvalidStake(request.stake))?;
        if expected != request.potential_win {
            return Err(LedgerError::PotentialWinMismatch {
                expected,
                submitted: request.potential_win,
            });
        }

        ledger.account_mut(account_id)?.debit(request.stake)?;

        let record = BetRecord {
            bet_id: Uuid::now_v7(),
            account_id,
            fixture_id: request.fixture_id,
            market: request.market,
            odds: request.odds,
            stake: request.stake,
            potential_win: expected,
            status: BetStatus::Pending,
            placed_at: OffsetDateTime::now_utc(),
        };
        ledger.bets.push(record.clone());

        info!(
            bet_id = %record.bet_id,
            account_id = %account_id,
            fixture_id = %record.fixture_id,
            market = %record.market,
            stake = %record.stake,
            "Bet accepted"
        );
        Ok(record)
    }
}

#[derive(Debug, Clone)]
/// Bet history of one account, newest first.
pub struct ListBets {
    pub account_id: Uuid,
}

impl Processor<ListBets> for LedgerProcessor {
    type Output = Vec<BetRecord>;
    type Error = LedgerError;
    async fn process(&self, query: ListBets) -> Result<Vec<BetRecord>, LedgerError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .bets
            .iter()
            .rev()
            .filter(|bet| bet.account_id == query.account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GetAccount;
    use crate::entities::testing::processor;
    use rust_decimal_macros::dec;

    fn request(fixture: &str, market: Market, odds: Decimal, stake: Decimal) -> PlaceBetRequest {
        PlaceBetRequest::new(FixtureId::from(fixture), market, odds, stake).unwrap()
    }

    async fn balance(ledger: &LedgerProcessor, account_id: Uuid) -> Decimal {
        ledger
            .process(GetAccount { account_id })
            .await
            .unwrap()
            .balance
    }

    #[tokio::test]
    async fn test_place_bet_debits_stake() {
        let (ledger, account_id) = processor(dec!(100));

        let bet = ledger
            .process(PlaceBet {
                account_id,
                request: request("f1", Market::Home, dec!(2.0), dec!(40)),
            })
            .await
            .unwrap();
        assert_eq!(bet.potential_win, dec!(80.00));
        assert_eq!(bet.status, BetStatus::Pending);
        assert_eq!(balance(&ledger, account_id).await, dec!(60));

        let history = ledger.process(ListBets { account_id }).await.unwrap();
        assert_eq!(history, vec![bet]);
    }

    #[tokio::test]
    async fn test_place_bet_rejects_stale_odds() {
        let (ledger, account_id) = processor(dec!(100));

        let err = ledger
            .process(PlaceBet {
                account_id,
                request: request("f1", Market::Home, dec!(1.9), dec!(10)),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::OddsChanged { current: dec!(2.0) });
        assert_eq!(balance(&ledger, account_id).await, dec!(100));
    }

    #[tokio::test]
    async fn test_place_bet_rejects_insufficient_funds() {
        let (ledger, account_id) = processor(dec!(5));

        let err = ledger
            .process(PlaceBet {
                account_id,
                request: request("f1", Market::Draw, dec!(3.4), dec!(10)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "insufficient funds");
        assert_eq!(balance(&ledger, account_id).await, dec!(5));
        assert!(ledger.process(ListBets { account_id }).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_bet_validation() {
        let (ledger, account_id) = processor(dec!(100));

        let closed = ledger
            .process(PlaceBet {
                account_id,
                request: request("f9", Market::Home, dec!(2.0), dec!(1)),
            })
            .await
            .unwrap_err();
        assert_eq!(closed, LedgerError::FixtureClosed(FixtureId::from("f9")));

        let not_offered = ledger
            .process(PlaceBet {
                account_id,
                request: request("f1", Market::Over, dec!(2.0), dec!(1)),
            })
            .await
            .unwrap_err();
        assert!(matches!(not_offered, LedgerError::MarketNotOffered { .. }));

        let zero = ledger
            .process(PlaceBet {
                account_id,
                request: request("f1", Market::Home, dec!(2.0), dec!(0)),
            })
            .await
            .unwrap_err();
        assert_eq!(zero, LedgerError::InvalidStake(dec!(0)));

        let mut tampered = request("f1", Market::Home, dec!(2.0), dec!(10));
        tampered.potential_win = dec!(25.00);
        let mismatch = ledger
            .process(PlaceBet {
                account_id,
                request: tampered,
            })
            .await
            .unwrap_err();
        assert_eq!(
            mismatch,
            LedgerError::PotentialWinMismatch {
                expected: dec!(20.00),
                submitted: dec!(25.00),
            }
        );

        assert_eq!(balance(&ledger, account_id).await, dec!(100));
    }

    #[tokio::test]
    async fn test_place_bet_rejects_overflowing_stake() {
        let (ledger, account_id) = processor(dec!(100));

        let err = ledger
            .process(PlaceBet {
                account_id,
                request: PlaceBetRequest {
                    fixture_id: FixtureId::from("f1"),
                    market: Market::Home,
                    odds: dec!(2.0),
                    stake: Decimal::MAX,
                    potential_win: Decimal::MAX,
                },
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidStake(Decimal::MAX));
        assert_eq!(balance(&ledger, account_id).await, dec!(100));
    }
}
