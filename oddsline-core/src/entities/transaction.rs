//! Deposits and withdrawals.
//!
//! A transaction starts `pending` and is settled exactly once, to
//! `completed` or `rejected`. Balances move at these points:
//!
//! | kind       | request | complete | reject |
//! |------------|---------|----------|--------|
//! | deposit    | -       | credit   | -      |
//! | withdrawal | debit   | -        | refund |

use kanau::processor::Processor;
use oddsline_sdk::objects::{PaymentMethod, TransactionKind, TransactionResponse, TransactionStatus};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::LedgerError;
use crate::framework::LedgerProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: OffsetDateTime,
    pub settled_at: Option<OffsetDateTime>,
}

impl From<&TransactionRecord> for TransactionResponse {
    fn from(record: &TransactionRecord) -> Self {
        TransactionResponse {
            transaction_id: record.transaction_id,
            kind: record.kind,
            method: record.method,
            amount: record.amount,
            status: record.status,
            created_at: record.created_at.unix_timestamp(),
            settled_at: record.settled_at.map(OffsetDateTime::unix_timestamp),
        }
    }
}

#[derive(Debug, Clone)]
/// Record a new pending deposit or withdrawal. Withdrawals hold the funds
/// immediately.
pub struct RequestTransaction {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    pub amount: Decimal,
}

impl Processor<RequestTransaction> for LedgerProcessor {
    type Output = TransactionRecord;
    type Error = LedgerError;
    #[tracing::instrument(skip_all, err, name = "Ledger:RequestTransaction")]
    async fn process(&self, request: RequestTransaction) -> Result<TransactionRecord, LedgerError> {
        if request.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(request.amount));
        }

        let mut ledger = self.ledger.write().await;
        let account = ledger.account_mut(request.account_id)?;
        match request.kind {
            TransactionKind::Withdrawal => account.debit(request.amount)?,
            // Refuse up front what could never be credited on completion.
            TransactionKind::Deposit => {
                if account.balance.checked_add(request.amount).is_none() {
                    return Err(LedgerError::InvalidAmount(request.amount));
                }
            }
        }

        let record = TransactionRecord {
            transaction_id: Uuid::now_v7(),
            account_id: request.account_id,
            kind: request.kind,
            method: request.method,
            amount: request.amount,
            status: TransactionStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
            settled_at: None,
        };
        ledger.transactions.push(record.clone());

        info!(
            transaction_id = %record.transaction_id,
            account_id = %record.account_id,
            kind = ?record.kind,
            amount = %record.amount,
            "Transaction requested"
        );
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Complete,
    Reject,
}

#[derive(Debug, Clone)]
/// Settle a pending transaction.
pub struct SettleTransaction {
    pub transaction_id: Uuid,
    pub settlement: Settlement,
}

impl Processor<SettleTransaction> for LedgerProcessor {
    type Output = TransactionRecord;
    type Error = LedgerError;
    #[tracing::instrument(skip_all, err, name = "Ledger:SettleTransaction")]
    async fn process(&self, settle: SettleTransaction) -> Result<TransactionRecord, LedgerError> {
        let mut ledger = self.ledger.write().await;

        let index = ledger
            .transactions
            .iter()
            .position(|t| t.transaction_id == settle.transaction_id)
            .ok_or(LedgerError::TransactionNotFound(settle.transaction_id))?;

        let pending = &ledger.transactions[index];
        if pending.status != TransactionStatus::Pending {
            return Err(LedgerError::TransactionSettled {
                id: pending.transaction_id,
                status: pending.status,
            });
        }
        let (account_id, kind, amount) = (pending.account_id, pending.kind, pending.amount);

        let status = match (settle.settlement, kind) {
            (Settlement::Complete, TransactionKind::Deposit) => {
                ledger.account_mut(account_id)?.credit(amount)?;
                TransactionStatus::Completed
            }
            (Settlement::Complete, TransactionKind::Withdrawal) => TransactionStatus::Completed,
            (Settlement::Reject, TransactionKind::Withdrawal) => {
                ledger.account_mut(account_id)?.credit(amount)?;
                TransactionStatus::Rejected
            }
            (Settlement::Reject, TransactionKind::Deposit) => TransactionStatus::Rejected,
        };

        let record = &mut ledger.transactions[index];
        record.status = status;
        record.settled_at = Some(OffsetDateTime::now_utc());

        info!(
            transaction_id = %record.transaction_id,
            status = %record.status,
            "Transaction settled"
        );
        Ok(record.clone())
    }
}

#[derive(Debug, Clone)]
/// Transaction history of one account, newest first.
pub struct ListTransactions {
    pub account_id: Uuid,
}

impl Processor<ListTransactions> for LedgerProcessor {
    type Output = Vec<TransactionRecord>;
    type Error = LedgerError;
    async fn process(&self, query: ListTransactions) -> Result<Vec<TransactionRecord>, LedgerError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .transactions
            .iter()
            .rev()
            .filter(|t| t.account_id == query.account_id)
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

    async fn balance(ledger: &LedgerProcessor, account_id: Uuid) -> Decimal {
        ledger
            .process(GetAccount { account_id })
            .await
            .unwrap()
            .balance
    }

    async fn request(
        ledger: &LedgerProcessor,
        account_id: Uuid,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<TransactionRecord, LedgerError> {
        ledger
            .process(RequestTransaction {
                account_id,
                kind,
                method: PaymentMethod::Card,
                amount,
            })
            .await
    }

    async fn settle(
        ledger: &LedgerProcessor,
        transaction_id: Uuid,
        settlement: Settlement,
    ) -> Result<TransactionRecord, LedgerError> {
        ledger
            .process(SettleTransaction {
                transaction_id,
                settlement,
            })
            .await
    }

    #[tokio::test]
    async fn test_deposit_credits_on_completion() {
        let (ledger, account_id) = processor(dec!(10));

        let deposit = request(&ledger, account_id, TransactionKind::Deposit, dec!(50))
            .await
            .unwrap();
        assert_eq!(deposit.status, TransactionStatus::Pending);
        assert_eq!(balance(&ledger, account_id).await, dec!(10));

        let done = settle(&ledger, deposit.transaction_id, Settlement::Complete)
            .await
            .unwrap();
        assert_eq!(done.status, TransactionStatus::Completed);
        assert!(done.settled_at.is_some());
        assert_eq!(balance(&ledger, account_id).await, dec!(60));
    }

    #[tokio::test]
    async fn test_withdrawal_holds_and_refunds() {
        let (ledger, account_id) = processor(dec!(100));

        let withdrawal = request(&ledger, account_id, TransactionKind::Withdrawal, dec!(30))
            .await
            .unwrap();
        assert_eq!(balance(&ledger, account_id).await, dec!(70));

        settle(&ledger, withdrawal.transaction_id, Settlement::Reject)
            .await
            .unwrap();
        assert_eq!(balance(&ledger, account_id).await, dec!(100));

        let short = request(&ledger, account_id, TransactionKind::Withdrawal, dec!(101)).await;
        assert!(matches!(short, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[tokio::test]
    async fn test_settlement_only_from_pending() {
        let (ledger, account_id) = processor(dec!(100));
        let deposit = request(&ledger, account_id, TransactionKind::Deposit, dec!(20))
            .await
            .unwrap();

        settle(&ledger, deposit.transaction_id, Settlement::Reject)
            .await
            .unwrap();
        let again = settle(&ledger, deposit.transaction_id, Settlement::Complete).await;
        assert_eq!(
            again,
            Err(LedgerError::TransactionSettled {
                id: deposit.transaction_id,
                status: TransactionStatus::Rejected,
            })
        );
        assert_eq!(balance(&ledger, account_id).await, dec!(100));

        let unknown = Uuid::now_v7();
        assert_eq!(
            settle(&ledger, unknown, Settlement::Complete).await,
            Err(LedgerError::TransactionNotFound(unknown))
        );
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount_and_lists_newest_first() {
        let (ledger, account_id) = processor(dec!(100));
        assert_eq!(
            request(&ledger, account_id, TransactionKind::Deposit, dec!(0)).await,
            Err(LedgerError::InvalidAmount(dec!(0)))
        );

        let first = request(&ledger, account_id, TransactionKind::Deposit, dec!(1))
            .await
            .unwrap();
        let second = request(&ledger, account_id, TransactionKind::Withdrawal, dec!(2))
            .await
            .unwrap();

        let history = ledger.process(ListTransactions { account_id }).await.unwrap();
        let ids: Vec<_> = history.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, [second.transaction_id, first.transaction_id]);
        assert_eq!(
            TransactionResponse::from(&history[0]).kind,
            TransactionKind::Withdrawal
        );
    }

    #[tokio::test]
    async fn test_deposit_that_would_overflow_is_refused() {
        let (ledger, account_id) = processor(dec!(100));

        let err = request(&ledger, account_id, TransactionKind::Deposit, Decimal::MAX)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount(Decimal::MAX));

        // Each fits when requested; the second no longer fits once the first lands.
        let big = request(&ledger, account_id, TransactionKind::Deposit, Decimal::MAX - dec!(100))
            .await
            .unwrap();
        let small = request(&ledger, account_id, TransactionKind::Deposit, dec!(50))
            .await
            .unwrap();
        settle(&ledger, big.transaction_id, Settlement::Complete)
            .await
            .unwrap();
        assert_eq!(balance(&ledger, account_id).await, Decimal::MAX);

        let err = settle(&ledger, small.transaction_id, Settlement::Complete)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount(dec!(50)));

        let history = ledger.process(ListTransactions { account_id }).await.unwrap();
        assert_eq!(history[0].transaction_id, small.transaction_id);
        assert_eq!(history[0].status, TransactionStatus::Pending);
    }
}
