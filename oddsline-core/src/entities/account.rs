use kanau::processor::Processor;
use oddsline_sdk::objects::AccountResponse;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::LedgerError;
use crate::framework::LedgerProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account_id: Uuid,
    /// Bearer token presented on account routes.
    pub token: String,
    pub display_name: String,
    pub balance: Decimal,
}

impl AccountRecord {
    pub fn new(token: impl Into<String>, display_name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            account_id: Uuid::now_v7(),
            token: token.into(),
            display_name: display_name.into(),
            balance,
        }
    }

    /// Take `amount` from the balance, failing if it would go negative.
    pub(crate) fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Add `amount` to the balance, failing if the sum overflows.
    pub(crate) fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount(amount))?;
        Ok(())
    }
}

impl From<&AccountRecord> for AccountResponse {
    fn from(record: &AccountRecord) -> Self {
        AccountResponse {
            account_id: record.account_id,
            display_name: record.display_name.clone(),
            balance: record.balance,
        }
    }
}

#[derive(Debug, Clone)]
/// Resolve a bearer token to its account.
pub struct FindAccountByToken {
    pub token: String,
}

impl Processor<FindAccountByToken> for LedgerProcessor {
    type Output = Option<AccountRecord>;
    type Error = LedgerError;
    async fn process(&self, query: FindAccountByToken) -> Result<Option<AccountRecord>, LedgerError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .tokens
            .get(&query.token)
            .and_then(|id| ledger.accounts.get(id))
            .cloned())
    }
}

#[derive(Debug, Clone)]
pub struct GetAccount {
    pub account_id: Uuid,
}

impl Processor<GetAccount> for LedgerProcessor {
    type Output = AccountRecord;
    type Error = LedgerError;
    async fn process(&self, query: GetAccount) -> Result<AccountRecord, LedgerError> {
        let ledger = self.ledger.read().await;
        ledger
            .accounts
            .get(&query.account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(query.account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::testing::{TOKEN, processor};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_find_account_by_token() {
        let (ledger, account_id) = processor(dec!(25));

        let account = ledger
            .process(FindAccountByToken {
                token: TOKEN.into(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.account_id, account_id);
        assert_eq!(AccountResponse::from(&account).balance, dec!(25));

        let missing = ledger
            .process(FindAccountByToken {
                token: "someone-else".into(),
            })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut account = AccountRecord::new("t", "Alice", dec!(10));
        assert_eq!(
            account.debit(dec!(10.01)),
            Err(LedgerError::InsufficientFunds {
                balance: dec!(10),
                required: dec!(10.01),
            })
        );
        account.debit(dec!(10)).unwrap();
        assert_eq!(account.balance, dec!(0));
    }
}
