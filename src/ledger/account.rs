use super::ledger::LedgerError;
use super::Amount;

use serde::{Deserialize, Serialize};

/// Manual adjustment direction, chosen by the operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add the amount to the balance.
    Credit,

    /// Subtract the amount from the balance. There is deliberately no floor
    /// at zero: a debit below zero records a debt.
    Debit,
}

/// The (before, after) pair every mutation reports, handed to the renderer
/// as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub before: Amount,
    pub after: Amount,
}

/// One persisted account record: the current balance and the last-seen full
/// nickname of its owner.
///
/// In the snapshot this serializes as `{ "balance": n, "name": s }` under the
/// owner's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub balance: Amount,
    pub name: String,
}

impl Account {
    pub fn new(name: &str) -> Self {
        Self {
            balance: 0,
            name: name.to_string(),
        }
    }

    /// Apply a manual credit or debit.
    ///
    /// The amount must be strictly positive; the direction comes from the
    /// action. A debit may drive the balance negative — only transfers check
    /// funds, manual adjustments are an operator tool and represent debts by
    /// going below zero.
    pub fn apply_adjustment(
        &mut self,
        action: Action,
        amount: Amount,
    ) -> Result<BalanceChange, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let before = self.balance;
        let after = match action {
            Action::Credit => before.checked_add(amount),
            Action::Debit => before.checked_sub(amount),
        }
        .ok_or(LedgerError::Overflow)?;

        self.balance = after;
        Ok(BalanceChange { before, after })
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, Action, BalanceChange};
    use crate::ledger::ledger::LedgerError;

    use proptest::prelude::*;

    #[test]
    fn test_credit() {
        let mut acc = Account::new("Ashlynn");
        acc.balance = 100;

        let got = acc.apply_adjustment(Action::Credit, 50);
        assert_eq!(
            Ok(BalanceChange {
                before: 100,
                after: 150
            }),
            got
        );
        assert_eq!(150, acc.balance);
    }

    #[test]
    fn test_debit_below_zero() {
        let mut acc = Account::new("Ashlynn");
        acc.balance = 100;

        // No floor at zero: the account goes into debt.
        let got = acc.apply_adjustment(Action::Debit, 150);
        assert_eq!(
            Ok(BalanceChange {
                before: 100,
                after: -50
            }),
            got
        );
        assert_eq!(-50, acc.balance);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [0, -1, -100] {
            for action in [Action::Credit, Action::Debit] {
                let mut acc = Account::new("Ashlynn");
                acc.balance = 100;

                let got = acc.apply_adjustment(action, amount);
                assert_eq!(Err(LedgerError::InvalidAmount), got);
                assert_eq!(100, acc.balance);
            }
        }
    }

    #[test]
    fn test_credit_overflow() {
        let mut acc = Account::new("Ashlynn");
        acc.balance = i64::MAX - 1;

        let got = acc.apply_adjustment(Action::Credit, 2);
        assert_eq!(Err(LedgerError::Overflow), got);
        assert_eq!(i64::MAX - 1, acc.balance);
    }

    #[test]
    fn test_debit_overflow() {
        let mut acc = Account::new("Ashlynn");
        acc.balance = i64::MIN + 1;

        let got = acc.apply_adjustment(Action::Debit, 2);
        assert_eq!(Err(LedgerError::Overflow), got);
        assert_eq!(i64::MIN + 1, acc.balance);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a debit of n undoes a credit of n, for any starting
        /// balance that doesn't overflow.
        #[test]
        fn credit_then_debit_round_trips(
            start in -1_000_000_000_000i64..1_000_000_000_000i64,
            amount in 1i64..1_000_000_000i64,
        ) {
            let mut acc = Account::new("prop");
            acc.balance = start;

            acc.apply_adjustment(Action::Credit, amount).unwrap();
            acc.apply_adjustment(Action::Debit, amount).unwrap();
            prop_assert_eq!(start, acc.balance);
        }
    }
}
