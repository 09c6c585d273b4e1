use super::ledger::{Ledger, LedgerError};
use super::{Amount, UserId};

/// Post-transfer balances of both parties, handed to the renderer as plain
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub amount: Amount,
    pub source_after: Amount,
    pub dest_after: Amount,
}

impl Ledger {
    /// Move funds between two accounts.
    ///
    /// Rules are checked in order, each a distinct rejection: self-transfer,
    /// non-positive amount, insufficient funds. Both new balances are
    /// computed before either is written, so the pair commits atomically —
    /// both mutations or neither.
    pub fn apply_transfer(
        &mut self,
        source: UserId,
        dest: UserId,
        amount: Amount,
    ) -> Result<TransferOutcome, LedgerError> {
        if source == dest {
            return Err(LedgerError::SelfTransfer);
        }

        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        // An unregistered source reads as balance 0 and is caught here.
        if self.balance(source) < amount {
            return Err(LedgerError::NotEnoughFunds);
        }

        let source_after = self
            .balance(source)
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        let dest_after = self
            .balance(dest)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.entry(source).balance = source_after;
        self.entry(dest).balance = dest_after;

        Ok(TransferOutcome {
            amount,
            source_after,
            dest_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TransferOutcome;
    use crate::ledger::ledger::{Ledger, LedgerError};

    use proptest::prelude::*;

    fn two_account_ledger(a: i64, b: i64) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.account(1, "A").balance = a;
        ledger.account(2, "B").balance = b;
        ledger
    }

    #[test]
    fn test_transfer_ok() {
        let mut ledger = two_account_ledger(100, 0);

        let got = ledger.apply_transfer(1, 2, 60);
        assert_eq!(
            Ok(TransferOutcome {
                amount: 60,
                source_after: 40,
                dest_after: 60
            }),
            got
        );
        assert_eq!(40, ledger.balance(1));
        assert_eq!(60, ledger.balance(2));
    }

    #[test]
    fn test_transfer_to_self() {
        let mut ledger = two_account_ledger(100, 0);

        let got = ledger.apply_transfer(1, 1, 60);
        assert_eq!(Err(LedgerError::SelfTransfer), got);
        assert_eq!(100, ledger.balance(1));
    }

    #[test]
    fn test_transfer_invalid_amount() {
        for amount in [0, -1, -500] {
            let mut ledger = two_account_ledger(100, 0);

            let got = ledger.apply_transfer(1, 2, amount);
            assert_eq!(Err(LedgerError::InvalidAmount), got);
            assert_eq!(100, ledger.balance(1));
            assert_eq!(0, ledger.balance(2));
        }
    }

    #[test]
    fn test_transfer_not_enough_funds() {
        let mut ledger = two_account_ledger(100, 0);

        let got = ledger.apply_transfer(1, 2, 150);
        assert_eq!(Err(LedgerError::NotEnoughFunds), got);
        assert_eq!(100, ledger.balance(1));
        assert_eq!(0, ledger.balance(2));
    }

    #[test]
    // Self-transfer is checked before the amount, matching the rejection the
    // user sees.
    fn test_self_transfer_wins_over_bad_amount() {
        let mut ledger = two_account_ledger(100, 0);

        let got = ledger.apply_transfer(1, 1, 0);
        assert_eq!(Err(LedgerError::SelfTransfer), got);
    }

    #[test]
    fn test_transfer_creates_missing_dest() {
        let mut ledger = Ledger::new();
        ledger.account(1, "A").balance = 10;

        ledger.apply_transfer(1, 9, 10).expect("should transfer");
        assert_eq!(0, ledger.balance(1));
        assert_eq!(10, ledger.balance(9));
    }

    #[test]
    fn test_transfer_from_unregistered_source() {
        let mut ledger = Ledger::new();
        ledger.account(2, "B");

        // A missing source reads as balance 0.
        let got = ledger.apply_transfer(1, 2, 1);
        assert_eq!(Err(LedgerError::NotEnoughFunds), got);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a valid transfer conserves the total balance, and the
        /// outcome matches what actually landed in the ledger.
        #[test]
        fn transfer_conserves_total(
            a in 0i64..1_000_000_000i64,
            b in 0i64..1_000_000_000i64,
            amount in 1i64..1_000_000_000i64,
        ) {
            let mut ledger = two_account_ledger(a, b);
            let total_before = ledger.total();

            match ledger.apply_transfer(1, 2, amount) {
                Ok(outcome) => {
                    prop_assert!(amount <= a);
                    prop_assert_eq!(outcome.source_after, ledger.balance(1));
                    prop_assert_eq!(outcome.dest_after, ledger.balance(2));
                }
                Err(_) => {
                    prop_assert!(amount > a);
                    prop_assert_eq!(a, ledger.balance(1));
                    prop_assert_eq!(b, ledger.balance(2));
                }
            }

            prop_assert_eq!(total_before, ledger.total());
        }
    }
}
