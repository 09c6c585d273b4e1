use super::account::Account;
use super::UserId;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The full mapping of user identifiers to accounts, persisted as one
/// snapshot. Loaded fully before any operation and saved fully after each
/// successful mutating operation.
///
/// A BTreeMap rather than a HashMap, so the snapshot keys and the CSV export
/// come out in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    accounts: BTreeMap<UserId, Account>,
}

/// Note: I chose to keep errors simple here.
/// In a real-world scenario, we would most likely need some debugging info
/// (e.g. `user_id`, `amount` and some info about the current balance).
#[derive(Debug, PartialEq)]
pub enum LedgerError {
    /// A transfer names the same account as source and destination.
    SelfTransfer,

    /// The amount is zero or negative; every operation takes a positive amount.
    InvalidAmount,

    /// Funds in the source account are unsufficient for a transfer.
    NotEnoughFunds,

    /// Applying the change would overflow the balance.
    Overflow,

    /// The member list handed to a settlement doesn't match the one the
    /// settlement was computed from.
    WrongMemberCount,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // User-visible rejection text, relayed as-is by the dispatcher.
        match self {
            Self::SelfTransfer => write!(f, "cannot transfer to self"),
            Self::InvalidAmount => write!(f, "invalid amount"),
            Self::NotEnoughFunds => write!(f, "insufficient funds"),
            Self::Overflow => write!(f, "balance out of range"),
            Self::WrongMemberCount => write!(f, "member list does not match settlement"),
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the account if it doesn't exist yet, and refresh its stored
    /// name to the last-seen nickname. Accounts are created lazily on first
    /// reference and never deleted.
    pub fn account(&mut self, user: UserId, name: &str) -> &mut Account {
        let account = self
            .accounts
            .entry(user)
            .or_insert_with(|| Account::new(name));
        account.name = name.to_string();
        account
    }

    /// Register the account if it doesn't exist yet, keeping the stored name
    /// untouched when it does. Used for the house account, whose name is set
    /// once and never refreshed.
    pub fn ensure(&mut self, user: UserId, name: &str) -> &mut Account {
        self.accounts
            .entry(user)
            .or_insert_with(|| Account::new(name))
    }

    /// An account that was never referenced reads as balance 0.
    pub fn balance(&self, user: UserId) -> super::Amount {
        self.accounts.get(&user).map_or(0, |acc| acc.balance)
    }

    pub fn get(&self, user: UserId) -> Option<&Account> {
        self.accounts.get(&user)
    }

    // Operations in this module commit through here; callers register names
    // at the command boundary before any balance is touched.
    pub(super) fn entry(&mut self, user: UserId) -> &mut Account {
        self.accounts
            .entry(user)
            .or_insert_with(|| Account::new(""))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &Account)> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances, used to check conservation across operations.
    pub fn total(&self) -> super::Amount {
        self.accounts.values().map(|acc| acc.balance).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Ledger, LedgerError};

    #[test]
    fn test_account_created_lazily() {
        let mut ledger = Ledger::new();
        assert_eq!(0, ledger.balance(7));
        assert!(ledger.get(7).is_none());

        let account = ledger.account(7, "Ashlynn (Healer)");
        assert_eq!(0, account.balance);
        assert_eq!("Ashlynn (Healer)", account.name);
        assert_eq!(1, ledger.len());
    }

    #[test]
    fn test_account_refreshes_name() {
        let mut ledger = Ledger::new();
        ledger.account(7, "OldName").balance = 42;

        let account = ledger.account(7, "NewName");
        assert_eq!("NewName", account.name);
        assert_eq!(42, account.balance);
    }

    #[test]
    fn test_ensure_keeps_existing_name() {
        let mut ledger = Ledger::new();
        ledger.account(1, "GuildBank");

        let account = ledger.ensure(1, "SomethingElse");
        assert_eq!("GuildBank", account.name);
    }

    #[test]
    fn test_total_sums_all_balances() {
        let mut ledger = Ledger::new();
        ledger.account(1, "a").balance = 100;
        ledger.account(2, "b").balance = -30;
        ledger.account(3, "c").balance = 7;

        assert_eq!(77, ledger.total());
    }

    #[test]
    fn test_error_display() {
        for (err, want) in [
            (LedgerError::SelfTransfer, "cannot transfer to self"),
            (LedgerError::InvalidAmount, "invalid amount"),
            (LedgerError::NotEnoughFunds, "insufficient funds"),
            (LedgerError::Overflow, "balance out of range"),
            (
                LedgerError::WrongMemberCount,
                "member list does not match settlement",
            ),
        ] {
            assert_eq!(want, err.to_string());
        }
    }
}
