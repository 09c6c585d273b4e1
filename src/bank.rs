//! The command service: one handler per chat command, each running a full
//! load→compute→save cycle under the bank's lock.
//!
//! Handlers return "card" structs — the plain numeric/name data the external
//! image renderer draws. No drawing happens here.

use crate::command::{
    AdjustBalance, CommandError, QueryAccount, SplitSettlement, Transfer, UserRef,
};
use crate::ledger::account::BalanceChange;
use crate::ledger::settlement::Settlement;
use crate::ledger::{Amount, UserId};
use crate::export;
use crate::store::{BalanceStore, StoreError};

use log::{info, warn};
use rust_decimal_macros::dec;
use std::io;
use std::sync::{Mutex, MutexGuard};

/// Result of a manual adjustment, for the balance-change card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentCard {
    pub name: String,
    pub change: BalanceChange,
}

/// Result of a balance query, for the account card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCard {
    pub name: String,
    pub balance: Amount,
}

/// Result of a transfer, for the two-party card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCard {
    pub source_name: String,
    pub source_after: Amount,
    pub dest_name: String,
    pub dest_after: Amount,
    pub amount: Amount,
}

/// Result of a settlement, for the breakdown embed.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementCard {
    pub leader_name: String,
    pub settlement: Settlement,
}

/// The bank owns the snapshot store and the house account, and serializes
/// every command: the formerly implicit "the caller won't interleave
/// load/mutate/save cycles" assumption, made explicit as a critical section.
pub struct Bank {
    store: Mutex<BalanceStore>,
    house: UserRef,
}

impl Bank {
    /// `house` is the system-owned account (the bot user in the original
    /// deployment) that funds settlement payouts.
    pub fn new(store: BalanceStore, house: UserRef) -> Self {
        Self {
            store: Mutex::new(store),
            house,
        }
    }

    // A poisoned lock is recovered: the snapshot is only written after a
    // fully successful computation, so it is consistent no matter what a
    // panicked holder was doing.
    fn store(&self) -> MutexGuard<'_, BalanceStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Manual credit or debit of one account. The dispatcher has already
    /// checked that the caller holds elevated permission.
    ///
    /// A malformed target name is not a rejection here: the card falls back
    /// to the bare username, since the operator chose the target explicitly.
    pub fn adjust_balance(&self, input: AdjustBalance) -> Result<AdjustmentCard, CommandError> {
        let name = input
            .target
            .display_name()
            .unwrap_or_else(|| input.target.username.clone());

        let store = self.store();
        let mut ledger = store.load()?;

        let account = ledger.account(input.target.id, input.target.raw_name());
        let change = match account.apply_adjustment(input.action, input.amount) {
            Ok(change) => change,
            Err(err) => {
                warn!("adjustment of user {} rejected: {}", input.target.id, err);
                return Err(err.into());
            }
        };

        store.save(&ledger)?;
        info!(
            "adjusted user {}: {} -> {}",
            input.target.id, change.before, change.after
        );

        Ok(AdjustmentCard { name, change })
    }

    /// Look up (and lazily register) an account. The registration persists:
    /// a first-time query writes the account into the snapshot, and a repeat
    /// query refreshes the stored nickname.
    pub fn query_account(&self, input: QueryAccount) -> Result<AccountCard, CommandError> {
        let name = input
            .target
            .display_name()
            .ok_or(CommandError::TargetNameMalformed)?;

        let store = self.store();
        let mut ledger = store.load()?;

        let balance = ledger
            .account(input.target.id, input.target.raw_name())
            .balance;
        store.save(&ledger)?;

        Ok(AccountCard { name, balance })
    }

    /// Member-to-member transfer.
    ///
    /// Names are resolved first, so a malformed name is reported ahead of
    /// any ledger rule; the ledger rules themselves keep their own order
    /// (self, amount, funds). A rejection leaves the snapshot untouched.
    pub fn transfer(&self, input: Transfer) -> Result<TransferCard, CommandError> {
        let source_name = input
            .source
            .display_name()
            .ok_or(CommandError::SourceNameMalformed)?;
        let dest_name = input
            .dest
            .display_name()
            .ok_or(CommandError::TargetNameMalformed)?;

        let store = self.store();
        let mut ledger = store.load()?;

        ledger.account(input.source.id, input.source.raw_name());
        ledger.account(input.dest.id, input.dest.raw_name());

        let outcome = match ledger.apply_transfer(input.source.id, input.dest.id, input.amount) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "transfer {} -> {} of {} rejected: {}",
                    input.source.id, input.dest.id, input.amount, err
                );
                return Err(err.into());
            }
        };

        store.save(&ledger)?;
        info!(
            "transferred {} from user {} to user {}",
            outcome.amount, input.source.id, input.dest.id
        );

        Ok(TransferCard {
            source_name,
            source_after: outcome.source_after,
            dest_name,
            dest_after: outcome.dest_after,
            amount: outcome.amount,
        })
    }

    /// Split a gross income among a leader and members, funded by the house
    /// account. The dispatcher has already checked elevated permission and
    /// de-duplicated the member list (leader excluded).
    pub fn split_settlement(&self, input: SplitSettlement) -> Result<SettlementCard, CommandError> {
        if input.income < 0 {
            return Err(CommandError::InvalidIncome);
        }
        if input.repair_cost < 0 {
            return Err(CommandError::InvalidRepairCost);
        }
        if input.tax_rate < dec!(0) || input.tax_rate > dec!(100) {
            return Err(CommandError::InvalidTaxRate);
        }

        let leader_name = input
            .leader
            .display_name()
            .unwrap_or_else(|| input.leader.username.clone());

        let settlement = Settlement::compute(
            input.income,
            input.repair_cost,
            input.tax_rate,
            input.members.len(),
        )?;

        let store = self.store();
        let mut ledger = store.load()?;

        ledger.account(input.leader.id, input.leader.raw_name());
        let mut member_ids: Vec<UserId> = Vec::with_capacity(input.members.len());
        for member in &input.members {
            ledger.account(member.id, member.raw_name());
            member_ids.push(member.id);
        }
        // The house account is created on its first settlement; its stored
        // name is never refreshed afterwards.
        ledger.ensure(self.house.id, self.house.raw_name());

        if let Err(err) =
            ledger.apply_settlement(&settlement, input.leader.id, &member_ids, self.house.id)
        {
            warn!("settlement for leader {} rejected: {}", input.leader.id, err);
            return Err(err.into());
        }

        store.save(&ledger)?;
        info!(
            "settled {} among leader {} and {} members, house {} paid {}",
            settlement.income,
            input.leader.id,
            settlement.member_count,
            self.house.id,
            settlement.total_payout()
        );

        Ok(SettlementCard {
            leader_name,
            settlement,
        })
    }

    /// Dump every account as a CSV row, for operator inspection and backups.
    pub fn export(&self, writer: impl io::Write) -> Result<(), CommandError> {
        let store = self.store();
        let ledger = store.load()?;
        export::write(writer, &ledger).map_err(StoreError::from)?;
        Ok(())
    }
}
