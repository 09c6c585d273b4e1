use super::ledger::{Ledger, LedgerError};
use super::{Amount, Rate, UserId};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// The full breakdown of one settlement: gross income split among a leader
/// and members after the guild tax and the leader's repair costs come off the
/// top. All fields are plain data for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub income: Amount,
    pub repair_cost: Amount,
    pub tax_rate: Rate,
    pub tax_amount: Amount,
    pub distributable: Amount,
    pub member_count: usize,
    pub per_member: Amount,
    pub leader_share: Amount,
}

impl Settlement {
    /// Pure split calculation. No ledger is touched here.
    ///
    /// The tax is `floor(income × rate / 100)`, computed in decimal so
    /// fractional rates like 2.5% come out exact. What remains after tax and
    /// repair is divided equally among leader + members; the leader
    /// additionally gets the repair cost back.
    ///
    /// Numeric bounds (income ≥ 0, repair ≥ 0, 0 ≤ rate ≤ 100) are validated
    /// at the command boundary; this function only rejects arithmetic that
    /// leaves the representable range.
    pub fn compute(
        income: Amount,
        repair_cost: Amount,
        tax_rate: Rate,
        member_count: usize,
    ) -> Result<Self, LedgerError> {
        let tax_amount = (Decimal::from(income) * tax_rate / dec!(100))
            .floor()
            .to_i64()
            .ok_or(LedgerError::Overflow)?;

        let distributable = income
            .checked_sub(repair_cost)
            .and_then(|rest| rest.checked_sub(tax_amount))
            .ok_or(LedgerError::Overflow)?;

        // Integer division truncates toward zero. On the validated
        // non-negative path this coincides with floor; a negative
        // distributable divides one step closer to zero.
        let total_people = member_count as Amount + 1;
        let per_member = distributable / total_people;

        let leader_share = per_member
            .checked_add(repair_cost)
            .ok_or(LedgerError::Overflow)?;

        // Validate the payout up front so total_payout() can't overflow later.
        per_member
            .checked_mul(member_count as Amount)
            .and_then(|members_total| members_total.checked_add(leader_share))
            .ok_or(LedgerError::Overflow)?;

        Ok(Self {
            income,
            repair_cost,
            tax_rate,
            tax_amount,
            distributable,
            member_count,
            per_member,
            leader_share,
        })
    }

    pub fn total_people(&self) -> usize {
        self.member_count + 1
    }

    /// What the house account pays out in total.
    /// compute() has already checked this arithmetic.
    pub fn total_payout(&self) -> Amount {
        self.leader_share + self.per_member * self.member_count as Amount
    }
}

fn accrue(
    deltas: &mut BTreeMap<UserId, Amount>,
    user: UserId,
    delta: Amount,
) -> Result<(), LedgerError> {
    let slot = deltas.entry(user).or_insert(0);
    *slot = slot.checked_add(delta).ok_or(LedgerError::Overflow)?;
    Ok(())
}

impl Ledger {
    /// Pay out a computed settlement: the leader gets their share, each
    /// member their cut, and the house account funds the whole payout, so
    /// the ledger total is unchanged.
    ///
    /// The member list must be the one the settlement was computed from,
    /// unique and excluding the leader. The house may itself be the leader
    /// or a member (the bot can join a run): deltas are netted per account
    /// before anything is written, so an overlapping house simply pays out
    /// less than it takes in and the total still balances. Every new
    /// balance is computed before any is written, so an overflow rejects
    /// the settlement with no mutation.
    pub fn apply_settlement(
        &mut self,
        settlement: &Settlement,
        leader: UserId,
        members: &[UserId],
        house: UserId,
    ) -> Result<(), LedgerError> {
        if settlement.member_count != members.len() {
            return Err(LedgerError::WrongMemberCount);
        }

        let mut deltas: BTreeMap<UserId, Amount> = BTreeMap::new();
        accrue(&mut deltas, leader, settlement.leader_share)?;
        for &member in members {
            accrue(&mut deltas, member, settlement.per_member)?;
        }

        let house_slot = deltas.entry(house).or_insert(0);
        *house_slot = house_slot
            .checked_sub(settlement.total_payout())
            .ok_or(LedgerError::Overflow)?;

        let mut afters = Vec::with_capacity(deltas.len());
        for (&user, &delta) in &deltas {
            let after = self
                .balance(user)
                .checked_add(delta)
                .ok_or(LedgerError::Overflow)?;
            afters.push((user, after));
        }

        for (user, after) in afters {
            self.entry(user).balance = after;
        }

        Ok(())
    }
}
