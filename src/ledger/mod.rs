pub mod account;
pub mod ledger;
pub mod settlement;
pub mod transfer;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the following, when creating the ledger map:
// (1) accounts: BTreeMap<u64, Account>
// (2) accounts: BTreeMap<UserId, Account>
// Implementation (1) would most likely need comments, and could be confusing.
// Implementation (2) is self-explanatory.
// Besides, maintenance is easier: changing user ids e.g. from u64 to a wider
// type is trivial.
pub type UserId = u64;

// Silver is a whole-number currency: no fractional coins exist, and balances
// are signed because operator debits are allowed to push an account into debt.
pub type Amount = i64;

// The tax rate is the one fractional quantity in the system (e.g. 2.5%).
// I decided to use a decimal library instead of the built-in f64 type, to be
// safer when dealing with money: the floored tax amount must come out exact.
pub type Rate = rust_decimal::Decimal;
