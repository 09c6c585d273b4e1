//! Ledger for a chat-managed guild currency ("silver").
//!
//! The core is a set of arithmetic and bookkeeping rules over per-user
//! balance records: manual credits and debits, member-to-member transfers,
//! and settlement splits that divide a gross income among a leader and
//! members after tax and repair deductions, funded by a house account. The
//! whole ledger persists as one flat JSON snapshot.
//!
//! The chat-platform dispatcher (slash-command routing, permissions, user
//! directory) and the image renderer sit outside this crate: commands come
//! in as typed inputs ([`command`]) and results go out as plain card data
//! ([`bank`]).

pub mod bank;
pub mod command;
pub mod export;
pub mod ledger;
pub mod nickname;
pub mod store;
