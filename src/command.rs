//! Typed command inputs, as handed over by the external dispatcher.
//!
//! The dispatcher owns slash-command routing, permission checks and the user
//! directory; by the time a command reaches the bank it has been shaped into
//! one of the structs below. Keeping the inputs typed means the core never
//! digs fields out of an untyped option bag.

use crate::ledger::ledger::LedgerError;
use crate::ledger::{Amount, Rate, UserId};
use crate::nickname::resolve_display_name;
use crate::store::StoreError;

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub use crate::ledger::account::Action;

/// A platform-resolved participant: the stable user id plus the names the
/// platform knows them by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,

    /// Server nickname, when one is set. Takes precedence over the username.
    pub nickname: Option<String>,
}

impl UserRef {
    pub fn new(id: UserId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            nickname: None,
        }
    }

    pub fn with_nickname(id: UserId, username: &str, nickname: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            nickname: Some(nickname.to_string()),
        }
    }

    /// The full name that gets stored on the account: nickname when set,
    /// username otherwise.
    pub fn raw_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }

    /// The bare name shown on rendered cards; `None` when malformed.
    pub fn display_name(&self) -> Option<String> {
        resolve_display_name(self.raw_name())
    }
}

/// Manual credit/debit of one account. Elevated permission, checked by the
/// dispatcher before this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustBalance {
    pub action: Action,
    pub target: UserRef,
    pub amount: Amount,
}

/// Balance lookup; the dispatcher defaults the target to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAccount {
    pub target: UserRef,
}

/// Member-to-member transfer. No elevated permission needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub source: UserRef,
    pub dest: UserRef,
    pub amount: Amount,
}

/// Settlement split. Elevated permission, checked by the dispatcher. The
/// members are unique and exclude the leader ([`parse_mentions`] guarantees
/// both when the list comes from a mention string).
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSettlement {
    pub income: Amount,
    pub repair_cost: Amount,
    pub tax_rate: Rate,
    pub leader: UserRef,
    pub members: Vec<UserRef>,
}

/// Scan the member ids out of a raw mention string.
///
/// Both mention forms (`<@id>` and `<@!id>`) are recognized; anything else
/// in the string is ignored. Ids come out in first-occurrence order,
/// de-duplicated, with the leader dropped — mentioning the leader in the
/// member list must not pay them twice.
pub fn parse_mentions(raw: &str, leader: UserId) -> Vec<UserId> {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    let mention =
        MENTION.get_or_init(|| Regex::new(r"<@!?(\d+)>").expect("mention pattern is valid"));

    let mut ids = Vec::new();
    for capture in mention.captures_iter(raw) {
        // A run of digits too long for a u64 is not a real id; skip it.
        let Ok(id) = capture[1].parse::<UserId>() else {
            continue;
        };
        if id != leader && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Everything a command handler can reject or fail with.
#[derive(Debug, PartialEq)]
pub enum CommandError {
    /// The acting/source member's name resolved to nothing.
    SourceNameMalformed,

    /// The target member's name resolved to nothing.
    TargetNameMalformed,

    /// Settlement bounds, each its own rejection so the user knows which
    /// input to fix.
    InvalidIncome,
    InvalidRepairCost,
    InvalidTaxRate,

    /// A ledger rule rejected the operation; nothing was persisted.
    Ledger(LedgerError),

    /// The snapshot could not be read or written.
    Store(StoreError),
}

impl From<LedgerError> for CommandError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl CommandError {
    /// Persistence failures are fatal for the command and surfaced
    /// generically; everything else is a user-visible rejection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNameMalformed => {
                write!(f, "your member name is malformed, cannot register")
            }
            Self::TargetNameMalformed => {
                write!(f, "target member name is malformed, cannot register")
            }
            Self::InvalidIncome => write!(f, "income must be a non-negative whole number"),
            Self::InvalidRepairCost => write!(f, "repair cost must be a non-negative whole number"),
            Self::InvalidTaxRate => write!(f, "tax rate must be between 0 and 100"),
            Self::Ledger(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "{}", err),
        }
    }
}
