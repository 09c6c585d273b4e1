use crate::ledger::ledger::Ledger;
use crate::ledger::{Amount, UserId};

use serde::Serialize;

// I have an AccountRecord type because the persisted Account doesn't carry
// its own user id; the export row needs all three columns side by side.
#[derive(Serialize)]
struct AccountRecord<'a> {
    #[serde(rename = "user")]
    user_id: UserId,

    name: &'a str,

    balance: Amount,
}

/// Writes every account to the given stream as CSV, in key order.
pub fn write(output_stream: impl std::io::Write, ledger: &Ledger) -> Result<(), std::io::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for (&user_id, account) in ledger.iter() {
        let record = AccountRecord {
            user_id,
            name: &account.name,
            balance: account.balance,
        };
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
