//! Operator tool: print the snapshot as a CSV account table.

use silver_ledger::export;
use silver_ledger::store::BalanceStore;

use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .expect("logger init");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "silver_data.json".to_string());

    let store = BalanceStore::new(path);
    let ledger = store.load().expect("unreadable snapshot");

    export::write(std::io::stdout(), &ledger).expect("failed to write account table");
}
