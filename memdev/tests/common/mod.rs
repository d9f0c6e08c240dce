#![allow(dead_code)]

use memdev::{Config, Session, UnitTable};

/// Table of `units` units with 1 KiB each
pub fn small_table(units: i64) -> UnitTable {
    let config = Config {
        unit_count: units,
        initial_capacity: 1024,
        name_prefix: "mycdrv".to_string(),
        lock_poll_ms: 5,
    };
    UnitTable::new(&config).unwrap()
}

pub fn session(table: &UnitTable, name: &str) -> Session {
    table.open_by_name(name).unwrap()
}

pub fn contents(session: &Session) -> Vec<u8> {
    session.unit().snapshot(&memdev::CancelToken::new()).unwrap()
}
