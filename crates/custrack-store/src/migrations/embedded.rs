//! SQL files compiled into the binary, in apply order

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

macro_rules! migration {
    ($id:literal) => {
        Migration {
            id: $id,
            sql: include_str!(concat!("../../migrations/", $id, ".sql")),
        }
    };
}

pub const MIGRATIONS: &[Migration] = &[
    // customers + audit_log
    migration!("001_initial_schema"),
    // packet/config/plugin versions
    migration!("002_snapshot_tables"),
];
