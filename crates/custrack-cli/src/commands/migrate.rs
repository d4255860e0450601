//! Schema migration command

use super::{CliResult, Context};
use custrack_store::migrations::applied_migrations;

pub fn execute(ctx: &Context) -> CliResult {
    let db = ctx.open_database()?;
    let applied = db.with_conn(|conn| applied_migrations(conn))?;
    for migration in applied {
        println!("{}  {}", migration.migration_id, migration.checksum);
    }
    Ok(())
}
