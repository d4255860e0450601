//! Append-only audit log
//!
//! Every write to a customer or one of its snapshots appends exactly one row
//! here, in the same transaction as the write. Rows are never updated.

use crate::errors::{corrupt_json, storage, Result};
use custrack_core::diff::ChangeSet;
use custrack_core::errors::{ExError, ExErrorKind};
use custrack_core::model::{AuditRecord, SubRecordKind, UpdateSource};
use rusqlite::{Connection, OptionalExtension, Row};

const AUDIT_COLUMNS: &str =
    "id, customer_id, updated_by, updated_at, update_source, sub_record, diff";

/// Append an audit record and return it
///
/// The update source is derived from `actor`: empty means packet-driven.
pub fn append_audit(
    conn: &Connection,
    customer_id: &str,
    actor: &str,
    sub_record: SubRecordKind,
    diff: &ChangeSet,
    at: i64,
) -> Result<AuditRecord> {
    let record = AuditRecord {
        id: uuid::Uuid::now_v7().to_string(),
        customer_id: customer_id.to_string(),
        updated_by: actor.to_string(),
        updated_at: at,
        update_source: UpdateSource::from_actor(actor),
        sub_record,
        diff: diff.clone(),
    };

    conn.execute(
        &format!(
            "INSERT INTO audit_log ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            AUDIT_COLUMNS
        ),
        rusqlite::params![
            record.id,
            record.customer_id,
            record.updated_by,
            record.updated_at,
            record.update_source.as_str(),
            record.sub_record.as_str(),
            record.diff.to_json(),
        ],
    )
    .map_err(|e| storage("append_audit", e))?;

    tracing::debug!(
        customer_id,
        audit_id = %record.id,
        sub_record = %sub_record,
        change_count = diff.len(),
        "audit appended"
    );
    Ok(record)
}

/// Audit trail of a customer, newest first
pub fn list_audit(conn: &Connection, customer_id: &str) -> Result<Vec<AuditRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM audit_log WHERE customer_id = ?1
             ORDER BY updated_at DESC, rowid DESC",
            AUDIT_COLUMNS
        ))
        .map_err(|e| storage("list_audit", e))?;
    let raw = stmt
        .query_map([customer_id], RawAudit::from_row)
        .map_err(|e| storage("list_audit", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| storage("list_audit", e))?;
    raw.into_iter().map(RawAudit::into_record).collect()
}

pub fn get_audit(conn: &Connection, audit_id: &str) -> Result<Option<AuditRecord>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM audit_log WHERE id = ?1", AUDIT_COLUMNS),
            [audit_id],
            RawAudit::from_row,
        )
        .optional()
        .map_err(|e| storage("get_audit", e))?;
    raw.map(RawAudit::into_record).transpose()
}

// Column values before enum and JSON decoding
struct RawAudit {
    id: String,
    customer_id: String,
    updated_by: String,
    updated_at: i64,
    update_source: String,
    sub_record: String,
    diff: String,
}

impl RawAudit {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            customer_id: row.get(1)?,
            updated_by: row.get(2)?,
            updated_at: row.get(3)?,
            update_source: row.get(4)?,
            sub_record: row.get(5)?,
            diff: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<AuditRecord> {
        let update_source = UpdateSource::from_column(&self.update_source)
            .ok_or_else(|| unknown_column("update_source", &self.update_source, &self.id))?;
        let sub_record = SubRecordKind::from_column(&self.sub_record)
            .ok_or_else(|| unknown_column("sub_record", &self.sub_record, &self.id))?;
        let diff = ChangeSet::from_json(&self.diff).map_err(|e| corrupt_json("read_audit", e))?;
        Ok(AuditRecord {
            id: self.id,
            customer_id: self.customer_id,
            updated_by: self.updated_by,
            updated_at: self.updated_at,
            update_source,
            sub_record,
            diff,
        })
    }
}

fn unknown_column(column: &str, value: &str, audit_id: &str) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("read_audit")
        .with_entity_id(audit_id.to_string())
        .with_message(format!("unexpected {} value '{}'", column, value))
}
