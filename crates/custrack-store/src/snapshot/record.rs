use crate::audit::append_audit;
use crate::customers::{now_millis, CustomerRepo};
use crate::errors::{storage, wrap, Result};
use custrack_core::diff::{compute_diff, ChangeSet, Diffable};
use custrack_core::model::{AuditRecord, SubRecordKind};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

/// Bookkeeping columns shared by every snapshot table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHeader {
    pub id: String,
    pub customer_id: String,
    pub audit_id: String,
    pub current: bool,
    pub created_at: i64,
}

/// A sub-record type stored as append-only versions
///
/// Implementors provide the per-table row mapping; versioning, auditing and
/// the current flag are handled generically by [`update_record`].
pub trait VersionedRecord: Diffable + Default + Sized {
    const KIND: SubRecordKind;
    /// Header table; must have the [`VersionHeader`] columns
    const TABLE: &'static str;

    /// Load the payload stored for one version
    fn load_version(conn: &Connection, version_id: &str) -> Result<Self>;

    /// Insert the version row described by `header`, plus any child rows
    fn insert_version(conn: &Connection, header: &VersionHeader, value: &Self) -> Result<()>;

    /// The current version, if the customer has one
    fn load_current(conn: &Connection, customer_id: &str) -> Result<Option<Self>> {
        let version_id: Option<String> = conn
            .query_row(
                &format!(
                    "SELECT id FROM {} WHERE customer_id = ?1 AND current = 1",
                    Self::TABLE
                ),
                [customer_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| storage("load_current", e))?;
        version_id
            .map(|id| Self::load_version(conn, &id))
            .transpose()
    }

    /// Copy identity keys back onto the customer row
    fn propagate(&self, _conn: &Connection, _customer_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Result of a successful [`update_record`]
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReceipt {
    pub version_id: String,
    pub audit: AuditRecord,
}

impl SnapshotReceipt {
    pub fn changes(&self) -> &ChangeSet {
        &self.audit.diff
    }
}

/// One stored version with its header
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersion<T> {
    #[serde(flatten)]
    pub header: VersionHeader,
    pub value: T,
}

/// The current value, or `T::default()` when none was ever written
pub fn get_current<T: VersionedRecord>(conn: &Connection, customer_id: &str) -> Result<T> {
    Ok(T::load_current(conn, customer_id)?.unwrap_or_default())
}

/// Write a new current version of `T` for a customer
///
/// An empty `actor` marks the write as packet-driven. The audit record is
/// written even when the diff is empty.
///
/// # Errors
///
/// `NotFound` for an unknown customer; `Storage` for SQLite failures. Nothing
/// is written on error.
pub fn update_record<T: VersionedRecord>(
    conn: &mut Connection,
    customer_id: &str,
    actor: &str,
    value: &T,
) -> Result<SnapshotReceipt> {
    let op = format!("update_{}", T::KIND);
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| storage(&op, e))?;

    CustomerRepo::require(&tx, &op, customer_id)?;

    let previous = get_current::<T>(&tx, customer_id)?;
    let changes = compute_diff(&previous, value);
    let now = now_millis();

    let audit = append_audit(&tx, customer_id, actor, T::KIND, &changes, now)?;

    tx.execute(
        &format!(
            "UPDATE {} SET current = 0 WHERE customer_id = ?1 AND current = 1",
            T::TABLE
        ),
        [customer_id],
    )
    .map_err(|e| storage(&op, e))?;

    let header = VersionHeader {
        id: uuid::Uuid::now_v7().to_string(),
        customer_id: customer_id.to_string(),
        audit_id: audit.id.clone(),
        current: true,
        created_at: now,
    };
    T::insert_version(&tx, &header, value).map_err(|e| wrap(&op, e))?;

    CustomerRepo::touch(&tx, customer_id, now)?;
    value.propagate(&tx, customer_id)?;

    tx.commit().map_err(|e| storage(&op, e))?;

    tracing::debug!(
        customer_id,
        sub_record = %T::KIND,
        version_id = %header.id,
        change_count = changes.len(),
        "snapshot version written"
    );

    Ok(SnapshotReceipt {
        version_id: header.id,
        audit,
    })
}

/// Every stored version of `T` for a customer, oldest first
pub fn list_versions<T: VersionedRecord>(
    conn: &Connection,
    customer_id: &str,
) -> Result<Vec<SnapshotVersion<T>>> {
    let op = format!("list_{}_versions", T::KIND);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, customer_id, audit_id, current, created_at FROM {}
             WHERE customer_id = ?1 ORDER BY created_at ASC, rowid ASC",
            T::TABLE
        ))
        .map_err(|e| storage(&op, e))?;
    let headers = stmt
        .query_map([customer_id], |row| {
            Ok(VersionHeader {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                audit_id: row.get(2)?,
                current: row.get::<_, i64>(3)? != 0,
                created_at: row.get(4)?,
            })
        })
        .map_err(|e| storage(&op, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| storage(&op, e))?;

    headers
        .into_iter()
        .map(|header| {
            let value = T::load_version(conn, &header.id)?;
            Ok(SnapshotVersion { header, value })
        })
        .collect()
}
