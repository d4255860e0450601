//! Customer directory: listing, full reads and descriptive edits

use crate::audit::append_audit;
use crate::customers::{now_millis, row_to_customer, CustomerRepo, CUSTOMER_COLUMNS};
use crate::errors::{storage, Result};
use crate::snapshot::get_current;
use custrack_core::diff::compute_diff;
use custrack_core::model::{
    AuditRecord, Customer, CustomerFilter, CustomerFull, CustomerPatch, PagedResult, SortField,
    SubRecordKind,
};
use rusqlite::{Connection, TransactionBehavior};

// Text columns sort case-insensitively; ties fall back to id
fn order_clause(filter: &CustomerFilter) -> String {
    let column = match filter.sort {
        SortField::Name => "name",
        SortField::CustomerSuccessManager => "customer_success_manager",
        SortField::AccountExecutive => "account_executive",
        SortField::TechnicalAccountManager => "technical_account_manager",
        SortField::LicenseType => "license_type",
        SortField::SiteUrl => "site_url",
        SortField::LicensedTo => "licensed_to",
        SortField::LastUpdated => "last_updated",
    };
    let collate = if filter.sort == SortField::LastUpdated {
        ""
    } else {
        " COLLATE NOCASE"
    };
    let dir = filter.direction.as_sql();
    format!("{column}{collate} {dir}, id {dir}")
}

// fold_case is registered by db::configure
const SEARCH_CLAUSE: &str = "(?1 = '' \
     OR instr(fold_case(name), ?1) > 0 \
     OR instr(fold_case(licensed_to), ?1) > 0 \
     OR instr(fold_case(site_url), ?1) > 0)";

/// One page of customers matching `filter`
pub fn list_customers(conn: &Connection, filter: &CustomerFilter) -> Result<PagedResult<Customer>> {
    let term = filter.search_term.trim().to_lowercase();
    let per_page = filter.effective_per_page();

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM customers WHERE {}", SEARCH_CLAUSE),
            [&term],
            |row| row.get(0),
        )
        .map_err(|e| storage("list_customers", e))?;

    let sql = format!(
        "SELECT {} FROM customers WHERE {} ORDER BY {} LIMIT ?2 OFFSET ?3",
        CUSTOMER_COLUMNS,
        SEARCH_CLAUSE,
        order_clause(filter)
    );
    let offset = i64::try_from(filter.offset()).unwrap_or(i64::MAX);
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| storage("list_customers", e))?;
    let items = stmt
        .query_map(
            rusqlite::params![term, i64::from(per_page), offset],
            row_to_customer,
        )
        .map_err(|e| storage("list_customers", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| storage("list_customers", e))?;

    Ok(PagedResult::new(
        items,
        u64::try_from(total).unwrap_or(0),
        filter.page,
        per_page,
    ))
}

pub fn get_customer(conn: &Connection, customer_id: &str) -> Result<Customer> {
    CustomerRepo::require(conn, "get_customer", customer_id)
}

/// A customer with its current packet, config and plugin snapshots
pub fn get_customer_full(conn: &Connection, customer_id: &str) -> Result<CustomerFull> {
    let customer = CustomerRepo::require(conn, "get_customer_full", customer_id)?;
    Ok(CustomerFull {
        packet: get_current(conn, customer_id)?,
        config: get_current(conn, customer_id)?,
        plugins: get_current(conn, customer_id)?,
        customer,
    })
}

/// Apply a descriptive edit and audit it
///
/// Always bumps `last_updated` and writes one `customer` audit record, even
/// when the patch changes nothing.
///
/// # Errors
///
/// `NotFound` for an unknown id, `Storage` on SQLite failure.
pub fn update_customer(
    conn: &mut Connection,
    customer_id: &str,
    actor: &str,
    patch: &CustomerPatch,
) -> Result<AuditRecord> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| storage("update_customer", e))?;

    let current = CustomerRepo::require(&tx, "update_customer", customer_id)?;
    let now = now_millis();
    let mut next = patch.apply_to(&current);
    next.last_updated = now;

    let changes = compute_diff(&current, &next);
    let audit = append_audit(&tx, customer_id, actor, SubRecordKind::Customer, &changes, now)?;
    CustomerRepo::update(&tx, &next)?;

    tx.commit().map_err(|e| storage("update_customer", e))?;
    Ok(audit)
}
