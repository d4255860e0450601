//! Customer service API with boundary logging.
//!
//! Every public operation logs `start`, then `end` or `end_error`, with the
//! customer id when one is known.

use custrack_core::model::{
    AuditRecord, ConfigValues, Customer, CustomerFilter, CustomerFull, CustomerPatch,
    PacketValues, PagedResult, PluginValues,
};
use custrack_core::{log_op_end, log_op_error, log_op_start};
use custrack_store::directory;
use custrack_store::errors::Result;
use custrack_store::identity::{self, Resolution, ResolutionOutcome};
use custrack_store::snapshot::{list_versions, update_record, SnapshotVersion, VersionedRecord};
use custrack_store::{audit, Database};
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// Audit trail plus every stored snapshot version of one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHistory {
    /// Newest first
    pub audit: Vec<AuditRecord>,
    /// Oldest first
    pub packets: Vec<SnapshotVersion<PacketValues>>,
    pub configs: Vec<SnapshotVersion<ConfigValues>>,
    pub plugins: Vec<SnapshotVersion<PluginValues>>,
}

/// Customer read/write API over a shared [`Database`]
#[derive(Debug, Clone)]
pub struct CustomerService {
    db: Database,
    default_page_size: u32,
}

impl CustomerService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            default_page_size: custrack_core::model::DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used when a listing asks for 0
    pub fn with_default_page_size(mut self, per_page: u32) -> Self {
        if per_page > 0 {
            self.default_page_size = per_page;
        }
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// One page of customers
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub fn list_customers(&self, filter: &CustomerFilter) -> Result<PagedResult<Customer>> {
        let mut filter = filter.clone();
        if filter.per_page == 0 {
            filter.per_page = self.default_page_size;
        }

        log_op_start!(
            "list_customers",
            search_term = filter.search_term.as_str(),
            page = filter.page,
            per_page = filter.per_page
        );
        let start = Instant::now();

        let page = self
            .db
            .with_conn(|conn| directory::list_customers(conn, &filter))
            .map_err(|e| {
                log_op_error!(
                    "list_customers",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "list_customers",
            duration_ms = start.elapsed().as_millis() as u64,
            match_count = page.total_count
        );
        Ok(page)
    }

    /// A customer with its current snapshots
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn get_customer(&self, customer_id: &str) -> Result<CustomerFull> {
        self.instrumented("get_customer", customer_id, |conn| {
            directory::get_customer_full(conn, customer_id)
        })
    }

    /// Edit descriptive fields; returns the updated customer
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn update_customer(
        &self,
        customer_id: &str,
        actor: &str,
        patch: &CustomerPatch,
    ) -> Result<CustomerFull> {
        self.instrumented("update_customer", customer_id, |conn| {
            let audit = directory::update_customer(conn, customer_id, actor, patch)?;
            tracing::debug!(audit_id = %audit.id, change_count = audit.diff.len(), "customer edited");
            directory::get_customer_full(conn, customer_id)
        })
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn update_config(
        &self,
        customer_id: &str,
        actor: &str,
        config: &ConfigValues,
    ) -> Result<CustomerFull> {
        self.update_snapshot("update_config", customer_id, actor, config)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn update_packet(
        &self,
        customer_id: &str,
        actor: &str,
        packet: &PacketValues,
    ) -> Result<CustomerFull> {
        self.update_snapshot("update_packet", customer_id, actor, packet)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn update_plugins(
        &self,
        customer_id: &str,
        actor: &str,
        plugins: &PluginValues,
    ) -> Result<CustomerFull> {
        self.update_snapshot("update_plugins", customer_id, actor, plugins)
    }

    /// Audit trail and snapshot versions
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn customer_history(&self, customer_id: &str) -> Result<CustomerHistory> {
        self.instrumented("customer_history", customer_id, |conn| {
            directory::get_customer(conn, customer_id)?;
            Ok(CustomerHistory {
                audit: audit::list_audit(conn, customer_id)?,
                packets: list_versions(conn, customer_id)?,
                configs: list_versions(conn, customer_id)?,
                plugins: list_versions(conn, customer_id)?,
            })
        })
    }

    /// Map matching keys to a customer, creating one if needed
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for blank keys.
    pub fn resolve_customer(&self, site_url: &str, licensed_to: &str) -> Result<Resolution> {
        log_op_start!("resolve_customer", site_url = site_url, licensed_to = licensed_to);
        let start = Instant::now();

        let resolution = self
            .db
            .with_conn(|conn| identity::resolve_customer(conn, site_url, licensed_to))
            .map_err(|e| {
                log_op_error!(
                    "resolve_customer",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        if let ResolutionOutcome::AmbiguousMatch { candidates } = &resolution.outcome {
            tracing::warn!(
                op = "resolve_customer",
                customer_id = resolution.customer_id.as_str(),
                candidates = ?candidates,
                "ambiguous customer match, created a new customer"
            );
        }

        log_op_end!(
            "resolve_customer",
            duration_ms = start.elapsed().as_millis() as u64,
            customer_id = resolution.customer_id.as_str(),
            created = resolution.created_customer()
        );
        Ok(resolution)
    }

    fn update_snapshot<T: VersionedRecord>(
        &self,
        op: &'static str,
        customer_id: &str,
        actor: &str,
        value: &T,
    ) -> Result<CustomerFull> {
        self.instrumented(op, customer_id, |conn| {
            let receipt = update_record(conn, customer_id, actor, value)?;
            tracing::debug!(
                audit_id = %receipt.audit.id,
                change_count = receipt.changes().len(),
                "snapshot updated"
            );
            directory::get_customer_full(conn, customer_id)
        })
    }

    fn instrumented<T, F>(&self, op: &'static str, customer_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        log_op_start!(op, customer_id = customer_id);
        let start = Instant::now();

        let result = self.db.with_conn(f).map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                customer_id = customer_id
            );
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            customer_id = customer_id
        );
        Ok(result)
    }
}
