//! Identity resolution against the customers table
//!
//! Maps a (site URL, licensed-to) pair onto a customer id, creating the
//! customer when nothing suitable exists. The candidate query, the decision
//! and any insert share one `BEGIN IMMEDIATE` transaction, so two resolvers
//! racing on a fresh key pair produce a single customer.

use crate::customers::{now_millis, CustomerRepo};
use crate::errors::{storage, Result};
use custrack_core::errors::ExError;
use custrack_core::identity::{decide_match, validate_match_keys, MatchDecision};
use custrack_core::model::Customer;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

/// How a resolution was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ResolutionOutcome {
    /// No customer matched; one was created
    Created,
    /// An existing customer was chosen
    Matched,
    /// Several customers matched without a preferred one; a new customer was
    /// created anyway
    AmbiguousMatch { candidates: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub customer_id: String,
    #[serde(flatten)]
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    pub fn created_customer(&self) -> bool {
        !matches!(self.outcome, ResolutionOutcome::Matched)
    }
}

/// Resolve `(site_url, licensed_to)` to a customer id
///
/// # Errors
///
/// `InvalidArgument` when either key is blank, `Storage` on SQLite failure.
pub fn resolve_customer(
    conn: &mut Connection,
    site_url: &str,
    licensed_to: &str,
) -> Result<Resolution> {
    let (site_url, licensed_to) = validate_match_keys(site_url, licensed_to)
        .map_err(|e| ExError::from(e).with_op("resolve_customer"))?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| storage("resolve_customer", e))?;

    let candidates = CustomerRepo::match_candidates(&tx, site_url, licensed_to)?;
    let decision = decide_match(&candidates, site_url, licensed_to);

    let resolution = match decision {
        MatchDecision::Existing(customer_id) => Resolution {
            customer_id,
            outcome: ResolutionOutcome::Matched,
        },
        MatchDecision::CreateNew => Resolution {
            customer_id: create(&tx, site_url, licensed_to)?,
            outcome: ResolutionOutcome::Created,
        },
        MatchDecision::CreateAmbiguous(ids) => {
            tracing::debug!(
                site_url,
                licensed_to,
                match_count = ids.len(),
                "ambiguous customer match"
            );
            Resolution {
                customer_id: create(&tx, site_url, licensed_to)?,
                outcome: ResolutionOutcome::AmbiguousMatch { candidates: ids },
            }
        }
    };

    tx.commit().map_err(|e| storage("resolve_customer", e))?;

    tracing::debug!(
        customer_id = %resolution.customer_id,
        match_count = candidates.len(),
        "customer resolved"
    );
    Ok(resolution)
}

fn create(conn: &Connection, site_url: &str, licensed_to: &str) -> Result<String> {
    let customer = Customer::from_match_keys(
        uuid::Uuid::now_v7().to_string(),
        site_url,
        licensed_to,
        now_millis(),
    );
    CustomerRepo::insert(conn, &customer)?;
    Ok(customer.id)
}
