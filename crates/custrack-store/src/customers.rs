//! Customer row persistence

use crate::errors::{customer_not_found, storage, Result};
use custrack_core::identity::MatchCandidate;
use custrack_core::model::{Customer, LicenseType};
use rusqlite::{Connection, OptionalExtension, Row};

/// Column list shared by every customer SELECT, in [`row_to_customer`] order
pub const CUSTOMER_COLUMNS: &str = "id, name, customer_success_manager, account_executive, \
     technical_account_manager, product_manager, salesforce_id, zendesk_id, license_type, \
     licensed_to, site_url, customer_channel, gdrive_link, air_gapped, air_gapped_reason, \
     region, status, company_type, code_word, last_updated";

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Map a row selected with [`CUSTOMER_COLUMNS`]
pub fn row_to_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    let license: String = row.get(8)?;
    let license_type = LicenseType::from_column(&license).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        customer_success_manager: row.get(2)?,
        account_executive: row.get(3)?,
        technical_account_manager: row.get(4)?,
        product_manager: row.get(5)?,
        salesforce_id: row.get(6)?,
        zendesk_id: row.get(7)?,
        license_type,
        licensed_to: row.get(9)?,
        site_url: row.get(10)?,
        customer_channel: row.get(11)?,
        gdrive_link: row.get(12)?,
        air_gapped: row.get::<_, i64>(13)? != 0,
        air_gapped_reason: row.get(14)?,
        region: row.get(15)?,
        status: row.get(16)?,
        company_type: row.get(17)?,
        code_word: row.get(18)?,
        last_updated: row.get(19)?,
    })
}

/// SQLite repository for customer rows
///
/// Functions take `&Connection` so they run equally on a plain connection or
/// inside a caller's transaction.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer row
    pub fn insert(conn: &Connection, customer: &Customer) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO customers ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                CUSTOMER_COLUMNS
            ),
            rusqlite::params![
                customer.id,
                customer.name,
                customer.customer_success_manager,
                customer.account_executive,
                customer.technical_account_manager,
                customer.product_manager,
                customer.salesforce_id,
                customer.zendesk_id,
                license_column(customer),
                customer.licensed_to,
                customer.site_url,
                customer.customer_channel,
                customer.gdrive_link,
                customer.air_gapped,
                customer.air_gapped_reason,
                customer.region,
                customer.status,
                customer.company_type,
                customer.code_word,
                customer.last_updated,
            ],
        )
        .map_err(|e| storage("insert_customer", e))?;
        Ok(())
    }

    /// Overwrite every mutable column of an existing customer
    pub fn update(conn: &Connection, customer: &Customer) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE customers SET
                    name = ?2, customer_success_manager = ?3, account_executive = ?4,
                    technical_account_manager = ?5, product_manager = ?6, salesforce_id = ?7,
                    zendesk_id = ?8, license_type = ?9, licensed_to = ?10, site_url = ?11,
                    customer_channel = ?12, gdrive_link = ?13, air_gapped = ?14,
                    air_gapped_reason = ?15, region = ?16, status = ?17, company_type = ?18,
                    code_word = ?19, last_updated = ?20
                 WHERE id = ?1",
                rusqlite::params![
                    customer.id,
                    customer.name,
                    customer.customer_success_manager,
                    customer.account_executive,
                    customer.technical_account_manager,
                    customer.product_manager,
                    customer.salesforce_id,
                    customer.zendesk_id,
                    license_column(customer),
                    customer.licensed_to,
                    customer.site_url,
                    customer.customer_channel,
                    customer.gdrive_link,
                    customer.air_gapped,
                    customer.air_gapped_reason,
                    customer.region,
                    customer.status,
                    customer.company_type,
                    customer.code_word,
                    customer.last_updated,
                ],
            )
            .map_err(|e| storage("update_customer", e))?;
        if changed == 0 {
            return Err(customer_not_found("update_customer", &customer.id));
        }
        Ok(())
    }

    pub fn get(conn: &Connection, customer_id: &str) -> Result<Option<Customer>> {
        conn.query_row(
            &format!("SELECT {} FROM customers WHERE id = ?1", CUSTOMER_COLUMNS),
            [customer_id],
            row_to_customer,
        )
        .optional()
        .map_err(|e| storage("get_customer", e))
    }

    /// Like [`CustomerRepo::get`] but a missing row is `NotFound`
    pub fn require(conn: &Connection, op: &str, customer_id: &str) -> Result<Customer> {
        Self::get(conn, customer_id)?.ok_or_else(|| customer_not_found(op, customer_id))
    }

    /// Bump `last_updated`
    pub fn touch(conn: &Connection, customer_id: &str, at: i64) -> Result<()> {
        conn.execute(
            "UPDATE customers SET last_updated = ?2 WHERE id = ?1",
            rusqlite::params![customer_id, at],
        )
        .map_err(|e| storage("touch_customer", e))?;
        Ok(())
    }

    pub fn set_licensed_to(conn: &Connection, customer_id: &str, licensed_to: &str) -> Result<()> {
        conn.execute(
            "UPDATE customers SET licensed_to = ?2 WHERE id = ?1",
            rusqlite::params![customer_id, licensed_to],
        )
        .map_err(|e| storage("set_licensed_to", e))?;
        Ok(())
    }

    pub fn set_site_url(conn: &Connection, customer_id: &str, site_url: &str) -> Result<()> {
        conn.execute(
            "UPDATE customers SET site_url = ?2 WHERE id = ?1",
            rusqlite::params![customer_id, site_url],
        )
        .map_err(|e| storage("set_site_url", e))?;
        Ok(())
    }

    /// Customers sharing the site URL or the licensed-to value, ordered by id
    pub fn match_candidates(
        conn: &Connection,
        site_url: &str,
        licensed_to: &str,
    ) -> Result<Vec<MatchCandidate>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, site_url, licensed_to FROM customers
                 WHERE site_url = ?1 OR licensed_to = ?2
                 ORDER BY id ASC",
            )
            .map_err(|e| storage("match_candidates", e))?;
        let rows = stmt
            .query_map(rusqlite::params![site_url, licensed_to], |row| {
                Ok(MatchCandidate {
                    customer_id: row.get(0)?,
                    site_url: row.get(1)?,
                    licensed_to: row.get(2)?,
                })
            })
            .map_err(|e| storage("match_candidates", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| storage("match_candidates", e))?;
        Ok(rows)
    }
}

fn license_column(customer: &Customer) -> &'static str {
    customer.license_type.map(|t| t.as_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let conn = setup();
        let mut customer = Customer::from_match_keys("c1".into(), "https://a", "Acme", 5);
        customer.license_type = Some(LicenseType::Enterprise);
        customer.air_gapped = true;
        CustomerRepo::insert(&conn, &customer).unwrap();

        assert_eq!(CustomerRepo::get(&conn, "c1").unwrap(), Some(customer));
        assert_eq!(CustomerRepo::get(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_update_missing_customer_is_not_found() {
        let conn = setup();
        let customer = Customer::from_match_keys("ghost".into(), "s", "l", 1);
        let err = CustomerRepo::update(&conn, &customer).unwrap_err();
        assert_eq!(err.kind(), custrack_core::ExErrorKind::NotFound);
    }

    #[test]
    fn test_match_candidates_on_either_key() {
        let conn = setup();
        CustomerRepo::insert(&conn, &Customer::from_match_keys("c1".into(), "s1", "A", 1)).unwrap();
        CustomerRepo::insert(&conn, &Customer::from_match_keys("c2".into(), "s2", "B", 1)).unwrap();
        CustomerRepo::insert(&conn, &Customer::from_match_keys("c3".into(), "s3", "C", 1)).unwrap();

        let found = CustomerRepo::match_candidates(&conn, "s1", "B").unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }
}
