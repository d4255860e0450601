use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConfigValues, PacketValues, PluginValues};
use crate::diff::Diffable;
use crate::errors::CustrackError;

/// Commercial license tier of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Cloud,
    Enterprise,
    Professional,
    Free,
    Trial,
    Nonprofit,
    Other,
}

impl LicenseType {
    pub const ALL: [LicenseType; 7] = [
        LicenseType::Cloud,
        LicenseType::Enterprise,
        LicenseType::Professional,
        LicenseType::Free,
        LicenseType::Trial,
        LicenseType::Nonprofit,
        LicenseType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Cloud => "cloud",
            LicenseType::Enterprise => "enterprise",
            LicenseType::Professional => "professional",
            LicenseType::Free => "free",
            LicenseType::Trial => "trial",
            LicenseType::Nonprofit => "nonprofit",
            LicenseType::Other => "other",
        }
    }

    /// Parse the stored column value; the empty string means "not set"
    pub fn from_column(value: &str) -> Result<Option<Self>, CustrackError> {
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl std::str::FromStr for LicenseType {
    type Err = CustrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LicenseType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CustrackError::InvalidLicenseType {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer account record
///
/// `site_url` and `licensed_to` are the identity matching keys. They are not
/// unique; see the identity resolver for how collisions are handled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    /// Immutable UUIDv7 id, assigned at creation
    pub id: String,
    pub name: String,
    pub customer_success_manager: String,
    pub account_executive: String,
    pub technical_account_manager: String,
    pub product_manager: String,
    pub salesforce_id: String,
    pub zendesk_id: String,
    pub license_type: Option<LicenseType>,
    pub licensed_to: String,
    #[serde(rename = "siteURL")]
    pub site_url: String,
    pub customer_channel: String,
    #[serde(rename = "GDriveLink")]
    pub gdrive_link: String,
    pub air_gapped: bool,
    pub air_gapped_reason: String,
    pub region: String,
    pub status: String,
    pub company_type: String,
    pub code_word: String,
    /// Epoch milliseconds of the last write touching this customer
    pub last_updated: i64,
}

impl Customer {
    /// Seed a customer from a pair of matching keys, as identity resolution does
    pub fn from_match_keys(id: String, site_url: &str, licensed_to: &str, now_ms: i64) -> Self {
        Self {
            id,
            name: licensed_to.to_string(),
            licensed_to: licensed_to.to_string(),
            site_url: site_url.to_string(),
            last_updated: now_ms,
            ..Self::default()
        }
    }
}

impl Diffable for Customer {
    // id never changes and last_updated changes on every write
    fn diff_view(&self) -> Value {
        let mut view = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut view {
            map.remove("id");
            map.remove("lastUpdated");
        }
        view
    }
}

/// Partial edit of a customer's descriptive fields
///
/// `None` leaves a field untouched. Snapshot sub-records are never edited
/// through this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub customer_success_manager: Option<String>,
    pub account_executive: Option<String>,
    pub technical_account_manager: Option<String>,
    pub product_manager: Option<String>,
    pub salesforce_id: Option<String>,
    pub zendesk_id: Option<String>,
    pub license_type: Option<LicenseType>,
    pub licensed_to: Option<String>,
    #[serde(rename = "siteURL")]
    pub site_url: Option<String>,
    pub customer_channel: Option<String>,
    #[serde(rename = "GDriveLink")]
    pub gdrive_link: Option<String>,
    pub air_gapped: Option<bool>,
    pub air_gapped_reason: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub company_type: Option<String>,
    pub code_word: Option<String>,
}

impl CustomerPatch {
    /// Apply the patch, returning the edited copy
    pub fn apply_to(&self, customer: &Customer) -> Customer {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        let mut next = customer.clone();
        set(&mut next.name, &self.name);
        set(
            &mut next.customer_success_manager,
            &self.customer_success_manager,
        );
        set(&mut next.account_executive, &self.account_executive);
        set(
            &mut next.technical_account_manager,
            &self.technical_account_manager,
        );
        set(&mut next.product_manager, &self.product_manager);
        set(&mut next.salesforce_id, &self.salesforce_id);
        set(&mut next.zendesk_id, &self.zendesk_id);
        if self.license_type.is_some() {
            next.license_type = self.license_type;
        }
        set(&mut next.licensed_to, &self.licensed_to);
        set(&mut next.site_url, &self.site_url);
        set(&mut next.customer_channel, &self.customer_channel);
        set(&mut next.gdrive_link, &self.gdrive_link);
        set(&mut next.air_gapped, &self.air_gapped);
        set(&mut next.air_gapped_reason, &self.air_gapped_reason);
        set(&mut next.region, &self.region);
        set(&mut next.status, &self.status);
        set(&mut next.company_type, &self.company_type);
        set(&mut next.code_word, &self.code_word);
        next
    }

    pub fn is_empty(&self) -> bool {
        *self == CustomerPatch::default()
    }
}

/// A customer together with its three current snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFull {
    #[serde(flatten)]
    pub customer: Customer,
    pub packet: PacketValues,
    pub config: ConfigValues,
    pub plugins: PluginValues,
}
