//! Customer listing filter and paging model.
//!
//! Query parameters arrive as strings from the API layer; this module turns
//! them into a validated [`CustomerFilter`] and does the pagination math.

use serde::{Deserialize, Serialize};

use crate::errors::CustrackError;

/// Page size used when the caller asks for 0 (or nothing)
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Sortable customer columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    CustomerSuccessManager,
    AccountExecutive,
    TechnicalAccountManager,
    LicenseType,
    SiteUrl,
    LicensedTo,
    LastUpdated,
}

impl SortField {
    /// Parse an API sort parameter. Accepts the short API names
    /// (`csm`, `ae`, `tam`, `type`) as well as the full field names.
    pub fn from_param(value: &str) -> Result<Self, CustrackError> {
        let field = match value.trim() {
            "" | "name" => SortField::Name,
            "csm" | "customer_success_manager" | "customerSuccessManager" | "successManager" => {
                SortField::CustomerSuccessManager
            }
            "ae" | "account_executive" | "accountExecutive" | "executive" => {
                SortField::AccountExecutive
            }
            "tam"
            | "technical_account_manager"
            | "technicalAccountManager"
            | "technicalContact" => SortField::TechnicalAccountManager,
            "type" | "license_type" | "licenseType" => SortField::LicenseType,
            "site_url" | "siteURL" | "siteUrl" | "siteIdentifier" => SortField::SiteUrl,
            "licensed_to" | "licensedTo" => SortField::LicensedTo,
            "last_updated" | "lastUpdated" => SortField::LastUpdated,
            other => {
                return Err(CustrackError::InvalidSort {
                    value: other.to_string(),
                })
            }
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(value: &str) -> Result<Self, CustrackError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(CustrackError::InvalidDirection {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerFilter {
    /// Case-insensitive substring over name, licensed-to and site URL
    pub search_term: String,
    pub sort: SortField,
    pub direction: SortDirection,
    pub page: u32,
    /// 0 means [`DEFAULT_PAGE_SIZE`]
    pub per_page: u32,
}

impl CustomerFilter {
    /// Build a filter from raw query parameters
    ///
    /// Recognized keys: `searchTerm`, `sort`, `order` / `direction`, `page`,
    /// `perPage`. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Unknown sort or direction values, and paging values that are not
    /// non-negative integers.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, CustrackError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = CustomerFilter::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "searchTerm" => filter.search_term = value.trim().to_string(),
                "sort" => filter.sort = SortField::from_param(value)?,
                "order" | "direction" => filter.direction = SortDirection::from_param(value)?,
                "page" => filter.page = parse_paging("page", value)?,
                "perPage" => filter.per_page = parse_paging("perPage", value)?,
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn effective_per_page(&self) -> u32 {
        if self.per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.per_page
        }
    }

    /// Row offset of the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.effective_per_page())
    }
}

fn parse_paging(param: &'static str, value: &str) -> Result<u32, CustrackError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| CustrackError::InvalidPaging {
            param,
            value: value.to_string(),
        })
}

/// One page of a listing plus the totals needed to page through the rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_count: u64,
    pub has_more: bool,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: u32, per_page: u32) -> Self {
        let page_count = if per_page > 0 {
            total_count.div_ceil(u64::from(per_page))
        } else {
            0
        };
        Self {
            items,
            total_count,
            page_count,
            has_more: u64::from(page) + 1 < page_count,
        }
    }
}
