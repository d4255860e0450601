//! Identity match decision.
//!
//! Given every customer that shares at least one matching key with an
//! inbound (site URL, licensed-to) pair, decide whether one of them owns the
//! pair or a new customer has to be created. The store runs the query and
//! applies the decision inside one transaction.

use crate::errors::CustrackError;

/// A customer row that matched on site URL, licensed-to, or both
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub customer_id: String,
    pub site_url: String,
    pub licensed_to: String,
}

/// Outcome of [`decide_match`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    /// Use this existing customer.
    Existing(String),
    /// Nothing matched; create a customer.
    CreateNew,
    /// Several customers matched and none could be preferred; create a
    /// customer rather than guess. Carries the candidate ids.
    CreateAmbiguous(Vec<String>),
}

/// Trim and require both matching keys
///
/// # Errors
///
/// `EmptyMatchKey` when either key is empty after trimming.
pub fn validate_match_keys<'a>(
    site_url: &'a str,
    licensed_to: &'a str,
) -> Result<(&'a str, &'a str), CustrackError> {
    let site_url = site_url.trim();
    let licensed_to = licensed_to.trim();
    if site_url.is_empty() {
        return Err(CustrackError::EmptyMatchKey { key: "site_url" });
    }
    if licensed_to.is_empty() {
        return Err(CustrackError::EmptyMatchKey { key: "licensed_to" });
    }
    Ok((site_url, licensed_to))
}

/// Decide which customer owns `(site_url, licensed_to)`
///
/// - no candidates: create
/// - one candidate: use it, whichever key it matched on
/// - several: split into "both keys" and "license only". More than one
///   member in either group is ambiguous. Otherwise prefer the single
///   both-keys match, then the single license-only match. Site-only matches
///   alone are ambiguous too.
pub fn decide_match(candidates: &[MatchCandidate], site_url: &str, licensed_to: &str) -> MatchDecision {
    match candidates {
        [] => MatchDecision::CreateNew,
        [only] => MatchDecision::Existing(only.customer_id.clone()),
        _ => {
            let (both, license_only): (Vec<&MatchCandidate>, Vec<&MatchCandidate>) = candidates
                .iter()
                .filter(|c| c.licensed_to == licensed_to)
                .partition(|c| c.site_url == site_url);

            if both.len() > 1 || license_only.len() > 1 {
                return ambiguous(candidates);
            }
            if let [preferred] = both.as_slice() {
                return MatchDecision::Existing(preferred.customer_id.clone());
            }
            if let [preferred] = license_only.as_slice() {
                return MatchDecision::Existing(preferred.customer_id.clone());
            }
            ambiguous(candidates)
        }
    }
}

fn ambiguous(candidates: &[MatchCandidate]) -> MatchDecision {
    let mut ids: Vec<String> = candidates.iter().map(|c| c.customer_id.clone()).collect();
    ids.sort_unstable();
    MatchDecision::CreateAmbiguous(ids)
}
