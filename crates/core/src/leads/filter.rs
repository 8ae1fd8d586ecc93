//! Search and status filtering over an in-memory lead list.

use serde::Deserialize;

use super::Lead;
use crate::types::LeadStatus;

/// Dashboard filter: free-text search ANDed with an optional status.
///
/// Deserializes from the `?q=&status=` query string. An empty `status`
/// value means "all statuses".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadFilter {
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<LeadStatus>,
}

impl LeadFilter {
    #[must_use]
    pub fn new(search: impl Into<String>, status: Option<LeadStatus>) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Whether the filter lets everything through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.status.is_none()
    }

    /// Case-insensitive substring match on name, email and company, plus an
    /// exact status match when one is set.
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        if self.status.is_some_and(|s| s != lead.status) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        lead.name.to_lowercase().contains(&needle)
            || lead.email.to_lowercase().contains(&needle)
            || lead
                .company
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
    }

    /// Borrow the matching leads, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|l| self.matches(l)).collect()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<LeadStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::LeadId;

    fn lead(id: i64, name: &str, email: &str, company: Option<&str>, status: LeadStatus) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: name.into(),
            email: email.into(),
            phone: "5551234567".into(),
            interest: None,
            company: company.map(Into::into),
            source: None,
            message: "I want to learn more".into(),
            status,
            created_at: Utc::now(),
            idempotency_key: None,
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead(1, "Jane Doe", "jane@x.com", Some("Acme"), LeadStatus::New),
            lead(2, "John Roe", "john@y.com", None, LeadStatus::Qualified),
            lead(3, "Ann Lee", "ann@acme.io", None, LeadStatus::Qualified),
        ]
    }

    fn ids(leads: &[&Lead]) -> Vec<i64> {
        leads.iter().map(|l| l.id.as_i64()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let leads = sample();
        assert!(LeadFilter::default().is_empty());
        assert_eq!(ids(&LeadFilter::default().apply(&leads)), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_email_company() {
        let leads = sample();
        assert_eq!(ids(&LeadFilter::new("JANE", None).apply(&leads)), vec![1]);
        assert_eq!(ids(&LeadFilter::new("y.com", None).apply(&leads)), vec![2]);
        assert_eq!(ids(&LeadFilter::new("acme", None).apply(&leads)), vec![1, 3]);
    }

    #[test]
    fn test_status_is_anded_with_search() {
        let leads = sample();
        let filter = LeadFilter::new("acme", Some(LeadStatus::Qualified));
        assert_eq!(ids(&filter.apply(&leads)), vec![3]);
        let filter = LeadFilter::new("", Some(LeadStatus::Closed));
        assert!(filter.apply(&leads).is_empty());
    }

    #[test]
    fn test_filtering_leaves_source_untouched() {
        let leads = sample();
        let before = leads.clone();
        let _ = LeadFilter::new("jane", Some(LeadStatus::New)).apply(&leads);
        assert_eq!(leads, before);
    }

    #[test]
    fn test_deserialize_query_with_blank_status() {
        let filter: LeadFilter = serde_json::from_str(r#"{"q":"jane","status":""}"#).unwrap();
        assert_eq!(filter, LeadFilter::new("jane", None));
        let filter: LeadFilter = serde_json::from_str(r#"{"status":"closed"}"#).unwrap();
        assert_eq!(filter.status, Some(LeadStatus::Closed));
    }
}
