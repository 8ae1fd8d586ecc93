//! Dashboard counters derived from a lead list.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::Lead;

/// Summary counters shown above the lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LeadStats {
    pub total: usize,
    /// Leads created strictly after `now - 7 days`.
    pub this_week: usize,
    /// Leads created strictly after `now - 30 days`.
    pub this_month: usize,
    /// Share of leads that are qualified or closed, as a rounded percentage.
    pub conversion_rate: u32,
}

impl LeadStats {
    /// Compute the counters for `leads` as seen at `now`.
    #[must_use]
    pub fn compute(leads: &[Lead], now: DateTime<Utc>) -> Self {
        let week_start = now - TimeDelta::days(7);
        let month_start = now - TimeDelta::days(30);

        let total = leads.len();
        let this_week = leads.iter().filter(|l| l.created_at > week_start).count();
        let this_month = leads.iter().filter(|l| l.created_at > month_start).count();
        let converted = leads.iter().filter(|l| l.status.is_converted()).count();

        Self {
            total,
            this_week,
            this_month,
            conversion_rate: rounded_percentage(converted, total),
        }
    }
}

/// `part / whole` as a percentage rounded half-up; 0 when `whole` is 0.
fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = (part * 200 + whole) / (whole * 2);
    u32::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LeadId, LeadStatus};

    fn lead(id: i64, created_at: DateTime<Utc>, status: LeadStatus) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: format!("Lead {id}"),
            email: format!("lead{id}@example.com"),
            phone: "5551234567".into(),
            interest: None,
            company: None,
            source: None,
            message: "I want to learn more".into(),
            status,
            created_at,
            idempotency_key: None,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(LeadStats::compute(&[], Utc::now()), LeadStats::default());
    }

    #[test]
    fn test_week_boundary_is_strict() {
        let now = Utc::now();
        let week = TimeDelta::days(7);
        let second = TimeDelta::seconds(1);
        let leads = [
            lead(1, now - week + second, LeadStatus::New),
            lead(2, now - week, LeadStatus::New),
            lead(3, now - week - second, LeadStatus::New),
        ];
        let stats = LeadStats::compute(&leads, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.this_week, 1);
        assert_eq!(stats.this_month, 3);
    }

    #[test]
    fn test_month_boundary_is_strict() {
        let now = Utc::now();
        let month = TimeDelta::days(30);
        let second = TimeDelta::seconds(1);
        let leads = [
            lead(1, now - month + second, LeadStatus::New),
            lead(2, now - month - second, LeadStatus::New),
        ];
        let stats = LeadStats::compute(&leads, now);
        assert_eq!(stats.this_week, 0);
        assert_eq!(stats.this_month, 1);
    }

    #[test]
    fn test_conversion_rate_counts_qualified_and_closed() {
        let now = Utc::now();
        let leads = [
            lead(1, now, LeadStatus::New),
            lead(2, now, LeadStatus::Contacted),
            lead(3, now, LeadStatus::Qualified),
            lead(4, now, LeadStatus::Closed),
        ];
        assert_eq!(LeadStats::compute(&leads, now).conversion_rate, 50);
    }

    #[test]
    fn test_conversion_rate_rounds_to_nearest() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(3, 3), 100);
        assert_eq!(rounded_percentage(0, 0), 0);
    }
}
